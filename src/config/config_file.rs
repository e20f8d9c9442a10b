/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://ve.dolarapi.com/v1/dolares";
pub const DEFAULT_ATTEMPTS: u32 = 3;
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 1000;
pub const DEFAULT_DEBOUNCE_MS: u64 = 800;

/// Everything is optional in the file; `Settings::resolve` fills the gaps.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
	pub api: Option<Api>,
	pub storage: Option<Storage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Api {
	pub url: Option<String>,

	/// Total number of requests per fetch, including the first.
	pub attempts: Option<u32>,
	pub initial_backoff_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Storage {
	/// Where the state file lives. Defaults to the platform data directory.
	pub path: Option<String>,
	pub debounce_ms: Option<u64>,
}

/// Fully resolved runtime settings.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
	pub api_url: String,
	pub attempts: u32,
	pub initial_backoff: Duration,
	pub state_path: Option<PathBuf>,
	pub debounce: Duration,
}

impl Settings {
	/// Combines the config file with the default state location. A state
	/// path of None means no location could be determined, which leaves the
	/// session without durable storage.
	pub fn resolve(config: Config, default_state_path: Option<PathBuf>) -> Self {
		let api = config.api.unwrap_or_default();
		let storage = config.storage.unwrap_or_default();

		Self {
			api_url: api.url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
			attempts: api.attempts.unwrap_or(DEFAULT_ATTEMPTS).max(1),
			initial_backoff: Duration::from_millis(
				api.initial_backoff_ms.unwrap_or(DEFAULT_INITIAL_BACKOFF_MS),
			),
			state_path: storage.path.map(PathBuf::from).or(default_state_path),
			debounce: Duration::from_millis(
				storage.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS),
			),
		}
	}
}
