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
use crate::config::config_file::Config;
use anyhow::{anyhow, Error};
use dirs::{data_dir, home_dir};
use std::fs;
use std::fs::File;
use std::path::PathBuf;

pub struct Filesystem {
	home: Option<PathBuf>,
	data: Option<PathBuf>,
}

impl Filesystem {
	pub fn new() -> Self {
		Self {
			home: home_dir(),
			data: data_dir(),
		}
	}

	/// Fetches the config from the given path, or default path if none.
	/// The default file is created empty on first use so users have an
	/// obvious place to put overrides; a custom path must already exist.
	pub fn get_config(
		&self,
		custom_config_path: Option<&String>,
	) -> Result<Config, Error> {
		let config_path = match &custom_config_path {
			None => self
				.home
				.as_ref()
				.ok_or_else(|| anyhow!("Unable to determine home directory"))?
				.join(".config/payrate/config.toml"),
			Some(p) => PathBuf::from(p),
		};

		if !config_path.exists() && custom_config_path.is_none() {
			if let Some(parent) = config_path.parent() {
				fs::create_dir_all(parent)?;
			}
			File::create(config_path.clone())?;
		}

		let content = fs::read_to_string(&config_path).map_err(|e| {
			anyhow!("failed to read config {}: {}", config_path.display(), e)
		})?;
		let config: Config = toml::from_str(&content)
			.map_err(|e| anyhow!("failed to parse config: {}", e))?;

		Ok(config)
	}

	/// Default location of the saved calculator state.
	pub fn default_state_path(&self) -> Option<PathBuf> {
		self.data.as_ref().map(|d| d.join("payrate/state.json"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn rooted(dir: &std::path::Path) -> Filesystem {
		Filesystem {
			home: Some(dir.to_path_buf()),
			data: Some(dir.join("data")),
		}
	}

	#[test]
	fn test_default_config_is_created() {
		let dir = tempfile::tempdir().unwrap();
		let fs = rooted(dir.path());

		let config = fs.get_config(None).unwrap();
		assert!(config.api.is_none());
		assert!(dir.path().join(".config/payrate/config.toml").exists());
	}

	#[test]
	fn test_missing_custom_config_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let fs = rooted(dir.path());
		let path = dir.path().join("nope.toml").display().to_string();

		assert!(fs.get_config(Some(&path)).is_err());
	}

	#[test]
	fn test_bad_toml_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let fs = rooted(dir.path());
		let path = dir.path().join("bad.toml");
		std::fs::write(&path, "[api\nurl = 3").unwrap();

		let err = fs.get_config(Some(&path.display().to_string()));
		assert!(err.unwrap_err().to_string().contains("failed to parse config"));
	}

	#[test]
	fn test_default_state_path() {
		let dir = tempfile::tempdir().unwrap();
		let fs = rooted(dir.path());
		assert_eq!(
			fs.default_state_path(),
			Some(dir.path().join("data/payrate/state.json"))
		);
	}
}
