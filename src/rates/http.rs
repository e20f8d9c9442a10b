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
use anyhow::bail;
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;

pub struct Client {
	client: reqwest::Client,
	base_url: String,
}

impl Client {
	pub fn new(base_url: &str) -> Self {
		Client {
			client: reqwest::Client::new(),
			base_url: base_url.trim_end_matches('/').to_string(),
		}
	}

	/// Sends a GET and decodes the JSON body. Errors on non-2xx response
	/// codes and on bodies that do not decode as R.
	pub async fn get<R>(&self, endpoint: Option<&str>) -> Result<R, anyhow::Error>
	where
		R: for<'de> Deserialize<'de>,
	{
		let url = match endpoint {
			Some(endpoint) => format!("{}/{}", self.base_url, endpoint),
			None => self.base_url.clone(),
		};

		debug!(%url, "sending GET");
		let response = self.client.request(Method::GET, &url).send().await?;

		if !response.status().is_success() {
			bail!("Request failed with status: {}", response.status());
		}

		let response_data: R = response.json().await?;
		Ok(response_data)
	}
}
