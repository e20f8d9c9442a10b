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
use crate::rates::http::Client;
use crate::util::quant::Quant;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

/// Source tag of the government-published rate.
pub const OFFICIAL_TAG: &str = "oficial";
/// Source tag of the informal market rate.
pub const PARALLEL_TAG: &str = "paralelo";

/// One entry of the rate listing. Only the tag and the averaged value
/// matter; the listing carries other sources we ignore.
#[derive(Clone, Debug, Deserialize)]
pub struct RateRecord {
	#[serde(rename = "fuente")]
	pub source: String,

	#[serde(rename = "promedio", default)]
	pub average: Option<serde_json::Number>,

	#[serde(rename = "fechaActualizacion", default)]
	pub updated_at: Option<String>,
}

impl RateRecord {
	/// The averaged rate, if it is present and positive.
	pub fn average(&self) -> Option<Quant> {
		let average = self.average.as_ref()?;
		Quant::from_str(&average.to_string())
			.ok()
			.filter(|q| q.is_positive())
	}

	pub fn updated_at(&self) -> Option<DateTime<FixedOffset>> {
		self.updated_at
			.as_deref()
			.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
	}
}

/// Where rate listings come from.
#[async_trait]
pub trait RateSource: Send + Sync {
	async fn fetch(&self) -> Result<Vec<RateRecord>, anyhow::Error>;
}

/// The public dolarapi.com listing of bolivar rates.
pub struct DolarApi {
	client: Client,
}

impl DolarApi {
	pub fn new(url: &str) -> Self {
		Self {
			client: Client::new(url),
		}
	}
}

#[async_trait]
impl RateSource for DolarApi {
	async fn fetch(&self) -> Result<Vec<RateRecord>, anyhow::Error> {
		self.client.get(None).await
	}
}

/// Stands in for the network when running with --offline; every fetch
/// succeeds with nothing new, so rates stay as they were.
pub struct OfflineSource;

#[async_trait]
impl RateSource for OfflineSource {
	async fn fetch(&self) -> Result<Vec<RateRecord>, anyhow::Error> {
		Ok(Vec::new())
	}
}
