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
use crate::error::AppError;
use crate::rates::retry::{with_retry, Backoff};
use crate::rates::source::{RateRecord, RateSource, OFFICIAL_TAG, PARALLEL_TAG};
use crate::util::quant::Quant;
use chrono::{DateTime, FixedOffset};
use tracing::{info, warn};

/// What one successful fetch learned. A rate is None when its record was
/// missing or unusable, in which case the caller keeps its current value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FetchedRates {
	pub official: Option<Quant>,
	pub parallel: Option<Quant>,
	pub updated_at: Option<DateTime<FixedOffset>>,
}

impl FetchedRates {
	pub fn from_records(records: &[RateRecord]) -> Self {
		let official = records.iter().find(|r| r.source == OFFICIAL_TAG);
		let parallel = records.iter().find(|r| r.source == PARALLEL_TAG);

		let updated_at = [official, parallel]
			.into_iter()
			.flatten()
			.filter_map(|r| r.updated_at())
			.max();

		Self {
			official: official.and_then(|r| r.average()),
			parallel: parallel.and_then(|r| r.average()),
			updated_at,
		}
	}
}

pub struct RateFetcher {
	source: Box<dyn RateSource>,
	backoff: Backoff,
}

impl RateFetcher {
	pub fn new(source: Box<dyn RateSource>, backoff: Backoff) -> Self {
		Self { source, backoff }
	}

	/// Fetches the listing inside the retry envelope. Exhausting it is
	/// reported as a network failure; the caller falls back to whatever
	/// rates it already has.
	pub async fn fetch(&self) -> Result<FetchedRates, AppError> {
		let records = with_retry(&self.backoff, move || self.source.fetch())
			.await
			.map_err(|source| AppError::Network {
				attempts: self.backoff.attempts,
				source,
			});

		match records {
			Ok(records) => {
				let rates = FetchedRates::from_records(&records);
				info!(
					official = ?rates.official.map(|q| q.to_string()),
					parallel = ?rates.parallel.map(|q| q.to_string()),
					"fetched rates"
				);
				Ok(rates)
			},
			Err(e) => {
				warn!(error = %e, "keeping last known rates");
				Err(e)
			},
		}
	}
}
