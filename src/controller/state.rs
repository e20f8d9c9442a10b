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
use crate::pricing::analysis::Analysis;
use crate::pricing::conversion::{PriceInput, PricedItem};
use crate::rates::diff::RateDiff;
use crate::rates::rate_state::RateState;
use crate::storage::snapshot::PersistedSnapshot;
use crate::util::quant::Quant;
use chrono::{DateTime, FixedOffset};

/// Which of the editable rates a command refers to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RateField {
	Official,
	Parallel,
	Blended,
}

/// The two mutually exclusive screens.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Panel {
	#[default]
	Inputs,
	Results,
}

/// Everything the calculator knows. Only `controller::update` mutates it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
	pub rates: RateState,
	pub official_item: PriceInput,
	pub blended_item: PriceInput,
	pub panel: Panel,

	/// A rate fetch is in flight.
	pub loading: bool,

	/// When the rate source last published, as it reports it.
	pub rates_updated_at: Option<DateTime<FixedOffset>>,

	/// The last successful comparison; cleared by reset.
	pub analysis: Option<Analysis>,
}

impl AppState {
	pub fn item_mut(&mut self, item: PricedItem) -> &mut PriceInput {
		match item {
			PricedItem::Official => &mut self.official_item,
			PricedItem::Blended => &mut self.blended_item,
		}
	}

	pub fn diff(&self) -> RateDiff {
		RateDiff::between(self.rates.official, self.rates.parallel)
	}

	pub fn snapshot(&self) -> PersistedSnapshot {
		PersistedSnapshot {
			official_rate: self.rates.official,
			parallel_rate: self.rates.parallel,
			blended_rate: self.rates.blended,
			official_usd_amount: self.official_item.usd.unwrap_or_else(Quant::zero),
			blended_usd_amount: self.blended_item.usd.unwrap_or_else(Quant::zero),
			manual_blend_override: self.rates.manual_blend_override,
		}
	}

	/// Fills the editable fields from saved state. Prices that are not
	/// positive come back blank; derived fields are left to the caller.
	pub fn apply_snapshot(&mut self, snapshot: &PersistedSnapshot) {
		self.rates = RateState {
			official: snapshot.official_rate.rounded(2),
			parallel: snapshot.parallel_rate.rounded(2),
			blended: snapshot.blended_rate.rounded(2),
			manual_blend_override: snapshot.manual_blend_override,
		};

		for (item, usd) in [
			(PricedItem::Official, snapshot.official_usd_amount),
			(PricedItem::Blended, snapshot.blended_usd_amount),
		] {
			self.item_mut(item).usd =
				Some(usd).filter(|u| u.is_positive()).map(|u| u.rounded(2));
		}
	}
}
