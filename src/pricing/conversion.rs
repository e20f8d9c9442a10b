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
use crate::rates::rate_state::RateState;
use crate::util::quant::Quant;

/// The two ways of paying for the same purchase.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PricedItem {
	/// Priced in dollars, paid in bolivars at the official rate.
	Official,
	/// Priced in dollars, paid in bolivars at the blended rate.
	Blended,
}

/// A dollar price and what it costs in local currency. `usd` is what the
/// user edits; `local` is derived from it and blank when `usd` is.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PriceInput {
	pub usd: Option<Quant>,
	pub local: Option<Quant>,
}

/// usd * rate to the cent, or blank when there is no positive price.
pub fn convert(usd: Option<Quant>, rate: Quant) -> Option<Quant> {
	usd.filter(|u| u.is_positive()).map(|u| (u * rate).rounded(2))
}

/// Derives both local amounts from their dollar prices. When either rate is
/// not positive nothing is touched and false is returned.
pub fn update_conversions(
	rates: &RateState,
	official: &mut PriceInput,
	blended: &mut PriceInput,
) -> bool {
	if !rates.official.is_positive() || !rates.blended.is_positive() {
		return false;
	}

	official.local = convert(official.usd, rates.official);
	blended.local = convert(blended.usd, rates.blended);
	true
}
