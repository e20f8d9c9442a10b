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
use crate::util::quant::Quant;

/// Premium applied on top of the average of the two source rates, in
/// percent. The blended rate is what sellers who price in dollars tend to
/// charge when paid in bolivars.
pub const BLEND_PREMIUM_PERCENT: i128 = 10;

/// The three rates the calculator works with.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RateState {
	pub official: Quant,
	pub parallel: Quant,
	pub blended: Quant,

	/// Set when the user typed the blended rate themselves; the formula
	/// stays out of the way until this is cleared.
	pub manual_blend_override: bool,
}

impl RateState {
	/// Recomputes the blended rate from the two source rates unless it is
	/// pinned by hand and `force` is false. Returns whether it ran.
	pub fn recalculate_blended(&mut self, force: bool) -> bool {
		if self.manual_blend_override && !force {
			return false;
		}

		self.blended = blended_rate(self.official, self.parallel);
		true
	}

	/// Pins the blended rate to a user-supplied value.
	pub fn set_manual_blend(&mut self, rate: Quant) {
		self.manual_blend_override = true;
		self.blended = rate;
	}

	pub fn clear_manual_blend(&mut self) {
		self.manual_blend_override = false;
		self.recalculate_blended(true);
	}
}

/// round2(((official + parallel) / 2) * (1 + premium)), with exact halves
/// rounding up.
pub fn blended_rate(official: Quant, parallel: Quant) -> Quant {
	let average = (official + parallel) / 2;
	let premium = Quant::from_frac(100 + BLEND_PREMIUM_PERCENT, 100);
	(average * premium).rounded(2)
}
