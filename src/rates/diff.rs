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

/// How far the parallel rate has drifted from the official one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Severity {
	Low,
	Medium,
	High,
}

impl Severity {
	pub fn label(&self) -> &'static str {
		match self {
			Severity::Low => "low",
			Severity::Medium => "medium",
			Severity::High => "high",
		}
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RateDiff {
	/// parallel - official, in local currency.
	pub difference: Quant,

	/// The difference as a percentage of the official rate; zero when the
	/// official rate is not positive.
	pub percent: Quant,

	pub severity: Severity,
}

impl RateDiff {
	pub fn between(official: Quant, parallel: Quant) -> Self {
		let difference = parallel - official;
		let percent = if official.is_positive() {
			difference / official * 100
		} else {
			Quant::zero()
		};

		let severity = if percent > 5 {
			Severity::High
		} else if percent > 1 {
			Severity::Medium
		} else {
			Severity::Low
		};

		Self {
			difference,
			percent,
			severity,
		}
	}
}
