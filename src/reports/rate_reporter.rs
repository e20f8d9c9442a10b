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
use crate::controller::state::AppState;
use crate::rates::rate_state::BLEND_PREMIUM_PERCENT;
use crate::reports::table::Table;
use crate::util::amount::Amount;

/// Renders the rates panel: both source rates, the spread between them, and
/// the blended rate.
pub struct RateReporter<'a> {
	state: &'a AppState,
}

impl<'a> RateReporter<'a> {
	pub fn new(state: &'a AppState) -> Self {
		Self { state }
	}

	pub fn render(&self) -> String {
		let rates = &self.state.rates;
		let diff = self.state.diff();

		let title = if self.state.loading {
			"Rates (updating...)".to_string()
		} else if let Some(updated_at) = self.state.rates_updated_at {
			format!("Rates (published {})", updated_at.format("%Y-%m-%d %H:%M"))
		} else {
			"Rates".to_string()
		};

		let official = Amount::local(rates.official).to_string();
		let parallel = Amount::local(rates.parallel).to_string();
		let difference = Amount::local(diff.difference).to_string();
		let spread = format!(
			"{}% ({})",
			diff.percent.to_fixed(2),
			diff.severity.label()
		);
		let blended = Amount::local(rates.blended).to_string();
		let blended_note = if rates.manual_blend_override {
			"set by hand".to_string()
		} else {
			format!("average +{}%", BLEND_PREMIUM_PERCENT)
		};

		let mut table = Table::new(3);
		table.add_row(vec!["Official", &official, ""]);
		table.add_row(vec!["Parallel", &parallel, ""]);
		table.add_row(vec!["Difference", &difference, &spread]);
		table.add_row(vec!["Blended", &blended, &blended_note]);
		table.right_align(vec![1]);

		format!("{}\n{}", title, table.render())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::util::quant::Quant;

	fn q(s: &str) -> Quant {
		Quant::from_str(s).unwrap()
	}

	fn state() -> AppState {
		let mut state = AppState::default();
		state.rates.official = q("36.50");
		state.rates.parallel = q("41.00");
		state.rates.blended = q("42.63");
		state
	}

	#[test]
	fn test_render() {
		let rendered = RateReporter::new(&state()).render();
		let lines: Vec<&str> = rendered.lines().collect();

		assert_eq!(lines[0], "Rates");
		assert_eq!(lines[1], "Official     36.50 Bs");
		assert_eq!(lines[3], "Difference    4.50 Bs   12.33% (high)");
		assert_eq!(lines[4], "Blended      42.63 Bs   average +10%");
	}

	#[test]
	fn test_loading_and_manual_notes() {
		let mut state = state();
		state.loading = true;
		state.rates.manual_blend_override = true;

		let rendered = RateReporter::new(&state).render();
		assert!(rendered.starts_with("Rates (updating...)"));
		assert!(rendered.contains("set by hand"));
	}

	#[test]
	fn test_published_time() {
		let mut state = state();
		state.rates_updated_at =
			chrono::DateTime::parse_from_rfc3339("2024-05-02T13:30:00-04:00").ok();

		let rendered = RateReporter::new(&state).render();
		assert!(rendered.starts_with("Rates (published 2024-05-02 13:30)"));
	}
}
