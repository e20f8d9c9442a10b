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
use crate::pricing::analysis::{Analysis, Winner};
use crate::pricing::conversion::PriceInput;
use crate::reports::table::Table;
use crate::util::amount::{Amount, Currency};
/// Renders the price inputs and, once a comparison has run, its verdict.
pub struct PaymentReporter<'a> {
	state: &'a AppState,
}

impl<'a> PaymentReporter<'a> {
	pub fn new(state: &'a AppState) -> Self {
		Self { state }
	}

	pub fn render_prices(&self) -> String {
		let mut table = Table::new(3);
		table.add_header(vec!["Option", "Price", "Cost"]);
		table.add_separator();
		for (label, item) in [
			("Official rate", &self.state.official_item),
			("Blended rate", &self.state.blended_item),
		] {
			let (usd, local) = cells(item);
			table.add_row(vec![label, &usd, &local]);
		}
		table.right_align(vec![1, 2]);
		table.render()
	}

	/// None until a comparison has succeeded.
	pub fn render_results(&self) -> Option<String> {
		let analysis = self.state.analysis.as_ref()?;
		Some(render_analysis(analysis))
	}
}

fn cells(item: &PriceInput) -> (String, String) {
	let usd = item
		.usd
		.map(|u| Amount::usd(u).to_string())
		.unwrap_or_else(|| "-".to_string());
	let local = item
		.local
		.map(|l| Amount::local(l).to_string())
		.unwrap_or_else(|| "-".to_string());
	(usd, local)
}

fn render_analysis(analysis: &Analysis) -> String {
	let mut lines = vec![];

	let verdict = match analysis.winner {
		Winner::Official => "Pay in bolivars at the official rate",
		Winner::Blended => "Pay in dollars at the blended rate",
		Winner::Indifferent => "Either option",
	};
	lines.push(format!("Recommendation: {}", verdict));

	match &analysis.savings {
		Some(savings) => {
			lines.push(format!(
				"  Saves {} ({}), {}% less",
				Amount::local(savings.local),
				Amount::usd(savings.usd),
				savings.percent.to_fixed(2)
			));
		},
		None => lines.push(
			"  The totals differ by less than 0.01 Bs; both options cost the same."
				.to_string(),
		),
	}

	lines.push(format!(
		"  Official option: {} | Blended option: {}",
		Amount::local(analysis.official_total),
		Amount::local(analysis.blended_total)
	));
	lines.push(format!(
		"Paying in USDT: transfer {}, the cheaper total at the parallel rate.",
		Amount::new(analysis.usdt_equivalent, Currency::Usdt)
	));

	lines.join("\n") + "\n"
}
