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
use crate::controller::state::{AppState, Panel};
use crate::reports::payment_reporter::PaymentReporter;
use crate::reports::rate_reporter::RateReporter;

/// Where the calculator shows itself. The controller renders after every
/// state change and routes warnings here instead of failing.
pub trait Screen {
	fn render(&mut self, state: &AppState);
	fn warn(&mut self, message: &str);
	fn info(&mut self, message: &str);
}

/// Plain stdout rendering; one panel at a time.
pub struct TerminalScreen;

impl Screen for TerminalScreen {
	fn render(&mut self, state: &AppState) {
		let payments = PaymentReporter::new(state);
		println!();
		match (state.panel, payments.render_results()) {
			(Panel::Results, Some(results)) => print!("{}", results),
			_ => {
				print!("{}", RateReporter::new(state).render());
				println!();
				print!("{}", payments.render_prices());
			},
		}
	}

	fn warn(&mut self, message: &str) {
		println!("warning: {}", message);
	}

	fn info(&mut self, message: &str) {
		println!("{}", message);
	}
}
