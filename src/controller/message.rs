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
use crate::controller::state::RateField;
use crate::error::{AppError, ValidationError};
use crate::parsing::command::Command;
use crate::pricing::conversion::PricedItem;
use crate::rates::fetcher::FetchedRates;
use crate::storage::snapshot::PersistedSnapshot;
use crate::util::quant::Quant;

/// Everything that can happen to the calculator: user commands and the
/// completion of background work.
#[derive(Debug)]
pub enum Message {
	/// Saved state read at startup, if any.
	Restore(Option<PersistedSnapshot>),

	/// None means the field was left blank or is not a number.
	SetRate(RateField, Option<Quant>),
	AutoBlend,
	SetPrice(PricedItem, Option<Quant>),

	Calculate,
	Edit,
	Reset,
	Refresh,

	RatesFetched {
		outcome: Result<FetchedRates, AppError>,
		force: bool,
	},
}

impl Message {
	/// The message a command sends, if it sends one at all.
	pub fn from_command(command: Command) -> Option<Self> {
		let message = match command {
			Command::SetRate(field, value) => Message::SetRate(field, value),
			Command::AutoBlend => Message::AutoBlend,
			Command::SetPrice(item, value) => Message::SetPrice(item, value),
			Command::Calculate => Message::Calculate,
			Command::Edit => Message::Edit,
			Command::Reset => Message::Reset,
			Command::Refresh => Message::Refresh,
			Command::Help | Command::Quit => return None,
		};
		Some(message)
	}
}

/// Side effects requested by a state transition, carried out by the
/// runtime in the order given.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Effect {
	/// Schedule a debounced save of the current snapshot.
	Persist,
	/// Fetch rates; `force` recomputes the blended rate even if pinned.
	Fetch { force: bool },
	Warn(ValidationError),
}
