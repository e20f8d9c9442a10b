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
use crate::pricing::conversion::PricedItem;
use crate::util::quant::Quant;
use anyhow::{bail, Error};
use regex::Regex;

/// One line of interactive input, already validated.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
	SetRate(RateField, Option<Quant>),
	/// Drops a manual blended rate so it follows the formula again.
	AutoBlend,
	SetPrice(PricedItem, Option<Quant>),
	Calculate,
	Edit,
	Reset,
	Refresh,
	Help,
	Quit,
}

pub const HELP: &str = "\
commands:
  rate official|parallel <n>   edit a source rate
  rate blended <n>             pin the blended rate by hand
  rate auto                    let the blended rate follow the formula again
  price official|blended [<n>] set a dollar price, or clear it
  calc                         compare both options
  edit                         back to the inputs
  reset                        clear prices and reload rates
  refresh                      reload rates
  help, quit";

pub struct CommandParser {
	command_regex: Regex,
	number_regex: Regex,
}

impl CommandParser {
	pub fn new() -> Self {
		Self {
			command_regex: Regex::new(
				r"^\s*(?P<verb>[A-Za-z]+)(?:\s+(?P<target>[A-Za-z]+))?(?:\s+(?P<value>\S+))?\s*$",
			)
			.unwrap(),
			number_regex: Regex::new(r"^\s*(?P<sign>[+-]?)(?P<int>\d*)(?:\.(?P<frac>\d*))?")
				.unwrap(),
		}
	}

	/// Reads the leading number out of free-form field text and ignores
	/// whatever follows, so `36.5 Bs` is 36.5. Blank or non-numeric text
	/// yields None, as do numbers `Quant` cannot hold.
	pub fn number(&self, text: &str) -> Option<Quant> {
		let caps = self.number_regex.captures(text)?;
		let int = caps.name("int").map_or("", |m| m.as_str());
		let frac = caps.name("frac").map_or("", |m| m.as_str());
		if int.is_empty() && frac.is_empty() {
			return None;
		}

		let sign = if &caps["sign"] == "-" { "-" } else { "" };
		let int = if int.is_empty() { "0" } else { int };
		let normalized = if frac.is_empty() {
			format!("{}{}", sign, int)
		} else {
			format!("{}{}.{}", sign, int, frac)
		};

		Quant::from_str(&normalized).ok()
	}

	pub fn command(&self, line: &str) -> Result<Command, Error> {
		let Some(caps) = self.command_regex.captures(line) else {
			bail!("unrecognized input: {}", line.trim());
		};

		let verb = caps["verb"].to_ascii_lowercase();
		let target = caps.name("target").map(|m| m.as_str().to_ascii_lowercase());
		let value = caps.name("value").map(|m| m.as_str());

		let command = match (verb.as_str(), target.as_deref()) {
			("rate", Some("auto")) => Command::AutoBlend,
			("rate", Some(field)) => {
				let field = match field {
					"official" => RateField::Official,
					"parallel" => RateField::Parallel,
					"blended" => RateField::Blended,
					_ => bail!("unknown rate: {}", field),
				};
				let Some(value) = value else {
					bail!("rate needs a value");
				};
				Command::SetRate(field, self.number(value))
			},
			("price", Some(item)) => {
				let item = match item {
					"official" => PricedItem::Official,
					"blended" => PricedItem::Blended,
					_ => bail!("unknown price: {}", item),
				};
				Command::SetPrice(item, value.and_then(|v| self.number(v)))
			},
			("calc", None) => Command::Calculate,
			("edit", None) => Command::Edit,
			("reset", None) => Command::Reset,
			("refresh", None) => Command::Refresh,
			("help", None) => Command::Help,
			("quit" | "exit", None) => Command::Quit,
			_ => bail!("unrecognized command: {}", line.trim()),
		};

		Ok(command)
	}
}
