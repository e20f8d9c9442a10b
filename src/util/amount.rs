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
use std::fmt;

/// Currencies the calculator knows about. Prices are entered in dollars,
/// paid in the local currency, and optionally settled in USDT at the
/// parallel rate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Currency {
	Local,
	Usd,
	Usdt,
}

impl Currency {
	pub fn code(&self) -> &'static str {
		match self {
			Currency::Local => "Bs",
			Currency::Usd => "USD",
			Currency::Usdt => "USDT",
		}
	}
}

/// A quant value with a currency, rendered at cent precision.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Amount {
	pub currency: Currency,
	pub value: Quant,
}

impl Amount {
	pub fn new(value: Quant, currency: Currency) -> Self {
		Self { value, currency }
	}

	pub fn local(value: Quant) -> Self {
		Self::new(value, Currency::Local)
	}

	pub fn usd(value: Quant) -> Self {
		Self::new(value, Currency::Usd)
	}
}

impl fmt::Display for Amount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.currency {
			Currency::Usd => write!(f, "$ {}", self.value.to_grouped(2)),
			_ => write!(f, "{} {}", self.value.to_grouped(2), self.currency.code()),
		}
	}
}
