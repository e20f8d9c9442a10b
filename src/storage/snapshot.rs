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
use anyhow::{anyhow, Error};
use serde_json::{json, Map, Value};

/// The inputs worth keeping between sessions. Local-currency amounts are
/// not stored; they are derived again on load.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PersistedSnapshot {
	pub official_rate: Quant,
	pub parallel_rate: Quant,
	pub blended_rate: Quant,
	pub official_usd_amount: Quant,
	pub blended_usd_amount: Quant,
	pub manual_blend_override: bool,
}

impl PersistedSnapshot {
	/// Amounts are stored as JSON numbers already rounded to the cent, so
	/// reading them back never rounds a second time.
	pub fn to_json(&self) -> Result<String, Error> {
		let value = json!({
			"officialRate": self.official_rate.rounded(2).to_f64(),
			"parallelRate": self.parallel_rate.rounded(2).to_f64(),
			"blendedRate": self.blended_rate.rounded(2).to_f64(),
			"officialUsdAmount": self.official_usd_amount.rounded(2).to_f64(),
			"blendedUsdAmount": self.blended_usd_amount.rounded(2).to_f64(),
			"manualBlendOverride": self.manual_blend_override,
		});
		Ok(serde_json::to_string(&value)?)
	}

	/// Parses stored state. Text that is not a JSON object is an error;
	/// inside the object, a missing or mistyped field falls back to zero or
	/// false instead.
	pub fn from_json(text: &str) -> Result<Self, Error> {
		let value: Value = serde_json::from_str(text)?;
		let object = value
			.as_object()
			.ok_or_else(|| anyhow!("saved state is not a JSON object"))?;

		Ok(Self {
			official_rate: number(object, "officialRate"),
			parallel_rate: number(object, "parallelRate"),
			blended_rate: number(object, "blendedRate"),
			official_usd_amount: number(object, "officialUsdAmount"),
			blended_usd_amount: number(object, "blendedUsdAmount"),
			manual_blend_override: object
				.get("manualBlendOverride")
				.and_then(Value::as_bool)
				.unwrap_or(false),
		})
	}
}

fn number(object: &Map<String, Value>, key: &str) -> Quant {
	object
		.get(key)
		.and_then(Value::as_f64)
		.map(Quant::from_f64)
		.unwrap_or_else(Quant::zero)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn q(s: &str) -> Quant {
		Quant::from_str(s).unwrap()
	}

	#[test]
	fn test_round_trip() {
		let snapshot = PersistedSnapshot {
			official_rate: q("36.50"),
			parallel_rate: q("41.00"),
			blended_rate: q("42.63"),
			official_usd_amount: q("100"),
			blended_usd_amount: q("89.99"),
			manual_blend_override: true,
		};

		let text = snapshot.to_json().unwrap();
		assert_eq!(PersistedSnapshot::from_json(&text).unwrap(), snapshot);
	}

	#[test]
	fn test_half_cents_round_away_before_storing() {
		let snapshot = PersistedSnapshot {
			official_rate: q("36.125"),
			blended_rate: q("40.125"),
			official_usd_amount: q("0.005"),
			..Default::default()
		};

		let text = snapshot.to_json().unwrap();
		let restored = PersistedSnapshot::from_json(&text).unwrap();
		assert_eq!(restored.official_rate, q("36.13"));
		assert_eq!(restored.blended_rate, q("40.13"));
		assert_eq!(restored.official_usd_amount, q("0.01"));
	}

	#[test]
	fn test_field_names() {
		let text = PersistedSnapshot::default().to_json().unwrap();
		let value: Value = serde_json::from_str(&text).unwrap();
		for key in [
			"officialRate",
			"parallelRate",
			"blendedRate",
			"officialUsdAmount",
			"blendedUsdAmount",
			"manualBlendOverride",
		] {
			assert!(value.get(key).is_some(), "missing {}", key);
		}
	}

	#[test]
	fn test_missing_and_malformed_fields_default() {
		let snapshot = PersistedSnapshot::from_json(
			r#"{"officialRate": "lots", "parallelRate": 41, "manualBlendOverride": "yes"}"#,
		)
		.unwrap();

		assert_eq!(snapshot.official_rate, Quant::zero());
		assert_eq!(snapshot.parallel_rate, q("41"));
		assert_eq!(snapshot.blended_usd_amount, Quant::zero());
		assert!(!snapshot.manual_blend_override);
	}

	#[test]
	fn test_unreadable_state_is_an_error() {
		assert!(PersistedSnapshot::from_json("{not json").is_err());
		assert!(PersistedSnapshot::from_json("[1, 2]").is_err());
		assert!(PersistedSnapshot::from_json("null").is_err());
	}
}
