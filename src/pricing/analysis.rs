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
use crate::error::ValidationError;
use crate::pricing::conversion::PriceInput;
use crate::rates::rate_state::RateState;
use crate::util::quant::Quant;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Winner {
	Official,
	Blended,
	/// Both options cost the same to the cent.
	Indifferent,
}

/// How much the cheaper option saves over the other one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Savings {
	pub local: Quant,

	/// `local` converted back to dollars at the winning option's rate.
	pub usd: Quant,

	/// `local` as a share of the more expensive total.
	pub percent: Quant,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Analysis {
	pub winner: Winner,

	/// None when the options tie.
	pub savings: Option<Savings>,

	pub official_total: Quant,
	pub blended_total: Quant,

	/// The cheaper total expressed in USDT. Settling in USDT always goes
	/// through the parallel rate, whichever option wins.
	pub usdt_equivalent: Quant,
}

/// Compares both local-currency totals. Needs both totals and the parallel
/// rate to be positive.
pub fn analyze(
	rates: &RateState,
	official: &PriceInput,
	blended: &PriceInput,
) -> Result<Analysis, ValidationError> {
	let official_total = official
		.local
		.filter(|t| t.is_positive())
		.ok_or(ValidationError::MissingOfficialTotal)?;
	let blended_total = blended
		.local
		.filter(|t| t.is_positive())
		.ok_or(ValidationError::MissingBlendedTotal)?;
	if !rates.parallel.is_positive() {
		return Err(ValidationError::MissingParallelRate);
	}

	let min_cost = official_total.min(blended_total);
	let max_cost = official_total.max(blended_total);
	let usdt_equivalent = min_cost / rates.parallel;

	let diff = (official_total - blended_total).abs();
	let percent = if max_cost.is_positive() {
		diff / max_cost * 100
	} else {
		Quant::zero()
	};

	let (winner, basis) = if official_total < blended_total {
		(Winner::Official, rates.official)
	} else if blended_total < official_total {
		(Winner::Blended, rates.blended)
	} else {
		(Winner::Indifferent, Quant::zero())
	};

	let savings = if diff.is_zero() {
		None
	} else {
		Some(Savings {
			local: diff,
			usd: if basis.is_positive() {
				diff / basis
			} else {
				Quant::zero()
			},
			percent,
		})
	};

	Ok(Analysis {
		winner,
		savings,
		official_total,
		blended_total,
		usdt_equivalent,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn q(s: &str) -> Quant {
		Quant::from_str(s).unwrap()
	}

	fn rates() -> RateState {
		RateState {
			official: q("36.50"),
			parallel: q("41.00"),
			blended: q("42.63"),
			manual_blend_override: false,
		}
	}

	fn total(local: &str) -> PriceInput {
		PriceInput {
			usd: None,
			local: Some(q(local)),
		}
	}

	#[test]
	fn test_official_wins() {
		let analysis =
			analyze(&rates(), &total("3650.00"), &total("3836.70")).unwrap();

		assert_eq!(analysis.winner, Winner::Official);
		let savings = analysis.savings.unwrap();
		assert_eq!(savings.local, q("186.70"));
		assert_eq!(savings.percent.to_fixed(2), "4.87");
		assert_eq!(savings.usd.to_fixed(2), "5.12");
		assert_eq!(analysis.usdt_equivalent.to_fixed(2), "89.02");
		assert_eq!(analysis.official_total, q("3650"));
		assert_eq!(analysis.blended_total, q("3836.7"));
	}

	#[test]
	fn test_blended_wins_uses_blended_basis() {
		let analysis =
			analyze(&rates(), &total("4000"), &total("3836.70")).unwrap();

		assert_eq!(analysis.winner, Winner::Blended);
		let savings = analysis.savings.unwrap();
		assert_eq!(savings.local, q("163.30"));
		assert_eq!(savings.usd, q("163.30") / q("42.63"));
		assert_eq!(savings.percent.to_fixed(2), "4.08");
		assert_eq!(analysis.usdt_equivalent, q("3836.70") / q("41"));
	}

	#[test]
	fn test_tie_is_indifferent() {
		let analysis = analyze(&rates(), &total("100"), &total("100.00")).unwrap();
		assert_eq!(analysis.winner, Winner::Indifferent);
		assert_eq!(analysis.savings, None);
	}

	#[test]
	fn test_validation() {
		let blank = PriceInput::default();
		assert_eq!(
			analyze(&rates(), &blank, &total("1")),
			Err(ValidationError::MissingOfficialTotal)
		);
		assert_eq!(
			analyze(&rates(), &total("1"), &total("0")),
			Err(ValidationError::MissingBlendedTotal)
		);

		let mut no_parallel = rates();
		no_parallel.parallel = Quant::zero();
		assert_eq!(
			analyze(&no_parallel, &total("1"), &total("2")),
			Err(ValidationError::MissingParallelRate)
		);
	}
}
