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
use anyhow::{anyhow, bail, Error};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A rational number backed by a fraction of u128s. Every rate and price in
/// the calculator is one of these, so the arithmetic behind a comparison is
/// exact and only rounding, which is always explicit, loses information.
///
/// Automatically simplifies its underlying fractional representation.
#[derive(Clone, Copy, Debug)]
pub struct Quant {
	numerator: u128,
	denominator: u128,

	/// Is always false if the numerator is zero, else is intuitive.
	is_negative: bool,

	/// How many decimal places to render when asked to print. Digits beyond
	/// this are truncated, so callers that want rounding go through
	/// `to_fixed` or `round_half_away` first.
	///
	/// Has no effect on the underlying fraction.
	render_precision: u32,
}

impl Quant {
	/// Most fraction digits `from_str` accepts.
	pub const MAX_DECIMALS: u32 = 18;

	/// Places kept when the exact result of an operation would not fit.
	const APPROXIMATE_DECIMALS: u32 = 9;

	pub fn zero() -> Self {
		Self {
			numerator: 0,
			denominator: 1,
			render_precision: 0,
			is_negative: false,
		}
	}

	pub fn from_frac(numerator: i128, denominator: i128) -> Self {
		if denominator == 0 {
			panic!("Denominator cannot be zero");
		}

		let mut out = Self {
			numerator: numerator.unsigned_abs(),
			denominator: denominator.unsigned_abs(),
			render_precision: 0,
			is_negative: (numerator < 0) ^ (denominator < 0),
		};

		out.reduce();
		out
	}

	pub fn from_i128(amount: i128) -> Self {
		Self {
			numerator: amount.unsigned_abs(),
			denominator: 1,
			render_precision: 0,
			is_negative: amount < 0,
		}
	}

	/// Parses a plain decimal such as `36.50` or `-4`. Exponents, grouping
	/// separators, surrounding text, more than `MAX_DECIMALS` fraction digits
	/// and values too large to hold are rejected; see
	/// `parsing::command::CommandParser::number` for lenient field input.
	pub fn from_str(input: &str) -> Result<Self, Error> {
		let is_negative = input.starts_with('-');
		let sanitized = input.trim_start_matches('-');

		let parts: Vec<&str> = sanitized.split('.').collect();
		let mut precision = 0u32;

		let (numerator, denominator) = match parts.len() {
			1 => (parts[0].parse::<u128>()?, 1),
			2 => {
				let whole = parts[0].parse::<u128>()?;
				let decimal = parts[1];
				if decimal.len() > Self::MAX_DECIMALS as usize {
					bail!("Too many decimal places: {}", input);
				}
				precision = decimal.len() as u32;
				let scale = 10u128.pow(precision);
				let fractional = decimal.parse::<u128>()?;
				let numerator = whole
					.checked_mul(scale)
					.and_then(|n| n.checked_add(fractional))
					.ok_or_else(|| anyhow!("Number too large: {}", input))?;
				(numerator, scale)
			},
			_ => bail!("Invalid decimal format: {}", input),
		};

		let mut out = Self {
			numerator,
			denominator,
			render_precision: precision,
			is_negative: is_negative && numerator > 0,
		};
		out.reduce();
		Ok(out)
	}

	/// Converts a float read from persisted JSON. Values are stored with two
	/// decimals of meaning, so the float is snapped to two places first;
	/// non-finite input becomes zero.
	pub fn from_f64(value: f64) -> Self {
		if !value.is_finite() {
			return Self::zero();
		}
		Self::from_str(&format!("{:.2}", value)).unwrap_or_else(|_| Self::zero())
	}

	pub fn to_f64(&self) -> f64 {
		let value = self.numerator as f64 / self.denominator as f64;
		if self.is_negative {
			-value
		} else {
			value
		}
	}

	/// Modifies the underlying fraction to the nearest value with the given
	/// number of decimal places. Exact halves round away from zero, so
	/// 42.625 becomes 42.63 and -42.625 becomes -42.63.
	///
	/// Returns the rounding error such that rounded + error == original.
	pub fn round_half_away(&mut self, decimal_places: u32) -> Self {
		self.reduce();

		let initial = *self;

		let scale = 10u128.pow(decimal_places);
		let mut remainder = self.numerator % self.denominator;
		let mut fraction = 0u128;
		for _ in 0..decimal_places {
			let (digit, rest) = Self::next_digit(remainder, self.denominator);
			fraction = fraction * 10 + u128::from(digit);
			remainder = rest;
		}

		let mut rounded_quotient = (self.numerator / self.denominator)
			.saturating_mul(scale)
			.saturating_add(fraction);
		if remainder >= self.denominator - remainder {
			rounded_quotient = rounded_quotient.saturating_add(1);
		}

		self.numerator = rounded_quotient;
		self.denominator = scale;
		self.render_precision = decimal_places;
		self.is_negative = self.is_negative && rounded_quotient > 0;

		self.reduce();
		initial - *self
	}

	/// A rounded copy that renders exactly `decimal_places` digits.
	pub fn rounded(&self, decimal_places: u32) -> Self {
		let mut out = *self;
		out.round_half_away(decimal_places);
		out
	}

	/// Renders with exactly the given number of decimals, rounding half away
	/// from zero.
	pub fn to_fixed(&self, decimal_places: u32) -> String {
		self.rounded(decimal_places).to_string()
	}

	/// Like `to_fixed`, with the integer digits grouped in threes.
	pub fn to_grouped(&self, decimal_places: u32) -> String {
		let plain = self.rounded(decimal_places).abs().to_string();
		let (int_part, fraction) = match plain.split_once('.') {
			Some((i, f)) => (i.to_string(), Some(f.to_string())),
			None => (plain, None),
		};

		let mut int_str = int_part;
		let mut i = int_str.len() as isize - 3;
		while i > 0 {
			int_str.insert(i as usize, ',');
			i -= 3;
		}

		let sign = if self.rounded(decimal_places).is_negative {
			"-"
		} else {
			""
		};
		match fraction {
			Some(f) => format!("{}{}.{}", sign, int_str, f),
			None => format!("{}{}", sign, int_str),
		}
	}

	pub fn is_zero(&self) -> bool {
		self.numerator == 0
	}

	pub fn is_positive(&self) -> bool {
		self.numerator > 0 && !self.is_negative
	}

	pub fn abs(&self) -> Self {
		Self {
			is_negative: false,
			..*self
		}
	}

	/// Reduces the underlying fraction as much as possible while still
	/// representing the same value. Called after every operation that
	/// affects the fraction, to guard against overflow.
	fn reduce(&mut self) {
		let gcd = Self::gcd(self.numerator, self.denominator);
		self.numerator /= gcd;
		self.denominator /= gcd;
	}

	/// Implementation of Euclid's algorithm for greatest common divisor
	fn gcd(mut a: u128, mut b: u128) -> u128 {
		while b != 0 {
			let temp = b;
			b = a % b;
			a = temp;
		}
		a
	}

	/// Long division step: the next decimal digit of remainder/denominator
	/// and the remainder after it, without forming remainder * 10.
	fn next_digit(remainder: u128, denominator: u128) -> (u8, u128) {
		let mut digit = 0;
		let mut acc = 0u128;
		for _ in 0..10 {
			let room = denominator - acc;
			if remainder >= room {
				acc = remainder - room;
				digit += 1;
			} else {
				acc += remainder;
			}
		}
		(digit, acc)
	}

	/// Nearest value with `APPROXIMATE_DECIMALS` places, or whole units when
	/// that does not fit. Magnitudes beyond u128 saturate.
	fn approximate(value: f64, render_precision: u32) -> Self {
		let mut scale = 10u128.pow(Self::APPROXIMATE_DECIMALS);
		if value.abs() * scale as f64 >= u128::MAX as f64 {
			scale = 1;
		}
		let numerator = (value.abs() * scale as f64).round() as u128;
		let mut out = Self {
			numerator,
			denominator: scale,
			render_precision,
			is_negative: value < 0.0 && numerator > 0,
		};
		out.reduce();
		out
	}

	fn checked_add(self, rhs: Self) -> Option<Self> {
		let gcd = Self::gcd(self.denominator, rhs.denominator);
		let lcm = (self.denominator / gcd).checked_mul(rhs.denominator)?;

		let term_a = self.numerator.checked_mul(lcm / self.denominator)?;
		let term_b = rhs.numerator.checked_mul(lcm / rhs.denominator)?;

		let (numerator, result_is_negative) =
			match (self.is_negative, rhs.is_negative) {
				(true, true) => (term_a.checked_add(term_b)?, true),
				(false, false) => (term_a.checked_add(term_b)?, false),
				(true, false) => {
					if term_a > term_b {
						(term_a - term_b, true)
					} else {
						(term_b - term_a, false)
					}
				},
				(false, true) => {
					if term_a > term_b {
						(term_a - term_b, false)
					} else {
						(term_b - term_a, true)
					}
				},
			};

		let mut out = Self {
			numerator,
			denominator: lcm,
			render_precision: self.render_precision.max(rhs.render_precision),
			is_negative: result_is_negative && numerator > 0,
		};
		out.reduce();
		Some(out)
	}

	fn checked_mul(self, rhs: Self) -> Option<Self> {
		// cross-reduce first to keep the products small
		let gcd_self = Self::gcd(self.numerator, rhs.denominator);
		let gcd_rhs = Self::gcd(rhs.numerator, self.denominator);

		let numerator =
			(self.numerator / gcd_self).checked_mul(rhs.numerator / gcd_rhs)?;
		let denominator = (self.denominator / gcd_rhs)
			.checked_mul(rhs.denominator / gcd_self)?;

		let mut out = Self {
			numerator,
			denominator,
			is_negative: numerator > 0 && (self.is_negative ^ rhs.is_negative),
			render_precision: self.render_precision.max(rhs.render_precision),
		};
		out.reduce();
		Some(out)
	}

	/// Compares a/b with c/d one continued-fraction term at a time, so no
	/// products are formed.
	fn cmp_fractions(
		mut a: u128,
		mut b: u128,
		mut c: u128,
		mut d: u128,
	) -> Ordering {
		let mut flipped = false;
		loop {
			let ordering = match (a / b).cmp(&(c / d)) {
				Ordering::Equal => match (a % b, c % d) {
					(0, 0) => Ordering::Equal,
					(0, _) => Ordering::Less,
					(_, 0) => Ordering::Greater,
					(r, s) => {
						// r/b < s/d exactly when b/r > d/s
						(a, b, c, d) = (b, r, d, s);
						flipped = !flipped;
						continue;
					},
				},
				unequal => unequal,
			};
			return if flipped { ordering.reverse() } else { ordering };
		}
	}

	fn recip(&self) -> Self {
		Self {
			numerator: self.denominator,
			denominator: self.numerator,
			..*self
		}
	}
}

impl Default for Quant {
	fn default() -> Self {
		Self::zero()
	}
}

impl fmt::Display for Quant {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let integer_part = self.numerator / self.denominator;

		let mut fraction_str = String::new();
		let mut remainder = self.numerator % self.denominator;
		let precision = f.precision().unwrap_or(self.render_precision as usize);
		for _ in 0..precision {
			let (digit, rest) = Self::next_digit(remainder, self.denominator);
			remainder = rest;
			fraction_str.push(char::from(b'0' + digit));
			if remainder == 0 {
				break;
			}
		}

		while fraction_str.len() < precision {
			fraction_str.push('0');
		}

		let formatted = if fraction_str.is_empty() {
			integer_part.to_string()
		} else {
			format!("{}.{}", integer_part, fraction_str)
		};

		if self.is_negative {
			write!(f, "-{}", formatted)
		} else {
			write!(f, "{}", formatted)
		}
	}
}

// -----------------
// -- BOILERPLATE --
// -----------------

impl Add for Quant {
	type Output = Self;

	fn add(self, rhs: Self) -> Self::Output {
		if self.numerator == 0 {
			return rhs;
		}
		if rhs.numerator == 0 {
			return self;
		}

		self.checked_add(rhs).unwrap_or_else(|| {
			Self::approximate(
				self.to_f64() + rhs.to_f64(),
				self.render_precision.max(rhs.render_precision),
			)
		})
	}
}

impl Sub for Quant {
	type Output = Self;

	fn sub(self, rhs: Self) -> Self::Output {
		self + (-rhs)
	}
}

impl Mul for Quant {
	type Output = Self;

	fn mul(self, rhs: Self) -> Self::Output {
		self.checked_mul(rhs).unwrap_or_else(|| {
			Self::approximate(
				self.to_f64() * rhs.to_f64(),
				self.render_precision.max(rhs.render_precision),
			)
		})
	}
}

impl Div for Quant {
	type Output = Self;

	fn div(self, rhs: Self) -> Self::Output {
		if rhs.numerator == 0 {
			panic!("Attempt to divide by zero");
		}

		self * rhs.recip()
	}
}

impl Div<i128> for Quant {
	type Output = Self;

	fn div(self, rhs: i128) -> Self::Output {
		self / Quant::from_i128(rhs)
	}
}

impl Mul<i128> for Quant {
	type Output = Self;

	fn mul(self, rhs: i128) -> Self::Output {
		self * Quant::from_i128(rhs)
	}
}

impl Neg for Quant {
	type Output = Self;

	fn neg(self) -> Self::Output {
		Self {
			is_negative: self.numerator > 0 && !self.is_negative,
			..self
		}
	}
}

impl PartialEq for Quant {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl PartialEq<i128> for Quant {
	fn eq(&self, other: &i128) -> bool {
		*self == Quant::from_i128(*other)
	}
}

impl Eq for Quant {}

impl PartialOrd for Quant {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl PartialOrd<i128> for Quant {
	fn partial_cmp(&self, other: &i128) -> Option<Ordering> {
		Some(self.cmp(&Quant::from_i128(*other)))
	}
}

impl Ord for Quant {
	fn cmp(&self, other: &Self) -> Ordering {
		if self.numerator == 0 && other.numerator == 0 {
			return Ordering::Equal;
		}

		match (self.is_negative, other.is_negative) {
			(true, false) => return Ordering::Less,
			(false, true) => return Ordering::Greater,
			_ => {},
		};

		let magnitude = Self::cmp_fractions(
			self.numerator,
			self.denominator,
			other.numerator,
			other.denominator,
		);

		if self.is_negative {
			magnitude.reverse()
		} else {
			magnitude
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn q(s: &str) -> Quant {
		Quant::from_str(s).unwrap()
	}

	mod creation {
		use super::*;

		#[test]
		fn test_from_frac_reduces() {
			let quant = Quant::from_frac(-456, 1000);
			assert_eq!(quant.numerator, 57);
			assert_eq!(quant.denominator, 125);
			assert!(quant.is_negative);
		}

		#[test]
		fn test_from_frac_signs() {
			let quant = Quant::from_frac(3, -4);
			assert!(quant.is_negative);
			assert_eq!(quant, q("-0.75"));
		}

		#[test]
		#[should_panic(expected = "Denominator cannot be zero")]
		fn test_from_frac_zero_denominator() {
			Quant::from_frac(1, 0);
		}

		#[test]
		fn test_from_str_keeps_render_precision() {
			let quant = q("36.50");
			assert_eq!(quant.render_precision, 2);
			assert_eq!(quant.to_string(), "36.50");
		}

		#[test]
		fn test_from_str_negative_zero_is_not_negative() {
			let quant = q("-0.00");
			assert!(!quant.is_negative);
			assert!(quant.is_zero());
		}

		#[test]
		fn test_from_str_rejects_garbage() {
			assert!(Quant::from_str("").is_err());
			assert!(Quant::from_str("1.2.3").is_err());
			assert!(Quant::from_str("1e5").is_err());
			assert!(Quant::from_str("12abc").is_err());
		}

		#[test]
		fn test_from_str_limits() {
			assert_eq!(
				q("36.123456789012345671").to_fixed(2),
				"36.12"
			);
			assert!(Quant::from_str("1.0000000000000000000000000000000000000001")
				.is_err());
			assert!(Quant::from_str("340282366920938463463374607431768211455.5")
				.is_err());
		}

		#[test]
		fn test_from_f64_snaps_to_cents() {
			assert_eq!(Quant::from_f64(42.63), q("42.63"));
			assert_eq!(Quant::from_f64(100.0).to_string(), "100.00");
			assert_eq!(Quant::from_f64(f64::NAN), Quant::zero());
			assert_eq!(Quant::from_f64(f64::INFINITY), Quant::zero());
		}

		#[test]
		fn test_to_f64() {
			assert_eq!(q("36.5").to_f64(), 36.5);
			assert_eq!(q("-0.25").to_f64(), -0.25);
		}
	}

	mod rounding {
		use super::*;

		#[test]
		fn test_exact_half_rounds_up() {
			let mut quant = q("42.625");
			let error = quant.round_half_away(2);
			assert_eq!(quant, q("42.63"));
			assert_eq!(quant + error, q("42.625"));
		}

		#[test]
		fn test_exact_half_negative_rounds_away() {
			assert_eq!(q("-42.625").rounded(2), q("-42.63"));
		}

		#[test]
		fn test_rounds_to_nearest() {
			assert_eq!(q("4.86615").rounded(2), q("4.87"));
			assert_eq!(q("4.8649").rounded(2), q("4.86"));
		}

		#[test]
		fn test_repeating_fraction() {
			let quant = Quant::from_frac(3650, 41);
			assert_eq!(quant.to_fixed(2), "89.02");
		}

		#[test]
		fn test_rounding_to_zero_clears_sign() {
			let quant = q("-0.001").rounded(2);
			assert!(!quant.is_negative);
			assert_eq!(quant.to_string(), "0.00");
		}
	}

	mod formatting {
		use super::*;

		#[test]
		fn test_to_fixed_pads() {
			assert_eq!(Quant::from_i128(3650).to_fixed(2), "3650.00");
			assert_eq!(q("0.5").to_fixed(2), "0.50");
		}

		#[test]
		fn test_to_grouped() {
			assert_eq!(q("3836.7").to_grouped(2), "3,836.70");
			assert_eq!(q("1234567.891").to_grouped(2), "1,234,567.89");
			assert_eq!(q("-1000").to_grouped(0), "-1,000");
			assert_eq!(q("999.999").to_grouped(2), "1,000.00");
		}

		#[test]
		fn test_huge_denominators() {
			let nearly_one = Quant::from_frac(i128::MAX - 1, i128::MAX);
			assert_eq!(format!("{:.3}", nearly_one), "0.999");
			assert_eq!(nearly_one.to_fixed(2), "1.00");
		}
	}

	mod arithmetic {
		use super::*;

		#[test]
		fn test_add_mixed_signs() {
			assert_eq!(q("36.5") + q("-41"), q("-4.5"));
		}

		#[test]
		fn test_sub() {
			assert_eq!(q("41.00") - q("36.50"), q("4.5"));
		}

		#[test]
		fn test_mul_and_div() {
			assert_eq!(q("100") * q("36.50"), q("3650"));
			assert_eq!(q("77.5") / 2, q("38.75"));
			assert_eq!(q("38.75") * Quant::from_frac(11, 10), q("42.625"));
		}

		#[test]
		fn test_oversized_products_fall_back() {
			let tiny_step = q("1.000000000000000001");
			assert!(tiny_step * tiny_step > tiny_step);
			assert_eq!(tiny_step * tiny_step * tiny_step, 1);

			let huge = Quant::from_i128(i128::MAX);
			assert!(huge * huge > huge);
		}

		#[test]
		fn test_oversized_sums_fall_back() {
			let a = Quant::from_frac(1, i128::MAX);
			let b = Quant::from_frac(1, i128::MAX - 1);
			assert!(a + b < q("0.000000001"));
			assert_eq!(q("2.5") + a + b, q("2.5"));
		}

		#[test]
		fn test_ordering_with_huge_denominators() {
			let n = i128::MAX - 1;
			let below = Quant::from_frac(n - 1, n);
			let above = Quant::from_frac(n, n + 1);
			assert!(below < above);
			assert!(-above < -below);
			assert!(Quant::from_frac(n, n + 1) < Quant::from_frac(n + 1, n));
		}

		#[test]
		#[should_panic(expected = "Attempt to divide by zero")]
		fn test_div_by_zero() {
			let _ = q("1") / Quant::zero();
		}

		#[test]
		fn test_ordering() {
			assert!(q("3650") < q("3836.7"));
			assert!(q("-1") < q("0"));
			assert!(q("-2") < q("-1"));
			assert!(q("0.01") > 0);
			assert_eq!(q("0.00"), 0);
		}

		#[test]
		fn test_is_positive() {
			assert!(q("0.01").is_positive());
			assert!(!Quant::zero().is_positive());
			assert!(!q("-3").is_positive());
		}
	}
}
