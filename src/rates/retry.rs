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
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Exponential backoff envelope: `attempts` requests in total, waiting
/// `initial`, then twice that, and so on between them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Backoff {
	pub attempts: u32,
	pub initial: Duration,
}

impl Backoff {
	pub fn new(attempts: u32, initial: Duration) -> Self {
		Self {
			attempts: attempts.max(1),
			initial,
		}
	}

	/// How long to wait after the given failed attempt (1-based).
	pub fn delay_after(&self, attempt: u32) -> Duration {
		let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
		self.initial.checked_mul(factor).unwrap_or(Duration::MAX)
	}
}

/// Runs `f` until it succeeds or the attempts run out, sleeping between
/// failures. The final error is returned as is.
pub async fn with_retry<F, Fut, T>(
	backoff: &Backoff,
	mut f: F,
) -> Result<T, anyhow::Error>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<T, anyhow::Error>>,
{
	let mut attempt = 0;
	loop {
		attempt += 1;
		match f().await {
			Ok(result) => return Ok(result),
			Err(e) if attempt < backoff.attempts => {
				let delay = backoff.delay_after(attempt);
				warn!(
					attempt,
					attempts = backoff.attempts,
					error = %e,
					"request failed, retrying in {}ms",
					delay.as_millis()
				);
				tokio::time::sleep(delay).await;
			},
			Err(e) => return Err(e),
		}
	}
}
