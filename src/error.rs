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
use thiserror::Error;

/// Failures a running session can encounter. None of them end the session:
/// network failures fall back to the last known rates, validation failures
/// become a warning on screen, and persistence failures are logged.
#[derive(Debug, Error)]
pub enum AppError {
	#[error("rate fetch failed after {attempts} attempts: {source}")]
	Network {
		attempts: u32,
		#[source]
		source: anyhow::Error,
	},

	#[error(transparent)]
	Validation(#[from] ValidationError),

	#[error("state storage failed: {0}")]
	Persistence(#[source] anyhow::Error),
}

/// Reasons the payment analysis refuses to run.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum ValidationError {
	#[error("enter a dollar price for the official-rate option")]
	MissingOfficialTotal,

	#[error("enter a dollar price for the blended-rate option")]
	MissingBlendedTotal,

	#[error("the parallel rate has not loaded yet")]
	MissingParallelRate,
}
