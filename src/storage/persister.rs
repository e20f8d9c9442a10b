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
use crate::error::AppError;
use crate::storage::debounce::Debouncer;
use crate::storage::snapshot::PersistedSnapshot;
use crate::storage::store::SnapshotStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Reads saved state once and writes it back, debounced. Neither direction
/// ever fails outward: problems are logged and treated as "nothing saved".
pub struct Persister {
	store: Arc<dyn SnapshotStore>,
	debouncer: Debouncer<PersistedSnapshot>,
}

impl Persister {
	pub fn new(store: Arc<dyn SnapshotStore>, delay: Duration) -> Self {
		let sink = store.clone();
		Self {
			store,
			debouncer: Debouncer::new(delay, move |snapshot| {
				write(sink.as_ref(), &snapshot)
			}),
		}
	}

	pub fn load(&self) -> Option<PersistedSnapshot> {
		let loaded = self
			.store
			.read()
			.and_then(|text| text.map(|t| PersistedSnapshot::from_json(&t)).transpose());

		match loaded {
			Ok(snapshot) => snapshot,
			Err(e) => {
				error!(error = %AppError::Persistence(e), "ignoring saved state");
				None
			},
		}
	}

	pub fn save(&mut self, snapshot: PersistedSnapshot) {
		self.debouncer.schedule(snapshot);
	}

	/// Writes any pending snapshot immediately.
	pub fn flush(&mut self) {
		if self.debouncer.is_pending() {
			debug!("writing pending state before exit");
		}
		self.debouncer.flush();
	}
}

fn write(store: &dyn SnapshotStore, snapshot: &PersistedSnapshot) {
	match snapshot.to_json().and_then(|json| store.write(&json)) {
		Ok(()) => debug!("saved state"),
		Err(e) => error!(error = %AppError::Persistence(e), "could not save state"),
	}
}
