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
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;

/// A trailing-edge debounce: each `schedule` replaces the pending value and
/// restarts the timer, so a burst of calls results in one call to the sink
/// `delay` after the last of them. At most one value is ever pending.
///
/// Must be used from within a tokio runtime.
pub struct Debouncer<T: Send + 'static> {
	delay: Duration,
	sink: Arc<dyn Fn(T) + Send + Sync>,
	pending: Arc<Mutex<Option<T>>>,
	timer: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
	pub fn new<F>(delay: Duration, sink: F) -> Self
	where
		F: Fn(T) + Send + Sync + 'static,
	{
		Self {
			delay,
			sink: Arc::new(sink),
			pending: Arc::new(Mutex::new(None)),
			timer: None,
		}
	}

	pub fn schedule(&mut self, value: T) {
		self.stop_timer();
		*lock(&self.pending) = Some(value);

		let pending = self.pending.clone();
		let sink = self.sink.clone();
		let delay = self.delay;
		self.timer = Some(tokio::spawn(async move {
			tokio::time::sleep(delay).await;
			let value = lock(&pending).take();
			if let Some(value) = value {
				sink(value);
			}
		}));
	}

	/// Drops the pending value without delivering it.
	pub fn cancel(&mut self) -> Option<T> {
		self.stop_timer();
		lock(&self.pending).take()
	}

	/// Delivers the pending value now, if there is one.
	pub fn flush(&mut self) {
		if let Some(value) = self.cancel() {
			(self.sink)(value);
		}
	}

	pub fn is_pending(&self) -> bool {
		lock(&self.pending).is_some()
	}

	fn stop_timer(&mut self) {
		if let Some(timer) = self.timer.take() {
			timer.abort();
		}
	}
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
	use super::*;

	type Delivered = Arc<Mutex<Vec<u32>>>;

	fn debouncer() -> (Debouncer<u32>, Delivered) {
		let delivered: Delivered = Default::default();
		let sink = delivered.clone();
		let debouncer = Debouncer::new(Duration::from_millis(800), move |v| {
			sink.lock().unwrap().push(v)
		});
		(debouncer, delivered)
	}

	async fn advance(ms: u64) {
		tokio::time::sleep(Duration::from_millis(ms)).await;
		tokio::task::yield_now().await;
	}

	#[tokio::test(start_paused = true)]
	async fn test_burst_coalesces_to_last_value() {
		let (mut debouncer, delivered) = debouncer();

		debouncer.schedule(1);
		advance(300).await;
		debouncer.schedule(2);
		advance(300).await;
		debouncer.schedule(3);

		advance(790).await;
		assert!(delivered.lock().unwrap().is_empty());
		assert!(debouncer.is_pending());

		advance(20).await;
		assert_eq!(*delivered.lock().unwrap(), vec![3]);
		assert!(!debouncer.is_pending());
	}

	#[tokio::test(start_paused = true)]
	async fn test_separate_bursts_write_twice() {
		let (mut debouncer, delivered) = debouncer();

		debouncer.schedule(1);
		advance(1000).await;
		debouncer.schedule(2);
		advance(1000).await;

		assert_eq!(*delivered.lock().unwrap(), vec![1, 2]);
	}

	#[tokio::test(start_paused = true)]
	async fn test_cancel() {
		let (mut debouncer, delivered) = debouncer();

		debouncer.schedule(7);
		assert_eq!(debouncer.cancel(), Some(7));
		advance(2000).await;

		assert!(delivered.lock().unwrap().is_empty());
	}

	#[tokio::test(start_paused = true)]
	async fn test_flush_delivers_immediately_once() {
		let (mut debouncer, delivered) = debouncer();

		debouncer.schedule(9);
		debouncer.flush();
		assert_eq!(*delivered.lock().unwrap(), vec![9]);

		advance(2000).await;
		assert_eq!(*delivered.lock().unwrap(), vec![9]);

		// nothing pending, nothing delivered
		debouncer.flush();
		assert_eq!(delivered.lock().unwrap().len(), 1);
	}
}
