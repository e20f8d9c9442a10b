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
use anyhow::{anyhow, Error};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

/// Durable home of the saved snapshot, as raw text.
pub trait SnapshotStore: Send + Sync {
	/// Ok(None) means nothing has been saved yet.
	fn read(&self) -> Result<Option<String>, Error>;
	fn write(&self, contents: &str) -> Result<(), Error>;
}

/// A JSON file on disk. Writes go to a sibling temp file first and are
/// renamed into place, so a crash mid-write leaves the old state intact.
pub struct FileStore {
	path: PathBuf,
}

impl FileStore {
	pub fn new(path: PathBuf) -> Self {
		Self { path }
	}
}

impl SnapshotStore for FileStore {
	fn read(&self) -> Result<Option<String>, Error> {
		match fs::read_to_string(&self.path) {
			Ok(contents) => Ok(Some(contents)),
			Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
			Err(e) => Err(anyhow!("failed to read {}: {}", self.path.display(), e)),
		}
	}

	fn write(&self, contents: &str) -> Result<(), Error> {
		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent)?;
		}

		let tmp = self.path.with_extension("json.tmp");
		fs::write(&tmp, contents)
			.map_err(|e| anyhow!("failed to write {}: {}", tmp.display(), e))?;
		fs::rename(&tmp, &self.path)?;
		Ok(())
	}
}

/// Keeps state for the life of the process only.
#[derive(Default)]
pub struct MemoryStore {
	contents: Mutex<Option<String>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}

impl SnapshotStore for MemoryStore {
	fn read(&self) -> Result<Option<String>, Error> {
		Ok(self
			.contents
			.lock()
			.map_err(|_| anyhow!("memory store poisoned"))?
			.clone())
	}

	fn write(&self, contents: &str) -> Result<(), Error> {
		*self
			.contents
			.lock()
			.map_err(|_| anyhow!("memory store poisoned"))? = Some(contents.to_string());
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_file_store_round_trip() {
		let dir = tempfile::tempdir().unwrap();
		let store = FileStore::new(dir.path().join("nested/state.json"));

		assert_eq!(store.read().unwrap(), None);
		store.write("{\"a\":1}").unwrap();
		assert_eq!(store.read().unwrap().as_deref(), Some("{\"a\":1}"));
		store.write("{}").unwrap();
		assert_eq!(store.read().unwrap().as_deref(), Some("{}"));
		assert!(!dir.path().join("nested/state.json.tmp").exists());
	}

	#[test]
	fn test_file_store_unreadable() {
		let dir = tempfile::tempdir().unwrap();
		// a directory where the file should be
		let store = FileStore::new(dir.path().to_path_buf());
		assert!(store.read().is_err());
	}

	#[test]
	fn test_memory_store() {
		let store = MemoryStore::new();
		assert_eq!(store.read().unwrap(), None);
		store.write("x").unwrap();
		assert_eq!(store.read().unwrap().as_deref(), Some("x"));
	}
}
