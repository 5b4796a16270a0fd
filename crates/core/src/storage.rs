//! Key-value storage backing the session store.
//!
//! Models the browser's persistent storage as a string-keyed map. The file
//! implementation is lenient on load: an unreadable or malformed file is an
//! empty map, never an error.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::error::Result;

/// Synchronous string-keyed storage.
///
/// Writes are whole-value replacements; there are no retries and no partial
/// updates, so the last writer wins across processes.
pub trait KeyValueStorage: Send + Sync {
	fn get(&self, key: &str) -> Option<String>;
	fn set(&self, key: &str, value: &str) -> Result<()>;
	fn remove(&self, key: &str) -> Result<()>;
}

/// Single JSON object file on disk, written through on every mutation.
pub struct FileStorage {
	path: PathBuf,
	entries: Mutex<HashMap<String, String>>,
}

impl FileStorage {
	/// Opens storage at `path`, loading whatever is currently persisted.
	pub fn open(path: impl Into<PathBuf>) -> Self {
		let path = path.into();
		let entries = fs::read_to_string(&path)
			.ok()
			.and_then(|content| serde_json::from_str(&content).ok())
			.unwrap_or_default();
		Self { path, entries: Mutex::new(entries) }
	}

	pub fn path(&self) -> &std::path::Path {
		&self.path
	}

	fn persist(&self, entries: &HashMap<String, String>) -> Result<()> {
		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent)?;
		}
		let json = serde_json::to_string_pretty(entries)?;
		fs::write(&self.path, json)?;
		Ok(())
	}
}

impl KeyValueStorage for FileStorage {
	fn get(&self, key: &str) -> Option<String> {
		self.entries.lock().get(key).cloned()
	}

	fn set(&self, key: &str, value: &str) -> Result<()> {
		let mut entries = self.entries.lock();
		entries.insert(key.to_string(), value.to_string());
		self.persist(&entries)
	}

	fn remove(&self, key: &str) -> Result<()> {
		let mut entries = self.entries.lock();
		if entries.remove(key).is_none() {
			return Ok(());
		}
		self.persist(&entries)
	}
}

/// In-memory storage for tests.
#[derive(Default)]
pub struct MemoryStorage {
	entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
	pub fn new() -> Self {
		Self::default()
	}
}

impl KeyValueStorage for MemoryStorage {
	fn get(&self, key: &str) -> Option<String> {
		self.entries.lock().get(key).cloned()
	}

	fn set(&self, key: &str, value: &str) -> Result<()> {
		self.entries.lock().insert(key.to_string(), value.to_string());
		Ok(())
	}

	fn remove(&self, key: &str) -> Result<()> {
		self.entries.lock().remove(key);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use tempfile::TempDir;

	use super::*;

	#[test]
	fn file_storage_round_trips_across_reopen() {
		let tmp = TempDir::new().unwrap();
		let path = tmp.path().join("session.json");

		let storage = FileStorage::open(&path);
		storage.set("auth_token", "A").unwrap();
		storage.set("user", r#"{"id":"1"}"#).unwrap();

		let reopened = FileStorage::open(&path);
		assert_eq!(reopened.get("auth_token").as_deref(), Some("A"));
		assert_eq!(reopened.get("user").as_deref(), Some(r#"{"id":"1"}"#));
	}

	#[test]
	fn malformed_file_loads_as_empty() {
		let tmp = TempDir::new().unwrap();
		let path = tmp.path().join("session.json");
		fs::write(&path, "not json at all {{{").unwrap();

		let storage = FileStorage::open(&path);
		assert!(storage.get("auth_token").is_none());
	}

	#[test]
	fn missing_parent_dirs_are_created_on_write() {
		let tmp = TempDir::new().unwrap();
		let path = tmp.path().join("nested").join("deeper").join("session.json");

		let storage = FileStorage::open(&path);
		storage.set("auth_token", "A").unwrap();
		assert!(path.exists());
	}

	#[test]
	fn removing_a_missing_key_is_a_noop() {
		let storage = MemoryStorage::new();
		storage.remove("absent").unwrap();
		assert!(storage.get("absent").is_none());
	}
}
