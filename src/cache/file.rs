//! File-backed [`TokenCache`] for CLIs and jobs that restart between calls.
//!
//! The file holds a single JSON document, `{"entries": {<key>: {value, expires_at}}}`. Only live
//! entries are ever written, and the in-memory view changes only after the file was replaced.

// std
use std::{
	fs, io,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	cache::{CacheEntry, CacheError, CacheFuture, TokenCache},
};

/// On-disk layout of a [`FileCache`].
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
	entries: HashMap<String, CacheEntry>,
}
impl Snapshot {
	fn decode(path: &Path, bytes: &[u8]) -> Result<Self, CacheError> {
		if bytes.iter().all(u8::is_ascii_whitespace) {
			return Ok(Self::default());
		}

		serde_json::from_slice(bytes).map_err(|e| CacheError::Serialization {
			message: format!("Cache file {} is not a token snapshot: {e}", path.display()),
		})
	}

	fn live(entries: &HashMap<String, CacheEntry>, now: OffsetDateTime) -> Self {
		let entries = entries
			.iter()
			.filter(|(_, entry)| entry.is_live_at(now))
			.map(|(key, entry)| (key.clone(), entry.clone()))
			.collect();

		Self { entries }
	}
}

/// Token cache mirrored to a JSON file on every write.
#[derive(Clone, Debug)]
pub struct FileCache {
	path: PathBuf,
	entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}
impl FileCache {
	/// Loads the live entries stored at `path`; a missing or blank file starts an empty cache.
	///
	/// The file and its parent directory are created lazily by the first write.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
		let path = path.into();
		let snapshot = match fs::read(&path) {
			Ok(bytes) => Snapshot::decode(&path, &bytes)?,
			Err(e) if e.kind() == io::ErrorKind::NotFound => Snapshot::default(),
			Err(e) => return Err(io_failure("read", &path, e)),
		};
		let Snapshot { entries } = Snapshot::live(&snapshot.entries, OffsetDateTime::now_utc());

		Ok(Self { path, entries: Arc::new(RwLock::new(entries)) })
	}

	/// Location of the backing JSON file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Replaces the file with `snapshot` by writing a sibling file and renaming it over the target.
	fn store(&self, snapshot: &Snapshot) -> Result<(), CacheError> {
		let bytes = serde_json::to_vec(snapshot).map_err(|e| CacheError::Serialization {
			message: format!("Token snapshot cannot be encoded: {e}"),
		})?;

		if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
			fs::create_dir_all(dir).map_err(|e| io_failure("create", dir, e))?;
		}

		let staged = self.path.with_extension("partial");

		fs::write(&staged, bytes).map_err(|e| io_failure("write", &staged, e))?;
		fs::rename(&staged, &self.path).map_err(|e| io_failure("replace", &self.path, e))
	}
}
impl TokenCache for FileCache {
	fn read<'a>(&'a self, key: &'a str) -> CacheFuture<'a, Option<Value>> {
		Box::pin(async move {
			let now = OffsetDateTime::now_utc();

			Ok(self
				.entries
				.read()
				.get(key)
				.filter(|entry| entry.is_live_at(now))
				.map(|entry| entry.value.clone()))
		})
	}

	fn write<'a>(&'a self, key: &'a str, value: Value, ttl: Duration) -> CacheFuture<'a, ()> {
		Box::pin(async move {
			let now = OffsetDateTime::now_utc();
			let entry = CacheEntry::new(value, ttl, now)?;
			let mut entries = self.entries.write();
			let mut next = Snapshot::live(&entries, now);

			next.entries.insert(key.to_owned(), entry);
			self.store(&next)?;
			*entries = next.entries;

			Ok(())
		})
	}
}

fn io_failure(action: &str, path: &Path, e: io::Error) -> CacheError {
	CacheError::Backend { message: format!("Cannot {action} {}: {e}", path.display()) }
}
