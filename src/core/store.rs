//! Local persistent store for memos and favorite movie ids.
//!
//! Everything here is best effort. A backend that is unavailable or holds
//! unparseable content degrades reads to "empty" and writes to no-ops; no
//! storage error ever reaches the caller.

use crate::models::memo::Memo;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Key holding the memo collection.
pub const MEMOS_KEY: &str = "movie-memos";
/// Key holding the favorite id set.
pub const FAVORITE_IDS_KEY: &str = "favorite-movie-ids";

/// Minimal string key-value storage.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Probe whether storage can currently be written.
    fn is_available(&self) -> bool;
}

/// File-backed storage: one `<key>.json` file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Directory holding the key files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        // Write then rename so a crash never leaves a half-written file.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn is_available(&self) -> bool {
        let probe = self.dir.join("__test__");
        fs::create_dir_all(&self.dir).is_ok()
            && fs::write(&probe, "__test__").is_ok()
            && fs::remove_file(&probe).is_ok()
    }
}

/// In-memory storage. Can be switched off to simulate disabled storage.
#[derive(Debug)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    available: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Turn the store on or off. While off every read and write fails.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(Error::Storage("storage disabled".to_string()))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        let entries = self
            .entries
            .lock()
            .map_err(|e| Error::Storage(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check()?;
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| Error::Storage(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}

/// Memo and favorite-id operations over a key-value backend.
#[derive(Debug)]
pub struct LocalStore<B> {
    backend: B,
}

impl<B: KeyValueStore> LocalStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Access the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    // --- Memos ---

    /// All memos in stored order. Empty when storage is unusable.
    pub fn list_memos(&self) -> Vec<Memo> {
        self.read_list(MEMOS_KEY)
    }

    /// The memo for a movie, if any.
    pub fn get_memo(&self, movie_id: u64) -> Option<Memo> {
        self.list_memos().into_iter().find(|m| m.movie_id == movie_id)
    }

    /// Insert a memo, or replace the existing one for the same movie in place.
    pub fn put_memo(&self, memo: &Memo) {
        if !self.backend.is_available() {
            return;
        }

        let mut memos = self.list_memos();
        match memos.iter_mut().find(|m| m.movie_id == memo.movie_id) {
            Some(existing) => *existing = memo.clone(),
            None => memos.push(memo.clone()),
        }
        self.write_list(MEMOS_KEY, &memos);
    }

    /// Delete the memo for a movie. Absent memos are not an error.
    pub fn remove_memo(&self, movie_id: u64) {
        if !self.backend.is_available() {
            return;
        }

        let mut memos = self.list_memos();
        memos.retain(|m| m.movie_id != movie_id);
        self.write_list(MEMOS_KEY, &memos);
    }

    // --- Favorite ids ---

    /// Locally known favorite ids, in insertion order.
    pub fn favorite_ids(&self) -> Vec<u64> {
        self.read_list(FAVORITE_IDS_KEY)
    }

    /// Whether a movie is in the local favorite set.
    pub fn is_favorite(&self, movie_id: u64) -> bool {
        self.favorite_ids().contains(&movie_id)
    }

    /// Add (if absent) or remove (if present) a favorite id.
    pub fn set_favorite_id(&self, movie_id: u64, present: bool) {
        if !self.backend.is_available() {
            return;
        }

        let mut ids = self.favorite_ids();
        let position = ids.iter().position(|&id| id == movie_id);
        match (present, position) {
            (true, None) => ids.push(movie_id),
            (false, Some(index)) => {
                ids.remove(index);
            }
            _ => return,
        }
        self.write_list(FAVORITE_IDS_KEY, &ids);
    }

    /// Replace the whole favorite set, dropping duplicates.
    pub fn replace_favorite_ids(&self, movie_ids: &[u64]) {
        if !self.backend.is_available() {
            return;
        }

        let mut ids: Vec<u64> = Vec::with_capacity(movie_ids.len());
        for &id in movie_ids {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        self.write_list(FAVORITE_IDS_KEY, &ids);
    }

    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        if !self.backend.is_available() {
            return Vec::new();
        }

        let content = match self.backend.get(key) {
            Ok(Some(content)) => content,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", key, e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Ignoring unparseable {}: {}", key, e);
                Vec::new()
            }
        }
    }

    fn write_list<T: Serialize>(&self, key: &str, items: &[T]) {
        let result = serde_json::to_string(items)
            .map_err(Error::from)
            .and_then(|content| self.backend.set(key, &content));
        if let Err(e) = result {
            tracing::warn!("Failed to write {}: {}", key, e);
        }
    }
}
