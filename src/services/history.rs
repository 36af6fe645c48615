//! Search history rotation and persistence
//!
//! History is a most-recent-first list of distinct queries, capped at
//! [`MAX_HISTORY_ENTRIES`]. Rotation is pure ([`SearchHistoryLog`]); storage
//! sits behind [`HistoryStore`] so the session decides when to persist.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::warn;

use crate::types::{PriceCompareError, Result};

/// Maximum number of remembered searches
pub const MAX_HISTORY_ENTRIES: usize = 10;

/// Storage key for the history value
pub const HISTORY_KEY: &str = "searchHistory";

/// Pure history rotation
pub struct SearchHistoryLog;

impl SearchHistoryLog {
    /// Insert `query` at the front of `history`.
    ///
    /// The query is trimmed; an existing exact match is moved rather than
    /// duplicated, and anything past the 10th entry is dropped.
    pub fn record(history: &[String], query: &str) -> Result<Vec<String>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PriceCompareError::EmptyQuery);
        }

        let mut updated = Vec::with_capacity(MAX_HISTORY_ENTRIES);
        updated.push(query.to_string());
        updated.extend(
            history
                .iter()
                .filter(|entry| entry.as_str() != query)
                .take(MAX_HISTORY_ENTRIES - 1)
                .cloned(),
        );
        Ok(updated)
    }

    /// Clean a loaded sequence: drop blanks and later duplicates, then cap.
    pub fn normalize(entries: Vec<String>) -> Vec<String> {
        let mut seen = HashSet::new();
        entries
            .into_iter()
            .filter(|entry| !entry.trim().is_empty())
            .filter(|entry| seen.insert(entry.clone()))
            .take(MAX_HISTORY_ENTRIES)
            .collect()
    }
}

/// Persistence collaborator for search history
pub trait HistoryStore {
    /// Load the stored history. Absent or unreadable storage yields an empty list.
    fn load(&self) -> Vec<String>;

    /// Replace the stored history
    fn persist(&self, history: &[String]) -> Result<()>;
}

/// History stored as `<data_dir>/searchHistory.json`
pub struct FileHistoryStore {
    data_dir: PathBuf,
}

impl FileHistoryStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", HISTORY_KEY))
    }

    /// Lock file serializing writers
    fn lock_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.lock", HISTORY_KEY))
    }

    /// Read under a shared lock
    fn read_locked(path: &Path) -> std::io::Result<String> {
        let file = File::open(path)?;
        file.lock_shared()?;

        let mut content = String::new();
        let result = std::io::BufReader::new(&file).read_to_string(&mut content);
        let _ = file.unlock();
        result.map(|_| content)
    }

    /// Write `content` to the temp file and rename it over the target.
    /// Caller holds the write lock.
    fn write_and_swap(&self, content: &str) -> Result<()> {
        let path = self.path();
        let temp_path = path.with_extension("json.tmp");

        {
            let mut file = File::create(&temp_path).map_err(|e| {
                PriceCompareError::History(format!("Failed to create temp file: {}", e))
            })?;
            file.write_all(content.as_bytes()).map_err(|e| {
                PriceCompareError::History(format!("Failed to write temp file: {}", e))
            })?;
            file.sync_all().map_err(|e| {
                PriceCompareError::History(format!("Failed to sync temp file: {}", e))
            })?;
        }

        fs::rename(&temp_path, &path).map_err(|e| {
            PriceCompareError::History(format!("Failed to rename temp file: {}", e))
        })?;
        Ok(())
    }
}

impl HistoryStore for FileHistoryStore {
    fn load(&self) -> Vec<String> {
        let path = self.path();
        if !path.exists() {
            return Vec::new();
        }

        let content = match Self::read_locked(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read search history");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&content) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupted search history, starting empty");
                Vec::new()
            }
        }
    }

    /// Atomic write (temp file + rename). The exclusive lock on the sidecar
    /// lock file covers both the temp write and the rename.
    fn persist(&self, history: &[String]) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;

        let content = serde_json::to_string(history)
            .map_err(|e| PriceCompareError::History(format!("Serialization failed: {}", e)))?;

        let lock = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.lock_path())?;
        lock.lock_exclusive().map_err(|e| {
            PriceCompareError::History(format!("Failed to acquire write lock: {}", e))
        })?;

        let result = self.write_and_swap(&content);
        let _ = lock.unlock();
        result
    }
}

/// In-memory history store, for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    entries: RefCell<Vec<String>>,
}

impl MemoryHistoryStore {
    pub fn new(entries: Vec<String>) -> Self {
        Self {
            entries: RefCell::new(entries),
        }
    }

    /// Snapshot of what was last persisted
    pub fn snapshot(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> Vec<String> {
        self.snapshot()
    }

    fn persist(&self, history: &[String]) -> Result<()> {
        *self.entries.borrow_mut() = history.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn history(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    // ========== record tests ==========

    #[test]
    fn test_record_prepends_new_query() {
        let h = history(&["phone"]);

        let updated = SearchHistoryLog::record(&h, "laptop").unwrap();

        assert_eq!(updated, history(&["laptop", "phone"]));
    }

    #[test]
    fn test_record_moves_duplicate_to_front() {
        let h = history(&["laptop", "phone"]);

        let updated = SearchHistoryLog::record(&h, "phone").unwrap();

        assert_eq!(updated, history(&["phone", "laptop"]));
    }

    #[test]
    fn test_record_trims_query() {
        let updated = SearchHistoryLog::record(&history(&["phone"]), "  phone \t").unwrap();

        assert_eq!(updated, history(&["phone"]));
    }

    #[test]
    fn test_record_is_case_sensitive() {
        let updated = SearchHistoryLog::record(&history(&["Phone"]), "phone").unwrap();

        assert_eq!(updated, history(&["phone", "Phone"]));
    }

    #[test]
    fn test_record_reinsertion_is_idempotent() {
        let h = history(&["a", "b", "c"]);

        let once = SearchHistoryLog::record(&h, "b").unwrap();
        let twice = SearchHistoryLog::record(&once, "b").unwrap();

        assert_eq!(once, twice);
        assert_eq!(twice[0], "b");
        assert_eq!(twice.iter().filter(|e| e.as_str() == "b").count(), 1);
    }

    #[test]
    fn test_record_never_exceeds_limit() {
        for len in 0..25 {
            let h: Vec<String> = (0..len).map(|i| format!("query-{}", i)).collect();

            let updated = SearchHistoryLog::record(&h, "fresh").unwrap();

            assert!(updated.len() <= MAX_HISTORY_ENTRIES, "len {} overflowed", len);
            assert_eq!(updated[0], "fresh");
        }
    }

    #[test]
    fn test_record_drops_oldest_on_rotation() {
        let h: Vec<String> = (0..10).map(|i| format!("q{}", i)).collect();

        let updated = SearchHistoryLog::record(&h, "new").unwrap();

        assert_eq!(updated.len(), 10);
        assert_eq!(updated[0], "new");
        assert_eq!(updated[9], "q8");
        assert!(!updated.contains(&"q9".to_string()));
    }

    #[test]
    fn test_record_duplicate_in_full_history_keeps_all_others() {
        let h: Vec<String> = (0..10).map(|i| format!("q{}", i)).collect();

        let updated = SearchHistoryLog::record(&h, "q9").unwrap();

        assert_eq!(updated.len(), 10);
        assert_eq!(updated[0], "q9");
        assert_eq!(updated[1], "q0");
        assert_eq!(updated[9], "q8");
    }

    #[test]
    fn test_record_blank_query_fails() {
        let h = history(&["phone"]);

        let err = SearchHistoryLog::record(&h, "   ").unwrap_err();

        assert!(matches!(err, PriceCompareError::EmptyQuery));
        assert_eq!(h, history(&["phone"]));
    }

    // ========== normalize tests ==========

    #[test]
    fn test_normalize_drops_blanks_and_duplicates() {
        let loaded = history(&["a", "", "b", "a", "  ", "c"]);

        assert_eq!(SearchHistoryLog::normalize(loaded), history(&["a", "b", "c"]));
    }

    #[test]
    fn test_normalize_caps_length() {
        let loaded: Vec<String> = (0..30).map(|i| i.to_string()).collect();

        assert_eq!(SearchHistoryLog::normalize(loaded).len(), MAX_HISTORY_ENTRIES);
    }

    // ========== FileHistoryStore tests ==========

    #[test]
    fn test_file_store_missing_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileHistoryStore::new(temp_dir.path());

        assert!(store.load().is_empty());
    }

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileHistoryStore::new(temp_dir.path().join("nested"));

        store.persist(&history(&["laptop", "phone"])).unwrap();

        assert_eq!(store.load(), history(&["laptop", "phone"]));
        assert!(store.path().ends_with("searchHistory.json"));
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_store_value_is_json_array() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileHistoryStore::new(temp_dir.path());

        store.persist(&history(&["phone"])).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, r#"["phone"]"#);
    }

    #[test]
    fn test_file_store_corrupt_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileHistoryStore::new(temp_dir.path());
        fs::write(store.path(), "not valid json{{{").unwrap();

        assert!(store.load().is_empty());
    }

    #[test]
    fn test_file_store_overwrites_previous_value() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileHistoryStore::new(temp_dir.path());

        store.persist(&history(&["a", "b"])).unwrap();
        store.persist(&history(&["c"])).unwrap();

        assert_eq!(store.load(), history(&["c"]));
    }

    #[test]
    fn test_file_store_write_lock_is_held_across_temp_write() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileHistoryStore::new(temp_dir.path());
        store.persist(&history(&["phone"])).unwrap();

        let lock = File::open(store.lock_path()).unwrap();
        lock.lock_exclusive().unwrap();

        let writer = {
            let dir = temp_dir.path().to_path_buf();
            std::thread::spawn(move || {
                FileHistoryStore::new(dir).persist(&history(&["laptop"]))
            })
        };
        std::thread::sleep(std::time::Duration::from_millis(100));

        // Blocked writer must not have touched the temp file yet
        assert!(!store.path().with_extension("json.tmp").exists());
        assert_eq!(store.load(), history(&["phone"]));

        lock.unlock().unwrap();
        writer.join().unwrap().unwrap();
        assert_eq!(store.load(), history(&["laptop"]));
    }

    #[test]
    fn test_file_store_concurrent_writers_leave_valid_json() {
        let temp_dir = TempDir::new().unwrap();

        let writers: Vec<_> = (0..8)
            .map(|i| {
                let dir = temp_dir.path().to_path_buf();
                std::thread::spawn(move || {
                    let store = FileHistoryStore::new(dir);
                    let entries: Vec<String> =
                        (0..10).map(|j| format!("query-{}-{}", i, j)).collect();
                    for _ in 0..5 {
                        store.persist(&entries).unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let store = FileHistoryStore::new(temp_dir.path());
        let raw = fs::read_to_string(store.path()).unwrap();
        let loaded: Vec<String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(loaded.len(), 10);
    }

    // ========== MemoryHistoryStore tests ==========

    #[test]
    fn test_memory_store_persist_and_load() {
        let store = MemoryHistoryStore::default();
        assert!(store.load().is_empty());

        store.persist(&history(&["phone"])).unwrap();

        assert_eq!(store.load(), history(&["phone"]));
    }
}
