//! Deduplicating record file
//!
//! The file holds one [`RecordSet`] document and is replaced whole on every
//! write: the new content goes to a temporary file in the same directory,
//! which is then renamed over the target.

use crate::error::ExtractorError;
use adscout_domain::{AdRecord, RecordSet};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Record file handle
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Create a handle for the record file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the record file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current record set
    ///
    /// A missing file is an empty set. An unreadable or corrupt file is
    /// also treated as empty, with a warning.
    pub fn load(&self) -> RecordSet {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return RecordSet::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not read record file, starting empty");
                return RecordSet::new();
            }
        };

        match serde_json::from_str::<RecordSet>(&contents) {
            Ok(mut set) => {
                set.total_ads = set.ads.len();
                set
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Corrupt record file, starting empty");
                RecordSet::new()
            }
        }
    }

    /// Append records whose library identifier is new, then persist
    ///
    /// Returns the number of records added. Nothing is written when every
    /// candidate was a duplicate.
    pub fn merge(&self, records: Vec<AdRecord>) -> Result<usize, ExtractorError> {
        let candidates = records.len();
        let mut set = self.load();
        let added = set.merge(records);

        if added == 0 {
            debug!(candidates, "No new ads to add");
            return Ok(0);
        }

        self.write(&set)?;
        info!(
            added,
            dropped = candidates - added,
            total = set.total_ads,
            path = %self.path.display(),
            "Merged ads"
        );
        Ok(added)
    }

    fn write(&self, set: &RecordSet) -> Result<(), ExtractorError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let payload = serde_json::to_vec_pretty(set)?;
        let mut temp = NamedTempFile::new_in(&dir)?;
        temp.write_all(&payload)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| ExtractorError::Io(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ad(id: Option<&str>, advertiser: &str) -> AdRecord {
        AdRecord {
            advertiser: Some(advertiser.to_string()),
            library_id: id.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("ads.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_merge_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("ads.json"));
        let batch = vec![ad(Some("1"), "A"), ad(Some("2"), "B")];

        assert_eq!(store.merge(batch.clone()).unwrap(), 2);
        let once = store.load();
        assert_eq!(store.merge(batch).unwrap(), 0);
        assert_eq!(store.load(), once);
        assert_eq!(once.total_ads, 2);
    }

    #[test]
    fn test_same_id_kept_once() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("ads.json"));
        store.merge(vec![ad(Some("7"), "First")]).unwrap();
        store.merge(vec![ad(Some("7"), "Second")]).unwrap();

        let set = store.load();
        assert_eq!(set.len(), 1);
        assert_eq!(set.ads[0].advertiser.as_deref(), Some("First"));
    }

    #[test]
    fn test_corrupt_file_treated_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ads.json");
        fs::write(&path, "{ not json").unwrap();

        let store = RecordStore::new(&path);
        assert!(store.load().is_empty());
        assert_eq!(store.merge(vec![ad(Some("1"), "A")]).unwrap(), 1);
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn test_no_write_when_nothing_added() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ads.json");
        let store = RecordStore::new(&path);
        assert_eq!(store.merge(Vec::new()).unwrap(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn test_file_shape_and_no_leftover_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("ads.json");
        let store = RecordStore::new(&path);
        store
            .merge(vec![ad(Some("1"), "দোকান"), ad(None, "No Id")])
            .unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("দোকান"));
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["total_ads"], 2);
        assert_eq!(value["ads"].as_array().unwrap().len(), 2);

        let entries = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
