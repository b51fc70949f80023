//! Entry Storage Module
//!
//! File system operations on cache files, keyed by digest.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{CacheError, Result};

/// Suffix of the scratch file a write goes through before being renamed into place.
const TMP_SUFFIX: &str = ".tmp";

// == Entry Storage ==
/// Reads and writes digest-named files inside one cache directory.
#[derive(Debug, Clone)]
pub struct EntryStorage {
    dir: PathBuf,
}

impl EntryStorage {
    /// Creates storage rooted at `dir`. The directory is not touched.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, digest: &str) -> PathBuf {
        self.dir.join(digest)
    }

    fn tmp_path(&self, digest: &str) -> PathBuf {
        self.dir.join(format!("{digest}{TMP_SUFFIX}"))
    }

    /// Returns true if a file exists for `digest`.
    pub fn exists(&self, digest: &str) -> Result<bool> {
        let path = self.path(digest);
        path.try_exists().map_err(|e| CacheError::io(path, e))
    }

    pub fn read(&self, digest: &str) -> Result<Vec<u8>> {
        let path = self.path(digest);
        fs::read(&path).map_err(|e| CacheError::io(path, e))
    }

    /// Writes `bytes` for `digest` through a temp file and a rename, so a
    /// crash mid-write never leaves a truncated entry under the final name.
    pub fn write(&self, digest: &str, bytes: &[u8]) -> Result<()> {
        let tmp = self.tmp_path(digest);
        let path = self.path(digest);

        if let Err(e) = fs::write(&tmp, bytes) {
            let _ = fs::remove_file(&tmp);
            return Err(CacheError::io(tmp, e));
        }
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(CacheError::io(path, e));
        }
        Ok(())
    }

    /// Deletes the file for `digest`. A missing file is not an error.
    ///
    /// Returns whether a file was removed.
    pub fn delete(&self, digest: &str) -> Result<bool> {
        let path = self.path(digest);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CacheError::io(path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_storage() -> (EntryStorage, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let storage = EntryStorage::new(temp_dir.path());
        (storage, temp_dir)
    }

    #[test]
    fn test_write_then_read() {
        let (storage, temp_dir) = create_test_storage();

        storage.write("abc123", b"payload").unwrap();

        assert!(storage.exists("abc123").unwrap());
        assert_eq!(storage.read("abc123").unwrap(), b"payload".to_vec());
        assert!(temp_dir.path().join("abc123").is_file());
        assert!(!temp_dir.path().join("abc123.tmp").exists());
    }

    #[test]
    fn test_exists_false_for_missing() {
        let (storage, _temp_dir) = create_test_storage();
        assert!(!storage.exists("missing").unwrap());
    }

    #[test]
    fn test_read_missing_is_io_error() {
        let (storage, _temp_dir) = create_test_storage();
        assert!(matches!(storage.read("missing"), Err(CacheError::Io { .. })));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (storage, _temp_dir) = create_test_storage();

        storage.write("gone", b"x").unwrap();
        assert!(storage.delete("gone").unwrap());
        assert!(!storage.delete("gone").unwrap());
        assert!(!storage.exists("gone").unwrap());
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let storage = EntryStorage::new(temp_dir.path().join("not-there"));

        let result = storage.write("abc", b"x");
        assert!(matches!(result, Err(CacheError::Io { .. })));
    }
}
