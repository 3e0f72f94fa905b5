//! Persistent "hardening already offered" flag
//!
//! The flag is a marker file in the config directory. Only its existence
//! matters; it is created once and never removed by this program.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MARKER_FILE: &str = "hardening-offered";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to write marker {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub trait FlagStore {
    fn is_set(&self) -> bool;
    fn set(&self) -> Result<(), StoreError>;
}

pub struct MarkerFile {
    path: PathBuf,
}

impl MarkerFile {
    /// Marker inside `config_dir`
    pub fn in_dir(config_dir: &Path) -> Self {
        Self::with_path(config_dir.join(MARKER_FILE))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FlagStore for MarkerFile {
    fn is_set(&self) -> bool {
        self.path.exists()
    }

    fn set(&self) -> Result<(), StoreError> {
        let wrap = |source: std::io::Error| StoreError::WriteError {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(wrap)?;
        }
        fs::write(&self.path, b"").map_err(wrap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_marker_lifecycle() {
        let temp_dir = TempDir::new().unwrap();
        let store = MarkerFile::in_dir(&temp_dir.path().join("mullvad-helper"));

        assert!(!store.is_set());
        store.set().unwrap();
        assert!(store.is_set());
        assert!(store.path().ends_with(MARKER_FILE));

        // Setting twice is harmless
        store.set().unwrap();
        assert!(store.is_set());
    }

    #[test]
    fn test_existing_file_counts_regardless_of_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(MARKER_FILE);
        fs::write(&path, "anything").unwrap();
        assert!(MarkerFile::with_path(path).is_set());
    }

    #[cfg(unix)]
    #[test]
    fn test_unwritable_location_reports_error() {
        let store = MarkerFile::with_path(PathBuf::from("/dev/null/nope/hardening-offered"));
        let err = store.set().unwrap_err();
        assert!(err.to_string().contains("hardening-offered"));
    }
}
