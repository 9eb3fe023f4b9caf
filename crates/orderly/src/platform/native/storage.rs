//! Native storage implementation using the filesystem.
//!
//! Directory structure:
//! ~/.orderly/
//!   settings.yaml        # Business settings, templates, integrations
//!   funnel.yaml          # Last funnel calculator inputs
//!   orders.yaml          # Order book
//!   products.yaml        # Catalog and stock levels
//!   users.yaml           # Back-office users
//!   orderly.log          # Application log

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::platform::storage::{Storage, StorageError, StorageKey};
use crate::util::io::atomic_write;

/// Storage rooted at a data directory, one YAML file per document
pub struct NativeStorage {
    root: PathBuf,
}

impl NativeStorage {
    /// Create a new native storage with the given root path.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Get the default data directory path (~/.orderly/)
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".orderly")
    }

    /// Get the root path of the storage directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: StorageKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    fn init(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).map_err(|e| match e.kind() {
            io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem => {
                StorageError::NotAvailable(format!("{}: {}", self.root.display(), e))
            }
            _ => StorageError::Io(format!("Failed to create data directory: {}", e)),
        })
    }
}

impl Storage for NativeStorage {
    fn read(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn write(&self, key: StorageKey, content: &str) -> Result<(), StorageError> {
        self.init()?;
        let path = self.path(key);
        atomic_write(&path, content)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote document");
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        let path = self.path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_document_reads_as_none() {
        let dir = tempdir().unwrap();
        let storage = NativeStorage::new(dir.path().join("data"));
        assert!(storage.read(StorageKey::Orders).unwrap().is_none());
        // Removing a missing document is fine
        storage.remove(StorageKey::Orders).unwrap();
    }

    #[test]
    fn test_write_creates_data_dir_and_round_trips() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("nested").join("data");
        let storage = NativeStorage::new(root.clone());

        storage.write(StorageKey::Settings, "currency: Eur\n").unwrap();
        assert!(root.join("settings.yaml").exists());
        assert_eq!(
            storage.read(StorageKey::Settings).unwrap().as_deref(),
            Some("currency: Eur\n")
        );

        storage.remove(StorageKey::Settings).unwrap();
        assert!(storage.read(StorageKey::Settings).unwrap().is_none());
    }

    #[test]
    fn test_documents_are_separate_files() {
        let dir = tempdir().unwrap();
        let storage = NativeStorage::new(dir.path().to_path_buf());
        for key in StorageKey::ALL {
            storage.write(key, key.file_name()).unwrap();
        }
        for key in StorageKey::ALL {
            assert_eq!(storage.read(key).unwrap().as_deref(), Some(key.file_name()));
        }
    }
}
