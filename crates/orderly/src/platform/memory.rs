//! In-memory storage, used when nothing should touch the filesystem.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::platform::storage::{Storage, StorageError, StorageKey};

#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: RefCell<HashMap<StorageKey, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a document has been written
    pub fn contains(&self, key: StorageKey) -> bool {
        self.documents.borrow().contains_key(&key)
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        Ok(self.documents.borrow().get(&key).cloned())
    }

    fn write(&self, key: StorageKey, content: &str) -> Result<(), StorageError> {
        self.documents.borrow_mut().insert(key, content.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        self.documents.borrow_mut().remove(&key);
        Ok(())
    }
}
