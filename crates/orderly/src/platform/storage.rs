//! Storage abstraction for platform-independent persistence.
//!
//! Every persisted document is addressed by a [`StorageKey`] and stored as
//! YAML text. Implementations only move text around; (de)serialization lives
//! in [`load_document`] and [`save_document`].

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Error types for storage operations
#[derive(Debug)]
pub enum StorageError {
    /// I/O error (file not found, permission denied, etc.)
    Io(String),
    /// Parse error (invalid YAML, corrupted data)
    Parse(String),
    /// Serialization error
    Serialize(String),
    /// Storage not available (e.g. a read-only data directory)
    NotAvailable(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(msg) => write!(f, "IO error: {}", msg),
            StorageError::Parse(msg) => write!(f, "Parse error: {}", msg),
            StorageError::Serialize(msg) => write!(f, "Serialization error: {}", msg),
            StorageError::NotAvailable(msg) => write!(f, "Storage not available: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// The documents the back-office persists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Settings,
    Funnel,
    Orders,
    Products,
    Users,
}

impl StorageKey {
    #[cfg(test)]
    pub const ALL: [StorageKey; 5] = [
        StorageKey::Settings,
        StorageKey::Funnel,
        StorageKey::Orders,
        StorageKey::Products,
        StorageKey::Users,
    ];

    /// File name of the document inside the data directory
    pub fn file_name(&self) -> &'static str {
        match self {
            StorageKey::Settings => "settings.yaml",
            StorageKey::Funnel => "funnel.yaml",
            StorageKey::Orders => "orders.yaml",
            StorageKey::Products => "products.yaml",
            StorageKey::Users => "users.yaml",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            StorageKey::Settings => "settings",
            StorageKey::Funnel => "funnel",
            StorageKey::Orders => "orders",
            StorageKey::Products => "products",
            StorageKey::Users => "users",
        }
    }
}

/// Platform-independent storage interface.
///
/// Reading a document that was never written is not an error; it yields
/// `None` so callers can fall back to defaults.
pub trait Storage {
    /// Read the raw text of a document
    fn read(&self, key: StorageKey) -> Result<Option<String>, StorageError>;

    /// Replace a document. Implementations must not leave a half-written
    /// document behind.
    fn write(&self, key: StorageKey, content: &str) -> Result<(), StorageError>;

    /// Delete a document. Removing a missing document succeeds.
    fn remove(&self, key: StorageKey) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn read(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: StorageKey, content: &str) -> Result<(), StorageError> {
        (**self).write(key, content)
    }

    fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Load a document, falling back to `T::default()` when it is missing or
/// empty. Keys absent from the document take their `#[serde(default)]` values.
pub fn load_document<S, T>(storage: &S, key: StorageKey) -> Result<T, StorageError>
where
    S: Storage + ?Sized,
    T: DeserializeOwned + Default,
{
    match storage.read(key)? {
        Some(content) if !content.trim().is_empty() => serde_saphyr::from_str(&content)
            .map_err(|e| StorageError::Parse(format!("Failed to parse {}: {}", key.label(), e))),
        _ => Ok(T::default()),
    }
}

/// Serialize a document to YAML and write it
pub fn save_document<S, T>(storage: &S, key: StorageKey, value: &T) -> Result<(), StorageError>
where
    S: Storage + ?Sized,
    T: Serialize,
{
    let yaml = serde_saphyr::to_string(value).map_err(|e| {
        StorageError::Serialize(format!("Failed to serialize {}: {}", key.label(), e))
    })?;
    storage.write(key, &yaml)
}
