//! Platform abstraction layer.
//!
//! [`Storage`] abstracts where documents are persisted. The native
//! implementation writes YAML files into the data directory; the in-memory
//! one keeps everything in a map for the lifetime of the process.

mod memory;
mod storage;

pub mod native;

pub use memory::MemoryStorage;
pub use native::NativeStorage;
pub use storage::{Storage, StorageError, StorageKey, load_document, save_document};
