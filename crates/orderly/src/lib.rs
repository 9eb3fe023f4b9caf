//! OrderSync back-office command line
//!
//! Wraps `orderly_core` with persistence and a command surface:
//! - YAML documents under a data directory, written atomically
//! - Repository operations that keep orders and stock consistent
//! - Subcommands for the funnel calculator, orders, products, clients,
//!   users and settings, rendered as text tables or JSON
//! - File logging with rotation

pub mod commands;
pub mod config_store;
pub mod logging;
pub mod platform;
pub mod repository;
pub mod util;

pub use commands::{Command, Output};
pub use config_store::ConfigStore;
pub use logging::init_logging;
pub use platform::{MemoryStorage, NativeStorage, Storage, StorageError, StorageKey};
pub use repository::{Repository, RepositoryError};
