//! Order-management back-office library
//!
//! This crate holds the domain logic of the OrderSync back-office, with no I/O:
//! - Funnel financial calculator with forward evaluation and inverse solving
//! - Orders with five independent status fields (confirmation, pickup,
//!   delivery, refund, return), filtering and dashboard statistics
//! - Product catalog with stock bookkeeping
//! - Client summaries derived from the order book
//! - Users and roles
//! - Settings: currency, status colors, message templates, cost structure
//! - Storefront integration settings (Shopify, WooCommerce, YouCan, Google Sheets)
//! - WhatsApp message templates and deep links

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod catalog;
pub mod crm;
pub mod directory;
pub mod error;
pub mod funnel;
pub mod margin;
pub mod messaging;
pub mod order_book;
pub mod stats;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod integrations;
pub mod model;
pub mod settings;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use catalog::Catalog;
pub use crm::ClientSummary;
pub use directory::UserDirectory;
pub use error::{IntegrationError, OrderError, ParseEnumError};
pub use funnel::{DerivedField, FunnelDerived, FunnelInputs, evaluate, solve};
pub use integrations::{Platform, PlatformSettings};
pub use order_book::{NewOrder, OrderBook, OrderFilter};
pub use settings::AppSettings;
pub use stats::OrderStats;
