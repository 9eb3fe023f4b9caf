//! Cross-module tests for the back-office library
//!
//! Tests are organized by topic:
//! - `funnel` - Forward evaluation and inverse solving of the funnel calculator
//! - `orders` - Order book, statistics and the order-to-funnel bridge
//! - `settings` - Settings defaults and partial-document merging

mod funnel;
mod orders;
