//! Core data model types for the back-office.
//!
//! This module contains plain data types with no I/O:
//! - `ids` - Typed identifiers (OrderId, ProductId, UserId)
//! - `orders` - Orders, order lines, and the five independent status fields
//! - `products` - Catalog products and stock levels
//! - `users` - Users, roles and permissions

mod ids;
mod orders;
mod products;
mod users;

pub use ids::{OrderId, ProductId, UserId};
pub use orders::{
    ClientContact, ConfirmationStatus, DeliveryStatus, Order, OrderLine, OrderSource,
    OrderStatus, PickupStatus, RefundStatus, ReturnStatus, StatusUpdate,
};
pub use products::Product;
pub use users::{Permission, Role, User};
