//! Unique identifiers for back-office entities
//!
//! Each entity type has its own ID type so an order id can never be passed
//! where a product id is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseEnumError;

/// Unique identifier for an Order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u32);

/// Unique identifier for a Product in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(pub u32);

/// Unique identifier for a back-office User
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub u16);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U{}", self.0)
    }
}

/// Digits of an id written with or without its display prefix (`#12`, `P3`, `U2`)
fn id_digits(s: &str, prefix: char) -> &str {
    let s = s.trim();
    s.strip_prefix(prefix)
        .or_else(|| s.strip_prefix(prefix.to_ascii_lowercase()))
        .unwrap_or(s)
}

impl FromStr for OrderId {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        id_digits(s, '#')
            .parse()
            .map(OrderId)
            .map_err(|_| ParseEnumError::new("order id", s))
    }
}

impl FromStr for ProductId {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        id_digits(s, 'P')
            .parse()
            .map(ProductId)
            .map_err(|_| ParseEnumError::new("product id", s))
    }
}

impl FromStr for UserId {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        id_digits(s, 'U')
            .parse()
            .map(UserId)
            .map_err(|_| ParseEnumError::new("user id", s))
    }
}
