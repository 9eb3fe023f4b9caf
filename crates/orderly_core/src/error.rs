use std::fmt;

use crate::model::{OrderId, ProductId, UserId};

/// Errors raised by the order book, catalog and user directory
#[derive(Debug, Clone, PartialEq)]
pub enum OrderError {
    OrderNotFound(OrderId),
    ProductNotFound(ProductId),
    UserNotFound(UserId),
    DuplicateReference(String),
    DuplicateSku(String),
    DuplicateEmail(String),
    InsufficientStock {
        product_id: ProductId,
        available: i64,
        requested: i64,
    },
    EmptyOrder,
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderError::OrderNotFound(id) => write!(f, "order {id} not found"),
            OrderError::ProductNotFound(id) => write!(f, "product {id} not found"),
            OrderError::UserNotFound(id) => write!(f, "user {id} not found"),
            OrderError::DuplicateReference(reference) => {
                write!(f, "an order with reference '{reference}' already exists")
            }
            OrderError::DuplicateSku(sku) => {
                write!(f, "a product with SKU '{sku}' already exists")
            }
            OrderError::DuplicateEmail(email) => {
                write!(f, "a user with email '{email}' already exists")
            }
            OrderError::InsufficientStock {
                product_id,
                available,
                requested,
            } => write!(
                f,
                "insufficient stock for product {product_id}: {available} available, {requested} requested"
            ),
            OrderError::EmptyOrder => write!(f, "an order needs at least one line"),
        }
    }
}

impl std::error::Error for OrderError {}

/// Errors raised when validating storefront integration settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrationError {
    MissingField {
        platform: &'static str,
        field: &'static str,
    },
    InvalidStoreUrl(String),
    InvalidServiceAccountEmail(String),
}

impl fmt::Display for IntegrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrationError::MissingField { platform, field } => {
                write!(f, "{platform} integration is missing '{field}'")
            }
            IntegrationError::InvalidStoreUrl(url) => {
                write!(f, "store URL '{url}' must start with https://")
            }
            IntegrationError::InvalidServiceAccountEmail(email) => {
                write!(f, "'{email}' is not a valid service account email")
            }
        }
    }
}

impl std::error::Error for IntegrationError {}

/// Error returned when text does not name a variant of a closed enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

pub type Result<T> = std::result::Result<T, OrderError>;
