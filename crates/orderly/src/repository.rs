//! Loading and saving the back-office documents.
//!
//! Operations that touch more than one document live here, so that the order
//! book and the catalog never disagree about reserved stock: an order holds
//! its units while it is confirmed and not returned.

use orderly_core::funnel::FunnelInputs;
use orderly_core::model::{
    ConfirmationStatus, Order, OrderId, OrderStatus, ReturnStatus, StatusUpdate,
};
use orderly_core::{Catalog, NewOrder, OrderBook, OrderError, UserDirectory};
use serde::Serialize;

use crate::config_store::ConfigStore;
use crate::platform::{Storage, StorageError, StorageKey, load_document, save_document};

/// Error types for repository operations
#[derive(Debug)]
pub enum RepositoryError {
    Storage(StorageError),
    Order(OrderError),
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryError::Storage(e) => write!(f, "{e}"),
            RepositoryError::Order(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RepositoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RepositoryError::Storage(e) => Some(e),
            RepositoryError::Order(e) => Some(e),
        }
    }
}

impl From<StorageError> for RepositoryError {
    fn from(e: StorageError) -> Self {
        RepositoryError::Storage(e)
    }
}

impl From<OrderError> for RepositoryError {
    fn from(e: OrderError) -> Self {
        RepositoryError::Order(e)
    }
}

/// Whether an order in this state has its units taken out of stock
fn holds_stock(status: &OrderStatus) -> bool {
    status.confirmation == ConfirmationStatus::Confirmed
        && status.return_status != ReturnStatus::Returned
}

/// Stock side effect of a status change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StockMovement {
    None,
    Reserved,
    Released,
}

/// Result of [`Repository::update_status`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusChange {
    pub order: Order,
    pub previous: OrderStatus,
    pub stock: StockMovement,
}

pub struct Repository<S: Storage> {
    storage: S,
}

impl<S: Storage> Repository<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn config(&self) -> ConfigStore<&S> {
        ConfigStore::new(&self.storage)
    }

    pub fn funnel(&self) -> Result<FunnelInputs, StorageError> {
        load_document(&self.storage, StorageKey::Funnel)
    }

    pub fn save_funnel(&self, inputs: &FunnelInputs) -> Result<(), StorageError> {
        save_document(&self.storage, StorageKey::Funnel, inputs)
    }

    pub fn orders(&self) -> Result<OrderBook, StorageError> {
        load_document(&self.storage, StorageKey::Orders)
    }

    pub fn save_orders(&self, book: &OrderBook) -> Result<(), StorageError> {
        save_document(&self.storage, StorageKey::Orders, book)
    }

    pub fn catalog(&self) -> Result<Catalog, StorageError> {
        load_document(&self.storage, StorageKey::Products)
    }

    pub fn save_catalog(&self, catalog: &Catalog) -> Result<(), StorageError> {
        save_document(&self.storage, StorageKey::Products, catalog)
    }

    pub fn users(&self) -> Result<UserDirectory, StorageError> {
        load_document(&self.storage, StorageKey::Users)
    }

    pub fn save_users(&self, users: &UserDirectory) -> Result<(), StorageError> {
        save_document(&self.storage, StorageKey::Users, users)
    }

    /// Record a new order. Stock is untouched until the order is confirmed.
    pub fn add_order(&self, new: NewOrder) -> Result<Order, RepositoryError> {
        let catalog = self.catalog()?;
        if let Some(line) = new.lines.iter().find(|l| catalog.get(l.product_id).is_none()) {
            return Err(OrderError::ProductNotFound(line.product_id).into());
        }

        let mut book = self.orders()?;
        let id = book.add(new)?;
        let order = book.get(id).cloned().ok_or(OrderError::OrderNotFound(id))?;
        self.save_orders(&book)?;
        tracing::info!(order = %id, reference = %order.reference, "Order added");
        Ok(order)
    }

    /// Apply a status update, moving stock when the order starts or stops
    /// holding units. A reservation that cannot be met leaves everything as it
    /// was.
    pub fn update_status(
        &self,
        id: OrderId,
        update: StatusUpdate,
    ) -> Result<StatusChange, RepositoryError> {
        let mut book = self.orders()?;
        let previous = book.update_status(id, update)?;
        let order = book.get(id).cloned().ok_or(OrderError::OrderNotFound(id))?;

        let stock = match (holds_stock(&previous), holds_stock(&order.status)) {
            (false, true) => StockMovement::Reserved,
            (true, false) => StockMovement::Released,
            _ => StockMovement::None,
        };

        if stock != StockMovement::None {
            let mut catalog = self.catalog()?;
            let moved = match stock {
                StockMovement::Reserved => catalog.reserve(&order),
                _ => catalog.release(&order),
            };
            moved.inspect_err(|e| tracing::warn!(order = %id, "Status change refused: {e}"))?;
            self.save_catalog(&catalog)?;
        }
        self.save_orders(&book)?;

        tracing::info!(order = %id, ?stock, "Order status updated");
        Ok(StatusChange {
            order,
            previous,
            stock,
        })
    }

    /// Delete an order, returning any stock it held
    pub fn remove_order(&self, id: OrderId) -> Result<Order, RepositoryError> {
        let mut book = self.orders()?;
        let order = book.remove(id)?;
        if holds_stock(&order.status) {
            let mut catalog = self.catalog()?;
            catalog.release(&order)?;
            self.save_catalog(&catalog)?;
        }
        self.save_orders(&book)?;
        tracing::info!(order = %id, "Order removed");
        Ok(order)
    }
}
