//! Catalog products and stock levels

use serde::{Deserialize, Serialize};

use super::ids::ProductId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub selling_price: f64,
    /// Cost of goods per unit
    pub cost: f64,
    /// Units on hand. Signed so a manual correction can be recorded even
    /// when the books were already wrong.
    #[serde(default)]
    pub stock: i64,
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
}

fn default_low_stock_threshold() -> i64 {
    5
}

impl Product {
    pub fn new(id: ProductId, sku: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            sku: sku.into(),
            name: name.into(),
            selling_price: 0.0,
            cost: 0.0,
            stock: 0,
            low_stock_threshold: default_low_stock_threshold(),
        }
    }

    pub fn is_low_on_stock(&self) -> bool {
        self.stock <= self.low_stock_threshold
    }

    /// Value of the units on hand at cost
    pub fn stock_value(&self) -> f64 {
        self.stock.max(0) as f64 * self.cost
    }
}
