//! Product catalog and stock bookkeeping.

use serde::{Deserialize, Serialize};

use crate::error::{OrderError, Result};
use crate::model::{Order, Product, ProductId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn find_by_sku(&self, sku: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.sku.eq_ignore_ascii_case(sku.trim()))
    }

    /// Add a product under the next free id. SKUs are unique, case-insensitively.
    pub fn add(
        &mut self,
        sku: &str,
        name: &str,
        selling_price: f64,
        cost: f64,
        stock: i64,
    ) -> Result<ProductId> {
        if self.find_by_sku(sku).is_some() {
            return Err(OrderError::DuplicateSku(sku.trim().to_string()));
        }
        let id = ProductId(self.products.iter().map(|p| p.id.0).max().unwrap_or(0) + 1);
        let mut product = Product::new(id, sku.trim(), name.trim());
        product.selling_price = selling_price;
        product.cost = cost;
        product.stock = stock;
        self.products.push(product);
        Ok(id)
    }

    fn get_mut(&mut self, id: ProductId) -> Result<&mut Product> {
        self.products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(OrderError::ProductNotFound(id))
    }

    pub fn set_low_stock_threshold(&mut self, id: ProductId, threshold: i64) -> Result<()> {
        self.get_mut(id)?.low_stock_threshold = threshold;
        Ok(())
    }

    /// Add received units to stock. Returns the new stock level.
    pub fn restock(&mut self, id: ProductId, units: u32) -> Result<i64> {
        let product = self.get_mut(id)?;
        product.stock += i64::from(units);
        Ok(product.stock)
    }

    /// Move stock by `delta`, refusing to go below zero.
    /// Returns the new stock level.
    pub fn adjust_stock(&mut self, id: ProductId, delta: i64) -> Result<i64> {
        let product = self.get_mut(id)?;
        let next = product.stock + delta;
        if next < 0 {
            return Err(OrderError::InsufficientStock {
                product_id: id,
                available: product.stock,
                requested: -delta,
            });
        }
        product.stock = next;
        Ok(next)
    }

    /// Take the order's units out of stock. All lines are checked before any
    /// stock moves, so a failed reservation changes nothing.
    pub fn reserve(&mut self, order: &Order) -> Result<()> {
        for line in &order.lines {
            let product = self
                .get(line.product_id)
                .ok_or(OrderError::ProductNotFound(line.product_id))?;
            let requested = units_requested(order, line.product_id);
            if product.stock < requested {
                return Err(OrderError::InsufficientStock {
                    product_id: line.product_id,
                    available: product.stock,
                    requested,
                });
            }
        }
        for line in &order.lines {
            self.adjust_stock(line.product_id, -i64::from(line.quantity))?;
        }
        Ok(())
    }

    /// Put the order's units back into stock
    pub fn release(&mut self, order: &Order) -> Result<()> {
        for line in &order.lines {
            self.get_mut(line.product_id)?;
        }
        for line in &order.lines {
            self.adjust_stock(line.product_id, i64::from(line.quantity))?;
        }
        Ok(())
    }

    pub fn low_stock(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.is_low_on_stock())
    }

    /// Value of all stock on hand at cost
    pub fn stock_value(&self) -> f64 {
        self.products.iter().map(Product::stock_value).sum()
    }
}

/// Total units of `product_id` across the order's lines
fn units_requested(order: &Order, product_id: ProductId) -> i64 {
    order
        .lines
        .iter()
        .filter(|l| l.product_id == product_id)
        .map(|l| i64::from(l.quantity))
        .sum()
}
