use clap::Subcommand;
use color_eyre::eyre::{OptionExt, bail};
use orderly_core::margin::{UnitMargin, unit_margin};
use orderly_core::Catalog;
use orderly_core::model::{Product, ProductId};
use orderly_core::settings::Currency;
use serde::Serialize;

use super::Output;
use crate::platform::Storage;
use crate::repository::Repository;
use crate::util::format::{format_table, format_value};

#[derive(Subcommand, Debug)]
pub enum ProductsCommand {
    /// Add a product to the catalog
    Add {
        #[arg(long)]
        sku: String,
        #[arg(long)]
        name: String,
        /// Selling price per unit
        #[arg(long)]
        price: f64,
        /// Cost of goods per unit
        #[arg(long)]
        cost: f64,
        /// Units on hand
        #[arg(long, default_value_t = 0)]
        stock: i64,
        /// Stock level at or below which the product is flagged
        #[arg(long)]
        low_stock: Option<i64>,
    },
    /// List products
    List {
        /// Only products at or below their low-stock threshold
        #[arg(long)]
        low: bool,
    },
    /// Add received units to stock
    Restock { sku: String, units: u32 },
    /// Correct the stock level by a signed number of units
    Adjust {
        sku: String,
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Per-unit margin after shipping and the configured overheads
    Margin {
        sku: String,
        /// Shipping cost per unit carried by the business
        #[arg(long, default_value_t = 0.0)]
        shipping: f64,
    },
}

#[derive(Debug, Serialize)]
struct StockLevel {
    sku: String,
    stock: i64,
}

#[derive(Debug, Serialize)]
struct MarginReport {
    sku: String,
    #[serde(flatten)]
    margin: UnitMargin,
}

pub fn run<S: Storage>(
    repo: &Repository<S>,
    cmd: ProductsCommand,
    out: &Output,
) -> color_eyre::Result<String> {
    let mut catalog = repo.catalog()?;
    let currency = repo.config().load()?.currency;

    match cmd {
        ProductsCommand::Add {
            sku,
            name,
            price,
            cost,
            stock,
            low_stock,
        } => {
            if sku.trim().is_empty() {
                bail!("a product needs a SKU");
            }
            let id = catalog.add(&sku, &name, price, cost, stock)?;
            if let Some(threshold) = low_stock {
                catalog.set_low_stock_threshold(id, threshold)?;
            }
            repo.save_catalog(&catalog)?;
            tracing::info!(product = %id, sku = %sku, "Product added");
            let product = catalog.get(id).ok_or_eyre("product vanished after insert")?;
            out.render(product, |p| {
                format!("Added product {} ({}) {}", p.id, p.sku, p.name)
            })
        }
        ProductsCommand::List { low } => {
            let products: Vec<&Product> = if low {
                catalog.low_stock().collect()
            } else {
                catalog.products().iter().collect()
            };
            out.render(&products, |products| {
                let mut text = render_products(products, currency);
                text.push_str(&format!(
                    "\n\nStock value at cost: {}",
                    currency.format(catalog.stock_value())
                ));
                text
            })
        }
        ProductsCommand::Restock { sku, units } => {
            let id = find(&catalog, &sku)?;
            let stock = catalog.restock(id, units)?;
            repo.save_catalog(&catalog)?;
            tracing::info!(product = %id, units, stock, "Restocked");
            out.render(&StockLevel { sku, stock }, |s| {
                format!("{} now has {} units", s.sku, s.stock)
            })
        }
        ProductsCommand::Adjust { sku, delta } => {
            let id = find(&catalog, &sku)?;
            let stock = catalog.adjust_stock(id, delta)?;
            repo.save_catalog(&catalog)?;
            tracing::info!(product = %id, delta, stock, "Stock adjusted");
            out.render(&StockLevel { sku, stock }, |s| {
                format!("{} now has {} units", s.sku, s.stock)
            })
        }
        ProductsCommand::Margin { sku, shipping } => {
            let id = find(&catalog, &sku)?;
            let product = catalog.get(id).ok_or_eyre("product not found")?;
            let overheads = repo.config().load()?.cost_structure;
            let report = MarginReport {
                sku: product.sku.clone(),
                margin: unit_margin(product.selling_price, product.cost, shipping, &overheads),
            };
            out.render(&report, |r| {
                format!(
                    "{}: revenue {}, costs {}, margin {} ({})",
                    r.sku,
                    currency.format(r.margin.revenue),
                    currency.format(r.margin.costs),
                    currency.format(r.margin.margin),
                    format_value(r.margin.margin_rate, true)
                )
            })
        }
    }
}

fn find(catalog: &Catalog, sku: &str) -> color_eyre::Result<ProductId> {
    catalog
        .find_by_sku(sku)
        .map(|p| p.id)
        .ok_or_eyre(format!("no product with SKU '{sku}'"))
}

fn render_products(products: &[&Product], currency: Currency) -> String {
    if products.is_empty() {
        return "No products".to_string();
    }
    let rows: Vec<Vec<String>> = products
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.sku.clone(),
                p.name.clone(),
                currency.format(p.selling_price),
                currency.format(p.cost),
                p.stock.to_string(),
                if p.is_low_on_stock() { "low" } else { "" }.to_string(),
            ]
        })
        .collect();
    format_table(&["Id", "SKU", "Name", "Price", "Cost", "Stock", ""], &rows)
}
