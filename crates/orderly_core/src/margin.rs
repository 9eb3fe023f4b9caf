//! Per-unit margin with overheads from the cost structure.

use serde::Serialize;

use crate::settings::CostStructure;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitMargin {
    pub revenue: f64,
    /// Product cost, shipping and per-unit overheads
    pub costs: f64,
    pub margin: f64,
    /// Margin as a percent of revenue, 0 when there is no revenue
    pub margin_rate: f64,
}

pub fn unit_margin(
    selling_price: f64,
    product_cost: f64,
    shipping_fee: f64,
    overheads: &CostStructure,
) -> UnitMargin {
    let costs = product_cost + shipping_fee + overheads.per_unit();
    let margin = selling_price - costs;
    UnitMargin {
        revenue: selling_price,
        costs,
        margin,
        margin_rate: if selling_price == 0.0 {
            0.0
        } else {
            margin / selling_price * 100.0
        },
    }
}
