//! Funnel financial calculator
//!
//! Models a lead-to-profit marketing funnel: seven base inputs (leads, spend,
//! conversion rates and unit economics) and the values derived from them.
//! The calculator works in both directions:
//!
//! - [`evaluate`] computes every derived value from the inputs
//! - [`solve`] takes an edit of a derived value and rewrites the single base
//!   input that explains it
//!
//! # Example
//!
//! ```
//! use orderly_core::funnel::{DerivedField, FunnelInputs, evaluate, solve};
//!
//! let inputs = FunnelInputs {
//!     leads: 1_000.0,
//!     ad_spend: 20_000.0,
//!     confirmation_rate: 60.0,
//!     delivery_rate: 50.0,
//!     selling_price: 250.0,
//!     product_cost: 100.0,
//!     shipping_fee: 40.0,
//! };
//! assert!((evaluate(&inputs).roi - 26.0).abs() < 1e-9);
//!
//! let solved = solve(&inputs, DerivedField::CostPerLead, 25.0);
//! assert_eq!(solved.ad_spend, 25_000.0);
//! ```

mod edit;
mod evaluate;
mod model;
mod solve;
mod sweep;

pub use edit::{EditEffect, FieldEdit, apply_edit, parse_field_value};
pub use evaluate::evaluate;
pub use model::{
    BaseField, DerivedField, FunnelDerived, FunnelField, FunnelInputs, UnknownFieldError,
};
pub use solve::{SolveOutcome, UnchangedReason, solve, solve_checked};
pub use sweep::{SweepAxis, SweepGrid, SweepPoint, break_even_selling_price, sweep};

use serde::Serialize;

/// One line of the funnel table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportRow {
    pub key: &'static str,
    pub label: &'static str,
    pub value: f64,
    pub derived: bool,
    pub percentage: bool,
}

/// Inputs together with their derived values, as shown to the operator
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FunnelReport {
    pub inputs: FunnelInputs,
    pub derived: FunnelDerived,
}

impl FunnelReport {
    #[must_use]
    pub fn new(inputs: FunnelInputs) -> Self {
        Self {
            inputs,
            derived: evaluate(&inputs),
        }
    }

    /// Base rows first, then derived rows, each in declaration order
    #[must_use]
    pub fn rows(&self) -> Vec<ReportRow> {
        let base = BaseField::ALL.iter().map(|f| ReportRow {
            key: f.key(),
            label: f.label(),
            value: self.inputs.get(*f),
            derived: false,
            percentage: f.is_percentage(),
        });
        let derived = DerivedField::ALL.iter().map(|f| ReportRow {
            key: f.key(),
            label: f.label(),
            value: self.derived.get(*f),
            derived: true,
            percentage: f.is_percentage(),
        });
        base.chain(derived).collect()
    }
}
