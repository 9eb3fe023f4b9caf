//! Inverse solver for the funnel.
//!
//! Editing a derived value changes exactly one base input (see
//! [`DerivedField::solves_for`]) so that re-evaluating the model reproduces the
//! edited value. All other inputs stay as they are.
//!
//! An inversion that would divide by an empty intermediate (no leads, no
//! confirmed orders, no delivered orders) leaves the inputs untouched. This is
//! reported as [`SolveOutcome::Unchanged`] by [`solve_checked`]; [`solve`]
//! simply returns the current inputs.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::model::{DerivedField, FunnelInputs};

/// Why an edit was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnchangedReason {
    NoLeads,
    NoConfirmedOrders,
    NoDeliveredOrders,
    NonFiniteValue,
}

impl fmt::Display for UnchangedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnchangedReason::NoLeads => write!(f, "there are no leads"),
            UnchangedReason::NoConfirmedOrders => write!(f, "no orders are confirmed"),
            UnchangedReason::NoDeliveredOrders => write!(f, "no orders are delivered"),
            UnchangedReason::NonFiniteValue => write!(f, "the value is not a finite number"),
        }
    }
}

/// Result of inverting a single edit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolveOutcome {
    Applied(FunnelInputs),
    Unchanged(UnchangedReason),
}

impl SolveOutcome {
    /// The inputs to keep: the solved ones, or `current` when the edit was refused
    #[must_use]
    pub fn into_inputs(self, current: &FunnelInputs) -> FunnelInputs {
        match self {
            SolveOutcome::Applied(inputs) => inputs,
            SolveOutcome::Unchanged(_) => *current,
        }
    }

    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, SolveOutcome::Applied(_))
    }
}

fn nonzero(value: f64, reason: UnchangedReason) -> Result<f64, UnchangedReason> {
    if value == 0.0 { Err(reason) } else { Ok(value) }
}

/// Selling price that yields `unit_profit` once COGS, shipping and the ad spend
/// share of each delivered order are covered
fn price_for_unit_profit(current: &FunnelInputs, unit_profit: f64, delivered: f64) -> f64 {
    let cost_per_delivery = current.ad_spend / delivered;
    unit_profit + current.product_cost + current.shipping_fee + cost_per_delivery
}

fn solved_value(
    current: &FunnelInputs,
    edited: DerivedField,
    new_value: f64,
) -> Result<f64, UnchangedReason> {
    if !new_value.is_finite() {
        return Err(UnchangedReason::NonFiniteValue);
    }

    let value = match edited {
        DerivedField::CostPerLead => new_value * current.leads,
        DerivedField::OrdersConfirmed => {
            let leads = nonzero(current.leads, UnchangedReason::NoLeads)?;
            new_value / leads * 100.0
        }
        DerivedField::OrdersDelivered => {
            let confirmed = nonzero(current.confirmed(), UnchangedReason::NoConfirmedOrders)?;
            new_value / confirmed * 100.0
        }
        DerivedField::CostPerDelivery => new_value * current.delivered(),
        DerivedField::TotalRevenue => {
            let delivered = nonzero(current.delivered(), UnchangedReason::NoDeliveredOrders)?;
            new_value / delivered
        }
        DerivedField::TotalCogs => {
            let delivered = nonzero(current.delivered(), UnchangedReason::NoDeliveredOrders)?;
            new_value / delivered
        }
        DerivedField::TotalShipping => {
            let delivered = nonzero(current.delivered(), UnchangedReason::NoDeliveredOrders)?;
            new_value / delivered
        }
        DerivedField::ProfitPerUnit => {
            let delivered = nonzero(current.delivered(), UnchangedReason::NoDeliveredOrders)?;
            price_for_unit_profit(current, new_value, delivered)
        }
        DerivedField::TotalProfit => {
            let delivered = nonzero(current.delivered(), UnchangedReason::NoDeliveredOrders)?;
            price_for_unit_profit(current, new_value / delivered, delivered)
        }
        DerivedField::Investment => new_value - current.product_cost * current.delivered(),
        DerivedField::Roi => {
            let delivered = nonzero(current.delivered(), UnchangedReason::NoDeliveredOrders)?;
            let investment = current.ad_spend + current.product_cost * delivered;
            let total_profit = new_value / 100.0 * investment;
            price_for_unit_profit(current, total_profit / delivered, delivered)
        }
    };

    Ok(value)
}

/// Invert an edit of a derived value, reporting refused edits
#[must_use]
pub fn solve_checked(current: &FunnelInputs, edited: DerivedField, new_value: f64) -> SolveOutcome {
    match solved_value(current, edited, new_value) {
        Ok(value) => SolveOutcome::Applied(current.with(edited.solves_for(), value)),
        Err(reason) => SolveOutcome::Unchanged(reason),
    }
}

/// Invert an edit of a derived value.
///
/// Returns `current` unchanged when the inverse is undefined.
#[must_use]
pub fn solve(current: &FunnelInputs, edited: DerivedField, new_value: f64) -> FunnelInputs {
    solve_checked(current, edited, new_value).into_inputs(current)
}
