//! Forward evaluation of the funnel.
//!
//! Every ratio whose denominator is zero evaluates to 0 rather than NaN or
//! infinity, so the output is always finite for finite inputs.

use super::model::{FunnelDerived, FunnelInputs};

/// `numerator / denominator`, or 0 when the denominator is zero
#[inline]
pub(crate) fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Compute every derived value from the base inputs
#[must_use]
pub fn evaluate(inputs: &FunnelInputs) -> FunnelDerived {
    let orders_confirmed = inputs.confirmed();
    let orders_delivered = inputs.delivered();

    let total_revenue = orders_delivered * inputs.selling_price;
    let total_cogs = orders_delivered * inputs.product_cost;
    let total_shipping = orders_delivered * inputs.shipping_fee;
    let total_profit = total_revenue - total_cogs - total_shipping - inputs.ad_spend;
    let investment = inputs.ad_spend + total_cogs;

    FunnelDerived {
        cost_per_lead: ratio_or_zero(inputs.ad_spend, inputs.leads),
        orders_confirmed,
        orders_delivered,
        cost_per_delivery: ratio_or_zero(inputs.ad_spend, orders_delivered),
        total_revenue,
        total_cogs,
        total_shipping,
        total_profit,
        profit_per_unit: ratio_or_zero(total_profit, orders_delivered),
        investment,
        roi: ratio_or_zero(total_profit, investment) * 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_funnel_is_all_zero() {
        let derived = evaluate(&FunnelInputs::default());
        assert_eq!(derived, FunnelDerived::default());
    }

    #[test]
    fn test_spend_without_leads_keeps_ratios_finite() {
        let inputs = FunnelInputs {
            ad_spend: 500.0,
            selling_price: 100.0,
            ..Default::default()
        };
        let derived = evaluate(&inputs);
        assert_eq!(derived.cost_per_lead, 0.0);
        assert_eq!(derived.cost_per_delivery, 0.0);
        assert_eq!(derived.profit_per_unit, 0.0);
        assert_eq!(derived.total_profit, -500.0);
        assert_eq!(derived.investment, 500.0);
        assert_eq!(derived.roi, -100.0);
    }
}
