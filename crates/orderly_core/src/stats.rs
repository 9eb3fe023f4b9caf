//! Dashboard statistics over a set of orders.

use serde::Serialize;

use crate::funnel::FunnelInputs;
use crate::model::{
    ConfirmationStatus, DeliveryStatus, Order, PickupStatus, RefundStatus, ReturnStatus,
};

/// Counts of orders in each variant of a status field, in declaration order
pub type StatusCounts<T> = Vec<(T, usize)>;

fn count_by<T: Copy + PartialEq>(
    orders: &[&Order],
    all: &[T],
    key: impl Fn(&Order) -> T,
) -> StatusCounts<T> {
    all.iter()
        .map(|variant| {
            let n = orders.iter().filter(|o| key(o) == *variant).count();
            (*variant, n)
        })
        .collect()
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderStats {
    pub total: usize,
    pub confirmed: usize,
    pub delivered: usize,
    /// Confirmed orders that also reached the customer
    pub confirmed_and_delivered: usize,
    pub returned: usize,
    /// Percent of all orders that were confirmed
    pub confirmation_rate: f64,
    /// Percent of confirmed orders that were delivered
    pub delivery_rate: f64,
    /// Order totals of delivered orders
    pub delivered_revenue: f64,
    /// Order totals of delivered orders the carrier has not paid out yet
    pub pending_payout: f64,
    pub by_confirmation: StatusCounts<ConfirmationStatus>,
    pub by_pickup: StatusCounts<PickupStatus>,
    pub by_delivery: StatusCounts<DeliveryStatus>,
    pub by_refund: StatusCounts<RefundStatus>,
    pub by_return: StatusCounts<ReturnStatus>,
}

impl OrderStats {
    pub fn compute<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Self {
        let orders: Vec<&Order> = orders.into_iter().collect();

        let confirmed = orders.iter().filter(|o| o.is_confirmed()).count();
        let delivered = orders.iter().filter(|o| o.is_delivered()).count();
        let confirmed_and_delivered = orders
            .iter()
            .filter(|o| o.is_confirmed() && o.is_delivered())
            .count();
        let returned = orders.iter().filter(|o| o.is_returned()).count();
        let delivered_revenue = orders
            .iter()
            .filter(|o| o.is_delivered())
            .map(|o| o.total())
            .sum();
        let pending_payout = orders
            .iter()
            .filter(|o| o.awaiting_payout())
            .map(|o| o.total())
            .sum();

        Self {
            total: orders.len(),
            confirmed,
            delivered,
            confirmed_and_delivered,
            returned,
            confirmation_rate: percent(confirmed, orders.len()),
            delivery_rate: percent(confirmed_and_delivered, confirmed),
            delivered_revenue,
            pending_payout,
            by_confirmation: count_by(&orders, &ConfirmationStatus::ALL, |o| o.status.confirmation),
            by_pickup: count_by(&orders, &PickupStatus::ALL, |o| o.status.pickup),
            by_delivery: count_by(&orders, &DeliveryStatus::ALL, |o| o.status.delivery),
            by_refund: count_by(&orders, &RefundStatus::ALL, |o| o.status.refund),
            by_return: count_by(&orders, &ReturnStatus::ALL, |o| o.status.return_status),
        }
    }

    /// Average order total among delivered orders, or among all orders when
    /// nothing was delivered yet
    pub fn average_order_value<'a>(orders: impl IntoIterator<Item = &'a Order>) -> f64 {
        let orders: Vec<&Order> = orders.into_iter().collect();
        let delivered: Vec<&&Order> = orders.iter().filter(|o| o.is_delivered()).collect();
        let (sum, n) = if delivered.is_empty() {
            (orders.iter().map(|o| o.total()).sum::<f64>(), orders.len())
        } else {
            (delivered.iter().map(|o| o.total()).sum::<f64>(), delivered.len())
        };
        if n == 0 { 0.0 } else { sum / n as f64 }
    }

    /// Funnel inputs observed in the order book: every order counts as a lead
    /// and the conversion rates are the measured ones.
    pub fn funnel_inputs(
        &self,
        ad_spend: f64,
        selling_price: f64,
        product_cost: f64,
        shipping_fee: f64,
    ) -> FunnelInputs {
        FunnelInputs {
            leads: self.total as f64,
            ad_spend,
            confirmation_rate: self.confirmation_rate,
            delivery_rate: self.delivery_rate,
            selling_price,
            product_cost,
            shipping_fee,
        }
    }
}
