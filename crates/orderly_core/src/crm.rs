//! Client view derived from the order book
//!
//! Clients are not stored separately. Orders are grouped by normalized phone
//! number, which is the one contact detail every storefront captures.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::messaging::normalize_phone;
use crate::model::Order;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientSummary {
    /// Normalized phone number identifying the client
    pub phone: String,
    /// Name on the most recent order
    pub name: String,
    pub city: String,
    pub orders: usize,
    pub delivered: usize,
    pub returned: usize,
    /// Order totals of delivered, non-returned orders
    pub lifetime_value: f64,
    pub last_order_on: jiff::civil::Date,
}

impl ClientSummary {
    /// Share of the client's orders that were delivered, in percent
    pub fn delivery_rate(&self) -> f64 {
        if self.orders == 0 {
            0.0
        } else {
            self.delivered as f64 / self.orders as f64 * 100.0
        }
    }

    /// Group orders by client, most valuable client first.
    /// Orders without a phone number are skipped.
    pub fn aggregate<'a>(
        orders: impl IntoIterator<Item = &'a Order>,
        country_code: &str,
    ) -> Vec<ClientSummary> {
        let mut by_phone: FxHashMap<String, ClientSummary> = FxHashMap::default();

        for order in orders {
            let phone = normalize_phone(&order.client.phone, country_code);
            if phone.is_empty() {
                continue;
            }
            let summary = by_phone
                .entry(phone.clone())
                .or_insert_with(|| ClientSummary {
                    phone,
                    name: order.client.name.clone(),
                    city: order.client.city.clone(),
                    orders: 0,
                    delivered: 0,
                    returned: 0,
                    lifetime_value: 0.0,
                    last_order_on: order.created_on,
                });

            summary.orders += 1;
            if order.is_delivered() {
                summary.delivered += 1;
            }
            if order.is_returned() {
                summary.returned += 1;
            } else if order.is_delivered() {
                summary.lifetime_value += order.total();
            }
            if order.created_on >= summary.last_order_on {
                summary.last_order_on = order.created_on;
                summary.name = order.client.name.clone();
                summary.city = order.client.city.clone();
            }
        }

        let mut clients: Vec<ClientSummary> = by_phone.into_values().collect();
        clients.sort_by(|a, b| {
            b.lifetime_value
                .total_cmp(&a.lifetime_value)
                .then_with(|| a.phone.cmp(&b.phone))
        });
        clients
    }
}
