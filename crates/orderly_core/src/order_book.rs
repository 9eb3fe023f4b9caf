//! The order book: every order the back-office knows about, in intake order.

use serde::{Deserialize, Serialize};

use crate::error::{OrderError, Result};
use crate::model::{
    ClientContact, ConfirmationStatus, DeliveryStatus, Order, OrderId, OrderLine, OrderSource,
    OrderStatus, PickupStatus, RefundStatus, ReturnStatus, StatusUpdate,
};

/// Everything needed to record a new order; the book assigns the id
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    /// Storefront reference. Left empty, one is generated from the id.
    pub reference: String,
    pub client: ClientContact,
    pub lines: Vec<OrderLine>,
    pub shipping_fee: f64,
    pub source: OrderSource,
    pub created_on: jiff::civil::Date,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderBook {
    orders: Vec<Order>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    fn next_id(&self) -> OrderId {
        OrderId(self.orders.iter().map(|o| o.id.0).max().unwrap_or(0) + 1)
    }

    /// Record a new order with fresh statuses
    pub fn add(&mut self, new: NewOrder) -> Result<OrderId> {
        if new.lines.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        let id = self.next_id();
        let reference = match new.reference.trim() {
            "" => format!("ORD-{:05}", id.0),
            given => given.to_string(),
        };
        if self
            .orders
            .iter()
            .any(|o| o.reference.eq_ignore_ascii_case(&reference))
        {
            return Err(OrderError::DuplicateReference(reference));
        }

        self.orders.push(Order {
            id,
            reference,
            client: new.client,
            lines: new.lines,
            shipping_fee: new.shipping_fee,
            source: new.source,
            created_on: new.created_on,
            note: new.note,
            status: OrderStatus::default(),
        });
        Ok(id)
    }

    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: OrderId) -> Option<&mut Order> {
        self.orders.iter_mut().find(|o| o.id == id)
    }

    pub fn find_by_reference(&self, reference: &str) -> Option<&Order> {
        self.orders
            .iter()
            .find(|o| o.reference.eq_ignore_ascii_case(reference.trim()))
    }

    pub fn remove(&mut self, id: OrderId) -> Result<Order> {
        let index = self
            .orders
            .iter()
            .position(|o| o.id == id)
            .ok_or(OrderError::OrderNotFound(id))?;
        Ok(self.orders.remove(index))
    }

    /// Overwrite status fields of an order. Returns the status it had before.
    pub fn update_status(&mut self, id: OrderId, update: StatusUpdate) -> Result<OrderStatus> {
        let order = self.get_mut(id).ok_or(OrderError::OrderNotFound(id))?;
        let previous = order.status;
        order.apply(update);
        Ok(previous)
    }

    pub fn filter<'a>(&'a self, filter: &'a OrderFilter) -> impl Iterator<Item = &'a Order> + 'a {
        self.orders.iter().filter(move |o| filter.matches(o))
    }
}

/// Criteria an order must meet to be listed. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderFilter {
    pub confirmation: Option<ConfirmationStatus>,
    pub pickup: Option<PickupStatus>,
    pub delivery: Option<DeliveryStatus>,
    pub refund: Option<RefundStatus>,
    pub return_status: Option<ReturnStatus>,
    pub source: Option<OrderSource>,
    /// Inclusive lower bound on the creation date
    pub from: Option<jiff::civil::Date>,
    /// Inclusive upper bound on the creation date
    pub to: Option<jiff::civil::Date>,
    /// Case-insensitive substring of reference, client name, phone or city
    pub query: Option<String>,
}

fn matches_opt<T: PartialEq>(wanted: Option<T>, actual: T) -> bool {
    wanted.is_none_or(|w| w == actual)
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        let status = &order.status;
        matches_opt(self.confirmation, status.confirmation)
            && matches_opt(self.pickup, status.pickup)
            && matches_opt(self.delivery, status.delivery)
            && matches_opt(self.refund, status.refund)
            && matches_opt(self.return_status, status.return_status)
            && matches_opt(self.source, order.source)
            && self.from.is_none_or(|from| order.created_on >= from)
            && self.to.is_none_or(|to| order.created_on <= to)
            && self.matches_query(order)
    }

    fn matches_query(&self, order: &Order) -> bool {
        let Some(query) = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
            return true;
        };
        let needle = query.to_lowercase();
        [
            order.reference.as_str(),
            order.client.name.as_str(),
            order.client.phone.as_str(),
            order.client.city.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductId;

    fn new_order(reference: &str) -> NewOrder {
        NewOrder {
            reference: reference.into(),
            client: ClientContact {
                name: "Youssef".into(),
                phone: "0612345678".into(),
                city: "Rabat".into(),
                address: String::new(),
            },
            lines: vec![OrderLine {
                product_id: ProductId(1),
                quantity: 1,
                unit_price: 199.0,
            }],
            shipping_fee: 0.0,
            source: OrderSource::Manual,
            created_on: jiff::civil::date(2024, 5, 10),
            note: None,
        }
    }

    #[test]
    fn test_add_assigns_sequential_ids_and_references() {
        let mut book = OrderBook::new();
        let first = book.add(new_order("")).unwrap();
        let second = book.add(new_order("SHOP-77")).unwrap();
        assert_eq!(first, OrderId(1));
        assert_eq!(second, OrderId(2));
        assert_eq!(book.get(first).unwrap().reference, "ORD-00001");
        assert_eq!(book.find_by_reference("shop-77").unwrap().id, second);
    }

    #[test]
    fn test_add_rejects_duplicates_and_empty_orders() {
        let mut book = OrderBook::new();
        book.add(new_order("A-1")).unwrap();
        assert_eq!(
            book.add(new_order("a-1")),
            Err(OrderError::DuplicateReference("a-1".into()))
        );

        let mut empty = new_order("A-2");
        empty.lines.clear();
        assert_eq!(book.add(empty), Err(OrderError::EmptyOrder));
    }

    #[test]
    fn test_next_id_follows_highest_existing_id() {
        let mut book = OrderBook::new();
        book.add(new_order("A")).unwrap();
        let second = book.add(new_order("B")).unwrap();
        book.remove(OrderId(1)).unwrap();
        let third = book.add(new_order("C")).unwrap();
        assert_eq!(third, OrderId(second.0 + 1));
        assert_eq!(book.remove(OrderId(1)), Err(OrderError::OrderNotFound(OrderId(1))));
    }

    #[test]
    fn test_update_status_returns_previous() {
        let mut book = OrderBook::new();
        let id = book.add(new_order("")).unwrap();
        let previous = book
            .update_status(
                id,
                StatusUpdate {
                    confirmation: Some(ConfirmationStatus::Cancelled),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(previous.confirmation, ConfirmationStatus::New);
        assert_eq!(
            book.get(id).unwrap().status.confirmation,
            ConfirmationStatus::Cancelled
        );
    }

    #[test]
    fn test_filter_by_query_and_dates() {
        let mut book = OrderBook::new();
        book.add(new_order("A")).unwrap();
        let mut later = new_order("B");
        later.client.city = "Casablanca".into();
        later.created_on = jiff::civil::date(2024, 6, 1);
        book.add(later).unwrap();

        let filter = OrderFilter {
            query: Some("casa".into()),
            ..Default::default()
        };
        assert_eq!(book.filter(&filter).count(), 1);

        let filter = OrderFilter {
            from: Some(jiff::civil::date(2024, 5, 10)),
            to: Some(jiff::civil::date(2024, 5, 31)),
            ..Default::default()
        };
        let refs: Vec<&str> = book.filter(&filter).map(|o| o.reference.as_str()).collect();
        assert_eq!(refs, vec!["A"]);

        assert_eq!(book.filter(&OrderFilter::default()).count(), 2);
    }
}
