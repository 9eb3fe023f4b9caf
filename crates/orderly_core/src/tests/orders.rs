//! Tests for order bookkeeping across modules
//!
//! These tests verify:
//! - Dashboard statistics over a realistic order book
//! - Measured conversion rates feeding the funnel calculator
//! - Message rendering for an order with catalog product names

use crate::catalog::Catalog;
use crate::funnel::evaluate;
use crate::messaging::{TemplateContext, normalize_phone, render_template, whatsapp_link};
use crate::model::{
    ClientContact, ConfirmationStatus, DeliveryStatus, OrderLine, OrderSource, RefundStatus,
    ReturnStatus, StatusUpdate,
};
use crate::order_book::{NewOrder, OrderBook, OrderFilter};
use crate::settings::{AppSettings, MessageCategory};
use crate::stats::OrderStats;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn seed_book(catalog: &mut Catalog) -> OrderBook {
    let scarf = catalog.add("SCARF", "Silk Scarf", 150.0, 60.0, 40).unwrap();
    let bag = catalog.add("BAG", "Leather Bag", 400.0, 180.0, 10).unwrap();

    let mut book = OrderBook::new();
    let clients = [
        ("Hajar", "0600000001", "Rabat"),
        ("Mehdi", "0600000002", "Casablanca"),
        ("Lina", "0600000003", "Agadir"),
        ("Reda", "0600000004", "Fès"),
        ("Sara", "0600000005", "Oujda"),
    ];
    for (i, (name, phone, city)) in clients.iter().enumerate() {
        let product = if i % 2 == 0 { scarf } else { bag };
        book.add(NewOrder {
            reference: String::new(),
            client: ClientContact {
                name: (*name).into(),
                phone: (*phone).into(),
                city: (*city).into(),
                address: String::new(),
            },
            lines: vec![OrderLine {
                product_id: product,
                quantity: 1,
                unit_price: catalog.get(product).unwrap().selling_price,
            }],
            shipping_fee: 30.0,
            source: OrderSource::Shopify,
            created_on: jiff::civil::date(2024, 7, 1 + i as i8),
            note: None,
        })
        .unwrap();
    }
    book
}

fn confirm_and_deliver(book: &mut OrderBook, index: usize, delivered: bool) {
    let id = book.orders()[index].id;
    book.update_status(
        id,
        StatusUpdate {
            confirmation: Some(ConfirmationStatus::Confirmed),
            delivery: delivered.then_some(DeliveryStatus::Delivered),
            ..Default::default()
        },
    )
    .unwrap();
}

#[test]
fn test_stats_over_order_book() {
    let mut catalog = Catalog::new();
    let mut book = seed_book(&mut catalog);

    confirm_and_deliver(&mut book, 0, true);
    confirm_and_deliver(&mut book, 1, true);
    confirm_and_deliver(&mut book, 2, false);
    confirm_and_deliver(&mut book, 3, true);

    let paid = book.orders()[0].id;
    book.update_status(
        paid,
        StatusUpdate {
            refund: Some(RefundStatus::Paid),
            ..Default::default()
        },
    )
    .unwrap();
    let returned = book.orders()[3].id;
    book.update_status(
        returned,
        StatusUpdate {
            return_status: Some(ReturnStatus::Returned),
            ..Default::default()
        },
    )
    .unwrap();

    let stats = OrderStats::compute(book.orders());
    assert_eq!(stats.total, 5);
    assert_eq!(stats.confirmed, 4);
    assert_eq!(stats.delivered, 3);
    assert_eq!(stats.returned, 1);
    assert_close(stats.confirmation_rate, 80.0);
    assert_eq!(stats.delivery_rate, 75.0);
    // scarf 150+30, bag 400+30, bag 400+30
    assert_eq!(stats.delivered_revenue, 1_040.0);
    assert_eq!(stats.pending_payout, 860.0);

    let new_count = stats
        .by_confirmation
        .iter()
        .find(|(status, _)| *status == ConfirmationStatus::New)
        .map(|(_, n)| *n);
    assert_eq!(new_count, Some(1));

    let delivered_filter = OrderFilter {
        delivery: Some(DeliveryStatus::Delivered),
        ..Default::default()
    };
    assert_eq!(book.filter(&delivered_filter).count(), 3);
}

#[test]
fn test_measured_rates_feed_the_funnel() {
    let mut catalog = Catalog::new();
    let mut book = seed_book(&mut catalog);
    confirm_and_deliver(&mut book, 0, true);
    confirm_and_deliver(&mut book, 1, false);

    let stats = OrderStats::compute(book.orders());
    let inputs = stats.funnel_inputs(100.0, 180.0, 60.0, 30.0);
    let derived = evaluate(&inputs);

    assert_eq!(inputs.leads, 5.0);
    assert_close(derived.orders_confirmed, 2.0);
    assert_close(derived.orders_delivered, 1.0);
    assert_close(derived.total_profit, 180.0 - 60.0 - 30.0 - 100.0);
}

#[test]
fn test_average_order_value_prefers_delivered_orders() {
    let mut catalog = Catalog::new();
    let mut book = seed_book(&mut catalog);
    // scarf 180, bag 430, scarf 180, bag 430, scarf 180
    assert_eq!(OrderStats::average_order_value(book.orders()), 280.0);

    confirm_and_deliver(&mut book, 1, true);
    assert_eq!(OrderStats::average_order_value(book.orders()), 430.0);
}

#[test]
fn test_confirmation_message_for_order() {
    let mut catalog = Catalog::new();
    let book = seed_book(&mut catalog);
    let settings = AppSettings::default();
    let order = &book.orders()[1];

    let context =
        TemplateContext::for_order(order, &catalog, settings.currency, &settings.business_name);
    let text = render_template(settings.templates.get(MessageCategory::Confirmation), &context);
    assert!(text.contains("Mehdi"));
    assert!(text.contains("ORD-00002"));
    assert!(text.contains("Leather Bag"));
    assert!(text.contains("430.00 DH"));

    let phone = normalize_phone(&order.client.phone, &settings.whatsapp.default_country_code);
    let link = whatsapp_link(&phone, &text);
    assert!(link.starts_with("https://wa.me/212600000002?text=Hello%20Mehdi"));
}
