//! CSV export of the order book

use csv::{QuoteStyle, Terminator, WriterBuilder};
use orderly_core::Catalog;
use orderly_core::model::Order;

const HEADER: [&str; 17] = [
    "id",
    "reference",
    "created_on",
    "source",
    "client",
    "phone",
    "city",
    "address",
    "products",
    "units",
    "total",
    "confirmation",
    "pickup",
    "delivery",
    "refund",
    "return",
    "note",
];

fn product_list(order: &Order, catalog: &Catalog) -> String {
    order
        .lines
        .iter()
        .map(|line| {
            let sku = catalog
                .get(line.product_id)
                .map_or_else(|| line.product_id.to_string(), |p| p.sku.clone());
            format!("{sku} x{}", line.quantity)
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// One header line plus one fully quoted row per order, CRLF-terminated
pub fn orders_csv<'a>(
    orders: impl IntoIterator<Item = &'a Order>,
    catalog: &Catalog,
) -> color_eyre::Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::CRLF)
        .from_writer(vec![]);
    writer.write_record(HEADER)?;

    for order in orders {
        let status = &order.status;
        writer.write_record([
            order.id.0.to_string(),
            order.reference.clone(),
            order.created_on.to_string(),
            order.source.display_name().to_string(),
            order.client.name.clone(),
            order.client.phone.clone(),
            order.client.city.clone(),
            order.client.address.clone(),
            product_list(order, catalog),
            order.units().to_string(),
            format!("{:.2}", order.total()),
            status.confirmation.display_name().to_string(),
            status.pickup.display_name().to_string(),
            status.delivery.display_name().to_string(),
            status.refund.display_name().to_string(),
            status.return_status.display_name().to_string(),
            order.note.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderly_core::model::{
        ClientContact, OrderId, OrderLine, OrderSource, OrderStatus, ProductId,
    };

    #[test]
    fn test_orders_csv_quotes_every_field() {
        let mut catalog = Catalog::new();
        let scarf = catalog.add("SCARF", "Silk Scarf", 150.0, 60.0, 10).unwrap();
        let order = Order {
            id: OrderId(3),
            reference: "ORD-00003".into(),
            client: ClientContact {
                name: "Amina \"Mina\" B.".into(),
                phone: "0612345678".into(),
                city: "Rabat".into(),
                address: "12, Rue Oued Sebou".into(),
            },
            lines: vec![
                OrderLine {
                    product_id: scarf,
                    quantity: 2,
                    unit_price: 150.0,
                },
                OrderLine {
                    product_id: ProductId(99),
                    quantity: 1,
                    unit_price: 10.0,
                },
            ],
            shipping_fee: 30.0,
            source: OrderSource::YouCan,
            created_on: jiff::civil::date(2024, 3, 9),
            note: None,
            status: OrderStatus::default(),
        };

        let csv = orders_csv([&order], &catalog).unwrap();
        let lines: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("\"id\",\"reference\""));
        assert!(lines[1].starts_with("\"3\",\"ORD-00003\",\"2024-03-09\",\"YouCan\""));
        assert!(lines[1].contains("\"Amina \"\"Mina\"\" B.\""));
        assert!(lines[1].contains("\"12, Rue Oued Sebou\""));
        assert!(lines[1].contains("\"SCARF x2; P99 x1\",\"3\",\"340.00\""));
        assert_eq!(lines[2], "");
    }
}
