use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Subcommand};
use color_eyre::eyre::{OptionExt, bail, eyre};
use jiff::civil::Date;
use orderly_core::messaging::{TemplateContext, normalize_phone, render_template, whatsapp_link};
use orderly_core::model::{
    ClientContact, ConfirmationStatus, DeliveryStatus, Order, OrderId, OrderLine, OrderSource,
    PickupStatus, RefundStatus, ReturnStatus, StatusUpdate,
};
use orderly_core::settings::{Currency, MessageCategory};
use orderly_core::{NewOrder, OrderFilter, OrderStats};
use serde::Serialize;

use super::Output;
use crate::platform::Storage;
use crate::repository::{Repository, StockMovement};
use crate::util::csv::orders_csv;
use crate::util::format::{format_table, format_value};
use crate::util::io::atomic_write;

/// One order line as typed: `SKU`, `SKU:QTY` or `SKU:QTY@PRICE`
#[derive(Debug, Clone, PartialEq)]
pub struct LineSpec {
    pub sku: String,
    pub quantity: u32,
    pub unit_price: Option<f64>,
}

impl FromStr for LineSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (item, price) = match s.split_once('@') {
            Some((item, price)) => {
                let price: f64 = price
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid unit price in '{s}'"))?;
                (item, Some(price))
            }
            None => (s, None),
        };
        let (sku, quantity) = match item.split_once(':') {
            Some((sku, qty)) => {
                let qty: u32 = qty
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid quantity in '{s}'"))?;
                (sku, qty)
            }
            None => (item, 1),
        };
        if sku.trim().is_empty() || quantity == 0 {
            return Err(format!("'{s}' needs a SKU and a positive quantity"));
        }
        Ok(Self {
            sku: sku.trim().to_string(),
            quantity,
            unit_price: price,
        })
    }
}

/// Values for any of the five status fields
#[derive(Args, Debug, Clone, Default)]
pub struct StatusArgs {
    #[arg(long)]
    pub confirmation: Option<ConfirmationStatus>,
    #[arg(long)]
    pub pickup: Option<PickupStatus>,
    #[arg(long)]
    pub delivery: Option<DeliveryStatus>,
    #[arg(long)]
    pub refund: Option<RefundStatus>,
    #[arg(long = "return")]
    pub return_status: Option<ReturnStatus>,
}

impl StatusArgs {
    fn update(&self) -> StatusUpdate {
        StatusUpdate {
            confirmation: self.confirmation,
            pickup: self.pickup,
            delivery: self.delivery,
            refund: self.refund,
            return_status: self.return_status,
        }
    }
}

/// Criteria for listing, exporting and counting orders
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[command(flatten)]
    pub status: StatusArgs,
    #[arg(long)]
    pub source: Option<OrderSource>,
    /// First creation date included (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<Date>,
    /// Last creation date included (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<Date>,
    /// Text searched in reference, client name, phone and city
    #[arg(long, short)]
    pub query: Option<String>,
}

impl FilterArgs {
    fn filter(&self) -> OrderFilter {
        let status = self.status.update();
        OrderFilter {
            confirmation: status.confirmation,
            pickup: status.pickup,
            delivery: status.delivery,
            refund: status.refund,
            return_status: status.return_status,
            source: self.source,
            from: self.from,
            to: self.to,
            query: self.query.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum OrdersCommand {
    /// Record a new order
    Add {
        #[arg(long)]
        client: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        city: String,
        #[arg(long, default_value = "")]
        address: String,
        /// Order line as SKU, SKU:QTY or SKU:QTY@PRICE; repeat for more lines
        #[arg(long = "line", required = true)]
        lines: Vec<LineSpec>,
        /// Shipping fee charged to the client
        #[arg(long, default_value_t = 0.0)]
        shipping: f64,
        #[arg(long, default_value = "manual")]
        source: OrderSource,
        /// Storefront reference; generated when omitted
        #[arg(long)]
        reference: Option<String>,
        /// Creation date (YYYY-MM-DD); today when omitted
        #[arg(long)]
        date: Option<Date>,
        #[arg(long)]
        note: Option<String>,
    },
    /// List orders matching the given criteria
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Set one or more status fields of an order
    Status {
        id: OrderId,
        #[command(flatten)]
        status: StatusArgs,
    },
    /// Delete an order
    Remove { id: OrderId },
    /// Dashboard statistics
    Stats {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Export orders as CSV
    Export {
        /// Write to this file instead of standard output
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// WhatsApp message and link for an order
    Whatsapp {
        id: OrderId,
        #[arg(long, default_value = "confirmation")]
        category: MessageCategory,
    },
}

#[derive(Debug, Serialize)]
struct WhatsAppMessage {
    order: OrderId,
    phone: String,
    message: String,
    link: String,
}

#[derive(Debug, Serialize)]
struct ExportSummary {
    path: PathBuf,
    orders: usize,
}

pub fn run<S: Storage>(
    repo: &Repository<S>,
    cmd: OrdersCommand,
    out: &Output,
) -> color_eyre::Result<String> {
    match cmd {
        OrdersCommand::Add {
            client,
            phone,
            city,
            address,
            lines,
            shipping,
            source,
            reference,
            date,
            note,
        } => {
            let catalog = repo.catalog()?;
            let lines = lines
                .iter()
                .map(|line| -> color_eyre::Result<OrderLine> {
                    let product = catalog
                        .find_by_sku(&line.sku)
                        .ok_or_else(|| eyre!("no product with SKU '{}'", line.sku))?;
                    Ok(OrderLine {
                        product_id: product.id,
                        quantity: line.quantity,
                        unit_price: line.unit_price.unwrap_or(product.selling_price),
                    })
                })
                .collect::<color_eyre::Result<Vec<_>>>()?;

            let order = repo.add_order(NewOrder {
                reference: reference.unwrap_or_default(),
                client: ClientContact {
                    name: client,
                    phone,
                    city,
                    address,
                },
                lines,
                shipping_fee: shipping,
                source,
                created_on: date.unwrap_or_else(|| jiff::Zoned::now().date()),
                note,
            })?;
            let currency = repo.config().load()?.currency;
            out.render(&order, |o| {
                format!(
                    "Added order {} ({}) for {}: {}",
                    o.id,
                    o.reference,
                    o.client.name,
                    currency.format(o.total())
                )
            })
        }
        OrdersCommand::List { filter } => {
            let book = repo.orders()?;
            let filter = filter.filter();
            let orders: Vec<&Order> = book.filter(&filter).collect();
            let currency = repo.config().load()?.currency;
            out.render(&orders, |orders| render_orders(orders, currency))
        }
        OrdersCommand::Status { id, status } => {
            let update = status.update();
            if update.is_empty() {
                bail!("give at least one of --confirmation, --pickup, --delivery, --refund, --return");
            }
            let change = repo.update_status(id, update)?;
            out.render(&change, |c| {
                let s = &c.order.status;
                let mut text = format!(
                    "Order {}: {} / {} / {} / {} / {}",
                    c.order.id,
                    s.confirmation.display_name(),
                    s.pickup.display_name(),
                    s.delivery.display_name(),
                    s.refund.display_name(),
                    s.return_status.display_name()
                );
                match c.stock {
                    StockMovement::Reserved => {
                        text.push_str(&format!("\nReserved {} units", c.order.units()))
                    }
                    StockMovement::Released => {
                        text.push_str(&format!("\nReturned {} units to stock", c.order.units()))
                    }
                    StockMovement::None => {}
                }
                text
            })
        }
        OrdersCommand::Remove { id } => {
            let order = repo.remove_order(id)?;
            out.render(&order, |o| format!("Removed order {} ({})", o.id, o.reference))
        }
        OrdersCommand::Stats { filter } => {
            let book = repo.orders()?;
            let filter = filter.filter();
            let stats = OrderStats::compute(book.filter(&filter));
            let currency = repo.config().load()?.currency;
            out.render(&stats, |s| render_stats(s, currency))
        }
        OrdersCommand::Export { output, filter } => {
            let book = repo.orders()?;
            let catalog = repo.catalog()?;
            let filter = filter.filter();
            let orders: Vec<&Order> = book.filter(&filter).collect();
            let csv = orders_csv(orders.iter().copied(), &catalog)?;
            match output {
                Some(path) => {
                    atomic_write(&path, &csv)?;
                    tracing::info!(path = %path.display(), orders = orders.len(), "Exported orders");
                    let summary = ExportSummary {
                        path,
                        orders: orders.len(),
                    };
                    out.render(&summary, |s| {
                        format!("Exported {} orders to {}", s.orders, s.path.display())
                    })
                }
                None => Ok(csv),
            }
        }
        OrdersCommand::Whatsapp { id, category } => {
            let book = repo.orders()?;
            let order = book.get(id).ok_or_eyre(format!("order {id} not found"))?;
            let catalog = repo.catalog()?;
            let settings = repo.config().load()?;

            let context =
                TemplateContext::for_order(order, &catalog, settings.currency, &settings.business_name);
            let message = render_template(settings.templates.get(category), &context);
            let phone = normalize_phone(&order.client.phone, &settings.whatsapp.default_country_code);
            if phone.is_empty() {
                bail!("order {id} has no phone number");
            }
            let result = WhatsAppMessage {
                order: id,
                link: whatsapp_link(&phone, &message),
                phone,
                message,
            };
            out.render(&result, |m| format!("{}\n\n{}", m.message, m.link))
        }
    }
}

fn render_orders(orders: &[&Order], currency: Currency) -> String {
    if orders.is_empty() {
        return "No orders".to_string();
    }
    let rows: Vec<Vec<String>> = orders
        .iter()
        .map(|o| {
            vec![
                o.id.to_string(),
                o.reference.clone(),
                o.created_on.to_string(),
                o.client.name.clone(),
                o.client.city.clone(),
                currency.format(o.total()),
                o.status.confirmation.display_name().to_string(),
                o.status.pickup.display_name().to_string(),
                o.status.delivery.display_name().to_string(),
                o.status.refund.display_name().to_string(),
                o.status.return_status.display_name().to_string(),
            ]
        })
        .collect();
    format_table(
        &[
            "Id",
            "Reference",
            "Date",
            "Client",
            "City",
            "Total",
            "Confirmation",
            "Pickup",
            "Delivery",
            "Refund",
            "Return",
        ],
        &rows,
    )
}

fn render_counts<T>(
    title: &str,
    counts: &[(T, usize)],
    name: impl Fn(&T) -> &'static str,
) -> String {
    let parts: Vec<String> = counts
        .iter()
        .filter(|(_, n)| *n > 0)
        .map(|(status, n)| format!("{} {n}", name(status)))
        .collect();
    if parts.is_empty() {
        format!("{title}: -")
    } else {
        format!("{title}: {}", parts.join(", "))
    }
}

fn render_stats(stats: &OrderStats, currency: Currency) -> String {
    [
        format!(
            "Orders: {}  Confirmed: {}  Delivered: {}  Returned: {}",
            stats.total, stats.confirmed, stats.delivered, stats.returned
        ),
        format!(
            "Confirmation rate: {}  Delivery rate: {}",
            format_value(stats.confirmation_rate, true),
            format_value(stats.delivery_rate, true)
        ),
        format!(
            "Delivered revenue: {}  Awaiting payout: {}",
            currency.format(stats.delivered_revenue),
            currency.format(stats.pending_payout)
        ),
        String::new(),
        render_counts("Confirmation", &stats.by_confirmation, |s| s.display_name()),
        render_counts("Pickup", &stats.by_pickup, |s| s.display_name()),
        render_counts("Delivery", &stats.by_delivery, |s| s.display_name()),
        render_counts("Refund", &stats.by_refund, |s| s.display_name()),
        render_counts("Return", &stats.by_return, |s| s.display_name()),
    ]
    .join("\n")
}
