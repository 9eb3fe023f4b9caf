use clap::Subcommand;
use orderly_core::ClientSummary;

use super::Output;
use crate::platform::Storage;
use crate::repository::Repository;
use crate::util::format::{format_table, format_value};

#[derive(Subcommand, Debug)]
pub enum ClientsCommand {
    /// Clients grouped by phone number, most valuable first
    List {
        /// Show at most this many clients
        #[arg(long)]
        limit: Option<usize>,
        /// Only clients with at least one returned order
        #[arg(long)]
        with_returns: bool,
    },
}

pub fn run<S: Storage>(
    repo: &Repository<S>,
    cmd: ClientsCommand,
    out: &Output,
) -> color_eyre::Result<String> {
    match cmd {
        ClientsCommand::List {
            limit,
            with_returns,
        } => {
            let settings = repo.config().load()?;
            let book = repo.orders()?;
            let clients: Vec<ClientSummary> =
                ClientSummary::aggregate(book.orders(), &settings.whatsapp.default_country_code)
                    .into_iter()
                    .filter(|c| !with_returns || c.returned > 0)
                    .take(limit.unwrap_or(usize::MAX))
                    .collect();
            tracing::debug!(clients = clients.len(), "Aggregated clients");

            out.render(&clients, |clients| {
                if clients.is_empty() {
                    return "No clients".to_string();
                }
                let rows: Vec<Vec<String>> = clients
                    .iter()
                    .map(|c| {
                        vec![
                            c.phone.clone(),
                            c.name.clone(),
                            c.city.clone(),
                            c.orders.to_string(),
                            format_value(c.delivery_rate(), true),
                            c.returned.to_string(),
                            settings.currency.format(c.lifetime_value),
                            c.last_order_on.to_string(),
                        ]
                    })
                    .collect();
                format_table(
                    &[
                        "Phone",
                        "Name",
                        "City",
                        "Orders",
                        "Delivered",
                        "Returns",
                        "Lifetime value",
                        "Last order",
                    ],
                    &rows,
                )
            })
        }
    }
}
