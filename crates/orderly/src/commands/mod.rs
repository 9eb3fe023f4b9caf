//! Command-line commands.
//!
//! Each submodule owns one command group: its clap subcommand enum and a
//! `run` function that loads what it needs from the [`Repository`], applies
//! the change, saves, and renders the result as text or JSON.

mod clients;
mod funnel;
mod orders;
mod products;
mod settings;
mod users;

use clap::Subcommand;
use serde::Serialize;

use crate::platform::Storage;
use crate::repository::Repository;

pub use clients::ClientsCommand;
pub use funnel::{FunnelCommand, InputOverrides};
pub use orders::OrdersCommand;
pub use products::ProductsCommand;
pub use settings::SettingsCommand;
pub use users::UsersCommand;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Funnel calculator: evaluate, edit any cell, sweep, break-even
    #[command(subcommand)]
    Funnel(FunnelCommand),
    /// Record orders, update their statuses, view statistics
    #[command(subcommand)]
    Orders(OrdersCommand),
    /// Product catalog and stock
    #[command(subcommand)]
    Products(ProductsCommand),
    /// Clients derived from the order book
    #[command(subcommand)]
    Clients(ClientsCommand),
    /// Back-office users and roles
    #[command(subcommand)]
    Users(UsersCommand),
    /// Business settings, templates, colors and integrations
    #[command(subcommand)]
    Settings(SettingsCommand),
}

/// How command results are rendered
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Pretty JSON of `value`, or the text produced by `text`
    pub fn render<T: Serialize>(
        &self,
        value: &T,
        text: impl FnOnce(&T) -> String,
    ) -> color_eyre::Result<String> {
        if self.json {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(text(value))
        }
    }
}

/// clap value parser for amounts and rates: any finite number
pub(crate) fn parse_finite(text: &str) -> Result<f64, String> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| format!("'{text}' is not a number"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("'{text}' is not a finite number"))
    }
}

pub fn run<S: Storage>(
    repo: &Repository<S>,
    command: Command,
    out: &Output,
) -> color_eyre::Result<String> {
    match command {
        Command::Funnel(cmd) => funnel::run(repo, cmd, out),
        Command::Orders(cmd) => orders::run(repo, cmd, out),
        Command::Products(cmd) => products::run(repo, cmd, out),
        Command::Clients(cmd) => clients::run(repo, cmd, out),
        Command::Users(cmd) => users::run(repo, cmd, out),
        Command::Settings(cmd) => settings::run(repo, cmd, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_finite() {
        assert_eq!(parse_finite(" 12.5 "), Ok(12.5));
        assert_eq!(parse_finite("-3"), Ok(-3.0));
        assert!(parse_finite("inf").is_err());
        assert!(parse_finite("NaN").is_err());
        assert!(parse_finite("ten").is_err());
    }
}
