use std::path::PathBuf;

use clap::{Args, Subcommand};
use color_eyre::eyre::{WrapErr, bail};
use orderly_core::integrations::{ServiceAccount, StoreCredentials};
use orderly_core::model::OrderSource;
use orderly_core::settings::{
    CostStructure, Currency, MessageCategory, MessageTemplates, StatusColors, StatusTone,
};
use orderly_core::{AppSettings, Platform, PlatformSettings};
use serde::Serialize;

use super::Output;
use crate::platform::Storage;
use crate::repository::Repository;
use crate::util::format::format_value;

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Show the current settings. Integration secrets are never printed.
    Show,
    /// Name used in customer messages
    Business { name: String },
    /// Currency amounts are shown in (MAD, EUR, USD)
    Currency { code: Currency },
    /// Dialling code prepended to local phone numbers
    CountryCode { code: String },
    /// Replace a WhatsApp message template
    Template {
        category: MessageCategory,
        /// Placeholders: {client} {reference} {products} {total} {city} {business}
        text: String,
    },
    /// Set the color of a status tone
    Color { tone: StatusTone, hex: String },
    /// Per-unit overheads used in margin calculations
    Cost {
        #[arg(long)]
        fixed: Option<f64>,
        #[arg(long)]
        variable: Option<f64>,
    },
    /// Configure or remove a storefront integration
    Integration(IntegrationArgs),
    /// Forget every customization
    Reset,
}

#[derive(Args, Debug)]
pub struct IntegrationArgs {
    /// shopify, woocommerce, youcan or sheets
    platform: Platform,
    /// Remove the integration instead of configuring it
    #[arg(long)]
    remove: bool,
    #[arg(long, default_value = "")]
    store_url: String,
    #[arg(long, default_value = "")]
    api_key: String,
    #[arg(long, default_value = "")]
    api_secret: String,
    #[arg(long, default_value = "")]
    spreadsheet_id: String,
    #[arg(long, default_value = "")]
    client_email: String,
    #[arg(long, default_value = "", conflicts_with = "private_key_file")]
    private_key: String,
    /// Read the service account private key from a PEM file
    #[arg(long)]
    private_key_file: Option<PathBuf>,
}

impl IntegrationArgs {
    fn into_settings(self) -> color_eyre::Result<PlatformSettings> {
        let store = || StoreCredentials {
            store_url: self.store_url.clone(),
            api_key: self.api_key.clone(),
            api_secret: self.api_secret.clone(),
        };
        let settings = match self.platform {
            Platform::Shopify => PlatformSettings::Shopify(store()),
            Platform::WooCommerce => PlatformSettings::WooCommerce(store()),
            Platform::YouCan => PlatformSettings::YouCan(store()),
            Platform::GoogleSheets => {
                let private_key = match &self.private_key_file {
                    Some(path) => std::fs::read_to_string(path)
                        .wrap_err_with(|| format!("reading {}", path.display()))?,
                    None => self.private_key.clone(),
                };
                PlatformSettings::GoogleSheets(ServiceAccount {
                    spreadsheet_id: self.spreadsheet_id.clone(),
                    client_email: self.client_email.clone(),
                    private_key,
                })
            }
        };
        Ok(settings)
    }
}

/// Settings as shown to the user: integrations reduced to where they point
#[derive(Debug, Serialize)]
struct SettingsView<'a> {
    business_name: &'a str,
    currency: Currency,
    country_code: &'a str,
    colors: &'a StatusColors,
    templates: &'a MessageTemplates,
    cost_structure: CostStructure,
    integrations: Vec<IntegrationView>,
}

#[derive(Debug, Serialize)]
struct IntegrationView {
    platform: Platform,
    /// Source recorded on orders imported from the platform
    source: OrderSource,
    endpoint: String,
}

impl<'a> SettingsView<'a> {
    fn new(settings: &'a AppSettings) -> Self {
        Self {
            business_name: &settings.business_name,
            currency: settings.currency,
            country_code: &settings.whatsapp.default_country_code,
            colors: &settings.colors,
            templates: &settings.templates,
            cost_structure: settings.cost_structure,
            integrations: settings
                .integrations
                .iter()
                .map(|i| IntegrationView {
                    platform: i.platform(),
                    source: i.platform().order_source(),
                    endpoint: i.endpoint_hint(),
                })
                .collect(),
        }
    }
}

pub fn run<S: Storage>(
    repo: &Repository<S>,
    cmd: SettingsCommand,
    out: &Output,
) -> color_eyre::Result<String> {
    let config = repo.config();

    let settings = match cmd {
        SettingsCommand::Show => config.load()?,
        SettingsCommand::Business { name } => {
            if name.trim().is_empty() {
                bail!("the business name cannot be empty");
            }
            config.update(|s| s.business_name = name.trim().to_string())?;
            return Ok(format!("Business name set to {}", name.trim()));
        }
        SettingsCommand::Currency { code } => {
            config.update(|s| s.currency = code)?;
            return Ok(format!("Currency set to {} ({})", code.code(), code.symbol()));
        }
        SettingsCommand::CountryCode { code } => {
            let digits: String = code.chars().filter(char::is_ascii_digit).collect();
            if digits.is_empty() {
                bail!("'{code}' is not a dialling code");
            }
            config.update(|s| s.whatsapp.default_country_code = digits.clone())?;
            return Ok(format!("Local numbers now get +{digits}"));
        }
        SettingsCommand::Template { category, text } => {
            config.update(|s| s.templates.set(category, text))?;
            return Ok(format!("Updated the {} template", category.display_name()));
        }
        SettingsCommand::Color { tone, hex } => {
            if !config.update(|s| s.colors.set(tone, &hex))? {
                bail!("'{hex}' is not a #rrggbb color");
            }
            return Ok(format!("{} is now {}", tone.display_name(), hex.to_lowercase()));
        }
        SettingsCommand::Cost { fixed, variable } => {
            if fixed.is_none() && variable.is_none() {
                bail!("pass --fixed and/or --variable");
            }
            for value in [fixed, variable].into_iter().flatten() {
                if !value.is_finite() || value < 0.0 {
                    bail!("costs must be non-negative numbers, got {value}");
                }
            }
            let costs = config.update(|s| {
                let costs = &mut s.cost_structure;
                costs.fixed_per_unit = fixed.unwrap_or(costs.fixed_per_unit);
                costs.variable_per_unit = variable.unwrap_or(costs.variable_per_unit);
                *costs
            })?;
            return Ok(format!(
                "Overheads per unit: fixed {}, variable {}",
                format_value(costs.fixed_per_unit, false),
                format_value(costs.variable_per_unit, false)
            ));
        }
        SettingsCommand::Integration(args) => {
            let platform = args.platform;
            if args.remove {
                return match config.update(|s| s.remove_integration(platform))? {
                    Some(_) => {
                        tracing::info!(platform = platform.display_name(), "Integration removed");
                        Ok(format!("Removed the {} integration", platform.display_name()))
                    }
                    None => bail!("{} is not configured", platform.display_name()),
                };
            }
            let integration = args.into_settings()?;
            integration.validate()?;
            let endpoint = integration.endpoint_hint();
            let replaced = config.update(|s| s.upsert_integration(integration))?;
            tracing::info!(
                platform = platform.display_name(),
                replaced = replaced.is_some(),
                "Integration saved"
            );
            return Ok(format!(
                "{} {}, orders will be read from {endpoint}",
                platform.display_name(),
                if replaced.is_some() { "updated" } else { "connected" }
            ));
        }
        SettingsCommand::Reset => config.reset()?,
    };

    out.render(&SettingsView::new(&settings), render_settings)
}

fn render_settings(view: &SettingsView) -> String {
    let mut lines = vec![
        format!("Business:      {}", view.business_name),
        format!(
            "Currency:      {} ({})",
            view.currency.code(),
            view.currency.symbol()
        ),
        format!("Country code:  +{}", view.country_code),
        format!(
            "Overheads:     fixed {} / variable {} per unit",
            format_value(view.cost_structure.fixed_per_unit, false),
            format_value(view.cost_structure.variable_per_unit, false)
        ),
        String::new(),
        "Colors:".to_string(),
    ];
    for tone in StatusTone::ALL {
        lines.push(format!("  {:<8} {}", tone.display_name(), view.colors.get(tone)));
    }
    lines.push(String::new());
    lines.push("Templates:".to_string());
    for category in MessageCategory::ALL {
        lines.push(format!(
            "  {}: {}",
            category.display_name(),
            view.templates.get(category)
        ));
    }
    lines.push(String::new());
    if view.integrations.is_empty() {
        lines.push("Integrations: none".to_string());
    } else {
        lines.push("Integrations:".to_string());
        for integration in &view.integrations {
            lines.push(format!(
                "  {:<13} {}",
                integration.platform.display_name(),
                integration.endpoint
            ));
        }
    }
    lines.join("\n")
}
