//! Storefront integration settings
//!
//! Each platform has its own payload: the storefront platforms authenticate
//! with a store URL plus an API key pair, Google Sheets with a service
//! account. The polling/webhook proxies that use these live outside this
//! crate; here they are only described and validated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{IntegrationError, ParseEnumError};
use crate::model::OrderSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Shopify,
    WooCommerce,
    YouCan,
    GoogleSheets,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Shopify,
        Platform::WooCommerce,
        Platform::YouCan,
        Platform::GoogleSheets,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Shopify => "Shopify",
            Self::WooCommerce => "WooCommerce",
            Self::YouCan => "YouCan",
            Self::GoogleSheets => "Google Sheets",
        }
    }

    /// Source recorded on orders imported from this platform
    pub fn order_source(&self) -> OrderSource {
        match self {
            Self::Shopify => OrderSource::Shopify,
            Self::WooCommerce => OrderSource::WooCommerce,
            Self::YouCan => OrderSource::YouCan,
            Self::GoogleSheets => OrderSource::GoogleSheets,
        }
    }
}

impl FromStr for Platform {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "shopify" => Ok(Self::Shopify),
            "woocommerce" | "woo" => Ok(Self::WooCommerce),
            "youcan" => Ok(Self::YouCan),
            "googlesheets" | "sheets" => Ok(Self::GoogleSheets),
            _ => Err(ParseEnumError::new("platform", s)),
        }
    }
}

/// Store URL plus API key and secret
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreCredentials {
    pub store_url: String,
    pub api_key: String,
    pub api_secret: String,
}

impl fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("store_url", &self.store_url)
            .field("api_key", &redact(&self.api_key))
            .field("api_secret", &"***")
            .finish()
    }
}

/// Google service account with access to the order spreadsheet
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceAccount {
    pub spreadsheet_id: String,
    pub client_email: String,
    pub private_key: String,
}

impl fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"***")
            .finish()
    }
}

/// Keep the last four characters of a key visible
fn redact(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "***".to_string();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("***{tail}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "platform")]
pub enum PlatformSettings {
    Shopify(StoreCredentials),
    WooCommerce(StoreCredentials),
    YouCan(StoreCredentials),
    GoogleSheets(ServiceAccount),
}

impl PlatformSettings {
    pub fn platform(&self) -> Platform {
        match self {
            Self::Shopify(_) => Platform::Shopify,
            Self::WooCommerce(_) => Platform::WooCommerce,
            Self::YouCan(_) => Platform::YouCan,
            Self::GoogleSheets(_) => Platform::GoogleSheets,
        }
    }

    /// Check that every credential needed to reach the platform is present
    pub fn validate(&self) -> Result<(), IntegrationError> {
        let platform = self.platform().display_name();
        let require = |value: &str, field: &'static str| {
            if value.trim().is_empty() {
                Err(IntegrationError::MissingField { platform, field })
            } else {
                Ok(())
            }
        };

        match self {
            Self::Shopify(creds) | Self::WooCommerce(creds) | Self::YouCan(creds) => {
                require(&creds.store_url, "store_url")?;
                require(&creds.api_key, "api_key")?;
                require(&creds.api_secret, "api_secret")?;
                if !creds.store_url.trim().starts_with("https://") {
                    return Err(IntegrationError::InvalidStoreUrl(creds.store_url.clone()));
                }
            }
            Self::GoogleSheets(account) => {
                require(&account.spreadsheet_id, "spreadsheet_id")?;
                require(&account.client_email, "client_email")?;
                require(&account.private_key, "private_key")?;
                let email = account.client_email.trim();
                let valid = email
                    .split_once('@')
                    .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'));
                if !valid {
                    return Err(IntegrationError::InvalidServiceAccountEmail(
                        account.client_email.clone(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// URL the order proxy polls for new orders
    pub fn endpoint_hint(&self) -> String {
        match self {
            Self::Shopify(creds) => format!("{}/admin/api/2024-01/orders.json", store_root(creds)),
            Self::WooCommerce(creds) => format!("{}/wp-json/wc/v3/orders", store_root(creds)),
            Self::YouCan(creds) => format!("{}/orders", store_root(creds)),
            Self::GoogleSheets(account) => format!(
                "https://sheets.googleapis.com/v4/spreadsheets/{}/values/Orders",
                account.spreadsheet_id.trim()
            ),
        }
    }
}

fn store_root(creds: &StoreCredentials) -> &str {
    creds.store_url.trim().trim_end_matches('/')
}
