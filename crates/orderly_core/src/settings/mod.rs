//! Application settings
//!
//! Every struct here is `#[serde(default)]`: a persisted settings file that
//! only names some keys is merged over the defaults key by key, at any depth.
//! Persisting the settings is the application's job; this module only
//! defines their shape.

mod categories;
mod currency;

pub use categories::{
    MessageCategory, MessageTemplates, StatusColors, StatusTone, is_hex_color,
};
pub use currency::Currency;

use serde::{Deserialize, Serialize};

use crate::integrations::{Platform, PlatformSettings};

/// Per-unit overheads charged on top of product and shipping costs
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CostStructure {
    /// Fixed costs (rent, salaries, subscriptions) spread over each unit sold
    pub fixed_per_unit: f64,
    /// Costs that scale with each unit (packaging, confirmation call, COD fee)
    pub variable_per_unit: f64,
}

impl CostStructure {
    pub fn per_unit(&self) -> f64 {
        self.fixed_per_unit + self.variable_per_unit
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatsAppSettings {
    /// Dialling code prepended to local numbers, digits only
    pub default_country_code: String,
}

impl Default for WhatsAppSettings {
    fn default() -> Self {
        Self {
            default_country_code: "212".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub business_name: String,
    pub currency: Currency,
    pub whatsapp: WhatsAppSettings,
    pub colors: StatusColors,
    pub templates: MessageTemplates,
    pub cost_structure: CostStructure,
    pub integrations: Vec<PlatformSettings>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            business_name: "OrderSync".into(),
            currency: Currency::default(),
            whatsapp: WhatsAppSettings::default(),
            colors: StatusColors::default(),
            templates: MessageTemplates::default(),
            cost_structure: CostStructure::default(),
            integrations: Vec::new(),
        }
    }
}

impl AppSettings {
    pub fn integration(&self, platform: Platform) -> Option<&PlatformSettings> {
        self.integrations.iter().find(|i| i.platform() == platform)
    }

    /// Insert or replace the settings for the integration's platform.
    /// Returns the settings that were replaced, if any.
    pub fn upsert_integration(&mut self, settings: PlatformSettings) -> Option<PlatformSettings> {
        let platform = settings.platform();
        match self
            .integrations
            .iter_mut()
            .find(|i| i.platform() == platform)
        {
            Some(existing) => Some(std::mem::replace(existing, settings)),
            None => {
                self.integrations.push(settings);
                None
            }
        }
    }

    pub fn remove_integration(&mut self, platform: Platform) -> Option<PlatformSettings> {
        let index = self
            .integrations
            .iter()
            .position(|i| i.platform() == platform)?;
        Some(self.integrations.remove(index))
    }
}
