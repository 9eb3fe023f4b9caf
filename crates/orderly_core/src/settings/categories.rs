//! Closed category sets for colors and message templates.
//!
//! Each category set is an enum and each keyed record has one field per
//! variant, so lookups are exhaustive `match`es and adding a category is a
//! compile error until every record handles it.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseEnumError;

/// Visual tone a status is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusTone {
    Pending,
    Success,
    Warning,
    Danger,
    Neutral,
}

impl StatusTone {
    pub const ALL: [StatusTone; 5] = [
        StatusTone::Pending,
        StatusTone::Success,
        StatusTone::Warning,
        StatusTone::Danger,
        StatusTone::Neutral,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Success => "Success",
            Self::Warning => "Warning",
            Self::Danger => "Danger",
            Self::Neutral => "Neutral",
        }
    }
}

impl FromStr for StatusTone {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            "danger" | "error" => Ok(Self::Danger),
            "neutral" => Ok(Self::Neutral),
            _ => Err(ParseEnumError::new("status tone", s)),
        }
    }
}

/// Hex color for each [`StatusTone`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusColors {
    pub pending: String,
    pub success: String,
    pub warning: String,
    pub danger: String,
    pub neutral: String,
}

impl Default for StatusColors {
    fn default() -> Self {
        Self {
            pending: "#f59e0b".into(),
            success: "#10b981".into(),
            warning: "#f97316".into(),
            danger: "#ef4444".into(),
            neutral: "#6b7280".into(),
        }
    }
}

impl StatusColors {
    pub fn get(&self, tone: StatusTone) -> &str {
        match tone {
            StatusTone::Pending => &self.pending,
            StatusTone::Success => &self.success,
            StatusTone::Warning => &self.warning,
            StatusTone::Danger => &self.danger,
            StatusTone::Neutral => &self.neutral,
        }
    }

    fn slot(&mut self, tone: StatusTone) -> &mut String {
        match tone {
            StatusTone::Pending => &mut self.pending,
            StatusTone::Success => &mut self.success,
            StatusTone::Warning => &mut self.warning,
            StatusTone::Danger => &mut self.danger,
            StatusTone::Neutral => &mut self.neutral,
        }
    }

    /// Set the color for `tone`. Returns false, leaving the color as it was,
    /// when `color` is not a `#rrggbb` hex string.
    pub fn set(&mut self, tone: StatusTone, color: &str) -> bool {
        if !is_hex_color(color) {
            return false;
        }
        *self.slot(tone) = color.to_lowercase();
        true
    }
}

/// `#rrggbb`, case-insensitive
pub fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Moment in the order lifecycle a customer message is sent at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageCategory {
    Confirmation,
    Shipping,
    Delivered,
    Reminder,
    Return,
}

impl MessageCategory {
    pub const ALL: [MessageCategory; 5] = [
        MessageCategory::Confirmation,
        MessageCategory::Shipping,
        MessageCategory::Delivered,
        MessageCategory::Reminder,
        MessageCategory::Return,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Confirmation => "Confirmation",
            Self::Shipping => "Shipping",
            Self::Delivered => "Delivered",
            Self::Reminder => "Reminder",
            Self::Return => "Return",
        }
    }
}

impl FromStr for MessageCategory {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "confirmation" | "confirm" => Ok(Self::Confirmation),
            "shipping" | "shipped" => Ok(Self::Shipping),
            "delivered" | "delivery" => Ok(Self::Delivered),
            "reminder" => Ok(Self::Reminder),
            "return" | "returned" => Ok(Self::Return),
            _ => Err(ParseEnumError::new("message category", s)),
        }
    }
}

/// WhatsApp message template for each [`MessageCategory`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageTemplates {
    pub confirmation: String,
    pub shipping: String,
    pub delivered: String,
    pub reminder: String,
    #[serde(rename = "return")]
    pub return_notice: String,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            confirmation: "Hello {client}, thank you for your order {reference} at {business}. \
                           Can you confirm {products} for a total of {total}, delivered to {city}?"
                .into(),
            shipping: "Hello {client}, your order {reference} has been handed to the carrier \
                       and will reach {city} soon."
                .into(),
            delivered: "Hello {client}, your order {reference} was delivered. \
                        Thank you for shopping with {business}!"
                .into(),
            reminder: "Hello {client}, we tried to reach you about your order {reference} \
                       ({total}). Please reply to confirm delivery."
                .into(),
            return_notice: "Hello {client}, we received the return of order {reference}. \
                            Contact {business} if you have any question."
                .into(),
        }
    }
}

impl MessageTemplates {
    pub fn get(&self, category: MessageCategory) -> &str {
        match category {
            MessageCategory::Confirmation => &self.confirmation,
            MessageCategory::Shipping => &self.shipping,
            MessageCategory::Delivered => &self.delivered,
            MessageCategory::Reminder => &self.reminder,
            MessageCategory::Return => &self.return_notice,
        }
    }

    pub fn set(&mut self, category: MessageCategory, template: impl Into<String>) {
        let slot = match category {
            MessageCategory::Confirmation => &mut self.confirmation,
            MessageCategory::Shipping => &mut self.shipping,
            MessageCategory::Delivered => &mut self.delivered,
            MessageCategory::Reminder => &mut self.reminder,
            MessageCategory::Return => &mut self.return_notice,
        };
        *slot = template.into();
    }
}
