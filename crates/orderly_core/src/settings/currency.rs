use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseEnumError;

/// Currency amounts are displayed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Currency {
    /// Moroccan dirham
    #[default]
    Mad,
    Eur,
    Usd,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Mad, Currency::Eur, Currency::Usd];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Mad => "MAD",
            Self::Eur => "EUR",
            Self::Usd => "USD",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Mad => "DH",
            Self::Eur => "€",
            Self::Usd => "$",
        }
    }

    /// Two decimals with thousands separators, symbol placed per currency
    /// (`$1,234.50`, `1,234.50 DH`)
    pub fn format(&self, amount: f64) -> String {
        let number = group_thousands(amount.abs());
        let sign = if amount < 0.0 && number != "0.00" { "-" } else { "" };
        match self {
            Self::Usd => format!("{sign}{}{number}", self.symbol()),
            Self::Mad | Self::Eur => format!("{sign}{number} {}", self.symbol()),
        }
    }
}

/// Format a non-negative amount as `1,234,567.89`
fn group_thousands(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{grouped}.{cents}")
}

impl FromStr for Currency {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MAD" | "DH" | "DIRHAM" => Ok(Self::Mad),
            "EUR" | "€" | "EURO" => Ok(Self::Eur),
            "USD" | "$" | "DOLLAR" => Ok(Self::Usd),
            _ => Err(ParseEnumError::new("currency", s)),
        }
    }
}
