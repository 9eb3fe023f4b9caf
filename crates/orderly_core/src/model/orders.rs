//! Orders and their status fields
//!
//! An order carries five independent status fields. None of them constrains
//! another: an operator may set any field to any value at any time, so there
//! is deliberately no transition table here.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ids::{OrderId, ProductId};
use crate::error::ParseEnumError;
use crate::settings::StatusTone;

/// Lowercase, drop accents and strip separators so `no-answer`, `No Answer`
/// and `noAnswer` match, as do `annulée` and `annulee`
fn fold(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Where an order came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderSource {
    #[default]
    Manual,
    Shopify,
    WooCommerce,
    YouCan,
    GoogleSheets,
}

impl OrderSource {
    pub const ALL: [OrderSource; 5] = [
        OrderSource::Manual,
        OrderSource::Shopify,
        OrderSource::WooCommerce,
        OrderSource::YouCan,
        OrderSource::GoogleSheets,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Manual => "Manual",
            Self::Shopify => "Shopify",
            Self::WooCommerce => "WooCommerce",
            Self::YouCan => "YouCan",
            Self::GoogleSheets => "Google Sheets",
        }
    }
}

impl FromStr for OrderSource {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold(s).as_str() {
            "manual" => Ok(Self::Manual),
            "shopify" => Ok(Self::Shopify),
            "woocommerce" | "woo" => Ok(Self::WooCommerce),
            "youcan" => Ok(Self::YouCan),
            "googlesheets" | "sheets" => Ok(Self::GoogleSheets),
            _ => Err(ParseEnumError::new("order source", s)),
        }
    }
}

/// Outcome of the confirmation call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConfirmationStatus {
    #[default]
    New,
    Confirmed,
    NoAnswer,
    Postponed,
    Cancelled,
    Duplicate,
    WrongNumber,
}

impl ConfirmationStatus {
    pub const ALL: [ConfirmationStatus; 7] = [
        ConfirmationStatus::New,
        ConfirmationStatus::Confirmed,
        ConfirmationStatus::NoAnswer,
        ConfirmationStatus::Postponed,
        ConfirmationStatus::Cancelled,
        ConfirmationStatus::Duplicate,
        ConfirmationStatus::WrongNumber,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Confirmed => "Confirmed",
            Self::NoAnswer => "No Answer",
            Self::Postponed => "Postponed",
            Self::Cancelled => "Cancelled",
            Self::Duplicate => "Duplicate",
            Self::WrongNumber => "Wrong Number",
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            Self::New => StatusTone::Neutral,
            Self::Confirmed => StatusTone::Success,
            Self::NoAnswer | Self::Postponed => StatusTone::Warning,
            Self::Cancelled | Self::Duplicate | Self::WrongNumber => StatusTone::Danger,
        }
    }
}

impl FromStr for ConfirmationStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold(s).as_str() {
            "new" | "nouveau" => Ok(Self::New),
            "confirmed" | "confirmee" => Ok(Self::Confirmed),
            "noanswer" | "pasdereponse" => Ok(Self::NoAnswer),
            "postponed" | "reporte" => Ok(Self::Postponed),
            "cancelled" | "canceled" | "annule" | "annulee" => Ok(Self::Cancelled),
            "duplicate" | "doublon" => Ok(Self::Duplicate),
            "wrongnumber" => Ok(Self::WrongNumber),
            _ => Err(ParseEnumError::new("confirmation status", s)),
        }
    }
}

/// Carrier collection (ramassage)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PickupStatus {
    #[default]
    Waiting,
    PickedUp,
}

impl PickupStatus {
    pub const ALL: [PickupStatus; 2] = [PickupStatus::Waiting, PickupStatus::PickedUp];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Waiting => "Waiting",
            Self::PickedUp => "Picked Up",
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            Self::Waiting => StatusTone::Pending,
            Self::PickedUp => StatusTone::Success,
        }
    }
}

impl FromStr for PickupStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold(s).as_str() {
            "waiting" | "pending" | "enattente" => Ok(Self::Waiting),
            "pickedup" | "picked" | "ramasse" => Ok(Self::PickedUp),
            _ => Err(ParseEnumError::new("pickup status", s)),
        }
    }
}

/// Carrier handoff to the customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeliveryStatus {
    #[default]
    Pending,
    InTransit,
    Delivered,
    Refused,
    Unreachable,
}

impl DeliveryStatus {
    pub const ALL: [DeliveryStatus; 5] = [
        DeliveryStatus::Pending,
        DeliveryStatus::InTransit,
        DeliveryStatus::Delivered,
        DeliveryStatus::Refused,
        DeliveryStatus::Unreachable,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InTransit => "In Transit",
            Self::Delivered => "Delivered",
            Self::Refused => "Refused",
            Self::Unreachable => "Unreachable",
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            Self::Pending => StatusTone::Pending,
            Self::InTransit => StatusTone::Neutral,
            Self::Delivered => StatusTone::Success,
            Self::Refused => StatusTone::Danger,
            Self::Unreachable => StatusTone::Warning,
        }
    }
}

impl FromStr for DeliveryStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold(s).as_str() {
            "pending" => Ok(Self::Pending),
            "intransit" | "shipped" | "encours" => Ok(Self::InTransit),
            "delivered" | "livre" | "livree" => Ok(Self::Delivered),
            "refused" | "refuse" | "refusee" => Ok(Self::Refused),
            "unreachable" | "injoignable" => Ok(Self::Unreachable),
            _ => Err(ParseEnumError::new("delivery status", s)),
        }
    }
}

/// Whether the carrier or platform has paid the seller (remboursement)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RefundStatus {
    #[default]
    Unpaid,
    Paid,
}

impl RefundStatus {
    pub const ALL: [RefundStatus; 2] = [RefundStatus::Unpaid, RefundStatus::Paid];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Unpaid => "Unpaid",
            Self::Paid => "Paid",
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            Self::Unpaid => StatusTone::Pending,
            Self::Paid => StatusTone::Success,
        }
    }
}

impl FromStr for RefundStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold(s).as_str() {
            "unpaid" | "nonrembourse" => Ok(Self::Unpaid),
            "paid" | "rembourse" => Ok(Self::Paid),
            _ => Err(ParseEnumError::new("refund status", s)),
        }
    }
}

/// Whether the customer sent the parcel back (commande retour)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReturnStatus {
    #[default]
    None,
    Returned,
}

impl ReturnStatus {
    pub const ALL: [ReturnStatus; 2] = [ReturnStatus::None, ReturnStatus::Returned];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::None => "Not Returned",
            Self::Returned => "Returned",
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            Self::None => StatusTone::Neutral,
            Self::Returned => StatusTone::Danger,
        }
    }
}

impl FromStr for ReturnStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold(s).as_str() {
            "none" | "notreturned" | "no" => Ok(Self::None),
            "returned" | "retour" | "yes" => Ok(Self::Returned),
            _ => Err(ParseEnumError::new("return status", s)),
        }
    }
}

/// The five status fields of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderStatus {
    pub confirmation: ConfirmationStatus,
    pub pickup: PickupStatus,
    pub delivery: DeliveryStatus,
    pub refund: RefundStatus,
    #[serde(rename = "return")]
    pub return_status: ReturnStatus,
}

/// Any subset of status fields to overwrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub confirmation: Option<ConfirmationStatus>,
    pub pickup: Option<PickupStatus>,
    pub delivery: Option<DeliveryStatus>,
    pub refund: Option<RefundStatus>,
    pub return_status: Option<ReturnStatus>,
}

impl StatusUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl OrderStatus {
    /// Overwrite every field present in `update`
    pub fn apply(&mut self, update: StatusUpdate) {
        if let Some(v) = update.confirmation {
            self.confirmation = v;
        }
        if let Some(v) = update.pickup {
            self.pickup = v;
        }
        if let Some(v) = update.delivery {
            self.delivery = v;
        }
        if let Some(v) = update.refund {
            self.refund = v;
        }
        if let Some(v) = update.return_status {
            self.return_status = v;
        }
    }
}

/// Customer contact details captured with an order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientContact {
    pub name: String,
    pub phone: String,
    pub city: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: f64,
}

impl OrderLine {
    pub fn subtotal(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub reference: String,
    pub client: ClientContact,
    pub lines: Vec<OrderLine>,
    #[serde(default)]
    pub shipping_fee: f64,
    #[serde(default)]
    pub source: OrderSource,
    pub created_on: jiff::civil::Date,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
}

impl Order {
    /// Sum of line subtotals plus the shipping fee charged to the customer
    pub fn total(&self) -> f64 {
        self.lines.iter().map(OrderLine::subtotal).sum::<f64>() + self.shipping_fee
    }

    pub fn units(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn apply(&mut self, update: StatusUpdate) {
        self.status.apply(update);
    }

    pub fn is_confirmed(&self) -> bool {
        self.status.confirmation == ConfirmationStatus::Confirmed
    }

    pub fn is_delivered(&self) -> bool {
        self.status.delivery == DeliveryStatus::Delivered
    }

    pub fn is_returned(&self) -> bool {
        self.status.return_status == ReturnStatus::Returned
    }

    /// Delivered but not yet paid out by the carrier
    pub fn awaiting_payout(&self) -> bool {
        self.is_delivered() && self.status.refund == RefundStatus::Unpaid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_status_may_follow_any_other() {
        let mut status = OrderStatus::default();
        for delivery in DeliveryStatus::ALL {
            for next in DeliveryStatus::ALL {
                status.apply(StatusUpdate {
                    delivery: Some(delivery),
                    ..Default::default()
                });
                status.apply(StatusUpdate {
                    delivery: Some(next),
                    ..Default::default()
                });
                assert_eq!(status.delivery, next);
            }
        }
    }

    #[test]
    fn test_fields_are_independent() {
        // Paid and returned without ever being confirmed or delivered
        let mut status = OrderStatus::default();
        status.apply(StatusUpdate {
            refund: Some(RefundStatus::Paid),
            return_status: Some(ReturnStatus::Returned),
            ..Default::default()
        });
        assert_eq!(status.confirmation, ConfirmationStatus::New);
        assert_eq!(status.delivery, DeliveryStatus::Pending);
        assert_eq!(status.refund, RefundStatus::Paid);
        assert_eq!(status.return_status, ReturnStatus::Returned);
    }

    #[test]
    fn test_empty_update_is_noop() {
        let mut status = OrderStatus {
            confirmation: ConfirmationStatus::Confirmed,
            ..Default::default()
        };
        let before = status;
        let update = StatusUpdate::default();
        assert!(update.is_empty());
        status.apply(update);
        assert_eq!(status, before);
    }

    #[test]
    fn test_parse_status_aliases() {
        assert_eq!(
            "No Answer".parse::<ConfirmationStatus>(),
            Ok(ConfirmationStatus::NoAnswer)
        );
        assert_eq!(
            "annulée".parse::<ConfirmationStatus>(),
            Ok(ConfirmationStatus::Cancelled)
        );
        assert_eq!("ramassé".parse::<PickupStatus>(), Ok(PickupStatus::PickedUp));
        assert_eq!("in-transit".parse::<DeliveryStatus>(), Ok(DeliveryStatus::InTransit));
        assert_eq!("paid".parse::<RefundStatus>(), Ok(RefundStatus::Paid));
        assert_eq!("retour".parse::<ReturnStatus>(), Ok(ReturnStatus::Returned));
        assert_eq!("woo".parse::<OrderSource>(), Ok(OrderSource::WooCommerce));

        let err = "lost".parse::<DeliveryStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown delivery status 'lost'");
    }

    #[test]
    fn test_order_total_includes_shipping() {
        let order = Order {
            id: OrderId(1),
            reference: "A-1".into(),
            client: ClientContact::default(),
            lines: vec![
                OrderLine {
                    product_id: ProductId(1),
                    quantity: 2,
                    unit_price: 150.0,
                },
                OrderLine {
                    product_id: ProductId(2),
                    quantity: 1,
                    unit_price: 80.0,
                },
            ],
            shipping_fee: 35.0,
            source: OrderSource::Manual,
            created_on: jiff::civil::date(2024, 3, 1),
            note: None,
            status: OrderStatus::default(),
        };
        assert_eq!(order.total(), 415.0);
        assert_eq!(order.units(), 3);
    }
}
