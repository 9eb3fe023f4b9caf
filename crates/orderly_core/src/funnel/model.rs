//! Funnel metric model
//!
//! The seven base inputs of a lead-to-profit funnel and the values derived
//! from them. Field enums give every cell a stable name so edits can be
//! addressed from text (CLI arguments, table headers) without stringly-typed
//! lookups.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Base inputs of the funnel. Rates are percentages in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FunnelInputs {
    pub leads: f64,
    pub ad_spend: f64,
    pub confirmation_rate: f64,
    pub delivery_rate: f64,
    pub selling_price: f64,
    pub product_cost: f64,
    pub shipping_fee: f64,
}

impl FunnelInputs {
    /// Read a single base field
    #[must_use]
    pub fn get(&self, field: BaseField) -> f64 {
        match field {
            BaseField::Leads => self.leads,
            BaseField::AdSpend => self.ad_spend,
            BaseField::ConfirmationRate => self.confirmation_rate,
            BaseField::DeliveryRate => self.delivery_rate,
            BaseField::SellingPrice => self.selling_price,
            BaseField::ProductCost => self.product_cost,
            BaseField::ShippingFee => self.shipping_fee,
        }
    }

    /// Copy of `self` with one base field replaced
    #[must_use]
    pub fn with(mut self, field: BaseField, value: f64) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: BaseField, value: f64) {
        let slot = match field {
            BaseField::Leads => &mut self.leads,
            BaseField::AdSpend => &mut self.ad_spend,
            BaseField::ConfirmationRate => &mut self.confirmation_rate,
            BaseField::DeliveryRate => &mut self.delivery_rate,
            BaseField::SellingPrice => &mut self.selling_price,
            BaseField::ProductCost => &mut self.product_cost,
            BaseField::ShippingFee => &mut self.shipping_fee,
        };
        *slot = value;
    }

    /// Orders confirmed out of the lead pool
    #[must_use]
    pub fn confirmed(&self) -> f64 {
        self.leads * self.confirmation_rate / 100.0
    }

    /// Orders delivered out of the confirmed pool
    #[must_use]
    pub fn delivered(&self) -> f64 {
        self.confirmed() * self.delivery_rate / 100.0
    }

    /// True when every field is a finite number
    #[must_use]
    pub fn is_finite(&self) -> bool {
        BaseField::ALL.iter().all(|f| self.get(*f).is_finite())
    }
}

/// Values computed from [`FunnelInputs`] by the forward evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FunnelDerived {
    pub cost_per_lead: f64,
    pub orders_confirmed: f64,
    pub orders_delivered: f64,
    pub cost_per_delivery: f64,
    pub total_revenue: f64,
    pub total_cogs: f64,
    pub total_shipping: f64,
    pub total_profit: f64,
    pub profit_per_unit: f64,
    pub investment: f64,
    pub roi: f64,
}

impl FunnelDerived {
    #[must_use]
    pub fn get(&self, field: DerivedField) -> f64 {
        match field {
            DerivedField::CostPerLead => self.cost_per_lead,
            DerivedField::OrdersConfirmed => self.orders_confirmed,
            DerivedField::OrdersDelivered => self.orders_delivered,
            DerivedField::CostPerDelivery => self.cost_per_delivery,
            DerivedField::TotalRevenue => self.total_revenue,
            DerivedField::TotalCogs => self.total_cogs,
            DerivedField::TotalShipping => self.total_shipping,
            DerivedField::TotalProfit => self.total_profit,
            DerivedField::ProfitPerUnit => self.profit_per_unit,
            DerivedField::Investment => self.investment,
            DerivedField::Roi => self.roi,
        }
    }
}

/// Names of the base inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BaseField {
    Leads,
    AdSpend,
    ConfirmationRate,
    DeliveryRate,
    SellingPrice,
    ProductCost,
    ShippingFee,
}

impl BaseField {
    pub const ALL: [BaseField; 7] = [
        BaseField::Leads,
        BaseField::AdSpend,
        BaseField::ConfirmationRate,
        BaseField::DeliveryRate,
        BaseField::SellingPrice,
        BaseField::ProductCost,
        BaseField::ShippingFee,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Leads => "Leads",
            Self::AdSpend => "Ad Spend",
            Self::ConfirmationRate => "Confirmation Rate",
            Self::DeliveryRate => "Delivery Rate",
            Self::SellingPrice => "Selling Price",
            Self::ProductCost => "Product Cost",
            Self::ShippingFee => "Shipping Fee",
        }
    }

    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Leads => "leads",
            Self::AdSpend => "adSpend",
            Self::ConfirmationRate => "confirmationRate",
            Self::DeliveryRate => "deliveryRate",
            Self::SellingPrice => "sellingPrice",
            Self::ProductCost => "productCost",
            Self::ShippingFee => "shippingFee",
        }
    }

    #[must_use]
    pub fn is_percentage(&self) -> bool {
        matches!(self, Self::ConfirmationRate | Self::DeliveryRate)
    }
}

/// Names of the derived values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DerivedField {
    CostPerLead,
    OrdersConfirmed,
    OrdersDelivered,
    CostPerDelivery,
    TotalRevenue,
    TotalCogs,
    TotalShipping,
    TotalProfit,
    ProfitPerUnit,
    Investment,
    Roi,
}

impl DerivedField {
    pub const ALL: [DerivedField; 11] = [
        DerivedField::CostPerLead,
        DerivedField::OrdersConfirmed,
        DerivedField::OrdersDelivered,
        DerivedField::CostPerDelivery,
        DerivedField::TotalRevenue,
        DerivedField::TotalCogs,
        DerivedField::TotalShipping,
        DerivedField::TotalProfit,
        DerivedField::ProfitPerUnit,
        DerivedField::Investment,
        DerivedField::Roi,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::CostPerLead => "Cost per Lead",
            Self::OrdersConfirmed => "Orders Confirmed",
            Self::OrdersDelivered => "Orders Delivered",
            Self::CostPerDelivery => "Cost per Delivery",
            Self::TotalRevenue => "Total Revenue",
            Self::TotalCogs => "Total COGS",
            Self::TotalShipping => "Total Shipping",
            Self::TotalProfit => "Total Profit",
            Self::ProfitPerUnit => "Profit per Unit",
            Self::Investment => "Investment",
            Self::Roi => "ROI",
        }
    }

    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::CostPerLead => "costPerLead",
            Self::OrdersConfirmed => "ordersConfirmed",
            Self::OrdersDelivered => "ordersDelivered",
            Self::CostPerDelivery => "costPerDelivery",
            Self::TotalRevenue => "totalRevenue",
            Self::TotalCogs => "totalCogs",
            Self::TotalShipping => "totalShipping",
            Self::TotalProfit => "totalProfit",
            Self::ProfitPerUnit => "profitPerUnit",
            Self::Investment => "investment",
            Self::Roi => "roi",
        }
    }

    /// The base input an edit of this field mutates
    #[must_use]
    pub fn solves_for(&self) -> BaseField {
        match self {
            Self::CostPerLead | Self::CostPerDelivery | Self::Investment => BaseField::AdSpend,
            Self::OrdersConfirmed => BaseField::ConfirmationRate,
            Self::OrdersDelivered => BaseField::DeliveryRate,
            Self::TotalRevenue | Self::TotalProfit | Self::ProfitPerUnit | Self::Roi => {
                BaseField::SellingPrice
            }
            Self::TotalCogs => BaseField::ProductCost,
            Self::TotalShipping => BaseField::ShippingFee,
        }
    }

    #[must_use]
    pub fn is_percentage(&self) -> bool {
        matches!(self, Self::Roi)
    }
}

/// Any addressable cell of the funnel table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunnelField {
    Base(BaseField),
    Derived(DerivedField),
}

impl FunnelField {
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Base(f) => f.key(),
            Self::Derived(f) => f.key(),
        }
    }
}

impl fmt::Display for FunnelField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Error returned when a field name does not match any funnel cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFieldError(pub String);

impl fmt::Display for UnknownFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown funnel field '{}'", self.0)
    }
}

impl std::error::Error for UnknownFieldError {}

/// Accepts `costPerLead`, `cost-per-lead` and `cost_per_lead` alike
fn normalize_key(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for FunnelField {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_key(s);
        if let Some(field) = BaseField::ALL
            .iter()
            .find(|f| normalize_key(f.key()) == wanted)
        {
            return Ok(Self::Base(*field));
        }
        // Short aliases used in the dashboard headers
        let alias = match wanted.as_str() {
            "cpl" => Some(DerivedField::CostPerLead),
            "cpd" => Some(DerivedField::CostPerDelivery),
            "cogs" => Some(DerivedField::TotalCogs),
            "profit" => Some(DerivedField::TotalProfit),
            "revenue" => Some(DerivedField::TotalRevenue),
            _ => None,
        };
        alias
            .or_else(|| {
                DerivedField::ALL
                    .iter()
                    .copied()
                    .find(|f| normalize_key(f.key()) == wanted)
            })
            .map(Self::Derived)
            .ok_or_else(|| UnknownFieldError(s.to_string()))
    }
}

impl FromStr for BaseField {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<FunnelField>()? {
            FunnelField::Base(field) => Ok(field),
            FunnelField::Derived(_) => Err(UnknownFieldError(s.to_string())),
        }
    }
}

impl FromStr for DerivedField {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<FunnelField>()? {
            FunnelField::Derived(field) => Ok(field),
            FunnelField::Base(_) => Err(UnknownFieldError(s.to_string())),
        }
    }
}
