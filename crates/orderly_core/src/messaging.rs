//! WhatsApp message templating and deep links
//!
//! Templates use `{placeholder}` markers. Recognised placeholders:
//! `{client}`, `{reference}`, `{total}`, `{city}`, `{products}`, `{business}`.
//! Anything else in braces is left as written.

use crate::catalog::Catalog;
use crate::model::Order;
use crate::settings::Currency;

/// Values substituted into a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateContext {
    pub client: String,
    pub reference: String,
    pub total: String,
    pub city: String,
    pub products: String,
    pub business: String,
}

impl TemplateContext {
    /// Build the context for an order. Product names come from the catalog;
    /// lines whose product is unknown are listed by id.
    pub fn for_order(order: &Order, catalog: &Catalog, currency: Currency, business: &str) -> Self {
        let products = order
            .lines
            .iter()
            .map(|line| {
                let name = catalog
                    .get(line.product_id)
                    .map_or_else(|| line.product_id.to_string(), |p| p.name.clone());
                if line.quantity == 1 {
                    name
                } else {
                    format!("{} x {name}", line.quantity)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            client: order.client.name.clone(),
            reference: order.reference.clone(),
            total: currency.format(order.total()),
            city: order.client.city.clone(),
            products,
            business: business.to_string(),
        }
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        match key {
            "client" => Some(&self.client),
            "reference" => Some(&self.reference),
            "total" => Some(&self.total),
            "city" => Some(&self.city),
            "products" => Some(&self.products),
            "business" => Some(&self.business),
            _ => None,
        }
    }
}

/// Substitute every known `{placeholder}` in `template`
pub fn render_template(template: &str, context: &TemplateContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                match context.lookup(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Digits-only international number.
///
/// A leading `00` or `+` is an international prefix and is dropped; a single
/// leading `0` is a trunk prefix and is replaced by `country_code`.
pub fn normalize_phone(raw: &str, country_code: &str) -> String {
    let trimmed = raw.trim();
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    let country: String = country_code.chars().filter(char::is_ascii_digit).collect();

    if trimmed.starts_with('+') {
        digits
    } else if let Some(international) = digits.strip_prefix("00") {
        international.to_string()
    } else if let Some(local) = digits.strip_prefix('0') {
        format!("{country}{local}")
    } else {
        digits
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set
pub fn percent_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 3);
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// `https://wa.me/<number>?text=<message>` for an already normalized number
pub fn whatsapp_link(phone: &str, text: &str) -> String {
    format!("https://wa.me/{phone}?text={}", percent_encode(text))
}
