//! Single-cell edits of the funnel table.

use serde::{Deserialize, Serialize};

use super::model::{FunnelField, FunnelInputs};
use super::solve::{SolveOutcome, UnchangedReason, solve_checked};

/// One user edit: a cell and the value typed into it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldEdit {
    pub field: FunnelField,
    pub value: f64,
}

impl FieldEdit {
    /// Build an edit from raw text, coercing unparsable values to 0
    #[must_use]
    pub fn from_text(field: FunnelField, text: &str) -> Self {
        Self {
            field,
            value: parse_field_value(text),
        }
    }
}

/// Parse a numeric cell value.
///
/// Empty, non-numeric and non-finite text all read as 0. A trailing `%` and
/// surrounding whitespace are ignored, and a decimal comma is accepted.
#[must_use]
pub fn parse_field_value(text: &str) -> f64 {
    let trimmed = text.trim().trim_end_matches('%').trim();
    let normalized = if trimmed.contains(',') && !trimmed.contains('.') {
        trimmed.replace(',', ".")
    } else {
        trimmed.replace(',', "")
    };
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Outcome of [`apply_edit`], kept for display next to the new inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EditEffect {
    /// A base input was overwritten directly
    Replaced,
    /// A derived value was inverted into a base input
    Solved,
    /// The inverse was undefined and the inputs were kept
    Refused(UnchangedReason),
}

/// Apply one edit to the current inputs.
///
/// Base fields are overwritten; derived fields go through the inverse solver.
#[must_use]
pub fn apply_edit(current: &FunnelInputs, edit: FieldEdit) -> (FunnelInputs, EditEffect) {
    match edit.field {
        FunnelField::Base(field) => (current.with(field, edit.value), EditEffect::Replaced),
        FunnelField::Derived(field) => match solve_checked(current, field, edit.value) {
            SolveOutcome::Applied(inputs) => (inputs, EditEffect::Solved),
            SolveOutcome::Unchanged(reason) => (*current, EditEffect::Refused(reason)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funnel::model::{BaseField, DerivedField};

    #[test]
    fn test_parse_field_value() {
        assert_eq!(parse_field_value("42"), 42.0);
        assert_eq!(parse_field_value("  12.5% "), 12.5);
        assert_eq!(parse_field_value("3,75"), 3.75);
        assert_eq!(parse_field_value("20,000.50"), 20_000.5);
        assert_eq!(parse_field_value("abc"), 0.0);
        assert_eq!(parse_field_value(""), 0.0);
        assert_eq!(parse_field_value("inf"), 0.0);
        assert_eq!(parse_field_value("NaN"), 0.0);
    }

    #[test]
    fn test_base_edit_replaces_value() {
        let current = FunnelInputs {
            leads: 10.0,
            ..Default::default()
        };
        let edit = FieldEdit::from_text(FunnelField::Base(BaseField::Leads), "25");
        let (next, effect) = apply_edit(&current, edit);
        assert_eq!(next.leads, 25.0);
        assert_eq!(effect, EditEffect::Replaced);
    }

    #[test]
    fn test_derived_edit_with_garbage_text_solves_for_zero() {
        let current = FunnelInputs {
            leads: 100.0,
            ad_spend: 300.0,
            ..Default::default()
        };
        let edit = FieldEdit::from_text(FunnelField::Derived(DerivedField::CostPerLead), "n/a");
        let (next, effect) = apply_edit(&current, edit);
        assert_eq!(next.ad_spend, 0.0);
        assert_eq!(effect, EditEffect::Solved);
    }

    #[test]
    fn test_refused_edit_keeps_inputs() {
        let current = FunnelInputs::default();
        let edit = FieldEdit {
            field: FunnelField::Derived(DerivedField::OrdersConfirmed),
            value: 100.0,
        };
        assert_eq!(
            apply_edit(&current, edit),
            (current, EditEffect::Refused(UnchangedReason::NoLeads))
        );
    }
}
