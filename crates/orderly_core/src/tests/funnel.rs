//! Tests for the funnel calculator
//!
//! These tests verify:
//! - Forward evaluation of the reference scenario
//! - Each inverse edit reproduces the edited value
//! - Editing a derived value to its current value changes nothing
//! - Zero guards never leak NaN or infinity into the inputs

use proptest::prelude::*;

use crate::funnel::{
    BaseField, DerivedField, FieldEdit, FunnelField, FunnelInputs, FunnelReport, apply_edit,
    evaluate, solve,
};

fn reference_inputs() -> FunnelInputs {
    FunnelInputs {
        leads: 1_000.0,
        ad_spend: 20_000.0,
        confirmation_rate: 60.0,
        delivery_rate: 50.0,
        selling_price: 250.0,
        product_cost: 100.0,
        shipping_fee: 40.0,
    }
}

fn assert_close(actual: f64, expected: f64, what: &str) {
    let tolerance = 1e-6 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "{what}: expected {expected}, got {actual}"
    );
}

#[test]
fn test_reference_scenario_forward_values() {
    let d = evaluate(&reference_inputs());

    assert_close(d.cost_per_lead, 20.0, "cost_per_lead");
    assert_close(d.orders_confirmed, 600.0, "orders_confirmed");
    assert_close(d.orders_delivered, 300.0, "orders_delivered");
    assert_close(d.cost_per_delivery, 66.666_666_67, "cost_per_delivery");
    assert_close(d.total_revenue, 75_000.0, "total_revenue");
    assert_close(d.total_cogs, 30_000.0, "total_cogs");
    assert_close(d.total_shipping, 12_000.0, "total_shipping");
    assert_close(d.total_profit, 13_000.0, "total_profit");
    assert_close(d.profit_per_unit, 43.333_333_33, "profit_per_unit");
    assert_close(d.investment, 50_000.0, "investment");
    assert_close(d.roi, 26.0, "roi");
}

#[test]
fn test_cost_per_lead_edit_sets_ad_spend() {
    let inputs = reference_inputs();
    let solved = solve(&inputs, DerivedField::CostPerLead, 25.0);

    assert_eq!(solved.ad_spend, 25_000.0);
    assert_eq!(evaluate(&solved).cost_per_lead, 25.0);
    assert_eq!(
        FunnelInputs {
            ad_spend: inputs.ad_spend,
            ..solved
        },
        inputs
    );
}

#[test]
fn test_roi_edit_solves_selling_price() {
    let inputs = reference_inputs();
    let solved = solve(&inputs, DerivedField::Roi, 50.0);

    assert_ne!(solved.selling_price, inputs.selling_price);
    let roi = evaluate(&solved).roi;
    assert!(
        ((roi - 50.0) / 50.0).abs() < 1e-6,
        "expected roi 50, got {roi}"
    );
}

#[test]
fn test_every_edit_reproduces_its_value() {
    let inputs = reference_inputs();
    let targets = [
        (DerivedField::CostPerLead, 18.5),
        (DerivedField::OrdersConfirmed, 720.0),
        (DerivedField::OrdersDelivered, 420.0),
        (DerivedField::CostPerDelivery, 55.0),
        (DerivedField::TotalRevenue, 90_000.0),
        (DerivedField::TotalCogs, 27_000.0),
        (DerivedField::TotalShipping, 9_000.0),
        (DerivedField::TotalProfit, -4_000.0),
        (DerivedField::ProfitPerUnit, 60.0),
        (DerivedField::Investment, 65_000.0),
        (DerivedField::Roi, -12.5),
    ];

    for (field, target) in targets {
        let solved = solve(&inputs, field, target);
        assert!(solved.is_finite(), "{field:?} produced non-finite inputs");
        assert_close(evaluate(&solved).get(field), target, field.key());
    }
}

#[test]
fn test_zero_leads_guard() {
    let inputs = FunnelInputs {
        leads: 0.0,
        ..reference_inputs()
    };
    let solved = solve(&inputs, DerivedField::OrdersConfirmed, 100.0);

    assert_eq!(solved, inputs);
    assert!(solved.is_finite());
    let derived = evaluate(&solved);
    assert!(DerivedField::ALL.iter().all(|f| derived.get(*f).is_finite()));
}

#[test]
fn test_evaluate_is_bit_identical() {
    let inputs = reference_inputs();
    let first = evaluate(&inputs);
    let second = evaluate(&inputs);
    for field in DerivedField::ALL {
        assert_eq!(first.get(field).to_bits(), second.get(field).to_bits());
    }
}

#[test]
fn test_edit_sequence_through_apply_edit() {
    // Operator raises the lead count, then targets a 40% ROI
    let mut inputs = reference_inputs();
    let edits = [
        FieldEdit::from_text(FunnelField::Base(BaseField::Leads), "1500"),
        FieldEdit::from_text(FunnelField::Derived(DerivedField::Roi), "40"),
    ];
    for edit in edits {
        inputs = apply_edit(&inputs, edit).0;
    }

    assert_eq!(inputs.leads, 1_500.0);
    assert_close(evaluate(&inputs).roi, 40.0, "roi");
}

#[test]
fn test_report_rows_cover_every_field() {
    let report = FunnelReport::new(reference_inputs());
    let rows = report.rows();
    assert_eq!(rows.len(), BaseField::ALL.len() + DerivedField::ALL.len());
    assert_eq!(rows.iter().filter(|r| r.derived).count(), 11);

    let roi = rows.iter().find(|r| r.key == "roi").unwrap();
    assert!(roi.percentage);
    assert_close(roi.value, 26.0, "roi row");
}

fn arb_inputs() -> impl Strategy<Value = FunnelInputs> {
    (
        100.0f64..10_000.0,
        0.0f64..100_000.0,
        5.0f64..100.0,
        5.0f64..100.0,
        0.0f64..1_000.0,
        0.0f64..500.0,
        0.0f64..100.0,
    )
        .prop_map(
            |(leads, ad_spend, confirmation_rate, delivery_rate, selling_price, product_cost, shipping_fee)| {
                FunnelInputs {
                    leads,
                    ad_spend,
                    confirmation_rate,
                    delivery_rate,
                    selling_price,
                    product_cost,
                    shipping_fee,
                }
            },
        )
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(64))]

    #[test]
    fn prop_editing_a_derived_value_to_itself_is_a_noop(inputs in arb_inputs()) {
        let derived = evaluate(&inputs);
        for field in DerivedField::ALL {
            let solved = solve(&inputs, field, derived.get(field));
            for base in BaseField::ALL {
                let (before, after) = (inputs.get(base), solved.get(base));
                // ROI and investment edits pass through the ad spend share of
                // each delivery, so compare against that magnitude too
                let scale = before.abs().max(derived.cost_per_delivery.abs()).max(1.0);
                prop_assert!(
                    (before - after).abs() <= 1e-6 * scale,
                    "{:?} changed {:?}: {} -> {}", field, base, before, after
                );
            }
        }
    }

    #[test]
    fn prop_solved_inputs_are_always_finite(
        inputs in arb_inputs(),
        zero_leads in any::<bool>(),
        target in -1e6f64..1e6,
    ) {
        let inputs = if zero_leads { FunnelInputs { leads: 0.0, ..inputs } } else { inputs };
        for field in DerivedField::ALL {
            let solved = solve(&inputs, field, target);
            prop_assert!(solved.is_finite());
        }
    }
}
