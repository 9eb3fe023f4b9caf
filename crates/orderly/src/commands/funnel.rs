use clap::{Args, Subcommand};
use color_eyre::eyre::bail;
use orderly_core::OrderStats;
use orderly_core::funnel::{
    BaseField, DerivedField, EditEffect, FieldEdit, FunnelField, FunnelInputs, FunnelReport,
    SweepAxis, SweepGrid, apply_edit, break_even_selling_price, sweep,
};
use serde::Serialize;

use super::{Output, parse_finite};
use crate::platform::Storage;
use crate::repository::Repository;
use crate::util::format::{format_table, format_value};

/// Base inputs given on the command line, each overriding the saved value
#[derive(Args, Debug, Clone, Default)]
pub struct InputOverrides {
    #[arg(long, value_parser = parse_finite)]
    pub leads: Option<f64>,
    #[arg(long, value_parser = parse_finite)]
    pub ad_spend: Option<f64>,
    /// Percent of leads confirmed
    #[arg(long, value_parser = parse_finite)]
    pub confirmation_rate: Option<f64>,
    /// Percent of confirmed orders delivered
    #[arg(long, value_parser = parse_finite)]
    pub delivery_rate: Option<f64>,
    #[arg(long, value_parser = parse_finite)]
    pub selling_price: Option<f64>,
    #[arg(long, value_parser = parse_finite)]
    pub product_cost: Option<f64>,
    #[arg(long, value_parser = parse_finite)]
    pub shipping_fee: Option<f64>,
}

impl InputOverrides {
    fn values(&self) -> [(BaseField, Option<f64>); 7] {
        [
            (BaseField::Leads, self.leads),
            (BaseField::AdSpend, self.ad_spend),
            (BaseField::ConfirmationRate, self.confirmation_rate),
            (BaseField::DeliveryRate, self.delivery_rate),
            (BaseField::SellingPrice, self.selling_price),
            (BaseField::ProductCost, self.product_cost),
            (BaseField::ShippingFee, self.shipping_fee),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.values().iter().all(|(_, v)| v.is_none())
    }

    pub fn apply(&self, inputs: FunnelInputs) -> FunnelInputs {
        self.values()
            .into_iter()
            .fold(inputs, |acc, (field, value)| match value {
                Some(v) => acc.with(field, v),
                None => acc,
            })
    }
}

#[derive(Subcommand, Debug)]
pub enum FunnelCommand {
    /// Show the funnel table for the saved inputs
    Show {
        #[command(flatten)]
        inputs: InputOverrides,
        /// Keep the overridden inputs as the new saved inputs
        #[arg(long)]
        save: bool,
    },
    /// Edit one cell; derived cells are solved back into a base input
    Edit {
        /// Field name, e.g. leads, costPerLead, roi, cpl
        field: FunnelField,
        /// New value; a trailing % and a decimal comma are accepted
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Evaluate a metric over a grid of one or two base inputs
    Sweep {
        /// Base input on the first axis
        #[arg(long)]
        x: BaseField,
        #[arg(long = "from")]
        x_from: f64,
        #[arg(long = "to")]
        x_to: f64,
        /// Optional base input on the second axis
        #[arg(long, requires_all = ["y_from", "y_to"])]
        y: Option<BaseField>,
        #[arg(long)]
        y_from: Option<f64>,
        #[arg(long)]
        y_to: Option<f64>,
        /// Samples per axis, endpoints included
        #[arg(long, default_value_t = 11)]
        points: usize,
        #[arg(long, default_value = "roi")]
        metric: DerivedField,
        #[command(flatten)]
        inputs: InputOverrides,
    },
    /// Selling price at which total profit is zero
    BreakEven {
        #[command(flatten)]
        inputs: InputOverrides,
    },
    /// Funnel using the conversion rates measured in the order book
    Observed {
        /// Ad spend for the period; defaults to the saved ad spend
        #[arg(long, value_parser = parse_finite)]
        ad_spend: Option<f64>,
    },
    /// Clear the saved inputs
    Reset,
}

#[derive(Debug, Serialize)]
struct EditResult {
    field: String,
    value: f64,
    effect: EditEffect,
    report: FunnelReport,
}

#[derive(Debug, Serialize)]
struct BreakEven {
    inputs: FunnelInputs,
    break_even_price: Option<f64>,
    margin_of_safety: Option<f64>,
}

pub fn run<S: Storage>(
    repo: &Repository<S>,
    cmd: FunnelCommand,
    out: &Output,
) -> color_eyre::Result<String> {
    match cmd {
        FunnelCommand::Show { inputs, save } => {
            let current = inputs.apply(repo.funnel()?);
            if save && !inputs.is_empty() {
                repo.save_funnel(&current)?;
                tracing::info!("Saved funnel inputs");
            }
            out.render(&FunnelReport::new(current), render_report)
        }
        FunnelCommand::Edit { field, value } => {
            let current = repo.funnel()?;
            let edit = FieldEdit::from_text(field, &value);
            let (next, effect) = apply_edit(&current, edit);
            match effect {
                EditEffect::Refused(reason) => {
                    tracing::warn!(%field, value = edit.value, %reason, "Funnel edit refused");
                }
                _ => {
                    repo.save_funnel(&next)?;
                    tracing::info!(%field, value = edit.value, ?effect, "Funnel edited");
                }
            }
            let result = EditResult {
                field: field.key().to_string(),
                value: edit.value,
                effect,
                report: FunnelReport::new(next),
            };
            out.render(&result, |r| {
                let headline = match r.effect {
                    EditEffect::Replaced => format!("Set {} to {}", r.field, r.value),
                    EditEffect::Solved => match field {
                        FunnelField::Derived(d) => format!(
                            "Set {} to {} by solving for {}",
                            r.field,
                            r.value,
                            d.solves_for().key()
                        ),
                        FunnelField::Base(_) => format!("Set {} to {}", r.field, r.value),
                    },
                    EditEffect::Refused(reason) => {
                        format!("Left inputs unchanged: cannot set {} when {reason}", r.field)
                    }
                };
                format!("{headline}\n\n{}", render_report(&r.report))
            })
        }
        FunnelCommand::Sweep {
            x,
            x_from,
            x_to,
            y,
            y_from,
            y_to,
            points,
            metric,
            inputs,
        } => {
            if points == 0 {
                bail!("a sweep needs at least one point per axis");
            }
            let base = inputs.apply(repo.funnel()?);
            let x_axis = SweepAxis::new(x, x_from, x_to, points);
            let y_axis = match (y, y_from, y_to) {
                (Some(field), Some(from), Some(to)) => Some(SweepAxis::new(field, from, to, points)),
                (Some(_), _, _) => bail!("--y needs both --y-from and --y-to"),
                _ => None,
            };
            let grid = sweep(&base, x_axis, y_axis, metric);
            tracing::debug!(points = grid.points.len(), metric = metric.key(), "Sweep evaluated");
            out.render(&grid, render_sweep)
        }
        FunnelCommand::BreakEven { inputs } => {
            let current = inputs.apply(repo.funnel()?);
            let price = break_even_selling_price(&current);
            let result = BreakEven {
                inputs: current,
                break_even_price: price,
                margin_of_safety: price
                    .filter(|_| current.selling_price != 0.0)
                    .map(|p| (current.selling_price - p) / current.selling_price * 100.0),
            };
            out.render(&result, |r| match (r.break_even_price, r.margin_of_safety) {
                (Some(price), Some(margin)) => format!(
                    "Break-even selling price: {}\nCurrent price {} is {} {} it",
                    format_value(price, false),
                    format_value(r.inputs.selling_price, false),
                    format_value(margin.abs(), true),
                    if margin < 0.0 { "below" } else { "above" }
                ),
                (Some(price), None) => {
                    format!("Break-even selling price: {}", format_value(price, false))
                }
                _ => "No break-even price: no orders are delivered".to_string(),
            })
        }
        FunnelCommand::Observed { ad_spend } => {
            let saved = repo.funnel()?;
            let stats = OrderStats::compute(repo.orders()?.orders());
            let inputs = stats.funnel_inputs(
                ad_spend.unwrap_or(saved.ad_spend),
                saved.selling_price,
                saved.product_cost,
                saved.shipping_fee,
            );
            out.render(&FunnelReport::new(inputs), |r| {
                format!(
                    "Measured over {} orders\n\n{}",
                    stats.total,
                    render_report(r)
                )
            })
        }
        FunnelCommand::Reset => {
            repo.save_funnel(&FunnelInputs::default())?;
            tracing::info!("Funnel inputs reset");
            out.render(&FunnelReport::new(FunnelInputs::default()), render_report)
        }
    }
}

fn render_report(report: &FunnelReport) -> String {
    let rows: Vec<Vec<String>> = report
        .rows()
        .into_iter()
        .map(|row| {
            vec![
                row.label.to_string(),
                row.key.to_string(),
                format_value(row.value, row.percentage),
                if row.derived { "derived" } else { "input" }.to_string(),
            ]
        })
        .collect();
    format_table(&["Field", "Key", "Value", "Kind"], &rows)
}

fn render_sweep(grid: &SweepGrid) -> String {
    let percentage = grid.metric.is_percentage();
    let mut headers = vec![grid.x.field.key()];
    if let Some(y) = &grid.y {
        headers.push(y.field.key());
    }
    headers.push(grid.metric.key());

    let rows: Vec<Vec<String>> = grid
        .points
        .iter()
        .map(|p| {
            let mut row = vec![format_value(p.x, grid.x.field.is_percentage())];
            if let (Some(axis), Some(y)) = (&grid.y, p.y) {
                row.push(format_value(y, axis.field.is_percentage()));
            }
            row.push(format_value(p.value, percentage));
            row
        })
        .collect();

    let mut text = format_table(&headers, &rows);
    if let (Some(best), Some(worst)) = (grid.best(), grid.worst()) {
        text.push_str(&format!(
            "\n\nBest {}: {}  Worst: {}",
            grid.metric.key(),
            format_value(best.value, percentage),
            format_value(worst.value, percentage)
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;

    fn reference_repo() -> Repository<MemoryStorage> {
        let repo = Repository::new(MemoryStorage::new());
        repo.save_funnel(&FunnelInputs {
            leads: 1_000.0,
            ad_spend: 20_000.0,
            confirmation_rate: 60.0,
            delivery_rate: 50.0,
            selling_price: 250.0,
            product_cost: 100.0,
            shipping_fee: 40.0,
        })
        .unwrap();
        repo
    }

    fn edit(repo: &Repository<MemoryStorage>, field: &str, value: &str) -> String {
        let cmd = FunnelCommand::Edit {
            field: field.parse().unwrap(),
            value: value.into(),
        };
        run(repo, cmd, &Output::default()).unwrap()
    }

    #[test]
    fn test_show_renders_every_row() {
        let repo = reference_repo();
        let cmd = FunnelCommand::Show {
            inputs: InputOverrides::default(),
            save: false,
        };
        let text = run(&repo, cmd, &Output::default()).unwrap();
        assert!(text.contains("roi"));
        assert!(text.contains("26.00%"));
        assert!(text.contains("13000.00"));
        // header, rule, 7 inputs, 11 derived
        assert_eq!(text.lines().count(), 20);
    }

    #[test]
    fn test_show_overrides_are_saved_only_on_request() {
        let repo = reference_repo();
        let inputs = InputOverrides {
            leads: Some(2_000.0),
            ..Default::default()
        };
        run(
            &repo,
            FunnelCommand::Show {
                inputs: inputs.clone(),
                save: false,
            },
            &Output::default(),
        )
        .unwrap();
        assert_eq!(repo.funnel().unwrap().leads, 1_000.0);

        run(&repo, FunnelCommand::Show { inputs, save: true }, &Output::default()).unwrap();
        assert_eq!(repo.funnel().unwrap().leads, 2_000.0);
    }

    #[test]
    fn test_edit_solves_and_saves() {
        let repo = reference_repo();
        let text = edit(&repo, "cpl", "25");
        assert!(text.starts_with("Set costPerLead to 25 by solving for adSpend"));
        assert_eq!(repo.funnel().unwrap().ad_spend, 25_000.0);
    }

    #[test]
    fn test_refused_edit_does_not_save() {
        let repo = Repository::new(MemoryStorage::new());
        let text = edit(&repo, "ordersConfirmed", "100");
        assert!(text.starts_with("Left inputs unchanged"));
        assert!(text.contains("there are no leads"));
        assert_eq!(repo.funnel().unwrap(), FunnelInputs::default());
    }

    #[test]
    fn test_edit_json_output() {
        let repo = reference_repo();
        let cmd = FunnelCommand::Edit {
            field: "roi".parse().unwrap(),
            value: "50%".into(),
        };
        let json = run(&repo, cmd, &Output::new(true)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["effect"], "Solved");
        let roi = value["report"]["derived"]["roi"].as_f64().unwrap();
        assert!((roi - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_sweep_and_break_even() {
        let repo = reference_repo();
        let cmd = FunnelCommand::Sweep {
            x: BaseField::SellingPrice,
            x_from: 200.0,
            x_to: 300.0,
            y: None,
            y_from: None,
            y_to: None,
            points: 3,
            metric: DerivedField::TotalProfit,
            inputs: InputOverrides::default(),
        };
        let json = run(&repo, cmd, &Output::new(true)).unwrap();
        let grid: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(grid["points"].as_array().unwrap().len(), 3);

        let text = run(
            &repo,
            FunnelCommand::BreakEven {
                inputs: InputOverrides::default(),
            },
            &Output::default(),
        )
        .unwrap();
        // 100 + 40 + 20000 / 300
        assert!(text.contains("Break-even selling price: 206.67"), "{text}");
        assert!(text.contains("Current price 250.00 is 17.33% above it"), "{text}");
    }

    #[test]
    fn test_price_under_break_even_is_reported_below() {
        let repo = reference_repo();
        let inputs = InputOverrides {
            selling_price: Some(180.0),
            ..Default::default()
        };
        let text = run(&repo, FunnelCommand::BreakEven { inputs }, &Output::default()).unwrap();
        // (180 - 206.67) / 180
        assert!(text.contains("Current price 180.00 is 14.81% below it"), "{text}");
    }

    #[derive(clap::Parser, Debug)]
    struct OverridesCli {
        #[command(flatten)]
        inputs: InputOverrides,
    }

    #[test]
    fn test_overrides_reject_non_finite_numbers() {
        use clap::Parser;

        for bad in ["inf", "NaN", "-infinity"] {
            let parsed = OverridesCli::try_parse_from(["funnel", "--leads", bad]);
            assert!(parsed.is_err(), "{bad} must be rejected");
        }
        let parsed = OverridesCli::try_parse_from(["funnel", "--ad-spend", "1500.5"]).unwrap();
        assert_eq!(parsed.inputs.ad_spend, Some(1_500.5));
    }
}
