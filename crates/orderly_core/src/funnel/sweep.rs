//! Sensitivity sweeps over the funnel model
//!
//! Evaluates one derived metric on a regular grid over one or two base
//! inputs, holding the remaining inputs fixed. Grid points are independent, so
//! they are evaluated in parallel when the `parallel` feature is enabled.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::evaluate::evaluate;
use super::model::{BaseField, DerivedField, FunnelInputs};

/// One swept dimension: a base input and the range it covers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepAxis {
    pub field: BaseField,
    pub from: f64,
    pub to: f64,
    /// Number of evenly spaced samples, endpoints included
    pub points: usize,
}

impl SweepAxis {
    #[must_use]
    pub fn new(field: BaseField, from: f64, to: f64, points: usize) -> Self {
        Self {
            field,
            from,
            to,
            points,
        }
    }

    /// Sample values along the axis. A single point sits at the midpoint.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        match self.points {
            0 => Vec::new(),
            1 => vec![(self.from + self.to) / 2.0],
            n => (0..n)
                .map(|i| self.from + (self.to - self.from) * (i as f64) / (n - 1) as f64)
                .collect(),
        }
    }
}

/// One evaluated grid point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub x: f64,
    pub y: Option<f64>,
    pub value: f64,
}

/// Every evaluated point of a sweep, x-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepGrid {
    pub x: SweepAxis,
    pub y: Option<SweepAxis>,
    pub metric: DerivedField,
    pub points: Vec<SweepPoint>,
}

impl SweepGrid {
    /// Point with the largest metric value
    #[must_use]
    pub fn best(&self) -> Option<&SweepPoint> {
        self.points
            .iter()
            .max_by(|a, b| a.value.total_cmp(&b.value))
    }

    /// Point with the smallest metric value
    #[must_use]
    pub fn worst(&self) -> Option<&SweepPoint> {
        self.points
            .iter()
            .min_by(|a, b| a.value.total_cmp(&b.value))
    }
}

/// Evaluate `metric` on the grid spanned by `x` (and `y`, if given)
#[must_use]
pub fn sweep(
    base: &FunnelInputs,
    x: SweepAxis,
    y: Option<SweepAxis>,
    metric: DerivedField,
) -> SweepGrid {
    let xs = x.values();
    let ys: Vec<Option<f64>> = match y {
        Some(axis) => axis.values().into_iter().map(Some).collect(),
        None => vec![None],
    };

    let coords: Vec<(f64, Option<f64>)> = xs
        .iter()
        .flat_map(|&xv| ys.iter().map(move |&yv| (xv, yv)))
        .collect();

    let eval_point = |&(xv, yv): &(f64, Option<f64>)| {
        let mut inputs = base.with(x.field, xv);
        if let (Some(axis), Some(yv)) = (y, yv) {
            inputs.set(axis.field, yv);
        }
        SweepPoint {
            x: xv,
            y: yv,
            value: evaluate(&inputs).get(metric),
        }
    };

    #[cfg(feature = "parallel")]
    let points: Vec<SweepPoint> = coords.par_iter().map(eval_point).collect();

    #[cfg(not(feature = "parallel"))]
    let points: Vec<SweepPoint> = coords.iter().map(eval_point).collect();

    SweepGrid {
        x,
        y,
        metric,
        points,
    }
}

/// Selling price at which total profit is exactly zero.
///
/// `None` when no order is delivered, since no price can offset the spend.
#[must_use]
pub fn break_even_selling_price(inputs: &FunnelInputs) -> Option<f64> {
    let delivered = inputs.delivered();
    if delivered == 0.0 {
        return None;
    }
    Some(inputs.product_cost + inputs.shipping_fee + inputs.ad_spend / delivered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> FunnelInputs {
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

    #[test]
    fn test_axis_values() {
        let axis = SweepAxis::new(BaseField::ConfirmationRate, 40.0, 80.0, 5);
        assert_eq!(axis.values(), vec![40.0, 50.0, 60.0, 70.0, 80.0]);
        assert_eq!(
            SweepAxis::new(BaseField::Leads, 0.0, 10.0, 1).values(),
            vec![5.0]
        );
        assert!(SweepAxis::new(BaseField::Leads, 0.0, 10.0, 0).values().is_empty());
    }

    #[test]
    fn test_one_dimensional_sweep() {
        let grid = sweep(
            &base(),
            SweepAxis::new(BaseField::DeliveryRate, 0.0, 100.0, 3),
            None,
            DerivedField::OrdersDelivered,
        );
        let values: Vec<f64> = grid.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![0.0, 300.0, 600.0]);
        assert!(grid.points.iter().all(|p| p.y.is_none()));
    }

    #[test]
    fn test_two_dimensional_sweep_is_x_major() {
        let grid = sweep(
            &base(),
            SweepAxis::new(BaseField::ConfirmationRate, 50.0, 60.0, 2),
            Some(SweepAxis::new(BaseField::DeliveryRate, 40.0, 50.0, 2)),
            DerivedField::TotalProfit,
        );
        assert_eq!(grid.points.len(), 4);
        assert_eq!(grid.points[0].x, 50.0);
        assert_eq!(grid.points[0].y, Some(40.0));
        assert_eq!(grid.points[1].y, Some(50.0));
        let best = grid.best().unwrap();
        assert_eq!((best.x, best.y), (60.0, Some(50.0)));
        assert!((best.value - 13_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_break_even_price() {
        let price = break_even_selling_price(&base()).unwrap();
        let at_break_even = evaluate(&base().with(BaseField::SellingPrice, price));
        assert!(at_break_even.total_profit.abs() < 1e-6);

        let no_delivery = base().with(BaseField::DeliveryRate, 0.0);
        assert_eq!(break_even_selling_price(&no_delivery), None);
    }
}
