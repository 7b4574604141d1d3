use std::f64::consts::PI;

pub const WEEKLY_PERIOD: f64 = 7.0;
pub const YEARLY_PERIOD: f64 = 365.25;

/// A periodic component expanded into `2 * order` Fourier columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seasonality {
    pub name: &'static str,
    pub period: f64,
    pub order: usize,
}

impl Seasonality {
    pub fn weekly(order: usize) -> Self {
        Self {
            name: "weekly",
            period: WEEKLY_PERIOD,
            order,
        }
    }

    pub fn yearly(order: usize) -> Self {
        Self {
            name: "yearly",
            period: YEARLY_PERIOD,
            order,
        }
    }

    pub fn width(&self) -> usize {
        2 * self.order
    }
}

/// Fourier features of a day offset `t` for the given period, as
/// `[sin(2πt/p), cos(2πt/p), sin(4πt/p), cos(4πt/p), ...]`.
pub fn fourier_features(t: f64, period: f64, order: usize) -> Vec<f64> {
    let mut x = Vec::with_capacity(2 * order);
    for k in 1..=order {
        let c = 2.0 * PI * (k as f64) * t / period;
        x.push(c.sin());
        x.push(c.cos());
    }
    x
}
