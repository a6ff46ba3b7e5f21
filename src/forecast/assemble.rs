//! Building the flat JSON object returned to clients.

use chrono::{Datelike, Months, NaiveDate};
use indexmap::IndexMap;
use rand::Rng;
use serde::Serialize;
use serde_json::Value;

use crate::forecast::prepare::Series;

/// Band of the multiplicative noise applied to past quantities.
pub const NOISE_BAND: (f64, f64) = (0.85, 1.15);

/// Ordered label → value mapping; serializes as a JSON object in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ForecastResult(IndexMap<String, Value>);

impl ForecastResult {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }
}

/// `Predicted Quantity Mar 2026`.
pub fn month_label(date: NaiveDate) -> String {
    format!("Predicted Quantity {}", date.format("%b %Y"))
}

/// First day of the reference month, then one month apart.
pub fn forecast_months(as_of: NaiveDate, horizon: usize) -> Vec<NaiveDate> {
    let start = as_of.with_day(1).unwrap_or(as_of);
    (0..horizon)
        .filter_map(|i| start.checked_add_months(Months::new(i as u32)))
        .collect()
}

/// Floor at zero, then round half to even.
pub fn clamp_round(value: f64) -> i64 {
    if value.is_nan() {
        return 0;
    }
    value.max(0.0).round_ties_even() as i64
}

/// Assemble the response object for one material.
///
/// Past quantities in years strictly between the earliest observed year and
/// the reference year are echoed with uniform noise from [`NOISE_BAND`]. They
/// are decorative: the fitted model plays no part in them.
pub fn assemble<R: Rng>(
    material_id: &str,
    last_price: f64,
    series: &Series,
    forecasts: &[(NaiveDate, i64)],
    as_of: NaiveDate,
    rng: &mut R,
) -> ForecastResult {
    let mut result = ForecastResult::default();
    result.insert("Material ID", material_id);
    result.insert("Price", last_price);

    for (month, quantity) in forecasts {
        result.insert(month_label(*month), *quantity);
    }

    if let Some(min_year) = series.min_year() {
        let eligible = (min_year + 1)..as_of.year();
        for (date, quantity) in series.points() {
            if !eligible.contains(&date.year()) {
                continue;
            }
            let factor = rng.gen_range(NOISE_BAND.0..=NOISE_BAND.1);
            result.insert(month_label(*date), (quantity * factor).round_ties_even() as i64);
        }
    }
    result
}
