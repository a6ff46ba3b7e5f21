//! Data access layer: where material history comes from.

pub mod fixture;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::Result;

pub use fixture::FixtureStore;
pub use postgres::PgStore;

/// Price reported when a material has no row with a positive price.
pub const DEFAULT_PRICE: f64 = 1.0;

/// One stored observation of `material_data`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MaterialRecord {
    pub material_id: String,
    pub date: NaiveDate,
    pub quantity: f64,
    /// Zero means unknown.
    pub price: f64,
}

/// A history row as the store hands it out, before coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObservation {
    pub date: String,
    pub quantity: String,
}

impl From<&MaterialRecord> for RawObservation {
    fn from(record: &MaterialRecord) -> Self {
        Self {
            date: record.date.format("%Y-%m-%d").to_string(),
            quantity: record.quantity.to_string(),
        }
    }
}

/// Everything the forecast pipeline needs from the store for one material.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialHistory {
    /// Rows ordered ascending by date.
    pub rows: Vec<RawObservation>,
    pub last_price: f64,
}

impl MaterialHistory {
    pub fn new(rows: Vec<RawObservation>, last_price: Option<f64>) -> Self {
        Self {
            rows,
            last_price: last_price.unwrap_or(DEFAULT_PRICE),
        }
    }
}

/// Read-only source of material history.
///
/// Implementations return `NotFound` for an empty history and `Connectivity`
/// when the backing store cannot be reached.
#[async_trait]
pub trait MaterialStore: Send + Sync {
    async fn load_history(&self, material_id: &str) -> Result<MaterialHistory>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_price_defaults_to_one() {
        let history = MaterialHistory::new(Vec::new(), None);
        assert_eq!(history.last_price, DEFAULT_PRICE);
        let history = MaterialHistory::new(Vec::new(), Some(12.5));
        assert_eq!(history.last_price, 12.5);
    }
}
