//! In-memory material store loaded from a CSV export of `material_data`.

use std::{collections::HashMap, path::Path};

use anyhow::Context;
use async_trait::async_trait;
use csv::ReaderBuilder;
use tracing::{info, instrument};

use crate::{
    data::{MaterialHistory, MaterialRecord, MaterialStore, RawObservation},
    error::{ForecastError, Result},
};

/// Store answering from records held in memory, grouped by material.
#[derive(Debug, Clone, Default)]
pub struct FixtureStore {
    by_material: HashMap<String, Vec<MaterialRecord>>,
}

impl FixtureStore {
    pub fn from_records(records: impl IntoIterator<Item = MaterialRecord>) -> Self {
        let mut by_material: HashMap<String, Vec<MaterialRecord>> = HashMap::new();
        for record in records {
            by_material
                .entry(record.material_id.clone())
                .or_default()
                .push(record);
        }
        for rows in by_material.values_mut() {
            rows.sort_by_key(|r| r.date);
        }
        Self { by_material }
    }

    /// Read a headed CSV file with `material_id,date,quantity,price` columns.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .with_context(|| format!("opening fixture {}", path.display()))?;
        let mut records = Vec::new();
        for result in reader.deserialize::<MaterialRecord>() {
            records.push(result.with_context(|| format!("parsing fixture {}", path.display()))?);
        }
        info!(path = %path.display(), rows = records.len(), "loaded fixture store");
        Ok(Self::from_records(records))
    }
}

#[async_trait]
impl MaterialStore for FixtureStore {
    #[instrument(skip(self))]
    async fn load_history(&self, material_id: &str) -> Result<MaterialHistory> {
        let records = self
            .by_material
            .get(material_id)
            .filter(|rows| !rows.is_empty())
            .ok_or_else(|| ForecastError::NotFound(material_id.to_string()))?;

        let last_price = records
            .iter()
            .rev()
            .find(|r| r.price > 0.0)
            .map(|r| r.price);
        let rows = records.iter().map(RawObservation::from).collect();
        Ok(MaterialHistory::new(rows, last_price))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::NaiveDate;

    use super::*;

    fn record(date: (i32, u32, u32), quantity: f64, price: f64) -> MaterialRecord {
        MaterialRecord {
            material_id: "M1".to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            quantity,
            price,
        }
    }

    #[tokio::test]
    async fn latest_positive_price_wins() {
        let store = FixtureStore::from_records(vec![
            record((2024, 3, 1), 5.0, 0.0),
            record((2024, 1, 1), 3.0, 7.0),
            record((2024, 2, 1), 4.0, 9.5),
        ]);
        let history = store.load_history("M1").await.unwrap();
        assert_eq!(history.last_price, 9.5);
        let dates: Vec<_> = history.rows.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, ["2024-01-01", "2024-02-01", "2024-03-01"]);
    }

    #[tokio::test]
    async fn unpriced_history_uses_default() {
        let store = FixtureStore::from_records(vec![record((2024, 1, 1), 3.0, 0.0)]);
        let history = store.load_history("M1").await.unwrap();
        assert_eq!(history.last_price, 1.0);
    }

    #[tokio::test]
    async fn unknown_material_is_not_found() {
        let store = FixtureStore::default();
        let err = store.load_history("NOPE").await.unwrap_err();
        assert!(matches!(err, ForecastError::NotFound(id) if id == "NOPE"));
    }

    #[tokio::test]
    async fn reads_csv_exports() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "material_id,date,quantity,price").unwrap();
        writeln!(file, "M1,2024-01-01,10,2.5").unwrap();
        writeln!(file, "M1,2024-02-01,12,0").unwrap();
        writeln!(file, "M2,2024-01-01,1,1").unwrap();
        file.flush().unwrap();

        let store = FixtureStore::from_csv(file.path()).unwrap();
        let history = store.load_history("M1").await.unwrap();
        assert_eq!(history.rows.len(), 2);
        assert_eq!(history.rows[1].quantity, "12");
        assert_eq!(history.last_price, 2.5);
    }
}
