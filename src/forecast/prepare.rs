//! Turning stored rows into a numeric, date-ordered series.

use chrono::{Datelike, NaiveDate};

use crate::{
    data::RawObservation,
    error::{ForecastError, Result},
};

/// Observations of one material sorted ascending by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    points: Vec<(NaiveDate, f64)>,
}

impl Series {
    pub fn from_points(mut points: Vec<(NaiveDate, f64)>) -> Self {
        points.sort_by_key(|(date, _)| *date);
        Self { points }
    }

    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, v)| *v).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn min_year(&self) -> Option<i32> {
        self.points.iter().map(|(date, _)| date.year()).min()
    }
}

/// Parse and sort raw rows; any malformed date or quantity fails the whole series.
pub fn prepare_series(rows: &[RawObservation]) -> Result<Series> {
    let points = rows
        .iter()
        .map(|row| Ok((parse_date(&row.date)?, parse_quantity(&row.quantity)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Series::from_points(points))
}

/// Accepts `YYYY-MM-DD` with an optional time suffix, which is dropped.
fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or_default();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| ForecastError::processing(format!("invalid date value '{raw}'")))
}

fn parse_quantity(raw: &str) -> Result<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ForecastError::processing(format!(
            "could not convert quantity to float: '{raw}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, quantity: &str) -> RawObservation {
        RawObservation {
            date: date.to_string(),
            quantity: quantity.to_string(),
        }
    }

    #[test]
    fn sorts_by_date_and_coerces_quantities() {
        let series = prepare_series(&[
            row("2024-03-01", "7"),
            row("2024-01-15 00:00:00", " 3.5 "),
            row("2024-02-01T08:30:00+00:00", "1e1"),
        ])
        .unwrap();
        let points = series.points();
        assert_eq!(points[0], (NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), 3.5));
        assert_eq!(points[1], (NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), 10.0));
        assert_eq!(points[2], (NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 7.0));
        assert_eq!(series.min_year(), Some(2024));
    }

    #[test]
    fn rejects_malformed_quantity() {
        let err = prepare_series(&[row("2024-01-01", "ten")]).unwrap_err();
        assert!(matches!(err, ForecastError::Processing(msg) if msg.contains("ten")));
    }

    #[test]
    fn rejects_non_finite_quantity() {
        assert!(prepare_series(&[row("2024-01-01", "NaN")]).is_err());
        assert!(prepare_series(&[row("2024-01-01", "inf")]).is_err());
    }

    #[test]
    fn rejects_malformed_date() {
        let err = prepare_series(&[row("01/02/2024", "1")]).unwrap_err();
        assert!(matches!(err, ForecastError::Processing(_)));
    }
}
