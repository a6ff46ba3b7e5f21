use chrono::NaiveDate;
use demand_forecast::forecast::{clamp_round, forecast_months, month_label, FORECAST_HORIZON};
use proptest::prelude::*;

proptest! {
    #[test]
    fn clamp_round_is_never_negative(value in proptest::num::f64::ANY) {
        prop_assert!(clamp_round(value) >= 0);
    }

    #[test]
    fn clamp_round_stays_within_half_of_positive_input(value in 0.0f64..1e12) {
        let rounded = clamp_round(value) as f64;
        prop_assert!((rounded - value).abs() <= 0.5);
    }

    #[test]
    fn horizon_labels_are_distinct_consecutive_months(
        year in 1990i32..2100,
        month in 1u32..=12,
        day in 1u32..=28,
    ) {
        let as_of = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        let months = forecast_months(as_of, FORECAST_HORIZON);
        prop_assert_eq!(months.len(), FORECAST_HORIZON);
        prop_assert_eq!(months[0], NaiveDate::from_ymd_opt(year, month, 1).unwrap());

        let mut labels: Vec<_> = months.iter().map(|m| month_label(*m)).collect();
        labels.sort();
        labels.dedup();
        prop_assert_eq!(labels.len(), FORECAST_HORIZON);
    }
}
