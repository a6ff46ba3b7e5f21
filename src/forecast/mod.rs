//! Forecast pipeline: preparation, model fit and response assembly.

pub mod assemble;
pub mod optimize;
pub mod prepare;
pub mod sarima;

use chrono::NaiveDate;
use rand::Rng;
use tracing::{info, instrument};

use crate::{data::MaterialHistory, error::Result};

pub use assemble::{clamp_round, forecast_months, month_label, ForecastResult};
pub use prepare::{prepare_series, Series};
pub use sarima::{FittedSarima, SarimaOrder, SeasonalArima};

/// Months projected forward from the reference month.
pub const FORECAST_HORIZON: usize = 10;

/// Forward forecast for `series`: one `(month, quantity)` pair per horizon step.
pub fn project(series: &Series, as_of: NaiveDate) -> Result<Vec<(NaiveDate, i64)>> {
    let fitted = SeasonalArima::new(SarimaOrder::MONTHLY).fit(&series.values())?;
    let months = forecast_months(as_of, FORECAST_HORIZON);
    let quantities = fitted.forecast(FORECAST_HORIZON);
    Ok(months
        .into_iter()
        .zip(quantities)
        .map(|(month, value)| (month, clamp_round(value)))
        .collect())
}

/// Run the full pipeline over one material's history.
///
/// `as_of` anchors both the forecast horizon and the window of echoed past
/// years, so a fixed date and a seeded `rng` give a reproducible result.
#[instrument(skip(history, rng), fields(rows = history.rows.len()))]
pub fn forecast_material<R: Rng>(
    material_id: &str,
    history: &MaterialHistory,
    as_of: NaiveDate,
    rng: &mut R,
) -> Result<ForecastResult> {
    let series = prepare_series(&history.rows)?;
    let forecasts = project(&series, as_of)?;
    let result = assemble::assemble(
        material_id,
        history.last_price,
        &series,
        &forecasts,
        as_of,
        rng,
    );
    info!(keys = result.len(), "assembled forecast");
    Ok(result)
}
