//! HTTP route handlers for Axum.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{error, info, instrument, warn};

use crate::{
    api::types::PredictRequest,
    error::ForecastError,
    forecast::{self, ForecastResult},
};

use super::AppState;

type ApiResult<T> = Result<Json<T>, ForecastError>;

#[instrument(skip_all)]
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> ApiResult<ForecastResult> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(%rejection, "unreadable predict body");
            return Err(ForecastError::Validation);
        }
    };
    let Some(material_id) = request.material_id().map(str::to_owned) else {
        warn!("predict request without material_id");
        return Err(ForecastError::Validation);
    };

    let outcome = run(&state, material_id.clone()).await;
    match &outcome {
        Ok(result) => info!(%material_id, keys = result.len(), "forecast served"),
        Err(err @ ForecastError::NotFound(_)) => warn!(%material_id, %err, "no history"),
        Err(err) => error!(%material_id, %err, "error during prediction"),
    }
    outcome.map(Json)
}

async fn run(state: &AppState, material_id: String) -> Result<ForecastResult, ForecastError> {
    let history = state.store.load_history(&material_id).await?;
    let as_of = state.as_of();
    let mut rng = state.rng();
    tokio::task::spawn_blocking(move || {
        forecast::forecast_material(&material_id, &history, as_of, &mut rng)
    })
    .await
    .map_err(|err| ForecastError::processing(err.to_string()))?
}
