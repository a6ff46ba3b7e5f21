//! HTTP layer exposing the demand forecast.

pub mod routes;
pub mod types;

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{routing::post, Router};
use chrono::{Local, NaiveDate};
use rand::{rngs::StdRng, SeedableRng};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{config::Settings, data::MaterialStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MaterialStore>,
    pub settings: Settings,
}

impl AppState {
    pub fn new(store: Arc<dyn MaterialStore>, settings: Settings) -> Self {
        Self { store, settings }
    }

    /// Reference date for a request: the configured one, else today.
    pub fn as_of(&self) -> NaiveDate {
        self.settings
            .as_of
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Per-request noise source.
    pub fn rng(&self) -> StdRng {
        match self.settings.noise_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(routes::predict))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "serving demand-forecast API");
    axum::serve(listener, router(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
