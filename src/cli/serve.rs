//! CLI entry-point for serving the HTTP API.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{
    api::{self, AppState},
    cli::StoreArgs,
    config::Settings,
};

/// Run the Axum server.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Port to bind; defaults to `PORT` or 8080.
    #[arg(long)]
    pub port: Option<u16>,
    /// Host address; defaults to `HOST` or 0.0.0.0.
    #[arg(long)]
    pub host: Option<String>,
    #[command(flatten)]
    pub store: StoreArgs,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let host = args.host.unwrap_or_else(|| settings.host.clone());
    let port = args.port.unwrap_or(settings.port);
    let store = args.store.open(&settings)?;
    api::serve(AppState::new(store, settings), &host, port).await
}
