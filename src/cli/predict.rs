//! CLI entry-point for a one-off forecast.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{
    api::AppState,
    cli::StoreArgs,
    config::Settings,
    forecast,
};

/// Args for the `predict` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Material identifier to forecast.
    #[arg(long)]
    pub material_id: String,
    /// Reference date (YYYY-MM-DD); overrides `FORECAST_AS_OF`.
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
    /// Seed for the historical perturbation; overrides `NOISE_SEED`.
    #[arg(long)]
    pub seed: Option<u64>,
    #[command(flatten)]
    pub store: StoreArgs,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, mut settings: Settings) -> Result<()> {
    if args.as_of.is_some() {
        settings.as_of = args.as_of;
    }
    if args.seed.is_some() {
        settings.noise_seed = args.seed;
    }
    let store = args.store.open(&settings)?;
    let state = AppState::new(store, settings);

    let history = state.store.load_history(&args.material_id).await?;
    let mut rng = state.rng();
    let result = forecast::forecast_material(&args.material_id, &history, state.as_of(), &mut rng)?;
    let json = serde_json::to_string_pretty(&result).context("serialising forecast")?;
    println!("{json}");
    Ok(())
}
