//! Command-line interface wiring for demand-forecast.

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::info;

use crate::{
    config::Settings,
    data::{FixtureStore, MaterialStore, PgStore},
};

pub mod predict;
pub mod serve;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Monthly material demand forecasting", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::run(args, settings).await,
            Commands::Predict(args) => predict::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the `/predict` JSON API.
    Serve(serve::Args),
    /// Forecast one material and print the JSON result.
    Predict(predict::Args),
}

/// Where material history is read from.
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct StoreArgs {
    /// Read history from a CSV export of `material_data` instead of PostgreSQL.
    #[arg(long)]
    pub fixture: Option<PathBuf>,
}

impl StoreArgs {
    pub fn open(&self, settings: &Settings) -> Result<Arc<dyn MaterialStore>> {
        match &self.fixture {
            Some(path) => Ok(Arc::new(FixtureStore::from_csv(path)?)),
            None => {
                info!(
                    host = %settings.db_host,
                    port = settings.db_port,
                    database = %settings.db_name,
                    "using postgres store"
                );
                Ok(Arc::new(PgStore::new(settings.pg_options())))
            }
        }
    }
}
