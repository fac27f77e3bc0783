mod config;
mod tracing_setup;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use habitcommit_server::{run_server, SqliteStore};
use tracing::info;

use crate::config::{Cli, Commands, DatabaseArgs, ServeArgs};
use crate::tracing_setup::TracingConfig;

async fn open_store(args: &DatabaseArgs) -> Result<SqliteStore> {
    SqliteStore::open(&args.database_path)
        .await
        .with_context(|| format!("failed to open database at {}", args.database_path.display()))
}

async fn run_init_db(args: DatabaseArgs) -> Result<()> {
    let store = open_store(&args).await?;
    store.close().await.context("failed to close database")?;
    info!(path = %args.database_path.display(), "database initialized");
    Ok(())
}

async fn run_serve(args: ServeArgs) -> Result<()> {
    info!("Starting HabitCommit API server");
    info!("Database: {}", args.database.database_path.display());

    let store = open_store(&args.database).await?;
    let config = args.server_config();

    // The server gets its own handle; this one is closed after shutdown.
    run_server(Arc::new(store.clone()), config)
        .await
        .context("server error")?;

    store.close().await.context("failed to close database")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig { debug: cli.debug })
        .context("failed to initialize tracing")?;

    match cli.into_command().unwrap_or_else(|err| err.exit()) {
        Commands::Serve(args) => run_serve(args).await?,
        Commands::InitDb(args) => run_init_db(args).await?,
    }

    Ok(())
}
