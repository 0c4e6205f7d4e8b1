// src/main.rs
use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use expense_tracker::config::{AppConfig, Args, Command};
use expense_tracker::database::db::{connection, migrate, queries, seed};
use expense_tracker::backend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = AppConfig::from(&args);

    let pool = connection::get_db_pool(&config.database_url, config.max_connections).await?;
    migrate::run_migrations(&pool).await?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            if config.seed {
                seed::seed_database(&pool).await?;
            }
            tracing::info!(database = %config.database_url, "starting backend server");
            backend::run_server(pool, &config.listen_addr).await?;
        }
        Command::Diagnostics => {
            let report = queries::get_diagnostics(&pool).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
