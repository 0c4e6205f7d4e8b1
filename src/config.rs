//! Command line and environment configuration.

use clap::{Parser, Subcommand};

/// Expense tracker backend.
#[derive(Debug, Parser)]
#[command(name = "expense-tracker")]
#[command(about = "Categories, sub-categories and expenses over SQLite")]
pub struct Args {
    /// Database connection string.
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://./expenses.db")]
    pub database_url: String,

    /// Maximum number of pooled database connections.
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,

    /// Address to listen on for HTTP requests.
    #[arg(short, long, env = "LISTEN_ADDR", default_value = "127.0.0.1:3000")]
    pub listen: String,

    /// Do not insert the starter data into an empty database.
    #[arg(long, env = "SKIP_SEED")]
    pub skip_seed: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run migrations, seed, and serve the HTTP API (default).
    Serve,
    /// Print the orphan diagnostics report as JSON and exit.
    Diagnostics,
}

/// Resolved settings shared by the binary and the router.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub listen_addr: String,
    pub seed: bool,
}

impl From<&Args> for AppConfig {
    fn from(args: &Args) -> Self {
        Self {
            database_url: args.database_url.clone(),
            max_connections: args.max_connections,
            listen_addr: args.listen.clone(),
            seed: !args.skip_seed,
        }
    }
}
