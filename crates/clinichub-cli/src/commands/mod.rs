//! CLI command definitions and dispatch.

pub mod audit;
pub mod migrate;
pub mod seed;
pub mod user;

use anyhow::Context;
use clap::{Parser, Subcommand};

use clinichub_core::config::AppConfig;
use clinichub_database::{DatabasePool, Stores};

use crate::output::OutputFormat;

/// ClinicHub administration
#[derive(Debug, Parser)]
#[command(name = "clinichub", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding default.toml and the environment overlays
    #[arg(short, long, default_value = "config")]
    pub config_dir: String,

    /// Environment overlay to load
    #[arg(short, long, env = "CLINICHUB_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Create or refresh staff accounts
    SeedStaff(seed::SeedArgs),
    /// User management
    User(user::UserArgs),
    /// Audit trail
    Audit(audit::AuditArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> anyhow::Result<()> {
        let config = self.load_config()?;
        let pool = DatabasePool::connect(&config.database)
            .await
            .context("Failed to connect to the database")?;

        let result = match &self.command {
            Commands::Migrate => migrate::execute(&pool).await,
            Commands::SeedStaff(args) => {
                seed::execute(args, &config, stores(&pool), self.format).await
            }
            Commands::User(args) => user::execute(args, &config, stores(&pool), self.format).await,
            Commands::Audit(args) => {
                audit::execute(args, &config, stores(&pool), self.format).await
            }
        };

        pool.close().await;
        result
    }

    fn load_config(&self) -> anyhow::Result<AppConfig> {
        AppConfig::load(&self.config_dir, &self.env).with_context(|| {
            format!(
                "Failed to load configuration from '{}' (env '{}')",
                self.config_dir, self.env
            )
        })
    }
}

fn stores(pool: &DatabasePool) -> Stores {
    Stores::postgres(pool.pool().clone())
}
