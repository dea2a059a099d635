//! `seed-staff`: upsert staff accounts from a JSON file or the default roster.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use clinichub_auth::{PasswordHasher, PasswordValidator};
use clinichub_core::config::AppConfig;
use clinichub_database::Stores;
use clinichub_service::admin::{SeedStatus, StaffRoster, StaffSeed};

use crate::output::{self, OutputFormat};

/// Arguments for `seed-staff`
#[derive(Debug, Args)]
pub struct SeedArgs {
    /// JSON array of `{name, email, password, role}`; the built-in roster
    /// is used when omitted
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Serialize, Tabled)]
struct SeedRow {
    email: String,
    role: String,
    status: String,
}

pub async fn execute(
    args: &SeedArgs,
    config: &AppConfig,
    stores: Stores,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let seeds = match &args.file {
        Some(path) => read_seeds(path).await?,
        None => StaffRoster::default_seeds(),
    };

    let roster = StaffRoster::new(
        stores.users,
        Arc::new(PasswordHasher::from_config(&config.auth)?),
        Arc::new(PasswordValidator::from_config(&config.auth)),
    );
    let outcomes = roster.seed(seeds).await?;

    let rows: Vec<SeedRow> = outcomes
        .iter()
        .map(|o| SeedRow {
            email: o.email.clone(),
            role: o.role.to_string(),
            status: match o.status {
                SeedStatus::Created => "created".to_string(),
                SeedStatus::Updated => "updated".to_string(),
            },
        })
        .collect();
    output::print_list(&rows, format)?;
    output::print_success(&format!("Seeded {} staff accounts", rows.len()));
    Ok(())
}

async fn read_seeds(path: &PathBuf) -> anyhow::Result<Vec<StaffSeed>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid seed file {}", path.display()))
}
