//! Audit trail CLI commands.

use chrono::Utc;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use clinichub_core::config::AppConfig;
use clinichub_core::types::PageRequest;
use clinichub_database::Stores;
use clinichub_entity::audit::{AuditEntry, AuditFilter};
use clinichub_service::AuditRecorder;

use crate::output::{self, OutputFormat};

/// Arguments for audit commands
#[derive(Debug, Args)]
pub struct AuditArgs {
    #[command(subcommand)]
    pub command: AuditCommand,
}

/// Audit subcommands
#[derive(Debug, Subcommand)]
pub enum AuditCommand {
    /// List audit entries, newest first
    List {
        /// Filter by action tag
        #[arg(short, long)]
        action: Option<String>,
        /// Number of results
        #[arg(short, long, default_value = "50")]
        limit: u64,
    },
    /// Delete entries older than the retention window
    Purge {
        /// Retention in days; defaults to `audit.retention_days`
        #[arg(short, long)]
        days: Option<u32>,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct AuditRow {
    time: String,
    action: String,
    actor: String,
    ip: String,
}

impl From<&AuditEntry> for AuditRow {
    fn from(e: &AuditEntry) -> Self {
        Self {
            time: e.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            action: e.action.clone(),
            actor: e.actor.clone(),
            ip: e.ip_address.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Execute audit commands
pub async fn execute(
    args: &AuditArgs,
    config: &AppConfig,
    stores: Stores,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let recorder = AuditRecorder::from_config(stores.audit, &config.audit);

    match &args.command {
        AuditCommand::List { action, limit } => {
            let filter = AuditFilter {
                action: action.clone(),
                ..AuditFilter::default()
            };
            let page = recorder.list(&filter, &PageRequest::new(1, *limit)).await?;
            let rows: Vec<AuditRow> = page.items.iter().map(AuditRow::from).collect();
            output::print_list(&rows, format)?;
        }
        AuditCommand::Purge { days } => {
            let days = days.unwrap_or(config.audit.retention_days);
            let purged = recorder.purge_older_than(days, Utc::now()).await?;
            output::print_success(&format!(
                "Purged {purged} audit entries older than {days} days"
            ));
        }
    }

    Ok(())
}
