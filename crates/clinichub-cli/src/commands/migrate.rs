//! Database migration command.

use clinichub_database::DatabasePool;
use clinichub_database::migration::run_migrations;

use crate::output;

/// Apply every pending migration.
pub async fn execute(pool: &DatabasePool) -> anyhow::Result<()> {
    println!("Running database migrations...");
    run_migrations(pool.pool()).await?;
    output::print_success("All migrations applied successfully.");
    Ok(())
}
