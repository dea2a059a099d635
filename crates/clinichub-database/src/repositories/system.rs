//! Backend-level operations on the PostgreSQL database.

use async_trait::async_trait;
use sqlx::PgPool;

use clinichub_core::error::{AppError, ErrorKind};
use clinichub_core::result::AppResult;

use super::db_error;
use crate::store::SystemStore;

/// PostgreSQL-backed [`SystemStore`].
#[derive(Debug, Clone)]
pub struct SystemRepository {
    pool: PgPool,
}

impl SystemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SystemStore for SystemRepository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ServiceUnavailable, "Database unreachable", e)
            })?;
        Ok(())
    }

    async fn size_bytes(&self) -> AppResult<u64> {
        let size: i64 = sqlx::query_scalar("SELECT pg_database_size(current_database())")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to read database size"))?;
        Ok(size.max(0) as u64)
    }

    async fn optimize(&self) -> AppResult<Vec<String>> {
        sqlx::query("ANALYZE")
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to analyze database"))?;
        Ok(vec!["Database statistics refreshed".to_string()])
    }
}
