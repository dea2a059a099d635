//! Audit log repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use clinichub_core::result::AppResult;
use clinichub_core::types::{Page, PageRequest};
use clinichub_entity::audit::{AuditEntry, AuditFilter, NewAuditEntry};

use super::db_error;
use crate::store::AuditStore;

/// PostgreSQL-backed [`AuditStore`].
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for AuditLogRepository {
    async fn append(&self, entry: NewAuditEntry) -> AppResult<()> {
        let entry = entry.into_entry();
        sqlx::query(
            "INSERT INTO audit_logs (id, action, actor, ip_address, user_agent, details, \"timestamp\") \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(entry.id)
        .bind(&entry.action)
        .bind(&entry.actor)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .bind(&entry.details)
        .bind(entry.timestamp)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to append audit entry"))?;
        Ok(())
    }

    async fn list(&self, filter: &AuditFilter, page: &PageRequest) -> AppResult<Page<AuditEntry>> {
        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        if filter.action.is_some() {
            conditions.push(format!("action = ${param_idx}"));
            param_idx += 1;
        }
        if filter.actor.is_some() {
            conditions.push(format!("actor = ${param_idx}"));
            param_idx += 1;
        }
        if filter.since.is_some() {
            conditions.push(format!("\"timestamp\" >= ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM audit_logs {where_clause}");
        let select_sql = format!(
            "SELECT * FROM audit_logs {where_clause} ORDER BY \"timestamp\" DESC, id \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, AuditEntry>(&select_sql);

        if let Some(action) = &filter.action {
            count_query = count_query.bind(action.clone());
            select_query = select_query.bind(action.clone());
        }
        if let Some(actor) = &filter.actor {
            count_query = count_query.bind(actor.clone());
            select_query = select_query.bind(actor.clone());
        }
        if let Some(since) = filter.since {
            count_query = count_query.bind(since);
            select_query = select_query.bind(since);
        }

        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count audit entries"))?;

        let entries = select_query
            .bind(page.sql_limit())
            .bind(page.sql_offset())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list audit entries"))?;

        Ok(Page::new(entries, page, total as u64))
    }

    async fn purge_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM audit_logs WHERE \"timestamp\" < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to purge audit entries"))?;
        Ok(result.rows_affected())
    }

    async fn count(&self) -> AppResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_logs")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count audit entries"))?;
        Ok(total as u64)
    }
}
