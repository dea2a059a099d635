//! Patient repository. Attributes live in a JSONB `data` column.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use clinichub_core::result::AppResult;
use clinichub_core::types::{Page, PageRequest, SortField};
use clinichub_entity::patient::{Attributes, Patient, PatientCriteria, SEARCH_FIELDS};

use super::db_error;
use crate::like_pattern;
use crate::store::PatientStore;

const COLUMNS: &str = "id, data, created_at, updated_at";

#[derive(FromRow)]
struct PatientRow {
    id: Uuid,
    data: Json<Attributes>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PatientRow> for Patient {
    fn from(row: PatientRow) -> Self {
        Self {
            id: row.id,
            attributes: row.data.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL-backed [`PatientStore`].
#[derive(Debug, Clone)]
pub struct PatientRepository {
    pool: PgPool,
}

impl PatientRepository {
    /// Create a new patient repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_search<'a>(qb: &mut QueryBuilder<'a, Postgres>, search: &str) {
        if search.is_empty() {
            return;
        }
        let pattern = like_pattern(search);
        qb.push(" WHERE (");
        for (i, field) in SEARCH_FIELDS.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push(format!("data->>'{field}' ILIKE "));
            qb.push_bind(pattern.clone());
        }
        qb.push(")");
    }
}

#[async_trait]
impl PatientStore for PatientRepository {
    async fn insert(&self, patient: &Patient) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO patients (id, data, created_at, updated_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(patient.id)
        .bind(Json(&patient.attributes))
        .bind(patient.created_at)
        .bind(patient.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to create patient"))?;
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Patient>> {
        let row = sqlx::query_as::<_, PatientRow>(&format!(
            "SELECT {COLUMNS} FROM patients WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find patient"))?;
        Ok(row.map(Patient::from))
    }

    async fn list(
        &self,
        search: &str,
        sort: &SortField,
        page: &PageRequest,
    ) -> AppResult<Page<Patient>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM patients");
        Self::push_search(&mut count, search);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count patients"))?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM patients"));
        Self::push_search(&mut select, search);
        select.push(" ORDER BY ");
        match sort.field.as_str() {
            "createdAt" => {
                select.push("created_at");
            }
            "updatedAt" => {
                select.push("updated_at");
            }
            field => {
                select.push("data->>");
                select.push_bind(field.to_string());
            }
        }
        select.push(format!(" {}, id", sort.direction.as_sql()));
        select.push(" LIMIT ");
        select.push_bind(page.sql_limit());
        select.push(" OFFSET ");
        select.push_bind(page.sql_offset());

        let rows: Vec<PatientRow> = select
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list patients"))?;

        Ok(Page::new(
            rows.into_iter().map(Patient::from).collect(),
            page,
            total as u64,
        ))
    }

    async fn merge(
        &self,
        id: Uuid,
        changes: &Attributes,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Patient>> {
        let row = sqlx::query_as::<_, PatientRow>(&format!(
            "UPDATE patients SET data = data || $2, \
             updated_at = GREATEST($3, updated_at + INTERVAL '1 microsecond') \
             WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(Json(changes))
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update patient"))?;
        Ok(row.map(Patient::from))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete patient"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn search(&self, criteria: &PatientCriteria, limit: u64) -> AppResult<Vec<Patient>> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM patients WHERE TRUE"));

        if let Some(name) = &criteria.name {
            let pattern = like_pattern(name);
            qb.push(" AND (data->>'firstName' ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR data->>'lastName' ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }
        if let Some(email) = &criteria.email {
            qb.push(" AND data->>'email' ILIKE ");
            qb.push_bind(like_pattern(email));
        }
        if let Some(phone) = &criteria.phone {
            qb.push(" AND data->>'phone' ILIKE ");
            qb.push_bind(like_pattern(phone));
        }
        if let Some(status) = &criteria.status {
            qb.push(" AND data->>'status' = ");
            qb.push_bind(status.clone());
        }
        if let Some(gender) = &criteria.gender {
            qb.push(" AND data->>'gender' = ");
            qb.push_bind(gender.clone());
        }
        if let Some(range) = criteria.age_range {
            qb.push(
                " AND (CASE WHEN btrim(data->>'age') ~ '^-?[0-9]+(\\.[0-9]+)?$' \
                 THEN btrim(data->>'age')::FLOAT8 END) BETWEEN ",
            );
            qb.push_bind(range.min);
            qb.push(" AND ");
            qb.push_bind(range.max);
        }
        if !criteria.medical_history.is_empty() {
            qb.push(" AND data->'medicalHistory' ?| ");
            qb.push_bind(criteria.medical_history.clone());
        }
        if let Some((start, end)) = criteria.created_between {
            qb.push(" AND created_at BETWEEN ");
            qb.push_bind(start);
            qb.push(" AND ");
            qb.push_bind(end);
        }
        qb.push(" ORDER BY created_at DESC LIMIT ");
        qb.push_bind(limit as i64);

        let rows: Vec<PatientRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to search patients"))?;
        Ok(rows.into_iter().map(Patient::from).collect())
    }

    async fn all(&self) -> AppResult<Vec<Patient>> {
        let rows = sqlx::query_as::<_, PatientRow>(&format!(
            "SELECT {COLUMNS} FROM patients ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to export patients"))?;
        Ok(rows.into_iter().map(Patient::from).collect())
    }

    async fn count(&self) -> AppResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM patients")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count patients"))?;
        Ok(total as u64)
    }

    async fn count_assigned_to(&self, doctor_id: &str) -> AppResult<u64> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM patients WHERE data->>'assigned_doctor' = $1")
                .bind(doctor_id)
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count assigned patients"))?;
        Ok(total as u64)
    }

    async fn count_by_month(&self) -> AppResult<Vec<(String, u64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM') AS month, COUNT(*) \
             FROM patients GROUP BY month ORDER BY month",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to aggregate patients by month"))?;
        Ok(rows.into_iter().map(|(m, c)| (m, c as u64)).collect())
    }
}
