//! Appointment repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use clinichub_core::error::AppError;
use clinichub_core::result::AppResult;
use clinichub_core::types::{Page, PageRequest};
use clinichub_entity::appointment::{
    Appointment, AppointmentChanges, AppointmentFilter, SLOT_TAKEN_MESSAGE,
};

use super::db_error;
use crate::store::AppointmentStore;

/// PostgreSQL-backed [`AppointmentStore`]. Slot uniqueness is the
/// `appointments_slot_key` partial index.
#[derive(Debug, Clone)]
pub struct AppointmentRepository {
    pool: PgPool,
}

impl AppointmentRepository {
    /// Create a new appointment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &AppointmentFilter) {
        qb.push(" WHERE TRUE");
        if let Some(date) = filter.date {
            qb.push(" AND date = ");
            qb.push_bind(date);
        }
        if let Some(doctor_id) = filter.doctor_id {
            qb.push(" AND doctor_id = ");
            qb.push_bind(doctor_id);
        }
        if let Some(status) = filter.status {
            qb.push(" AND status = ");
            qb.push_bind(status);
        }
    }
}

fn map_slot(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| match e {
        sqlx::Error::Database(ref db_err)
            if db_err.constraint() == Some("appointments_slot_key") =>
        {
            AppError::conflict(SLOT_TAKEN_MESSAGE)
        }
        other => db_error(context)(other),
    }
}

#[async_trait]
impl AppointmentStore for AppointmentRepository {
    async fn book(&self, appointment: &Appointment) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO appointments \
             (id, name, phone, email, date, time, status, doctor_id, notes, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(appointment.id)
        .bind(&appointment.name)
        .bind(&appointment.phone)
        .bind(&appointment.email)
        .bind(appointment.date)
        .bind(&appointment.time)
        .bind(appointment.status)
        .bind(appointment.doctor_id)
        .bind(&appointment.notes)
        .bind(appointment.created_at)
        .bind(appointment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_slot("Failed to book appointment"))?;
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Appointment>> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find appointment"))
    }

    async fn list(
        &self,
        filter: &AppointmentFilter,
        page: &PageRequest,
    ) -> AppResult<Page<Appointment>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM appointments");
        Self::push_filter(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count appointments"))?;

        let mut select = QueryBuilder::<Postgres>::new("SELECT * FROM appointments");
        Self::push_filter(&mut select, filter);
        select.push(" ORDER BY date ASC, time ASC, created_at ASC LIMIT ");
        select.push_bind(page.sql_limit());
        select.push(" OFFSET ");
        select.push_bind(page.sql_offset());

        let items = select
            .build_query_as::<Appointment>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list appointments"))?;

        Ok(Page::new(items, page, total as u64))
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &AppointmentChanges,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Appointment>> {
        sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET \
                name = COALESCE($2, name), \
                phone = COALESCE($3, phone), \
                email = COALESCE($4, email), \
                date = COALESCE($5, date), \
                time = COALESCE($6, time), \
                status = COALESCE($7, status), \
                doctor_id = COALESCE($8, doctor_id), \
                notes = COALESCE($9, notes), \
                updated_at = GREATEST($10, updated_at + INTERVAL '1 microsecond') \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.phone)
        .bind(&changes.email)
        .bind(changes.date)
        .bind(&changes.time)
        .bind(changes.status)
        .bind(changes.doctor_id)
        .bind(&changes.notes)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_slot("Failed to update appointment"))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete appointment"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn all(&self) -> AppResult<Vec<Appointment>> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments ORDER BY date ASC, time ASC, created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to export appointments"))
    }

    async fn count(&self, filter: &AppointmentFilter) -> AppResult<u64> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM appointments");
        Self::push_filter(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count appointments"))?;
        Ok(total as u64)
    }
}
