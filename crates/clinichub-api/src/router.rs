//! Route definitions for the ClinicHub HTTP API.
//!
//! Routes are organized by domain and mounted under `/api`; `GET /` and
//! the fallback sit at the root.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};

use clinichub_core::error::AppError;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the router with every route and the request-scoped middleware.
pub fn build_router(state: AppState) -> Router {
    let max_upload = state.config.storage.max_upload_size_bytes as usize;

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(patient_routes())
        .merge(appointment_routes())
        .merge(document_routes())
        .merge(notification_routes())
        .merge(search_routes())
        .merge(analytics_routes())
        .merge(admin_routes())
        .merge(pharmacy_routes())
        .merge(staff_routes())
        .route("/health", get(handlers::health::health));

    Router::new()
        .route("/", get(handlers::health::root))
        .nest("/api", api_routes)
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

async fn fallback() -> AppError {
    AppError::not_found("Resource not found")
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
}

fn patient_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/patients",
            get(handlers::patient::list_patients).post(handlers::patient::create_patient),
        )
        .route(
            "/patients/{id}",
            get(handlers::patient::get_patient)
                .put(handlers::patient::update_patient)
                .delete(handlers::patient::delete_patient),
        )
        .route(
            "/patients/{id}/documents",
            get(handlers::patient::list_documents),
        )
}

fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/appointments",
            get(handlers::appointment::list_appointments)
                .post(handlers::appointment::book_appointment),
        )
        .route(
            "/appointments/{id}",
            put(handlers::appointment::update_appointment)
                .delete(handlers::appointment::delete_appointment),
        )
}

fn document_routes() -> Router<AppState> {
    Router::new().route(
        "/upload/patient-document",
        post(handlers::document::upload_patient_document),
    )
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(handlers::notification::list_unread))
        .route(
            "/notifications/{id}/read",
            put(handlers::notification::mark_read),
        )
}

fn search_routes() -> Router<AppState> {
    Router::new().route("/search/advanced", post(handlers::search::advanced_search))
}

fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/revenue", get(handlers::analytics::revenue))
        .route(
            "/analytics/doctor-performance",
            get(handlers::analytics::doctor_performance),
        )
        .route(
            "/analytics/patient-satisfaction",
            get(handlers::analytics::patient_satisfaction),
        )
}

/// Admin endpoints; every handler takes `Authorized<AdminOnly>`.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(handlers::admin::list_users))
        .route("/admin/staff", get(handlers::admin::list_staff))
        .route("/admin/audit-logs", get(handlers::admin::list_audit_logs))
        .route("/admin/system-stats", get(handlers::admin::system_stats))
        .route("/admin/backup", post(handlers::admin::create_backup))
        .route("/admin/maintenance", post(handlers::admin::run_maintenance))
        .route(
            "/admin/users/{id}/status",
            put(handlers::admin::set_user_status),
        )
}

fn pharmacy_routes() -> Router<AppState> {
    Router::new().route(
        "/pharmacy/prescriptions",
        get(handlers::pharmacy::list_prescriptions),
    )
}

/// Staff portal aliases.
fn staff_routes() -> Router<AppState> {
    Router::new()
        .route("/staff/auth/login", post(handlers::auth::staff_login))
        .route("/staff/patients", get(handlers::patient::list_patients))
        .route("/staff/patients/{id}", get(handlers::patient::get_patient))
        .route(
            "/staff/appointments",
            get(handlers::appointment::list_appointments),
        )
        .route(
            "/staff/analytics/dashboard/{role}",
            get(handlers::analytics::dashboard),
        )
}
