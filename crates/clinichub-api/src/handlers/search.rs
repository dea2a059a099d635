//! Advanced patient search handler.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::WithRejection;

use clinichub_core::error::AppError;
use clinichub_service::patient::{AdvancedSearchRequest, SearchResult};

use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/search/advanced
pub async fn advanced_search(
    State(state): State<AppState>,
    _auth: AuthUser,
    WithRejection(Json(query), _): WithRejection<Json<AdvancedSearchRequest>, AppError>,
) -> Result<Json<SearchResult>, AppError> {
    Ok(Json(state.search_service.search(query).await?))
}
