use axum::{
    Extension, Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::identity::Visitor;
use super::validation::validate_limit;
use super::{ApiError, ApiResponse, AppState, HistoryItem, HistoryQuery, StatsItem};

/// GET /api/history
/// The caller's own searches, most recent first.
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Extension(visitor): Extension<Visitor>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<HistoryItem>>>, ApiError> {
    let limit = params
        .limit
        .map(validate_limit)
        .transpose()?
        .map(|l| l as u64);

    let items = state
        .shared
        .history_service
        .recent(visitor.id, limit)
        .await?
        .into_iter()
        .map(HistoryItem::from)
        .collect();

    Ok(Json(ApiResponse::success(items)))
}

/// GET /api/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<StatsItem>>>, ApiError> {
    let stats = state.shared.history_service.global_stats().await?;
    Ok(Json(ApiResponse::success(
        stats.into_iter().map(StatsItem::from).collect(),
    )))
}

/// GET /api/user/stats
pub async fn get_user_stats(
    State(state): State<Arc<AppState>>,
    Extension(visitor): Extension<Visitor>,
) -> Result<Json<ApiResponse<Vec<StatsItem>>>, ApiError> {
    let stats = state.shared.history_service.user_stats(visitor.id).await?;
    Ok(Json(ApiResponse::success(
        stats.into_iter().map(StatsItem::from).collect(),
    )))
}
