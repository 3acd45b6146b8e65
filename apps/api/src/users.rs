//! Per-user pass card data: lifetime point total, tier and recent activity.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::report::{PointEvent, UserStatsDaily};
use crate::points::{
    format_point_display, get_point_tier, get_solo_pass_level, normalize_total_points, PointTier,
};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassSummary {
    pub total_points: i64,
    pub tier: PointTier,
    pub pass_level: &'static str,
    pub display: String,
    /// Today's aggregate, if the user has reported today.
    pub today: Option<UserStatsDaily>,
}

/// GET /api/v1/users/:user_id/pass
pub async fn handle_get_pass(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<PassSummary>, AppError> {
    let raw_total = state.report_store.sum_user_points(user_id).await?;
    let total_points = normalize_total_points(Some(raw_total as f64));

    let today: Option<UserStatsDaily> =
        sqlx::query_as("SELECT * FROM user_stats_daily WHERE user_id = $1 AND stat_date = $2")
            .bind(user_id)
            .bind(Utc::now().date_naive())
            .fetch_optional(&state.db)
            .await?;

    Ok(Json(PassSummary {
        total_points,
        tier: get_point_tier(total_points),
        pass_level: get_solo_pass_level(total_points),
        display: format_point_display(total_points),
        today,
    }))
}

/// GET /api/v1/users/:user_id/points/history
///
/// Most recent ledger entries, newest first.
pub async fn handle_point_history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<PointEvent>>, AppError> {
    let events: Vec<PointEvent> = sqlx::query_as(
        "SELECT * FROM point_events WHERE user_id = $1 ORDER BY created_at DESC LIMIT 50",
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(events))
}
