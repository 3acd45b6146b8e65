//! Server-held bookmarks: the authoritative list the client's local save
//! snapshot reconciles against.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::place::PlaceSummary;
use crate::state::AppState;

pub async fn list_bookmarked_places(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<PlaceSummary>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT p.id, p.name_ko, p.name_ja, p.category, p.address, p.lat, p.lng,
               sp.solo_ok_level, sp.solo_allowed
        FROM bookmarks b
        JOIN places p ON p.id = b.place_id
        LEFT JOIN solo_profile sp ON sp.place_id = p.id
        WHERE b.user_id = $1
        ORDER BY b.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn add_bookmark(pool: &PgPool, user_id: Uuid, place_id: Uuid) -> Result<(), sqlx::Error> {
    // Idempotent: re-saving an already saved place is a no-op.
    sqlx::query(
        r#"
        INSERT INTO bookmarks (user_id, place_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, place_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(place_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn remove_bookmark(
    pool: &PgPool,
    user_id: Uuid,
    place_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM bookmarks WHERE user_id = $1 AND place_id = $2")
        .bind(user_id)
        .bind(place_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// GET /api/v1/users/:user_id/bookmarks
pub async fn handle_list_bookmarks(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<PlaceSummary>>, AppError> {
    let places = list_bookmarked_places(&state.db, user_id).await?;
    Ok(Json(places))
}

/// PUT /api/v1/users/:user_id/bookmarks/:place_id
pub async fn handle_add_bookmark(
    State(state): State<AppState>,
    Path((user_id, place_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    add_bookmark(&state.db, user_id, place_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/users/:user_id/bookmarks/:place_id
pub async fn handle_remove_bookmark(
    State(state): State<AppState>,
    Path((user_id, place_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    remove_bookmark(&state.db, user_id, place_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
