use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::labels::{self, AppLanguage};
use crate::models::place::{Category, PlaceWithProfile, RuleWithWindows, SoloOkLevel, Tip};
use crate::models::report::Observation;
use crate::places::queries::{self, PlaceFilter};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PlaceListQuery {
    pub category: Option<Category>,
    pub level: Option<SoloOkLevel>,
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct PlaceDetailQuery {
    pub lang: Option<AppLanguage>,
}

#[derive(Serialize)]
pub struct PlaceDetailResponse {
    #[serde(flatten)]
    pub place: PlaceWithProfile,
    pub rules: Vec<RuleWithWindows>,
    pub tips: Vec<Tip>,
    pub observations: Vec<Observation>,
    pub labels: PlaceDetailLabels,
}

/// Pre-localized labels so the list/detail views render without a dictionary
/// lookup of their own.
#[derive(Serialize)]
pub struct PlaceDetailLabels {
    pub category: &'static str,
    pub confidence: Option<&'static str>,
    pub solo_allowed: Option<&'static str>,
}

/// GET /api/v1/places
pub async fn handle_list_places(
    State(state): State<AppState>,
    Query(params): Query<PlaceListQuery>,
) -> Result<Json<Vec<PlaceWithProfile>>, AppError> {
    let filter = PlaceFilter {
        category: params.category,
        level: params.level,
        q: params.q,
    };
    let places = queries::list_places(&state.db, &filter).await?;
    Ok(Json(places))
}

/// GET /api/v1/places/:id
pub async fn handle_get_place(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<PlaceDetailQuery>,
) -> Result<Json<PlaceDetailResponse>, AppError> {
    let lang = params.lang.unwrap_or_default();

    let place = queries::get_place_with_profile(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Place {id} not found")))?;

    let rules = queries::rules_with_windows(&state.db, id).await?;
    let tips = queries::place_tips(&state.db, id).await?;
    let observations = queries::recent_observations(&state.db, id).await?;

    let labels = PlaceDetailLabels {
        category: labels::category_label(place.place.category, lang),
        confidence: place
            .solo_profile
            .as_ref()
            .map(|p| labels::confidence_label(p.solo_ok_level, lang)),
        solo_allowed: place
            .solo_profile
            .as_ref()
            .map(|p| labels::solo_allowed_label(p.solo_allowed, lang)),
    };

    Ok(Json(PlaceDetailResponse {
        place,
        rules,
        tips,
        observations,
        labels,
    }))
}
