use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::labels;
use crate::models::place::{
    Category, CounterSeat, Place, PlaceWithProfile, RuleWithWindows, SoloAllowed, SoloOkLevel,
    SoloProfile, SoloRule, SoloRuleTimeWindow, Tip,
};
use crate::models::report::Observation;

/// Flat row for the place + profile LEFT JOIN; profile columns are all
/// nullable because a freshly seeded place may not have one yet.
#[derive(FromRow)]
struct PlaceProfileRow {
    id: Uuid,
    parent_place_id: Option<Uuid>,
    name_ko: String,
    name_ja: Option<String>,
    name_en: Option<String>,
    category: Category,
    address: String,
    lat: f64,
    lng: f64,
    phone: Option<String>,
    opening_hours: Option<String>,
    created_at: DateTime<Utc>,
    solo_ok_level: Option<SoloOkLevel>,
    solo_allowed: Option<SoloAllowed>,
    min_portions_required: Option<i32>,
    counter_seat: Option<CounterSeat>,
    best_time_note: Option<String>,
    last_verified_at: Option<DateTime<Utc>>,
    profile_updated_at: Option<DateTime<Utc>>,
}

impl From<PlaceProfileRow> for PlaceWithProfile {
    fn from(row: PlaceProfileRow) -> Self {
        let solo_profile = match (row.solo_ok_level, row.solo_allowed, row.profile_updated_at) {
            (Some(solo_ok_level), Some(solo_allowed), Some(updated_at)) => Some(SoloProfile {
                place_id: row.id,
                solo_ok_level,
                solo_allowed,
                min_portions_required: row.min_portions_required,
                counter_seat: row.counter_seat,
                best_time_note: row.best_time_note,
                last_verified_at: row.last_verified_at,
                updated_at,
            }),
            _ => None,
        };
        let confidence_color = solo_profile
            .as_ref()
            .map(|p| labels::confidence_color(p.solo_ok_level));

        PlaceWithProfile {
            place: Place {
                id: row.id,
                parent_place_id: row.parent_place_id,
                name_ko: row.name_ko,
                name_ja: row.name_ja,
                name_en: row.name_en,
                category: row.category,
                address: row.address,
                lat: row.lat,
                lng: row.lng,
                phone: row.phone,
                opening_hours: row.opening_hours,
                created_at: row.created_at,
            },
            solo_profile,
            confidence_color,
        }
    }
}

const PLACE_PROFILE_SELECT: &str = r#"
    SELECT p.id, p.parent_place_id, p.name_ko, p.name_ja, p.name_en, p.category,
           p.address, p.lat, p.lng, p.phone, p.opening_hours, p.created_at,
           sp.solo_ok_level, sp.solo_allowed, sp.min_portions_required,
           sp.counter_seat, sp.best_time_note, sp.last_verified_at,
           sp.updated_at AS profile_updated_at
    FROM places p
    LEFT JOIN solo_profile sp ON sp.place_id = p.id
"#;

#[derive(Debug, Default)]
pub struct PlaceFilter {
    pub category: Option<Category>,
    pub level: Option<SoloOkLevel>,
    pub q: Option<String>,
}

/// Places for the map/list tabs, optionally narrowed by category, confidence
/// level or a name/address substring.
pub async fn list_places(
    pool: &PgPool,
    filter: &PlaceFilter,
) -> Result<Vec<PlaceWithProfile>, sqlx::Error> {
    let rows: Vec<PlaceProfileRow> = sqlx::query_as(&format!(
        r#"
        {PLACE_PROFILE_SELECT}
        WHERE ($1::place_category IS NULL OR p.category = $1)
          AND ($2::solo_ok_level IS NULL OR sp.solo_ok_level = $2)
          AND ($3::text IS NULL
               OR p.name_ko ILIKE '%' || $3 || '%'
               OR p.name_ja ILIKE '%' || $3 || '%'
               OR p.address ILIKE '%' || $3 || '%')
        ORDER BY p.name_ko
        "#
    ))
    .bind(filter.category)
    .bind(filter.level)
    .bind(filter.q.as_deref())
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn get_place_with_profile(
    pool: &PgPool,
    place_id: Uuid,
) -> Result<Option<PlaceWithProfile>, sqlx::Error> {
    let row: Option<PlaceProfileRow> =
        sqlx::query_as(&format!("{PLACE_PROFILE_SELECT} WHERE p.id = $1"))
            .bind(place_id)
            .fetch_optional(pool)
            .await?;

    Ok(row.map(Into::into))
}

pub async fn rules_with_windows(
    pool: &PgPool,
    place_id: Uuid,
) -> Result<Vec<RuleWithWindows>, sqlx::Error> {
    let rules: Vec<SoloRule> =
        sqlx::query_as("SELECT * FROM solo_rules WHERE place_id = $1 ORDER BY created_at")
            .bind(place_id)
            .fetch_all(pool)
            .await?;

    let rule_ids: Vec<Uuid> = rules.iter().map(|r| r.id).collect();
    let windows: Vec<SoloRuleTimeWindow> =
        sqlx::query_as("SELECT * FROM solo_rule_time_windows WHERE solo_rule_id = ANY($1)")
            .bind(&rule_ids)
            .fetch_all(pool)
            .await?;

    let mut grouped: Vec<RuleWithWindows> = rules
        .into_iter()
        .map(|rule| RuleWithWindows {
            rule,
            time_windows: Vec::new(),
        })
        .collect();
    for window in windows {
        if let Some(entry) = grouped.iter_mut().find(|g| g.rule.id == window.solo_rule_id) {
            entry.time_windows.push(window);
        }
    }

    Ok(grouped)
}

pub async fn place_tips(pool: &PgPool, place_id: Uuid) -> Result<Vec<Tip>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM tips WHERE place_id = $1 ORDER BY priority, created_at")
        .bind(place_id)
        .fetch_all(pool)
        .await
}

/// Most recent observations, newest first.
pub async fn recent_observations(
    pool: &PgPool,
    place_id: Uuid,
) -> Result<Vec<Observation>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM observations WHERE place_id = $1 ORDER BY recorded_at DESC LIMIT 10",
    )
    .bind(place_id)
    .fetch_all(pool)
    .await
}
