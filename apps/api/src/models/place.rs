#![allow(dead_code)]

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "place_category", rename_all = "snake_case")]
pub enum Category {
    Bbq,
    Stew,
    KoreanSet,
    Noodle,
    Cafe,
    Izakaya,
    Ramen,
    Chicken,
    Convenience,
    Other,
}

/// How reliably a venue accepts a single diner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "solo_ok_level", rename_all = "UPPERCASE")]
pub enum SoloOkLevel {
    High,
    Mid,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "solo_allowed", rename_all = "UPPERCASE")]
pub enum SoloAllowed {
    Yes,
    No,
    Conditional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "counter_seat")]
pub enum CounterSeat {
    #[serde(rename = "Y")]
    #[sqlx(rename = "Y")]
    Yes,
    #[serde(rename = "N")]
    #[sqlx(rename = "N")]
    No,
    #[serde(rename = "?")]
    #[sqlx(rename = "?")]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "rule_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleType {
    MinPortion,
    PeakTimeRisk,
    CounterSeatAvailable,
    OrderTwoPortionsWorkaround,
    ReservationNeeded,
    TakeoutAllowed,
    BreakfastAvailable,
    SoloDrinkingOk,
    LateNight,
    TouristFriendly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "window_kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WindowKind {
    Recommend,
    Avoid,
    Only,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "tip_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipType {
    OrderTwoPortions,
    VisitOffpeak,
    AskWithPass,
    CounterSeatRequest,
    ArriveBeforeOpen,
}

/// A venue. Immutable once seeded except for administrative correction.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Place {
    pub id: Uuid,
    pub parent_place_id: Option<Uuid>,
    pub name_ko: String,
    pub name_ja: Option<String>,
    pub name_en: Option<String>,
    pub category: Category,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub phone: Option<String>,
    pub opening_hours: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One-to-one with `Place`; updated whenever a new observation or curation
/// pass changes the confidence picture.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SoloProfile {
    pub place_id: Uuid,
    pub solo_ok_level: SoloOkLevel,
    pub solo_allowed: SoloAllowed,
    pub min_portions_required: Option<i32>,
    pub counter_seat: Option<CounterSeat>,
    pub best_time_note: Option<String>,
    pub last_verified_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SoloRule {
    pub id: Uuid,
    pub place_id: Uuid,
    pub rule_type: RuleType,
    pub value_int: Option<i32>,
    pub value_text: Option<String>,
    pub note_short: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SoloRuleTimeWindow {
    pub id: Uuid,
    pub solo_rule_id: Uuid,
    pub dow: Option<i16>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub window_kind: WindowKind,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Tip {
    pub id: Uuid,
    pub place_id: Uuid,
    pub tip_type: TipType,
    pub tip_text_ko: String,
    pub tip_text_ja: Option<String>,
    pub tip_text_en: Option<String>,
    pub priority: i32,
    pub created_at: DateTime<Utc>,
}

/// Place joined with its solo profile, plus the marker color key consumed by
/// the map collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceWithProfile {
    #[serde(flatten)]
    pub place: Place,
    pub solo_profile: Option<SoloProfile>,
    pub confidence_color: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RuleWithWindows {
    #[serde(flatten)]
    pub rule: SoloRule,
    pub time_windows: Vec<SoloRuleTimeWindow>,
}

/// Compact place view used by the bookmark list and mirrored in the client's
/// local save snapshot.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PlaceSummary {
    pub id: Uuid,
    pub name_ko: String,
    pub name_ja: Option<String>,
    pub category: Category,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub solo_ok_level: Option<SoloOkLevel>,
    pub solo_allowed: Option<SoloAllowed>,
}
