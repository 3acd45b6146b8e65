#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "solo_outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SoloOutcome {
    Accepted,
    Rejected,
    #[serde(rename = "ACCEPTED_IF_2PORTIONS")]
    #[sqlx(rename = "ACCEPTED_IF_2PORTIONS")]
    AcceptedIf2Portions,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "source_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    UserVisit,
    Community,
    StaffReply,
    PhoneCheck,
    Curated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "seat_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatType {
    Counter,
    Table,
    SingleBooth,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "staff_reaction", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffReaction {
    Friendly,
    Neutral,
    Unfriendly,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "meal_period", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MealPeriod {
    Breakfast,
    Lunch,
    Dinner,
    Late,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "point_event_type", rename_all = "lowercase")]
pub enum PointEventType {
    Report,
    Confirm,
    Confirmed,
    Helpful,
    Spam,
}

/// A single user-submitted report of one dining attempt. Never edited after
/// insert; deleted only as a compensating rollback.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Observation {
    pub id: Uuid,
    pub place_id: Uuid,
    pub user_id: Option<Uuid>,
    pub source_type: SourceType,
    pub source_url: Option<String>,
    pub observed_at: Option<NaiveDate>,
    pub recorded_at: DateTime<Utc>,
    pub solo_outcome: SoloOutcome,
    pub min_portions: Option<i32>,
    pub seat_type: Option<SeatType>,
    pub staff_reaction: Option<StaffReaction>,
    pub meal_period: Option<MealPeriod>,
    pub memo_short: Option<String>,
}

/// Append-only point ledger entry. A user's total is the sum of their rows.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PointEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_type: PointEventType,
    pub entity_type: Option<String>,
    pub entity_id: Option<Uuid>,
    pub points: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserStatsDaily {
    pub user_id: Uuid,
    pub stat_date: NaiveDate,
    pub points: i32,
    pub reports_count: i32,
    pub confirmed_count: i32,
}
