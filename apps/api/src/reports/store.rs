//! Persistence seam for the report submission flow.
//!
//! The flow's writes are independent statements, not one transaction, so the
//! trait exposes each step (plus the compensating delete) separately. The
//! Postgres implementation classifies unique-key conflicts into a stable
//! `StoreError::UniqueViolation` kind; callers must never match on constraint
//! names or message fragments.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::report::{MealPeriod, SeatType, SoloOutcome, StaffReaction};

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store rejected a row that duplicates an existing unique key.
    #[error("unique constraint violated")]
    UniqueViolation,

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    fn from_sqlx(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation;
            }
        }
        StoreError::Database(err)
    }
}

/// Fields of a user-visit observation about to be inserted.
#[derive(Debug, Clone)]
pub struct NewObservation {
    pub place_id: Uuid,
    pub user_id: Uuid,
    pub observed_at: NaiveDate,
    pub solo_outcome: SoloOutcome,
    pub seat_type: Option<SeatType>,
    pub staff_reaction: Option<StaffReaction>,
    pub meal_period: Option<MealPeriod>,
    pub memo_short: Option<String>,
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Fast-path existence check for a same-day user-visit report.
    async fn find_user_visit(
        &self,
        user_id: Uuid,
        place_id: Uuid,
        observed_at: NaiveDate,
    ) -> Result<Option<Uuid>, StoreError>;

    async fn insert_observation(&self, new: &NewObservation) -> Result<Uuid, StoreError>;

    /// Compensating delete for a partially completed submission.
    async fn delete_observation(&self, observation_id: Uuid) -> Result<(), StoreError>;

    async fn insert_point_event(
        &self,
        user_id: Uuid,
        observation_id: Uuid,
        points: i32,
    ) -> Result<(), StoreError>;

    /// Adds one report and its points to the per-user-per-day aggregate in a
    /// single upsert-with-increment statement.
    async fn add_daily_report_stats(
        &self,
        user_id: Uuid,
        stat_date: NaiveDate,
        points: i32,
    ) -> Result<(), StoreError>;

    /// Sums the user's point ledger server-side.
    async fn sum_user_points(&self, user_id: Uuid) -> Result<i64, StoreError>;
}

pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn find_user_visit(
        &self,
        user_id: Uuid,
        place_id: Uuid,
        observed_at: NaiveDate,
    ) -> Result<Option<Uuid>, StoreError> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM observations
            WHERE user_id = $1 AND place_id = $2 AND observed_at = $3
              AND source_type = 'USER_VISIT'
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(place_id)
        .bind(observed_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)
    }

    async fn insert_observation(&self, new: &NewObservation) -> Result<Uuid, StoreError> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO observations
                (place_id, user_id, source_type, observed_at, solo_outcome,
                 seat_type, staff_reaction, meal_period, memo_short)
            VALUES ($1, $2, 'USER_VISIT', $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(new.place_id)
        .bind(new.user_id)
        .bind(new.observed_at)
        .bind(new.solo_outcome)
        .bind(new.seat_type)
        .bind(new.staff_reaction)
        .bind(new.meal_period)
        .bind(new.memo_short.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)
    }

    async fn delete_observation(&self, observation_id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM observations WHERE id = $1")
            .bind(observation_id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(())
    }

    async fn insert_point_event(
        &self,
        user_id: Uuid,
        observation_id: Uuid,
        points: i32,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO point_events (user_id, event_type, entity_type, entity_id, points)
            VALUES ($1, 'report', 'observation', $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(observation_id)
        .bind(points)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;
        Ok(())
    }

    async fn add_daily_report_stats(
        &self,
        user_id: Uuid,
        stat_date: NaiveDate,
        points: i32,
    ) -> Result<(), StoreError> {
        // Atomic increment; concurrent submissions for the same (user, day)
        // cannot lose an update.
        sqlx::query(
            r#"
            INSERT INTO user_stats_daily (user_id, stat_date, points, reports_count, confirmed_count)
            VALUES ($1, $2, $3, 1, 0)
            ON CONFLICT (user_id, stat_date) DO UPDATE
                SET points = user_stats_daily.points + EXCLUDED.points,
                    reports_count = user_stats_daily.reports_count + 1
            "#,
        )
        .bind(user_id)
        .bind(stat_date)
        .bind(points)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;
        Ok(())
    }

    async fn sum_user_points(&self, user_id: Uuid) -> Result<i64, StoreError> {
        let total: Option<i64> =
            sqlx::query_scalar("SELECT SUM(points) FROM point_events WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(StoreError::from_sqlx)?;
        Ok(total.unwrap_or(0))
    }
}
