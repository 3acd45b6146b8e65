//! Report submission flow: persist an observation, grant the fixed reward
//! exactly once per (user, place, day), bump the daily aggregate and return
//! the new lifetime total.
//!
//! The writes are independent requests against the store, so failures after
//! the observation insert are undone with a compensating delete rather than a
//! transactional rollback. Correctness of the once-per-day rule rests on the
//! store's unique key, not on the fast-path existence check.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use uuid::Uuid;

use crate::models::report::{MealPeriod, SeatType, SoloOutcome, StaffReaction};
use crate::points::{normalize_total_points, point_values};
use crate::reports::store::{NewObservation, ReportStore, StoreError};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportPayload {
    pub user_id: Uuid,
    pub place_id: Uuid,
    pub solo_outcome: SoloOutcome,
    #[serde(default)]
    pub seat_type: Option<SeatType>,
    #[serde(default)]
    pub staff_reaction: Option<StaffReaction>,
    #[serde(default)]
    pub meal_period: Option<MealPeriod>,
    #[serde(default)]
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmitReportErrorCode {
    AlreadySubmittedToday,
    Unknown,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportResult {
    pub ok: bool,
    pub points_granted: i32,
    pub total_points: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<SubmitReportErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitReportResult {
    fn failure(code: SubmitReportErrorCode, message: impl Into<String>) -> Self {
        SubmitReportResult {
            ok: false,
            points_granted: 0,
            total_points: 0,
            error_code: Some(code),
            error: Some(message.into()),
        }
    }
}

const DUPLICATE_MESSAGE: &str = "Duplicate report for same place and day";

pub async fn submit_report(
    store: &dyn ReportStore,
    payload: SubmitReportPayload,
) -> SubmitReportResult {
    let memo = payload
        .memo
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from);
    let points_granted = point_values::REPORT;
    let observed_at = Utc::now().date_naive();

    // Step 1: fast-path duplicate check. Convenience only; the unique key on
    // (user, place, day, source) is what actually enforces once-per-day.
    match store
        .find_user_visit(payload.user_id, payload.place_id, observed_at)
        .await
    {
        Ok(Some(_)) => {
            return SubmitReportResult::failure(
                SubmitReportErrorCode::AlreadySubmittedToday,
                DUPLICATE_MESSAGE,
            )
        }
        Ok(None) => {}
        Err(err) => {
            error!("duplicate check failed: {err}");
            return SubmitReportResult::failure(SubmitReportErrorCode::Unknown, err.to_string());
        }
    }

    // Step 2: insert the observation, keeping its id for rollback.
    let new_observation = NewObservation {
        place_id: payload.place_id,
        user_id: payload.user_id,
        observed_at,
        solo_outcome: payload.solo_outcome,
        seat_type: payload.seat_type,
        staff_reaction: payload.staff_reaction,
        meal_period: payload.meal_period,
        memo_short: memo,
    };
    let observation_id = match store.insert_observation(&new_observation).await {
        Ok(id) => id,
        Err(StoreError::UniqueViolation) => {
            // The existence check raced a concurrent identical submission.
            return SubmitReportResult::failure(
                SubmitReportErrorCode::AlreadySubmittedToday,
                DUPLICATE_MESSAGE,
            );
        }
        Err(err) => {
            error!("observation insert failed: {err}");
            return SubmitReportResult::failure(SubmitReportErrorCode::Unknown, err.to_string());
        }
    };

    // Step 3: append the ledger entry; undo the observation if it fails.
    if let Err(err) = store
        .insert_point_event(payload.user_id, observation_id, points_granted)
        .await
    {
        error!("point ledger insert failed: {err}");
        rollback_observation(store, observation_id).await;
        return SubmitReportResult::failure(SubmitReportErrorCode::Unknown, err.to_string());
    }

    // Step 4: bump the daily aggregate.
    if let Err(err) = store
        .add_daily_report_stats(payload.user_id, observed_at, points_granted)
        .await
    {
        error!("daily stats update failed: {err}");
        rollback_observation(store, observation_id).await;
        return SubmitReportResult::failure(SubmitReportErrorCode::Unknown, err.to_string());
    }

    // Step 5: recompute the lifetime total from the ledger.
    let total_points = match store.sum_user_points(payload.user_id).await {
        Ok(sum) => normalize_total_points(Some(sum as f64)),
        Err(err) => {
            error!("point total recompute failed: {err}");
            rollback_observation(store, observation_id).await;
            return SubmitReportResult::failure(SubmitReportErrorCode::Unknown, err.to_string());
        }
    };

    SubmitReportResult {
        ok: true,
        points_granted,
        total_points,
        error_code: None,
        error: None,
    }
}

/// Best effort: a failed rollback is logged, never re-thrown, so the caller
/// still sees the original error.
async fn rollback_observation(store: &dyn ReportStore, observation_id: Uuid) {
    if let Err(err) = store.delete_observation(observation_id).await {
        warn!("rollback of observation {observation_id} failed: {err}");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::points::{get_point_tier, PointTier};

    #[derive(Debug, Clone)]
    struct StoredObservation {
        id: Uuid,
        user_id: Uuid,
        place_id: Uuid,
        observed_at: NaiveDate,
        memo_short: Option<String>,
    }

    /// In-memory stand-in enforcing the same unique key as the database.
    #[derive(Default)]
    struct MockStore {
        observations: Mutex<Vec<StoredObservation>>,
        point_events: Mutex<Vec<(Uuid, Uuid, i32)>>,
        daily: Mutex<HashMap<(Uuid, NaiveDate), (i32, i32)>>,
        /// Makes the fast-path check miss existing rows, simulating the
        /// check-then-act race between two identical submissions.
        hide_from_existence_check: AtomicBool,
        fail_point_insert: AtomicBool,
        fail_daily_update: AtomicBool,
        fail_delete: AtomicBool,
    }

    impl MockStore {
        fn observation_count(&self) -> usize {
            self.observations.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ReportStore for MockStore {
        async fn find_user_visit(
            &self,
            user_id: Uuid,
            place_id: Uuid,
            observed_at: NaiveDate,
        ) -> Result<Option<Uuid>, StoreError> {
            if self.hide_from_existence_check.load(Ordering::SeqCst) {
                return Ok(None);
            }
            Ok(self
                .observations
                .lock()
                .unwrap()
                .iter()
                .find(|o| {
                    o.user_id == user_id && o.place_id == place_id && o.observed_at == observed_at
                })
                .map(|o| o.id))
        }

        async fn insert_observation(&self, new: &NewObservation) -> Result<Uuid, StoreError> {
            let mut observations = self.observations.lock().unwrap();
            let duplicate = observations.iter().any(|o| {
                o.user_id == new.user_id
                    && o.place_id == new.place_id
                    && o.observed_at == new.observed_at
            });
            if duplicate {
                return Err(StoreError::UniqueViolation);
            }
            let id = Uuid::new_v4();
            observations.push(StoredObservation {
                id,
                user_id: new.user_id,
                place_id: new.place_id,
                observed_at: new.observed_at,
                memo_short: new.memo_short.clone(),
            });
            Ok(id)
        }

        async fn delete_observation(&self, observation_id: Uuid) -> Result<(), StoreError> {
            if self.fail_delete.load(Ordering::SeqCst) {
                return Err(StoreError::Database(sqlx::Error::PoolClosed));
            }
            self.observations
                .lock()
                .unwrap()
                .retain(|o| o.id != observation_id);
            Ok(())
        }

        async fn insert_point_event(
            &self,
            user_id: Uuid,
            observation_id: Uuid,
            points: i32,
        ) -> Result<(), StoreError> {
            if self.fail_point_insert.load(Ordering::SeqCst) {
                return Err(StoreError::Database(sqlx::Error::PoolClosed));
            }
            self.point_events
                .lock()
                .unwrap()
                .push((user_id, observation_id, points));
            Ok(())
        }

        async fn add_daily_report_stats(
            &self,
            user_id: Uuid,
            stat_date: NaiveDate,
            points: i32,
        ) -> Result<(), StoreError> {
            if self.fail_daily_update.load(Ordering::SeqCst) {
                return Err(StoreError::Database(sqlx::Error::PoolClosed));
            }
            let mut daily = self.daily.lock().unwrap();
            let entry = daily.entry((user_id, stat_date)).or_insert((0, 0));
            entry.0 += points;
            entry.1 += 1;
            Ok(())
        }

        async fn sum_user_points(&self, user_id: Uuid) -> Result<i64, StoreError> {
            Ok(self
                .point_events
                .lock()
                .unwrap()
                .iter()
                .filter(|(u, _, _)| *u == user_id)
                .map(|(_, _, p)| *p as i64)
                .sum())
        }
    }

    fn payload(user_id: Uuid, place_id: Uuid) -> SubmitReportPayload {
        SubmitReportPayload {
            user_id,
            place_id,
            solo_outcome: SoloOutcome::Accepted,
            seat_type: Some(SeatType::Counter),
            staff_reaction: Some(StaffReaction::Friendly),
            meal_period: Some(MealPeriod::Dinner),
            memo: None,
        }
    }

    #[tokio::test]
    async fn test_first_report_grants_points() {
        let store = MockStore::default();
        let user_id = Uuid::new_v4();

        let result = submit_report(&store, payload(user_id, Uuid::new_v4())).await;

        assert!(result.ok);
        assert_eq!(result.points_granted, 10);
        assert_eq!(result.total_points, 10);
        assert_eq!(get_point_tier(result.total_points), PointTier::Bronze);
    }

    #[tokio::test]
    async fn test_second_report_same_day_is_rejected() {
        let store = MockStore::default();
        let user_id = Uuid::new_v4();
        let place_id = Uuid::new_v4();

        let first = submit_report(&store, payload(user_id, place_id)).await;
        assert!(first.ok);

        let second = submit_report(&store, payload(user_id, place_id)).await;
        assert!(!second.ok);
        assert_eq!(
            second.error_code,
            Some(SubmitReportErrorCode::AlreadySubmittedToday)
        );
        assert_eq!(second.points_granted, 0);
        assert_eq!(store.observation_count(), 1);
    }

    #[tokio::test]
    async fn test_unique_violation_reclassified_when_check_races() {
        let store = MockStore::default();
        let user_id = Uuid::new_v4();
        let place_id = Uuid::new_v4();

        assert!(submit_report(&store, payload(user_id, place_id)).await.ok);

        // Existence check misses the row, so the flow reaches the insert and
        // hits the unique key instead.
        store.hide_from_existence_check.store(true, Ordering::SeqCst);
        let raced = submit_report(&store, payload(user_id, place_id)).await;

        assert!(!raced.ok);
        assert_eq!(
            raced.error_code,
            Some(SubmitReportErrorCode::AlreadySubmittedToday)
        );
        assert_eq!(store.observation_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_ledger_write_rolls_back_observation() {
        let store = MockStore::default();
        store.fail_point_insert.store(true, Ordering::SeqCst);

        let result = submit_report(&store, payload(Uuid::new_v4(), Uuid::new_v4())).await;

        assert!(!result.ok);
        assert_eq!(result.error_code, Some(SubmitReportErrorCode::Unknown));
        assert_eq!(store.observation_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_daily_update_rolls_back_observation() {
        let store = MockStore::default();
        store.fail_daily_update.store(true, Ordering::SeqCst);

        let result = submit_report(&store, payload(Uuid::new_v4(), Uuid::new_v4())).await;

        assert!(!result.ok);
        assert_eq!(store.observation_count(), 0);
        // The ledger entry was written before the aggregate failed; only the
        // observation is compensated.
        assert_eq!(store.point_events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rollback_failure_is_swallowed() {
        let store = MockStore::default();
        store.fail_point_insert.store(true, Ordering::SeqCst);
        store.fail_delete.store(true, Ordering::SeqCst);

        let result = submit_report(&store, payload(Uuid::new_v4(), Uuid::new_v4())).await;

        // The original error is still the one reported.
        assert!(!result.ok);
        assert_eq!(result.error_code, Some(SubmitReportErrorCode::Unknown));
        assert_eq!(store.observation_count(), 1);
    }

    #[tokio::test]
    async fn test_memo_trimmed_and_emptied_to_null() {
        let store = MockStore::default();

        let mut p = payload(Uuid::new_v4(), Uuid::new_v4());
        p.memo = Some("   ".to_string());
        assert!(submit_report(&store, p).await.ok);

        let mut p = payload(Uuid::new_v4(), Uuid::new_v4());
        p.memo = Some("  counter seats fill up fast  ".to_string());
        assert!(submit_report(&store, p).await.ok);

        let observations = store.observations.lock().unwrap();
        assert_eq!(observations[0].memo_short, None);
        assert_eq!(
            observations[1].memo_short.as_deref(),
            Some("counter seats fill up fast")
        );
    }

    #[tokio::test]
    async fn test_daily_aggregate_incremented_once() {
        let store = MockStore::default();
        let user_id = Uuid::new_v4();

        assert!(submit_report(&store, payload(user_id, Uuid::new_v4())).await.ok);
        assert!(submit_report(&store, payload(user_id, Uuid::new_v4())).await.ok);

        let today = Utc::now().date_naive();
        let daily = store.daily.lock().unwrap();
        assert_eq!(daily.get(&(user_id, today)), Some(&(20, 2)));
    }

    #[tokio::test]
    async fn test_reports_for_different_places_same_day_both_count() {
        let store = MockStore::default();
        let user_id = Uuid::new_v4();

        let first = submit_report(&store, payload(user_id, Uuid::new_v4())).await;
        let second = submit_report(&store, payload(user_id, Uuid::new_v4())).await;

        assert!(first.ok && second.ok);
        assert_eq!(second.total_points, 20);
        assert_eq!(store.observation_count(), 2);
    }
}
