use axum::{extract::State, Json};

use crate::reports::submit::{submit_report, SubmitReportPayload, SubmitReportResult};
use crate::state::AppState;

/// POST /api/v1/reports
///
/// Always answers 200; the duplicate-day condition is an expected typed
/// result, not an error response.
pub async fn handle_submit_report(
    State(state): State<AppState>,
    Json(payload): Json<SubmitReportPayload>,
) -> Json<SubmitReportResult> {
    Json(submit_report(state.report_store.as_ref(), payload).await)
}
