use std::sync::Arc;

use sqlx::PgPool;

use crate::reports::store::ReportStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Report persistence seam. Production uses `PgReportStore`; tests swap in
    /// an in-memory double.
    pub report_store: Arc<dyn ReportStore>,
}
