//! HTTP client for the HitoriOk backend API.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::snapshot::PlaceSummary;

pub struct ApiClient {
    base_url: String,
    http: Client,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub user_id: Uuid,
    pub place_id: Uuid,
    pub solo_outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_reaction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOutcome {
    pub ok: bool,
    pub points_granted: i32,
    pub total_points: i64,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassSummary {
    pub total_points: i64,
    pub tier: String,
    pub pass_level: String,
    pub display: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn submit_report(&self, payload: &ReportPayload) -> Result<ReportOutcome> {
        let response = self
            .http
            .post(self.url("/api/v1/reports"))
            .json(payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn pass_summary(&self, user_id: Uuid) -> Result<PassSummary> {
        let response = self
            .http
            .get(self.url(&format!("/api/v1/users/{user_id}/pass")))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

/// Bookmark operations the sync layer depends on. Backed by the HTTP API in
/// production, by an in-memory double in tests.
#[async_trait]
pub trait BookmarkApi: Send + Sync {
    async fn list_bookmarks(&self, user_id: Uuid) -> Result<Vec<PlaceSummary>>;
    async fn add_bookmark(&self, user_id: Uuid, place_id: Uuid) -> Result<()>;
    async fn remove_bookmark(&self, user_id: Uuid, place_id: Uuid) -> Result<()>;
}

#[async_trait]
impl BookmarkApi for ApiClient {
    async fn list_bookmarks(&self, user_id: Uuid) -> Result<Vec<PlaceSummary>> {
        let response = self
            .http
            .get(self.url(&format!("/api/v1/users/{user_id}/bookmarks")))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn add_bookmark(&self, user_id: Uuid, place_id: Uuid) -> Result<()> {
        self.http
            .put(self.url(&format!("/api/v1/users/{user_id}/bookmarks/{place_id}")))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn remove_bookmark(&self, user_id: Uuid, place_id: Uuid) -> Result<()> {
        self.http
            .delete(self.url(&format!("/api/v1/users/{user_id}/bookmarks/{place_id}")))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
