//! The cache worker: serves intercepted requests according to the route
//! policy, against a single named, version-tagged bucket.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::policy::{CacheRequest, CacheStrategy, RoutePolicy};

/// Current bucket name. Bumping the version tag invalidates every older
/// bucket at activation time.
pub const CACHE_NAME: &str = "hitori-ok-v2";

#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network unreachable: {0}")]
    Network(String),

    #[error("upstream returned status {0}")]
    Status(u16),
}

/// The network behind the interception layer.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn fetch(&self, request: &CacheRequest) -> Result<CachedResponse, FetchError>;
}

type Bucket = HashMap<String, CachedResponse>;

/// Multi-bucket response cache shared across worker versions, keyed by bucket
/// name then by request.
#[derive(Default, Clone)]
pub struct CacheStorage {
    buckets: Arc<RwLock<HashMap<String, Bucket>>>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, bucket: &str, key: &str) -> Option<CachedResponse> {
        self.buckets.read().await.get(bucket)?.get(key).cloned()
    }

    pub async fn put(&self, bucket: &str, key: &str, response: CachedResponse) {
        self.buckets
            .write()
            .await
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), response);
    }

    /// Single-version retention: drops every bucket except `keep`.
    pub async fn delete_others(&self, keep: &str) {
        self.buckets.write().await.retain(|name, _| name == keep);
    }

    pub async fn bucket_names(&self) -> Vec<String> {
        self.buckets.read().await.keys().cloned().collect()
    }
}

pub struct CacheWorker {
    policy: RoutePolicy,
    upstream: Arc<dyn Upstream>,
    storage: CacheStorage,
}

impl CacheWorker {
    pub fn new(policy: RoutePolicy, upstream: Arc<dyn Upstream>, storage: CacheStorage) -> Self {
        Self {
            policy,
            upstream,
            storage,
        }
    }

    /// Precaches the offline routes into the current bucket.
    pub async fn install(&self, host: &str) {
        for path in &self.policy.offline_routes {
            let request = CacheRequest::page(host, path.clone());
            match self.upstream.fetch(&request).await {
                Ok(response) => self.put(&request, response).await,
                Err(err) => warn!("precache of {path} failed: {err}"),
            }
        }
    }

    /// Drops every differently-named bucket left over from older versions.
    pub async fn activate(&self) {
        self.storage.delete_others(CACHE_NAME).await;
    }

    pub async fn handle(&self, request: &CacheRequest) -> Result<CachedResponse, FetchError> {
        match self.policy.strategy_for(request) {
            CacheStrategy::CacheFirst => self.cache_first(request).await,
            CacheStrategy::NetworkFirst => self.network_first(request).await,
            CacheStrategy::StaleWhileRevalidate => self.stale_while_revalidate(request).await,
            CacheStrategy::Passthrough => self.upstream.fetch(request).await,
        }
    }

    async fn cache_first(&self, request: &CacheRequest) -> Result<CachedResponse, FetchError> {
        if let Some(cached) = self.lookup(request).await {
            return Ok(cached);
        }
        let response = self.upstream.fetch(request).await?;
        self.put(request, response.clone()).await;
        Ok(response)
    }

    async fn network_first(&self, request: &CacheRequest) -> Result<CachedResponse, FetchError> {
        match self.upstream.fetch(request).await {
            Ok(response) => {
                self.put(request, response.clone()).await;
                Ok(response)
            }
            Err(err) => match self.lookup(request).await {
                Some(cached) => {
                    debug!("serving {} from cache after fetch failure", request.path);
                    Ok(cached)
                }
                None => Err(err),
            },
        }
    }

    /// Serves the cached copy immediately and refreshes it in the background;
    /// falls back to a foreground fetch on a cold cache.
    async fn stale_while_revalidate(
        &self,
        request: &CacheRequest,
    ) -> Result<CachedResponse, FetchError> {
        match self.lookup(request).await {
            Some(cached) => {
                let upstream = Arc::clone(&self.upstream);
                let storage = self.storage.clone();
                let request = request.clone();
                tokio::spawn(async move {
                    match upstream.fetch(&request).await {
                        Ok(response) => {
                            storage.put(CACHE_NAME, &request.cache_key(), response).await;
                        }
                        Err(err) => debug!("background refresh of {} failed: {err}", request.path),
                    }
                });
                Ok(cached)
            }
            None => {
                let response = self.upstream.fetch(request).await?;
                self.put(request, response.clone()).await;
                Ok(response)
            }
        }
    }

    async fn lookup(&self, request: &CacheRequest) -> Option<CachedResponse> {
        self.storage.get(CACHE_NAME, &request.cache_key()).await
    }

    async fn put(&self, request: &CacheRequest, response: CachedResponse) {
        self.storage
            .put(CACHE_NAME, &request.cache_key(), response)
            .await;
    }
}
