//! Request-interception layer applying per-route cache policy, so the pass
//! card and the saved list keep rendering with no network.

pub mod policy;
pub mod worker;

pub use policy::{CacheRequest, CacheStrategy, ResourceKind, RoutePolicy};
pub use worker::{CacheStorage, CacheWorker, CachedResponse, FetchError, Upstream, CACHE_NAME};
