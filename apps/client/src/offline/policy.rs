//! Per-route cache policy table.
//!
//! Offline-critical pages go cache-first, backend data goes network-first
//! with cache fallback, static assets go stale-while-revalidate, and
//! everything else passes through untouched.

/// Coarse resource class of a request, mirroring the fetch destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Document,
    Style,
    Script,
    Font,
    Image,
    Other,
}

/// What the interception layer does with a matched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStrategy {
    CacheFirst,
    NetworkFirst,
    StaleWhileRevalidate,
    Passthrough,
}

/// An intercepted outgoing request, reduced to what strategy selection and
/// cache keying need.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheRequest {
    pub host: String,
    pub path: String,
    pub kind: ResourceKind,
}

impl CacheRequest {
    pub fn page(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
            kind: ResourceKind::Document,
        }
    }

    pub fn asset(host: impl Into<String>, path: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
            kind,
        }
    }

    pub fn cache_key(&self) -> String {
        format!("{}{}", self.host, self.path)
    }
}

#[derive(Debug, Clone)]
pub struct RoutePolicy {
    /// Host of the hosted backend; its requests are data, never stale-served.
    pub api_host: String,
    /// Pages precached at install and served cache-first afterwards.
    pub offline_routes: Vec<String>,
}

impl RoutePolicy {
    pub fn new(api_host: impl Into<String>) -> Self {
        Self {
            api_host: api_host.into(),
            offline_routes: vec!["/pass".to_string(), "/saved".to_string()],
        }
    }

    pub fn strategy_for(&self, request: &CacheRequest) -> CacheStrategy {
        if self.offline_routes.iter().any(|route| route == &request.path) {
            return CacheStrategy::CacheFirst;
        }
        if request.path.starts_with("/api") || request.host == self.api_host {
            return CacheStrategy::NetworkFirst;
        }
        if matches!(
            request.kind,
            ResourceKind::Style | ResourceKind::Script | ResourceKind::Font
        ) {
            return CacheStrategy::StaleWhileRevalidate;
        }
        CacheStrategy::Passthrough
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RoutePolicy {
        RoutePolicy::new("api.hitoriok.app")
    }

    #[test]
    fn test_offline_pages_are_cache_first() {
        assert_eq!(
            policy().strategy_for(&CacheRequest::page("hitoriok.app", "/pass")),
            CacheStrategy::CacheFirst
        );
        assert_eq!(
            policy().strategy_for(&CacheRequest::page("hitoriok.app", "/saved")),
            CacheStrategy::CacheFirst
        );
    }

    #[test]
    fn test_backend_data_is_network_first() {
        assert_eq!(
            policy().strategy_for(&CacheRequest::page("hitoriok.app", "/api/v1/places")),
            CacheStrategy::NetworkFirst
        );
        assert_eq!(
            policy().strategy_for(&CacheRequest::page("api.hitoriok.app", "/anything")),
            CacheStrategy::NetworkFirst
        );
    }

    #[test]
    fn test_static_assets_are_stale_while_revalidate() {
        for kind in [ResourceKind::Style, ResourceKind::Script, ResourceKind::Font] {
            assert_eq!(
                policy().strategy_for(&CacheRequest::asset("hitoriok.app", "/static/app.css", kind)),
                CacheStrategy::StaleWhileRevalidate
            );
        }
    }

    #[test]
    fn test_unmatched_requests_pass_through() {
        assert_eq!(
            policy().strategy_for(&CacheRequest::page("hitoriok.app", "/map")),
            CacheStrategy::Passthrough
        );
        assert_eq!(
            policy().strategy_for(&CacheRequest::asset(
                "hitoriok.app",
                "/images/marker.png",
                ResourceKind::Image
            )),
            CacheStrategy::Passthrough
        );
    }
}
