//! Endpoint request builder.
//!
//! Path segments are percent-encoded by the URL parser and query values go
//! through `application/x-www-form-urlencoded` serialization, never through
//! string interpolation. Builder methods return `&mut Self` for chaining.
//!
//! # Example
//!
//! ```rust
//! use coinboard::ApiRequest;
//! let url = ApiRequest::new("coins/markets")
//!     .param("vs_currency", "usd")
//!     .param("per_page", 20)
//!     .url("https://api.coingecko.com/api/v3")
//!     .unwrap();
//! assert!(url.ends_with("coins/markets?vs_currency=usd&per_page=20"));
//! ```

use reqwest::Url;

use crate::cache::CacheKey;
use crate::error::{DashboardError, Result};

/// A GET request against the market-data API, relative to the API base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    segments: Vec<String>,
    params: Vec<(String, String)>,
}

impl ApiRequest {
    /// Create a request for a `/`-separated endpoint path.
    pub fn new(path: &str) -> Self {
        Self {
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
                .collect(),
            params: Vec::new(),
        }
    }

    /// Append one path segment. The segment is encoded as a unit, so a `/`
    /// inside it cannot escape into a different endpoint.
    pub fn segment(&mut self, segment: &str) -> &mut Self {
        self.segments.push(segment.to_string());
        self
    }

    /// Append a query parameter. Order is preserved.
    pub fn param<V: ToString>(&mut self, key: &str, value: V) -> &mut Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    /// Endpoint path, segments joined with `/`.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Resolve against `base` into an absolute URL.
    pub fn url(&self, base: &str) -> Result<String> {
        let mut url = Url::parse(base).map_err(|e| {
            DashboardError::InvalidArgument(format!("Invalid API base '{}': {}", base, e))
        })?;
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                DashboardError::InvalidArgument(format!("API base '{}' cannot hold a path", base))
            })?;
            path.pop_if_empty();
            for segment in &self.segments {
                path.push(segment);
            }
        }
        if !self.params.is_empty() {
            url.query_pairs_mut().extend_pairs(self.params.iter());
        }
        Ok(url.to_string())
    }

    /// Cache key for this request under the given function identity.
    pub fn cache_key(&self, scope: &'static str) -> CacheKey {
        CacheKey::new(scope, self.path(), self.params.clone())
    }
}
