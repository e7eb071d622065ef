//! HTTP transport seam.
//!
//! The [`Connection`](crate::Connection) issues every request through a
//! [`Transport`], so the blocking reqwest client can be swapped for a scripted
//! one in tests.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{DashboardError, Result};

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues blocking GET requests.
///
/// Implementations report an elapsed deadline as [`DashboardError::Timeout`]
/// and return non-2xx responses as ordinary [`HttpResponse`]s.
pub trait Transport: Send {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse>;
}

/// [`Transport`] backed by `reqwest::blocking`.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse> {
        let resp = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(timeout)
            .send()
            .map_err(classify)?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(classify)?;
        Ok(HttpResponse { status, body })
    }
}

fn classify(err: reqwest::Error) -> DashboardError {
    if err.is_timeout() {
        DashboardError::Timeout(err.to_string())
    } else {
        DashboardError::Http(err)
    }
}
