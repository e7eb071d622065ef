use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Rate limited by upstream (HTTP 429)")]
    RateLimited,

    #[error("Unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No data available: {0}")]
    NoData(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;

// ---------------------------------------------------------------------------
// FetchIssue: what went wrong, in terms a user can act on
// ---------------------------------------------------------------------------

/// Condition signalled alongside an empty fetch result.
///
/// `RateLimited` is kept apart from the generic cases because the advice
/// differs: wait a minute or two instead of retrying right away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchIssue {
    Timeout,
    RateLimited,
    FetchFailed(String),
    MissingField(String),
    NoData,
}

impl FetchIssue {
    /// User-facing message for this condition.
    pub fn message(&self) -> String {
        match self {
            FetchIssue::Timeout => {
                "Timeout: the API took too long to respond. Please try again.".to_string()
            }
            FetchIssue::RateLimited => "API request limit reached. Market data is \
                 temporarily unavailable; wait 1-2 minutes before refreshing again."
                .to_string(),
            FetchIssue::FetchFailed(detail) => format!("Request failed: {}", detail),
            FetchIssue::MissingField(field) => {
                format!("Field '{}' was not found in the API data", field)
            }
            FetchIssue::NoData => {
                "Could not load data. Check your connection and try again.".to_string()
            }
        }
    }

    /// Whether the user should wait before retrying rather than retry now.
    pub fn should_wait(&self) -> bool {
        matches!(self, FetchIssue::RateLimited)
    }
}

impl fmt::Display for FetchIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl From<&DashboardError> for FetchIssue {
    fn from(err: &DashboardError) -> Self {
        match err {
            DashboardError::Timeout(_) => FetchIssue::Timeout,
            DashboardError::Http(e) if e.is_timeout() => FetchIssue::Timeout,
            DashboardError::RateLimited => FetchIssue::RateLimited,
            DashboardError::MissingField(field) => FetchIssue::MissingField(field.clone()),
            DashboardError::NoData(_) => FetchIssue::NoData,
            other => FetchIssue::FetchFailed(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Fetched: total fetch outcome
// ---------------------------------------------------------------------------

/// Result of a total fetcher: always carries data (possibly empty), plus the
/// issue that emptied it, if any.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub data: T,
    pub issue: Option<FetchIssue>,
}

impl<T> Fetched<T> {
    pub fn ok(data: T) -> Self {
        Self { data, issue: None }
    }

    pub fn failed(data: T, issue: FetchIssue) -> Self {
        Self {
            data,
            issue: Some(issue),
        }
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}
