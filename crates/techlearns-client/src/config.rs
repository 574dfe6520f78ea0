//! Client configuration.

use std::time::Duration;

/// API base used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Bound on a single code execution request.
pub const EXECUTE_TIMEOUT: Duration = Duration::from_secs(30);

/// Bound on every other request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST API, without a trailing `/api`.
    pub base_url: String,
    /// Timeout for notebook, auth, and dashboard calls.
    pub request_timeout: Duration,
    /// Timeout for `POST /api/execute`.
    pub execute_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout: REQUEST_TIMEOUT,
            execute_timeout: EXECUTE_TIMEOUT,
        }
    }
}
