//! Error types for the API client.

use reqwest::StatusCode;
use techlearns_core::validation::ValidationErrors;

/// Client error type.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No session token; the request was never sent.
    #[error("authentication required")]
    AuthenticationRequired,

    /// Form input rejected locally; the request was never sent.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The server answered 5xx.
    #[error("server error ({status})")]
    Server {
        status: u16,
        message: Option<String>,
    },

    /// The service reported an error message of its own.
    #[error("service error: {0}")]
    Service(String),

    /// The server rejected the token.
    #[error("unauthorized ({status})")]
    Unauthorized { status: u16 },

    /// The requested resource does not exist.
    #[error("not found")]
    NotFound,

    /// Any other non-2xx response without a message.
    #[error("unexpected HTTP status {0}")]
    Http(u16),

    /// The client-side timeout elapsed.
    #[error("request timed out")]
    Timeout,

    /// Connection or transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// Response body did not have the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),

    /// Core error.
    #[error(transparent)]
    Core(#[from] techlearns_core::Error),
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Message field of an error body (`{"error": ...}` or `{"message": ...}`).
pub(crate) fn body_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(*key)?.as_str().map(str::to_string))
}

impl ClientError {
    /// Classify a transport-level failure.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }

    /// Classify a non-2xx response.
    pub(crate) fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let message = body_message(body);
        if status.is_server_error() {
            return Self::Server {
                status: status.as_u16(),
                message,
            };
        }
        match (status, message) {
            (StatusCode::NOT_FOUND, _) => Self::NotFound,
            (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, None) => Self::Unauthorized {
                status: status.as_u16(),
            },
            (_, Some(message)) => Self::Service(message),
            (_, None) => Self::Http(status.as_u16()),
        }
    }

    /// Whether a manual retry of the same call can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Server { .. } | Self::NotFound | Self::Timeout | Self::Network(_) | Self::Http(_)
        )
    }

    /// Message shown to the learner. Each failure class reads differently.
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthenticationRequired => "Please log in to continue.".to_string(),
            Self::Validation(errors) => errors.to_string(),
            Self::Server { .. } => {
                "Server error: the service could not complete the request. Please try again later."
                    .to_string()
            }
            Self::Service(message) => format!("Error: {message}"),
            Self::Unauthorized { .. } => {
                "Your session is no longer valid. Please log in again.".to_string()
            }
            Self::NotFound => "Not found. Check the notebook id and retry.".to_string(),
            Self::Http(status) => format!("Request failed with status {status}."),
            Self::Timeout => "The request timed out. Please try again.".to_string(),
            Self::Network(_) => {
                "Network error: could not reach the server. Check your connection.".to_string()
            }
            Self::Decode(_) => "The server sent an unexpected response.".to_string(),
            Self::Core(err) => err.with_hint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_server_error() {
        let err =
            ClientError::from_response(StatusCode::INTERNAL_SERVER_ERROR, br#"{"error":"boom"}"#);
        assert!(matches!(
            err,
            ClientError::Server { status: 500, message: Some(ref m) } if m == "boom"
        ));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_classify_service_message() {
        let err = ClientError::from_response(
            StatusCode::BAD_REQUEST,
            br#"{"message":"Unsupported language"}"#,
        );
        assert!(matches!(err, ClientError::Service(ref m) if m == "Unsupported language"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_classify_not_found_and_unauthorized() {
        assert!(matches!(
            ClientError::from_response(StatusCode::NOT_FOUND, b""),
            ClientError::NotFound
        ));
        assert!(matches!(
            ClientError::from_response(StatusCode::UNAUTHORIZED, b"not json"),
            ClientError::Unauthorized { status: 401 }
        ));
        assert!(matches!(
            ClientError::from_response(StatusCode::IM_A_TEAPOT, b""),
            ClientError::Http(418)
        ));
    }

    #[test]
    fn test_user_messages_are_distinct() {
        let server = ClientError::Server {
            status: 500,
            message: None,
        };
        assert_ne!(server.user_message(), ClientError::Timeout.user_message());
        assert_ne!(
            ClientError::Timeout.user_message(),
            ClientError::Network("refused".into()).user_message()
        );
        assert!(ClientError::Timeout.user_message().contains("timed out"));
        assert!(server.user_message().contains("Server error"));
    }
}
