//! Error types for the resolution client.

use thiserror::Error;

/// Resolution client errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Caller supplied an unusable query or option.
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// The API answered with a non-success status.
    #[error("API error {code}: {body}")]
    Api { code: u16, body: String },

    /// The API answered 429 and retries were exhausted.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response that could not be interpreted.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Whether the request may succeed if sent again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimitExceeded | Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        assert!(ClientError::RateLimitExceeded.is_retryable());
        assert!(ClientError::Transport("reset".into()).is_retryable());
        assert!(!ClientError::Argument("x".into()).is_retryable());
        assert!(!ClientError::Api {
            code: 500,
            body: String::new()
        }
        .is_retryable());
    }

    #[test]
    fn test_api_error_message() {
        let err = ClientError::Api {
            code: 401,
            body: "unauthorized".into(),
        };
        assert_eq!(err.to_string(), "API error 401: unauthorized");
    }
}
