use thiserror::Error;

/// Failures that cross the planner boundary.
///
/// Only credential and transport problems surface as errors. Malformed
/// stream lines, bad delta JSON and a final unparseable document are all
/// absorbed by the pipeline (they degrade to an absent `parsed` or an empty
/// itinerary), so they never appear here.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// The selected provider has no API key configured. Raised before any
    /// network call is made.
    #[error("missing API key for provider '{provider}'; configure it in settings")]
    MissingCredential {
        /// The provider discriminant, e.g. "dashscope".
        provider: &'static str,
    },

    /// HTTP or connection-level failure talking to the provider.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Network-layer failure detail.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Provider answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        status: u16,
        /// Response body, kept verbatim for diagnostics.
        body: String,
    },

    /// Connection, timeout or response-decoding failure.
    #[error("network error: {0}")]
    Network(String),
}

impl TransportError {
    /// Whether a caller-side retry could plausibly succeed.
    ///
    /// The planner never retries internally; this classifier exists for the
    /// caller's retry policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Status { status, .. } => {
                matches!(status, 429 | 500..=599)
            }
            TransportError::Network(_) => true,
        }
    }
}

impl PlannerError {
    /// See [`TransportError::is_retryable`]. Credential errors are never
    /// retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            PlannerError::MissingCredential { .. } => false,
            PlannerError::Transport(err) => err.is_retryable(),
        }
    }
}

pub type PlannerResult<T> = Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_classification() {
        assert!(TransportError::Status { status: 503, body: String::new() }.is_retryable());
        assert!(TransportError::Status { status: 429, body: String::new() }.is_retryable());
        assert!(!TransportError::Status { status: 401, body: String::new() }.is_retryable());
        assert!(TransportError::Network("reset".to_owned()).is_retryable());
        assert!(!PlannerError::MissingCredential { provider: "dashscope" }.is_retryable());
    }

    #[test]
    fn display_includes_status_and_body() {
        let err = PlannerError::from(TransportError::Status {
            status: 401,
            body: "invalid key".to_owned(),
        });
        assert_eq!(err.to_string(), "HTTP 401: invalid key");
    }
}
