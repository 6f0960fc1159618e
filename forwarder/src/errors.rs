use http::StatusCode;
use thiserror::Error;

/// Result type alias for forwarder operations
pub type Result<T, E = ForwarderError> = std::result::Result<T, E>;

/// Errors that fail a whole invocation
#[derive(Error, Debug)]
pub enum ForwarderError {
    #[error("Invalid SUMO_ENDPOINT environment variable: {0}")]
    InvalidEndpoint(String),

    #[error("Invalid source API URL: {0}")]
    InvalidSourceUrl(String),

    #[error("Log fetch failed: {0}")]
    FetchFailed(#[source] reqwest::Error),

    #[error("Failed to read log payload: {0}")]
    FetchBody(#[source] reqwest::Error),

    #[error("Malformed log record on line {line}: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// One entry per group that could not be delivered
    #[error("errors: {}", .0.join(","))]
    Delivery(Vec<String>),
}

/// Failure to deliver a single group. Sibling deliveries are unaffected.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("HTTP Return code {}", .0.as_u16())]
    Status(StatusCode),

    #[error("{0}")]
    Transport(String),

    #[error("Delivery task failed: {0}")]
    TaskFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_errors_joined() {
        let error = ForwarderError::Delivery(vec![
            DeliveryError::Status(StatusCode::INTERNAL_SERVER_ERROR).to_string(),
            DeliveryError::Transport("connection refused".to_string()).to_string(),
        ]);
        assert_eq!(
            error.to_string(),
            "errors: HTTP Return code 500,connection refused"
        );
    }

    #[test]
    fn test_status_message() {
        assert_eq!(
            DeliveryError::Status(StatusCode::TOO_MANY_REQUESTS).to_string(),
            "HTTP Return code 429"
        );
    }
}
