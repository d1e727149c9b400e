use thiserror::Error;

use crate::client::ClientError;

#[derive(Debug, Error)]
pub enum WatchError {
    /// Missing or empty constructor input. Raised before any request is made.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The status body was not a valid status object.
    #[error("Failed to decode status response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The status request itself failed; no retry is attempted.
    #[error("Status request failed: {0}")]
    Transport(#[from] ClientError),

    /// The watch task panicked or was aborted.
    #[error("Watch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_display() {
        let err = WatchError::InvalidArgument("job id must be specified".into());
        assert_eq!(err.to_string(), "Invalid argument: job id must be specified");
    }

    #[test]
    fn decode_error_converts_from_serde() {
        let err: WatchError = serde_json::from_str::<serde_json::Value>("not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, WatchError::Decode(_)));
        assert!(err.to_string().starts_with("Failed to decode status response"));
    }

    #[test]
    fn transport_error_wraps_client_error() {
        let err: WatchError = ClientError::Api {
            status: 500,
            message: "oops".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Status request failed: status endpoint returned 500: oops"
        );
    }
}
