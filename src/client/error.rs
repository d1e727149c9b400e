//! Errors raised while talking to the status endpoint.

use thiserror::Error;

/// Transport-level failures of a status request.
///
/// These are distinct from a job error carried inside a successful
/// response, which is a normal terminal outcome.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The endpoint answered with a non-success HTTP status.
    #[error("status endpoint returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Connection, DNS or timeout failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = ClientError::Api {
            status: 502,
            message: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "status endpoint returned 502: bad gateway");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClientError>();
    }
}
