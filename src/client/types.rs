//! Wire types for the status-check endpoint.
//!
//! The request goes out form-encoded (`job_id=...`); the response body is a
//! JSON object with a `status` message and an optional `error`.

use serde::{Deserialize, Deserializer, Serialize};

/// Form body posted to the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct StatusRequest<'a> {
    pub job_id: &'a str,
}

/// Decoded body of a status response.
///
/// Only one of the two fields is meaningful at a time; a non-empty `error`
/// wins over `status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Human-readable progress or completion message. `null` reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub status: String,
    /// Job failure message. `None` when absent or `null`.
    #[serde(default)]
    pub error: Option<String>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// What a response means for the watcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// The job is still running (or finished without error); keep polling.
    Progress(String),
    /// The job reported an error; stop polling.
    Failed(String),
}

impl Resolution {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Resolution::Failed(_))
    }
}

impl StatusResponse {
    /// Decode a raw response body.
    pub fn decode(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Resolve into progress or failure. An empty error string counts as no
    /// error.
    pub fn resolve(self) -> Resolution {
        match self.error {
            Some(error) if !error.is_empty() => Resolution::Failed(error),
            _ => Resolution::Progress(self.status),
        }
    }
}
