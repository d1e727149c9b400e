use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::WatchState;
use crate::client::Resolution;
use crate::error::WatchError;

/// Opaque, non-empty job identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Result<Self, WatchError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(WatchError::InvalidArgument(
                "job id must be specified".into(),
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatchOutcome {
    /// The job reported an error.
    JobFailed(String),
    /// The caller cancelled the watch.
    Cancelled,
}

impl fmt::Display for WatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchOutcome::JobFailed(error) => write!(f, "job failed: {error}"),
            WatchOutcome::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Runtime state of one `start_watching` call.
#[derive(Debug, Clone)]
pub struct WatchSession {
    pub id: Uuid,
    pub job_id: JobId,
    pub state: WatchState,
    pub state_history: Vec<WatchState>,
    /// Number of responses decoded so far.
    pub polls: u32,
    pub last: Option<Resolution>,
    pub started_at: DateTime<Utc>,
}

impl WatchSession {
    pub fn new(job_id: JobId) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_id,
            state: WatchState::Idle,
            state_history: Vec::new(),
            polls: 0,
            last: None,
            started_at: Utc::now(),
        }
    }

    /// The outcome once the session is in a final state.
    pub fn outcome(&self) -> Option<WatchOutcome> {
        match (self.state, &self.last) {
            (WatchState::Cancelled, _) => Some(WatchOutcome::Cancelled),
            (WatchState::Terminal, Some(Resolution::Failed(error))) => {
                Some(WatchOutcome::JobFailed(error.clone()))
            }
            _ => None,
        }
    }
}

/// Summary produced when a session finishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchReport {
    pub job_id: JobId,
    pub session_id: Uuid,
    pub outcome: Option<WatchOutcome>,
    pub polls: u32,
    pub state_transitions: Vec<WatchState>,
    pub last_message: Option<Resolution>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: i64,
}

impl WatchReport {
    pub fn from_session(session: &WatchSession) -> Self {
        let now = Utc::now();
        let mut transitions = session.state_history.clone();
        transitions.push(session.state);

        Self {
            job_id: session.job_id.clone(),
            session_id: session.id,
            outcome: session.outcome(),
            polls: session.polls,
            state_transitions: transitions,
            last_message: session.last.clone(),
            started_at: session.started_at,
            finished_at: now,
            duration_ms: (now - session.started_at).num_milliseconds(),
        }
    }
}
