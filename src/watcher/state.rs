use std::fmt;

use serde::{Deserialize, Serialize};

use super::session::{WatchOutcome, WatchSession};
use crate::client::Resolution;

/// Lifecycle of one watch session.
///
/// IDLE → REQUESTING → RENDERING → CONTINUING → REQUESTING … until a job
/// error moves it to TERMINAL, or a cancel moves it to CANCELLED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatchState {
    Idle,
    Requesting,
    Rendering,
    Continuing,
    Terminal,
    Cancelled,
}

impl WatchState {
    pub fn is_final(self) -> bool {
        matches!(self, WatchState::Terminal | WatchState::Cancelled)
    }
}

impl fmt::Display for WatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchState::Idle => write!(f, "IDLE"),
            WatchState::Requesting => write!(f, "REQUESTING"),
            WatchState::Rendering => write!(f, "RENDERING"),
            WatchState::Continuing => write!(f, "CONTINUING"),
            WatchState::Terminal => write!(f, "TERMINAL"),
            WatchState::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Inputs that drive the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent {
    /// The first request is about to be issued.
    Request,
    /// A response was decoded.
    Respond(Resolution),
    /// Decide whether to continue, right after decoding.
    Settle,
    /// The poll interval elapsed.
    Wake,
    /// The caller cancelled the watch.
    Cancel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Next(WatchState),
    /// The session reached a final state.
    Complete(WatchOutcome),
    /// The event does not apply in the current state; nothing changed.
    Rejected { state: WatchState, event: WatchEvent },
}

pub struct StateMachine;

impl StateMachine {
    /// Apply `event` to `session` and return the resulting transition.
    ///
    /// Final states are absorbing: any event yields `Complete` with the
    /// outcome already reached.
    pub fn next(session: &mut WatchSession, event: WatchEvent) -> Transition {
        if let Some(outcome) = session.outcome() {
            return Transition::Complete(outcome);
        }

        let next = match (session.state, event) {
            (_, WatchEvent::Cancel) => WatchState::Cancelled,
            (WatchState::Idle, WatchEvent::Request)
            | (WatchState::Continuing, WatchEvent::Wake) => WatchState::Requesting,
            (WatchState::Requesting, WatchEvent::Respond(resolution)) => {
                session.polls += 1;
                session.last = Some(resolution);
                WatchState::Rendering
            }
            (WatchState::Rendering, WatchEvent::Settle) => match &session.last {
                Some(resolution) if resolution.is_terminal() => WatchState::Terminal,
                _ => WatchState::Continuing,
            },
            (state, event) => return Transition::Rejected { state, event },
        };

        session.state_history.push(session.state);
        session.state = next;

        match session.outcome() {
            Some(outcome) => Transition::Complete(outcome),
            None => Transition::Next(next),
        }
    }
}
