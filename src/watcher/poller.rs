use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use super::session::{JobId, WatchReport, WatchSession};
use super::state::{StateMachine, Transition, WatchEvent};
use crate::client::{StatusResponse, StatusSource};
use crate::config::WatchConfig;
use crate::error::WatchError;
use crate::sink::{Message, StatusSink};

#[derive(Debug, Clone, Copy)]
struct Timing {
    render_delay: Duration,
    poll_interval: Duration,
    fade_in: Duration,
}

impl From<&WatchConfig> for Timing {
    fn from(config: &WatchConfig) -> Self {
        Self {
            render_delay: config.render_delay(),
            poll_interval: config.poll_interval(),
            fade_in: config.fade_in(),
        }
    }
}

/// Collects the watcher's required collaborators.
///
/// `build` fails with [`WatchError::InvalidArgument`] if the job id, the
/// sink or the status source is missing.
pub struct WatcherBuilder<S> {
    job_id: Option<String>,
    sink: Option<Arc<dyn StatusSink>>,
    source: Option<S>,
    config: WatchConfig,
}

impl<S: StatusSource> Default for WatcherBuilder<S> {
    fn default() -> Self {
        Self {
            job_id: None,
            sink: None,
            source: None,
            config: WatchConfig::default(),
        }
    }
}

impl<S: StatusSource> WatcherBuilder<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }

    pub fn sink(mut self, sink: Arc<dyn StatusSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn source(mut self, source: S) -> Self {
        self.source = Some(source);
        self
    }

    pub fn config(mut self, config: &WatchConfig) -> Self {
        self.config = config.clone();
        self
    }

    pub fn build(self) -> Result<JobStatusWatcher<S>, WatchError> {
        let job_id = JobId::new(self.job_id.ok_or_else(|| {
            WatchError::InvalidArgument("job id must be specified".into())
        })?)?;
        let sink = self.sink.ok_or_else(|| {
            WatchError::InvalidArgument("a status sink must be specified".into())
        })?;
        let source = self.source.ok_or_else(|| {
            WatchError::InvalidArgument("a status source must be specified".into())
        })?;

        Ok(JobStatusWatcher {
            job_id,
            sink,
            source: Arc::new(source),
            timing: Timing::from(&self.config),
        })
    }
}

/// Polls a job's status until the job reports an error or the watch is
/// cancelled, rendering each answer into a [`StatusSink`].
pub struct JobStatusWatcher<S> {
    job_id: JobId,
    sink: Arc<dyn StatusSink>,
    source: Arc<S>,
    timing: Timing,
}

impl<S: StatusSource> JobStatusWatcher<S> {
    pub fn builder() -> WatcherBuilder<S> {
        WatcherBuilder::new()
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Collapse the sink and start a new watch session in the background.
    ///
    /// Returns immediately. Each call starts an independent session, so two
    /// calls poll the same job twice over. Must be called inside a Tokio
    /// runtime.
    pub fn start_watching(&self) -> WatchHandle {
        let session = WatchSession::new(self.job_id.clone());
        let session_id = session.id;
        let cancel = CancellationToken::new();

        self.sink.collapse();

        let span = tracing::info_span!(
            "watch",
            job_id = %self.job_id,
            session = %session_id,
        );
        let task = tokio::spawn(
            run_session(
                session,
                self.source.clone(),
                self.sink.clone(),
                self.timing,
                cancel.clone(),
            )
            .instrument(span),
        );

        WatchHandle {
            session_id,
            cancel,
            task,
        }
    }
}

/// Handle to a running watch session.
pub struct WatchHandle {
    session_id: Uuid,
    cancel: CancellationToken,
    task: JoinHandle<Result<WatchReport, WatchError>>,
}

impl WatchHandle {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Stop the session at its next suspension point. No further request is
    /// issued and any pending render is dropped.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A clone of the session's token, e.g. to wire up a signal handler.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the session to end.
    pub async fn join(self) -> Result<WatchReport, WatchError> {
        self.task.await?
    }
}

fn advance(session: &mut WatchSession, event: WatchEvent) -> Transition {
    let transition = StateMachine::next(session, event);
    match &transition {
        Transition::Next(state) => {
            tracing::debug!(state = %state, poll = session.polls, "state changed");
        }
        Transition::Complete(outcome) => {
            tracing::info!(outcome = %outcome, polls = session.polls, "watch finished");
        }
        Transition::Rejected { state, event } => {
            tracing::warn!(state = %state, ?event, "ignored event");
        }
    }
    transition
}

fn cancelled(mut session: WatchSession) -> WatchReport {
    advance(&mut session, WatchEvent::Cancel);
    WatchReport::from_session(&session)
}

async fn run_session<S: StatusSource>(
    mut session: WatchSession,
    source: Arc<S>,
    sink: Arc<dyn StatusSink>,
    timing: Timing,
    cancel: CancellationToken,
) -> Result<WatchReport, WatchError> {
    let job_id = session.job_id.clone();
    let mut event = WatchEvent::Request;

    loop {
        advance(&mut session, event);

        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(cancelled(session)),
            fetched = source.fetch_status(&job_id) => fetched,
        };
        let body = fetched.inspect_err(|e| {
            tracing::error!(error = %e, "status request failed");
        })?;
        let resolution = StatusResponse::decode(&body)
            .inspect_err(|e| {
                tracing::error!(error = %e, "malformed status response");
            })?
            .resolve();
        tracing::info!(?resolution, "status received");

        let message = Message::from(&resolution);
        advance(&mut session, WatchEvent::Respond(resolution));

        sink.clear();
        sink.show_loading();
        sink.reveal();
        let render = tokio::spawn(
            render_after(sink.clone(), message, timing, cancel.clone()).in_current_span(),
        );

        // Decided now, not after the render delay.
        if let Transition::Complete(_) = advance(&mut session, WatchEvent::Settle) {
            render.await?;
            return Ok(WatchReport::from_session(&session));
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(cancelled(session)),
            _ = sleep(timing.poll_interval) => {}
        }

        sink.collapse();
        event = WatchEvent::Wake;
    }
}

async fn render_after(
    sink: Arc<dyn StatusSink>,
    message: Message,
    timing: Timing,
    cancel: CancellationToken,
) {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => return,
        _ = sleep(timing.render_delay) => {}
    }
    sink.clear();
    sink.append_message(&message, timing.fade_in);
}
