//! Background workers: a handler runs on its own task, receives JSON
//! messages over a channel and replies with the transformed output.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::WatchError;
use crate::groups::{self, GroupTree};
use crate::markers::{self, ClusterState, MarkerBatch};

const CHANNEL_CAPACITY: usize = 32;

/// Turns one input message into one reply.
pub trait MessageHandler: Send + 'static {
    fn handle(&mut self, input: &str) -> Result<String, WatchError>;
}

/// Group payload in, group-list markup out.
#[derive(Debug, Default)]
pub struct GroupListHandler;

impl MessageHandler for GroupListHandler {
    fn handle(&mut self, input: &str) -> Result<String, WatchError> {
        let tree = GroupTree::from_json(input)?;
        Ok(groups::render(&tree))
    }
}

/// Marker batch in, re-tagged markers out. Owns the cluster state between
/// messages.
#[derive(Debug, Default)]
pub struct MarkerHandler {
    state: ClusterState,
}

impl MarkerHandler {
    pub fn state(&self) -> &ClusterState {
        &self.state
    }
}

impl MessageHandler for MarkerHandler {
    fn handle(&mut self, input: &str) -> Result<String, WatchError> {
        let batch = MarkerBatch::from_json(input)?;
        markers::retag(batch, &mut self.state)?;
        self.state.to_json()
    }
}

/// A handler running on a background task.
pub struct Worker {
    inbox: mpsc::Sender<String>,
    outbox: mpsc::Receiver<Result<String, WatchError>>,
    task: JoinHandle<()>,
}

impl Worker {
    pub fn spawn<H: MessageHandler>(handler: H) -> Self {
        let (inbox, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (tx, outbox) = mpsc::channel(CHANNEL_CAPACITY);
        let task = tokio::spawn(run(handler, rx, tx));
        Self { inbox, outbox, task }
    }

    /// Queue a message. Returns `false` once the worker has stopped.
    pub async fn post(&self, message: impl Into<String>) -> bool {
        self.inbox.send(message.into()).await.is_ok()
    }

    /// Next reply, in posting order. `None` after shutdown once drained.
    pub async fn recv(&mut self) -> Option<Result<String, WatchError>> {
        self.outbox.recv().await
    }

    /// Close the inbox and wait for the task to finish.
    pub async fn shutdown(self) -> Result<(), WatchError> {
        drop(self.inbox);
        self.task.await?;
        Ok(())
    }
}

async fn run<H: MessageHandler>(
    mut handler: H,
    mut inbox: mpsc::Receiver<String>,
    outbox: mpsc::Sender<Result<String, WatchError>>,
) {
    tracing::debug!("worker started");
    while let Some(message) = inbox.recv().await {
        let reply = handler.handle(&message);
        if let Err(e) = &reply {
            tracing::warn!(error = %e, "worker message failed");
        }
        if outbox.send(reply).await.is_err() {
            break;
        }
    }
    tracing::debug!("worker stopped: channel closed");
}
