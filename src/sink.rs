//! The display surface the watcher renders into.
//!
//! [`StatusSink`] is the collaborator contract: collapse, clear, loading
//! indicator, reveal and message append. [`MemorySink`] records every call
//! with the (tokio) instant it happened, for tests and headless embedding.

use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use crate::client::Resolution;

/// Text rendered once a response has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Status(String),
    Error(String),
}

impl From<&Resolution> for Message {
    fn from(resolution: &Resolution) -> Self {
        match resolution {
            Resolution::Progress(status) => Message::Status(status.clone()),
            Resolution::Failed(error) => Message::Error(error.clone()),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Status(text) => write!(f, "{text}"),
            Message::Error(text) => write!(f, "Error: {text}"),
        }
    }
}

/// UI surface written to by a single watcher.
pub trait StatusSink: Send + Sync {
    /// Hide the container.
    fn collapse(&self);
    /// Remove all current content.
    fn clear(&self);
    /// Append a transient loading indicator.
    fn show_loading(&self);
    /// Show the container.
    fn reveal(&self);
    /// Append a message, fading it in over `fade_in`.
    fn append_message(&self, message: &Message, fade_in: Duration);
}

/// One recorded sink call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Collapse,
    Clear,
    ShowLoading,
    Reveal,
    /// Message and the fade-in it was appended with.
    Append(Message, Duration),
}

/// Sink that keeps a timestamped log of every call.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<(Instant, SinkEvent)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, event: SinkEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push((Instant::now(), event));
        }
    }

    /// All events with their timestamps, oldest first.
    pub fn timeline(&self) -> Vec<(Instant, SinkEvent)> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.timeline().into_iter().map(|(_, e)| e).collect()
    }

    /// Messages appended so far, in order.
    pub fn messages(&self) -> Vec<Message> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Append(m, _) => Some(m),
                _ => None,
            })
            .collect()
    }

    /// Rendered text currently visible: everything appended since the last clear.
    pub fn visible_text(&self) -> Vec<String> {
        let mut visible = Vec::new();
        for event in self.events() {
            match event {
                SinkEvent::Clear => visible.clear(),
                SinkEvent::ShowLoading => visible.push("[loading]".to_string()),
                SinkEvent::Append(m, _) => visible.push(m.to_string()),
                SinkEvent::Collapse | SinkEvent::Reveal => {}
            }
        }
        visible
    }
}

impl StatusSink for MemorySink {
    fn collapse(&self) {
        self.record(SinkEvent::Collapse);
    }

    fn clear(&self) {
        self.record(SinkEvent::Clear);
    }

    fn show_loading(&self) {
        self.record(SinkEvent::ShowLoading);
    }

    fn reveal(&self) {
        self.record(SinkEvent::Reveal);
    }

    fn append_message(&self, message: &Message, fade_in: Duration) {
        self.record(SinkEvent::Append(message.clone(), fade_in));
    }
}
