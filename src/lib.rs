pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod groups;
pub mod markers;
pub mod sink;
pub mod ui;
pub mod watcher;
pub mod worker;

pub use client::{ClientError, StatusClient, StatusResponse, StatusSource};
pub use config::WatchConfig;
pub use error::WatchError;
pub use sink::{MemorySink, Message, StatusSink};
pub use watcher::{JobId, JobStatusWatcher, WatchHandle, WatchOutcome, WatchReport};
