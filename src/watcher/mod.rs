mod poller;
mod session;
mod state;

pub use poller::{JobStatusWatcher, WatchHandle, WatcherBuilder};
pub use session::{JobId, WatchOutcome, WatchReport, WatchSession};
pub use state::{StateMachine, Transition, WatchEvent, WatchState};
