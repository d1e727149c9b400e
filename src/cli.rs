//! Command-line interface built on clap.
//!
//! [`Cli`] carries the global flags (--config, --verbose) and the
//! [`Command`] to run: watch, groups or markers.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// jobwatch: follow a background job until it reports an error.
#[derive(Debug, Parser)]
#[command(name = "jobwatch", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file.
    #[arg(long, global = true, default_value = crate::config::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Enable debug logging.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll a job's status until it reports an error or Ctrl-C is pressed.
    Watch {
        /// Job identifier sent as `job_id`.
        job_id: String,

        /// Status endpoint; overrides the config file and environment.
        #[arg(long)]
        endpoint: Option<String>,

        /// Milliseconds between a progress response and the next request.
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Milliseconds the loading indicator stays up before a message shows.
        #[arg(long)]
        render_delay_ms: Option<u64>,
    },

    /// Render a group payload (JSON file) as group-list markup.
    Groups {
        file: PathBuf,
    },

    /// Tag every marker in a batch (JSON file) with the circle icon.
    Markers {
        file: PathBuf,
    },
}
