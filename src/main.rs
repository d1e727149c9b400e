use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jobwatch::cli::{Cli, Command};
use jobwatch::groups::{self, GroupTree};
use jobwatch::markers::{self, ClusterState, MarkerBatch};
use jobwatch::ui::TerminalSink;
use jobwatch::{JobStatusWatcher, StatusClient, WatchConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Watch {
            job_id,
            endpoint,
            interval_ms,
            render_delay_ms,
        } => {
            let mut config = WatchConfig::load_from(&cli.config)?;
            if let Some(endpoint) = endpoint {
                config.endpoint = endpoint;
            }
            if let Some(ms) = interval_ms {
                config.poll_interval_ms = ms;
            }
            if let Some(ms) = render_delay_ms {
                config.render_delay_ms = ms;
            }
            watch(job_id, &config).await
        }
        Command::Groups { file } => {
            let tree = GroupTree::from_json(&read(&file)?)?;
            println!("{}", groups::render(&tree));
            Ok(())
        }
        Command::Markers { file } => {
            let batch = MarkerBatch::from_json(&read(&file)?)?;
            let mut state = ClusterState::default();
            markers::retag(batch, &mut state)?;
            println!("{}", state.to_json()?);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "jobwatch=debug" } else { "jobwatch=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

async fn watch(job_id: String, config: &WatchConfig) -> Result<()> {
    let client = StatusClient::from_config(config)?;
    tracing::info!(endpoint = client.endpoint(), "watching job {job_id}");

    let sink = Arc::new(TerminalSink::new(job_id.clone()));
    let watcher = JobStatusWatcher::builder()
        .job_id(job_id)
        .sink(sink.clone())
        .source(client)
        .config(config)
        .build()?;

    let handle = watcher.start_watching();
    let cancel = handle.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, cancelling watch");
            cancel.cancel();
        }
    });

    let report = handle.join().await?;
    sink.print_report(&report);
    Ok(())
}
