mod cli;
mod config;
mod dispatcher;
mod executor;
mod ingest;
mod instance;
mod logging;
mod paths;
mod startup;

use anyhow::{Context, Result};
use std::io::BufReader;
use tracing::{debug, info, warn};

use crate::cli::Command;
use crate::config::ConfigStore;
use crate::dispatcher::Dispatcher;
use crate::executor::ShellExecutor;
use crate::ingest::Ingestion;
use crate::instance::{Acquisition, InstanceLock};

#[tokio::main]
async fn main() {
    let args = cli::parse();
    logging::init_logging();

    let result = match args.command {
        Some(Command::Install) => {
            paths::profile_file_path().and_then(|p| startup::register_startup(&p))
        }
        Some(Command::Uninstall) => {
            paths::profile_file_path().and_then(|p| startup::unregister_startup(&p))
        }
        None => run_watcher().await,
    };

    if let Err(e) = result {
        eprintln!("catcher-daemon error: {e:?}");
        std::process::exit(1);
    }
}

async fn run_watcher() -> Result<()> {
    // ── App data directory ────────────────────────────────────────────────────
    let app_dir = paths::app_data_dir()?;
    std::fs::create_dir_all(&app_dir)
        .with_context(|| format!("Failed to create app data directory {}", app_dir.display()))?;

    // ── Single instance ───────────────────────────────────────────────────────
    let lock = InstanceLock::new(paths::pid_file_path()?);
    if let Acquisition::AlreadyRunning(pid) = lock.acquire()? {
        debug!(pid, record = %lock.path().display(), "instance record points at a live process");
        info!("Daemon already running.");
        return Ok(());
    }

    // ── Configuration ─────────────────────────────────────────────────────────
    // A missing or broken config aborts startup rather than running with no rules.
    let store = ConfigStore::new(paths::config_file_path()?);
    let snapshot = store.load()?;
    info!(
        "catcher-daemon v{} started ({} rules from {})",
        env!("CARGO_PKG_VERSION"),
        snapshot.rules().len(),
        store.path().display()
    );

    // ── Pipeline ──────────────────────────────────────────────────────────────
    let (tx, rx) = ingest::queue();
    let dispatcher = tokio::spawn(Dispatcher::new(store, snapshot, ShellExecutor).run(rx));

    let ingestion = Ingestion::start(BufReader::new(std::io::stdin()), tx)
        .context("Failed to start input reader thread")?;

    ingestion
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl+C: {e}");
                std::future::pending::<()>().await;
            }
        })
        .await;

    // No timeout: a hung action keeps the daemon alive until it returns.
    let processed = dispatcher.await.context("Dispatcher task panicked")?;
    info!("Shutting down ({processed} lines processed)");
    Ok(())
}
