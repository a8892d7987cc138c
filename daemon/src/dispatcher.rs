/// Consumer side of the handoff queue.
///
/// Owns the current [`ConfigSnapshot`] outright; it is read and replaced only
/// from this task, so no lock guards it.
use tracing::{debug, info, warn};

use crate::config::{ConfigSnapshot, ConfigStore};
use crate::executor::ActionExecutor;
use crate::ingest::{Entry, Receiver};

pub struct Dispatcher<E> {
    store: ConfigStore,
    snapshot: ConfigSnapshot,
    executor: E,
}

impl<E: ActionExecutor> Dispatcher<E> {
    pub fn new(store: ConfigStore, snapshot: ConfigSnapshot, executor: E) -> Self {
        Self {
            store,
            snapshot,
            executor,
        }
    }

    /// Pops entries until the sentinel (or a closed queue) and returns the
    /// number of lines processed. Lines queued behind the sentinel are dropped.
    pub async fn run(mut self, mut rx: Receiver) -> usize {
        let mut processed = 0;
        while let Some(entry) = rx.recv().await {
            let line = match entry {
                Entry::Line(line) => line,
                Entry::Sentinel => {
                    debug!("sentinel received, dispatcher stopping");
                    break;
                }
            };
            self.dispatch(&line).await;
            processed += 1;
        }
        processed
    }

    async fn dispatch(&mut self, line: &str) {
        match self.store.refresh_if_stale(&self.snapshot) {
            Ok(Some(snapshot)) => {
                debug!(
                    rules = snapshot.rules().len(),
                    modified = ?snapshot.modified(),
                    "config reloaded"
                );
                self.snapshot = snapshot;
            }
            Ok(None) => {}
            // Keep the last good rules; the stat is retried on the next line.
            Err(e) => warn!("Config reload failed, keeping previous rules: {e}"),
        }

        for rule in self.snapshot.matching(line) {
            info!("Detected error: {}. Executing...", rule.pattern);
            self.executor.run(&rule.action).await;
        }
    }
}
