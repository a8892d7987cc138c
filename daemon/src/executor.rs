use std::future::Future;

use tokio::process::Command;
use tracing::debug;

/// Runs the action attached to a matched rule.
pub trait ActionExecutor: Send + Sync + 'static {
    fn run(&self, command: &str) -> impl Future<Output = ()> + Send;
}

/// Hands the command text to the platform shell with inherited stdio.
///
/// Waits for the command to exit but never inspects the result: a failing
/// action is neither retried nor surfaced, and the watcher moves on.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellExecutor;

impl ShellExecutor {
    fn command(command: &str) -> Command {
        if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(command);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(command);
            c
        }
    }
}

impl ActionExecutor for ShellExecutor {
    async fn run(&self, command: &str) {
        match Self::command(command).status().await {
            Ok(status) => debug!(cmd = %command, exit_code = ?status.code(), "action exited"),
            Err(e) => debug!(cmd = %command, error = %e, "action could not be started"),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records commands instead of running them.
    #[derive(Debug, Default, Clone)]
    pub(crate) struct RecordingExecutor {
        pub(crate) commands: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingExecutor {
        pub(crate) fn taken(&self) -> Vec<String> {
            self.commands.lock().unwrap().clone()
        }
    }

    impl ActionExecutor for RecordingExecutor {
        async fn run(&self, command: &str) {
            self.commands.lock().unwrap().push(command.to_string());
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn shell_executor_runs_command_through_shell() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("ran");
        let command = format!("echo hit > '{}'", marker.display());

        ShellExecutor.run(&command).await;

        assert_eq!(std::fs::read_to_string(&marker).unwrap().trim(), "hit");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn shell_executor_ignores_failing_commands() {
        ShellExecutor.run("exit 3").await;
        ShellExecutor.run("definitely-not-a-real-command-xyz").await;
    }
}
