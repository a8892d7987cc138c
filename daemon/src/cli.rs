use clap::{Parser, Subcommand};

/// Watches terminal output and runs a shell action when a configured pattern appears.
///
/// Without a sub-command the daemon reads lines from stdin until interrupted.
/// Only one watcher runs per machine; later launches exit immediately.
#[derive(Debug, Parser)]
#[command(name = "catcher-daemon", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Add the daemon's launch line to the shell profile.
    Install,
    /// Remove the daemon's launch line from the shell profile.
    Uninstall,
}

pub fn parse() -> Cli {
    Cli::parse()
}
