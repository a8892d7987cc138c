use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use tracing::info;

/// Reasons the rule set cannot be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file is missing, unreadable, or its modification time cannot be read.
    #[error("config file {} is unavailable: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON for the expected shape.
    #[error("config file {} is malformed: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One text fragment to look for and the shell command to run when it shows up.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PatternRule {
    pub pattern: String,
    pub action: String,
}

impl PatternRule {
    /// Literal substring test; an empty pattern matches every line.
    pub fn matches(&self, line: &str) -> bool {
        line.contains(self.pattern.as_str())
    }
}

/// On-disk shape of config.json.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    errors: Vec<PatternRule>,
}

/// Immutable rule set plus the file's modification time when it was read.
#[derive(Debug, Clone)]
pub struct ConfigSnapshot {
    rules: Vec<PatternRule>,
    modified: SystemTime,
}

impl ConfigSnapshot {
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    /// Rules whose pattern occurs in `line`, in configuration order.
    pub fn matching<'a>(&'a self, line: &'a str) -> impl Iterator<Item = &'a PatternRule> + 'a {
        self.rules.iter().filter(move |rule| rule.matches(line))
    }
}

/// Reads the rule set from a single JSON file and detects on-disk changes by
/// polling its modification time.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the file. Missing or malformed files are errors, never
    /// an empty rule set.
    pub fn load(&self) -> Result<ConfigSnapshot, ConfigError> {
        // Stat before reading: a write landing in between leaves an older
        // timestamp behind, which only causes one extra reload.
        let modified = self.modified()?;
        let content = std::fs::read_to_string(&self.path).map_err(|source| {
            ConfigError::Unavailable {
                path: self.path.clone(),
                source,
            }
        })?;
        let file: ConfigFile =
            serde_json::from_str(&content).map_err(|source| ConfigError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        Ok(ConfigSnapshot {
            rules: file.errors,
            modified,
        })
    }

    /// Returns a fresh snapshot if the file's modification time differs from
    /// `current`'s, otherwise `None`. The unchanged case costs one stat.
    pub fn refresh_if_stale(
        &self,
        current: &ConfigSnapshot,
    ) -> Result<Option<ConfigSnapshot>, ConfigError> {
        if self.modified()? == current.modified {
            return Ok(None);
        }
        info!("Config updated, reloading...");
        self.load().map(Some)
    }

    fn modified(&self) -> Result<SystemTime, ConfigError> {
        std::fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .map_err(|source| ConfigError::Unavailable {
                path: self.path.clone(),
                source,
            })
    }
}
