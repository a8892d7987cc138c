/// Single-instance coordination via a persisted PID record.
///
/// The record is never removed on exit. A leftover file is harmless because
/// the next launch re-checks whether the recorded process is still alive
/// instead of trusting the file.
///
/// Known limitations:
///   - A recycled PID that now belongs to an unrelated live process reads as
///     "already running". A record holding the caller's own PID is the one
///     recycled case that is recognised, and is taken over.
///   - The read/check/write sequence is not atomic across processes, so two
///     launches racing within the same instant can both acquire.
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use sysinfo::{Pid, ProcessesToUpdate, System};
use tracing::{debug, warn};

/// Outcome of [`InstanceLock::acquire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquisition {
    /// No live instance was recorded; the record now holds our PID.
    Acquired,
    /// The recorded process is alive. The record was left untouched.
    AlreadyRunning(u32),
}

pub struct InstanceLock {
    path: PathBuf,
}

impl InstanceLock {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Claims the record for the current process unless a live instance owns it.
    pub fn acquire(&self) -> Result<Acquisition> {
        self.acquire_as(std::process::id(), process_exists)
    }

    /// Same as [`acquire`](Self::acquire) with the caller's PID and the
    /// liveness check supplied explicitly.
    pub fn acquire_as(
        &self,
        own_pid: u32,
        is_alive: impl Fn(u32) -> bool,
    ) -> Result<Acquisition> {
        if let Some(pid) = self.recorded_pid()? {
            // Our own PID can only be a leftover from an earlier boot.
            if pid != own_pid && is_alive(pid) {
                return Ok(Acquisition::AlreadyRunning(pid));
            }
            debug!(pid, "Instance record is stale; taking over");
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        std::fs::write(&self.path, own_pid.to_string())
            .with_context(|| format!("Failed to write instance record {}", self.path.display()))?;
        Ok(Acquisition::Acquired)
    }

    /// Reads the PID stored in the record. A missing file is `None`; so is a
    /// file whose contents are not a PID, since it cannot name a live owner.
    pub fn recorded_pid(&self) -> Result<Option<u32>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read instance record {}", self.path.display())
                })
            }
        };

        match content.trim().parse::<u32>() {
            Ok(pid) => Ok(Some(pid)),
            Err(_) => {
                warn!(
                    path = %self.path.display(),
                    "Instance record is not a PID; treating it as stale"
                );
                Ok(None)
            }
        }
    }
}

/// Returns true if a process with `pid` is currently in the process table.
pub fn process_exists(pid: u32) -> bool {
    let pid = Pid::from_u32(pid);
    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    sys.process(pid).is_some()
}
