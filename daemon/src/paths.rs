/// Canonical file paths for catcher data files.
///
/// Everything lives under ~/.catcher/ unless `CATCHER_HOME` points elsewhere:
///   - config.json  Written by the user, polled by the daemon.
///   - daemon.pid   Written by the daemon that currently owns the machine.
use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR_NAME: &str = ".catcher";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const PID_FILE_NAME: &str = "daemon.pid";
pub const PROFILE_FILE_NAME: &str = ".bash_profile";

/// Overrides the data directory.
pub const HOME_ENV: &str = "CATCHER_HOME";
/// Overrides the shell profile used by `install` / `uninstall`.
pub const PROFILE_ENV: &str = "CATCHER_PROFILE";

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Could not determine the user's home directory")
}

/// Returns the catcher data directory: $CATCHER_HOME or ~/.catcher/
pub fn app_data_dir() -> Result<PathBuf> {
    match std::env::var_os(HOME_ENV) {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => Ok(home_dir()?.join(APP_DIR_NAME)),
    }
}

/// Returns the full path to the config file: ~/.catcher/config.json
pub fn config_file_path() -> Result<PathBuf> {
    Ok(app_data_dir()?.join(CONFIG_FILE_NAME))
}

/// Returns the full path to the instance record: ~/.catcher/daemon.pid
pub fn pid_file_path() -> Result<PathBuf> {
    Ok(app_data_dir()?.join(PID_FILE_NAME))
}

/// Returns the shell profile the launch line is installed into:
/// $CATCHER_PROFILE or ~/.bash_profile
pub fn profile_file_path() -> Result<PathBuf> {
    match std::env::var_os(PROFILE_ENV) {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => Ok(home_dir()?.join(PROFILE_FILE_NAME)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_path_has_correct_name() {
        let path = config_file_path().unwrap();
        assert_eq!(path.file_name().unwrap(), CONFIG_FILE_NAME);
    }

    #[test]
    fn pid_file_path_has_correct_name() {
        let path = pid_file_path().unwrap();
        assert_eq!(path.file_name().unwrap(), PID_FILE_NAME);
    }

    #[test]
    fn config_and_pid_share_same_parent_dir() {
        let config = config_file_path().unwrap();
        let pid = pid_file_path().unwrap();
        assert_eq!(config.parent(), pid.parent());
        assert_eq!(config.parent().unwrap(), app_data_dir().unwrap());
    }
}
