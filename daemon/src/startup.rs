/// Shell-profile registration.
///
/// `install` appends a line that backgrounds the daemon to the user's shell
/// profile, so every new login shell tries to start it. The instance lock
/// makes all but the first of those launches exit straight away.
///
/// `uninstall` removes that line again.
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Builds the profile line that launches `exe` in the background.
pub fn launch_line(exe: &Path) -> String {
    format!("\"{}\" &", exe.display())
}

/// Appends `line` to `profile`, creating the file if needed.
/// Idempotent: returns `false` without touching the file if the line is
/// already present.
pub fn install(profile: &Path, line: &str) -> Result<bool> {
    let existing = read_profile(profile)?;
    if existing.lines().any(|l| l.trim() == line) {
        return Ok(false);
    }

    let mut content = existing;
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(line);
    content.push('\n');

    std::fs::write(profile, content)
        .with_context(|| format!("Failed to write profile {}", profile.display()))?;
    Ok(true)
}

/// Removes every occurrence of `line` from `profile`, leaving the other lines
/// byte-for-byte intact (terminators included).
/// Succeeds silently (returning `false`) if the file or the line is absent.
pub fn uninstall(profile: &Path, line: &str) -> Result<bool> {
    if !profile.exists() {
        return Ok(false);
    }
    let existing = read_profile(profile)?;
    let content: String = existing
        .split_inclusive('\n')
        .filter(|l| l.trim() != line)
        .collect();
    if content.len() == existing.len() {
        return Ok(false);
    }

    std::fs::write(profile, content)
        .with_context(|| format!("Failed to write profile {}", profile.display()))?;
    Ok(true)
}

/// Registers the running binary in `profile`.
pub fn register_startup(profile: &Path) -> Result<()> {
    let line = launch_line(&current_exe()?);
    if install(profile, &line)? {
        info!("Added to {}: {line}", profile.display());
    } else {
        info!("Already present in {}", profile.display());
    }
    Ok(())
}

/// Removes the running binary from `profile`.
pub fn unregister_startup(profile: &Path) -> Result<()> {
    let line = launch_line(&current_exe()?);
    if uninstall(profile, &line)? {
        info!("Removed from {}", profile.display());
    } else {
        info!("Not present in {}", profile.display());
    }
    Ok(())
}

fn current_exe() -> Result<std::path::PathBuf> {
    std::env::current_exe().context("Failed to locate daemon executable")
}

fn read_profile(profile: &Path) -> Result<String> {
    match std::fs::read_to_string(profile) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e).with_context(|| format!("Failed to read profile {}", profile.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "\"/opt/bin/catcher-daemon\" &";

    #[test]
    fn launch_line_quotes_the_path_and_backgrounds() {
        let line = launch_line(Path::new("/home/me/my tools/catcher-daemon"));
        assert_eq!(line, "\"/home/me/my tools/catcher-daemon\" &");
    }

    // ── install ───────────────────────────────────────────────────────────────

    #[test]
    fn install_creates_missing_profile() {
        let dir = tempfile::tempdir().unwrap();
        let profile = dir.path().join(".bash_profile");

        assert!(install(&profile, LINE).unwrap());
        assert_eq!(std::fs::read_to_string(&profile).unwrap(), format!("{LINE}\n"));
    }

    #[test]
    fn install_appends_after_existing_content_without_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let profile = dir.path().join(".bash_profile");
        std::fs::write(&profile, "export PATH=$PATH:~/bin").unwrap();

        install(&profile, LINE).unwrap();
        assert_eq!(
            std::fs::read_to_string(&profile).unwrap(),
            format!("export PATH=$PATH:~/bin\n{LINE}\n")
        );
    }

    #[test]
    fn install_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let profile = dir.path().join(".bash_profile");

        assert!(install(&profile, LINE).unwrap());
        assert!(!install(&profile, LINE).unwrap());
        assert_eq!(std::fs::read_to_string(&profile).unwrap().matches(LINE).count(), 1);
    }

    // ── uninstall ─────────────────────────────────────────────────────────────

    #[test]
    fn uninstall_removes_only_the_launch_line() {
        let dir = tempfile::tempdir().unwrap();
        let profile = dir.path().join(".bash_profile");
        std::fs::write(&profile, format!("alias ll='ls -l'\n{LINE}\nexport EDITOR=vim\n")).unwrap();

        assert!(uninstall(&profile, LINE).unwrap());
        assert_eq!(
            std::fs::read_to_string(&profile).unwrap(),
            "alias ll='ls -l'\nexport EDITOR=vim\n"
        );
    }

    #[test]
    fn uninstall_keeps_crlf_terminators() {
        let dir = tempfile::tempdir().unwrap();
        let profile = dir.path().join(".bash_profile");
        std::fs::write(&profile, format!("alias ll='ls -l'\r\n{LINE}\r\nexport EDITOR=vim\r\n"))
            .unwrap();

        assert!(uninstall(&profile, LINE).unwrap());
        assert_eq!(
            std::fs::read_to_string(&profile).unwrap(),
            "alias ll='ls -l'\r\nexport EDITOR=vim\r\n"
        );
    }

    #[test]
    fn uninstall_keeps_missing_final_newline() {
        let dir = tempfile::tempdir().unwrap();
        let profile = dir.path().join(".bash_profile");
        std::fs::write(&profile, format!("{LINE}\nexport EDITOR=vim")).unwrap();

        assert!(uninstall(&profile, LINE).unwrap());
        assert_eq!(std::fs::read_to_string(&profile).unwrap(), "export EDITOR=vim");
    }

    #[test]
    fn uninstall_missing_profile_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let profile = dir.path().join(".bash_profile");

        assert!(!uninstall(&profile, LINE).unwrap());
        assert!(!profile.exists());
    }

    #[test]
    fn uninstall_without_line_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let profile = dir.path().join(".bash_profile");
        std::fs::write(&profile, "alias ll='ls -l'").unwrap();

        assert!(!uninstall(&profile, LINE).unwrap());
        assert_eq!(std::fs::read_to_string(&profile).unwrap(), "alias ll='ls -l'");
    }

    #[test]
    fn install_then_uninstall_restores_profile() {
        let dir = tempfile::tempdir().unwrap();
        let profile = dir.path().join(".bash_profile");
        std::fs::write(&profile, "alias ll='ls -l'\n").unwrap();

        install(&profile, LINE).unwrap();
        uninstall(&profile, LINE).unwrap();
        assert_eq!(std::fs::read_to_string(&profile).unwrap(), "alias ll='ls -l'\n");
    }
}
