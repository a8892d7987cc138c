/// Global `tracing` subscriber.
///
/// The level comes from `CATCHER_LOG` ("info", "debug", or 1-5) and defaults
/// to `info`. Output goes to stdout, where the user-facing diagnostics belong.
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::fmt;

pub const LOG_ENV: &str = "CATCHER_LOG";

/// Installs the global subscriber. Call once, at startup.
pub fn init_logging() {
    let level = level_from(std::env::var(LOG_ENV).ok().as_deref());

    fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .init();
}

/// Unset or unrecognised values fall back to `info`.
fn level_from(value: Option<&str>) -> Level {
    value
        .and_then(|s| Level::from_str(s.trim()).ok())
        .unwrap_or(Level::INFO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!(level_from(Some("DEBUG")), Level::DEBUG);
        assert_eq!(level_from(Some(" warn ")), Level::WARN);
        assert_eq!(level_from(Some("trace")), Level::TRACE);
    }

    #[test]
    fn parses_numeric_verbosity() {
        assert_eq!(level_from(Some("1")), Level::ERROR);
        assert_eq!(level_from(Some("5")), Level::TRACE);
    }

    #[test]
    fn unset_or_unknown_defaults_to_info() {
        assert_eq!(level_from(None), Level::INFO);
        assert_eq!(level_from(Some("loud")), Level::INFO);
        assert_eq!(level_from(Some("")), Level::INFO);
    }
}
