//! Process-wide `tracing` subscriber setup.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_DIRECTIVE: &str = "info";

/// Installs a formatted subscriber filtered by `RUST_LOG`, then `LOG_LEVEL`.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let directive = log_directive(|key| std::env::var(key).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

pub fn log_directive<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    non_blank("RUST_LOG")
        .or_else(|| non_blank("LOG_LEVEL").map(|level| level.trim().to_ascii_lowercase()))
        .unwrap_or_else(|| DEFAULT_LOG_DIRECTIVE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_wins_over_log_level() {
        let directive = log_directive(|key| match key {
            "RUST_LOG" => Some("swengine=debug".to_string()),
            "LOG_LEVEL" => Some("WARN".to_string()),
            _ => None,
        });
        assert_eq!(directive, "swengine=debug");
    }

    #[test]
    fn log_level_is_lowercased() {
        let directive = log_directive(|key| (key == "LOG_LEVEL").then(|| " DEBUG ".to_string()));
        assert_eq!(directive, "debug");
    }

    #[test]
    fn blank_values_fall_back_to_info() {
        let directive = log_directive(|_| Some("  ".to_string()));
        assert_eq!(directive, DEFAULT_LOG_DIRECTIVE);
    }
}
