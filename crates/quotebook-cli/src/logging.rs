//! Logging setup
//!
//! Level comes from QUOTEBOOK_LOG (default `warn`). Output goes to the
//! configured log file, or stderr when none is set.

use std::fs::OpenOptions;

use quotebook_core::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log level or filter directives
const LOG_ENV: &str = "QUOTEBOOK_LOG";

/// Default level when QUOTEBOOK_LOG is unset
const DEFAULT_LEVEL: &str = "warn";

/// Initialize the global tracing subscriber
pub fn init_logging(config: &Config) {
    let level = std::env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_LEVEL.to_string());
    let env_filter = build_filter(&level);

    let Some(ref log_path) = config.log_file else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
        return;
    };

    let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            return;
        }
    };

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("Logging initialized to {:?}", log_path);
}

/// A bare level applies to both crates; anything else is used as directives
fn build_filter(level: &str) -> EnvFilter {
    let is_bare_level = matches!(
        level.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error" | "off"
    );
    if is_bare_level {
        EnvFilter::new(format!(
            "quotebook_core={},quotebook_cli={}",
            level, level
        ))
    } else {
        EnvFilter::new(level)
    }
}
