//! Logging setup
//!
//! The filter comes from `MANARA_LOG`, then `RUST_LOG`, then the command's
//! default level. Logs go to stderr, or are appended to `log_file` when one
//! is configured.

use std::fs::OpenOptions;

use manara_core::Config;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "MANARA_LOG";

/// Install the global subscriber
pub fn init(config: &Config, default_level: &str) {
    let filter = filter_directive(
        std::env::var(LOG_ENV).ok(),
        std::env::var("RUST_LOG").ok(),
        default_level,
    );
    let env_filter = EnvFilter::try_new(&filter).unwrap_or_else(|e| {
        eprintln!("Warning: Invalid log filter {:?}: {}", filter, e);
        EnvFilter::new(default_level)
    });

    if let Some(ref log_path) = config.log_file {
        match OpenOptions::new().create(true).append(true).open(log_path) {
            Ok(file) => {
                // Ignore error if already initialized
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(env_filter)
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(file)
                    .try_init();
                return;
            }
            Err(e) => {
                eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            }
        }
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Pick the first non-empty filter
fn filter_directive(manara: Option<String>, rust: Option<String>, default_level: &str) -> String {
    [manara, rust]
        .into_iter()
        .flatten()
        .find(|f| !f.trim().is_empty())
        .unwrap_or_else(|| default_level.to_string())
}
