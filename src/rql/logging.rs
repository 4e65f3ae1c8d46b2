//! Structured logging
//!
//! Logs go to stderr so that formatted output on stdout stays clean. The filter comes from
//! the configured level unless `RQL_LOG` is set, in which case its value is used as an
//! `EnvFilter` directive string (e.g. `rql=trace`).

use tracing_subscriber::EnvFilter;

use crate::rql::config::LogLevel;

/// Environment variable overriding the configured level
pub const LOG_ENV: &str = "RQL_LOG";

fn filter_for(level: LogLevel, env: Option<&str>) -> EnvFilter {
    match env {
        Some(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::new(level.as_str()),
    }
}

/// Install the global subscriber.
///
/// If a global subscriber is already set, the error is ignored; the first subscriber wins.
pub fn init_logging(level: LogLevel) {
    let env = std::env::var(LOG_ENV).ok();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter_for(level, env.as_deref()))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
