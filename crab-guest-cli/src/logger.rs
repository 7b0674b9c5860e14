//! Logging setup
//!
//! Console output goes to stderr so command output on stdout stays
//! machine-readable. With a log directory, library events are also written
//! as JSON to a daily rotating file.

use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging
///
/// # Arguments
/// * `level` - Default filter when `RUST_LOG` is unset (e.g., "info", "crab_guest=debug")
/// * `json_format` - JSON console output instead of the human-readable format
/// * `log_dir` - Optional directory for the rolling `crab-guest.YYYY-MM-DD` files
pub fn init_logger(level: &str, json_format: bool, log_dir: Option<&Path>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let file_layer = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, "crab-guest");
            let layer = fmt::layer()
                .json()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(appender))
                // Only the session core, not HTTP client internals
                .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                    let target = meta.target();
                    target.starts_with("crab_guest") || target.starts_with("shared")
                }));
            Some(layer)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}
