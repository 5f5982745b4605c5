use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::Error;

/// Env var holding the log filter, e.g. `QUIZ_LOG=timed_quiz=debug`.
pub const LOG_ENV: &str = "QUIZ_LOG";

/// Sends `tracing` output to `log_file`.
///
/// The terminal is owned by the UI while the quiz runs, so nothing is logged
/// to stdout or stderr.
pub fn init(log_file: &Path) -> Result<(), Error> {
    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .with(filter)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}
