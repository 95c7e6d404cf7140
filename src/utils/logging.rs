use std::{path::Path, sync::LazyLock};

use anyhow::{anyhow, Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    EnvFilter,
};

pub const CLI_PREFIX: &str = "cli";
pub const TRACKER_PREFIX: &str = "tracker";

/// The tracker runs every few minutes, a few days of logs are plenty.
const MAX_LOG_FILES: usize = 5;
const DEFAULT_LEVEL: &str = "info";

/// Filter directive limited to this crate. An explicit level wins over `RUST_LOG`.
fn crate_filter(log_level: Option<LevelFilter>) -> String {
    let level = log_level
        .map(|v| v.to_string())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LEVEL.into());
    format!("{}={level}", env!("CARGO_PKG_NAME").replace('-', "_"))
}

/// Logs into daily rotated `<prefix>.<date>` files under `log_dir`, the cli and the tracker
/// share the directory. `show_std` mirrors everything to stdout.
pub fn enable_logging(
    prefix: &str,
    log_dir: &Path,
    log_level: Option<LevelFilter>,
    show_std: bool,
) -> Result<()> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {log_dir:?}"))?;
    let appender = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(MAX_LOG_FILES)
        .filename_prefix(prefix)
        .build(log_dir)?;

    let stdout = std::io::stdout.with_filter(move |_| show_std);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(crate_filter(log_level)))
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(stdout.and(appender))
        .pretty()
        .try_init()
        .map_err(|e| anyhow!("Failed to set up logging: {e}"))
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .init()
});
