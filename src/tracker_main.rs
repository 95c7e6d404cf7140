// Runs without a console on Windows, so a scheduled tick doesn't flash a window. Disable during
// development to see stdout.
#![windows_subsystem = "windows"]

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use timetree::{
    activity::GenericIdleDetector,
    storage::Database,
    tracking::run_tick,
    utils::{
        clock::DefaultClock,
        dir::{create_application_default_path, default_database_path},
        logging::{enable_logging, TRACKER_PREFIX},
        runtime::single_thread_runtime,
    },
};
use tracing::{error, level_filters::LevelFilter};

/// Records a single tracking slot. Meant to be started by cron or Task Scheduler every few
/// minutes.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct TrackerArgs {
    #[arg(long, help = "Database file. Same default as the cli")]
    db: Option<PathBuf>,
    #[arg(long, help = "Also print logs to stdout")]
    log_console: bool,
    #[arg(long, help = "Log level. By default RUST_LOG or info")]
    log_filter: Option<LevelFilter>,
}

fn main() -> Result<()> {
    let args = TrackerArgs::parse();

    enable_logging(
        TRACKER_PREFIX,
        &create_application_default_path()?.join("logs"),
        args.log_filter,
        args.log_console,
    )?;

    let database = Database::new(args.db.map_or_else(default_database_path, Ok)?);
    single_thread_runtime()?
        .block_on(async {
            run_tick(&database, &DefaultClock, &mut GenericIdleDetector::new()).await
        })
        .inspect_err(|e| error!("Tick failed {e:?}"))?;
    Ok(())
}
