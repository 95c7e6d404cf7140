//! Slot based time tracking. An external scheduler runs a tick every few minutes, each tick
//! marks the current slot of the active project and refreshes aggregates up the tree.

use std::time::Duration;

use anyhow::Result;
use tracing::{error, info, instrument};

use crate::{activity::IdleDetector, storage::Database, utils::clock::Clock};

pub mod mask;
pub mod report;
pub mod settings;
pub mod tick;

use settings::TrackerSettings;
use tick::{track_tick, TickOutcome};

/// Loads the database, runs a single tick and saves the result if anything was recorded.
#[instrument(skip_all)]
pub async fn run_tick(
    database: &Database,
    clock: &dyn Clock,
    idle_detector: &mut dyn IdleDetector,
) -> Result<TickOutcome> {
    let mut snapshot = database.load().await?;
    let settings = TrackerSettings::from_meta(&snapshot.meta);

    // A broken detector shouldn't stop tracking, the user is treated as active.
    let idle = idle_detector
        .idle_time()
        .inspect_err(|e| error!("Failed to get idle time {e:?}"))
        .unwrap_or(Duration::ZERO);

    let now = clock.now().naive_local();
    let outcome = track_tick(&mut snapshot.store, now, &settings, idle);
    if outcome.changed_store() {
        database.save(&snapshot).await?;
    }
    info!("Tick finished {outcome:?}");
    Ok(outcome)
}
