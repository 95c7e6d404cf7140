use std::time::Duration;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::{
    project::{aggregate::refresh_after_change, entities::Project, store::ProjectStore},
    utils::time::date_to_mask_key,
};

use super::{
    mask::{slot_for, DayMask},
    settings::TrackerSettings,
};

/// What a single tracker tick did. Only [TickOutcome::Recorded] changes the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    OutsideWorkHours,
    Idle {
        idle: Duration,
    },
    NoActiveProject,
    AlreadyRecorded {
        path: String,
        slot: usize,
    },
    Recorded {
        path: String,
        slot: usize,
        own_minutes: u64,
        /// Paths whose aggregate got refreshed, nearest first.
        updated: Vec<String>,
    },
}

impl TickOutcome {
    pub fn changed_store(&self) -> bool {
        matches!(self, TickOutcome::Recorded { .. })
    }
}

/// Attributes the slot containing `now` to the active project. Own minutes of the project are
/// recounted from all of its masks, then aggregates up the tree are refreshed.
pub fn track_tick(
    store: &mut ProjectStore,
    now: NaiveDateTime,
    settings: &TrackerSettings,
    idle: Duration,
) -> TickOutcome {
    let Some(slot) = slot_for(now.time(), settings) else {
        debug!("{now} is outside of work hours");
        return TickOutcome::OutsideWorkHours;
    };

    let idle_threshold = Duration::from_secs(settings.activity_monitoring.idle_threshold_seconds);
    if idle >= idle_threshold {
        debug!("User is idle for {idle:?}");
        return TickOutcome::Idle { idle };
    }

    let Some(path) = store.active().map(|v| v.path.clone()) else {
        return TickOutcome::NoActiveProject;
    };

    let own_minutes = match store.find_by_path_mut(&path) {
        Some(project) => match record_slot(project, now, slot, settings) {
            Some(own_minutes) => own_minutes,
            None => return TickOutcome::AlreadyRecorded { path, slot },
        },
        None => return TickOutcome::NoActiveProject,
    };

    let updated = refresh_after_change(&path, store);
    info!("Recorded slot {slot} for {path}, own minutes {own_minutes}");
    TickOutcome::Recorded {
        path,
        slot,
        own_minutes,
        updated,
    }
}

/// Sets the slot in today's mask. Returns the recounted own minutes, or None when the slot was
/// already set.
fn record_slot(
    project: &mut Project,
    now: NaiveDateTime,
    slot: usize,
    settings: &TrackerSettings,
) -> Option<u64> {
    let slot_count = settings.time_tracking.total_daily_slots;
    let interval = settings.time_tracking.interval_minutes;

    let key = date_to_mask_key(now.date());
    let mut mask = project
        .daily_masks
        .get(&key)
        .map_or_else(|| DayMask::empty(slot_count), |v| DayMask::parse(v, slot_count));
    if !mask.set(slot) {
        return None;
    }
    project.daily_masks.insert(key, mask.to_string());

    project.own_minutes = project
        .daily_masks
        .values()
        .map(|v| DayMask::parse(v, slot_count).minutes(interval))
        .sum();
    Some(project.own_minutes)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    use crate::{
        project::{
            aggregate::{compute_aggregated, recompute_all},
            entities::ProjectStatus,
            store::{tests::exlibrus_store, ProjectStore},
        },
        tracking::settings::TrackerSettings,
    };

    use super::{track_tick, TickOutcome};

    const TEST_DATE: NaiveDate = NaiveDate::from_ymd_opt(2025, 6, 7).unwrap();

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDateTime::new(TEST_DATE, NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
    }

    /// exlibrus store where frontend is active and its minutes come from masks.
    fn tracked_store() -> ProjectStore {
        let mut store = exlibrus_store();
        if let Some(frontend) = store.find_by_path_mut("exlibrus/frontend") {
            frontend.status = ProjectStatus::Active;
            frontend
                .daily_masks
                .insert("2025-06-06".into(), "1".repeat(24));
        }
        recompute_all(&mut store);
        store
    }

    #[test]
    fn test_records_slot_and_refreshes_ancestors() {
        let mut store = tracked_store();
        let outcome = track_tick(
            &mut store,
            at(8, 12),
            &TrackerSettings::default(),
            Duration::ZERO,
        );

        assert_eq!(
            outcome,
            TickOutcome::Recorded {
                path: "exlibrus/frontend".into(),
                slot: 2,
                own_minutes: 125,
                updated: vec!["exlibrus/frontend".into(), "exlibrus".into()],
            }
        );
        let frontend = store.find_by_path("exlibrus/frontend").unwrap();
        assert_eq!(frontend.daily_masks["2025-06-07"].len(), 144);
        assert!(frontend.daily_masks["2025-06-07"].starts_with("001"));
        assert_eq!(frontend.aggregated_minutes, 185);
        assert_eq!(
            store.find_by_path("exlibrus").map(|v| v.aggregated_minutes),
            Some(compute_aggregated("exlibrus", &store))
        );
        assert_eq!(
            store.find_by_path("exlibrus").map(|v| v.aggregated_minutes),
            Some(235)
        );
    }

    #[test]
    fn test_same_slot_twice() {
        let mut store = tracked_store();
        let settings = TrackerSettings::default();
        assert!(track_tick(&mut store, at(9, 0), &settings, Duration::ZERO).changed_store());

        let before = store.clone();
        let outcome = track_tick(&mut store, at(9, 3), &settings, Duration::ZERO);
        assert_eq!(
            outcome,
            TickOutcome::AlreadyRecorded {
                path: "exlibrus/frontend".into(),
                slot: 12
            }
        );
        assert_eq!(store, before);
    }

    #[test]
    fn test_skips() {
        let settings = TrackerSettings::default();

        let mut store = tracked_store();
        assert_eq!(
            track_tick(&mut store, at(21, 0), &settings, Duration::ZERO),
            TickOutcome::OutsideWorkHours
        );
        assert_eq!(
            track_tick(&mut store, at(10, 0), &settings, Duration::from_secs(300)),
            TickOutcome::Idle {
                idle: Duration::from_secs(300)
            }
        );
        assert_eq!(store, tracked_store());

        let mut store = exlibrus_store();
        assert_eq!(
            track_tick(&mut store, at(10, 0), &settings, Duration::ZERO),
            TickOutcome::NoActiveProject
        );
    }
}
