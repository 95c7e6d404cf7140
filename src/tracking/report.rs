//! Per-day views over the day masks. Nothing here changes the store.

use std::{collections::BTreeMap, fmt::Display};

use chrono::{NaiveDate, TimeDelta, Timelike};

use crate::{
    project::{entities::Project, store::ProjectStore},
    utils::time::date_to_mask_key,
};

use super::{
    mask::{slot_start, DayMask},
    settings::TrackerSettings,
};

/// Minutes recorded for `project` on `date`. 0 when there is no mask for that day.
pub fn minutes_on(project: &Project, date: NaiveDate, settings: &TrackerSettings) -> u64 {
    project
        .daily_masks
        .get(&date_to_mask_key(date))
        .map_or(0, |mask| {
            DayMask::parse(mask, settings.time_tracking.total_daily_slots)
                .minutes(settings.time_tracking.interval_minutes)
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevel {
    Idle,
    Low,
    Medium,
    High,
}

impl ActivityLevel {
    pub fn from_minutes(minutes: u64) -> Self {
        match minutes {
            0 => ActivityLevel::Idle,
            1..=15 => ActivityLevel::Low,
            16..=45 => ActivityLevel::Medium,
            _ => ActivityLevel::High,
        }
    }
}

impl Display for ActivityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityLevel::Idle => write!(f, "idle"),
            ActivityLevel::Low => write!(f, "low"),
            ActivityLevel::Medium => write!(f, "medium"),
            ActivityLevel::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMinutes {
    pub path: String,
    pub title: String,
    pub minutes: u64,
}

/// One hour of a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourSummary {
    pub hour: u32,
    /// Sum over every project, can exceed 60 if masks of several projects overlap.
    pub minutes: u64,
    pub level: ActivityLevel,
    /// Most active first.
    pub projects: Vec<ProjectMinutes>,
}

/// Buckets the masks of `date` into hours. Every hour of the work day gets a row, hours
/// outside of it only appear when a longer mask has slots there.
pub fn hourly_timeline(
    store: &ProjectStore,
    date: NaiveDate,
    settings: &TrackerSettings,
) -> Vec<HourSummary> {
    let key = date_to_mask_key(date);
    let interval = settings.time_tracking.interval_minutes as u64;
    let work_hours = &settings.work_hours;
    let last_hour = (work_hours.end - TimeDelta::minutes(1)).hour();

    let mut hours = (work_hours.start.hour()..=last_hour)
        .map(|hour| (hour, Vec::new()))
        .collect::<BTreeMap<u32, Vec<ProjectMinutes>>>();

    for project in store.projects() {
        let Some(mask) = project.daily_masks.get(&key) else {
            continue;
        };
        let mask = DayMask::parse(mask, settings.time_tracking.total_daily_slots);

        let mut per_hour = BTreeMap::<u32, u64>::new();
        for slot in (0..mask.slot_count()).filter(|v| mask.is_set(*v)) {
            if let Some(start) = slot_start(slot, settings) {
                *per_hour.entry(start.hour()).or_default() += interval;
            }
        }
        for (hour, minutes) in per_hour {
            hours.entry(hour).or_default().push(ProjectMinutes {
                path: project.path.clone(),
                title: project.title.clone(),
                minutes,
            });
        }
    }

    hours
        .into_iter()
        .map(|(hour, mut projects)| {
            projects.sort_by(|a, b| b.minutes.cmp(&a.minutes).then_with(|| a.path.cmp(&b.path)));
            let minutes = projects.iter().map(|v| v.minutes).sum::<u64>();
            HourSummary {
                hour,
                minutes,
                level: ActivityLevel::from_minutes(minutes),
                projects,
            }
        })
        .collect()
}
