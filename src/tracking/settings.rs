use chrono::NaiveTime;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{Map, Value};
use tracing::warn;

const DEFAULT_WORK_START: NaiveTime = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
const DEFAULT_WORK_END: NaiveTime = NaiveTime::from_hms_opt(20, 0, 0).unwrap();

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorkHours {
    #[serde(with = "hours_minutes")]
    pub start: NaiveTime,
    #[serde(with = "hours_minutes")]
    pub end: NaiveTime,
}

impl Default for WorkHours {
    fn default() -> Self {
        Self {
            start: DEFAULT_WORK_START,
            end: DEFAULT_WORK_END,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimeTracking {
    pub interval_minutes: u32,
    pub total_daily_slots: usize,
}

impl Default for TimeTracking {
    fn default() -> Self {
        Self {
            interval_minutes: 5,
            total_daily_slots: 144,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ActivityMonitoring {
    pub idle_threshold_seconds: u64,
}

impl Default for ActivityMonitoring {
    fn default() -> Self {
        Self {
            idle_threshold_seconds: 300,
        }
    }
}

/// Tracker configuration. Lives in the `meta` object of the database file, next to data the
/// tracker doesn't care about.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackerSettings {
    pub work_hours: WorkHours,
    pub time_tracking: TimeTracking,
    pub activity_monitoring: ActivityMonitoring,
}

impl TrackerSettings {
    /// Reads every section separately, a missing or broken section falls back to its defaults.
    pub fn from_meta(meta: &Map<String, Value>) -> Self {
        let mut settings = Self {
            work_hours: section(meta, "work_hours"),
            time_tracking: section(meta, "time_tracking"),
            activity_monitoring: section(meta, "activity_monitoring"),
        };
        if settings.time_tracking.interval_minutes == 0
            || settings.time_tracking.total_daily_slots == 0
        {
            warn!("Ignoring empty time tracking slots {:?}", settings.time_tracking);
            settings.time_tracking = TimeTracking::default();
        }
        if settings.work_hours.start >= settings.work_hours.end {
            warn!("Ignoring inverted work hours {:?}", settings.work_hours);
            settings.work_hours = WorkHours::default();
        }
        settings
    }
}

fn section<T: DeserializeOwned + Default>(meta: &Map<String, Value>, key: &str) -> T {
    match meta.get(key) {
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            warn!("Malformed {key} settings, using defaults: {e}");
            T::default()
        }),
        None => T::default(),
    }
}

mod hours_minutes {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer};

    const FORMAT: &str = "%H:%M";

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
