use std::{collections::BTreeMap, fmt::Display};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    #[default]
    Paused,
    Completed,
    Archived,
}

impl Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStatus::Active => write!(f, "active"),
            ProjectStatus::Paused => write!(f, "paused"),
            ProjectStatus::Completed => write!(f, "completed"),
            ProjectStatus::Archived => write!(f, "archived"),
        }
    }
}

/// Per-day slot masks keyed by `YYYY-MM-DD`. Owned by the tracker, aggregation doesn't look at
/// them.
pub type DailyMasks = BTreeMap<String, String>;

/// A node of the project hierarchy in its normalized form. Every project in a
/// [ProjectStore](super::store::ProjectStore) has all of its identity fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub path: String,
    pub title: String,
    #[serde(default)]
    pub status: ProjectStatus,
    /// Minutes tracked on this project itself, children excluded.
    #[serde(rename = "total_minutes", default)]
    pub own_minutes: u64,
    /// Cached `own_minutes` + aggregated minutes of direct children.
    pub aggregated_minutes: u64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub daily_masks: DailyMasks,
    /// Fields the core doesn't know about (colors, descriptions). Kept as is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Project {
    pub fn new(id: impl Into<String>, path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            title: title.into(),
            status: ProjectStatus::default(),
            own_minutes: 0,
            aggregated_minutes: 0,
            daily_masks: DailyMasks::new(),
            extra: Map::new(),
        }
    }

    pub fn with_own_minutes(self, own_minutes: u64) -> Self {
        Self { own_minutes, ..self }
    }

    pub fn with_aggregated_minutes(self, aggregated_minutes: u64) -> Self {
        Self {
            aggregated_minutes,
            ..self
        }
    }

    pub fn with_status(self, status: ProjectStatus) -> Self {
        Self { status, ..self }
    }

    pub fn is_active(&self) -> bool {
        self.status == ProjectStatus::Active
    }
}

/// A project exactly as it's found on disk. Files written before the hierarchy existed lack
/// `id`, `path` and `aggregated_minutes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub title: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub total_minutes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregated_minutes: Option<u64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub daily_masks: DailyMasks,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectRecord {
    pub fn legacy(title: impl Into<String>, total_minutes: u64) -> Self {
        Self {
            id: None,
            path: None,
            title: title.into(),
            status: ProjectStatus::default(),
            total_minutes,
            aggregated_minutes: None,
            daily_masks: DailyMasks::new(),
            extra: Map::new(),
        }
    }

    /// How many of the hierarchy fields are present.
    pub fn hierarchy_field_count(&self) -> usize {
        [
            self.id.is_some(),
            self.path.is_some(),
            self.aggregated_minutes.is_some(),
        ]
        .into_iter()
        .filter(|v| *v)
        .count()
    }
}

impl From<Project> for ProjectRecord {
    fn from(
        Project {
            id,
            path,
            title,
            status,
            own_minutes,
            aggregated_minutes,
            daily_masks,
            extra,
        }: Project,
    ) -> Self {
        ProjectRecord {
            id: Some(id),
            path: Some(path),
            title,
            status,
            total_minutes: own_minutes,
            aggregated_minutes: Some(aggregated_minutes),
            daily_masks,
            extra,
        }
    }
}
