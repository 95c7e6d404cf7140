//! Support for files written before projects had ids and paths.
//!
//! Records are brought into the hierarchical shape once, when a file is loaded. After
//! [migrate] the rest of the application only ever sees complete [Project]s.

use std::fmt::Display;

use tracing::{debug, info};

use super::{
    aggregate::recompute_all,
    entities::{Project, ProjectRecord},
    slug::{id_from_title, path_from_title},
    store::ProjectStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    Empty,
    /// No hierarchy fields at all.
    Old,
    New,
    /// Some hierarchy fields are present, a migration was interrupted or the file was edited by
    /// hand.
    Partial,
}

impl Display for StoreFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreFormat::Empty => write!(f, "empty"),
            StoreFormat::Old => write!(f, "old"),
            StoreFormat::New => write!(f, "new"),
            StoreFormat::Partial => write!(f, "partial"),
        }
    }
}

/// Classifies a file by its first record only. A file mixing formats is reported as whatever
/// its first record looks like, [migration_ready] does the full scan.
pub fn detect_format(records: &[ProjectRecord]) -> StoreFormat {
    match records.first().map(ProjectRecord::hierarchy_field_count) {
        None => StoreFormat::Empty,
        Some(0) => StoreFormat::Old,
        Some(3) => StoreFormat::New,
        Some(_) => StoreFormat::Partial,
    }
}

/// Fills in missing `id`, `path` and `aggregated_minutes`. Paths are derived at the root level
/// since a legacy record has no parent. Does nothing once all three are present.
pub fn ensure_fields(record: &mut ProjectRecord) {
    if record.id.is_none() {
        record.id = Some(id_from_title(&record.title));
    }
    if record.path.is_none() {
        record.path = Some(path_from_title(&record.title, None));
    }
    if record.aggregated_minutes.is_none() {
        record.aggregated_minutes = Some(record.total_minutes);
    }
}

impl From<ProjectRecord> for Project {
    fn from(mut record: ProjectRecord) -> Self {
        ensure_fields(&mut record);
        let ProjectRecord {
            id,
            path,
            title,
            status,
            total_minutes,
            aggregated_minutes,
            daily_masks,
            extra,
        } = record;
        Project {
            id: id.unwrap_or_default(),
            path: path.unwrap_or_default(),
            title,
            status,
            own_minutes: total_minutes,
            aggregated_minutes: aggregated_minutes.unwrap_or(total_minutes),
            daily_masks,
            extra,
        }
    }
}

/// One-shot migration run at load time. Complete files keep their aggregates as found. When
/// any aggregate had to be back-filled every aggregate is recomputed, a back-filled parent
/// would otherwise miss its children.
pub fn migrate(records: Vec<ProjectRecord>) -> ProjectStore {
    let format = detect_format(&records);
    let incomplete = records
        .iter()
        .filter(|v| v.hierarchy_field_count() < 3)
        .count();
    let missing_aggregates = records.iter().any(|v| v.aggregated_minutes.is_none());

    let mut store = records.into_iter().map(Project::from).collect::<ProjectStore>();
    if incomplete > 0 {
        info!("Back-filled hierarchy fields for {incomplete} projects, detected format {format}");
    } else {
        debug!("No projects need back-filling");
    }
    if missing_aggregates {
        recompute_all(&mut store);
    }
    store
}

/// True once every record is complete and no aggregate is below its own minutes, i.e. nothing
/// depends on back-filling anymore.
pub fn migration_ready(records: &[ProjectRecord]) -> bool {
    detect_format(records) == StoreFormat::New
        && records.iter().all(|v| {
            v.hierarchy_field_count() == 3
                && v.aggregated_minutes.unwrap_or_default() >= v.total_minutes
        })
}
