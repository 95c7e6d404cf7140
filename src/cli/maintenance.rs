use anyhow::{bail, Result};
use tracing::{info, warn};

use crate::{
    project::{
        aggregate::{recompute_all, stale_aggregates},
        compat::{detect_format, migration_ready, StoreFormat},
        validate::validate,
    },
    storage::{Database, Snapshot},
};

/// Everything `check` found in a database.
#[derive(Debug, PartialEq, Eq)]
pub struct CheckReport {
    pub format: StoreFormat,
    pub migration_ready: bool,
    pub problems: Vec<String>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

pub async fn process_check_command(database: &Database) -> Result<()> {
    let report = check(database).await?;
    println!("Format: {}", report.format);
    println!("Migration complete: {}", report.migration_ready);
    for problem in &report.problems {
        println!("{problem}");
    }
    if !report.is_ok() {
        bail!("Found {} problems", report.problems.len());
    }
    println!("No problems found");
    Ok(())
}

pub async fn process_migrate_command(database: &Database) -> Result<()> {
    let format = migrate(database).await?;
    println!("Migrated from {format} format");
    Ok(())
}

async fn check(database: &Database) -> Result<CheckReport> {
    let file = database.read().await?;
    let format = detect_format(&file.projects);
    let ready = migration_ready(&file.projects);
    let snapshot = Snapshot::from_file(file);

    let mut problems = validate(snapshot.store.projects()).messages();
    problems.extend(
        stale_aggregates(&snapshot.store)
            .into_iter()
            .map(|(path, cached, computed)| {
                format!("stale aggregate: {path} has {cached}, expected {computed}")
            }),
    );
    if !problems.is_empty() {
        warn!("Database check found {problems:?}");
    }
    Ok(CheckReport {
        format,
        migration_ready: ready,
        problems,
    })
}

/// Migrates the file, recomputes every aggregate and writes the result. Returns the format the
/// file had before.
async fn migrate(database: &Database) -> Result<StoreFormat> {
    let mut snapshot = database.load().await?;
    let report = validate(snapshot.store.projects());
    if !report.is_ok() {
        bail!("Refusing to migrate: {}", report.messages().join(", "));
    }
    recompute_all(&mut snapshot.store);
    database.save(&snapshot).await?;
    info!("Migrated {} projects", snapshot.store.len());
    Ok(snapshot.format)
}
