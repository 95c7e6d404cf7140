use std::io::IsTerminal;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use tracing::info;

use crate::{
    project::{
        entities::{Project, ProjectStatus},
        error::StoreError,
        slug::{id_from_path, path_from_title},
        store::ProjectStore,
    },
    storage::Database,
    tracking::settings::TrackerSettings,
};

use super::output::render_tree;

#[derive(Args, Debug, Clone)]
pub struct AddCommand {
    #[arg(help = "Title of the project. The path is derived from it")]
    title: String,
    #[arg(long, help = "Id, path or title of the parent project")]
    parent: Option<String>,
    #[arg(long, help = "Explicit id. By default the path with '/' replaced by '-'")]
    id: Option<String>,
    #[arg(long, help = "Make the new project the active one")]
    start: bool,
}

pub async fn process_list_command(database: &Database, today: NaiveDate) -> Result<()> {
    let snapshot = database.load().await?;
    if snapshot.store.is_empty() {
        println!("No projects yet");
        return Ok(());
    }
    let settings = TrackerSettings::from_meta(&snapshot.meta);
    let colored = std::io::stdout().is_terminal();
    for line in render_tree(&snapshot.store, today, &settings, colored) {
        println!("{line}");
    }
    Ok(())
}

pub async fn process_add_command(database: &Database, command: AddCommand) -> Result<()> {
    let mut snapshot = database.load().await?;
    let path = add_project(&mut snapshot.store, command)?;
    database.save(&snapshot).await?;
    println!("Created {path}");
    Ok(())
}

pub async fn process_status_command(
    database: &Database,
    identifier: &str,
    status: ProjectStatus,
) -> Result<()> {
    let mut snapshot = database.load().await?;
    let change = change_status(&mut snapshot.store, identifier, status)?;
    database.save(&snapshot).await?;

    println!("{}: {} -> {}", change.path, change.previous, status);
    for path in change.paused {
        println!("{path}: paused");
    }
    Ok(())
}

/// Builds a project from the command and inserts it. Returns the new path.
fn add_project(store: &mut ProjectStore, command: AddCommand) -> Result<String> {
    let parent = command
        .parent
        .map(|v| store.resolve_path(&v))
        .transpose()?;
    let path = path_from_title(&command.title, parent.as_deref());
    let id = command.id.unwrap_or_else(|| id_from_path(&path));
    let status = if command.start {
        ProjectStatus::Active
    } else {
        ProjectStatus::Paused
    };

    let updated = store.insert(Project::new(id, path.clone(), command.title).with_status(status))?;
    info!("Added {path}, refreshed {updated:?}");
    Ok(path)
}

#[derive(Debug, PartialEq, Eq)]
struct StatusChange {
    path: String,
    previous: ProjectStatus,
    paused: Vec<String>,
}

fn change_status(
    store: &mut ProjectStore,
    identifier: &str,
    status: ProjectStatus,
) -> Result<StatusChange> {
    let path = store.resolve_path(identifier)?;
    let previous = store
        .find_by_path(&path)
        .map(|v| v.status)
        .ok_or_else(|| StoreError::NotFound(path.clone()))?;
    let paused = if status == ProjectStatus::Active {
        store.set_active(&path)?
    } else {
        store.set_status(&path, status)?;
        Vec::new()
    };
    Ok(StatusChange {
        path,
        previous,
        paused,
    })
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use crate::project::{
        entities::{Project, ProjectStatus},
        error::StoreError,
        store::{tests::exlibrus_store, ProjectStore},
    };

    use super::{add_project, change_status, AddCommand, StatusChange};

    fn add(title: &str, parent: Option<&str>) -> AddCommand {
        AddCommand {
            title: title.into(),
            parent: parent.map(Into::into),
            id: None,
            start: false,
        }
    }

    #[test]
    fn test_add_under_parent_by_title() -> Result<()> {
        let mut store = exlibrus_store();
        let path = add_project(&mut store, add("API интеграция", Some("Frontend")))?;
        assert_eq!(path, "exlibrus/frontend/api-integratsiya");

        let project = store.find_by_path(&path).unwrap();
        assert_eq!(project.id, "exlibrus-frontend-api-integratsiya");
        assert_eq!(project.title, "API интеграция");
        assert_eq!(project.status, ProjectStatus::Paused);
        Ok(())
    }

    #[test]
    fn test_add_root_with_explicit_id_and_start() -> Result<()> {
        let mut store = exlibrus_store();
        store.set_active("exlibrus")?;
        let command = AddCommand {
            id: Some("b24".into()),
            start: true,
            ..add("Б24", None)
        };
        let path = add_project(&mut store, command)?;
        assert_eq!(path, "b24");
        assert_eq!(store.active().map(|v| v.id.as_str()), Some("b24"));
        assert_eq!(
            store.find_by_path("exlibrus").map(|v| v.status),
            Some(ProjectStatus::Paused)
        );
        Ok(())
    }

    #[test]
    fn test_add_rejects_duplicate_and_unknown_parent() {
        let mut store = exlibrus_store();
        let duplicate = add_project(&mut store, add("Frontend", Some("exlibrus")));
        assert!(matches!(
            duplicate.unwrap_err().downcast_ref::<StoreError>(),
            Some(StoreError::DuplicatePath(_))
        ));

        let orphan = add_project(&mut store, add("Backend", Some("missing")));
        assert!(matches!(
            orphan.unwrap_err().downcast_ref::<StoreError>(),
            Some(StoreError::NotFound(_))
        ));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_start_pauses_previous() -> Result<()> {
        let mut store = exlibrus_store();
        change_status(&mut store, "exlibrus", ProjectStatus::Active)?;

        let change = change_status(&mut store, "Components", ProjectStatus::Active)?;
        assert_eq!(
            change,
            StatusChange {
                path: "exlibrus/frontend/components".into(),
                previous: ProjectStatus::Paused,
                paused: vec!["exlibrus".into()],
            }
        );
        assert_eq!(
            store.active().map(|v| v.path.as_str()),
            Some("exlibrus/frontend/components")
        );
        Ok(())
    }

    #[test]
    fn test_start_reports_every_paused_project() -> Result<()> {
        let mut store = ProjectStore::new(vec![
            Project::new("a", "a", "A").with_status(ProjectStatus::Active),
            Project::new("b", "b", "B").with_status(ProjectStatus::Active),
            Project::new("c", "c", "C"),
        ]);
        let change = change_status(&mut store, "c", ProjectStatus::Active)?;
        assert_eq!(change.paused, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(store.active().map(|v| v.path.as_str()), Some("c"));
        Ok(())
    }

    #[test]
    fn test_status_of_missing_project() {
        let mut store = exlibrus_store();
        let result = change_status(&mut store, "missing", ProjectStatus::Paused);
        assert!(matches!(
            result.unwrap_err().downcast_ref::<StoreError>(),
            Some(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_complete_keeps_minutes() -> Result<()> {
        let mut store = exlibrus_store();
        let change = change_status(&mut store, "exlibrus-frontend", ProjectStatus::Completed)?;
        assert!(change.paused.is_empty());

        let project = store.find_by_path("exlibrus/frontend").unwrap();
        assert_eq!(project.status, ProjectStatus::Completed);
        assert_eq!(project.own_minutes, 120);
        Ok(())
    }
}
