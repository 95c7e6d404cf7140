use tracing::{debug, info};

use super::{
    aggregate::refresh_after_change,
    entities::{Project, ProjectStatus},
    error::StoreError,
    path::{depth, is_descendant, is_direct_child, validate_path},
};

/// The whole project collection, held in memory between a load and a save. Order is the order
/// projects were read in and is preserved on save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectStore {
    projects: Vec<Project>,
}

/// A project together with its nesting level, as produced by [ProjectStore::tree].
#[derive(Debug)]
pub struct TreeEntry<'a> {
    pub project: &'a Project,
    pub depth: usize,
}

impl ProjectStore {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn projects_mut(&mut self) -> impl Iterator<Item = &mut Project> {
        self.projects.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn into_projects(self) -> Vec<Project> {
        self.projects
    }

    pub fn find_by_path(&self, path: &str) -> Option<&Project> {
        self.projects.iter().find(|v| v.path == path)
    }

    pub fn find_by_path_mut(&mut self, path: &str) -> Option<&mut Project> {
        self.projects.iter_mut().find(|v| v.path == path)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|v| v.id == id)
    }

    pub fn find_by_title(&self, title: &str) -> Option<&Project> {
        let title = title.to_lowercase();
        self.projects
            .iter()
            .find(|v| v.title.to_lowercase() == title)
    }

    /// Resolves whatever a user typed: an id, then a path, then a case-insensitive title. Titles
    /// can be ambiguous, the first match wins.
    pub fn resolve(&self, identifier: &str) -> Option<&Project> {
        self.find_by_id(identifier)
            .or_else(|| self.find_by_path(identifier))
            .or_else(|| self.find_by_title(identifier))
    }

    /// Same as [ProjectStore::resolve] but only returns the path, which is what mutating
    /// operations take.
    pub fn resolve_path(&self, identifier: &str) -> Result<String, StoreError> {
        self.resolve(identifier)
            .map(|v| v.path.clone())
            .ok_or_else(|| StoreError::NotFound(identifier.to_string()))
    }

    pub fn direct_children<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a Project> {
        self.projects
            .iter()
            .filter(move |v| is_direct_child(&v.path, parent))
    }

    pub fn descendants<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a Project> {
        self.projects
            .iter()
            .filter(move |v| is_descendant(&v.path, parent))
    }

    pub fn active(&self) -> Option<&Project> {
        self.projects.iter().find(|v| v.is_active())
    }

    /// Projects ordered by path, so that every parent is directly followed by its subtree.
    pub fn tree(&self) -> Vec<TreeEntry<'_>> {
        let mut entries = self
            .projects
            .iter()
            .map(|project| TreeEntry {
                project,
                depth: depth(&project.path),
            })
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| a.project.path.cmp(&b.project.path));
        entries
    }

    /// Adds a new project. The path is validated and both path and id have to be unused.
    ///
    /// A new node can adopt orphaned descendants that already exist, so its own aggregate and
    /// those of its ancestors are refreshed. Returns the refreshed paths.
    pub fn insert(&mut self, project: Project) -> Result<Vec<String>, StoreError> {
        validate_path(&project.path)?;
        if self.find_by_path(&project.path).is_some() {
            return Err(StoreError::DuplicatePath(project.path));
        }
        if self.find_by_id(&project.id).is_some() {
            return Err(StoreError::DuplicateId(project.id));
        }
        if project.is_active() {
            self.clear_active();
        }

        let path = project.path.clone();
        self.projects.push(project);
        let updated = refresh_after_change(&path, self);

        info!("Inserted project {path}");
        Ok(updated)
    }

    /// Makes `path` the only active project. Any other active project is paused. Nothing is
    /// changed if `path` doesn't exist. Returns the paths that got paused.
    pub fn set_active(&mut self, path: &str) -> Result<Vec<String>, StoreError> {
        if self.find_by_path(path).is_none() {
            return Err(StoreError::NotFound(path.to_string()));
        }
        let paused = self.clear_active();
        if let Some(project) = self.find_by_path_mut(path) {
            project.status = ProjectStatus::Active;
        }
        debug!("Activated {path}, paused {paused:?}");
        Ok(paused.into_iter().filter(|v| v != path).collect())
    }

    /// Changes the status of a single project. Activation goes through
    /// [ProjectStore::set_active] to keep a single active project.
    pub fn set_status(
        &mut self,
        path: &str,
        status: ProjectStatus,
    ) -> Result<ProjectStatus, StoreError> {
        let previous = self
            .find_by_path(path)
            .map(|v| v.status)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        if status == ProjectStatus::Active {
            self.set_active(path)?;
        } else if let Some(project) = self.find_by_path_mut(path) {
            project.status = status;
        }
        Ok(previous)
    }

    fn clear_active(&mut self) -> Vec<String> {
        self.projects
            .iter_mut()
            .filter(|v| v.is_active())
            .map(|v| {
                v.status = ProjectStatus::Paused;
                v.path.clone()
            })
            .collect()
    }
}

impl FromIterator<Project> for ProjectStore {
    fn from_iter<T: IntoIterator<Item = Project>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::project::{
        entities::{Project, ProjectStatus},
        error::{PathError, StoreError},
    };

    use super::ProjectStore;

    /// The three level store used throughout the tests.
    pub(crate) fn exlibrus_store() -> ProjectStore {
        ProjectStore::new(vec![
            Project::new("exlibrus", "exlibrus", "ExLibrus").with_own_minutes(50),
            Project::new("exlibrus-frontend", "exlibrus/frontend", "Frontend")
                .with_own_minutes(120),
            Project::new(
                "exlibrus-frontend-components",
                "exlibrus/frontend/components",
                "Components",
            )
            .with_own_minutes(60),
        ])
    }

    fn paths<'a>(projects: impl Iterator<Item = &'a Project>) -> Vec<&'a str> {
        projects.map(|v| v.path.as_str()).collect()
    }

    #[test]
    fn test_lookup() {
        let store = exlibrus_store();
        assert_eq!(
            store.find_by_path("exlibrus/frontend").map(|v| v.id.as_str()),
            Some("exlibrus-frontend")
        );
        assert_eq!(
            store.find_by_id("exlibrus-frontend").map(|v| v.path.as_str()),
            Some("exlibrus/frontend")
        );
        assert!(store.find_by_path("missing").is_none());
        assert!(store.find_by_id("missing").is_none());
    }

    #[test]
    fn test_lookup_duplicates_first_wins() {
        let store = ProjectStore::new(vec![
            Project::new("a", "dup", "First"),
            Project::new("b", "dup", "Second"),
        ]);
        assert_eq!(store.find_by_path("dup").map(|v| v.id.as_str()), Some("a"));
    }

    #[test]
    fn test_children_and_descendants() {
        let store = exlibrus_store();
        assert_eq!(
            paths(store.direct_children("exlibrus")),
            vec!["exlibrus/frontend"]
        );
        assert_eq!(
            paths(store.descendants("exlibrus")),
            vec!["exlibrus/frontend", "exlibrus/frontend/components"]
        );
        assert_eq!(store.direct_children("exlibrus/frontend/components").count(), 0);
    }

    #[test]
    fn test_resolve_universal() {
        let store = ProjectStore::new(vec![
            Project::new("exlibrus", "exlibrus", "ExLibrus"),
            Project::new("b24", "b24", "Б24 Отчеты"),
        ]);
        let by_id = store.resolve("b24").map(|v| &v.id);
        let by_title = store.resolve("Б24 Отчеты").map(|v| &v.id);
        let by_lower_title = store.resolve("б24 отчеты").map(|v| &v.id);
        assert_eq!(by_id, Some(&"b24".to_string()));
        assert_eq!(by_title, by_id);
        assert_eq!(by_lower_title, by_id);
        assert!(store.resolve("nothing").is_none());
    }

    #[test]
    fn test_resolve_by_path() {
        let store = exlibrus_store();
        let project = store.resolve("exlibrus/frontend");
        assert_eq!(project.map(|v| v.id.as_str()), Some("exlibrus-frontend"));
        assert_eq!(
            store.resolve_path("exlibrus/frontend/components"),
            Ok("exlibrus/frontend/components".to_string())
        );
        assert_eq!(
            store.resolve_path("exlibrus/missing"),
            Err(StoreError::NotFound("exlibrus/missing".into()))
        );
    }

    #[test]
    fn test_resolve_prefers_path_over_title() {
        let store = ProjectStore::new(vec![
            Project::new("reports", "reports", "b24"),
            Project::new("b24-root", "b24", "Б24"),
        ]);
        assert_eq!(store.resolve("b24").map(|v| v.id.as_str()), Some("b24-root"));
        assert_eq!(store.resolve("B24").map(|v| v.id.as_str()), Some("reports"));
    }

    #[test]
    fn test_resolve_prefers_id_over_path() {
        let store = ProjectStore::new(vec![
            Project::new("one", "two", "Three"),
            Project::new("two", "one", "Four"),
        ]);
        assert_eq!(store.resolve("two").map(|v| v.path.as_str()), Some("one"));
        assert_eq!(store.resolve("four").map(|v| v.path.as_str()), Some("one"));
    }

    #[test]
    fn test_tree_sorted_by_path() {
        let mut projects = exlibrus_store().into_projects();
        projects.reverse();
        projects.push(Project::new("alpha", "alpha", "Alpha"));
        let store = ProjectStore::new(projects);

        let tree = store.tree();
        let listed = tree
            .iter()
            .map(|v| (v.project.path.as_str(), v.depth))
            .collect::<Vec<_>>();
        assert_eq!(
            listed,
            vec![
                ("alpha", 0),
                ("exlibrus", 0),
                ("exlibrus/frontend", 1),
                ("exlibrus/frontend/components", 2)
            ]
        );
    }

    #[test]
    fn test_set_active_is_exclusive() -> anyhow::Result<()> {
        let mut store = exlibrus_store();
        store.set_active("exlibrus")?;
        let paused = store.set_active("exlibrus/frontend")?;
        assert_eq!(paused, vec!["exlibrus".to_string()]);

        let active = store
            .projects()
            .iter()
            .filter(|v| v.is_active())
            .map(|v| v.path.as_str())
            .collect::<Vec<_>>();
        assert_eq!(active, vec!["exlibrus/frontend"]);
        assert_eq!(
            store.find_by_path("exlibrus").map(|v| v.status),
            Some(ProjectStatus::Paused)
        );
        Ok(())
    }

    #[test]
    fn test_set_active_repairs_multiple_active() -> anyhow::Result<()> {
        let mut store = ProjectStore::new(vec![
            Project::new("a", "a", "A").with_status(ProjectStatus::Active),
            Project::new("b", "b", "B").with_status(ProjectStatus::Active),
            Project::new("c", "c", "C"),
        ]);
        store.set_active("c")?;
        assert_eq!(store.active().map(|v| v.path.as_str()), Some("c"));
        assert_eq!(store.projects().iter().filter(|v| v.is_active()).count(), 1);
        Ok(())
    }

    #[test]
    fn test_set_active_missing_changes_nothing() {
        let mut store = exlibrus_store();
        store.set_active("exlibrus").unwrap();
        let before = store.clone();

        assert_eq!(
            store.set_active("missing"),
            Err(StoreError::NotFound("missing".into()))
        );
        assert_eq!(store, before);
    }

    #[test]
    fn test_set_status() -> anyhow::Result<()> {
        let mut store = exlibrus_store();
        store.set_status("exlibrus", ProjectStatus::Active)?;
        let previous = store.set_status("exlibrus", ProjectStatus::Completed)?;
        assert_eq!(previous, ProjectStatus::Active);
        assert!(store.active().is_none());

        store.set_status("exlibrus/frontend", ProjectStatus::Active)?;
        store.set_status("exlibrus", ProjectStatus::Active)?;
        assert_eq!(store.active().map(|v| v.path.as_str()), Some("exlibrus"));
        Ok(())
    }

    #[test]
    fn test_insert_rejections() {
        let mut store = exlibrus_store();
        assert_eq!(
            store.insert(Project::new("other", "exlibrus", "Other")).err(),
            Some(StoreError::DuplicatePath("exlibrus".into()))
        );
        assert_eq!(
            store.insert(Project::new("exlibrus", "other", "Other")).err(),
            Some(StoreError::DuplicateId("exlibrus".into()))
        );
        assert_eq!(
            store.insert(Project::new("bad", "Bad Path", "Bad")).err(),
            Some(StoreError::InvalidPath(PathError::InvalidCharacter {
                path: "Bad Path".into(),
                invalid: 'B'
            }))
        );
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_insert_adopts_orphaned_children() -> anyhow::Result<()> {
        // "exlibrus/frontend" doesn't exist yet, so components aren't counted by exlibrus.
        let mut store = ProjectStore::new(vec![
            Project::new("exlibrus", "exlibrus", "ExLibrus")
                .with_own_minutes(50)
                .with_aggregated_minutes(50),
            Project::new("components", "exlibrus/frontend/components", "Components")
                .with_own_minutes(60)
                .with_aggregated_minutes(60),
        ]);

        let updated = store.insert(
            Project::new("frontend", "exlibrus/frontend", "Frontend").with_own_minutes(5),
        )?;
        assert_eq!(updated, vec!["exlibrus/frontend", "exlibrus"]);
        assert_eq!(
            store.find_by_path("exlibrus/frontend").map(|v| v.aggregated_minutes),
            Some(65)
        );
        assert_eq!(
            store.find_by_path("exlibrus").map(|v| v.aggregated_minutes),
            Some(115)
        );
        Ok(())
    }

    #[test]
    fn test_insert_active_pauses_previous() -> anyhow::Result<()> {
        let mut store = exlibrus_store();
        store.set_active("exlibrus")?;
        store.insert(Project::new("new", "new", "New").with_status(ProjectStatus::Active))?;
        assert_eq!(store.active().map(|v| v.path.as_str()), Some("new"));
        assert_eq!(store.projects().iter().filter(|v| v.is_active()).count(), 1);
        Ok(())
    }
}
