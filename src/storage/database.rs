use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use fs4::tokio::AsyncFileExt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::{debug, info, instrument};

use crate::project::{
    compat::{detect_format, migrate, StoreFormat},
    entities::ProjectRecord,
    store::ProjectStore,
};

/// The database file exactly as it's stored on disk.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DatabaseFile {
    /// Settings and data of other tools. Only the tracker settings are read from it.
    #[serde(default)]
    pub meta: Map<String, Value>,
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A loaded and migrated database. This is what commands work with between a load and a save.
#[derive(Debug)]
pub struct Snapshot {
    pub meta: Map<String, Value>,
    pub store: ProjectStore,
    /// Format of the file before migration.
    pub format: StoreFormat,
    extra: Map<String, Value>,
}

impl Snapshot {
    pub fn from_file(
        DatabaseFile {
            meta,
            projects,
            extra,
        }: DatabaseFile,
    ) -> Self {
        let format = detect_format(&projects);
        Self {
            meta,
            store: migrate(projects),
            format,
            extra,
        }
    }

    pub fn to_file(&self) -> DatabaseFile {
        DatabaseFile {
            meta: self.meta.clone(),
            projects: self
                .store
                .projects()
                .iter()
                .cloned()
                .map(ProjectRecord::from)
                .collect(),
            extra: self.extra.clone(),
        }
    }
}

/// Single JSON file holding every project. The file is always read and written whole. Locks
/// only prevent torn reads and writes, concurrent writers still overwrite each other.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the raw file. A missing file is an empty database.
    #[instrument(skip(self), fields(path = ?self.path))]
    pub async fn read(&self) -> Result<DatabaseFile> {
        let mut file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Database doesn't exist yet");
                return Ok(DatabaseFile::default());
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to open {:?}", self.path)),
        };

        file.lock_shared()?;
        let mut content = String::new();
        let read = file.read_to_string(&mut content).await;
        file.unlock_async().await?;
        read.with_context(|| format!("Failed to read {:?}", self.path))?;

        if content.trim().is_empty() {
            return Ok(DatabaseFile::default());
        }
        serde_json::from_str(&content).with_context(|| format!("Malformed database {:?}", self.path))
    }

    #[instrument(skip_all, fields(path = ?self.path))]
    pub async fn write(&self, database: &DatabaseFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut buffer = serde_json::to_vec_pretty(database)?;
        buffer.push(b'\n');

        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open {:?} for writing", self.path))?;

        // Truncating only after the lock is taken, so readers never see an empty file.
        file.lock_exclusive()?;
        let result = Self::write_locked(&mut file, &buffer).await;
        file.unlock_async().await?;
        result?;

        debug!("Saved {} projects", database.projects.len());
        Ok(())
    }

    async fn write_locked(file: &mut File, buffer: &[u8]) -> Result<()> {
        file.set_len(0).await?;
        file.write_all(buffer).await?;
        file.flush().await?;
        file.sync_all().await?;
        Ok(())
    }

    /// Reads and migrates the database.
    pub async fn load(&self) -> Result<Snapshot> {
        let snapshot = Snapshot::from_file(self.read().await?);
        info!(
            "Loaded {} projects, format {}",
            snapshot.store.len(),
            snapshot.format
        );
        Ok(snapshot)
    }

    pub async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        self.write(&snapshot.to_file()).await
    }
}
