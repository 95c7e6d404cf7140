//!  Storage is a single JSON file, see [database::Database].
//!   - The file holds a `meta` object and the list of projects.
//!   - It's read whole at the start of a command and written whole at the end.
//!   - Old files are migrated in memory on load and written back in the new format on save.

pub mod database;

pub use database::{Database, DatabaseFile, Snapshot};
