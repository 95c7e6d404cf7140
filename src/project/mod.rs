//! The project hierarchy. Projects form a tree purely through their `/` separated paths, and
//! every project caches the minutes of its whole subtree in `aggregated_minutes`.
//!
//! Nothing in this module does I/O. Callers load a [store::ProjectStore], change it through
//! the functions here and save it back.

pub mod aggregate;
pub mod compat;
pub mod entities;
pub mod error;
pub mod path;
pub mod slug;
pub mod store;
pub mod validate;
