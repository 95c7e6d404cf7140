//! Time tracking for hierarchical projects kept in a single JSON file.
//! Projects form a tree through their `/` separated paths, every project carries its own
//! minutes and the cached total of its subtree. Tracking is slot based, a short lived tracker
//! marks the current slot of the active project and refreshes totals up the tree.

pub mod activity;
pub mod cli;
pub mod project;
pub mod storage;
pub mod tracking;
pub mod utils;
