//! Keeps `aggregated_minutes` equal to own minutes plus the aggregates of direct children.
//!
//! Every computation walks the live subtree instead of trusting cached aggregates, so the order
//! in which nodes get refreshed never matters. Trees are small, tens to hundreds of nodes, and
//! this runs once per tracker tick.

use tracing::{instrument, trace};

use super::{path::ancestor_paths, store::ProjectStore};

/// Own minutes of `path` plus the aggregated minutes of its whole subtree. A missing node
/// counts as 0. Sums saturate at `u64::MAX` since minutes come straight from the file. Never
/// mutates.
pub fn compute_aggregated(path: &str, store: &ProjectStore) -> u64 {
    let Some(project) = store.find_by_path(path) else {
        return 0;
    };
    store
        .direct_children(path)
        .map(|child| compute_aggregated(&child.path, store))
        .fold(project.own_minutes, u64::saturating_add)
}

/// Rewrites the aggregate of `changed` and of every existing ancestor after own minutes of
/// `changed` moved. Missing ancestors are skipped. Returns refreshed paths, nearest first.
#[instrument(skip(store))]
pub fn refresh_after_change(changed: &str, store: &mut ProjectStore) -> Vec<String> {
    let mut updated = Vec::new();
    for path in std::iter::once(changed).chain(ancestor_paths(changed)) {
        if store.find_by_path(path).is_none() {
            trace!("Skipping missing ancestor {path}");
            continue;
        }
        let aggregated = compute_aggregated(path, store);
        if let Some(project) = store.find_by_path_mut(path) {
            trace!(
                "{path}: {} -> {aggregated}",
                project.aggregated_minutes
            );
            project.aggregated_minutes = aggregated;
            updated.push(path.to_string());
        }
    }
    updated
}

/// Rewrites every aggregate in the store. Used after migrations and bulk edits.
pub fn recompute_all(store: &mut ProjectStore) {
    let aggregates = store
        .projects()
        .iter()
        .map(|v| compute_aggregated(&v.path, store))
        .collect::<Vec<_>>();
    for (project, aggregated) in store.projects_mut().zip(aggregates) {
        project.aggregated_minutes = aggregated;
    }
}

/// Paths whose cached aggregate differs from a full recompute, with `(cached, computed)`.
pub fn stale_aggregates(store: &ProjectStore) -> Vec<(String, u64, u64)> {
    store
        .projects()
        .iter()
        .filter_map(|v| {
            let computed = compute_aggregated(&v.path, store);
            (computed != v.aggregated_minutes).then(|| (v.path.clone(), v.aggregated_minutes, computed))
        })
        .collect()
}
