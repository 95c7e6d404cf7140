//! Path semantics. A project path is a `/` separated list of slugs and is the only thing that
//! encodes where a project sits in the hierarchy. Nothing here touches the store.

use super::error::PathError;

pub const SEPARATOR: char = '/';

/// Returns true if `child` is exactly one level below `parent`.
///
/// ```
/// use timetree::project::path::is_direct_child;
/// assert!(is_direct_child("exlibrus/frontend", "exlibrus"));
/// assert!(!is_direct_child("exlibrus/frontend/components", "exlibrus"));
/// ```
pub fn is_direct_child(child: &str, parent: &str) -> bool {
    match strip_parent(child, parent) {
        Some(remaining) => !remaining.contains(SEPARATOR),
        None => false,
    }
}

/// Returns true if `path` is anywhere below `parent`.
pub fn is_descendant(path: &str, parent: &str) -> bool {
    strip_parent(path, parent).is_some()
}

fn strip_parent<'a>(path: &'a str, parent: &str) -> Option<&'a str> {
    path.strip_prefix(parent)?.strip_prefix(SEPARATOR)
}

/// All ancestors of `path`, nearest parent first and root last. Empty for root paths.
pub fn ancestor_paths(path: &str) -> Vec<&str> {
    let mut ancestors = Vec::with_capacity(depth(path));
    let mut current = path;
    while let Some(parent) = parent_path(current) {
        ancestors.push(parent);
        current = parent;
    }
    ancestors
}

/// Nesting level. Root projects are at depth 0.
pub fn depth(path: &str) -> usize {
    path.matches(SEPARATOR).count()
}

pub fn parent_path(path: &str) -> Option<&str> {
    path.rsplit_once(SEPARATOR).map(|(parent, _)| parent)
}

pub fn last_segment(path: &str) -> &str {
    path.rsplit_once(SEPARATOR)
        .map_or(path, |(_, segment)| segment)
}

pub fn child_path(parent: Option<&str>, segment: &str) -> String {
    match parent {
        Some(parent) => format!("{parent}{SEPARATOR}{segment}"),
        None => segment.to_string(),
    }
}

/// Checks that a path is made of non-empty lowercase slug segments. Only done when a project is
/// created, aggregation never validates.
pub fn validate_path(path: &str) -> Result<(), PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    if let Some(invalid) = path
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == SEPARATOR))
    {
        return Err(PathError::InvalidCharacter {
            path: path.to_string(),
            invalid,
        });
    }
    if path.starts_with(SEPARATOR) || path.ends_with(SEPARATOR) {
        return Err(PathError::EdgeSeparator(path.to_string()));
    }
    if path.contains("//") {
        return Err(PathError::RepeatedSeparator(path.to_string()));
    }
    for segment in path.split(SEPARATOR) {
        if segment.is_empty() {
            return Err(PathError::EmptySegment(path.to_string()));
        }
        if segment.starts_with('-') || segment.ends_with('-') {
            return Err(PathError::EdgeHyphen {
                path: path.to_string(),
                segment: segment.to_string(),
            });
        }
    }
    Ok(())
}
