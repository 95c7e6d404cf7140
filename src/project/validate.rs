use std::{collections::HashSet, fmt::Display};

use super::entities::Project;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    DuplicatePath(String),
    DuplicateId(String),
}

impl Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::DuplicatePath(path) => write!(f, "duplicate path: {path}"),
            Violation::DuplicateId(id) => write!(f, "duplicate id: {id}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct IntegrityReport {
    pub violations: Vec<Violation>,
}

impl IntegrityReport {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

/// Finds repeated paths and ids. Every repetition after the first occurrence is reported. The
/// aggregate invariant isn't checked here.
pub fn validate(projects: &[Project]) -> IntegrityReport {
    let mut paths = HashSet::new();
    let mut ids = HashSet::new();
    let mut report = IntegrityReport::default();

    for project in projects {
        if !paths.insert(project.path.as_str()) {
            report
                .violations
                .push(Violation::DuplicatePath(project.path.clone()));
        }
        if !ids.insert(project.id.as_str()) {
            report
                .violations
                .push(Violation::DuplicateId(project.id.clone()));
        }
    }
    report
}
