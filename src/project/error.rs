use thiserror::Error;

/// Reasons a path is rejected when a project is created.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("path can't be empty")]
    Empty,
    #[error("path {path:?} contains {invalid:?}, only lowercase latin letters, digits, '-' and '/' are allowed")]
    InvalidCharacter { path: String, invalid: char },
    #[error("path {0:?} can't start or end with '/'")]
    EdgeSeparator(String),
    #[error("path {0:?} contains repeated '/'")]
    RepeatedSeparator(String),
    #[error("path {0:?} contains an empty segment")]
    EmptySegment(String),
    #[error("segment {segment:?} of path {path:?} can't start or end with '-'")]
    EdgeHyphen { path: String, segment: String },
}

/// Rejections of store level operations. Lookups never produce these, they return [Option].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("project {0:?} not found")]
    NotFound(String),
    #[error("a project with path {0:?} already exists")]
    DuplicatePath(String),
    #[error("a project with id {0:?} already exists")]
    DuplicateId(String),
    #[error(transparent)]
    InvalidPath(#[from] PathError),
}
