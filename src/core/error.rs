use std::fmt;

use thiserror::Error;

/// Error returned when the explicit two-list constructor receives an edge
/// referencing a vertex that is not in the supplied vertex list.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("building graph failed: {kind}")]
pub struct BuildError {
    pub kind: BuildErrorKind,
}

impl BuildError {
    pub fn new(kind: BuildErrorKind) -> Self {
        Self { kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildErrorKind {
    /// The edge at the given position names a source index that is out of
    /// range of the vertex list.
    SourceAbsent { edge: usize },
    /// The edge at the given position names a target index that is out of
    /// range of the vertex list.
    TargetAbsent { edge: usize },
}

impl fmt::Display for BuildErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildErrorKind::SourceAbsent { edge } => {
                write!(f, "source of edge {edge} does not exist")
            }
            BuildErrorKind::TargetAbsent { edge } => {
                write!(f, "target of edge {edge} does not exist")
            }
        }
    }
}
