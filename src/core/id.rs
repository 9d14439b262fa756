//! Dense identifiers of vertices and edges.
//!
//! An id is the position of the entry in its graph's arena, assigned by the
//! construction pass. Ids are valid only for the graph snapshot that produced
//! them: every operation that builds a new graph assigns fresh ids, so an id
//! must never be carried across a transformation.

use std::fmt;

/// Position of a vertex in the vertex sequence of one graph snapshot.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(usize);

/// Position of an edge in the edge sequence of one graph snapshot.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(usize);

impl VertexId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn as_usize(&self) -> usize {
        self.0
    }
}

impl EdgeId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn as_usize(&self) -> usize {
        self.0
    }
}

impl From<usize> for VertexId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl From<VertexId> for usize {
    fn from(id: VertexId) -> Self {
        id.0
    }
}

impl From<usize> for EdgeId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl From<EdgeId> for usize {
    fn from(id: EdgeId) -> Self {
        id.0
    }
}

impl fmt::Debug for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl fmt::Debug for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}
