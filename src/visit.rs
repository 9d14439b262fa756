//! Iterative depth-first traversal with pluggable hooks.
//!
//! The traversal in this module is **iterative**: it keeps its own stack on
//! the heap instead of using recursion. This means that
//!
//! * traversal depth is limited only by available memory, not by the size of
//!   the program stack,
//! * the traversal can be stopped from a hook without unwinding tricks.
//!
//! The same engine drives the decomposition algorithms and topological sort
//! in [`algo`](crate::algo) and is available to callers as a general
//! primitive via the [`Dfs`] builder.

pub mod dfs;

#[doc(inline)]
pub use self::dfs::{Dfs, VisitState};

/// Which incident edges a traversal follows out of a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Follow {
    /// Traverse along edge direction, from source to target.
    Outgoing,
    /// Traverse against edge direction, from target to source.
    Incoming,
    /// Traverse incident edges in both directions.
    Undirected,
}
