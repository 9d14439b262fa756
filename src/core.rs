pub mod error;
pub mod graph;
pub mod id;
pub mod marker;

#[doc(inline)]
pub use self::{
    error::{BuildError, BuildErrorKind},
    graph::{Edge, Graph, Vertex},
    id::{EdgeId, VertexId},
    marker::Direction,
};
