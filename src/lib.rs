pub mod algo;
pub mod core;
pub mod infra;
pub mod ops;
pub mod visit;

pub mod prelude {
    #[doc(hidden)]
    pub use crate::{
        algo::{iso::isomorphic, toposort::Cycle},
        core::{
            graph::{Edge, Graph, Vertex},
            id::{EdgeId, VertexId},
            marker::Direction,
        },
        visit::{Dfs, Follow},
    };
}

pub use crate::core::{
    graph::{Edge, Graph, Vertex},
    id::{EdgeId, VertexId},
};
