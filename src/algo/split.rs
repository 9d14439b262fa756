//! Decomposition into [connected] components.
//!
//! [`split`](Graph::split) finds the weakly connected components of a graph,
//! [`split_strong`](Graph::split_strong) the strongly connected ones using
//! [Kosaraju's algorithm]. Both are driven by the traversal engine in
//! [`visit`](crate::visit) and emit every component as its own graph with the
//! edges restricted to members.
//!
//! [connected]: https://en.wikipedia.org/wiki/Connectivity_(graph_theory)
//! [Kosaraju's algorithm]: https://en.wikipedia.org/wiki/Kosaraju%27s_algorithm

use std::{cell::Cell, collections::VecDeque};

use crate::{
    core::{graph::Graph, id::VertexId},
    visit::{Dfs, Follow},
};

impl<V, E> Graph<V, E>
where
    V: Clone,
    E: Clone,
{
    /// Splits this graph into weakly connected components, in the order each
    /// component's first vertex appears in the vertex sequence.
    pub fn split(&self) -> Vec<Self> {
        self.split_by(self.vertex_ids(), Follow::Undirected)
    }

    /// Splits this graph into strongly connected components: maximal vertex
    /// sets in which every member reaches every other member along directed
    /// paths within the set.
    ///
    /// Kosaraju's two passes: the first walks against edge direction over all
    /// vertices and prepends each finished vertex to an order list, the
    /// second groups components along edge direction over that order.
    pub fn split_strong(&self) -> Vec<Self> {
        let mut order = VecDeque::with_capacity(self.vertex_count());
        Dfs::on(self)
            .follow(Follow::Incoming)
            .on_finish(|_, vertex| {
                order.push_front(vertex);
                false
            })
            .run();

        self.split_by(order, Follow::Outgoing)
    }

    fn split_by(&self, roots: impl IntoIterator<Item = VertexId>, follow: Follow) -> Vec<Self> {
        let mut component = vec![usize::MAX; self.vertex_count()];
        let current = Cell::new(0usize);

        Dfs::on(self)
            .follow(follow)
            .roots(roots)
            .on_discover(|_, vertex| {
                component[vertex.as_usize()] = current.get();
                false
            })
            .on_exit_root(|_| current.set(current.get() + 1))
            .run();

        (0..current.get())
            .map(|label| self.filter_vertices(|id, _| component[id.as_usize()] == label))
            .collect()
    }
}
