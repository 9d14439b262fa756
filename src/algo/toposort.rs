//! Reorder vertices of a [directed acyclic graph] into [topological order].
//!
//! [directed acyclic graph]: https://en.wikipedia.org/wiki/Directed_acyclic_graph
//! [topological order]: https://en.wikipedia.org/wiki/Topological_sorting

use thiserror::Error;

use crate::{
    core::{
        graph::{Edge, Graph},
        id::VertexId,
        marker::Direction,
    },
    visit::{Dfs, Follow},
};

/// The graph contains a cycle, so no topological order exists.
///
/// This is an expected outcome callers branch on, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("graph contains cycle")]
pub struct Cycle;

impl<V, E> Graph<V, E>
where
    V: Clone,
    E: Clone,
{
    /// Creates a new graph whose vertex sequence is a topological order of
    /// the receiver: every edge's source precedes its target. Edges keep
    /// their relative order and are rewritten against the new indices.
    ///
    /// A cycle exists iff the traversal meets an edge to a vertex that is on
    /// the current path. An edge to an already finished vertex is a cross
    /// edge and does not indicate a cycle, so graphs that merely reconverge
    /// (diamonds) sort fine.
    pub fn topsort(&self) -> Result<Self, Cycle> {
        let count = self.vertex_count();
        let mut order = vec![VertexId::new(0); count];
        let mut next = count;

        let back_edge = Dfs::on(self)
            .follow(Follow::Outgoing)
            .on_discover(|state, vertex| {
                self.neighbors_directed(vertex, Direction::Outgoing)
                    .any(|neighbor| state.is_active(neighbor))
            })
            .on_finish(|_, vertex| {
                next -= 1;
                order[next] = vertex;
                false
            })
            .run();

        if back_edge.is_some() {
            return Err(Cycle);
        }

        let mut position = vec![0usize; count];
        for (index, &vertex) in order.iter().enumerate() {
            position[vertex.as_usize()] = index;
        }

        let payloads = order
            .iter()
            .map(|&vertex| self[vertex].payload().clone())
            .collect();
        let edges = self
            .edges()
            .map(|edge| Edge {
                source: VertexId::new(position[edge.source().as_usize()]),
                target: VertexId::new(position[edge.target().as_usize()]),
                payload: edge.payload().clone(),
            })
            .collect();

        Ok(Graph::build(payloads, edges))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{algo::iso::isomorphic, infra::notation};

    use super::*;

    fn parse(input: &str) -> Graph<i64, Option<i64>> {
        notation::parse(input).unwrap()
    }

    fn assert_valid(sorted: &Graph<i64, Option<i64>>, original: &Graph<i64, Option<i64>>) {
        assert_eq!(sorted.vertex_count(), original.vertex_count());
        assert_eq!(sorted.edge_count(), original.edge_count());

        for edge in sorted.edges() {
            assert!(
                edge.source().as_usize() < edge.target().as_usize(),
                "invalid topological order for {:?} -> {:?}",
                edge.source(),
                edge.target(),
            );
        }

        assert!(isomorphic(sorted, original));
    }

    #[test]
    fn chain_sorts_into_dependency_order() {
        let graph = parse("4->3->2->1");
        let sorted = graph.topsort().unwrap();

        let payloads = sorted
            .vertices()
            .map(|vertex| *vertex.payload())
            .collect::<Vec<_>>();
        assert_eq!(payloads, vec![4, 3, 2, 1]);
        assert_valid(&sorted, &graph);
    }

    #[test]
    fn cycle_has_no_order() {
        assert_eq!(parse("1->2->1").topsort(), Err(Cycle));
    }

    #[test]
    fn self_loop_has_no_order() {
        assert_eq!(parse("1->1").topsort(), Err(Cycle));
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        // Two paths reconverge on 4; the second visit of 4 is a cross edge.
        let graph = parse("1->2, 1->3, 2->4, 3->4");
        let sorted = graph.topsort().expect("diamond is acyclic");

        assert_valid(&sorted, &graph);
    }

    #[test]
    fn disconnected_dag_sorts() {
        let graph = parse("2->1, 4->3, 5");
        let sorted = graph.topsort().unwrap();

        assert_valid(&sorted, &graph);
    }

    #[test]
    fn cycle_behind_prefix_is_detected() {
        assert_eq!(parse("1->2->3->4->2").topsort(), Err(Cycle));
    }

    fn graph_parts() -> impl Strategy<Value = (Vec<i8>, Vec<(usize, usize, i8)>)> {
        (1..8usize).prop_flat_map(|count| {
            (
                proptest::collection::vec(any::<i8>(), count),
                proptest::collection::vec((0..count, 0..count, any::<i8>()), 0..16),
            )
        })
    }

    proptest! {
        #[test]
        #[ignore = "run property-based tests with `cargo test proptest_ -- --ignored`"]
        fn proptest_topsort_orders_every_edge((vertices, edges) in graph_parts()) {
            let graph = Graph::new(vertices, edges).unwrap();

            if let Ok(sorted) = graph.topsort() {
                prop_assert_eq!(sorted.vertex_count(), graph.vertex_count());
                for edge in sorted.edges() {
                    prop_assert!(edge.source().as_usize() < edge.target().as_usize());
                }
            }
        }

        #[test]
        #[ignore = "run property-based tests with `cargo test proptest_ -- --ignored`"]
        fn proptest_topsort_of_forward_edges_succeeds(
            (vertices, edges) in graph_parts().prop_map(|(vertices, edges)| {
                // Forcing source < target makes the input acyclic.
                let edges = edges
                    .into_iter()
                    .filter(|(source, target, _)| source < target)
                    .collect::<Vec<_>>();
                (vertices, edges)
            })
        ) {
            let graph = Graph::new(vertices, edges).unwrap();
            prop_assert!(graph.topsort().is_ok());
        }
    }
}
