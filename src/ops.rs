//! Structure-preserving transformations.
//!
//! Every operation here consumes the receiver by reference and produces a new
//! [`Graph`] with freshly indexed vertices and edges; input and output share
//! no structural state. All outputs are routed through the single
//! construction pass, which is where the adjacency invariant is
//! re-established.

use std::hash::Hash;

use fixedbitset::FixedBitSet;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::core::{
    graph::{Edge, Graph},
    id::VertexId,
};

impl<V, E> Graph<V, E> {
    /// Creates a new graph with every vertex payload passed through
    /// `vertex_fn` and every edge payload through `edge_fn`, keeping the
    /// topology, vertex order and edge order of the receiver.
    pub fn map<V2, E2, VF, EF>(&self, mut vertex_fn: VF, mut edge_fn: EF) -> Graph<V2, E2>
    where
        VF: FnMut(&V) -> V2,
        EF: FnMut(&E) -> E2,
    {
        let payloads = self
            .vertices
            .iter()
            .map(|vertex| vertex_fn(&vertex.payload))
            .collect();
        let edges = self
            .edges
            .iter()
            .map(|edge| Edge {
                source: edge.source,
                target: edge.target,
                payload: edge_fn(&edge.payload),
            })
            .collect();

        Graph::build(payloads, edges)
    }

    /// [`map`](Graph::map) over vertex payloads only.
    pub fn map_vertices<V2, VF>(&self, vertex_fn: VF) -> Graph<V2, E>
    where
        E: Clone,
        VF: FnMut(&V) -> V2,
    {
        self.map(vertex_fn, E::clone)
    }

    /// [`map`](Graph::map) over edge payloads only.
    pub fn map_edges<E2, EF>(&self, edge_fn: EF) -> Graph<V, E2>
    where
        V: Clone,
        EF: FnMut(&E) -> E2,
    {
        self.map(V::clone, edge_fn)
    }

    /// Creates a new graph with the vertices accepted by `vertex_pred` and
    /// the edges accepted by `edge_pred`.
    ///
    /// Removing a vertex removes all its incident edges; the edge predicate
    /// is consulted only for edges whose both endpoints survive. The
    /// relative order of survivors is preserved.
    pub fn filter<VP, EP>(&self, mut vertex_pred: VP, mut edge_pred: EP) -> Self
    where
        V: Clone,
        E: Clone,
        VP: FnMut(VertexId, &V) -> bool,
        EP: FnMut(&Edge<E>) -> bool,
    {
        let (keep, remap, payloads) = self.surviving_vertices(&mut vertex_pred);

        let mut edges = Vec::new();
        for edge in &self.edges {
            if keep.contains(edge.source.as_usize())
                && keep.contains(edge.target.as_usize())
                && edge_pred(edge)
            {
                edges.push(Edge {
                    source: remap[edge.source.as_usize()],
                    target: remap[edge.target.as_usize()],
                    payload: edge.payload.clone(),
                });
            }
        }

        Graph::build(payloads, edges)
    }

    /// [`filter`](Graph::filter) with an always-true edge predicate.
    pub fn filter_vertices<VP>(&self, vertex_pred: VP) -> Self
    where
        V: Clone,
        E: Clone,
        VP: FnMut(VertexId, &V) -> bool,
    {
        self.filter(vertex_pred, |_| true)
    }

    /// [`filter`](Graph::filter) with an always-true vertex predicate.
    pub fn filter_edges<EP>(&self, edge_pred: EP) -> Self
    where
        V: Clone,
        E: Clone,
        EP: FnMut(&Edge<E>) -> bool,
    {
        self.filter(|_, _| true, edge_pred)
    }

    /// Like [`filter`](Graph::filter), but every removed vertex is contracted:
    /// for each pair of one incoming and one outgoing edge of the removed
    /// vertex, a new edge from the incoming edge's source to the outgoing
    /// edge's target is synthesized with payload `merge(incoming, outgoing)`.
    ///
    /// A synthesized edge is included iff both of its endpoints survive and
    /// `edge_pred` accepts it. Contraction is a single hop: a chain of
    /// removed vertices is not chased transitively, so bridging across a run
    /// of removed vertices requires applying `propagate` repeatedly.
    pub fn propagate<VP, EP, M>(&self, mut vertex_pred: VP, mut edge_pred: EP, mut merge: M) -> Self
    where
        V: Clone,
        E: Clone,
        VP: FnMut(VertexId, &V) -> bool,
        EP: FnMut(&Edge<E>) -> bool,
        M: FnMut(&E, &E) -> E,
    {
        let (keep, remap, payloads) = self.surviving_vertices(&mut vertex_pred);

        let mut edges = Vec::new();
        for edge in &self.edges {
            if keep.contains(edge.source.as_usize())
                && keep.contains(edge.target.as_usize())
                && edge_pred(edge)
            {
                edges.push(Edge {
                    source: remap[edge.source.as_usize()],
                    target: remap[edge.target.as_usize()],
                    payload: edge.payload.clone(),
                });
            }
        }

        for (index, vertex) in self.vertices.iter().enumerate() {
            if keep.contains(index) {
                continue;
            }

            for &incoming in &vertex.incoming {
                for &outgoing in &vertex.outgoing {
                    let parent = &self.edges[incoming.as_usize()];
                    let child = &self.edges[outgoing.as_usize()];
                    let bridge = Edge {
                        source: parent.source,
                        target: child.target,
                        payload: merge(&parent.payload, &child.payload),
                    };

                    if keep.contains(bridge.source.as_usize())
                        && keep.contains(bridge.target.as_usize())
                        && edge_pred(&bridge)
                    {
                        edges.push(Edge {
                            source: remap[bridge.source.as_usize()],
                            target: remap[bridge.target.as_usize()],
                            payload: bridge.payload,
                        });
                    }
                }
            }
        }

        Graph::build(payloads, edges)
    }

    /// Creates a new graph with all vertices except those whose payload
    /// equals the given value.
    pub fn remove(&self, payload: &V) -> Self
    where
        V: PartialEq + Clone,
        E: Clone,
    {
        self.filter_vertices(|_, candidate| candidate != payload)
    }

    /// Creates a new graph with all edges except those whose payload equals
    /// the given value.
    pub fn remove_edges(&self, payload: &E) -> Self
    where
        V: Clone,
        E: PartialEq + Clone,
    {
        self.filter_edges(|edge| edge.payload() != payload)
    }

    /// Creates a new graph with every edge's source and target swapped.
    pub fn invert(&self) -> Self
    where
        V: Clone,
        E: Clone,
    {
        let payloads = self
            .vertices
            .iter()
            .map(|vertex| vertex.payload.clone())
            .collect();
        let edges = self
            .edges
            .iter()
            .map(|edge| Edge {
                source: edge.target,
                target: edge.source,
                payload: edge.payload.clone(),
            })
            .collect();

        Graph::build(payloads, edges)
    }

    /// Collapses every payload-equality class of vertices into a single
    /// vertex, in first-occurrence order, rewriting edges to point at the
    /// representatives. Parallel edges arising from the collapse are kept.
    pub fn distinct(&self) -> Self
    where
        V: Eq + Hash + Clone,
        E: Clone,
    {
        let mut classes: FxHashMap<&V, VertexId> = FxHashMap::default();
        let mut remap = Vec::with_capacity(self.vertices.len());
        let mut payloads = Vec::new();

        for vertex in &self.vertices {
            let representative = *classes.entry(&vertex.payload).or_insert_with(|| {
                payloads.push(vertex.payload.clone());
                VertexId::new(payloads.len() - 1)
            });
            remap.push(representative);
        }

        let edges = self
            .edges
            .iter()
            .map(|edge| Edge {
                source: remap[edge.source.as_usize()],
                target: remap[edge.target.as_usize()],
                payload: edge.payload.clone(),
            })
            .collect();

        Graph::build(payloads, edges)
    }

    /// Creates a new graph keeping at most one edge per (source, target,
    /// payload) triple; the first occurrence survives. The vertex set is
    /// unchanged.
    pub fn distinct_edges(&self) -> Self
    where
        V: Clone,
        E: Eq + Hash + Clone,
    {
        let mut seen: FxHashSet<(VertexId, VertexId, &E)> = FxHashSet::default();
        let mut edges = Vec::new();

        for edge in &self.edges {
            if seen.insert((edge.source, edge.target, &edge.payload)) {
                edges.push(edge.clone());
            }
        }

        let payloads = self
            .vertices
            .iter()
            .map(|vertex| vertex.payload.clone())
            .collect();

        Graph::build(payloads, edges)
    }

    /// Narrowing filter: keeps a vertex iff `cast` produces a payload of the
    /// narrower type, dropping the incident edges of rejected vertices.
    ///
    /// This is the value-level counterpart of a runtime downcast for graphs
    /// whose vertex payload carries a tagged or variant type.
    pub fn narrow<T, F>(&self, mut cast: F) -> Graph<T, E>
    where
        E: Clone,
        F: FnMut(&V) -> Option<T>,
    {
        let mut keep = FixedBitSet::with_capacity(self.vertices.len());
        let mut remap = vec![VertexId::new(0); self.vertices.len()];
        let mut payloads = Vec::new();

        for (index, vertex) in self.vertices.iter().enumerate() {
            if let Some(narrowed) = cast(&vertex.payload) {
                keep.insert(index);
                remap[index] = VertexId::new(payloads.len());
                payloads.push(narrowed);
            }
        }

        let mut edges = Vec::new();
        for edge in &self.edges {
            if keep.contains(edge.source.as_usize()) && keep.contains(edge.target.as_usize()) {
                edges.push(Edge {
                    source: remap[edge.source.as_usize()],
                    target: remap[edge.target.as_usize()],
                    payload: edge.payload.clone(),
                });
            }
        }

        Graph::build(payloads, edges)
    }

    fn surviving_vertices(
        &self,
        vertex_pred: &mut impl FnMut(VertexId, &V) -> bool,
    ) -> (FixedBitSet, Vec<VertexId>, Vec<V>)
    where
        V: Clone,
    {
        let mut keep = FixedBitSet::with_capacity(self.vertices.len());
        // Entries of removed vertices are never read; keep guards them.
        let mut remap = vec![VertexId::new(0); self.vertices.len()];
        let mut payloads = Vec::new();

        for (index, vertex) in self.vertices.iter().enumerate() {
            if vertex_pred(VertexId::new(index), &vertex.payload) {
                keep.insert(index);
                remap[index] = VertexId::new(payloads.len());
                payloads.push(vertex.payload.clone());
            }
        }

        (keep, remap, payloads)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::algo::iso::isomorphic;
    use crate::infra::notation;

    use super::*;

    fn parse(input: &str) -> Graph<i64, Option<i64>> {
        notation::parse(input).unwrap()
    }

    #[test]
    fn identity_map_preserves_structure() {
        let graph = parse("1 -/3/-> 2 -/2/-> 3 -> 4 -/4/-> 2");
        let mapped = graph.map(|v| *v, |e| *e);

        assert_eq!(mapped.vertex_count(), graph.vertex_count());
        assert_eq!(mapped.edge_count(), graph.edge_count());
        for (original, copy) in graph.edges().zip(mapped.edges()) {
            assert_eq!(original.source(), copy.source());
            assert_eq!(original.target(), copy.target());
        }
        assert!(isomorphic(&graph, &mapped));
    }

    #[test]
    fn map_replaces_payloads() {
        let graph = parse("1 -/10/-> 2");
        let mapped = graph.map(|v| v * 2, |e| e.map(|p| p + 1));

        assert!(mapped.contains(&2));
        assert!(mapped.contains(&4));
        assert!(mapped.contains_edge(&Some(11)));
    }

    #[test]
    fn filter_drops_incident_edges() {
        let graph = parse("1->2, 2->3, 1->3");
        let filtered = graph.filter_vertices(|_, payload| *payload != 2);

        assert_eq!(filtered.vertex_count(), 2);
        assert_eq!(filtered.edge_count(), 1);
        for edge in filtered.edges() {
            assert_ne!(*filtered[edge.source()].payload(), 2);
            assert_ne!(*filtered[edge.target()].payload(), 2);
        }
    }

    #[test]
    fn filter_edge_pred_applies_to_surviving_edges() {
        let graph = parse("1 -/5/-> 2 -/6/-> 3");
        let filtered = graph.filter(|_, _| true, |edge| edge.payload() != &Some(5));

        assert_eq!(filtered.vertex_count(), 3);
        assert_eq!(filtered.edge_count(), 1);
        assert!(filtered.contains_edge(&Some(6)));
    }

    #[test]
    fn propagate_bridges_one_hop() {
        let graph = parse("1 -/3/-> 2 -/2/-> 3 -> 4 -/4/-> 2");
        let contracted = graph.propagate(
            |_, payload| *payload != 2,
            |_| true,
            |parent, child| Some(parent.unwrap_or(1) * child.unwrap_or(1)),
        );

        assert!(isomorphic(&contracted, &parse("1 -/6/-> 3 -> 4 -/8/-> 3")));
    }

    #[test]
    fn propagate_does_not_chase_removed_chains() {
        // Both inner vertices are removed; the bridge through each lands on
        // the other removed vertex and vanishes.
        let graph = parse("1 -/2/-> 2 -/3/-> 3 -/5/-> 4");
        let contracted = graph.propagate(
            |_, payload| *payload == 1 || *payload == 4,
            |_| true,
            |parent, child| Some(parent.unwrap_or(1) * child.unwrap_or(1)),
        );

        assert_eq!(contracted.vertex_count(), 2);
        assert_eq!(contracted.edge_count(), 0);
    }

    #[test]
    fn distinct_merges_by_payload() {
        let graph = parse("1 -/6/-> 5->6, 0->4 -/7/-> 7").map_vertices(|v| v / 2);
        let collapsed = graph.distinct();

        assert!(isomorphic(
            &collapsed,
            &parse("0->2->3, 0 -/6/-> 2 -/7/-> 3")
        ));
    }

    #[test]
    fn distinct_edges_deduplicates_triples() {
        let graph = parse("1->2->2->1, 1->2");
        let deduped = graph.distinct_edges();

        assert!(isomorphic(&deduped, &parse("1->2->2->1")));
    }

    #[test]
    fn distinct_edges_keeps_payload_variants() {
        let graph = parse("1 -/1/-> 2, 1 -/2/-> 2, 1 -/1/-> 2");
        let deduped = graph.distinct_edges();

        assert_eq!(deduped.edge_count(), 2);
    }

    #[test]
    fn invert_is_involutive() {
        let graph = parse("1 -/3/-> 2 -/2/-> 3 -> 4 -/4/-> 2, 9");
        assert!(isomorphic(&graph.invert().invert(), &graph));
    }

    #[test]
    fn invert_swaps_endpoints() {
        let graph = parse("1->2");
        let inverted = graph.invert();

        let edge = inverted.edges().next().unwrap();
        assert_eq!(*inverted[edge.source()].payload(), 2);
        assert_eq!(*inverted[edge.target()].payload(), 1);
    }

    #[test]
    fn remove_filters_by_value() {
        let graph = parse("1->2->3");
        let removed = graph.remove(&2);

        assert!(!removed.contains(&2));
        assert_eq!(removed.edge_count(), 0);
    }

    #[test]
    fn remove_edges_filters_by_value() {
        let graph = parse("1 -/7/-> 2 -> 3");
        let removed = graph.remove_edges(&Some(7));

        assert_eq!(removed.vertex_count(), 3);
        assert_eq!(removed.edge_count(), 1);

        // Null payloads compare equal to each other.
        let removed = graph.remove_edges(&None);
        assert_eq!(removed.edge_count(), 1);
        assert!(removed.contains_edge(&Some(7)));
    }

    #[test]
    fn narrow_keeps_castable_payloads() {
        #[derive(Debug, Clone, PartialEq)]
        enum Token {
            Number(i64),
            Word(&'static str),
        }

        let graph = Graph::new(
            vec![Token::Number(1), Token::Word("x"), Token::Number(3)],
            vec![(0, 1, ()), (1, 2, ()), (0, 2, ())],
        )
        .unwrap();

        let numbers = graph.narrow(|payload| match payload {
            Token::Number(value) => Some(*value),
            Token::Word(_) => None,
        });

        assert_eq!(numbers.vertex_count(), 2);
        assert_eq!(numbers.edge_count(), 1);
        assert!(numbers.contains(&1));
        assert!(numbers.contains(&3));
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
        fn proptest_identity_map_is_isomorphic((vertices, edges) in graph_parts()) {
            let graph = Graph::new(vertices, edges).unwrap();
            let mapped = graph.map(|v| *v, |e| *e);

            prop_assert!(isomorphic(&graph, &mapped));
        }

        #[test]
        #[ignore = "run property-based tests with `cargo test proptest_ -- --ignored`"]
        fn proptest_invert_is_involutive((vertices, edges) in graph_parts()) {
            let graph = Graph::new(vertices, edges).unwrap();

            prop_assert!(isomorphic(&graph.invert().invert(), &graph));
        }

        #[test]
        #[ignore = "run property-based tests with `cargo test proptest_ -- --ignored`"]
        fn proptest_filter_keeps_no_incident_edges((vertices, edges) in graph_parts()) {
            let graph = Graph::new(vertices, edges).unwrap();
            let filtered = graph.filter_vertices(|_, payload| *payload >= 0);

            for edge in filtered.edges() {
                prop_assert!(*filtered[edge.source()].payload() >= 0);
                prop_assert!(*filtered[edge.target()].payload() >= 0);
            }
        }
    }
}
