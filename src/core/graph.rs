//! The directed multigraph model.
//!
//! A [`Graph`] owns two arenas: an ordered sequence of vertices and an ordered
//! sequence of edges. Ids are positions in these arenas. The adjacency lists
//! of every vertex are computed in a single pass at construction time and are
//! never incrementally maintained: every operation that changes structure
//! builds fresh arenas and runs the construction pass again.
//!
//! A graph is treated as a value. The public surface never mutates an
//! existing graph; transformations (see [`ops`](crate::ops)) and algorithms
//! (see [`algo`](crate::algo)) return new instances that share no structural
//! state with their input. Read-only access from multiple threads needs no
//! synchronization.

use std::{hash::Hash, ops::Index, slice};

use rustc_hash::FxHashMap;

use super::{
    error::{BuildError, BuildErrorKind},
    id::{EdgeId, VertexId},
    marker::Direction,
};

/// A vertex with an opaque payload and its incident edges.
///
/// The adjacency lists hold edge ids in edge-sequence order. They are always
/// present; a vertex with no incident edges has empty lists.
#[derive(Debug, Clone)]
pub struct Vertex<V> {
    pub(crate) payload: V,
    pub(crate) outgoing: Vec<EdgeId>,
    pub(crate) incoming: Vec<EdgeId>,
}

impl<V> Vertex<V> {
    pub fn payload(&self) -> &V {
        &self.payload
    }

    /// Edges whose source is this vertex, in edge-sequence order.
    pub fn outgoing(&self) -> &[EdgeId] {
        &self.outgoing
    }

    /// Edges whose target is this vertex, in edge-sequence order.
    pub fn incoming(&self) -> &[EdgeId] {
        &self.incoming
    }
}

/// A directed arc between two vertices of the same graph snapshot.
///
/// Edges have no identity beyond (source, target, payload); parallel edges
/// and self-loops are allowed.
#[derive(Debug, Clone)]
pub struct Edge<E> {
    pub(crate) source: VertexId,
    pub(crate) target: VertexId,
    pub(crate) payload: E,
}

impl<E> Edge<E> {
    pub fn source(&self) -> VertexId {
        self.source
    }

    pub fn target(&self) -> VertexId {
        self.target
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }
}

/// Directed multigraph with payload-carrying vertices and edges.
#[derive(Debug, Clone)]
pub struct Graph<V, E> {
    pub(crate) vertices: Vec<Vertex<V>>,
    pub(crate) edges: Vec<Edge<E>>,
}

impl<V, E> Graph<V, E> {
    /// Creates a graph from an explicit vertex payload list and an edge list
    /// of `(source, target, payload)` index triples.
    ///
    /// Fails if an edge references a vertex index that is out of range of the
    /// vertex list.
    ///
    /// # Examples
    ///
    /// ```
    /// use skein::Graph;
    ///
    /// let graph = Graph::new(vec!["a", "b"], vec![(0, 1, ())]).unwrap();
    /// assert_eq!(graph.vertex_count(), 2);
    /// assert_eq!(graph.edge_count(), 1);
    /// ```
    pub fn new(vertices: Vec<V>, edges: Vec<(usize, usize, E)>) -> Result<Self, BuildError> {
        let bound = vertices.len();
        let mut arcs = Vec::with_capacity(edges.len());

        for (position, (source, target, payload)) in edges.into_iter().enumerate() {
            if source >= bound {
                return Err(BuildError::new(BuildErrorKind::SourceAbsent { edge: position }));
            }
            if target >= bound {
                return Err(BuildError::new(BuildErrorKind::TargetAbsent { edge: position }));
            }
            arcs.push(Edge {
                source: VertexId::new(source),
                target: VertexId::new(target),
                payload,
            });
        }

        Ok(Self::build(vertices, arcs))
    }

    /// Creates a graph from an edge list alone.
    ///
    /// The vertex set is inferred as the distinct endpoint values in the
    /// order each is first seen while scanning the edges left to right,
    /// source before target.
    pub fn from_edges<I>(edges: I) -> Self
    where
        V: Eq + Hash + Clone,
        I: IntoIterator<Item = (V, V, E)>,
    {
        let mut indices = FxHashMap::default();
        let mut payloads = Vec::new();
        let mut arcs = Vec::new();

        for (source, target, payload) in edges {
            let source = intern(&mut indices, &mut payloads, source);
            let target = intern(&mut indices, &mut payloads, target);
            arcs.push(Edge {
                source,
                target,
                payload,
            });
        }

        Self::build(payloads, arcs)
    }

    /// The single place where indexing and adjacency are established. Callers
    /// must pass edges whose endpoints are in range of the payload list;
    /// transformations guarantee this by construction.
    pub(crate) fn build(payloads: Vec<V>, edges: Vec<Edge<E>>) -> Self {
        let mut vertices = payloads
            .into_iter()
            .map(|payload| Vertex {
                payload,
                outgoing: Vec::new(),
                incoming: Vec::new(),
            })
            .collect::<Vec<_>>();

        for (position, edge) in edges.iter().enumerate() {
            debug_assert!(edge.source.as_usize() < vertices.len());
            debug_assert!(edge.target.as_usize() < vertices.len());

            let id = EdgeId::new(position);
            vertices[edge.source.as_usize()].outgoing.push(id);
            vertices[edge.target.as_usize()].incoming.push(id);
        }

        Self { vertices, edges }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Vertices in index order.
    pub fn vertices(&self) -> slice::Iter<'_, Vertex<V>> {
        self.vertices.iter()
    }

    /// Edges in sequence order.
    pub fn edges(&self) -> slice::Iter<'_, Edge<E>> {
        self.edges.iter()
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> {
        (0..self.vertices.len()).map(VertexId::new)
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> {
        (0..self.edges.len()).map(EdgeId::new)
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex<V>> {
        self.vertices.get(id.as_usize())
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge<E>> {
        self.edges.get(id.as_usize())
    }

    /// Neighbors reachable over edges incident to `vertex` in the given
    /// direction, one entry per edge (parallel edges repeat the neighbor).
    pub fn neighbors_directed(
        &self,
        vertex: VertexId,
        dir: Direction,
    ) -> impl Iterator<Item = VertexId> + '_ {
        let incident: &[EdgeId] = match dir {
            Direction::Outgoing => &self[vertex].outgoing,
            Direction::Incoming => &self[vertex].incoming,
        };

        incident.iter().map(move |&id| {
            let edge = &self.edges[id.as_usize()];
            match dir {
                Direction::Outgoing => edge.target,
                Direction::Incoming => edge.source,
            }
        })
    }

    /// Neighbors over incident edges in both directions: targets of outgoing
    /// edges first, then sources of incoming edges.
    pub fn neighbors_undirected(&self, vertex: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.neighbors_directed(vertex, Direction::Outgoing)
            .chain(self.neighbors_directed(vertex, Direction::Incoming))
    }

    /// Id of the first vertex whose payload equals the given value.
    pub fn find_vertex(&self, payload: &V) -> Option<VertexId>
    where
        V: PartialEq,
    {
        self.vertices
            .iter()
            .position(|vertex| vertex.payload == *payload)
            .map(VertexId::new)
    }

    pub fn contains(&self, payload: &V) -> bool
    where
        V: PartialEq,
    {
        self.find_vertex(payload).is_some()
    }

    pub fn contains_edge(&self, payload: &E) -> bool
    where
        E: PartialEq,
    {
        self.edges.iter().any(|edge| edge.payload == *payload)
    }
}

fn intern<V>(
    indices: &mut FxHashMap<V, VertexId>,
    payloads: &mut Vec<V>,
    value: V,
) -> VertexId
where
    V: Eq + Hash + Clone,
{
    *indices.entry(value.clone()).or_insert_with(|| {
        payloads.push(value);
        VertexId::new(payloads.len() - 1)
    })
}

impl<V, E> Index<VertexId> for Graph<V, E> {
    type Output = Vertex<V>;

    fn index(&self, id: VertexId) -> &Self::Output {
        &self.vertices[id.as_usize()]
    }
}

impl<V, E> Index<EdgeId> for Graph<V, E> {
    type Output = Edge<E>;

    fn index(&self, id: EdgeId) -> &Self::Output {
        &self.edges[id.as_usize()]
    }
}
