use std::mem;

use crate::core::{
    graph::Graph,
    id::VertexId,
    marker::Direction,
};

use super::Follow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Per-vertex traversal state exposed to the [`Dfs`] hooks.
///
/// Every vertex is in one of three states: undiscovered, active (discovered
/// and still on the traversal path) or finished. The distinction between
/// active and finished is what separates a back edge (cycle) from a cross
/// edge (harmless reconvergence), so hooks that care about cycles must test
/// [`is_active`](VisitState::is_active), not [`is_discovered`](VisitState::is_discovered).
#[derive(Debug)]
pub struct VisitState {
    colors: Vec<Color>,
}

impl VisitState {
    fn new(vertex_count: usize) -> Self {
        Self {
            colors: vec![Color::White; vertex_count],
        }
    }

    /// Returns `true` if the vertex has been discovered, whether or not it
    /// has been finished since.
    pub fn is_discovered(&self, vertex: VertexId) -> bool {
        self.colors[vertex.as_usize()] != Color::White
    }

    /// Returns `true` if the vertex is on the current traversal path.
    pub fn is_active(&self, vertex: VertexId) -> bool {
        self.colors[vertex.as_usize()] == Color::Gray
    }

    /// Returns `true` if the vertex and all its descendants are done.
    pub fn is_finished(&self, vertex: VertexId) -> bool {
        self.colors[vertex.as_usize()] == Color::Black
    }

    fn discover(&mut self, vertex: VertexId) {
        self.colors[vertex.as_usize()] = Color::Gray;
    }

    fn finish(&mut self, vertex: VertexId) {
        self.colors[vertex.as_usize()] = Color::Black;
    }
}

struct Frame {
    vertex: VertexId,
    // Materialized lazily when the vertex is discovered.
    neighbors: Vec<VertexId>,
    cursor: usize,
}

impl Frame {
    fn new(vertex: VertexId) -> Self {
        Self {
            vertex,
            neighbors: Vec::new(),
            cursor: 0,
        }
    }
}

type RootHook = fn(VertexId);
type CheckHook = fn(&VisitState, VertexId) -> bool;

fn root_noop(_: VertexId) {}

fn check_never(_: &VisitState, _: VertexId) -> bool {
    false
}

/// Depth-first traversal of a graph, configured through a builder.
///
/// The traversal scans the given roots (all vertices by default, in index
/// order) and runs a depth-first walk from every root that is still
/// undiscovered. Four optional hooks observe the walk:
///
/// * `on_enter_root` fires before a fresh root is descended into,
/// * `on_discover` fires when a vertex is first visited; returning `true`
///   terminates the traversal and yields that vertex,
/// * `on_finish` fires when a vertex has no unvisited neighbors left;
///   returning `true` terminates likewise,
/// * `on_exit_root` fires when the walk from a root is exhausted.
///
/// Parallel edges are tolerated: a neighbor that is already discovered is
/// never descended into again.
///
/// # Examples
///
/// ```
/// use skein::{visit::{Dfs, Follow}, Graph};
///
/// let graph = Graph::new(vec!["a", "b", "c"], vec![(0, 1, ()), (1, 2, ())]).unwrap();
///
/// let mut order = Vec::new();
/// Dfs::on(&graph)
///     .follow(Follow::Outgoing)
///     .on_discover(|_, vertex| {
///         order.push(vertex);
///         false
///     })
///     .run();
///
/// assert_eq!(order.len(), 3);
/// ```
pub struct Dfs<'a, V, E, Enter, Discover, Finish, Exit> {
    graph: &'a Graph<V, E>,
    follow: Follow,
    roots: Vec<VertexId>,
    on_enter_root: Enter,
    on_discover: Discover,
    on_finish: Finish,
    on_exit_root: Exit,
}

impl<'a, V, E> Dfs<'a, V, E, RootHook, CheckHook, CheckHook, RootHook> {
    pub fn on(graph: &'a Graph<V, E>) -> Self {
        Self {
            graph,
            follow: Follow::Outgoing,
            roots: graph.vertex_ids().collect(),
            on_enter_root: root_noop,
            on_discover: check_never,
            on_finish: check_never,
            on_exit_root: root_noop,
        }
    }
}

impl<'a, V, E, Enter, Discover, Finish, Exit> Dfs<'a, V, E, Enter, Discover, Finish, Exit> {
    pub fn follow(mut self, follow: Follow) -> Self {
        self.follow = follow;
        self
    }

    /// Replaces the default root collection (all vertices in index order).
    pub fn roots(mut self, roots: impl IntoIterator<Item = VertexId>) -> Self {
        self.roots = roots.into_iter().collect();
        self
    }

    pub fn on_enter_root<F>(self, hook: F) -> Dfs<'a, V, E, F, Discover, Finish, Exit>
    where
        F: FnMut(VertexId),
    {
        Dfs {
            graph: self.graph,
            follow: self.follow,
            roots: self.roots,
            on_enter_root: hook,
            on_discover: self.on_discover,
            on_finish: self.on_finish,
            on_exit_root: self.on_exit_root,
        }
    }

    pub fn on_discover<F>(self, hook: F) -> Dfs<'a, V, E, Enter, F, Finish, Exit>
    where
        F: FnMut(&VisitState, VertexId) -> bool,
    {
        Dfs {
            graph: self.graph,
            follow: self.follow,
            roots: self.roots,
            on_enter_root: self.on_enter_root,
            on_discover: hook,
            on_finish: self.on_finish,
            on_exit_root: self.on_exit_root,
        }
    }

    pub fn on_finish<F>(self, hook: F) -> Dfs<'a, V, E, Enter, Discover, F, Exit>
    where
        F: FnMut(&VisitState, VertexId) -> bool,
    {
        Dfs {
            graph: self.graph,
            follow: self.follow,
            roots: self.roots,
            on_enter_root: self.on_enter_root,
            on_discover: self.on_discover,
            on_finish: hook,
            on_exit_root: self.on_exit_root,
        }
    }

    pub fn on_exit_root<F>(self, hook: F) -> Dfs<'a, V, E, Enter, Discover, Finish, F>
    where
        F: FnMut(VertexId),
    {
        Dfs {
            graph: self.graph,
            follow: self.follow,
            roots: self.roots,
            on_enter_root: self.on_enter_root,
            on_discover: self.on_discover,
            on_finish: self.on_finish,
            on_exit_root: hook,
        }
    }

    /// Runs the traversal to completion, or up to the first vertex for which
    /// `on_discover` or `on_finish` returned `true`.
    pub fn run(mut self) -> Option<VertexId>
    where
        Enter: FnMut(VertexId),
        Discover: FnMut(&VisitState, VertexId) -> bool,
        Finish: FnMut(&VisitState, VertexId) -> bool,
        Exit: FnMut(VertexId),
    {
        let graph = self.graph;
        let mut state = VisitState::new(graph.vertex_count());
        let mut stack: Vec<Frame> = Vec::new();
        let roots = mem::take(&mut self.roots);

        for root in roots {
            if state.is_discovered(root) {
                continue;
            }

            (self.on_enter_root)(root);
            stack.clear();
            stack.push(Frame::new(root));

            while !stack.is_empty() {
                let top = stack.len() - 1;
                let vertex = stack[top].vertex;

                if !state.is_discovered(vertex) {
                    state.discover(vertex);
                    stack[top].neighbors = match self.follow {
                        Follow::Outgoing => graph
                            .neighbors_directed(vertex, Direction::Outgoing)
                            .collect(),
                        Follow::Incoming => graph
                            .neighbors_directed(vertex, Direction::Incoming)
                            .collect(),
                        Follow::Undirected => graph.neighbors_undirected(vertex).collect(),
                    };

                    if (self.on_discover)(&state, vertex) {
                        return Some(vertex);
                    }
                }

                let mut descend = None;
                let frame = &mut stack[top];
                while let Some(&neighbor) = frame.neighbors.get(frame.cursor) {
                    frame.cursor += 1;
                    if !state.is_discovered(neighbor) {
                        descend = Some(neighbor);
                        break;
                    }
                }

                match descend {
                    Some(neighbor) => stack.push(Frame::new(neighbor)),
                    None => {
                        if (self.on_finish)(&state, vertex) {
                            return Some(vertex);
                        }
                        stack.pop();
                        state.finish(vertex);
                    }
                }
            }

            (self.on_exit_root)(root);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> Graph<&'static str, ()> {
        // 0 -> 1 -> 3, 0 -> 2 -> 3
        Graph::new(
            vec!["a", "b", "c", "d"],
            vec![(0, 1, ()), (0, 2, ()), (1, 3, ()), (2, 3, ())],
        )
        .unwrap()
    }

    fn ids(indices: &[usize]) -> Vec<VertexId> {
        indices.iter().copied().map(VertexId::new).collect()
    }

    #[test]
    fn discover_order_is_depth_first() {
        let graph = diamond();

        let mut order = Vec::new();
        let terminated = Dfs::on(&graph)
            .on_discover(|_, vertex| {
                order.push(vertex);
                false
            })
            .run();

        assert_eq!(terminated, None);
        assert_eq!(order, ids(&[0, 1, 3, 2]));
    }

    #[test]
    fn finish_order_is_post_order() {
        let graph = diamond();

        let mut order = Vec::new();
        Dfs::on(&graph)
            .on_finish(|_, vertex| {
                order.push(vertex);
                false
            })
            .run();

        assert_eq!(order, ids(&[3, 1, 2, 0]));
    }

    #[test]
    fn discover_short_circuits() {
        let graph = diamond();

        let mut seen = Vec::new();
        let found = Dfs::on(&graph)
            .on_discover(|_, vertex| {
                seen.push(vertex);
                vertex == VertexId::new(1)
            })
            .run();

        assert_eq!(found, Some(VertexId::new(1)));
        assert_eq!(seen, ids(&[0, 1]));
    }

    #[test]
    fn roots_are_skipped_once_discovered() {
        // Two components: 0 -> 1 and 2.
        let graph = Graph::new(vec![(), (), ()], vec![(0, 1, ())]).unwrap();

        let mut entered = Vec::new();
        let mut exited = Vec::new();
        Dfs::on(&graph)
            .on_enter_root(|root| entered.push(root))
            .on_exit_root(|root| exited.push(root))
            .run();

        // Vertex 1 is reached from root 0 and never becomes a root itself.
        assert_eq!(entered, ids(&[0, 2]));
        assert_eq!(exited, ids(&[0, 2]));
    }

    #[test]
    fn incoming_follow_walks_against_edges() {
        let graph = Graph::new(vec![(), (), ()], vec![(0, 1, ()), (1, 2, ())]).unwrap();

        let mut order = Vec::new();
        Dfs::on(&graph)
            .follow(Follow::Incoming)
            .roots([VertexId::new(2)])
            .on_discover(|_, vertex| {
                order.push(vertex);
                false
            })
            .run();

        assert_eq!(order, ids(&[2, 1, 0]));
    }

    #[test]
    fn undirected_follow_crosses_both_directions() {
        // 1 -> 0, 1 -> 2: reaching 2 from 0 needs an incoming hop.
        let graph = Graph::new(vec![(), (), ()], vec![(1, 0, ()), (1, 2, ())]).unwrap();

        let mut order = Vec::new();
        Dfs::on(&graph)
            .follow(Follow::Undirected)
            .roots([VertexId::new(0)])
            .on_discover(|_, vertex| {
                order.push(vertex);
                false
            })
            .run();

        assert_eq!(order, ids(&[0, 1, 2]));
    }

    #[test]
    fn parallel_edges_do_not_revisit() {
        let graph =
            Graph::new(vec![(), ()], vec![(0, 1, ()), (0, 1, ()), (1, 0, ())]).unwrap();

        let mut discovered = Vec::new();
        Dfs::on(&graph)
            .on_discover(|_, vertex| {
                discovered.push(vertex);
                false
            })
            .run();

        assert_eq!(discovered, ids(&[0, 1]));
    }

    #[test]
    fn deep_path_traversal_completes() {
        let count = 50_000;
        let edges = (0..count - 1).map(|i| (i, i + 1, ())).collect::<Vec<_>>();
        let graph = Graph::new(vec![(); count], edges).unwrap();

        let mut finished = 0usize;
        Dfs::on(&graph)
            .on_finish(|_, _| {
                finished += 1;
                false
            })
            .run();

        assert_eq!(finished, count);
    }

    #[test]
    fn active_state_tracks_current_path() {
        // 0 -> 1 -> 2 -> 0 cycle: at discovery of 2, both 0 and 1 are active.
        let graph =
            Graph::new(vec![(), (), ()], vec![(0, 1, ()), (1, 2, ()), (2, 0, ())]).unwrap();

        let found = Dfs::on(&graph)
            .on_discover(|state, vertex| {
                vertex == VertexId::new(2)
                    && state.is_active(VertexId::new(0))
                    && state.is_active(VertexId::new(1))
            })
            .run();

        assert_eq!(found, Some(VertexId::new(2)));
    }
}
