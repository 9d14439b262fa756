//! Structural equality of graphs.
//!
//! Two graphs are equal iff there is a bijection between their vertex sets
//! that matches vertex payloads by value and, for every ordered vertex pair,
//! matches the multiset of edge payloads between the pair. This is graph
//! isomorphism restricted by payload equality.
//!
//! Cost, with `n` the vertex count:
//!
//! * best case O(n) — counts or checksum differ,
//! * typical case polynomial — payloads differentiate vertices and prune the
//!   search,
//! * worst case O(n! · n²) — all payloads equal.
//!
//! There is no built-in bound; callers needing bounded latency must impose a
//! vertex-count ceiling or an external time budget.

use std::hash::{Hash, Hasher};

use fixedbitset::FixedBitSet;
use rustc_hash::{FxHashMap, FxHasher};

use crate::core::graph::Graph;

/// Returns `true` if the graphs are structurally equal up to isomorphism and
/// payload value equality. See [module](self) documentation for the cost.
pub fn isomorphic<V, E>(lhs: &Graph<V, E>, rhs: &Graph<V, E>) -> bool
where
    V: PartialEq + Hash,
    E: PartialEq + Hash,
{
    if lhs.vertex_count() != rhs.vertex_count() || lhs.edge_count() != rhs.edge_count() {
        return false;
    }

    if checksum(lhs) != checksum(rhs) {
        return false;
    }

    let lhs_payloads = lhs
        .vertices()
        .map(|vertex| vertex.payload())
        .collect::<Vec<_>>();
    let rhs_payloads = rhs
        .vertices()
        .map(|vertex| vertex.payload())
        .collect::<Vec<_>>();

    let lhs_cells = edge_cells(lhs);
    let rhs_cells = edge_cells(rhs);

    any_bijection(
        lhs_payloads.len(),
        |row, column| lhs_payloads[row] == rhs_payloads[column],
        |mapping| {
            // Edge counts are equal, so matching every non-empty cell of one
            // side accounts for all edges of the other.
            lhs_cells.iter().all(|(&(source, target), payloads)| {
                match rhs_cells.get(&(mapping[source], mapping[target])) {
                    Some(images) => multiset_equal(payloads, images),
                    None => false,
                }
            })
        },
    )
}

/// Order-independent fingerprint of a graph: vertex and edge counts mixed
/// with the multiset sums of payload hashes.
///
/// Equal graphs (in the sense of [`isomorphic`]) have equal checksums; the
/// converse does not hold, which makes the checksum a cheap pre-filter.
pub fn checksum<V, E>(graph: &Graph<V, E>) -> u64
where
    V: Hash,
    E: Hash,
{
    let vertex_sum = graph
        .vertices()
        .map(|vertex| hash_one(vertex.payload()))
        .fold(0u64, u64::wrapping_add);
    let edge_sum = graph
        .edges()
        .map(|edge| hash_one(edge.payload()))
        .fold(0u64, u64::wrapping_add);

    let mut hasher = FxHasher::default();
    graph.vertex_count().hash(&mut hasher);
    graph.edge_count().hash(&mut hasher);
    vertex_sum.hash(&mut hasher);
    edge_sum.hash(&mut hasher);
    hasher.finish()
}

fn hash_one<T: Hash>(value: &T) -> u64 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

fn edge_cells<V, E>(graph: &Graph<V, E>) -> FxHashMap<(usize, usize), Vec<&E>> {
    let mut cells: FxHashMap<(usize, usize), Vec<&E>> = FxHashMap::default();

    for edge in graph.edges() {
        cells
            .entry((edge.source().as_usize(), edge.target().as_usize()))
            .or_default()
            .push(edge.payload());
    }

    cells
}

fn multiset_equal<E: PartialEq>(lhs: &[&E], rhs: &[&E]) -> bool {
    if lhs.len() != rhs.len() {
        return false;
    }

    match lhs.len() {
        0 => true,
        1 => lhs[0] == rhs[0],
        _ => any_bijection(lhs.len(), |row, column| lhs[row] == rhs[column], |_| true),
    }
}

/// Searches for a bijection of `0..size` onto itself such that every row is
/// mapped to a `compatible` column and the complete mapping passes `accept`.
///
/// Backtracking assigns columns row by row, skipping taken columns and
/// pruning rows with no compatible column left. The search is iterative; its
/// depth is bounded by the heap, not the program stack.
pub(crate) fn any_bijection<C, A>(size: usize, mut compatible: C, mut accept: A) -> bool
where
    C: FnMut(usize, usize) -> bool,
    A: FnMut(&[usize]) -> bool,
{
    if size == 0 {
        return accept(&[]);
    }

    let mut mapping = vec![0usize; size];
    let mut taken = FixedBitSet::with_capacity(size);
    let mut row = 0;
    let mut candidate = 0;

    loop {
        while candidate < size && (taken.contains(candidate) || !compatible(row, candidate)) {
            candidate += 1;
        }

        if candidate == size {
            // Row exhausted; release the previous row's column and resume
            // there, or give up at the first row.
            if row == 0 {
                return false;
            }
            row -= 1;
            candidate = mapping[row];
            taken.set(candidate, false);
            candidate += 1;
            continue;
        }

        mapping[row] = candidate;
        taken.set(candidate, true);

        if row + 1 == size {
            if accept(&mapping) {
                return true;
            }
            taken.set(candidate, false);
            candidate += 1;
        } else {
            row += 1;
            candidate = 0;
        }
    }
}

impl<V, E> PartialEq for Graph<V, E>
where
    V: PartialEq + Hash,
    E: PartialEq + Hash,
{
    fn eq(&self, other: &Self) -> bool {
        isomorphic(self, other)
    }
}

impl<V, E> Hash for Graph<V, E>
where
    V: Hash,
    E: Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        checksum(self).hash(state);
    }
}
