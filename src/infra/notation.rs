//! Textual graph notation used for test fixtures.
//!
//! Independent fragments are separated by commas. Within a fragment, integer
//! vertex tokens are chained by arrows: `->` for an edge without payload,
//! `-/7/->` for an edge with payload `7`. A fragment consisting of a single
//! vertex token denotes an isolated vertex.
//!
//! ```
//! use skein::infra::notation;
//!
//! let graph = notation::parse("1 -/3/-> 2 -> 3, 4").unwrap();
//! assert_eq!(graph.vertex_count(), 4);
//! assert_eq!(graph.edge_count(), 2);
//! ```
//!
//! [`format`] writes one fragment per edge plus one per isolated vertex, so
//! a parse/format round trip preserves the graph up to fragment ordering
//! (compare with [`isomorphic`](crate::algo::iso::isomorphic), not string
//! equality). The notation identifies vertices by payload; a graph in which
//! two vertices carry the same payload has no faithful rendition.

use std::fmt::Write;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::core::graph::Graph;

/// Error for notation input that does not match the mini-language, naming
/// the offending fragment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected vertex token in fragment `{0}`")]
    InvalidVertex(String),
    #[error("malformed arrow in fragment `{0}`")]
    InvalidArrow(String),
}

/// Parses the notation into a graph.
///
/// Vertices are interned by value across the whole input, in the order each
/// value is first seen, source before target. The empty input denotes the
/// empty graph.
pub fn parse(input: &str) -> Result<Graph<i64, Option<i64>>, ParseError> {
    if input.trim().is_empty() {
        return Ok(Graph::build(Vec::new(), Vec::new()));
    }

    let mut indices: FxHashMap<i64, usize> = FxHashMap::default();
    let mut payloads = Vec::new();
    let mut edges = Vec::new();

    let mut intern = |value: i64, payloads: &mut Vec<i64>| {
        *indices.entry(value).or_insert_with(|| {
            payloads.push(value);
            payloads.len() - 1
        })
    };

    for fragment in input.split(',') {
        let (chain, labels) = parse_fragment(fragment)?;

        if labels.is_empty() {
            intern(chain[0], &mut payloads);
            continue;
        }

        for (position, label) in labels.into_iter().enumerate() {
            let source = intern(chain[position], &mut payloads);
            let target = intern(chain[position + 1], &mut payloads);
            edges.push((source, target, label));
        }
    }

    Ok(Graph::new(payloads, edges).expect("interned endpoints are in range"))
}

/// Writes the graph in the notation: one fragment per edge in sequence
/// order, then one fragment per isolated vertex in index order.
pub fn format(graph: &Graph<i64, Option<i64>>) -> String {
    let mut out = String::new();

    for edge in graph.edges() {
        if !out.is_empty() {
            out.push_str(", ");
        }

        let source = graph[edge.source()].payload();
        let target = graph[edge.target()].payload();
        match edge.payload() {
            Some(label) => {
                let _ = write!(out, "{source} -/{label}/-> {target}");
            }
            None => {
                let _ = write!(out, "{source}->{target}");
            }
        }
    }

    for vertex in graph.vertices() {
        if !vertex.outgoing().is_empty() || !vertex.incoming().is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push_str(", ");
        }
        let _ = write!(out, "{}", vertex.payload());
    }

    out
}

fn parse_fragment(fragment: &str) -> Result<(Vec<i64>, Vec<Option<i64>>), ParseError> {
    let mut vertices = Vec::new();
    let mut labels = Vec::new();
    let mut rest = fragment.trim_start();

    loop {
        let (value, remainder) = scan_integer(rest, fragment)?;
        vertices.push(value);
        rest = remainder.trim_start();

        if rest.is_empty() {
            return Ok((vertices, labels));
        }

        let (label, remainder) = scan_arrow(rest, fragment)?;
        labels.push(label);
        rest = remainder.trim_start();
    }
}

fn scan_integer<'a>(input: &'a str, fragment: &str) -> Result<(i64, &'a str), ParseError> {
    let bytes = input.as_bytes();
    // A leading `-` belongs to a number only if it does not start an arrow.
    let digits_from = usize::from(
        bytes.first() == Some(&b'-') && !input.starts_with("->") && !input.starts_with("-/"),
    );

    let mut end = digits_from;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }

    if end == digits_from {
        return Err(ParseError::InvalidVertex(fragment.trim().to_owned()));
    }

    let value = input[..end]
        .parse()
        .map_err(|_| ParseError::InvalidVertex(fragment.trim().to_owned()))?;

    Ok((value, &input[end..]))
}

fn scan_arrow<'a>(input: &'a str, fragment: &str) -> Result<(Option<i64>, &'a str), ParseError> {
    if let Some(rest) = input.strip_prefix("->") {
        return Ok((None, rest));
    }

    let invalid = || ParseError::InvalidArrow(fragment.trim().to_owned());

    if let Some(rest) = input.strip_prefix("-/") {
        let end = rest.find('/').ok_or_else(invalid)?;
        let value = rest[..end].trim().parse().map_err(|_| invalid())?;
        let rest = rest[end + 1..].strip_prefix("->").ok_or_else(invalid)?;
        return Ok((Some(value), rest));
    }

    Err(invalid())
}
