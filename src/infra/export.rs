//! Export of a graph into the [Dot] format for visual inspection.
//!
//! The exporter only consumes the ordered read API of [`Graph`]; rendering
//! itself is left to external tooling (`dot -Tsvg`, viewers).
//!
//! [Dot]: https://graphviz.org/doc/info/lang.html

use std::{
    fmt::Display,
    io::{self, Cursor, Write},
};

use crate::core::graph::Graph;

pub struct Dot<V, E> {
    name: String,
    vertex_label: Box<dyn Fn(&V) -> String>,
    edge_label: Box<dyn Fn(&E) -> String>,
}

impl<V, E> Dot<V, E> {
    pub fn new<FV, FE>(name: Option<String>, vertex_label: FV, edge_label: FE) -> Self
    where
        FV: Fn(&V) -> String + 'static,
        FE: Fn(&E) -> String + 'static,
    {
        Self {
            name: name.unwrap_or_else(|| String::from("G")),
            vertex_label: Box::new(vertex_label),
            edge_label: Box::new(edge_label),
        }
    }

    pub fn export<W: Write>(&self, graph: &Graph<V, E>, out: &mut W) -> io::Result<()> {
        writeln!(out, "digraph {} {{", self.name)?;

        for (index, vertex) in graph.vertices().enumerate() {
            writeln!(
                out,
                "    v{} [label={:?}];",
                index,
                (self.vertex_label)(vertex.payload())
            )?;
        }

        for edge in graph.edges() {
            writeln!(
                out,
                "    v{} -> v{} [label={:?}];",
                edge.source().as_usize(),
                edge.target().as_usize(),
                (self.edge_label)(edge.payload())
            )?;
        }

        writeln!(out, "}}")?;

        Ok(())
    }

    pub fn to_string(&self, graph: &Graph<V, E>) -> String {
        let mut cursor = Cursor::new(Vec::new());
        self.export(graph, &mut cursor)
            .expect("writing to vec in cursor does not fail");

        String::from_utf8(cursor.into_inner()).expect("dot format is text format")
    }
}

impl<V: Display, E: Display> Dot<V, E> {
    pub fn with_display(name: Option<String>) -> Self {
        Self::new(name, |v| format!("{v}"), |e| format!("{e}"))
    }
}
