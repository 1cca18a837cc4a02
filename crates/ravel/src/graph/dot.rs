//! GraphViz rendering of an assembled parse graph.

use std::fmt::Write;

use super::ParseGraph;
use crate::datafile::DataFile;

/// Dumps a parse graph as GraphViz text, one edge per line plus a label line
/// per vertex.
#[derive(Debug, Clone, Copy)]
pub struct DotEmitter<'a> {
    data: &'a DataFile,
}

impl<'a> DotEmitter<'a> {
    #[must_use]
    pub const fn new(data: &'a DataFile) -> Self {
        Self { data }
    }

    /// Render `graph` as a `digraph` document.
    #[must_use]
    pub fn emit(&self, graph: &ParseGraph) -> String {
        let mut out = String::new();
        writeln!(out, "digraph parse_graph {{").unwrap();
        writeln!(out, "  rankdir=LR;").unwrap();
        for &(from, to, _) in graph.edges() {
            writeln!(out, "  \"{from}\" -> \"{to}\";").unwrap();
        }
        for &node in graph.nodes() {
            let vertex = self.data.vertex(node.vertex);
            let mut label = String::new();
            if let Some(kind) = vertex.kind {
                label.push_str(kind.as_str());
                label.push(' ');
            }
            match &vertex.text {
                Some(text) => label.push_str(text),
                None => write!(label, "{}", node.vertex).unwrap(),
            }
            writeln!(out, "  \"{node}\"[label=\"{}\"];", escape(&label)).unwrap();
        }
        writeln!(out, "}}").unwrap();
        out
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
