//! # Parse Graph
//!
//! The directed graph formed by gluing per-position edge-sets across columns:
//! column `i` takes its in-column null edges from `null_edges[edge_ids[i]]`
//! and its char edges into column `i + 1` from `char_edges[edge_ids[i]]`.
//!
//! Resolvers read the edge stream lazily and never materialize this graph;
//! the assembled form exists for rendering and inspection.

pub mod dot;

use hashbrown::HashSet;

use crate::datafile::{DataFile, VertexId};
use crate::scan::EdgeStream;

pub use dot::DotEmitter;

/// A parse-graph vertex: a grammar vertex instantiated at a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Node {
    pub column: u32,
    pub vertex: VertexId,
}

impl Node {
    #[must_use]
    pub const fn new(column: u32, vertex: VertexId) -> Self {
        Self { column, vertex }
    }

    pub(crate) const fn key(self) -> u64 {
        ((self.column as u64) << 32) | self.vertex as u64
    }

    pub(crate) const fn from_key(key: u64) -> Self {
        Self {
            column: (key >> 32) as u32,
            vertex: key as u32,
        }
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.column, self.vertex)
    }
}

/// Whether an edge consumes an input symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKind {
    /// Stays in the same column.
    Null,
    /// Crosses into the next column.
    Char,
}

/// Materialized parse graph for one edge stream.
#[derive(Debug, Clone)]
pub struct ParseGraph {
    columns: usize,
    nodes: Vec<Node>,
    edges: Vec<(Node, Node, EdgeKind)>,
}

impl ParseGraph {
    /// Glue the edge-sets named by `stream` into one graph.
    #[must_use]
    pub fn assemble(data: &DataFile, stream: &EdgeStream) -> Self {
        let mut nodes = HashSet::with_hasher(ahash::RandomState::new());
        let mut edges = Vec::new();
        for (i, &id) in stream.ids().iter().enumerate() {
            let column = u32::try_from(i).unwrap_or(u32::MAX);
            for &(from, to) in data.null_edges(id) {
                let a = Node::new(column, from);
                let b = Node::new(column, to);
                nodes.insert(a);
                nodes.insert(b);
                edges.push((a, b, EdgeKind::Null));
            }
            for &(from, to) in data.char_edges(id) {
                let a = Node::new(column, from);
                let b = Node::new(column + 1, to);
                nodes.insert(a);
                nodes.insert(b);
                edges.push((a, b, EdgeKind::Char));
            }
        }
        let mut nodes: Vec<Node> = nodes.into_iter().collect();
        nodes.sort_unstable();
        edges.sort_unstable();
        edges.dedup();
        Self {
            columns: stream.len(),
            nodes,
            edges,
        }
    }

    /// Number of columns, terminal column included.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Every vertex instantiated by some edge, in `(column, vertex)` order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Every edge, deduplicated, in `(from, to)` order.
    #[must_use]
    pub fn edges(&self) -> &[(Node, Node, EdgeKind)] {
        &self.edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::{BackwardPass, ForwardPass};
    use crate::testing::fixtures;

    #[test]
    fn test_node_key_roundtrip() {
        let node = Node::new(7, 42);
        assert_eq!(Node::from_key(node.key()), node);
        assert_eq!(node.to_string(), "7,42");
    }

    #[test]
    fn test_assemble_parens() {
        let data = fixtures::balanced_parens();
        let symbols = data.alphabet().map_str("()");
        let trace = ForwardPass::new(&data).run(&symbols);
        let stream = BackwardPass::new(&data).run(&trace);
        let graph = ParseGraph::assemble(&data, &stream);
        assert_eq!(graph.columns(), 3);
        // Column 0 carries the char edge into column 1.
        assert!(graph
            .edges()
            .iter()
            .any(|&(a, b, k)| k == EdgeKind::Char && a == Node::new(0, 3) && b == Node::new(1, 4)));
        // Null edges never change column.
        for &(a, b, kind) in graph.edges() {
            match kind {
                EdgeKind::Null => assert_eq!(a.column, b.column),
                EdgeKind::Char => assert_eq!(a.column + 1, b.column),
            }
        }
    }
}
