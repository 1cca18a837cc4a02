//! The shared stack representation of the parallel resolver.
//!
//! An edge `u -> v` records "when processing `v`, a most-recently-pushed
//! value is `u`": the predecessors of `v` are its possible tops of stack.
//! One graph subsumes every stack configuration of every live alternative.
//!
//! Edges carry a guard flag. An edge justified only through a completed
//! `if`/`fi` bracket is guard-failed; re-adding an edge along a clean
//! justification clears the flag, since validity of an edge is the validity
//! of its best justification.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::graph::Node;

#[derive(Debug, Default, Clone)]
struct Adjacency {
    preds: SmallVec<[u64; 4]>,
    succs: SmallVec<[u64; 4]>,
}

/// Outcome of an edge insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddEdge {
    /// The edge did not exist before.
    Inserted,
    /// The edge existed; its guard flag was strengthened (failed → clean).
    Upgraded,
    /// The edge existed with an equal or better guard flag.
    Unchanged,
}

impl AddEdge {
    /// Whether the insertion changed the graph.
    #[must_use]
    pub const fn changed(self) -> bool {
        matches!(self, Self::Inserted | Self::Upgraded)
    }
}

/// Directed graph over parse-graph nodes with O(1) amortized edge operations.
#[derive(Debug, Default, Clone)]
pub struct StackGraph {
    edges: HashMap<(u64, u64), bool, ahash::RandomState>,
    adjacency: HashMap<u64, Adjacency, ahash::RandomState>,
}

impl StackGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `from -> to`. `guard_failed` marks a justification that crossed
    /// a completed guard bracket; a clean justification wins over a failed
    /// one.
    pub fn add_edge(&mut self, from: Node, to: Node, guard_failed: bool) -> AddEdge {
        let key = (from.key(), to.key());
        match self.edges.get_mut(&key) {
            Some(existing) => {
                if *existing && !guard_failed {
                    *existing = false;
                    AddEdge::Upgraded
                } else {
                    AddEdge::Unchanged
                }
            }
            None => {
                self.edges.insert(key, guard_failed);
                self.adjacency.entry(key.0).or_default().succs.push(key.1);
                self.adjacency.entry(key.1).or_default().preds.push(key.0);
                AddEdge::Inserted
            }
        }
    }

    /// Whether `from -> to` exists, guard-failed or not.
    #[must_use]
    pub fn has_edge(&self, from: Node, to: Node) -> bool {
        self.edges.contains_key(&(from.key(), to.key()))
    }

    /// Whether `from -> to` exists with its guard intact.
    #[must_use]
    pub fn has_valid_edge(&self, from: Node, to: Node) -> bool {
        self.edges.get(&(from.key(), to.key())) == Some(&false)
    }

    /// Remove `from -> to` if present.
    pub fn delete_edge(&mut self, from: Node, to: Node) {
        let key = (from.key(), to.key());
        if self.edges.remove(&key).is_none() {
            return;
        }
        if let Some(adj) = self.adjacency.get_mut(&key.0) {
            if let Some(i) = adj.succs.iter().position(|&n| n == key.1) {
                adj.succs.swap_remove(i);
            }
        }
        if let Some(adj) = self.adjacency.get_mut(&key.1) {
            if let Some(i) = adj.preds.iter().position(|&n| n == key.0) {
                adj.preds.swap_remove(i);
            }
        }
    }

    /// Possible tops of stack when processing `of`.
    pub fn predecessors(&self, of: Node) -> impl Iterator<Item = Node> + '_ {
        self.adjacency
            .get(&of.key())
            .into_iter()
            .flat_map(|adj| adj.preds.iter().copied().map(Node::from_key))
    }

    /// Nodes that can see `of` as a top of stack.
    pub fn successors(&self, of: Node) -> impl Iterator<Item = Node> + '_ {
        self.adjacency
            .get(&of.key())
            .into_iter()
            .flat_map(|adj| adj.succs.iter().copied().map(Node::from_key))
    }

    /// Guard flag of `from -> to`, if the edge exists.
    #[must_use]
    pub fn guard_failed(&self, from: Node, to: Node) -> Option<bool> {
        self.edges.get(&(from.key(), to.key())).copied()
    }

    /// Total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn n(column: u32, vertex: u32) -> Node {
        Node::new(column, vertex)
    }

    #[test]
    fn test_add_and_query() {
        let mut graph = StackGraph::new();
        assert_eq!(graph.add_edge(n(0, 1), n(0, 3), false), AddEdge::Inserted);
        assert_eq!(graph.add_edge(n(0, 1), n(0, 3), false), AddEdge::Unchanged);
        assert!(graph.has_edge(n(0, 1), n(0, 3)));
        assert!(graph.has_valid_edge(n(0, 1), n(0, 3)));
        assert!(!graph.has_edge(n(0, 3), n(0, 1)));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_clean_justification_wins() {
        let mut graph = StackGraph::new();
        assert_eq!(graph.add_edge(n(0, 1), n(2, 2), true), AddEdge::Inserted);
        assert!(!graph.has_valid_edge(n(0, 1), n(2, 2)));
        assert_eq!(graph.add_edge(n(0, 1), n(2, 2), false), AddEdge::Upgraded);
        assert!(graph.has_valid_edge(n(0, 1), n(2, 2)));
        // A later failed justification does not downgrade.
        assert_eq!(graph.add_edge(n(0, 1), n(2, 2), true), AddEdge::Unchanged);
        assert!(graph.has_valid_edge(n(0, 1), n(2, 2)));
    }

    #[test]
    fn test_delete_edge() {
        let mut graph = StackGraph::new();
        graph.add_edge(n(0, 1), n(0, 3), false);
        graph.add_edge(n(0, 2), n(0, 3), false);
        graph.delete_edge(n(0, 1), n(0, 3));
        assert!(!graph.has_edge(n(0, 1), n(0, 3)));
        let preds: Vec<Node> = graph.predecessors(n(0, 3)).collect();
        assert_eq!(preds, vec![n(0, 2)]);
        // Deleting a missing edge is a no-op.
        graph.delete_edge(n(0, 1), n(0, 3));
    }

    #[test]
    fn test_adjacency_tracks_both_directions() {
        let mut graph = StackGraph::new();
        graph.add_edge(n(0, 1), n(0, 3), false);
        graph.add_edge(n(0, 1), n(1, 4), false);
        let succs: Vec<Node> = graph.successors(n(0, 1)).collect();
        assert_eq!(succs.len(), 2);
        assert!(succs.contains(&n(1, 4)));
        assert_eq!(graph.predecessors(n(1, 4)).count(), 1);
    }
}
