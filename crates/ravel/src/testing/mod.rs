//! # Testing Utilities
//!
//! In-memory construction of valid data files, so tests, benches, and hosts
//! can exercise the runtime without the external grammar generator.
//!
//! [`DataFileBuilder`] assembles the raw document shape and funnels it
//! through the same conversion and verification as the on-disk loader;
//! [`fixtures`] provides small canned grammars with hand-derived automata.

pub mod fixtures;

use std::collections::BTreeMap;

use crate::datafile::raw::{Accepts, RawDataFile, RawState, RawVertex};
use crate::datafile::{loader, DataFile, Edge, StateId, SymbolId, Vertex, VertexId};
use crate::error::DataFileError;

/// Builds a [`DataFile`] table by table.
///
/// Index-0 sentinel entries (sink states, the sentinel vertex, the empty
/// edge-set) are seeded automatically; the first added state is state 1, the
/// first added vertex is vertex 1, the first added edge-set is edge-set 1
/// (the terminal edge-set).
///
/// # Example
///
/// ```
/// use ravel::testing::DataFileBuilder;
/// use ravel::Vertex;
///
/// // S -> 'a'
/// let data = DataFileBuilder::new()
///     .symbol('a', 1)
///     .forward_state(&[(1, 2)], false)
///     .forward_state(&[], true)
///     .backward_state(&[(2, 2)], false)
///     .backward_state(&[], false)
///     .vertex(Vertex::start("S", 2))
///     .vertex(Vertex::fin(1))
///     .vertex(Vertex::plain())
///     .vertex(Vertex::plain())
///     .edge_set(&[(4, 2)], &[])
///     .edge_set(&[(1, 3)], &[(3, 4)])
///     .roots(1, 2)
///     .build()
///     .expect("valid data file");
/// assert_eq!(data.start_vertex(), 1);
/// ```
#[derive(Debug, Default)]
pub struct DataFileBuilder {
    raw: RawDataFile,
}

impl DataFileBuilder {
    #[must_use]
    pub fn new() -> Self {
        let mut raw = RawDataFile::default();
        raw.forwards.push(None);
        raw.backwards.push(None);
        raw.vertices.push(None);
        raw.null_edges.push(Vec::new());
        raw.char_edges.push(Vec::new());
        Self { raw }
    }

    /// Map code point `ch` to `symbol`, growing the table as needed.
    #[must_use]
    pub fn symbol(mut self, ch: char, symbol: SymbolId) -> Self {
        let index = ch as usize;
        if self.raw.input_to_symbol.len() <= index {
            self.raw.input_to_symbol.resize(index + 1, 0);
        }
        self.raw.input_to_symbol[index] = symbol;
        self
    }

    /// Append the next forward state; the first call defines state 1.
    #[must_use]
    pub fn forward_state(mut self, transitions: &[(SymbolId, StateId)], accepts: bool) -> Self {
        self.raw.forwards.push(Some(raw_state(transitions, accepts)));
        self
    }

    /// Append the next backward state, keyed by forward-state IDs; the first
    /// call defines state 1, whose ID doubles as the terminal edge-set.
    #[must_use]
    pub fn backward_state(mut self, transitions: &[(StateId, StateId)], accepts: bool) -> Self {
        self.raw.backwards.push(Some(raw_state(transitions, accepts)));
        self
    }

    /// Append the next vertex; the first call defines vertex 1.
    #[must_use]
    pub fn vertex(mut self, vertex: Vertex) -> Self {
        self.raw.vertices.push(Some(RawVertex {
            kind: vertex.kind.map(|k| k.as_str().to_owned()),
            text: vertex.text.map(|t| t.to_string()),
            with: vertex.with,
            sort_key: (vertex.sort_key != 0).then_some(vertex.sort_key),
            stack_vertex: vertex.stack_vertex,
        }));
        self
    }

    /// Append the next edge-set; the first call defines edge-set 1.
    #[must_use]
    pub fn edge_set(mut self, null: &[Edge], chars: &[Edge]) -> Self {
        self.raw.null_edges.push(null.to_vec());
        self.raw.char_edges.push(chars.to_vec());
        self
    }

    /// Set the grammar-graph root and sink.
    #[must_use]
    pub fn roots(mut self, start: VertexId, fin: VertexId) -> Self {
        self.raw.start_vertex = start;
        self.raw.final_vertex = fin;
        self
    }

    /// Serialize to the on-disk JSON document shape.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.raw).expect("raw document serializes")
    }

    /// Convert and verify, exactly as the on-disk loader does.
    ///
    /// # Errors
    ///
    /// [`DataFileError::Invalid`] when the assembled tables fail structural
    /// verification.
    pub fn build(self) -> Result<DataFile, DataFileError> {
        loader::build(self.raw)
    }
}

fn raw_state(transitions: &[(u32, u32)], accepts: bool) -> RawState {
    RawState {
        transitions: transitions
            .iter()
            .map(|&(input, target)| (input.to_string(), target))
            .collect::<BTreeMap<_, _>>(),
        accepts: Accepts::Bool(accepts),
    }
}
