//! # Data File
//!
//! The immutable, precompiled grammar tables the runtime executes against.
//!
//! ## Overview
//!
//! A data file is produced ahead of time by a grammar generator and wraps six
//! tables: a code-point-to-symbol map, a forward and a backward automaton, the
//! vertex table of the grammar graph, and the `null_edges`/`char_edges`
//! edge-set tables aligned by edge-set ID. The loader ([`DataFile::from_slice`])
//! accepts the gzip-wrapped JSON container or the bare JSON document and
//! verifies structural invariants before handing out a read-only handle.
//!
//! The expected document shape is the one with separate `forwards`/`backwards`
//! automata, a unified pair of `null_edges`/`char_edges` tables, and an
//! `accepts` flag (boolean or integer) per state.
//!
//! ## Sentinels
//!
//! State 0 in either automaton is the non-accepting sink; vertex 0 is the
//! stack-floor sentinel. Lookups treat absence-from-map as a transition to 0.
//! State 1 is the initial state of both automata.

pub(crate) mod loader;
pub(crate) mod raw;

use compact_str::CompactString;
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::alphabet::Alphabet;
use crate::error::DataFileError;

/// Forward- or backward-automaton state identifier.
pub type StateId = u32;
/// Grammar-graph vertex identifier.
pub type VertexId = u32;
/// Identifier of one `null_edges`/`char_edges` pair.
pub type EdgeSetId = u32;
/// Symbol index produced by the alphabet map.
pub type SymbolId = u32;

/// A `(from, to)` vertex pair in an edge set.
pub type Edge = (VertexId, VertexId);

pub(crate) type EdgeList = SmallVec<[Edge; 4]>;

/// Initial state of both automata.
pub const INITIAL_STATE: StateId = 1;
/// Non-accepting sink state of both automata.
pub const SINK_STATE: StateId = 0;
/// Stack-floor sentinel vertex.
pub const SENTINEL_VERTEX: VertexId = 0;

const SENTINEL: Vertex = Vertex {
    kind: None,
    text: None,
    with: None,
    sort_key: 0,
    stack_vertex: None,
};

/// Role of a vertex in the grammar graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexKind {
    /// Opens a non-terminal; paired with a [`VertexKind::Final`] via `with`.
    Start,
    /// Closes the non-terminal opened by its `with` partner.
    Final,
    /// Opens a guard bracket; paired with a [`VertexKind::Fi`] via `with`.
    If,
    /// Closes the guard bracket opened by its `with` partner.
    Fi,
}

impl VertexKind {
    /// Pushes a stack frame when visited.
    #[must_use]
    pub const fn pushes(self) -> bool {
        matches!(self, Self::Start | Self::If)
    }

    /// Pops a stack frame when visited.
    #[must_use]
    pub const fn pops(self) -> bool {
        matches!(self, Self::Final | Self::Fi)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Final => "final",
            Self::If => "if",
            Self::Fi => "fi",
        }
    }
}

/// One entry of the vertex table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vertex {
    /// Role, if any. Plain vertices carry `None`.
    pub kind: Option<VertexKind>,
    /// Non-terminal name or tag.
    pub text: Option<CompactString>,
    /// Matching partner for `start`/`final` and `if`/`fi` pairs.
    pub with: Option<VertexId>,
    /// Tie-break priority among sibling successors; missing loads as 0.
    pub sort_key: i32,
    /// Projection into the reduced stack graph.
    pub stack_vertex: Option<VertexId>,
}

impl Vertex {
    /// A plain, untyped vertex.
    #[must_use]
    pub fn plain() -> Self {
        Self::default()
    }

    /// A `start` vertex named `text`, closed by `with`.
    #[must_use]
    pub fn start(text: &str, with: VertexId) -> Self {
        Self {
            kind: Some(VertexKind::Start),
            text: Some(CompactString::from(text)),
            with: Some(with),
            ..Self::default()
        }
    }

    /// A `final` vertex closing the `start` at `with`.
    #[must_use]
    pub fn fin(with: VertexId) -> Self {
        Self {
            kind: Some(VertexKind::Final),
            with: Some(with),
            ..Self::default()
        }
    }

    /// An `if` guard vertex, closed by the `fi` at `with`.
    #[must_use]
    pub fn guard_if(with: VertexId) -> Self {
        Self {
            kind: Some(VertexKind::If),
            with: Some(with),
            ..Self::default()
        }
    }

    /// A `fi` guard vertex closing the `if` at `with`.
    #[must_use]
    pub fn guard_fi(with: VertexId) -> Self {
        Self {
            kind: Some(VertexKind::Fi),
            with: Some(with),
            ..Self::default()
        }
    }

    /// Set the tie-break priority.
    #[must_use]
    pub fn with_sort_key(mut self, sort_key: i32) -> Self {
        self.sort_key = sort_key;
        self
    }

    /// Set the stack-graph projection target.
    #[must_use]
    pub fn with_stack_vertex(mut self, stack_vertex: VertexId) -> Self {
        self.stack_vertex = Some(stack_vertex);
        self
    }
}

/// Forward-automaton state: a dense transition row indexed by symbol.
#[derive(Debug, Clone)]
pub(crate) struct ForwardState {
    pub(crate) row: Vec<StateId>,
    pub(crate) accepts: bool,
}

/// Backward-automaton state: sparse transitions keyed by forward-state ID.
#[derive(Debug, Clone)]
pub(crate) struct BackwardState {
    pub(crate) transitions: HashMap<StateId, StateId, ahash::RandomState>,
    #[allow(dead_code)] // carried from the document; the runtime never reads it
    pub(crate) accepts: bool,
}

/// Immutable loaded grammar tables.
///
/// Construction verifies the structural invariants; afterwards the handle is
/// read-only and may be shared freely across concurrent parses.
#[derive(Debug)]
pub struct DataFile {
    pub(crate) input_to_symbol: Vec<SymbolId>,
    pub(crate) forwards: Vec<ForwardState>,
    pub(crate) backwards: Vec<BackwardState>,
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) null_edges: Vec<EdgeList>,
    pub(crate) char_edges: Vec<EdgeList>,
    pub(crate) start_vertex: VertexId,
    pub(crate) final_vertex: VertexId,
}

impl DataFile {
    /// Load a data file from bytes.
    ///
    /// Accepts the gzip-wrapped container (sniffed by magic number) or the
    /// bare inner JSON document.
    ///
    /// # Errors
    ///
    /// [`DataFileError::Decode`] when inflation or JSON parsing fails;
    /// [`DataFileError::Invalid`] when structural verification fails.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DataFileError> {
        loader::from_slice(bytes)
    }

    /// The code-point-to-symbol view.
    #[must_use]
    pub fn alphabet(&self) -> Alphabet<'_> {
        Alphabet::new(&self.input_to_symbol)
    }

    /// Forward transition; absent entries are the sink.
    #[must_use]
    pub fn forward_step(&self, state: StateId, symbol: SymbolId) -> StateId {
        self.forwards
            .get(state as usize)
            .and_then(|s| s.row.get(symbol as usize))
            .copied()
            .unwrap_or(SINK_STATE)
    }

    /// Whether `state` is accepting in the forward automaton.
    #[must_use]
    pub fn forward_accepts(&self, state: StateId) -> bool {
        self.forwards.get(state as usize).is_some_and(|s| s.accepts)
    }

    /// Backward transition over a forward-state input; absent entries are the
    /// sink.
    #[must_use]
    pub fn backward_step(&self, state: StateId, forward_state: StateId) -> StateId {
        self.backwards
            .get(state as usize)
            .and_then(|s| s.transitions.get(&forward_state))
            .copied()
            .unwrap_or(SINK_STATE)
    }

    /// Vertex table entry; out-of-range IDs yield the sentinel.
    #[must_use]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        self.vertices.get(id as usize).unwrap_or(&SENTINEL)
    }

    /// Null edges of edge-set `e`; unknown IDs yield an empty set.
    #[must_use]
    pub fn null_edges(&self, e: EdgeSetId) -> &[Edge] {
        self.null_edges.get(e as usize).map_or(&[], |v| v.as_slice())
    }

    /// Char edges of edge-set `e`; unknown IDs yield an empty set.
    #[must_use]
    pub fn char_edges(&self, e: EdgeSetId) -> &[Edge] {
        self.char_edges.get(e as usize).map_or(&[], |v| v.as_slice())
    }

    /// Root of the grammar graph.
    #[must_use]
    pub const fn start_vertex(&self) -> VertexId {
        self.start_vertex
    }

    /// Sink of the grammar graph.
    #[must_use]
    pub const fn final_vertex(&self) -> VertexId {
        self.final_vertex
    }

    /// Number of vertex-table entries, sentinel included.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edge-set table entries, empty entry 0 included.
    #[must_use]
    pub fn edge_set_count(&self) -> usize {
        self.null_edges.len()
    }

    /// Stack-graph projection of a vertex: its `stack_vertex` when set, the
    /// vertex itself otherwise.
    #[must_use]
    pub fn project(&self, id: VertexId) -> VertexId {
        self.vertex(id).stack_vertex.unwrap_or(id)
    }
}
