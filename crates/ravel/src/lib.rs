//! # Ravel
//!
//! A grammar-agnostic, data-driven parser runtime.
//!
//! ## Overview
//!
//! Ravel executes precompiled grammar tables, produced ahead of time by an
//! external generator, against an input text. A two-pass finite-state
//! simulation first prunes the space of parses in linear time:
//!
//! 1. The **forward pass** runs a DFA left-to-right over the input symbols,
//!    recording the state at every position.
//! 2. The **backward pass** runs a second DFA right-to-left over that state
//!    trace, emitting one *edge-set ID* per position.
//!
//! Gluing the per-position edge-sets together yields the **parse graph**, a
//! compact encoding of every parse tree of the input. A resolver then finds a
//! well-nested path through it:
//!
//! - [`resolve::BacktrackResolver`]: depth-first, priority-ordered search.
//! - [`resolve::ParallelResolver`]: breadth-wise pushdown simulation sharing
//!   all stack configurations through a stack graph.
//!
//! ## Quick Start
//!
//! ```rust
//! use ravel::{Pipeline, PipelineConfig, ResolverKind};
//! use ravel::testing::fixtures;
//!
//! // A small data file; real ones are loaded with `DataFile::from_slice`.
//! let data = fixtures::balanced_parens();
//!
//! let pipeline = Pipeline::new(&data);
//! let outcome = pipeline.parse("(())").expect("input parses");
//! assert_eq!(outcome.tree.name, "S");
//! assert_eq!(outcome.tree.to_json(), r#"["S",[["S",[["S",[],2,2]],1,3]],0,4]"#);
//!
//! // The parallel resolver agrees on acceptance.
//! let parallel = Pipeline::with_config(
//!     &data,
//!     PipelineConfig { resolver: ResolverKind::Parallel, ..PipelineConfig::default() },
//! );
//! assert!(parallel.parse("(())").is_ok());
//! assert!(parallel.parse("((").is_err());
//! ```
//!
//! ## Modules
//!
//! - [`datafile`] - Loading and verifying the precompiled tables
//! - [`alphabet`] - Code point to symbol mapping
//! - [`scan`] - The forward/backward passes and the edge stream
//! - [`graph`] - Parse-graph assembly and GraphViz rendering
//! - [`resolve`] - The two resolvers
//! - [`tree`] - Nested parse trees and their JSON form
//! - [`pipeline`] - Stage orchestration
//! - [`error`] - Error types
//! - [`testing`] - Builders and fixture grammars

pub mod alphabet;
pub mod datafile;
pub mod error;
pub mod graph;
pub mod pipeline;
pub mod resolve;
pub mod scan;
pub mod testing;
pub mod tree;

// Re-export commonly used types
pub use alphabet::Alphabet;
pub use datafile::{DataFile, EdgeSetId, StateId, SymbolId, Vertex, VertexId, VertexKind};
pub use error::{DataFileError, ParseError};
pub use graph::{DotEmitter, ParseGraph};
pub use pipeline::{Pipeline, PipelineConfig, ResolverKind};
pub use resolve::{
    BacktrackConfig, BacktrackResolver, ParallelConfig, ParallelResolver, ResolveMetrics,
    ResolveOutcome,
};
pub use scan::{BackwardPass, EdgeStream, ForwardPass, ForwardTrace};
pub use tree::{ParseTree, Span};
