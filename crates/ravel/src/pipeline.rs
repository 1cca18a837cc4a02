//! # Pipeline
//!
//! Orchestrates one parse: map the input to symbols, run the forward and
//! backward passes, then hand the edge stream to the configured resolver.
//! Stages short-circuit: a rejected input never reaches the backward pass
//! or a resolver.
//!
//! The data file is borrowed read-only, so one [`DataFile`] can back any
//! number of pipelines, concurrent or not. All per-parse state lives inside
//! the stage that needs it.

use crate::datafile::DataFile;
use crate::error::ParseError;
use crate::graph::{DotEmitter, ParseGraph};
use crate::resolve::{
    BacktrackConfig, BacktrackResolver, ParallelConfig, ParallelResolver, ResolveOutcome,
};
use crate::scan::{BackwardPass, EdgeStream, ForwardPass};

/// Which resolver turns the edge stream into a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolverKind {
    /// Depth-first backtracking search.
    #[default]
    Backtrack,
    /// Shared-stack-graph pushdown simulation.
    Parallel,
}

/// Pipeline configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineConfig {
    pub resolver: ResolverKind,
    pub backtrack: BacktrackConfig,
    pub parallel: ParallelConfig,
}

/// One data file bound to a resolver choice.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'a> {
    data: &'a DataFile,
    config: PipelineConfig,
}

impl<'a> Pipeline<'a> {
    #[must_use]
    pub fn new(data: &'a DataFile) -> Self {
        Self {
            data,
            config: PipelineConfig::default(),
        }
    }

    #[must_use]
    pub const fn with_config(data: &'a DataFile, config: PipelineConfig) -> Self {
        Self { data, config }
    }

    /// Run the two passes over `input` and return the parse-graph encoding.
    ///
    /// # Errors
    ///
    /// [`ParseError::InputRejected`] with the earliest sink offset when the
    /// forward automaton does not accept; the backward pass is skipped.
    pub fn scan(&self, input: &str) -> Result<EdgeStream, ParseError> {
        let symbols = self.data.alphabet().map_str(input);
        let trace = ForwardPass::new(self.data).run(&symbols);
        if !trace.accepted {
            return Err(ParseError::InputRejected {
                offset: trace.reject_offset(),
            });
        }
        Ok(BackwardPass::new(self.data).run(&trace))
    }

    /// Resolve an already-computed edge stream with the configured resolver.
    ///
    /// # Errors
    ///
    /// Propagates the resolver's [`ParseError`].
    pub fn resolve(&self, stream: &EdgeStream) -> Result<ResolveOutcome, ParseError> {
        match self.config.resolver {
            ResolverKind::Backtrack => {
                BacktrackResolver::with_config(self.data, self.config.backtrack).resolve(stream)
            }
            ResolverKind::Parallel => {
                ParallelResolver::with_config(self.data, self.config.parallel).resolve(stream)
            }
        }
    }

    /// Scan and resolve `input` in one call.
    ///
    /// # Errors
    ///
    /// Any [`ParseError`] from either stage.
    pub fn parse(&self, input: &str) -> Result<ResolveOutcome, ParseError> {
        let stream = self.scan(input)?;
        self.resolve(&stream)
    }

    /// Scan `input` and render its parse graph as GraphViz text.
    ///
    /// # Errors
    ///
    /// [`ParseError::InputRejected`] when the forward automaton rejects.
    pub fn dot(&self, input: &str) -> Result<String, ParseError> {
        let stream = self.scan(input)?;
        let graph = ParseGraph::assemble(self.data, &stream);
        Ok(DotEmitter::new(self.data).emit(&graph))
    }
}
