//! # Error Types
//!
//! Error types for data-file loading and the parse pipeline.
//!
//! ## Overview
//!
//! Two failure families exist:
//!
//! - [`DataFileError`]: the precompiled data file could not be decoded or
//!   failed structural verification. Fatal at construction time.
//! - [`ParseError`]: a parse of one input failed. `InputRejected` means the
//!   forward automaton ended outside an accepting state and carries the
//!   earliest offset at which it entered the sink; `NoParseTree` means the
//!   automata accepted but no well-nested path exists through the parse graph.
//!
//! Pipeline errors short-circuit: a rejected input never reaches the backward
//! pass or a resolver. Resolvers never panic; they return structured failures.
//!
//! ## Diagnostics Support
//!
//! When the `diagnostics` feature is enabled, errors integrate with [`miette`]
//! for rich error reporting.

use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Errors raised while loading a precompiled data file.
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum DataFileError {
    #[error("failed to decode data file: {0}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(ravel::datafile::decode)))]
    Decode(String),

    #[error("data file failed verification: {0}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(ravel::datafile::invalid)))]
    Invalid(String),
}

/// Errors raised while running the parse pipeline over one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum ParseError {
    /// The forward automaton ended in a non-accepting state. `offset` is the
    /// index of the earliest code point that drove it into the sink, or the
    /// input length when it finished alive but non-accepting.
    #[error("input rejected at offset {offset}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(ravel::parse::rejected)))]
    InputRejected { offset: usize },

    /// The automata accepted but no well-nested path exists through the
    /// parse graph. Possible for recursive grammars: the finite-state
    /// over-approximation accepts strings the nesting constraints reject.
    #[error("no well-nested parse tree exists")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(ravel::parse::no_tree)))]
    NoParseTree,

    /// A resolver exceeded its configured search budget.
    #[error("resolver exceeded its step limit after {steps} steps")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(ravel::parse::limit)))]
    LimitExceeded { steps: usize },
}

impl ParseError {
    /// Input offset associated with this error, when one exists.
    #[must_use]
    pub const fn offset(&self) -> Option<usize> {
        match self {
            Self::InputRejected { offset } => Some(*offset),
            Self::NoParseTree | Self::LimitExceeded { .. } => None,
        }
    }
}
