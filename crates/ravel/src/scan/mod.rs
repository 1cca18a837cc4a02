//! # Two-Pass Scanner
//!
//! The finite-state front half of the runtime: a forwards transducer over the
//! symbol stream, then a backwards transducer over the forward state trace,
//! producing one edge-set ID per input position plus the terminal edge-set.
//!
//! ## Ordering
//!
//! [`ForwardPass`] emits states strictly left-to-right; [`BackwardPass`]
//! consumes the trace strictly right-to-left but its output ([`EdgeStream`])
//! is indexed left-to-right, matching input offsets.
//!
//! Neither pass short-circuits on the sink state: the forward pass keeps
//! stepping through 0 so the backward pass always sees a full-length trace,
//! which is what permits worst-case data files that report every possible
//! edge per position.

mod backward;
mod forward;
mod stream;

pub use backward::BackwardPass;
pub use forward::{ForwardPass, ForwardTrace};
pub use stream::EdgeStream;
