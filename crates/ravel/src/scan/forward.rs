//! Forwards transducer over the symbol stream.

use crate::datafile::{DataFile, StateId, SymbolId, INITIAL_STATE, SINK_STATE};

/// Output of one forward run.
#[derive(Debug, Clone)]
pub struct ForwardTrace {
    /// `states[0] == 1`; `states[i + 1]` is the transition of `states[i]`
    /// under symbol `i`. Length is input length + 1.
    pub states: Vec<StateId>,
    /// Whether the last state accepts.
    pub accepted: bool,
    /// Smallest index `i` with `states[i] == 0`, or the input length when the
    /// trace never hits the sink.
    pub first_bad_index: usize,
}

impl ForwardTrace {
    /// Whether the trace ever entered the sink.
    #[must_use]
    pub fn hit_sink(&self) -> bool {
        self.states.get(self.first_bad_index) == Some(&SINK_STATE)
    }

    /// Input offset of the code point that drove the automaton into the sink,
    /// or the input length for an alive-but-non-accepting trace.
    #[must_use]
    pub fn reject_offset(&self) -> usize {
        if self.hit_sink() {
            self.first_bad_index.saturating_sub(1)
        } else {
            self.states.len() - 1
        }
    }
}

/// Runs the forwards automaton of a data file.
#[derive(Debug, Clone, Copy)]
pub struct ForwardPass<'a> {
    data: &'a DataFile,
}

impl<'a> ForwardPass<'a> {
    #[must_use]
    pub const fn new(data: &'a DataFile) -> Self {
        Self { data }
    }

    /// Run over `symbols`, recording every intermediate state.
    ///
    /// The pass never stops early: once in the sink it stays there, and the
    /// backward pass still consumes the zeros.
    #[must_use]
    pub fn run(&self, symbols: &[SymbolId]) -> ForwardTrace {
        let mut states = Vec::with_capacity(symbols.len() + 1);
        let mut state = INITIAL_STATE;
        states.push(state);
        for &symbol in symbols {
            state = self.data.forward_step(state, symbol);
            states.push(state);
        }
        let first_bad_index = states
            .iter()
            .position(|&s| s == SINK_STATE)
            .unwrap_or(symbols.len());
        ForwardTrace {
            accepted: self.data.forward_accepts(state),
            first_bad_index,
            states,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_starts_in_state_one() {
        let data = fixtures::single_a();
        let trace = ForwardPass::new(&data).run(&[]);
        assert_eq!(trace.states, vec![1]);
    }

    #[test]
    fn test_empty_input_acceptance_matches_initial_state() {
        let data = fixtures::single_a();
        let trace = ForwardPass::new(&data).run(&[]);
        assert_eq!(trace.accepted, data.forward_accepts(1));
    }

    #[test]
    fn test_accepting_run() {
        let data = fixtures::single_a();
        let symbols = data.alphabet().map_str("a");
        let trace = ForwardPass::new(&data).run(&symbols);
        assert_eq!(trace.states, vec![1, 2]);
        assert!(trace.accepted);
        assert!(!trace.hit_sink());
        assert_eq!(trace.first_bad_index, 1);
    }

    #[test]
    fn test_sink_does_not_short_circuit() {
        let data = fixtures::repeat_a();
        let symbols = data.alphabet().map_str("axa");
        let trace = ForwardPass::new(&data).run(&symbols);
        assert_eq!(trace.states, vec![1, 2, 0, 0]);
        assert!(!trace.accepted);
        assert_eq!(trace.first_bad_index, 2);
        assert_eq!(trace.reject_offset(), 1);
    }

    #[test]
    fn test_unmapped_first_code_point_rejects_at_zero() {
        let data = fixtures::single_a();
        let symbols = data.alphabet().map_str("\u{10FFFF}");
        let trace = ForwardPass::new(&data).run(&symbols);
        assert_eq!(trace.states, vec![1, 0]);
        assert_eq!(trace.reject_offset(), 0);
    }
}
