//! Backwards transducer over the forward state trace.

use super::{EdgeStream, ForwardTrace};
use crate::datafile::{DataFile, INITIAL_STATE};

/// Runs the backwards automaton of a data file over a forward trace.
///
/// Backward state IDs double as edge-set IDs: the state after consuming
/// `forward_states[i]` is emitted at position `i - 1`, and the initial state
/// 1 is emitted at the last position as the terminal edge-set.
#[derive(Debug, Clone, Copy)]
pub struct BackwardPass<'a> {
    data: &'a DataFile,
}

impl<'a> BackwardPass<'a> {
    #[must_use]
    pub const fn new(data: &'a DataFile) -> Self {
        Self { data }
    }

    /// Consume the trace right-to-left and emit per-position edge-set IDs,
    /// indexed left-to-right.
    #[must_use]
    pub fn run(&self, trace: &ForwardTrace) -> EdgeStream {
        let n = trace.states.len() - 1;
        let mut ids = vec![0; n + 1];
        let mut state = INITIAL_STATE;
        ids[n] = state;
        for i in (1..=n).rev() {
            state = self.data.backward_step(state, trace.states[i]);
            ids[i - 1] = state;
        }
        EdgeStream::new(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::ForwardPass;
    use crate::testing::fixtures;

    fn stream_for(data: &crate::DataFile, input: &str) -> EdgeStream {
        let symbols = data.alphabet().map_str(input);
        let trace = ForwardPass::new(data).run(&symbols);
        BackwardPass::new(data).run(&trace)
    }

    #[test]
    fn test_empty_input_is_terminal_only() {
        let data = fixtures::balanced_parens();
        let stream = stream_for(&data, "");
        assert_eq!(stream.ids(), &[1]);
    }

    #[test]
    fn test_length_is_input_plus_one() {
        let data = fixtures::balanced_parens();
        for input in ["", "()", "(())", "((", "))"] {
            let stream = stream_for(&data, input);
            assert_eq!(stream.len(), input.len() + 1);
            assert_eq!(stream.terminal(), 1);
        }
    }

    #[test]
    fn test_paren_stream_ids() {
        let data = fixtures::balanced_parens();
        assert_eq!(stream_for(&data, "()").ids(), &[3, 2, 1]);
        assert_eq!(stream_for(&data, "(())").ids(), &[3, 3, 2, 2, 1]);
    }

    #[test]
    fn test_every_emitted_id_has_edge_tables() {
        let data = fixtures::balanced_parens();
        for input in ["", "()", "(()())", "((((("] {
            let stream = stream_for(&data, input);
            for &id in stream.ids() {
                assert!((id as usize) < data.edge_set_count(), "id {id} out of range");
            }
        }
    }
}
