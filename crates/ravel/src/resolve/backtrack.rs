//! Depth-first, priority-ordered search for one well-nested path.

use compact_str::{format_compact, CompactString};
use smallvec::SmallVec;

use super::{ResolveMetrics, ResolveOutcome, SharedStack};
use crate::datafile::{DataFile, VertexId, VertexKind};
use crate::error::ParseError;
use crate::scan::EdgeStream;
use crate::tree::{tree_from_events, TreeEvent};

/// Guard rails for the backtracking search.
///
/// Pathological data files can make the search diverge (a null cycle through
/// a `start` vertex grows the stack without consuming input), so both the
/// step count and the frontier size are bounded.
#[derive(Debug, Clone, Copy)]
pub struct BacktrackConfig {
    /// Maximum vertices visited across all frontier elements.
    pub max_steps: usize,
    /// Maximum parked alternatives.
    pub max_frontier: usize,
}

impl Default for BacktrackConfig {
    fn default() -> Self {
        Self {
            max_steps: 1_000_000,
            max_frontier: 65_536,
        }
    }
}

/// One frame of a parser's bracket stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    vertex: VertexId,
    offset: usize,
}

/// A cloned parser record: position, vertex, bracket stack, output log.
#[derive(Debug, Clone)]
struct Parser {
    offset: usize,
    vertex: VertexId,
    stack: SharedStack<Frame>,
    output: SharedStack<TreeEvent>,
}

/// Finds the first well-nested path through the parse graph and emits its
/// nested tree.
///
/// Successors are explored stably by `sort_key` (ascending, missing keys as
/// 0) with null successors before char successors on ties; the head parser
/// takes the best successor and one frontier element is parked per remaining
/// alternative, sharing the stack and output through their common prefix.
#[derive(Debug, Clone, Copy)]
pub struct BacktrackResolver<'a> {
    data: &'a DataFile,
    config: BacktrackConfig,
}

impl<'a> BacktrackResolver<'a> {
    #[must_use]
    pub fn new(data: &'a DataFile) -> Self {
        Self {
            data,
            config: BacktrackConfig::default(),
        }
    }

    #[must_use]
    pub const fn with_config(data: &'a DataFile, config: BacktrackConfig) -> Self {
        Self { data, config }
    }

    /// Search for a well-nested path through `stream`.
    ///
    /// # Errors
    ///
    /// [`ParseError::NoParseTree`] when the frontier empties without an
    /// accepted path; [`ParseError::LimitExceeded`] when the configured
    /// budget runs out first.
    pub fn resolve(&self, stream: &EdgeStream) -> Result<ResolveOutcome, ParseError> {
        let data = self.data;
        let mut metrics = ResolveMetrics::default();
        let mut frontier: Vec<Parser> = vec![Parser {
            offset: 0,
            vertex: data.start_vertex(),
            stack: SharedStack::new(),
            output: SharedStack::new(),
        }];

        'frontier: while let Some(mut parser) = frontier.pop() {
            loop {
                metrics.steps += 1;
                if metrics.steps > self.config.max_steps {
                    return Err(ParseError::LimitExceeded {
                        steps: metrics.steps,
                    });
                }

                let vertex_id = parser.vertex;
                let vertex = data.vertex(vertex_id);
                match vertex.kind {
                    Some(kind @ (VertexKind::Start | VertexKind::If)) => {
                        // A pair with no partner can never close; drop rather
                        // than guess a pairing.
                        if vertex.with.is_none() {
                            metrics.discards += 1;
                            continue 'frontier;
                        }
                        parser.stack.push(Frame {
                            vertex: vertex_id,
                            offset: parser.offset,
                        });
                        metrics.max_stack_depth = metrics.max_stack_depth.max(parser.stack.len());
                        if kind == VertexKind::Start {
                            parser.output.push(TreeEvent::Open {
                                name: vertex_name(vertex.text.as_ref(), vertex_id),
                            });
                        }
                    }
                    Some(VertexKind::Final) => {
                        let matched = parser
                            .stack
                            .top()
                            .is_some_and(|f| data.vertex(f.vertex).with == Some(vertex_id));
                        if !matched {
                            metrics.discards += 1;
                            continue 'frontier;
                        }
                        let frame = parser.stack.pop().expect("matched frame present");
                        parser.output.push(TreeEvent::Close {
                            start: offset_u32(frame.offset),
                            end: offset_u32(parser.offset),
                        });
                    }
                    Some(VertexKind::Fi) => {
                        // Completing the bracket means the guarded (negated)
                        // pattern matched; ill-nested arrivals die the same
                        // way.
                        metrics.discards += 1;
                        continue 'frontier;
                    }
                    None => {}
                }

                if vertex_id == data.final_vertex()
                    && parser.offset + 1 >= stream.len()
                    && parser.stack.is_empty()
                {
                    let events = parser.output.to_vec();
                    let tree = tree_from_events(&events).ok_or(ParseError::NoParseTree)?;
                    return Ok(ResolveOutcome {
                        tree,
                        ambiguous: false,
                        metrics,
                    });
                }

                let edge_set = stream.get(parser.offset);
                let mut successors: SmallVec<[(VertexId, bool); 8]> = SmallVec::new();
                for &(from, to) in data.null_edges(edge_set) {
                    if from == vertex_id {
                        successors.push((to, false));
                    }
                }
                for &(from, to) in data.char_edges(edge_set) {
                    if from == vertex_id {
                        successors.push((to, true));
                    }
                }
                if successors.is_empty() {
                    metrics.discards += 1;
                    continue 'frontier;
                }
                // Stable, so nulls stay ahead of chars on equal keys.
                successors.sort_by_key(|&(to, _)| data.vertex(to).sort_key);

                for &(to, consumes) in successors[1..].iter().rev() {
                    frontier.push(Parser {
                        offset: parser.offset + usize::from(consumes),
                        vertex: to,
                        stack: parser.stack.clone(),
                        output: parser.output.clone(),
                    });
                    metrics.forks += 1;
                }
                if frontier.len() > self.config.max_frontier {
                    return Err(ParseError::LimitExceeded {
                        steps: metrics.steps,
                    });
                }

                let (to, consumes) = successors[0];
                parser.offset += usize::from(consumes);
                parser.vertex = to;
            }
        }

        Err(ParseError::NoParseTree)
    }
}

fn vertex_name(text: Option<&CompactString>, vertex: VertexId) -> CompactString {
    text.cloned().unwrap_or_else(|| format_compact!("{vertex}"))
}

fn offset_u32(offset: usize) -> u32 {
    u32::try_from(offset).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::{BackwardPass, ForwardPass};
    use crate::testing::fixtures;
    use crate::tree::Span;

    fn resolve(data: &DataFile, input: &str) -> Result<ResolveOutcome, ParseError> {
        let symbols = data.alphabet().map_str(input);
        let trace = ForwardPass::new(data).run(&symbols);
        assert!(trace.accepted, "fixture input must pass the forward automaton");
        let stream = BackwardPass::new(data).run(&trace);
        BacktrackResolver::new(data).resolve(&stream)
    }

    #[test]
    fn test_single_char_tree() {
        let data = fixtures::single_a();
        let outcome = resolve(&data, "a").unwrap();
        assert_eq!(outcome.tree.name, "S");
        assert_eq!(outcome.tree.span, Span::new(0, 1));
        assert!(outcome.tree.children.is_empty());
    }

    #[test]
    fn test_empty_input_tree() {
        let data = fixtures::balanced_parens();
        let outcome = resolve(&data, "").unwrap();
        assert_eq!(outcome.tree.to_json(), r#"["S",[],0,0]"#);
    }

    #[test]
    fn test_nested_parens_tree() {
        let data = fixtures::balanced_parens();
        let outcome = resolve(&data, "(())").unwrap();
        assert_eq!(
            outcome.tree.to_json(),
            r#"["S",[["S",[["S",[],2,2]],1,3]],0,4]"#
        );
    }

    #[test]
    fn test_unbalanced_input_has_no_tree() {
        let data = fixtures::balanced_parens();
        assert_eq!(resolve(&data, "((").unwrap_err(), ParseError::NoParseTree);
    }

    #[test]
    fn test_sort_key_picks_lower_alternative_first() {
        let data = fixtures::two_alternatives();
        let outcome = resolve(&data, "a").unwrap();
        // Branch B carries the lower sort key and wins the tie-break.
        assert_eq!(outcome.tree.to_json(), r#"["S",[["B",[],0,1]],0,1]"#);
    }

    #[test]
    fn test_guard_discard_falls_back_to_bypass() {
        let data = fixtures::guarded_choice();
        let outcome = resolve(&data, "ab").unwrap();
        assert_eq!(outcome.tree.to_json(), r#"["S",[],0,2]"#);
        assert!(outcome.metrics.discards >= 1);
    }

    #[test]
    fn test_guard_only_path_is_rejected() {
        let data = fixtures::guard_only();
        assert_eq!(resolve(&data, "ab").unwrap_err(), ParseError::NoParseTree);
    }

    #[test]
    fn test_null_cycle_with_exit_terminates() {
        let data = fixtures::null_cycle();
        let outcome = resolve(&data, "").unwrap();
        assert_eq!(outcome.tree.to_json(), r#"["S",[],0,0]"#);
    }

    #[test]
    fn test_dead_null_cycle_hits_step_limit() {
        let data = fixtures::dead_null_cycle();
        let resolver = BacktrackResolver::with_config(
            &data,
            BacktrackConfig {
                max_steps: 1_000,
                max_frontier: 64,
            },
        );
        let stream = EdgeStream::new(vec![1]);
        assert!(matches!(
            resolver.resolve(&stream),
            Err(ParseError::LimitExceeded { .. })
        ));
    }

    #[test]
    fn test_missing_with_discards_parser() {
        let data = fixtures::missing_with();
        let stream = EdgeStream::new(vec![1]);
        let err = BacktrackResolver::new(&data).resolve(&stream).unwrap_err();
        assert_eq!(err, ParseError::NoParseTree);
    }
}
