//! End-to-end tests for the scan + resolve pipeline.

use ravel::testing::fixtures;
use ravel::{
    ForwardPass, ParseError, Pipeline, PipelineConfig, ResolverKind, Span,
};

fn parallel_pipeline(data: &ravel::DataFile) -> Pipeline<'_> {
    Pipeline::with_config(
        data,
        PipelineConfig {
            resolver: ResolverKind::Parallel,
            ..PipelineConfig::default()
        },
    )
}

#[test]
fn test_forward_trace_always_starts_in_state_one() {
    for data in [
        fixtures::single_a(),
        fixtures::balanced_parens(),
        fixtures::guarded_choice(),
    ] {
        for input in ["", "a", "ab", "()", "zzz"] {
            let symbols = data.alphabet().map_str(input);
            let trace = ForwardPass::new(&data).run(&symbols);
            assert_eq!(trace.states[0], 1);
            assert_eq!(trace.states.len(), input.chars().count() + 1);
        }
    }
}

#[test]
fn test_empty_input_accepts_iff_initial_state_accepts() {
    let accepts_empty = fixtures::balanced_parens();
    assert!(Pipeline::new(&accepts_empty).parse("").is_ok());

    let rejects_empty = fixtures::single_a();
    assert_eq!(
        Pipeline::new(&rejects_empty).parse("").unwrap_err(),
        ParseError::InputRejected { offset: 0 }
    );
}

#[test]
fn test_edge_stream_length_is_input_plus_one() {
    let data = fixtures::balanced_parens();
    let pipeline = Pipeline::new(&data);
    for input in ["", "()", "(())", "(((", "()))"] {
        if let Ok(stream) = pipeline.scan(input) {
            assert_eq!(stream.len(), input.len() + 1);
            assert_eq!(stream.terminal(), 1);
        }
    }
}

#[test]
fn test_unmapped_code_point_rejects_at_offset_zero() {
    let data = fixtures::single_a();
    let pipeline = Pipeline::new(&data);
    assert_eq!(
        pipeline.parse("\u{1F600}").unwrap_err(),
        ParseError::InputRejected { offset: 0 }
    );
}

#[test]
fn test_rejection_offset_points_at_offending_code_point() {
    let data = fixtures::repeat_a();
    let pipeline = Pipeline::new(&data);
    assert_eq!(
        pipeline.parse("aaab").unwrap_err(),
        ParseError::InputRejected { offset: 3 }
    );
    assert_eq!(
        pipeline.parse("b").unwrap_err(),
        ParseError::InputRejected { offset: 0 }
    );
}

#[test]
fn test_root_span_covers_whole_input() {
    let data = fixtures::balanced_parens();
    for input in ["", "()", "(())", "((()))"] {
        for pipeline in [Pipeline::new(&data), parallel_pipeline(&data)] {
            let outcome = pipeline.parse(input).unwrap();
            let n = u32::try_from(input.len()).unwrap();
            assert_eq!(outcome.tree.span, Span::new(0, n), "{input:?}");
        }
    }
}

#[test]
fn test_dfa_accepted_but_ill_nested_is_no_parse_tree() {
    let data = fixtures::balanced_parens();
    for input in ["((", "))", "())"] {
        for pipeline in [Pipeline::new(&data), parallel_pipeline(&data)] {
            assert_eq!(
                pipeline.parse(input).unwrap_err(),
                ParseError::NoParseTree,
                "{input:?}"
            );
        }
    }
}

#[test]
fn test_resolvers_agree_on_guard_semantics() {
    let bypass = fixtures::guarded_choice();
    for pipeline in [Pipeline::new(&bypass), parallel_pipeline(&bypass)] {
        assert_eq!(pipeline.parse("ab").unwrap().tree.to_json(), r#"["S",[],0,2]"#);
    }

    let trapped = fixtures::guard_only();
    for pipeline in [Pipeline::new(&trapped), parallel_pipeline(&trapped)] {
        assert_eq!(pipeline.parse("ab").unwrap_err(), ParseError::NoParseTree);
    }
}

#[test]
fn test_nested_spans_are_contained() {
    let data = fixtures::balanced_parens();
    let outcome = Pipeline::new(&data).parse("((()))").unwrap();
    let mut node = &outcome.tree;
    while let Some(child) = node.children.first() {
        assert_eq!(node.children.len(), 1);
        assert!(node.span.contains_span(child.span));
        assert_eq!(child.span.start(), node.span.start() + 1);
        assert_eq!(child.span.end() + 1, node.span.end());
        node = child;
    }
    assert!(node.span.is_empty());
}

#[test]
fn test_shared_data_file_across_pipelines() {
    let data = fixtures::balanced_parens();
    let a = Pipeline::new(&data);
    let b = parallel_pipeline(&data);
    let tree_a = a.parse("(())").unwrap().tree;
    let tree_b = b.parse("(())").unwrap().tree;
    assert_eq!(tree_a, tree_b);
}
