#![no_main]

use libfuzzer_sys::fuzz_target;

use ravel::testing::fixtures;
use ravel::{Pipeline, PipelineConfig, ResolverKind};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    if input.len() > 64 {
        return;
    }
    let grammar = fixtures::balanced_parens();
    let backtrack = Pipeline::new(&grammar);
    let parallel = Pipeline::with_config(
        &grammar,
        PipelineConfig {
            resolver: ResolverKind::Parallel,
            ..PipelineConfig::default()
        },
    );
    // Neither resolver may panic, and they must agree on acceptance.
    let a = backtrack.parse(input);
    let b = parallel.parse(input);
    assert_eq!(a.is_ok(), b.is_ok(), "resolvers disagree on {input:?}");
});
