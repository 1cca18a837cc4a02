//! Tests for the on-disk document shape and its verification.

use std::io::Write;

use ravel::testing::fixtures;
use ravel::{DataFile, DataFileError, Pipeline};

#[test]
fn test_full_document_loads_and_parses() {
    let json = fixtures::balanced_parens_builder().to_json();
    let data = DataFile::from_slice(json.as_bytes()).unwrap();
    let outcome = Pipeline::new(&data).parse("(())").unwrap();
    assert_eq!(
        outcome.tree.to_json(),
        r#"["S",[["S",[["S",[],2,2]],1,3]],0,4]"#
    );
}

#[test]
fn test_gzip_container_loads() {
    let json = fixtures::balanced_parens_builder().to_json();
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::best());
    encoder.write_all(json.as_bytes()).unwrap();
    let wrapped = encoder.finish().unwrap();

    let data = DataFile::from_slice(&wrapped).unwrap();
    assert!(Pipeline::new(&data).parse("()").is_ok());
}

#[test]
fn test_handwritten_document_with_integer_accepts() {
    let doc = r#"{
        "input_to_symbol": [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
                            0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
                            0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
                            0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
                            0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
                            0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
                            0, 1],
        "forwards": [
            {},
            {"transitions": {"1": 2}, "accepts": 0},
            {"transitions": {}, "accepts": 1}
        ],
        "backwards": [
            {},
            {"transitions": {"2": 2}, "accepts": 0},
            {"transitions": {}, "accepts": 0}
        ],
        "vertices": [
            {},
            {"type": "start", "text": "S", "with": 2},
            {"type": "final", "with": 1},
            {},
            {}
        ],
        "null_edges": [[], [[4, 2]], [[1, 3]]],
        "char_edges": [[], [], [[3, 4]]],
        "start_vertex": 1,
        "final_vertex": 2
    }"#;
    let data = DataFile::from_slice(doc.as_bytes()).unwrap();
    // Code point 97 ('a') maps to symbol 1.
    let outcome = Pipeline::new(&data).parse("a").unwrap();
    assert_eq!(outcome.tree.to_json(), r#"["S",[],0,1]"#);
}

#[test]
fn test_missing_roots_is_a_decode_error() {
    let err = DataFile::from_slice(b"{\"forwards\": []}").unwrap_err();
    assert!(matches!(err, DataFileError::Decode(_)));
}

#[test]
fn test_sort_keys_survive_the_loader() {
    let json = serde_json::json!({
        "input_to_symbol": [],
        "forwards": [null, {"accepts": true}],
        "backwards": [null, {}],
        "vertices": [
            null,
            {"type": "start", "text": "S", "with": 2, "sort_key": -3},
            {"type": "final", "with": 1}
        ],
        "null_edges": [[], [[1, 2]]],
        "char_edges": [[], []],
        "start_vertex": 1,
        "final_vertex": 2
    });
    let data = DataFile::from_slice(serde_json::to_vec(&json).unwrap().as_slice()).unwrap();
    assert_eq!(data.vertex(1).sort_key, -3);
    assert_eq!(data.vertex(2).sort_key, 0);
}

#[test]
fn test_verification_failures_are_invalid_errors() {
    let base = serde_json::json!({
        "input_to_symbol": [],
        "forwards": [null, {"accepts": true}],
        "backwards": [null, {}],
        "vertices": [null, {"type": "start", "text": "S", "with": 2}, {"type": "final", "with": 1}],
        "null_edges": [[], [[1, 2]]],
        "char_edges": [[], []],
        "start_vertex": 1,
        "final_vertex": 2
    });

    let cases: Vec<(&str, serde_json::Value)> = vec![
        ("final_vertex", serde_json::json!(99)),
        ("start_vertex", serde_json::json!(0)),
        ("char_edges", serde_json::json!([[]])),
        ("backwards", serde_json::json!([null, {}, {}, {}])),
        ("null_edges", serde_json::json!([[], [[1, 77]]])),
    ];
    for (key, value) in cases {
        let mut doc = base.clone();
        doc[key] = value;
        let bytes = serde_json::to_vec(&doc).unwrap();
        let err = DataFile::from_slice(&bytes).unwrap_err();
        assert!(matches!(err, DataFileError::Invalid(_)), "{key}: {err}");
    }
}
