//! End-to-end tests for the command-line front-end.

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use ravel::testing::fixtures;
use ravel_tools::{cli::Cli, run, EXIT_REJECTED, EXIT_USAGE};

fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("ravel_cli_{}_{name}", std::process::id()));
    fs::write(&path, contents).unwrap();
    path
}

fn paren_data_file() -> PathBuf {
    let json = fixtures::balanced_parens_builder().to_json();
    temp_file("parens.json", json.as_bytes())
}

#[test]
fn test_accepted_input_exits_zero() {
    let data = paren_data_file();
    let input = temp_file("ok.txt", b"(())");
    let cli = Cli::parse_from([
        "ravel",
        data.to_str().unwrap(),
        input.to_str().unwrap(),
        "--json",
    ]);
    assert_eq!(run(&cli), 0);
}

#[test]
fn test_rejected_input_exits_one() {
    let data = paren_data_file();
    let input = temp_file("bad.txt", b"(a)");
    let cli = Cli::parse_from(["ravel", data.to_str().unwrap(), input.to_str().unwrap()]);
    assert_eq!(run(&cli), EXIT_REJECTED);
}

#[test]
fn test_ill_nested_input_exits_one() {
    let data = paren_data_file();
    let input = temp_file("illnested.txt", b"((");
    let cli = Cli::parse_from([
        "ravel",
        data.to_str().unwrap(),
        input.to_str().unwrap(),
        "--json",
    ]);
    assert_eq!(run(&cli), EXIT_REJECTED);
}

#[test]
fn test_garbage_data_file_exits_two() {
    let data = temp_file("garbage.json", b"not a data file");
    let input = temp_file("any.txt", b"()");
    let cli = Cli::parse_from(["ravel", data.to_str().unwrap(), input.to_str().unwrap()]);
    assert_eq!(run(&cli), EXIT_USAGE);
}

#[test]
fn test_tree_json_is_valid_json() {
    let data = fixtures::balanced_parens();
    let outcome = ravel::Pipeline::new(&data).parse("(())").unwrap();
    let value: serde_json::Value = serde_json::from_str(&outcome.tree.to_json()).unwrap();
    let root = value.as_array().unwrap();
    assert_eq!(root[0], serde_json::json!("S"));
    assert_eq!(root[2], serde_json::json!(0));
    assert_eq!(root[3], serde_json::json!(4));
}
