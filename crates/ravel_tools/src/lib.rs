//! Command-line front-end for the ravel runtime.
//!
//! `ravel <data-file> <input-file> [--json | --dot]` loads the precompiled
//! grammar, parses the input, and prints either the parse graph as GraphViz
//! text (the default) or the first parse tree as nested JSON.
//!
//! Exit codes: 0 = accepted and output emitted, 1 = input rejected,
//! 2 = usage or format error.

pub mod cli;

use std::fs;
use std::path::Path;

use ravel::{DataFile, ParseError, Pipeline};

use cli::{Cli, OutputFormat};

/// Exit code for a rejected input.
pub const EXIT_REJECTED: i32 = 1;
/// Exit code for usage and format errors.
pub const EXIT_USAGE: i32 = 2;

/// Run the front-end; returns the process exit code.
#[must_use]
pub fn run(cli: &Cli) -> i32 {
    let data = match load_data_file(&cli.data_file) {
        Ok(data) => data,
        Err(message) => {
            eprintln!("ravel: {message}");
            return EXIT_USAGE;
        }
    };
    let input = match fs::read_to_string(&cli.input_file) {
        Ok(input) => input,
        Err(err) => {
            eprintln!("ravel: {}: {err}", cli.input_file.display());
            return EXIT_USAGE;
        }
    };

    let pipeline = Pipeline::new(&data);
    let result = match cli.format() {
        OutputFormat::Dot => pipeline.dot(&input),
        OutputFormat::Json => pipeline.parse(&input).map(|outcome| outcome.tree.to_json()),
    };
    match result {
        Ok(output) => {
            println!("{output}");
            0
        }
        Err(err @ ParseError::InputRejected { offset }) => {
            eprintln!("ravel: {err} (forward automaton entered the sink at offset {offset})");
            EXIT_REJECTED
        }
        Err(err) => {
            eprintln!("ravel: {err}");
            EXIT_REJECTED
        }
    }
}

fn load_data_file(path: &Path) -> Result<DataFile, String> {
    let bytes = fs::read(path).map_err(|err| format!("{}: {err}", path.display()))?;
    DataFile::from_slice(&bytes).map_err(|err| format!("{}: {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_missing_data_file_is_usage_error() {
        let cli = Cli::parse_from(["ravel", "/nonexistent/g.gz", "/nonexistent/in.txt"]);
        assert_eq!(run(&cli), EXIT_USAGE);
    }
}
