//! CLI interface for the ravel runtime.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ravel")]
#[command(about = "Run a precompiled grammar over an input file")]
#[command(version)]
pub struct Cli {
    /// Precompiled grammar data file (gzip-wrapped JSON)
    pub data_file: PathBuf,

    /// Input text to parse
    pub input_file: PathBuf,

    /// Emit the first parse tree as nested JSON
    #[arg(long, conflicts_with = "dot")]
    pub json: bool,

    /// Emit the parse graph as GraphViz text (default)
    #[arg(long)]
    pub dot: bool,
}

impl Cli {
    /// The selected output format; DOT when neither flag is given.
    #[must_use]
    pub const fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Dot
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Dot,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_dot() {
        let cli = Cli::parse_from(["ravel", "g.gz", "input.txt"]);
        assert_eq!(cli.format(), OutputFormat::Dot);
        assert_eq!(cli.data_file, PathBuf::from("g.gz"));
    }

    #[test]
    fn test_json_flag() {
        let cli = Cli::parse_from(["ravel", "g.gz", "input.txt", "--json"]);
        assert_eq!(cli.format(), OutputFormat::Json);
    }

    #[test]
    fn test_flags_conflict() {
        assert!(Cli::try_parse_from(["ravel", "g.gz", "input.txt", "--json", "--dot"]).is_err());
    }

    #[test]
    fn test_missing_args_is_usage_error() {
        assert!(Cli::try_parse_from(["ravel", "g.gz"]).is_err());
    }
}
