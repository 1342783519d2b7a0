// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments.
//
// Both positionals are optional so that a bare `scanwerk` prints the usage
// text and exits cleanly instead of failing argument parsing.

use std::num::ParseIntError;
use std::path::PathBuf;

use clap::Parser;
use scanwerk_core::types::CaptureMode;
use thiserror::Error;

pub const USAGE: &str = "\
Usage: scanwerk test-to-run[1,2,3] output-directory

1 --> Single page files
2 --> Multipage files
3 --> Single and multipage files

Example:
    scanwerk 1 /tmp/saved_images
";

/// Capture every supported output encoding from a scanner source.
#[derive(Debug, Parser)]
#[command(name = "scanwerk", version, about, long_about = None)]
pub struct Cli {
    /// 1 = single-page files, 2 = multi-page files, any other number = both
    #[arg(value_name = "TEST-TO-RUN", allow_negative_numbers = true)]
    pub test_to_run: Option<String>,

    /// Directory the `Single` and `Multi` output folders are created in
    #[arg(value_name = "OUTPUT-DIRECTORY")]
    pub output_directory: Option<PathBuf>,
}

/// Which batches a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestSelection {
    SinglePage,
    MultiPage,
    Both,
}

#[derive(Debug, Error)]
#[error("test-to-run must be a number, got {input:?} ({source})")]
pub struct SelectorError {
    input: String,
    source: ParseIntError,
}

impl TestSelection {
    /// `1` and `2` pick one mode; every other integer runs both.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let value: i64 = input.trim().parse().map_err(|source| SelectorError {
            input: input.to_string(),
            source,
        })?;
        Ok(match value {
            1 => Self::SinglePage,
            2 => Self::MultiPage,
            _ => Self::Both,
        })
    }

    /// Modes in the order they run.
    pub fn modes(self) -> &'static [CaptureMode] {
        match self {
            Self::SinglePage => &[CaptureMode::SinglePage],
            Self::MultiPage => &[CaptureMode::MultiPage],
            Self::Both => &CaptureMode::ALL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_values() {
        assert_eq!(TestSelection::parse("1").unwrap(), TestSelection::SinglePage);
        assert_eq!(TestSelection::parse("2").unwrap(), TestSelection::MultiPage);
        assert_eq!(TestSelection::parse("3").unwrap(), TestSelection::Both);
        assert_eq!(TestSelection::parse("-7").unwrap(), TestSelection::Both);
        assert_eq!(TestSelection::parse(" 1 ").unwrap(), TestSelection::SinglePage);
    }

    #[test]
    fn non_numeric_selector_is_rejected() {
        let err = TestSelection::parse("single").unwrap_err();
        assert!(err.to_string().contains("single"));
    }

    #[test]
    fn both_runs_single_then_multi() {
        assert_eq!(
            TestSelection::Both.modes(),
            [CaptureMode::SinglePage, CaptureMode::MultiPage]
        );
    }

    #[test]
    fn positionals_are_optional() {
        let cli = Cli::try_parse_from(["scanwerk"]).unwrap();
        assert!(cli.test_to_run.is_none());
        assert!(cli.output_directory.is_none());

        let cli = Cli::try_parse_from(["scanwerk", "2", "/tmp/out"]).unwrap();
        assert_eq!(cli.test_to_run.as_deref(), Some("2"));
        assert_eq!(cli.output_directory, Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn flags_are_rejected() {
        assert!(Cli::try_parse_from(["scanwerk", "--first-source", "1", "/tmp/out"]).is_err());
        assert!(Cli::try_parse_from(["scanwerk", "1", "/tmp/out", "--verbose"]).is_err());
    }

    #[test]
    fn negative_selector_parses_as_positional() {
        let cli = Cli::try_parse_from(["scanwerk", "-1", "/tmp/out"]).unwrap();
        assert_eq!(cli.test_to_run.as_deref(), Some("-1"));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
