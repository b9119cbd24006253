//! CLI argument parsing for Benchlens

use crate::ingest::DEFAULT_CSV_PREFIX;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for rendered reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Self-contained HTML page (default)
    Html,
    /// JSON document for machine parsing
    Json,
}

impl OutputFormat {
    /// File extension of report files in this format
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "benchlens")]
#[command(version)]
#[command(about = "Benchmark snapshot converter and regression reporter", long_about = None)]
pub struct Cli {
    /// Report root holding benchmark-groups.json, data/ and fragments/
    #[arg(long, global = true, value_name = "DIR", default_value = "reports")]
    pub root: PathBuf,

    /// Report output format
    #[arg(long = "format", value_enum, global = true, default_value = "html")]
    pub format: OutputFormat,

    /// Enable debug tracing output (to stderr)
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Convert BenchmarkDotNet CSV results into snapshot documents under data/latest
    Convert {
        /// BenchmarkDotNet results directory (default: ../BenchmarkDotNet.Artifacts/results)
        #[arg(long, value_name = "DIR")]
        artifacts: Option<PathBuf>,

        /// File name prefix of the results CSVs
        #[arg(long, value_name = "PREFIX", default_value = DEFAULT_CSV_PREFIX)]
        prefix: String,
    },

    /// Render the public report from one snapshot directory
    Public {
        /// Snapshot directory to report on (default: data/baseline)
        #[arg(long = "data-dir", value_name = "DIR")]
        data_dir: Option<PathBuf>,
    },

    /// Compare data/latest against data/baseline
    Regression {
        /// Temporal regression threshold in percent
        #[arg(long, value_name = "PERCENT")]
        threshold: Option<f64>,
    },

    /// Promote data/latest to data/baseline
    Baseline,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["benchlens", "baseline"]);
        assert_eq!(cli.root, PathBuf::from("reports"));
        assert_eq!(cli.format, OutputFormat::Html);
        assert!(!cli.debug);
        assert_eq!(cli.command, Command::Baseline);
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "benchlens",
            "regression",
            "--root",
            "bench/reports",
            "--format",
            "json",
            "--debug",
        ]);
        assert_eq!(cli.root, PathBuf::from("bench/reports"));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.debug);
        assert_eq!(cli.command, Command::Regression { threshold: None });
    }

    #[test]
    fn test_cli_convert_defaults() {
        let cli = Cli::parse_from(["benchlens", "convert"]);
        assert_eq!(
            cli.command,
            Command::Convert {
                artifacts: None,
                prefix: DEFAULT_CSV_PREFIX.to_string(),
            }
        );
    }

    #[test]
    fn test_cli_convert_artifacts() {
        let cli = Cli::parse_from([
            "benchlens",
            "convert",
            "--artifacts",
            "/tmp/results",
            "--prefix",
            "MyLib.",
        ]);
        assert_eq!(
            cli.command,
            Command::Convert {
                artifacts: Some(PathBuf::from("/tmp/results")),
                prefix: "MyLib.".to_string(),
            }
        );
    }

    #[test]
    fn test_cli_public_data_dir() {
        let cli = Cli::parse_from(["benchlens", "public", "--data-dir", "data/latest"]);
        assert_eq!(
            cli.command,
            Command::Public {
                data_dir: Some(PathBuf::from("data/latest")),
            }
        );
    }

    #[test]
    fn test_cli_regression_threshold() {
        let cli = Cli::parse_from(["benchlens", "regression", "--threshold", "2.5"]);
        assert_eq!(cli.command, Command::Regression { threshold: Some(2.5) });
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["benchlens"]).is_err());
    }

    #[test]
    fn test_output_format_extension() {
        assert_eq!(OutputFormat::Html.extension(), "html");
        assert_eq!(OutputFormat::Json.extension(), "json");
    }
}
