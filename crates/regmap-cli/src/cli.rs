//! CLI argument definitions for the register map converter.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use regmap_model::SourceKind;

#[derive(Parser)]
#[command(
    name = "regmap",
    version,
    about = "Convert vendor register maps into normalized parameter tables",
    long_about = "Convert vendor register maps into normalized parameter tables.\n\n\
                  Reads HTML exports, controller workbooks and PDF manuals, and writes\n\
                  one record per parameter with permissions, sampling, length and category."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert one request's documents into parameter records.
    Convert(ConvertArgs),

    /// List the supported source kinds.
    Kinds,

    /// Print the built-in rule profile of a source kind.
    Profile {
        #[arg(value_name = "KIND", value_parser = parse_kind)]
        kind: SourceKind,
    },
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// Declared source kind of every document.
    #[arg(long = "kind", value_name = "KIND", value_parser = parse_kind)]
    pub kind: SourceKind,

    /// Documents in order; only pdf-multi-document accepts more than one.
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Output file (JSON to stdout when omitted).
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format (default: from the output extension, else json).
    #[arg(long = "format", value_enum)]
    pub format: Option<OutputFormatArg>,

    /// Rule profile replacing the built-in one for its kind.
    #[arg(long = "profile", value_name = "FILE")]
    pub profile: Option<PathBuf>,

    /// Check output invariants and exit with status 2 on violations.
    #[arg(long = "check")]
    pub check: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Csv,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_kind(value: &str) -> Result<SourceKind, String> {
    value.parse()
}
