//! CLI argument definitions for the dataset update workflow.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "tidas",
    version,
    about = "TIDAS process dataset curation - apply requirement specs to LCA datasets",
    long_about = "Reconcile TIDAS/ILCD process datasets with a declarative requirement file.\n\n\
                  Reports which requirements each dataset misses, writes updated datasets\n\
                  and keeps an audit log of every placeholder and correction."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Workflow configuration file (default: ./tidas.yaml when present).
    #[arg(long = "config", value_name = "PATH", env = "TIDAS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

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
    /// Apply requirements to the user's process datasets and write the results.
    Write(WriteArgs),

    /// Report which requirements each dataset misses without writing anything.
    Check(WorkflowArgs),

    /// List every requirement label the updater understands.
    Labels,
}

/// Inputs shared by `write` and `check`.
#[derive(Args, Clone, Default)]
pub struct WorkflowArgs {
    /// Local repository root holding `<table>/<id>.json` records.
    #[arg(long = "repository", value_name = "DIR")]
    pub repository: Option<PathBuf>,

    /// Requirement specification (YAML).
    #[arg(long = "requirement", value_name = "PATH")]
    pub requirement: Option<PathBuf>,

    /// Translation table mapping displayed enumeration text to locale keys.
    #[arg(long = "translation", value_name = "PATH")]
    pub translation: Option<PathBuf>,

    /// Owner of the datasets to process (detected from the repository when omitted).
    #[arg(long = "user-id", value_name = "ID")]
    pub user_id: Option<String>,

    /// Number of datasets to process (<= 0 means all).
    #[arg(long = "limit", allow_hyphen_values = true)]
    pub limit: Option<i64>,
}

#[derive(Args, Clone, Default)]
pub struct WriteArgs {
    #[command(flatten)]
    pub workflow: WorkflowArgs,

    /// Directory where updated datasets are written.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Audit log path (default: <OUTPUT_DIR>/write_process_workflow.log).
    #[arg(long = "audit-log", value_name = "PATH")]
    pub audit_log: Option<PathBuf>,

    /// Analyse and report without writing datasets or the audit log.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
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
