//! Clap argument definitions for the `brs` CLI.

use std::path::PathBuf;

use brs_config::ScoringModel;
use clap::{ArgAction, Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "brs")]
#[command(about = "Patent search with BRS boolean, proximity and wildcard queries")]
pub struct Cli {
    /// Increase log output (-v for info, -vv for debug); overrides BRS_LOG
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared flag selecting the index directory.
#[derive(Args, Debug, Clone, Default)]
pub struct IndexDirArgs {
    /// Index directory [default: from configuration, or .brs/index]
    #[arg(long = "index", value_name = "DIR")]
    pub index: Option<PathBuf>,
}

/// Arguments for `brs index`.
#[derive(Args, Debug, Clone)]
pub struct IndexCommand {
    /// JSON Lines file with one patent document per line ("-" reads stdin)
    pub file: PathBuf,

    #[command(flatten)]
    /// Index location override.
    pub dir: IndexDirArgs,

    /// Indexing memory budget in megabytes [default: 512]
    #[arg(long)]
    pub memory_limit_mb: Option<usize>,

    /// Indexing threads, 0 for one per CPU [default: 0]
    #[arg(long)]
    pub workers: Option<usize>,
}

/// Arguments for `brs search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    /// BRS query
    pub query: String,

    /// Maximum results to return [default: 50]
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    #[command(flatten)]
    /// Index location override.
    pub dir: IndexDirArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Show the parsed and compiled query without searching
    #[arg(long)]
    pub explain: bool,

    /// Scoring model: tf_idf or frequency (overrides configuration)
    #[arg(long, value_name = "MODEL")]
    pub scoring: Option<ScoringModel>,
}

/// Arguments for `brs validate`.
#[derive(Args, Debug, Clone)]
pub struct ValidateCommand {
    /// BRS query
    pub query: String,

    /// Validate as the body of a group that already has a field suffix
    #[arg(long)]
    pub inherit: bool,
}

/// Arguments for `brs parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    /// BRS query
    pub query: String,
}

/// Arguments for `brs init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.brs.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `brs` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Build the search index from a JSON Lines file
    Index(IndexCommand),

    /// Search the index and print matching publication numbers
    #[command(after_help = "\
QUERY SYNTAX:
  battery.ti.              Term in one field (ab, clm, cpc, detd, ti)
  ti:battery, cpc:H01M     Field prefix, same as a suffix
  (battery OR cell).ab.    Field suffix applies to the whole group
  a AND b, a OR b          Boolean connectives, evaluated left to right
  a NOT b                  a without b
  a XOR b                  At least one of a and b, but not all
  a ADJ b, a ADJ3 b        b within 1 (or 3) words after a
  a NEAR b, a NEAR3 b      a and b within 1 (or 3) words, any order
  \"fast charging\"          Adjacent words in order
  batter*, b?t, volt$2     Truncation and single-character wildcards

EXAMPLES:
  brs search 'battery.ti.'
  brs search '(lithium ADJ ion).ab. AND charg*.clm.'
  brs search 'H01M10/44.cpc. NOT solar.ti.'
  brs search 'battery' --explain")]
    Search(SearchCommand),

    /// Check that a query is well formed without parsing it
    Validate(ValidateCommand),

    /// Show how a query is tokenized and parsed
    Parse(ParseCommand),

    /// Initialize brs configuration in current directory
    Init(InitCommand),

    /// Show effective configuration settings
    Config,
}
