//! Command-line parsing for the automobile sales dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the data/aggregation code.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::data::FALLBACK_URL;
use crate::domain::{ReportMode, YEAR_MAX, YEAR_MIN};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "autodash", version, about = "Automobile Sales Dashboard (CSV-based)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard.
    ///
    /// This uses the same assembler as `autodash report`, but renders the
    /// charts in a terminal UI using Ratatui.
    Tui(DataArgs),
    /// Render one report selection to stdout (useful for scripting).
    Report(ReportArgs),
}

/// Options shared by every command that loads the dataset.
#[derive(Debug, Parser, Clone)]
pub struct DataArgs {
    /// Path to the sales CSV.
    #[arg(long, default_value = "automobile-sales.csv")]
    pub data: PathBuf,

    /// URL fetched when the local CSV cannot be read.
    #[arg(long, default_value = FALLBACK_URL)]
    pub url: String,
}

/// Options for the non-interactive report.
#[derive(Debug, Parser)]
pub struct ReportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Report type to render (omit for an empty render).
    #[arg(long, value_enum)]
    pub mode: Option<ReportMode>,

    /// Year for the Yearly report.
    #[arg(long, value_parser = clap::value_parser!(i32).range(YEAR_MIN as i64..=YEAR_MAX as i64))]
    pub year: Option<i32>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// How `report` writes its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned tables, one per chart.
    Text,
    /// The serialized chart grid.
    Json,
}
