//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the sales CSV (local file, remote fallback)
//! - assembles chart grids
//! - prints reports or launches the TUI

use clap::Parser;

use crate::cli::{Command, OutputFormat, ReportArgs};
use crate::domain::ReportSelection;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `autodash` binary.
pub fn run() -> Result<(), AppError> {
    // We want `autodash` and `autodash --data x.csv` to behave like
    // `autodash tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => crate::tui::run(&args),
        Command::Report(args) => handle_report(args),
    }
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let outcome = pipeline::load_dataset(&args.data)?;
    let selection = ReportSelection::new(args.mode, args.year);
    let grid = crate::report::assemble(&outcome.loaded.dataset, &selection);

    match args.format {
        OutputFormat::Text => {
            print!(
                "{}",
                crate::report::format::format_report_header(&outcome.loaded, &selection)
            );
            print!("{}", crate::report::format::format_chart_grid(&grid));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&grid)
                .map_err(|e| AppError::new(4, format!("Failed to serialize chart grid: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}

/// Rewrite argv so `autodash` defaults to `autodash tui`.
///
/// Rules:
/// - `autodash`                      -> `autodash tui`
/// - `autodash --data x.csv ...`     -> `autodash tui --data x.csv ...`
/// - `autodash --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "report");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(args(&["autodash"])), args(&["autodash", "tui"]));
    }

    #[test]
    fn leading_flag_is_treated_as_tui_flag() {
        assert_eq!(
            rewrite_args(args(&["autodash", "--data", "x.csv"])),
            args(&["autodash", "tui", "--data", "x.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(args(&["autodash", "report", "--mode", "yearly"])),
            args(&["autodash", "report", "--mode", "yearly"])
        );
        assert_eq!(rewrite_args(args(&["autodash", "--help"])), args(&["autodash", "--help"]));
    }
}
