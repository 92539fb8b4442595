//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// placement-stats - cohort placement statistics reports
///
/// Downloads the master and offer details sheets, computes placement,
/// branch, gender, CTC and company statistics, and writes a report.
///
/// Examples:
///   placement-stats
///   placement-stats --sections --gender --companies
///   placement-stats --spreadsheet-id 1AbCdEfGhIjK --format json
///   placement-stats --master-csv master.csv --offers-csv offers.csv --dry-run
///   placement-stats --history
///   placement-stats --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Google Sheets document id to read both sheets from
    ///
    /// Overrides the id in .placement-stats.toml.
    #[arg(long, value_name = "ID", env = "SPREADSHEET_ID")]
    pub spreadsheet_id: Option<String>,

    /// Read the master sheet from a local CSV file instead of downloading it
    #[arg(long, value_name = "FILE", requires = "offers_csv")]
    pub master_csv: Option<PathBuf>,

    /// Read the offer details sheet from a local CSV file instead of downloading it
    #[arg(long, value_name = "FILE", requires = "master_csv")]
    pub offers_csv: Option<PathBuf>,

    /// Directory to write the report and history index to
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .placement-stats.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Extra download attempts per sheet
    #[arg(long, value_name = "COUNT")]
    pub retries: Option<u32>,

    /// Show individual sections (AIDS A/B, IOT A/B) instead of merged branches
    #[arg(long)]
    pub sections: bool,

    /// Include gender-wise placement breakdown
    #[arg(long)]
    pub gender: bool,

    /// Include company-wise breakdown
    #[arg(long)]
    pub companies: bool,

    /// Hide CTC & offer type analysis
    #[arg(long)]
    pub no_ctc: bool,

    /// Hide month-by-month offer activity timeline
    #[arg(long)]
    pub no_timeline: bool,

    /// Show CTC bracket distribution (0-6, 6-10, 10-20, 20+ LPA)
    #[arg(long)]
    pub ctc_brackets: bool,

    /// Do not record this report in the history index
    #[arg(long)]
    pub no_history: bool,

    /// List previously generated reports and exit
    #[arg(long)]
    pub history: bool,

    /// Fetch, parse and aggregate, print the summary, write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .placement-stats.toml configuration file
    #[arg(long)]
    pub init_config: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// File extension for reports in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref id) = self.spreadsheet_id {
            crate::source::validate_spreadsheet_id(id).map_err(|e| e.to_string())?;
        }

        for path in [&self.master_csv, &self.offers_csv].into_iter().flatten() {
            if !path.is_file() {
                return Err(format!("CSV file does not exist: {}", path.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self, verbose_by_default: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || verbose_by_default {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
