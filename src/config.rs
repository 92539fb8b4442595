//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.placement-stats.toml` files.

use crate::cli::OutputFormat;
use crate::models::ReportOptions;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".placement-stats.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Data source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Cohort layout.
    #[serde(default)]
    pub cohort: CohortConfig,

    /// Report sections to render.
    #[serde(default)]
    pub report: ReportOptions,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory reports and the history index are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Report format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Record generated reports in the history index.
    #[serde(default = "default_true")]
    pub history: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            format: OutputFormat::default(),
            verbose: false,
            history: true,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./output")
}

fn default_true() -> bool {
    true
}

/// Spreadsheet export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Google Sheets document id.
    #[serde(default = "default_spreadsheet_id")]
    pub spreadsheet_id: String,

    /// Sheet gid of the master (one row per student) sheet.
    #[serde(default = "default_master_gid")]
    pub master_gid: String,

    /// Sheet gid of the offer details (one row per offer) sheet.
    #[serde(default = "default_offer_details_gid")]
    pub offer_details_gid: String,

    /// Extra attempts after a failed download.
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Delay between download attempts in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: default_spreadsheet_id(),
            master_gid: default_master_gid(),
            offer_details_gid: default_offer_details_gid(),
            retries: default_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_spreadsheet_id() -> String {
    "1U2qXle0-70mWfAj9En_YoQJShbcI2fYY230kCGbLiXE".to_string()
}

fn default_master_gid() -> String {
    "1878175017".to_string()
}

fn default_offer_details_gid() -> String {
    "208317160".to_string()
}

fn default_retries() -> u32 {
    2
}

fn default_retry_delay_ms() -> u64 {
    2000
}

fn default_timeout() -> u64 {
    60
}

/// Cohort layout and report labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortConfig {
    /// Institution name printed on the report.
    #[serde(default = "default_institution")]
    pub institution: String,

    /// Report title.
    #[serde(default = "default_report_title")]
    pub report_title: String,

    /// Section-level labels ("class section").
    #[serde(default = "default_branch_order")]
    pub branch_order: Vec<String>,

    /// Class-level labels.
    #[serde(default = "default_merged_branch_order")]
    pub merged_branch_order: Vec<String>,

    /// Size of the top recruiters list.
    #[serde(default = "default_top_recruiters")]
    pub top_recruiters: usize,

    /// Company names counted under another name.
    #[serde(default = "default_company_aliases")]
    pub company_aliases: IndexMap<String, String>,
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            institution: default_institution(),
            report_title: default_report_title(),
            branch_order: default_branch_order(),
            merged_branch_order: default_merged_branch_order(),
            top_recruiters: default_top_recruiters(),
            company_aliases: default_company_aliases(),
        }
    }
}

fn default_institution() -> String {
    "Shiv Nadar University Chennai".to_string()
}

fn default_report_title() -> String {
    "Placement Statistics Report".to_string()
}

fn default_branch_order() -> Vec<String> {
    vec!["AIDS A", "AIDS B", "IOT A", "IOT B", "CS"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_merged_branch_order() -> Vec<String> {
    vec!["AIDS", "IOT", "CS"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_company_aliases() -> IndexMap<String, String> {
    [("Citibank PPO", "Citibank")]
        .into_iter()
        .map(|(raw, canonical)| (raw.to_string(), canonical.to_string()))
        .collect()
}

fn default_top_recruiters() -> usize {
    10
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref dir) = args.output_dir {
            self.general.output_dir = dir.clone();
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if let Some(ref id) = args.spreadsheet_id {
            self.source.spreadsheet_id = id.clone();
        }
        if let Some(retries) = args.retries {
            self.source.retries = retries;
        }
        if args.no_history {
            self.general.history = false;
        }
        if args.verbose {
            self.general.verbose = true;
        }

        // Additive flags switch sections on, --no-* flags switch them off
        let report = &mut self.report;
        report.show_sections |= args.sections;
        report.show_gender |= args.gender;
        report.show_companies |= args.companies;
        report.show_ctc_brackets |= args.ctc_brackets;
        if args.no_ctc {
            report.show_ctc = false;
        }
        if args.no_timeline {
            report.show_timeline = false;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
