//! Sheet data sources.
//!
//! The master and offer details sheets come either from a Google Sheets
//! CSV export or from local CSV files. Both sheets are loaded concurrently
//! and parsed into typed records before any aggregation runs.

pub mod fetcher;
pub mod parser;

pub use fetcher::RetryPolicy;
pub use parser::{parse_master_sheet, parse_offer_details};

use crate::config::SourceConfig;
use crate::models::{OfferRecord, StudentRecord};
use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

const SPREADSHEET_ID_PATTERN: &str = r"^[a-zA-Z0-9_-]{10,60}$";

/// Errors raised while obtaining sheet text.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(
        "Could not fetch data from Google Sheets after {attempts} attempts.\n\
         URL: {url}\n\
         Error: {message}\n\
         Check your internet connection and ensure the sheet is publicly accessible."
    )]
    Fetch {
        url: String,
        attempts: u32,
        message: String,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid spreadsheet id format: {0}")]
    InvalidSpreadsheetId(String),
}

/// Check that a spreadsheet id looks like a Google Sheets document id.
pub fn validate_spreadsheet_id(id: &str) -> Result<(), SourceError> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(SPREADSHEET_ID_PATTERN).expect("spreadsheet id pattern is valid")
    });

    if pattern.is_match(id) {
        Ok(())
    } else {
        Err(SourceError::InvalidSpreadsheetId(id.to_string()))
    }
}

/// CSV export URL for one sheet of a spreadsheet.
pub fn sheet_csv_url(spreadsheet_id: &str, gid: &str) -> String {
    format!(
        "https://docs.google.com/spreadsheets/d/{}/export?format=csv&gid={}",
        spreadsheet_id, gid
    )
}

/// Where the two sheets come from.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Download both sheets over HTTP.
    Remote {
        master_url: String,
        offers_url: String,
        policy: RetryPolicy,
        timeout: Duration,
    },
    /// Read both sheets from local files.
    Local { master: PathBuf, offers: PathBuf },
}

impl DataSource {
    /// Remote source for the configured spreadsheet.
    pub fn from_config(config: &SourceConfig) -> Result<Self, SourceError> {
        validate_spreadsheet_id(&config.spreadsheet_id)?;
        Ok(DataSource::Remote {
            master_url: sheet_csv_url(&config.spreadsheet_id, &config.master_gid),
            offers_url: sheet_csv_url(&config.spreadsheet_id, &config.offer_details_gid),
            policy: RetryPolicy::from(config),
            timeout: Duration::from_secs(config.timeout_seconds),
        })
    }

    /// Human readable description for logs and report metadata.
    pub fn describe(&self) -> String {
        match self {
            DataSource::Remote { master_url, .. } => master_url
                .split("/d/")
                .nth(1)
                .and_then(|rest| rest.split('/').next())
                .map(|id| format!("Google Sheets {}", id))
                .unwrap_or_else(|| master_url.clone()),
            DataSource::Local { master, offers } => {
                format!("{} + {}", master.display(), offers.display())
            }
        }
    }

    /// Fetch both sheets concurrently, returning `(master, offers)` text.
    pub async fn fetch(&self) -> Result<(String, String), SourceError> {
        match self {
            DataSource::Remote {
                master_url,
                offers_url,
                policy,
                timeout,
            } => {
                let client = fetcher::build_client(*timeout)?;
                futures::future::try_join(
                    fetcher::fetch_csv(&client, master_url, *policy),
                    fetcher::fetch_csv(&client, offers_url, *policy),
                )
                .await
            }
            DataSource::Local { master, offers } => {
                futures::future::try_join(read_local(master), read_local(offers)).await
            }
        }
    }

    /// Fetch and parse both sheets.
    pub async fn load(&self) -> Result<(Vec<StudentRecord>, Vec<OfferRecord>)> {
        let (master_csv, offers_csv) = self.fetch().await?;
        info!(
            "Data fetched: master {:.1} KB, offers {:.1} KB",
            master_csv.len() as f64 / 1024.0,
            offers_csv.len() as f64 / 1024.0
        );

        let students = parse_master_sheet(&master_csv).context("Failed to parse master sheet")?;
        let offers =
            parse_offer_details(&offers_csv).context("Failed to parse offer details sheet")?;
        Ok((students, offers))
    }
}

async fn read_local(path: &Path) -> Result<String, SourceError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })
}
