//! Index of previously generated reports.
//!
//! Each run that writes a report records one entry in `index.json` inside
//! the output directory, newest first.

use crate::cli::OutputFormat;
use crate::models::Report;
use crate::report::format_inr;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// History index file name inside the output directory.
pub const INDEX_FILE: &str = "index.json";

const FILENAME_PREFIX: &str = "placement-report-";

/// Headline numbers kept with each history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportStats {
    pub placed: usize,
    pub opt_placement: usize,
    pub placement_percent: String,
    pub total_companies: usize,
    pub median_ctc: String,
}

/// One generated report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub id: String,
    /// RFC 3339 generation time.
    pub timestamp: String,
    pub filename: String,
    /// Flags the report was generated with.
    pub flags: Vec<String>,
    pub spreadsheet_id: Option<String>,
    pub stats: ReportStats,
}

impl ReportEntry {
    pub fn new(
        report: &Report,
        filename: &str,
        flags: Vec<String>,
        spreadsheet_id: Option<String>,
    ) -> Self {
        let generated_at = report.metadata.generated_at;
        let stem = Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(filename);
        Self {
            id: stem.strip_prefix(FILENAME_PREFIX).unwrap_or(stem).to_string(),
            timestamp: generated_at.to_rfc3339(),
            filename: filename.to_string(),
            flags,
            spreadsheet_id,
            stats: ReportStats {
                placed: report.placement.placed,
                opt_placement: report.placement.opt_placement,
                placement_percent: format!("{:.1}", report.placement.overall_placement_percent),
                total_companies: report.placement.total_companies,
                median_ctc: format_inr(report.ctc.median),
            },
        }
    }
}

/// File name for a report generated at `now`.
pub fn report_filename(now: DateTime<Utc>, format: OutputFormat) -> String {
    format!(
        "{}{}.{}",
        FILENAME_PREFIX,
        now.format("%Y%m%d-%H%M%S"),
        format.extension()
    )
}

/// Like [`report_filename`], but adds a `-2`, `-3`, ... suffix while the
/// name is already taken in `output_dir`.
pub fn unique_report_filename(
    output_dir: &Path,
    now: DateTime<Utc>,
    format: OutputFormat,
) -> String {
    let base = report_filename(now, format);
    if !output_dir.join(&base).exists() {
        return base;
    }

    let stamp = now.format("%Y%m%d-%H%M%S");
    (2u32..)
        .map(|n| {
            format!(
                "{}{}-{}.{}",
                FILENAME_PREFIX,
                stamp,
                n,
                format.extension()
            )
        })
        .find(|name| !output_dir.join(name).exists())
        .unwrap_or(base)
}

/// The history index of one output directory.
#[derive(Debug)]
pub struct ReportHistory {
    path: PathBuf,
    entries: Vec<ReportEntry>,
}

impl ReportHistory {
    /// Load the index in `output_dir`. A missing index is an empty history.
    pub fn load(output_dir: &Path) -> Result<Self> {
        let path = output_dir.join(INDEX_FILE);

        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read history index: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse history index: {}", path.display()))?
        } else {
            debug!("No history index at {}", path.display());
            Vec::new()
        };

        Ok(Self { path, entries })
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Record a new entry at the front and rewrite the index.
    pub fn append(&mut self, entry: ReportEntry) -> Result<()> {
        self.entries.insert(0, entry);

        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }

        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write history index: {}", self.path.display()))?;

        debug!(
            "History index now has {} entries ({})",
            self.entries.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_test_entry(id: &str, placed: usize) -> ReportEntry {
        ReportEntry {
            id: id.to_string(),
            timestamp: "2025-09-01T10:30:00+00:00".to_string(),
            filename: format!("placement-report-{}.md", id),
            flags: vec!["--gender".to_string()],
            spreadsheet_id: Some("1U2qXle0-70mWfAj9En_YoQJShbcI2fYY230kCGbLiXE".to_string()),
            stats: ReportStats {
                placed,
                opt_placement: 10,
                placement_percent: "50.0".to_string(),
                total_companies: 4,
                median_ctc: "Rs. 6.50 L".to_string(),
            },
        }
    }

    #[test]
    fn test_report_filename() {
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 7, 5, 3).unwrap();
        assert_eq!(
            report_filename(now, OutputFormat::Markdown),
            "placement-report-20250901-070503.md"
        );
        assert_eq!(
            report_filename(now, OutputFormat::Json),
            "placement-report-20250901-070503.json"
        );
    }

    #[test]
    fn test_same_second_reports_get_distinct_names() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 7, 5, 3).unwrap();

        let first = unique_report_filename(dir.path(), now, OutputFormat::Markdown);
        assert_eq!(first, "placement-report-20250901-070503.md");
        std::fs::write(dir.path().join(&first), "one").unwrap();

        let second = unique_report_filename(dir.path(), now, OutputFormat::Markdown);
        assert_eq!(second, "placement-report-20250901-070503-2.md");
        std::fs::write(dir.path().join(&second), "two").unwrap();

        let third = unique_report_filename(dir.path(), now, OutputFormat::Markdown);
        assert_eq!(third, "placement-report-20250901-070503-3.md");

        assert_eq!(
            std::fs::read_to_string(dir.path().join(&first)).unwrap(),
            "one"
        );
    }

    #[test]
    fn test_entry_id_follows_filename() {
        use crate::analysis::{compute_ctc_stats, compute_stats, CohortLayout};
        use crate::models::ReportMetadata;

        let generated_at = Utc.with_ymd_and_hms(2025, 9, 1, 7, 5, 3).unwrap();
        let report = Report {
            metadata: ReportMetadata {
                institution: "Test University".to_string(),
                title: "Placement Statistics Report".to_string(),
                generated_at,
                source: "fixtures".to_string(),
                student_records: 0,
                offer_records: 0,
                duration_seconds: 0.1,
            },
            placement: compute_stats(&[], &CohortLayout::default()),
            ctc: compute_ctc_stats(&[]),
        };

        let first = ReportEntry::new(&report, "placement-report-20250901-070503.md", vec![], None);
        let second =
            ReportEntry::new(&report, "placement-report-20250901-070503-2.md", vec![], None);

        assert_eq!(first.id, "20250901-070503");
        assert_eq!(second.id, "20250901-070503-2");
        assert_eq!(first.timestamp, second.timestamp);
        assert_eq!(first.stats.median_ctc, "Rs. 0");
    }

    #[test]
    fn test_missing_index_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let history = ReportHistory::load(dir.path()).unwrap();
        assert!(history.entries().is_empty());
    }

    #[test]
    fn test_append_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("reports");

        let mut history = ReportHistory::load(&output).unwrap();
        history.append(create_test_entry("20250901-100000", 4)).unwrap();
        history.append(create_test_entry("20250902-100000", 5)).unwrap();

        let reloaded = ReportHistory::load(&output).unwrap();
        let ids: Vec<&str> = reloaded.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["20250902-100000", "20250901-100000"]);
        assert_eq!(reloaded.entries()[0].stats.placed, 5);
        assert_eq!(reloaded.entries()[1], create_test_entry("20250901-100000", 4));
    }

    #[test]
    fn test_corrupt_index_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(INDEX_FILE), "{not json").unwrap();
        assert!(ReportHistory::load(dir.path()).is_err());
    }
}
