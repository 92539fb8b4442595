//! Report rendering and the history index.

pub mod generator;
pub mod history;

pub use generator::{format_inr, generate_json_report, generate_markdown_report};
pub use history::{unique_report_filename, ReportEntry, ReportHistory};
