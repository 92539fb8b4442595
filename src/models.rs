//! Data models for placement statistics.
//!
//! This module contains the typed student and offer records produced by
//! parsing, the categorical enums backing their fields, and the derived
//! statistics structures consumed by report generation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gender of a student as recorded in the master sheet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    /// Any other cell text (excluded from gender splits, counted in totals).
    Other(String),
}

impl From<&str> for Gender {
    fn from(s: &str) -> Self {
        match s.trim() {
            "Male" => Gender::Male,
            "Female" => Gender::Female,
            other => Gender::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
            Gender::Other(s) => write!(f, "{}", s),
        }
    }
}

/// What a student opted for after graduation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Choice {
    Placement,
    HigherStudies,
    PlacementExempt,
    Other(String),
}

impl From<&str> for Choice {
    fn from(s: &str) -> Self {
        match s.trim() {
            "Placement" => Choice::Placement,
            "Higher Studies" => Choice::HigherStudies,
            "Placement Exempt" => Choice::PlacementExempt,
            other => Choice::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Placement => write!(f, "Placement"),
            Choice::HigherStudies => write!(f, "Higher Studies"),
            Choice::PlacementExempt => write!(f, "Placement Exempt"),
            Choice::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Placement status of a student.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    Placed,
    NotPlaced,
    Hold,
    Dropped,
    InternshipOnly,
    Other(String),
}

impl From<&str> for Status {
    fn from(s: &str) -> Self {
        match s.trim() {
            "Placed" => Status::Placed,
            "Not Placed" => Status::NotPlaced,
            "Hold" => Status::Hold,
            "Dropped" => Status::Dropped,
            "Internship Only" => Status::InternshipOnly,
            other => Status::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Placed => write!(f, "Placed"),
            Status::NotPlaced => write!(f, "Not Placed"),
            Status::Hold => write!(f, "Hold"),
            Status::Dropped => write!(f, "Dropped"),
            Status::InternshipOnly => write!(f, "Internship Only"),
            Status::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Tier of an individual offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OfferType {
    Internship,
    Regular,
    Dream,
    Marquee,
    #[serde(rename = "Super Dream")]
    SuperDream,
}

impl OfferType {
    /// Every offer type, in breakdown order.
    pub const ALL: [OfferType; 5] = [
        OfferType::Internship,
        OfferType::Regular,
        OfferType::Dream,
        OfferType::Marquee,
        OfferType::SuperDream,
    ];

    /// Parse the exact sheet label, returning `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Internship" => Some(OfferType::Internship),
            "Regular" => Some(OfferType::Regular),
            "Dream" => Some(OfferType::Dream),
            "Marquee" => Some(OfferType::Marquee),
            "Super Dream" => Some(OfferType::SuperDream),
            _ => None,
        }
    }

    /// Compensation band the tier stands for.
    pub fn band(&self) -> &'static str {
        match self {
            OfferType::Internship => "Stipend",
            OfferType::Regular => "0 – 6 LPA",
            OfferType::Dream => "6 – 10 LPA",
            OfferType::SuperDream => "10 – 20 LPA",
            OfferType::Marquee => "20+ LPA",
        }
    }
}

impl fmt::Display for OfferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OfferType::Internship => write!(f, "Internship"),
            OfferType::Regular => write!(f, "Regular"),
            OfferType::Dream => write!(f, "Dream"),
            OfferType::Marquee => write!(f, "Marquee"),
            OfferType::SuperDream => write!(f, "Super Dream"),
        }
    }
}

/// One row of the master sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub reg_no: String,
    pub roll_no: String,
    pub name: String,
    pub gender: Gender,
    /// Merged branch label (e.g. "AIDS").
    pub cls: String,
    /// Section within the class; empty or "-" when the class has none.
    pub section: String,
    pub choice: Choice,
    pub status: Status,
    /// Companies the student received offers from, one entry per offer.
    pub companies: Vec<String>,
}

/// One row of the offer details sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferRecord {
    pub roll_no: String,
    pub name: String,
    pub company: String,
    /// Offer value in rupees; 0 when the cell could not be read.
    pub ctc: u64,
    pub offer_type: OfferType,
    /// Date in `D-Mon-YYYY` form.
    pub offer_date: String,
}

/// Placement summary for one branch or section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchStats {
    pub label: String,
    pub total_students: usize,
    pub opt_placement: usize,
    pub placed: usize,
    pub not_placed: usize,
    pub hold: usize,
    pub dropped: usize,
    pub internship_only: usize,
    pub higher_studies: usize,
    pub exempt: usize,
    pub placement_percent: f64,
    pub total_offers: usize,
    pub male_placed: usize,
    pub female_placed: usize,
    pub male_opt_placement: usize,
    pub female_opt_placement: usize,
    pub male_placed_percent: f64,
    pub female_placed_percent: f64,
}

/// Offers made by one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyStats {
    pub name: String,
    pub total_offers: usize,
    /// Offers per merged branch label, in first-seen order.
    pub branch_wise: IndexMap<String, usize>,
}

/// Records whose categorical fields matched none of the known values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnclassifiedCounts {
    pub gender: usize,
    pub choice: usize,
    pub status: usize,
}

impl UnclassifiedCounts {
    pub fn is_empty(&self) -> bool {
        self.gender == 0 && self.choice == 0 && self.status == 0
    }
}

/// Cohort-level placement statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementStats {
    pub total_count: usize,
    pub opt_placement: usize,
    pub higher_studies: usize,
    pub exempt: usize,
    pub placed: usize,
    pub not_placed: usize,
    pub hold: usize,
    pub dropped: usize,
    pub internship_only: usize,
    pub overall_placement_percent: f64,
    pub total_offers: usize,
    pub total_companies: usize,
    /// Section-level breakdown (e.g. "AIDS A").
    pub branches: Vec<BranchStats>,
    /// Class-level breakdown (e.g. "AIDS").
    pub merged_branches: Vec<BranchStats>,
    /// Companies sorted by offer count, highest first.
    pub companies: Vec<CompanyStats>,
    pub top_recruiters: Vec<CompanyStats>,
    pub unclassified: UnclassifiedCounts,
}

/// One month of offer activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyOffer {
    /// Display label, e.g. "Jul '25".
    pub label: String,
    /// Chronological key, e.g. "2025-07".
    pub sort_key: String,
    pub count: usize,
}

/// CTC statistics over placement offers plus offer-level breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtcStats {
    /// Number of placement offers with a known CTC.
    pub count: usize,
    pub highest: u64,
    pub lowest: u64,
    pub average: u64,
    pub median: u64,
    /// Offers of every type, internships included.
    pub offer_type_breakdown: IndexMap<OfferType, usize>,
    pub monthly_timeline: Vec<MonthlyOffer>,
}

impl CtcStats {
    /// Total offers across every offer type.
    pub fn total_offers(&self) -> usize {
        self.offer_type_breakdown.values().sum()
    }

    /// Count for one offer type, 0 if absent.
    pub fn offers_of(&self, offer_type: OfferType) -> usize {
        self.offer_type_breakdown
            .get(&offer_type)
            .copied()
            .unwrap_or(0)
    }
}

/// Placement offers falling into one compensation band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtcBracket {
    pub label: String,
    pub count: usize,
}

/// Which report sections to render. None of these affect the statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Section-level branch table instead of merged branches.
    #[serde(default)]
    pub show_sections: bool,
    /// Gender-wise placement breakdown.
    #[serde(default)]
    pub show_gender: bool,
    /// Full company-wise table.
    #[serde(default)]
    pub show_companies: bool,
    /// CTC and offer type analysis.
    #[serde(default = "default_true")]
    pub show_ctc: bool,
    /// Month-by-month offer timeline.
    #[serde(default = "default_true")]
    pub show_timeline: bool,
    /// CTC bracket distribution.
    #[serde(default)]
    pub show_ctc_brackets: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            show_sections: false,
            show_gender: false,
            show_companies: false,
            show_ctc: true,
            show_timeline: true,
            show_ctc_brackets: false,
        }
    }
}

impl ReportOptions {
    /// The CLI flags that reproduce these options from the defaults.
    pub fn to_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        if self.show_sections {
            flags.push("--sections");
        }
        if self.show_gender {
            flags.push("--gender");
        }
        if self.show_companies {
            flags.push("--companies");
        }
        if !self.show_ctc {
            flags.push("--no-ctc");
        }
        if !self.show_timeline {
            flags.push("--no-timeline");
        }
        if self.show_ctc_brackets {
            flags.push("--ctc-brackets");
        }
        flags.into_iter().map(String::from).collect()
    }
}

/// The complete generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub placement: PlacementStats,
    pub ctc: CtcStats,
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub institution: String,
    pub title: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    /// Where the data came from (spreadsheet id or local paths).
    pub source: String,
    pub student_records: usize,
    pub offer_records: usize,
    pub duration_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorical_parsing_is_exact() {
        assert_eq!(Choice::from("Placement"), Choice::Placement);
        assert_eq!(Choice::from(" Higher Studies "), Choice::HigherStudies);
        assert_eq!(
            Choice::from("placement"),
            Choice::Other("placement".to_string())
        );
        assert_eq!(Status::from("Internship Only"), Status::InternshipOnly);
        assert_eq!(Status::from("Placd"), Status::Other("Placd".to_string()));
        assert_eq!(Gender::from("Female"), Gender::Female);
        assert_eq!(Gender::from("F"), Gender::Other("F".to_string()));
    }

    #[test]
    fn test_offer_type_parse() {
        assert_eq!(OfferType::parse("Super Dream"), Some(OfferType::SuperDream));
        assert_eq!(OfferType::parse("Marquee"), Some(OfferType::Marquee));
        assert_eq!(OfferType::parse("Dream Plus"), None);
        assert_eq!(OfferType::SuperDream.to_string(), "Super Dream");
    }

    #[test]
    fn test_offer_type_serializes_with_sheet_label() {
        let json = serde_json::to_string(&OfferType::SuperDream).unwrap();
        assert_eq!(json, "\"Super Dream\"");
    }

    #[test]
    fn test_report_options_flags() {
        assert!(ReportOptions::default().to_flags().is_empty());

        let opts = ReportOptions {
            show_sections: true,
            show_ctc: false,
            show_ctc_brackets: true,
            ..ReportOptions::default()
        };
        assert_eq!(
            opts.to_flags(),
            vec!["--sections", "--no-ctc", "--ctc-brackets"]
        );
    }

    #[test]
    fn test_unclassified_is_empty() {
        assert!(UnclassifiedCounts::default().is_empty());
        let counts = UnclassifiedCounts {
            status: 1,
            ..UnclassifiedCounts::default()
        };
        assert!(!counts.is_empty());
    }
}
