//! Markdown and JSON report generation.
//!
//! The Markdown report is assembled section by section; which optional
//! sections appear is controlled by [`ReportOptions`]. Statistics are never
//! recomputed here beyond display-only shares and totals.

use crate::analysis::{ctc_brackets, percent};
use crate::models::{
    BranchStats, CtcStats, OfferType, PlacementStats, Report, ReportMetadata, ReportOptions,
};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, options: &ReportOptions) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", report.metadata.title));

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_summary_section(&report.placement));

    let (heading, rows) = if options.show_sections {
        ("Section-wise Placement", &report.placement.branches)
    } else {
        ("Branch-wise Placement", &report.placement.merged_branches)
    };
    output.push_str(&generate_branch_section(heading, rows));

    if options.show_gender {
        output.push_str(&generate_gender_section(rows));
    }

    if options.show_ctc {
        output.push_str(&generate_ctc_section(&report.ctc, options));
    }

    output.push_str(&generate_top_recruiters_section(&report.placement));

    if options.show_companies {
        output.push_str(&generate_companies_section(&report.placement));
    }

    output.push_str(&generate_footer(&report.metadata));

    output
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Format a rupee amount: crores and lakhs with two decimals, smaller
/// amounts with Indian digit grouping.
pub fn format_inr(amount: u64) -> String {
    const LAKH: u64 = 100_000;
    const CRORE: u64 = 10_000_000;

    if amount >= CRORE {
        format!("Rs. {:.2} Cr", amount as f64 / CRORE as f64)
    } else if amount >= LAKH {
        format!("Rs. {:.2} L", amount as f64 / LAKH as f64)
    } else {
        format!("Rs. {}", group_indian(amount))
    }
}

/// Digit grouping in the Indian system: last three digits, then pairs.
fn group_indian(n: u64) -> String {
    let digits = n.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str(&format!("**{}**\n\n", metadata.institution));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Records:** {} students, {} offers\n",
        metadata.student_records, metadata.offer_records
    ));
    section.push_str(&format!(
        "- **Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

fn generate_summary_section(stats: &PlacementStats) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Opted for Placement | Placed | Placement % | Offers | Companies |\n");
    section.push_str("|:---:|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | **{}** | {} | {} |\n\n",
        stats.opt_placement,
        stats.placed,
        format_percent(stats.overall_placement_percent),
        stats.total_offers,
        stats.total_companies
    ));

    section.push_str("| Status | Students |\n");
    section.push_str("|:---|:---:|\n");
    for (label, count) in [
        ("Total students", stats.total_count),
        ("Not placed", stats.not_placed),
        ("Higher studies", stats.higher_studies),
        ("Placement exempt", stats.exempt),
        ("Hold", stats.hold),
        ("Dropped", stats.dropped),
        ("Internship only", stats.internship_only),
    ] {
        section.push_str(&format!("| {} | {} |\n", label, count));
    }
    section.push('\n');

    section
}

fn generate_branch_section(heading: &str, rows: &[BranchStats]) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", heading));
    section.push_str(
        "| Branch | Students | Opted | Placed | Not Placed | Hold | Higher Studies | Offers | Placement % |\n",
    );
    section.push_str("|:---|:---:|:---:|:---:|:---:|:---:|:---:|:---:|:---:|\n");

    for b in rows {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
            b.label,
            b.total_students,
            b.opt_placement,
            b.placed,
            b.not_placed,
            b.hold,
            b.higher_studies,
            b.total_offers,
            format_percent(b.placement_percent)
        ));
    }
    section.push('\n');

    section
}

fn generate_gender_section(rows: &[BranchStats]) -> String {
    let mut section = String::new();

    section.push_str("## Gender-wise Placement\n\n");
    section.push_str("| Branch | Male Opted | Male Placed | Male % | Female Opted | Female Placed | Female % |\n");
    section.push_str("|:---|:---:|:---:|:---:|:---:|:---:|:---:|\n");

    for b in rows {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            b.label,
            b.male_opt_placement,
            b.male_placed,
            format_percent(b.male_placed_percent),
            b.female_opt_placement,
            b.female_placed,
            format_percent(b.female_placed_percent)
        ));
    }
    section.push('\n');

    section
}

fn generate_ctc_section(ctc: &CtcStats, options: &ReportOptions) -> String {
    let mut section = String::new();

    section.push_str("## CTC & Offer Analysis\n\n");

    if ctc.count == 0 {
        section.push_str("No placement offers with a recorded CTC.\n\n");
    } else {
        section.push_str("| Highest | Average | Median | Lowest |\n");
        section.push_str("|:---:|:---:|:---:|:---:|\n");
        section.push_str(&format!(
            "| {} | {} | {} | {} |\n\n",
            format_inr(ctc.highest),
            format_inr(ctc.average),
            format_inr(ctc.median),
            format_inr(ctc.lowest)
        ));
        section.push_str(&format!(
            "*Based on {} placement offers with a recorded CTC; internships excluded.*\n\n",
            ctc.count
        ));
    }

    let total = ctc.total_offers();
    section.push_str("### Offers by Type\n\n");
    section.push_str("| Offer Type | Band | Offers | Share |\n");
    section.push_str("|:---|:---|:---:|:---:|\n");
    for offer_type in OfferType::ALL {
        let count = ctc.offers_of(offer_type);
        section.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            offer_type,
            offer_type.band(),
            count,
            format_percent(percent(count, total))
        ));
    }
    section.push_str(&format!("| **Total** | | **{}** | |\n\n", total));

    if options.show_ctc_brackets {
        section.push_str("### CTC Brackets\n\n");
        section.push_str("| Bracket | Offers |\n");
        section.push_str("|:---|:---:|\n");
        for bracket in ctc_brackets(ctc) {
            section.push_str(&format!("| {} | {} |\n", bracket.label, bracket.count));
        }
        section.push('\n');
    }

    if options.show_timeline {
        section.push_str("### Offer Timeline\n\n");
        if ctc.monthly_timeline.is_empty() {
            section.push_str("No dated offers.\n\n");
        } else {
            section.push_str("| Month | Offers |\n");
            section.push_str("|:---|:---:|\n");
            for month in &ctc.monthly_timeline {
                section.push_str(&format!("| {} | {} |\n", month.label, month.count));
            }
            section.push('\n');
        }
    }

    section
}

fn generate_top_recruiters_section(stats: &PlacementStats) -> String {
    let mut section = String::new();

    section.push_str("## Top Recruiters\n\n");

    if stats.top_recruiters.is_empty() {
        section.push_str("No offers recorded yet.\n\n");
        return section;
    }

    section.push_str("| # | Company | Offers |\n");
    section.push_str("|:---:|:---|:---:|\n");
    for (i, company) in stats.top_recruiters.iter().enumerate() {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            i + 1,
            company.name,
            company.total_offers
        ));
    }
    section.push('\n');

    section
}

fn generate_companies_section(stats: &PlacementStats) -> String {
    let mut section = String::new();

    section.push_str("## Company-wise Offers\n\n");

    if stats.companies.is_empty() {
        section.push_str("No offers recorded yet.\n\n");
        return section;
    }

    let branches: Vec<&str> = stats
        .merged_branches
        .iter()
        .map(|b| b.label.as_str())
        .collect();

    section.push_str("| Company |");
    for branch in &branches {
        section.push_str(&format!(" {} |", branch));
    }
    section.push_str(" Total |\n|:---|");
    section.push_str(&":---:|".repeat(branches.len() + 1));
    section.push('\n');

    let mut column_totals = vec![0usize; branches.len()];
    for company in &stats.companies {
        section.push_str(&format!("| {} |", company.name));
        for (i, branch) in branches.iter().enumerate() {
            let count = company.branch_wise.get(*branch).copied().unwrap_or(0);
            column_totals[i] += count;
            section.push_str(&format!(" {} |", count));
        }
        section.push_str(&format!(" {} |\n", company.total_offers));
    }

    section.push_str("| **Total** |");
    for total in &column_totals {
        section.push_str(&format!(" **{}** |", total));
    }
    let grand_total: usize = stats.companies.iter().map(|c| c.total_offers).sum();
    section.push_str(&format!(" **{}** |\n\n", grand_total));

    section
}

fn generate_footer(metadata: &ReportMetadata) -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Generated by placement-stats v{} on {}*\n",
        env!("CARGO_PKG_VERSION"),
        metadata.generated_at.format("%d %b %Y")
    ));

    footer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::{offer, student};
    use crate::analysis::{compute_ctc_stats, compute_stats, CohortLayout};
    use chrono::{TimeZone, Utc};

    fn create_test_report() -> Report {
        let students = vec![
            student("Male", "AIDS", "A", "Placement", "Placed", &["Citibank PPO"]),
            student("Female", "AIDS", "B", "Placement", "Placed", &["Zoho", "Infosys"]),
            student("Female", "IOT", "A", "Placement", "Not Placed", &[]),
            student("Male", "CS", "-", "Higher Studies", "", &[]),
            student("Male", "CS", "-", "Placement", "Placed", &["Citibank"]),
        ];
        let offers = vec![
            offer(1_850_000, OfferType::SuperDream, "30-Jul-2025"),
            offer(700_000, OfferType::Dream, "12-Aug-2025"),
            offer(450_000, OfferType::Regular, "12-Aug-2025"),
            offer(45_000, OfferType::Internship, "10-Jun-2025"),
        ];
        let layout = CohortLayout::default();

        Report {
            metadata: ReportMetadata {
                institution: "Test University".to_string(),
                title: "Placement Statistics Report".to_string(),
                generated_at: Utc.with_ymd_and_hms(2025, 9, 1, 10, 30, 0).unwrap(),
                source: "fixtures".to_string(),
                student_records: students.len(),
                offer_records: offers.len(),
                duration_seconds: 1.5,
            },
            placement: compute_stats(&students, &layout),
            ctc: compute_ctc_stats(&offers),
        }
    }

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr(0), "Rs. 0");
        assert_eq!(format_inr(999), "Rs. 999");
        assert_eq!(format_inr(45_000), "Rs. 45,000");
        assert_eq!(format_inr(99_999), "Rs. 99,999");
        assert_eq!(format_inr(100_000), "Rs. 1.00 L");
        assert_eq!(format_inr(1_850_000), "Rs. 18.50 L");
        assert_eq!(format_inr(10_000_000), "Rs. 1.00 Cr");
        assert_eq!(format_inr(25_000_000), "Rs. 2.50 Cr");
    }

    #[test]
    fn test_group_indian() {
        assert_eq!(group_indian(1_234), "1,234");
        assert_eq!(group_indian(12_345), "12,345");
        assert_eq!(group_indian(1_234_567), "12,34,567");
        assert_eq!(group_indian(123_456_789), "12,34,56,789");
    }

    #[test]
    fn test_default_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report, &ReportOptions::default());

        assert!(markdown.starts_with("# Placement Statistics Report"));
        assert!(markdown.contains("**Test University**"));
        assert!(markdown.contains("2025-09-01 10:30:00 UTC"));
        assert!(markdown.contains("| 4 | 3 | **75.0%** | 4 | 3 |"));
        assert!(markdown.contains("## Branch-wise Placement"));
        assert!(markdown.contains("| AIDS | 2 | 2 | 2 |"));
        assert!(markdown.contains("## CTC & Offer Analysis"));
        assert!(markdown.contains("Rs. 18.50 L"));
        assert!(markdown.contains("| Super Dream | 10 – 20 LPA | 1 | 25.0% |"));
        assert!(markdown.contains("### Offer Timeline"));
        assert!(markdown.contains("| Jul '25 | 1 |"));
        assert!(markdown.contains("## Top Recruiters"));
        assert!(markdown.contains("| 1 | Citibank | 2 |"));

        assert!(!markdown.contains("## Section-wise Placement"));
        assert!(!markdown.contains("## Gender-wise Placement"));
        assert!(!markdown.contains("### CTC Brackets"));
        assert!(!markdown.contains("## Company-wise Offers"));
    }

    #[test]
    fn test_optional_sections() {
        let report = create_test_report();
        let options = ReportOptions {
            show_sections: true,
            show_gender: true,
            show_companies: true,
            show_ctc_brackets: true,
            ..ReportOptions::default()
        };
        let markdown = generate_markdown_report(&report, &options);

        assert!(markdown.contains("## Section-wise Placement"));
        assert!(markdown.contains("| AIDS A |"));
        assert!(!markdown.contains("## Branch-wise Placement"));
        assert!(markdown.contains("## Gender-wise Placement"));
        assert!(markdown.contains("### CTC Brackets"));
        assert!(markdown.contains("| 10–20 LPA | 1 |"));
        assert!(markdown.contains("## Company-wise Offers"));
        assert!(markdown.contains("| Company | AIDS | IOT | CS | Total |"));
        assert!(markdown.contains("| Citibank | 1 | 0 | 1 | 2 |"));
        assert!(markdown.contains("| **Total** | **3** | **0** | **1** | **4** |"));
    }

    #[test]
    fn test_ctc_and_timeline_can_be_hidden() {
        let report = create_test_report();

        let no_timeline = ReportOptions {
            show_timeline: false,
            ..ReportOptions::default()
        };
        let markdown = generate_markdown_report(&report, &no_timeline);
        assert!(markdown.contains("## CTC & Offer Analysis"));
        assert!(!markdown.contains("### Offer Timeline"));

        let no_ctc = ReportOptions {
            show_ctc: false,
            show_ctc_brackets: true,
            ..ReportOptions::default()
        };
        let markdown = generate_markdown_report(&report, &no_ctc);
        assert!(!markdown.contains("## CTC & Offer Analysis"));
        assert!(!markdown.contains("### CTC Brackets"));
        assert!(markdown.contains("## Top Recruiters"));
    }

    #[test]
    fn test_empty_offers() {
        let mut report = create_test_report();
        report.ctc = compute_ctc_stats(&[]);
        let markdown = generate_markdown_report(&report, &ReportOptions::default());

        assert!(markdown.contains("No placement offers with a recorded CTC."));
        assert!(markdown.contains("| Internship | Stipend | 0 | 0.0% |"));
        assert!(markdown.contains("No dated offers."));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["placement"]["placed"], 3);
        assert_eq!(value["ctc"]["highest"], 1_850_000);
        assert_eq!(value["ctc"]["offer_type_breakdown"]["Super Dream"], 1);
        assert_eq!(value["metadata"]["institution"], "Test University");
    }
}
