//! Cohort-wide placement statistics and the company index.

use super::branch::{branch_label, compute_branch_stats, percent};
use super::CohortLayout;
use crate::models::{
    Choice, CompanyStats, Gender, PlacementStats, Status, StudentRecord, UnclassifiedCounts,
};
use indexmap::IndexMap;
use tracing::debug;

/// Compute cohort statistics over every student record.
pub fn compute_stats(records: &[StudentRecord], layout: &CohortLayout) -> PlacementStats {
    let count_choice = |choice: Choice| records.iter().filter(|r| r.choice == choice).count();
    let count_status = |status: Status| records.iter().filter(|r| r.status == status).count();

    let opt_placement = count_choice(Choice::Placement);
    let placed = count_status(Status::Placed);

    let branches = layout
        .branch_order
        .iter()
        .map(|label| {
            compute_branch_stats(records, label, |r| branch_label(&r.cls, &r.section) == *label)
        })
        .collect();

    let merged_branches = layout
        .merged_branch_order
        .iter()
        .map(|label| compute_branch_stats(records, label, |r| r.cls.trim() == label))
        .collect();

    let companies = rank_companies(records, layout);
    let top_recruiters = companies
        .iter()
        .take(layout.top_recruiters)
        .cloned()
        .collect();

    let unclassified = count_unclassified(records);
    debug!(
        "Cohort stats: {} students, {} companies, unclassified {:?}",
        records.len(),
        companies.len(),
        unclassified
    );

    PlacementStats {
        total_count: records.len(),
        opt_placement,
        higher_studies: count_choice(Choice::HigherStudies),
        exempt: count_choice(Choice::PlacementExempt),
        placed,
        not_placed: count_status(Status::NotPlaced),
        hold: count_status(Status::Hold),
        dropped: count_status(Status::Dropped),
        internship_only: count_status(Status::InternshipOnly),
        overall_placement_percent: percent(placed, opt_placement),
        total_offers: records.iter().map(|r| r.companies.len()).sum(),
        total_companies: companies.len(),
        branches,
        merged_branches,
        companies,
        top_recruiters,
        unclassified,
    }
}

/// Build the company index and sort it by offer count, highest first.
///
/// Every company entry on a record is one offer. Ties keep the order in
/// which companies were first seen.
pub fn rank_companies(records: &[StudentRecord], layout: &CohortLayout) -> Vec<CompanyStats> {
    let mut index: IndexMap<String, CompanyStats> = IndexMap::new();

    for record in records {
        let merged_label = record.cls.trim();

        for raw in &record.companies {
            // Whitespace-only entries are skipped like empty ones.
            let name = raw.trim();
            if name.is_empty() {
                continue;
            }
            let name = layout.canonical_company(name);

            let entry = index
                .entry(name.to_string())
                .or_insert_with(|| CompanyStats {
                    name: name.to_string(),
                    total_offers: 0,
                    branch_wise: IndexMap::new(),
                });
            entry.total_offers += 1;
            *entry
                .branch_wise
                .entry(merged_label.to_string())
                .or_insert(0) += 1;
        }
    }

    let mut companies: Vec<CompanyStats> = index.into_values().collect();
    // sort_by is stable
    companies.sort_by(|a, b| b.total_offers.cmp(&a.total_offers));
    companies
}

fn count_unclassified(records: &[StudentRecord]) -> UnclassifiedCounts {
    let mut counts = UnclassifiedCounts::default();
    for record in records {
        if matches!(record.gender, Gender::Other(_)) {
            counts.gender += 1;
        }
        if matches!(record.choice, Choice::Other(_)) {
            counts.choice += 1;
        }
        if matches!(record.status, Status::Other(_)) {
            counts.status += 1;
        }
    }
    counts
}
