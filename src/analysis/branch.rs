//! Per-branch placement summaries.

use crate::models::{BranchStats, Choice, Gender, Status, StudentRecord};

/// Percentage of `numerator` over `denominator`, rounded to one decimal
/// place with halves away from zero. Returns 0 for an empty denominator.
///
/// The ratio is taken in floating point before rounding, so `201/400`
/// gives 50.2 (the product lands just under 502.5).
pub fn percent(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    ((numerator as f64 / denominator as f64) * 1000.0).round() / 10.0
}

/// Quotient rounded to the nearest integer, halves away from zero.
///
/// Takes `u128` so that sums of CTC values cannot overflow; results past
/// `u64::MAX` saturate.
pub fn div_round(numerator: u128, denominator: u128) -> u64 {
    if denominator == 0 {
        return 0;
    }
    (numerator as f64 / denominator as f64).round() as u64
}

/// Display label for a record: `"cls section"`, or just `cls` when the
/// section is blank or `-`.
pub fn branch_label(cls: &str, section: &str) -> String {
    let c = cls.trim();
    let s = section.trim();
    if s.is_empty() || s == "-" {
        c.to_string()
    } else {
        format!("{} {}", c, s)
    }
}

/// Summarize every record matching `matches` under `label`.
pub fn compute_branch_stats<F>(records: &[StudentRecord], label: &str, matches: F) -> BranchStats
where
    F: Fn(&StudentRecord) -> bool,
{
    let members: Vec<&StudentRecord> = records.iter().filter(|r| matches(*r)).collect();

    let opted: Vec<&StudentRecord> = members
        .iter()
        .copied()
        .filter(|r| r.choice == Choice::Placement)
        .collect();
    let placed: Vec<&StudentRecord> = members
        .iter()
        .copied()
        .filter(|r| r.status == Status::Placed)
        .collect();

    let count_status = |status: Status| members.iter().filter(|r| r.status == status).count();
    let count_choice = |choice: Choice| members.iter().filter(|r| r.choice == choice).count();
    let count_gender = |subset: &[&StudentRecord], gender: Gender| {
        subset.iter().filter(|r| r.gender == gender).count()
    };

    let male_placed = count_gender(&placed, Gender::Male);
    let female_placed = count_gender(&placed, Gender::Female);
    let male_opt_placement = count_gender(&opted, Gender::Male);
    let female_opt_placement = count_gender(&opted, Gender::Female);

    BranchStats {
        label: label.to_string(),
        total_students: members.len(),
        opt_placement: opted.len(),
        placed: placed.len(),
        not_placed: count_status(Status::NotPlaced),
        hold: count_status(Status::Hold),
        dropped: count_status(Status::Dropped),
        internship_only: count_status(Status::InternshipOnly),
        higher_studies: count_choice(Choice::HigherStudies),
        exempt: count_choice(Choice::PlacementExempt),
        placement_percent: percent(placed.len(), opted.len()),
        total_offers: members.iter().map(|r| r.companies.len()).sum(),
        male_placed,
        female_placed,
        male_opt_placement,
        female_opt_placement,
        male_placed_percent: percent(male_placed, male_opt_placement),
        female_placed_percent: percent(female_placed, female_opt_placement),
    }
}
