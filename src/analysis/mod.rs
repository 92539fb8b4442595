//! Placement statistics aggregation.
//!
//! The branch, cohort and CTC aggregators are pure functions over the
//! parsed records. [`compute_all`] runs the student-side and offer-side
//! aggregations in parallel and hands both results to report generation.

pub mod branch;
pub mod cohort;
pub mod ctc;

pub use branch::percent;
pub use cohort::compute_stats;
pub use ctc::{compute_ctc_stats, ctc_brackets};

use crate::models::{CtcStats, OfferRecord, PlacementStats, StudentRecord};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use tracing::{debug, warn};

/// Fixed cohort layout the aggregators read.
#[derive(Debug, Clone)]
pub struct CohortLayout {
    /// Section-level labels, in display order (e.g. "AIDS A").
    pub branch_order: Vec<String>,
    /// Class-level labels, in display order (e.g. "AIDS").
    pub merged_branch_order: Vec<String>,
    /// Company name aliases, raw name -> canonical name.
    pub company_aliases: IndexMap<String, String>,
    /// How many companies make the top recruiters list.
    pub top_recruiters: usize,
}

impl Default for CohortLayout {
    fn default() -> Self {
        Self::from(&crate::config::CohortConfig::default())
    }
}

impl From<&crate::config::CohortConfig> for CohortLayout {
    fn from(config: &crate::config::CohortConfig) -> Self {
        Self {
            branch_order: config.branch_order.clone(),
            merged_branch_order: config.merged_branch_order.clone(),
            company_aliases: config.company_aliases.clone(),
            top_recruiters: config.top_recruiters,
        }
    }
}

impl CohortLayout {
    /// Canonical name for a (trimmed) company name.
    pub fn canonical_company<'a>(&'a self, name: &'a str) -> &'a str {
        self.company_aliases
            .get(name)
            .map(String::as_str)
            .unwrap_or(name)
    }
}

/// Run the cohort and CTC aggregations in parallel.
///
/// The two aggregations share nothing; each runs on the blocking pool and
/// both must finish before the results are returned.
pub async fn compute_all(
    students: Vec<StudentRecord>,
    offers: Vec<OfferRecord>,
    layout: CohortLayout,
) -> Result<(PlacementStats, CtcStats)> {
    debug!(
        "Aggregating {} student records and {} offer records",
        students.len(),
        offers.len()
    );

    let placement = tokio::task::spawn_blocking(move || compute_stats(&students, &layout));
    let ctc = tokio::task::spawn_blocking(move || compute_ctc_stats(&offers));

    let (placement, ctc) = tokio::try_join!(placement, ctc).context("Aggregation task failed")?;

    if !placement.unclassified.is_empty() {
        warn!(
            "Unrecognized values left out of categorical counts: gender={}, choice={}, status={}",
            placement.unclassified.gender,
            placement.unclassified.choice,
            placement.unclassified.status
        );
    }

    Ok((placement, ctc))
}
