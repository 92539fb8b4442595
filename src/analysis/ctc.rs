//! CTC statistics, offer type breakdown and the monthly offer timeline.

use super::branch::div_round;
use crate::models::{CtcBracket, CtcStats, MonthlyOffer, OfferRecord, OfferType};
use indexmap::IndexMap;

const MONTHS: [(&str, &str); 12] = [
    ("Jan", "01"),
    ("Feb", "02"),
    ("Mar", "03"),
    ("Apr", "04"),
    ("May", "05"),
    ("Jun", "06"),
    ("Jul", "07"),
    ("Aug", "08"),
    ("Sep", "09"),
    ("Oct", "10"),
    ("Nov", "11"),
    ("Dec", "12"),
];

/// Compute CTC statistics over the offer sheet.
///
/// Internship stipends never enter the order statistics, nor do offers
/// whose CTC is unknown (0). The type breakdown and the timeline count
/// every offer.
pub fn compute_ctc_stats(offers: &[OfferRecord]) -> CtcStats {
    let mut ctcs: Vec<u64> = offers
        .iter()
        .filter(|o| o.offer_type != OfferType::Internship)
        .map(|o| o.ctc)
        .filter(|&c| c > 0)
        .collect();
    ctcs.sort_unstable();

    let count = ctcs.len();
    let highest = ctcs.last().copied().unwrap_or(0);
    let lowest = ctcs.first().copied().unwrap_or(0);
    let total: u128 = ctcs.iter().map(|&c| u128::from(c)).sum();
    let average = div_round(total, count as u128);
    let median = match count {
        0 => 0,
        n if n % 2 == 0 => {
            div_round(u128::from(ctcs[n / 2 - 1]) + u128::from(ctcs[n / 2]), 2)
        }
        n => ctcs[n / 2],
    };

    CtcStats {
        count,
        highest,
        lowest,
        average,
        median,
        offer_type_breakdown: offer_type_breakdown(offers),
        monthly_timeline: monthly_timeline(offers),
    }
}

/// Count offers per type, with every type present.
pub fn offer_type_breakdown(offers: &[OfferRecord]) -> IndexMap<OfferType, usize> {
    let mut breakdown: IndexMap<OfferType, usize> =
        OfferType::ALL.iter().map(|&t| (t, 0)).collect();
    for offer in offers {
        *breakdown.entry(offer.offer_type).or_insert(0) += 1;
    }
    breakdown
}

/// Parse a `D-Mon-YYYY` date into its `(label, sort_key)` month bucket,
/// e.g. `"30-Jul-2025"` -> `("Jul '25", "2025-07")`.
pub fn parse_month_key(date: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = date.trim().split('-').collect();
    if parts.len() < 3 {
        return None;
    }
    let month = parts[1];
    let year = parts[2];
    if year.is_empty() {
        return None;
    }
    let (_, number) = MONTHS.iter().find(|(abbr, _)| *abbr == month)?;

    let short_year: String = year.chars().skip(2).collect();
    Some((
        format!("{} '{}", month, short_year),
        format!("{}-{}", year, number),
    ))
}

/// Offers per month, oldest month first. Undated offers are left out.
pub fn monthly_timeline(offers: &[OfferRecord]) -> Vec<MonthlyOffer> {
    let mut months: IndexMap<String, MonthlyOffer> = IndexMap::new();

    for offer in offers {
        let Some((label, sort_key)) = parse_month_key(&offer.offer_date) else {
            continue;
        };
        months
            .entry(sort_key.clone())
            .or_insert_with(|| MonthlyOffer {
                label,
                sort_key,
                count: 0,
            })
            .count += 1;
    }

    let mut timeline: Vec<MonthlyOffer> = months.into_values().collect();
    timeline.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));
    timeline
}

/// Placement offers per CTC band. Offer tiers are defined by their band,
/// so the counts come straight from the type breakdown.
pub fn ctc_brackets(stats: &CtcStats) -> Vec<CtcBracket> {
    [
        ("0–6 LPA", OfferType::Regular),
        ("6–10 LPA", OfferType::Dream),
        ("10–20 LPA", OfferType::SuperDream),
        ("20+ LPA", OfferType::Marquee),
    ]
    .into_iter()
    .map(|(label, offer_type)| CtcBracket {
        label: label.to_string(),
        count: stats.offers_of(offer_type),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::offer;

    #[test]
    fn test_median_odd_and_even() {
        let odd = vec![
            offer(800_000, OfferType::Regular, "1-Aug-2025"),
            offer(400_000, OfferType::Regular, "1-Aug-2025"),
            offer(600_000, OfferType::Dream, "1-Aug-2025"),
        ];
        assert_eq!(compute_ctc_stats(&odd).median, 600_000);

        let even = vec![
            offer(600_000, OfferType::Regular, "1-Aug-2025"),
            offer(400_000, OfferType::Regular, "1-Aug-2025"),
        ];
        assert_eq!(compute_ctc_stats(&even).median, 500_000);

        let half = vec![
            offer(400_000, OfferType::Regular, "1-Aug-2025"),
            offer(400_001, OfferType::Regular, "1-Aug-2025"),
        ];
        assert_eq!(compute_ctc_stats(&half).median, 400_001);
    }

    #[test]
    fn test_order_statistics() {
        let offers = vec![
            offer(450_000, OfferType::Regular, "30-Jul-2025"),
            offer(1_200_000, OfferType::SuperDream, "4-Aug-2025"),
            offer(700_000, OfferType::Dream, "4-Aug-2025"),
            offer(0, OfferType::Regular, "4-Aug-2025"),
        ];
        let stats = compute_ctc_stats(&offers);

        assert_eq!(stats.count, 3);
        assert_eq!(stats.highest, 1_200_000);
        assert_eq!(stats.lowest, 450_000);
        assert_eq!(stats.average, 783_333);
        assert_eq!(stats.median, 700_000);
    }

    #[test]
    fn test_internships_excluded_from_ctc_but_counted_in_breakdown() {
        let offers = vec![
            offer(5_000_000, OfferType::Internship, "1-Jul-2025"),
            offer(10, OfferType::Internship, "1-Jul-2025"),
            offer(600_000, OfferType::Regular, "1-Jul-2025"),
        ];
        let stats = compute_ctc_stats(&offers);

        assert_eq!(stats.count, 1);
        assert_eq!(stats.highest, 600_000);
        assert_eq!(stats.lowest, 600_000);
        assert_eq!(stats.average, 600_000);
        assert_eq!(stats.median, 600_000);
        assert_eq!(stats.offers_of(OfferType::Internship), 2);
        assert_eq!(stats.total_offers(), 3);
    }

    #[test]
    fn test_breakdown_has_every_type() {
        let stats = compute_ctc_stats(&[]);
        let keys: Vec<OfferType> = stats.offer_type_breakdown.keys().copied().collect();
        assert_eq!(keys, OfferType::ALL.to_vec());
        assert!(stats.offer_type_breakdown.values().all(|&v| v == 0));
        assert_eq!(stats.count, 0);
        assert_eq!(stats.highest, 0);
        assert_eq!(stats.lowest, 0);
        assert_eq!(stats.average, 0);
        assert_eq!(stats.median, 0);
        assert!(stats.monthly_timeline.is_empty());
    }

    #[test]
    fn test_parse_month_key() {
        assert_eq!(
            parse_month_key("30-Jul-2025"),
            Some(("Jul '25".to_string(), "2025-07".to_string()))
        );
        assert_eq!(
            parse_month_key(" 4-Dec-2024 "),
            Some(("Dec '24".to_string(), "2024-12".to_string()))
        );
        assert_eq!(parse_month_key("4-Aug"), None);
        assert_eq!(parse_month_key("4-Aug-"), None);
        assert_eq!(parse_month_key("4-August-2025"), None);
        assert_eq!(parse_month_key("2025/08/04"), None);
        assert_eq!(parse_month_key(""), None);
    }

    #[test]
    fn test_timeline_is_chronological() {
        let offers = vec![
            offer(600_000, OfferType::Regular, "4-Aug-2025"),
            offer(600_000, OfferType::Regular, "30-Jul-2025"),
            offer(15_000, OfferType::Internship, "12-Jan-2026"),
            offer(600_000, OfferType::Dream, "19-Aug-2025"),
            offer(600_000, OfferType::Regular, "4-Aug"),
        ];
        let stats = compute_ctc_stats(&offers);

        let keys: Vec<&str> = stats
            .monthly_timeline
            .iter()
            .map(|m| m.sort_key.as_str())
            .collect();
        assert_eq!(keys, vec!["2025-07", "2025-08", "2026-01"]);
        assert_eq!(stats.monthly_timeline[1].label, "Aug '25");
        assert_eq!(stats.monthly_timeline[1].count, 2);

        // the undated offer still counts as a Regular offer
        assert_eq!(stats.offers_of(OfferType::Regular), 3);
    }

    #[test]
    fn test_ctc_brackets() {
        let offers = vec![
            offer(400_000, OfferType::Regular, ""),
            offer(800_000, OfferType::Dream, ""),
            offer(800_000, OfferType::Dream, ""),
            offer(2_500_000, OfferType::Marquee, ""),
            offer(20_000, OfferType::Internship, ""),
        ];
        let brackets = ctc_brackets(&compute_ctc_stats(&offers));

        let counts: Vec<(&str, usize)> = brackets
            .iter()
            .map(|b| (b.label.as_str(), b.count))
            .collect();
        assert_eq!(
            counts,
            vec![("0–6 LPA", 1), ("6–10 LPA", 2), ("10–20 LPA", 0), ("20+ LPA", 1)]
        );
    }

    #[test]
    fn test_huge_ctc_values_do_not_overflow() {
        let huge = crate::source::parser::parse_ctc("10000000000000000000");
        assert_eq!(huge, 10_000_000_000_000_000_000);

        let offers = vec![
            offer(huge, OfferType::Regular, "1-Aug-2025"),
            offer(huge, OfferType::Regular, "2-Aug-2025"),
        ];
        let stats = compute_ctc_stats(&offers);

        assert_eq!(stats.count, 2);
        assert_eq!(stats.highest, huge);
        assert_eq!(stats.lowest, huge);
        assert_eq!(stats.average, huge);
        assert_eq!(stats.median, huge);
    }

    #[test]
    fn test_idempotent() {
        let offers = vec![
            offer(400_000, OfferType::Regular, "1-Sep-2025"),
            offer(900_000, OfferType::Dream, "2-Oct-2025"),
        ];
        assert_eq!(compute_ctc_stats(&offers), compute_ctc_stats(&offers));
    }
}
