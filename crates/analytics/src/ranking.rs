use crate::error::AnalyticsError;
use crate::selection::numeric_pairs;
use core_types::Sample;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The summed y value of one x category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub value: f64,
}

impl CategoryTotal {
    pub fn new(category: impl Into<String>, value: f64) -> Self {
        Self { category: category.into(), value }
    }
}

/// A category's position in a top or bottom list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub category: String,
    pub value: f64,
}

/// A category's share of the grand total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub rank: usize,
    pub category: String,
    pub value: f64,
    /// Fraction of the total in `[0, 1]` for non-negative data.
    pub share: f64,
    /// `share` as a percentage with two decimals, e.g. `"33.33%"`.
    pub percentage: String,
}

/// Sums the y values of samples sharing an x label.
///
/// Categories keep the order in which they first appear. Samples without a
/// y value are skipped.
pub fn aggregate(samples: &[Sample]) -> Result<Vec<CategoryTotal>, AnalyticsError> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (x, y) in numeric_pairs(samples)? {
        let label = x.label();
        match positions.get(&label) {
            Some(&position) => totals[position].value += y,
            None => {
                positions.insert(label.clone(), totals.len());
                totals.push(CategoryTotal::new(label, y));
            }
        }
    }
    Ok(totals)
}

/// The `n` highest categories, best first.
///
/// The sort is stable, so equal values keep their input order, and ranks are
/// consecutive positions: ties get distinct ranks, never shared ones.
pub fn rank_top(totals: &[CategoryTotal], n: usize) -> Vec<RankedEntry> {
    let mut sorted: Vec<&CategoryTotal> = totals.iter().collect();
    sorted.sort_by(|a, b| b.value.total_cmp(&a.value));
    to_ranked(sorted, n)
}

/// The `n` lowest categories, worst first. Same tie rules as [`rank_top`].
pub fn rank_bottom(totals: &[CategoryTotal], n: usize) -> Vec<RankedEntry> {
    let mut sorted: Vec<&CategoryTotal> = totals.iter().collect();
    sorted.sort_by(|a, b| a.value.total_cmp(&b.value));
    to_ranked(sorted, n)
}

/// Every category ranked by value with its percentage of the total.
///
/// When the total is zero every entry reports `0.00%` instead of failing.
pub fn distribution(totals: &[CategoryTotal]) -> Vec<DistributionEntry> {
    let total: f64 = totals.iter().map(|t| t.value).sum();
    if total == 0.0 {
        tracing::debug!(categories = totals.len(), "Distribution total is zero.");
    }

    rank_top(totals, totals.len())
        .into_iter()
        .map(|entry| {
            let share = if total == 0.0 { 0.0 } else { entry.value / total };
            DistributionEntry {
                rank: entry.rank,
                percentage: format!("{:.2}%", share * 100.0),
                category: entry.category,
                value: entry.value,
                share,
            }
        })
        .collect()
}

fn to_ranked(sorted: Vec<&CategoryTotal>, n: usize) -> Vec<RankedEntry> {
    sorted
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, total)| RankedEntry {
            rank: i + 1,
            category: total.category.clone(),
            value: total.value,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regions() -> Vec<CategoryTotal> {
        vec![
            CategoryTotal::new("A", 10.0),
            CategoryTotal::new("B", 30.0),
            CategoryTotal::new("C", 20.0),
        ]
    }

    #[test]
    fn top_two_by_value() {
        let top = rank_top(&regions(), 2);
        assert_eq!(
            top,
            vec![
                RankedEntry { rank: 1, category: "B".into(), value: 30.0 },
                RankedEntry { rank: 2, category: "C".into(), value: 20.0 },
            ]
        );
    }

    #[test]
    fn bottom_is_ascending_and_clamped() {
        let bottom = rank_bottom(&regions(), 10);
        let names: Vec<&str> = bottom.iter().map(|e| e.category.as_str()).collect();
        assert_eq!(names, ["A", "C", "B"]);
        assert_eq!(bottom.last().unwrap().rank, 3);
    }

    #[test]
    fn ties_keep_input_order_with_distinct_ranks() {
        let totals = vec![
            CategoryTotal::new("x", 5.0),
            CategoryTotal::new("y", 7.0),
            CategoryTotal::new("z", 5.0),
        ];
        let top = rank_top(&totals, 3);
        let order: Vec<(usize, &str)> = top.iter().map(|e| (e.rank, e.category.as_str())).collect();
        assert_eq!(order, [(1, "y"), (2, "x"), (3, "z")]);
    }

    #[test]
    fn distribution_percentages() {
        let dist = distribution(&regions());
        let pcts: Vec<(&str, &str)> =
            dist.iter().map(|e| (e.category.as_str(), e.percentage.as_str())).collect();
        assert_eq!(pcts, [("B", "50.00%"), ("C", "33.33%"), ("A", "16.67%")]);
    }

    #[test]
    fn all_zero_distribution_is_not_fatal() {
        let totals = vec![CategoryTotal::new("a", 0.0), CategoryTotal::new("b", 0.0)];
        let dist = distribution(&totals);
        assert!(dist.iter().all(|e| e.percentage == "0.00%" && e.share == 0.0));
    }

    #[test]
    fn aggregate_sums_duplicates_in_first_seen_order() {
        let samples = vec![
            Sample::pair("North", 5.0),
            Sample::pair("South", 2.0),
            Sample::pair("North", 7.0),
            Sample::new("South", None),
        ];
        let totals = aggregate(&samples).unwrap();
        assert_eq!(totals, vec![CategoryTotal::new("North", 12.0), CategoryTotal::new("South", 2.0)]);
    }
}
