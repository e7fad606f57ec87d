//! Natural-language key insights.
//!
//! Every sentence is filled from values the composer already computed, so the
//! same inputs always produce the same text.

use crate::histogram::HistogramBin;
use crate::ranking::{DistributionEntry, RankedEntry};
use crate::statistics::{Quartiles, Statistics};
use crate::trend::{TrendAnalysis, fit_quality};

pub(crate) fn fmt_value(value: f64) -> String {
    format!("{:.2}", value)
}

pub(crate) fn bar(
    x: &str,
    y: &str,
    stats: &Statistics,
    top: &[RankedEntry],
    bottom: &[RankedEntry],
) -> Vec<String> {
    let mut insights = Vec::new();
    if let Some(best) = top.first() {
        insights.push(format!(
            "{} has the highest {} of {} among {} {} categories",
            best.category,
            y,
            fmt_value(best.value),
            stats.count,
            x
        ));
    }
    if stats.count > 1 {
        if let Some(worst) = bottom.first() {
            insights.push(format!(
                "{} has the lowest {} at {}",
                worst.category,
                y,
                fmt_value(worst.value)
            ));
        }
    }
    insights.push(format!(
        "Average {} per {} is {} with a standard deviation of {}",
        y,
        x,
        fmt_value(stats.mean),
        fmt_value(stats.std_dev)
    ));
    if let (Some(best), Some(worst)) = (top.first(), bottom.first()) {
        if stats.count > 1 && worst.value > 0.0 {
            insights.push(format!(
                "{} is {:.1}x the value of {}",
                best.category,
                best.value / worst.value,
                worst.category
            ));
        }
    }
    insights
}

pub(crate) fn line(
    x: &str,
    y: &str,
    stats: &Statistics,
    trend: &TrendAnalysis,
    peak_at: &str,
    low_at: &str,
) -> Vec<String> {
    vec![
        format!(
            "{} shows a {} trend {} across {} ({} over the observed range)",
            y, trend.direction, trend.emoji, x, trend.change_rate
        ),
        format!(
            "The linear model has a {} fit (R² = {:.2})",
            fit_quality(trend.r2_score),
            trend.r2_score
        ),
        format!(
            "{} peaked at {} ({} {}) and was lowest at {} ({} {})",
            y,
            fmt_value(stats.max),
            x,
            peak_at,
            fmt_value(stats.min),
            x,
            low_at
        ),
    ]
}

pub(crate) fn pie(x: &str, y: &str, stats: &Statistics, distribution: &[DistributionEntry]) -> Vec<String> {
    let mut insights = Vec::new();
    if let Some(largest) = distribution.first() {
        insights.push(format!(
            "{} accounts for the largest share of {} ({})",
            largest.category, y, largest.percentage
        ));
    }
    if distribution.len() > 3 {
        let top_three: f64 = distribution.iter().take(3).map(|e| e.share).sum();
        insights.push(format!(
            "The top 3 {} categories make up {:.2}% of the total",
            x,
            top_three * 100.0
        ));
    }
    insights.push(format!(
        "{} categories contribute a total {} of {}",
        stats.count,
        y,
        fmt_value(stats.sum)
    ));
    if distribution.len() > 1 {
        if let Some(smallest) = distribution.last() {
            insights.push(format!(
                "{} has the smallest share ({})",
                smallest.category, smallest.percentage
            ));
        }
    }
    insights
}

pub(crate) fn histogram(
    x: &str,
    stats: &Statistics,
    quartiles: &Quartiles,
    bins: &[HistogramBin],
) -> Vec<String> {
    let mut insights = Vec::new();

    // First bin with the highest count.
    let busiest = bins.iter().fold(None::<&HistogramBin>, |best, bin| match best {
        Some(b) if b.count >= bin.count => Some(b),
        _ => Some(bin),
    });
    if let Some(bin) = busiest {
        insights.push(format!(
            "Most values fall in the {} range ({} of {})",
            bin.label, bin.count, stats.count
        ));
    }

    insights.push(format!(
        "The median {} is {}, with half of the values between {} and {}",
        x,
        fmt_value(quartiles.q2),
        fmt_value(quartiles.q1),
        fmt_value(quartiles.q3)
    ));
    insights.push(format!(
        "{} values span {} to {}",
        x,
        fmt_value(stats.min),
        fmt_value(stats.max)
    ));

    let gap = stats.mean - stats.median;
    let tolerance = f64::EPSILON * stats.mean.abs().max(1.0) * 16.0;
    let shape = if gap > tolerance {
        "right-skewed"
    } else if gap < -tolerance {
        "left-skewed"
    } else {
        "symmetric"
    };
    insights.push(format!(
        "The distribution is {} (mean {} vs median {})",
        shape,
        fmt_value(stats.mean),
        fmt_value(stats.median)
    ));
    insights
}
