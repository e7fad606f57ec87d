use crate::error::AnalyticsError;
use core_types::Scalar;
use serde::{Deserialize, Serialize};

/// One equal-width bucket of a histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// `"{lower:.2}-{upper:.2}"`, or ISO dates for a date axis.
    pub label: String,
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Buckets `values` into `bins` equal-width bins spanning `[min, max]`.
///
/// Bin `i` covers `[edge_i, edge_i+1)`; the last bin also includes `max`.
/// When every value is equal the span widens to `[v - 0.5, v + 0.5]`.
pub fn histogram(values: &[f64], bins: usize) -> Result<Vec<HistogramBin>, AnalyticsError> {
    if bins == 0 {
        return Err(AnalyticsError::InvalidRequest(
            "histogram needs at least one bin".to_string(),
        ));
    }
    if values.is_empty() {
        return Err(AnalyticsError::InsufficientData(
            "histogram needs at least one value".to_string(),
        ));
    }

    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    // Edges interpolate between the extremes and positions use halved
    // values, so spans wider than f64::MAX stay finite.
    let n = bins as f64;
    let edges: Vec<f64> = (0..=bins)
        .map(|i| match i {
            0 => lo,
            i if i == bins => hi,
            i => {
                let t = i as f64 / n;
                lo * (1.0 - t) + hi * t
            }
        })
        .collect();
    let half_span = hi * 0.5 - lo * 0.5;

    let mut counts = vec![0usize; bins];
    for &value in values {
        let index = if value >= hi {
            bins - 1
        } else {
            let position = (value * 0.5 - lo * 0.5) / half_span * n;
            (position.floor().max(0.0) as usize).min(bins - 1)
        };
        counts[index] += 1;
    }

    Ok(edges
        .windows(2)
        .zip(counts)
        .map(|(edge, count)| HistogramBin {
            label: format!("{:.2}-{:.2}", edge[0], edge[1]),
            lower: edge[0],
            upper: edge[1],
            count,
        })
        .collect())
}

/// Relabels bins computed over day ordinals as `"YYYY-MM-DD to YYYY-MM-DD"`.
pub fn label_as_dates(bins: &mut [HistogramBin]) {
    for bin in bins {
        if let (Some(lower), Some(upper)) = (
            Scalar::date_from_ordinal(bin.lower),
            Scalar::date_from_ordinal(bin.upper),
        ) {
            bin.label = format!("{} to {}", Scalar::Date(lower), Scalar::Date(upper));
        }
    }
}
