use crate::error::AnalyticsError;
use serde::{Deserialize, Serialize};

/// Descriptive statistics over a numeric sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    /// Most frequent value; the smallest one wins a tie.
    pub mode: f64,
    /// Population standard deviation (divides by N).
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

/// The three quartiles of a sequence and the spread between q1 and q3.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub iqr: f64,
}

/// Computes count, sum, mean, median, mode, standard deviation and extremes.
pub fn describe(values: &[f64]) -> Result<Statistics, AnalyticsError> {
    if values.is_empty() {
        return Err(AnalyticsError::InsufficientData(
            "descriptive statistics need at least one value".to_string(),
        ));
    }

    let sorted = sorted_copy(values);
    let count = sorted.len();
    let sum: f64 = sorted.iter().sum();
    let mean = sum / count as f64;
    let variance = sorted.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / count as f64;
    let min = sorted[0];
    let max = sorted[count - 1];

    Ok(Statistics {
        count,
        sum,
        mean,
        median: percentile_sorted(&sorted, 0.5),
        mode: mode_sorted(&sorted),
        std_dev: variance.sqrt(),
        min,
        max,
        range: max - min,
    })
}

/// Quartiles by linear interpolation between closest ranks.
///
/// For a sorted sequence `v` of length `n` and a fraction `p`, the rank is
/// `p * (n - 1)` and the result is `v[floor] + frac * (v[ceil] - v[floor])`.
/// `[1, 2, 3, 4]` gives `q1 = 1.75`, `q2 = 2.5`, `q3 = 3.25`.
pub fn quartiles(values: &[f64]) -> Result<Quartiles, AnalyticsError> {
    if values.len() < 2 {
        return Err(AnalyticsError::InsufficientData(format!(
            "quartiles need at least 2 values, got {}",
            values.len()
        )));
    }

    let sorted = sorted_copy(values);
    let q1 = percentile_sorted(&sorted, 0.25);
    let q3 = percentile_sorted(&sorted, 0.75);
    Ok(Quartiles {
        q1,
        q2: percentile_sorted(&sorted, 0.5),
        q3,
        iqr: q3 - q1,
    })
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// True when every value equals the first one (and for empty slices).
pub(crate) fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let rank = p * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;
    sorted[lower] + frac * (sorted[upper] - sorted[lower])
}

fn mode_sorted(sorted: &[f64]) -> f64 {
    let mut best = sorted[0];
    let mut best_count = 0;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        // Strictly greater keeps the earliest, i.e. smallest, value on ties.
        if j - i > best_count {
            best = sorted[i];
            best_count = j - i;
        }
        i = j;
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_known_data() {
        let stats = describe(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.count, 8);
        assert_eq!(stats.sum, 40.0);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.median, 4.5);
        assert_eq!(stats.mode, 4.0);
        assert_eq!(stats.std_dev, 2.0);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
        assert_eq!(stats.range, 7.0);
    }

    #[test]
    fn describe_empty_is_insufficient() {
        assert!(matches!(describe(&[]), Err(AnalyticsError::InsufficientData(_))));
    }

    #[test]
    fn describe_single_value() {
        let stats = describe(&[42.0]).unwrap();
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.median, 42.0);
        assert_eq!(stats.mode, 42.0);
        assert_eq!(stats.range, 0.0);
    }

    #[test]
    fn mode_tie_picks_smallest() {
        let stats = describe(&[3.0, 1.0, 3.0, 1.0, 2.0]).unwrap();
        assert_eq!(stats.mode, 1.0);
    }

    #[test]
    fn quartiles_of_even_set() {
        let q = quartiles(&[4.0, 2.0, 1.0, 3.0]).unwrap();
        assert_eq!(q.q1, 1.75);
        assert_eq!(q.q2, 2.5);
        assert_eq!(q.q3, 3.25);
        assert_eq!(q.iqr, 1.5);
    }

    #[test]
    fn quartiles_need_two_values() {
        assert!(matches!(quartiles(&[1.0]), Err(AnalyticsError::InsufficientData(_))));
    }

    #[test]
    fn constant_detection() {
        assert!(is_constant(&[1.5, 1.5, 1.5]));
        assert!(!is_constant(&[1.5, 1.5, 1.6]));
    }
}
