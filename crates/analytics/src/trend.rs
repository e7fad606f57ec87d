use crate::regression::RegressionModel;
use crate::statistics::mean;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative direction of a fitted trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    pub fn emoji(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "📈",
            TrendDirection::Decreasing => "📉",
            TrendDirection::Stable => "➡️",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The trend section of a line report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub direction: TrendDirection,
    pub emoji: String,
    /// Signed percentage change implied by the slope over the observed x span.
    pub change_rate: String,
    pub slope: f64,
    pub intercept: f64,
    pub r2_score: f64,
    /// `|slope · x_span| / y_scale`, the quantity compared against the threshold.
    pub relative_change: f64,
}

/// The magnitude a slope is compared against: `|mean(y)|`, or the y range
/// when the mean is zero.
pub fn y_scale(values: &[f64]) -> f64 {
    let mean = mean(values).unwrap_or(0.0).abs();
    if mean > 0.0 {
        return mean;
    }
    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if hi > lo { hi - lo } else { 0.0 }
}

/// Labels a fitted line as increasing, decreasing or stable.
///
/// The slope is measured over the whole observed x span, so the verdict does
/// not depend on the x unit (days, years, category positions). A line whose
/// change across the span stays below `threshold · y_scale` is stable,
/// otherwise its sign decides; the boundary itself is not stable. A zero
/// scale (every y is zero) is always stable.
pub fn classify(model: &RegressionModel, y_scale: f64, threshold: f64) -> TrendAnalysis {
    let change = if y_scale > 0.0 { model.slope * model.x_span / y_scale } else { 0.0 };
    let relative_change = change.abs();

    let direction = if y_scale <= 0.0 || relative_change < threshold {
        TrendDirection::Stable
    } else if model.slope > 0.0 {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    };

    TrendAnalysis {
        direction,
        emoji: direction.emoji().to_string(),
        change_rate: format_signed_percent(change * 100.0),
        slope: model.slope,
        intercept: model.intercept,
        r2_score: model.r2,
        relative_change,
    }
}

/// Describes how well a line explains the data.
pub fn fit_quality(r2: f64) -> &'static str {
    if r2 >= 0.7 {
        "strong"
    } else if r2 >= 0.4 {
        "moderate"
    } else {
        "weak"
    }
}

fn format_signed_percent(value: f64) -> String {
    // Avoid "-0.00%" for values that round to zero.
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "+0.00%".to_string()
    } else {
        format!("{:+.2}%", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regression::{XEncoding, fit};
    use chrono::{Days, NaiveDate};
    use configuration::DEFAULT_TREND_THRESHOLD;
    use core_types::{Sample, Scalar};

    fn model(slope: f64, x_span: f64) -> RegressionModel {
        RegressionModel {
            slope,
            intercept: 100.0,
            r2: 0.9,
            x_encoding: XEncoding::Numeric,
            sample_count: 5,
            last_x: x_span,
            x_span,
            avg_step: 1.0,
        }
    }

    #[test]
    fn slope_above_threshold_is_increasing() {
        let trend = classify(&model(5.0, 4.0), 100.0, 0.01);
        assert_eq!(trend.direction, TrendDirection::Increasing);
        assert_eq!(trend.emoji, "📈");
        assert_eq!(trend.change_rate, "+20.00%");
        assert_eq!(trend.relative_change, 0.2);
    }

    #[test]
    fn negative_slope_is_decreasing() {
        let trend = classify(&model(-3.0, 4.0), 100.0, 0.01);
        assert_eq!(trend.direction, TrendDirection::Decreasing);
        assert_eq!(trend.emoji, "📉");
        assert_eq!(trend.change_rate, "-12.00%");
    }

    #[test]
    fn slope_below_threshold_is_stable() {
        // 0.2 * 4 / 100 = 0.8% over the span, under the 1% threshold.
        let trend = classify(&model(0.2, 4.0), 100.0, 0.01);
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.emoji, "➡️");
    }

    #[test]
    fn change_exactly_at_threshold_is_not_stable() {
        // 1 * 1 / 100 == 0.01 exactly.
        let up = classify(&model(1.0, 1.0), 100.0, 0.01);
        assert_eq!(up.relative_change, 0.01);
        assert_eq!(up.direction, TrendDirection::Increasing);

        let down = classify(&model(-1.0, 1.0), 100.0, 0.01);
        assert_eq!(down.direction, TrendDirection::Decreasing);

        let below = classify(&model(0.99, 1.0), 100.0, 0.01);
        assert_eq!(below.direction, TrendDirection::Stable);
    }

    #[test]
    fn daily_dates_are_judged_over_the_whole_span() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let samples: Vec<Sample> = (0..100)
            .map(|i| Sample::new(start + Days::new(i), Some(Scalar::Number(100.0 + i as f64))))
            .collect();
        let ys: Vec<f64> = (0..100).map(|i| 100.0 + i as f64).collect();
        let model = fit(&samples).unwrap();
        assert!((model.slope - 1.0).abs() < 1e-9);

        let trend = classify(&model, y_scale(&ys), DEFAULT_TREND_THRESHOLD);
        assert_eq!(trend.direction, TrendDirection::Increasing);
        assert_eq!(trend.change_rate, "+66.22%");
    }

    #[test]
    fn zero_scale_is_stable() {
        let trend = classify(&model(2.0, 4.0), 0.0, 0.01);
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.change_rate, "+0.00%");
    }

    #[test]
    fn scale_falls_back_to_range_when_mean_is_zero() {
        assert_eq!(y_scale(&[-2.0, 2.0]), 4.0);
        assert_eq!(y_scale(&[10.0, 30.0]), 20.0);
        assert_eq!(y_scale(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn fit_quality_bands() {
        assert_eq!(fit_quality(0.95), "strong");
        assert_eq!(fit_quality(0.5), "moderate");
        assert_eq!(fit_quality(0.1), "weak");
    }
}
