use crate::error::AnalyticsError;
use crate::histogram::{histogram, label_as_dates};
use crate::selection::{numeric_pairs, numeric_x, x_is_date};
use core_types::{Aggregation, ChartType, Scalar, Series};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Labels and values ready to be drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Optional knobs of a chart request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ChartOptions {
    #[serde(default)]
    pub agg: Aggregation,
    /// Histogram bin count; the configured default applies when absent.
    pub bins: Option<usize>,
}

struct Group<'a> {
    key: &'a Scalar,
    label: String,
    sum: f64,
    count: usize,
}

/// Builds the chart payload for a series.
///
/// - histogram: counts of the numeric x values per equal-width bin.
/// - with a y column: y aggregated per x label (mean or sum), groups ordered
///   by key with numbers and dates first, then text.
/// - bar or pie without a y column: occurrences per x label, most frequent
///   first, reported as a bar chart.
pub fn build_chart(
    series: &Series,
    chart_type: ChartType,
    options: &ChartOptions,
    default_bins: usize,
) -> Result<ChartData, AnalyticsError> {
    if chart_type == ChartType::Histogram {
        let values = numeric_x(series)?;
        let mut bins = histogram(&values, options.bins.unwrap_or(default_bins))?;
        if x_is_date(series) {
            label_as_dates(&mut bins);
        }
        return Ok(ChartData {
            chart_type,
            labels: bins.iter().map(|b| b.label.clone()).collect(),
            values: bins.iter().map(|b| b.count as f64).collect(),
        });
    }

    if series.y_column.is_none() {
        if chart_type == ChartType::Line {
            return Err(AnalyticsError::InvalidColumnSelection(
                "y column required for this chart type".to_string(),
            ));
        }
        return Ok(value_counts(series));
    }

    grouped(series, chart_type, options.agg)
}

fn grouped(series: &Series, chart_type: ChartType, agg: Aggregation) -> Result<ChartData, AnalyticsError> {
    // Validates every present y before grouping.
    numeric_pairs(&series.samples)?;

    let mut groups: Vec<Group> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for sample in &series.samples {
        let label = sample.x.label();
        let position = match positions.get(&label) {
            Some(&position) => position,
            None => {
                positions.insert(label.clone(), groups.len());
                groups.push(Group { key: &sample.x, label, sum: 0.0, count: 0 });
                groups.len() - 1
            }
        };
        if let Some(Scalar::Number(y)) = sample.y {
            groups[position].sum += y;
            groups[position].count += 1;
        }
    }

    groups.sort_by(|a, b| compare_keys(a.key, b.key));

    let values = groups
        .iter()
        .map(|g| match agg {
            Aggregation::Sum => g.sum,
            // Groups with no y values report 0.
            Aggregation::Mean if g.count == 0 => 0.0,
            Aggregation::Mean => g.sum / g.count as f64,
        })
        .collect();

    Ok(ChartData {
        chart_type,
        labels: groups.into_iter().map(|g| g.label).collect(),
        values,
    })
}

fn value_counts(series: &Series) -> ChartData {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for sample in &series.samples {
        let label = sample.x.label();
        match positions.get(&label) {
            Some(&position) => counts[position].1 += 1,
            None => {
                positions.insert(label.clone(), counts.len());
                counts.push((label, 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    ChartData {
        chart_type: ChartType::Bar,
        labels: counts.iter().map(|(label, _)| label.clone()).collect(),
        values: counts.iter().map(|(_, count)| *count as f64).collect(),
    }
}

fn compare_keys(a: &Scalar, b: &Scalar) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.label().cmp(&b.label()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Sample;

    #[test]
    fn groups_by_label_with_mean() {
        let series = Series::from_pairs("region", "sales", [("b", 4.0), ("a", 1.0), ("b", 6.0)]);
        let chart = build_chart(&series, ChartType::Bar, &ChartOptions::default(), 10).unwrap();
        assert_eq!(chart.labels, ["a", "b"]);
        assert_eq!(chart.values, [1.0, 5.0]);
    }

    #[test]
    fn groups_by_label_with_sum() {
        let series = Series::from_pairs("region", "sales", [("b", 4.0), ("a", 1.0), ("b", 6.0)]);
        let options = ChartOptions { agg: Aggregation::Sum, bins: None };
        let chart = build_chart(&series, ChartType::Pie, &options, 10).unwrap();
        assert_eq!(chart.chart_type, ChartType::Pie);
        assert_eq!(chart.values, [1.0, 10.0]);
    }

    #[test]
    fn numeric_keys_sort_numerically() {
        let series = Series::from_pairs("year", "v", [(2010.0, 1.0), (9.0, 2.0), (100.0, 3.0)]);
        let chart = build_chart(&series, ChartType::Line, &ChartOptions::default(), 10).unwrap();
        assert_eq!(chart.labels, ["9", "100", "2010"]);
    }

    #[test]
    fn counts_without_y_are_a_bar_chart() {
        let series = Series::new(
            "city",
            None,
            ["Oslo", "Rome", "Rome"].iter().map(|&c| Sample::new(c, None)).collect(),
        );
        let chart = build_chart(&series, ChartType::Pie, &ChartOptions::default(), 10).unwrap();
        assert_eq!(chart.chart_type, ChartType::Bar);
        assert_eq!(chart.labels, ["Rome", "Oslo"]);
        assert_eq!(chart.values, [2.0, 1.0]);
    }

    #[test]
    fn line_without_y_is_rejected() {
        let series = Series::new("city", None, vec![Sample::new("Oslo", None)]);
        let err = build_chart(&series, ChartType::Line, &ChartOptions::default(), 10).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidColumnSelection(_)));
    }

    #[test]
    fn histogram_honours_requested_bins() {
        let series = Series::new("v", None, (0..8).map(|i| Sample::new(i as f64, None)).collect());
        let options = ChartOptions { agg: Aggregation::Mean, bins: Some(4) };
        let chart = build_chart(&series, ChartType::Histogram, &options, 10).unwrap();
        assert_eq!(chart.labels.len(), 4);
        assert_eq!(chart.values, [2.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn date_histogram_uses_iso_labels() {
        let start = chrono::NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let series = Series::new(
            "shipped",
            None,
            (0..5u64).map(|i| Sample::new(start + chrono::Days::new(i * 7), None)).collect(),
        );
        let options = ChartOptions { agg: Aggregation::Mean, bins: Some(2) };
        let chart = build_chart(&series, ChartType::Histogram, &options, 10).unwrap();
        assert_eq!(chart.labels, ["2023-06-01 to 2023-06-15", "2023-06-15 to 2023-06-29"]);
        assert_eq!(chart.values, [2.0, 3.0]);
    }
}
