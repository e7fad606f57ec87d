//! Column requirement checks shared by the chart-specific computations.

use crate::error::AnalyticsError;
use core_types::{ChartType, Sample, Scalar, Series};

/// Ensures the series carries a y column; bar, line and pie charts plot one.
pub(crate) fn require_y_column(series: &Series, chart_type: ChartType) -> Result<(), AnalyticsError> {
    if series.y_column.is_none() {
        return Err(AnalyticsError::InvalidColumnSelection(format!(
            "y column required for {} chart",
            chart_type
        )));
    }
    Ok(())
}

/// Pairs each sample's x with its numeric y, skipping samples without a y.
pub(crate) fn numeric_pairs(samples: &[Sample]) -> Result<Vec<(&Scalar, f64)>, AnalyticsError> {
    let mut pairs = Vec::with_capacity(samples.len());
    for sample in samples {
        match &sample.y {
            None => continue,
            Some(Scalar::Number(value)) => pairs.push((&sample.x, *value)),
            Some(other) => {
                return Err(AnalyticsError::InvalidColumnSelection(format!(
                    "y column must be numeric, found '{}'",
                    other
                )));
            }
        }
    }
    Ok(pairs)
}

/// Whether every x of a non-empty series is a date.
pub(crate) fn x_is_date(series: &Series) -> bool {
    !series.samples.is_empty() && series.samples.iter().all(|s| matches!(s.x, Scalar::Date(_)))
}

/// The numeric x values of a series; numbers and dates qualify, text does not.
pub(crate) fn numeric_x(series: &Series) -> Result<Vec<f64>, AnalyticsError> {
    series
        .samples
        .iter()
        .map(|sample| {
            sample.x.as_f64().ok_or_else(|| {
                AnalyticsError::InvalidColumnSelection(format!(
                    "column '{}' must be numeric, found '{}'",
                    series.x_column, sample.x
                ))
            })
        })
        .collect()
}
