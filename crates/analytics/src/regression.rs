use crate::error::AnalyticsError;
use crate::selection::numeric_pairs;
use crate::statistics::is_constant;
use core_types::{Sample, Scalar};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How raw x values were turned into the numbers the line was fitted on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "categories", rename_all = "lowercase")]
pub enum XEncoding {
    /// Numbers used as-is, dates as day ordinals.
    Numeric,
    /// Labels in first-occurrence order; a label's index is its encoded x.
    Categorical(Vec<String>),
}

/// An ordinary least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionModel {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination in `[0, 1]`; 0 when y is constant.
    pub r2: f64,
    pub x_encoding: XEncoding,
    pub sample_count: usize,
    /// Encoded x of the last observed sample, in series order.
    pub last_x: f64,
    /// Distance between the smallest and largest encoded x.
    pub x_span: f64,
    /// Mean successive difference of encoded x.
    pub avg_step: f64,
}

impl RegressionModel {
    /// Evaluates the fitted line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// One extrapolated period beyond the last observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    #[serde(rename = "year", alias = "step")]
    pub step: u32,
    pub x: f64,
    pub y: f64,
}

/// Fits a least-squares line through the samples that carry a y value.
///
/// When every x is a number or a date, x is used directly. Otherwise each x is
/// encoded as the 0-based position of its label in first-occurrence order.
pub fn fit(samples: &[Sample]) -> Result<RegressionModel, AnalyticsError> {
    let pairs = numeric_pairs(samples)?;
    if pairs.len() < 2 {
        return Err(AnalyticsError::InsufficientData(format!(
            "regression needs at least 2 samples with a y value, got {}",
            pairs.len()
        )));
    }

    let (xs, x_encoding) = encode_x(pairs.iter().map(|(x, _)| *x));
    let ys: Vec<f64> = pairs.iter().map(|(_, y)| *y).collect();

    if is_constant(&xs) {
        return Err(AnalyticsError::DegenerateInput(
            "all x values are identical, the slope is undefined".to_string(),
        ));
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (x, y) in xs.iter().zip(&ys) {
        sxy += (x - mean_x) * (y - mean_y);
        sxx += (x - mean_x) * (x - mean_x);
    }
    if sxx == 0.0 {
        return Err(AnalyticsError::DegenerateInput("x has zero variance".to_string()));
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let r2 = if is_constant(&ys) {
        0.0
    } else {
        let ss_tot: f64 = ys.iter().map(|y| (y - mean_y) * (y - mean_y)).sum();
        let ss_res: f64 = xs
            .iter()
            .zip(&ys)
            .map(|(x, y)| {
                let residual = y - (slope * x + intercept);
                residual * residual
            })
            .sum();
        let r2 = 1.0 - ss_res / ss_tot;
        if r2.is_finite() { r2.clamp(0.0, 1.0) } else { 0.0 }
    };

    let first_x = xs[0];
    let last_x = xs[xs.len() - 1];
    let (min_x, max_x) = xs
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));

    let avg_step = match x_encoding {
        XEncoding::Categorical(_) => 1.0,
        XEncoding::Numeric => {
            // Successive differences telescope to (last - first) / (n - 1).
            let step = (last_x - first_x) / (n - 1.0);
            if step.is_finite() && step != 0.0 { step } else { 1.0 }
        }
    };

    tracing::debug!(slope, intercept, r2, samples = xs.len(), "Fitted regression line.");

    Ok(RegressionModel {
        slope,
        intercept,
        r2,
        x_encoding,
        sample_count: xs.len(),
        last_x,
        x_span: max_x - min_x,
        avg_step,
    })
}

/// Extrapolates `steps` periods past the model's last observed x.
///
/// Point `k` sits at `x = last_x + k * avg_step` with `y` on the fitted line.
pub fn forecast(
    model: &RegressionModel,
    steps: u32,
    avg_step: f64,
) -> Result<Vec<ForecastPoint>, AnalyticsError> {
    if steps < 1 {
        return Err(AnalyticsError::InvalidRequest(
            "forecast needs at least one step".to_string(),
        ));
    }
    if !avg_step.is_finite() {
        return Err(AnalyticsError::InvalidRequest(format!(
            "forecast step size must be finite, got {}",
            avg_step
        )));
    }

    Ok((1..=steps)
        .map(|step| {
            let x = model.last_x + step as f64 * avg_step;
            ForecastPoint { step, x, y: model.predict(x) }
        })
        .collect())
}

fn encode_x<'a>(xs: impl Iterator<Item = &'a Scalar> + Clone) -> (Vec<f64>, XEncoding) {
    if xs.clone().all(Scalar::is_numeric) {
        let values = xs.filter_map(Scalar::as_f64).collect();
        return (values, XEncoding::Numeric);
    }

    let mut labels: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let values = xs
        .map(|x| {
            let label = x.label();
            let position = match index.get(&label) {
                Some(&position) => position,
                None => {
                    let position = labels.len();
                    index.insert(label.clone(), position);
                    labels.push(label);
                    position
                }
            };
            position as f64
        })
        .collect();
    (values, XEncoding::Categorical(labels))
}
