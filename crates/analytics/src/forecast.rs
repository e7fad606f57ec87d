use crate::error::AnalyticsError;
use crate::regression::{ForecastPoint, XEncoding, fit, forecast};
use crate::selection::{numeric_pairs, require_y_column};
use crate::trend::{TrendDirection, classify, y_scale};
use configuration::AnalysisConfig;
use core_types::{ChartType, Series};
use serde::{Deserialize, Serialize};

/// Summary of the fitted model returned with a prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub trend: TrendDirection,
    pub emoji: String,
    pub r2_score: f64,
    pub slope: f64,
    pub intercept: f64,
    pub change_rate: String,
    pub x_encoding: XEncoding,
}

/// The payload of a prediction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub model_info: ModelInfo,
    pub forecast: Vec<ForecastPoint>,
}

/// Fits a trend line and extrapolates it a number of periods ahead.
#[derive(Debug, Clone, Default)]
pub struct ForecastComposer {
    config: AnalysisConfig,
}

impl ForecastComposer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Forecasts `years` periods past the last sample of `series`.
    ///
    /// Fails with `InvalidRequest` when `years` is below 1 or above the
    /// configured maximum; fitting errors propagate unchanged.
    pub fn predict(&self, series: &Series, years: i64) -> Result<Prediction, AnalyticsError> {
        if years < 1 {
            return Err(AnalyticsError::InvalidRequest(format!(
                "years must be at least 1, got {}",
                years
            )));
        }
        if years > i64::from(self.config.max_forecast_years) {
            return Err(AnalyticsError::InvalidRequest(format!(
                "years must be at most {}, got {}",
                self.config.max_forecast_years, years
            )));
        }
        require_y_column(series, ChartType::Line)?;

        let model = fit(&series.samples)?;
        let ys: Vec<f64> = numeric_pairs(&series.samples)?.into_iter().map(|(_, y)| y).collect();
        let trend = classify(&model, y_scale(&ys), self.config.trend_threshold);
        let points = forecast(&model, years as u32, model.avg_step)?;

        tracing::info!(
            x = %series.x_column,
            y = %series.value_label(),
            years,
            trend = %trend.direction,
            r2 = model.r2,
            "Forecast computed."
        );

        Ok(Prediction {
            model_info: ModelInfo {
                trend: trend.direction,
                emoji: trend.emoji,
                r2_score: model.r2,
                slope: model.slope,
                intercept: model.intercept,
                change_rate: trend.change_rate,
                x_encoding: model.x_encoding,
            },
            forecast: points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear() -> Series {
        Series::from_pairs("x", "y", (0..10).map(|i| (i as f64, 2.0 * i as f64 + 1.0)))
    }

    #[test]
    fn predicts_next_periods_on_the_line() {
        let prediction = ForecastComposer::default().predict(&linear(), 3).unwrap();
        assert_eq!(prediction.model_info.trend, TrendDirection::Increasing);
        assert!((prediction.model_info.r2_score - 1.0).abs() < 1e-9);
        assert_eq!(prediction.forecast.len(), 3);
        let last = prediction.forecast[2];
        assert_eq!(last.step, 3);
        assert!((last.x - 12.0).abs() < 1e-9);
        assert!((last.y - 25.0).abs() < 1e-9);
    }

    #[test]
    fn daily_rise_is_reported_as_increasing() {
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series = Series::from_pairs(
            "date",
            "revenue",
            (0..100u64).map(|i| (start + chrono::Days::new(i), 100.0 + i as f64)),
        );
        let prediction = ForecastComposer::default().predict(&series, 1).unwrap();
        assert_eq!(prediction.model_info.trend, TrendDirection::Increasing);
        assert_eq!(prediction.model_info.change_rate, "+66.22%");
        assert!((prediction.forecast[0].y - 200.0).abs() < 1e-6);
    }

    #[test]
    fn zero_years_is_invalid() {
        let err = ForecastComposer::default().predict(&linear(), 0).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidRequest(_)));
        let err = ForecastComposer::default().predict(&linear(), -2).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidRequest(_)));
    }

    #[test]
    fn too_many_years_is_invalid() {
        let config = AnalysisConfig {
            max_forecast_years: 5,
            ..AnalysisConfig::default()
        };
        let err = ForecastComposer::new(config).predict(&linear(), 6).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidRequest(_)));
    }

    #[test]
    fn fit_errors_propagate() {
        let series = Series::from_pairs("x", "y", [(1.0, 2.0), (1.0, 3.0)]);
        let err = ForecastComposer::default().predict(&series, 1).unwrap_err();
        assert!(matches!(err, AnalyticsError::DegenerateInput(_)));
    }
}
