use crate::chart::{ChartData, ChartOptions, build_chart};
use crate::composer::ReportComposer;
use crate::error::AnalyticsError;
use crate::forecast::{ForecastComposer, Prediction};
use crate::report::{BatchAnalysis, ChartFailure, Report};
use configuration::AnalysisConfig;
use core_types::{ChartType, Series};
use rayon::prelude::*;

/// The series one chart type of a batch should be analysed with.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSelection {
    pub chart_type: ChartType,
    pub series: Series,
}

impl ChartSelection {
    pub fn new(chart_type: ChartType, series: Series) -> Self {
        Self { chart_type, series }
    }
}

/// A stateless calculator turning series into charts, reports and forecasts.
///
/// Every method is a pure function of its arguments and the configuration, so
/// one engine can serve any number of concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    config: AnalysisConfig,
    composer: ReportComposer,
    forecaster: ForecastComposer,
}

impl AnalyticsEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            composer: ReportComposer::new(config.clone()),
            forecaster: ForecastComposer::new(config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Builds the `{type, labels, values}` payload for a single chart.
    pub fn chart(
        &self,
        series: &Series,
        chart_type: ChartType,
        options: &ChartOptions,
    ) -> Result<ChartData, AnalyticsError> {
        build_chart(series, chart_type, options, self.config.histogram_bins)
    }

    /// Fits the series and forecasts `years` periods ahead.
    pub fn predict(&self, series: &Series, years: i64) -> Result<Prediction, AnalyticsError> {
        self.forecaster.predict(series, years)
    }

    /// Analyses a single chart type. The report's serial is 1.
    pub fn report(&self, chart_type: ChartType, series: &Series) -> Result<Report, AnalyticsError> {
        let analysis = self.composer.compose(chart_type, series)?;
        Ok(Report {
            serial: 1,
            chart_type,
            icon: chart_type.icon().to_string(),
            title: ReportComposer::title(chart_type, series),
            analysis,
        })
    }

    /// Analyses one series as every chart type.
    pub fn analyze(&self, series: &Series) -> BatchAnalysis {
        let selections: Vec<ChartSelection> = ChartType::GENERATION_ORDER
            .iter()
            .map(|&chart_type| ChartSelection::new(chart_type, series.clone()))
            .collect();
        self.analyze_selections(&selections)
    }

    /// Analyses each selection independently and in parallel.
    ///
    /// Results are joined in the fixed bar, line, pie, histogram order no
    /// matter which finishes first; successful reports are numbered 1.. in
    /// that order and failed chart types are listed in `failures`. Only the
    /// first selection of each chart type is used.
    pub fn analyze_selections(&self, selections: &[ChartSelection]) -> BatchAnalysis {
        let mut ordered: Vec<&ChartSelection> = Vec::with_capacity(selections.len());
        for chart_type in ChartType::GENERATION_ORDER {
            if let Some(selection) = selections.iter().find(|s| s.chart_type == chart_type) {
                ordered.push(selection);
            }
        }

        let results: Vec<(ChartType, Result<Report, AnalyticsError>)> = ordered
            .par_iter()
            .map(|selection| (selection.chart_type, self.report(selection.chart_type, &selection.series)))
            .collect();

        let mut batch = BatchAnalysis::default();
        for (chart_type, result) in results {
            match result {
                Ok(mut report) => {
                    report.serial = batch.reports.len() + 1;
                    batch.reports.push(report);
                }
                Err(e) => {
                    tracing::warn!(%chart_type, error = %e, "Chart analysis failed; skipping.");
                    batch.failures.push(ChartFailure {
                        chart_type,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            reports = batch.reports.len(),
            failures = batch.failures.len(),
            "Batch analysis complete."
        );
        batch
    }
}
