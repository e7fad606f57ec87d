use crate::error::AnalyticsError;
use crate::histogram::{histogram, label_as_dates};
use crate::insights;
use crate::ranking::{CategoryTotal, aggregate, distribution, rank_bottom, rank_top};
use crate::regression::fit;
use crate::report::{AnalysisPayload, BarAnalysis, HistogramAnalysis, LineAnalysis, PieAnalysis};
use crate::selection::{numeric_pairs, numeric_x, require_y_column, x_is_date};
use crate::statistics::{describe, quartiles};
use crate::trend::{classify, y_scale};
use configuration::AnalysisConfig;
use core_types::{ChartType, Series};

/// Builds the analysis of one chart type from a series.
///
/// The composer holds no per-call state; every `compose` starts from the
/// series alone.
#[derive(Debug, Clone, Default)]
pub struct ReportComposer {
    config: AnalysisConfig,
}

impl ReportComposer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Computes the statistics, chart-specific sections and key insights for
    /// `chart_type`.
    ///
    /// Fails with `InvalidColumnSelection` when the series does not meet the
    /// chart's column requirements.
    pub fn compose(&self, chart_type: ChartType, series: &Series) -> Result<AnalysisPayload, AnalyticsError> {
        tracing::debug!(%chart_type, x = %series.x_column, samples = series.len(), "Composing report.");
        match chart_type {
            ChartType::Bar => self.compose_bar(series).map(AnalysisPayload::Bar),
            ChartType::Line => self.compose_line(series).map(AnalysisPayload::Line),
            ChartType::Pie => self.compose_pie(series).map(AnalysisPayload::Pie),
            ChartType::Histogram => self.compose_histogram(series).map(AnalysisPayload::Histogram),
        }
    }

    /// A human-readable heading for the report.
    pub fn title(chart_type: ChartType, series: &Series) -> String {
        match chart_type {
            ChartType::Histogram => format!("Histogram Analysis: distribution of {}", series.x_column),
            ChartType::Bar => format!("Bar Chart Analysis: {} by {}", series.value_label(), series.x_column),
            ChartType::Line => format!("Line Chart Analysis: {} over {}", series.value_label(), series.x_column),
            ChartType::Pie => format!("Pie Chart Analysis: {} share by {}", series.value_label(), series.x_column),
        }
    }

    fn compose_bar(&self, series: &Series) -> Result<BarAnalysis, AnalyticsError> {
        let totals = category_totals(series, ChartType::Bar)?;
        let values: Vec<f64> = totals.iter().map(|t| t.value).collect();
        let statistics = describe(&values)?;
        let top_performers = rank_top(&totals, self.config.top_n);
        let bottom_performers = rank_bottom(&totals, self.config.top_n);
        let key_insights = insights::bar(
            &series.x_column,
            series.value_label(),
            &statistics,
            &top_performers,
            &bottom_performers,
        );

        Ok(BarAnalysis {
            statistics,
            top_performers,
            bottom_performers,
            key_insights,
        })
    }

    fn compose_line(&self, series: &Series) -> Result<LineAnalysis, AnalyticsError> {
        require_y_column(series, ChartType::Line)?;
        let model = fit(&series.samples)?;

        let pairs = numeric_pairs(&series.samples)?;
        let ys: Vec<f64> = pairs.iter().map(|(_, y)| *y).collect();
        let statistics = describe(&ys)?;
        let trend_analysis = classify(&model, y_scale(&ys), self.config.trend_threshold);

        // First occurrences of the extremes, in series order.
        let peak_at = pairs
            .iter()
            .find(|(_, y)| *y == statistics.max)
            .map(|(x, _)| x.label())
            .unwrap_or_default();
        let low_at = pairs
            .iter()
            .find(|(_, y)| *y == statistics.min)
            .map(|(x, _)| x.label())
            .unwrap_or_default();

        let key_insights = insights::line(
            &series.x_column,
            series.value_label(),
            &statistics,
            &trend_analysis,
            &peak_at,
            &low_at,
        );

        Ok(LineAnalysis {
            statistics,
            trend_analysis,
            key_insights,
        })
    }

    fn compose_pie(&self, series: &Series) -> Result<PieAnalysis, AnalyticsError> {
        let totals = category_totals(series, ChartType::Pie)?;
        let values: Vec<f64> = totals.iter().map(|t| t.value).collect();
        let statistics = describe(&values)?;
        let distribution = distribution(&totals);
        let key_insights = insights::pie(&series.x_column, series.value_label(), &statistics, &distribution);

        Ok(PieAnalysis {
            statistics,
            distribution,
            key_insights,
        })
    }

    fn compose_histogram(&self, series: &Series) -> Result<HistogramAnalysis, AnalyticsError> {
        let values = numeric_x(series)?;
        let statistics = describe(&values)?;
        let quartiles = quartiles(&values)?;
        let mut bins = histogram(&values, self.config.histogram_bins)?;
        if x_is_date(series) {
            label_as_dates(&mut bins);
        }
        let key_insights = insights::histogram(&series.x_column, &statistics, &quartiles, &bins);

        Ok(HistogramAnalysis {
            statistics,
            quartiles,
            bins,
            key_insights,
        })
    }
}

fn category_totals(series: &Series, chart_type: ChartType) -> Result<Vec<CategoryTotal>, AnalyticsError> {
    require_y_column(series, chart_type)?;
    let totals = aggregate(&series.samples)?;
    if totals.is_empty() {
        return Err(AnalyticsError::InsufficientData(format!(
            "{} chart needs at least one row with a {} value",
            chart_type,
            series.value_label()
        )));
    }
    Ok(totals)
}
