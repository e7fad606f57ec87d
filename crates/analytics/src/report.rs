use crate::histogram::HistogramBin;
use crate::ranking::{DistributionEntry, RankedEntry};
use crate::statistics::{Quartiles, Statistics};
use crate::trend::TrendAnalysis;
use core_types::ChartType;
use serde::{Deserialize, Serialize};

/// One generated analytical report.
///
/// This struct is the final output of the `ReportComposer` and serves as the
/// data transfer object handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// 1-based position in the bar, line, pie, histogram order, counting
    /// only the chart types that were generated successfully.
    pub serial: usize,
    pub chart_type: ChartType,
    pub icon: String,
    pub title: String,
    pub analysis: AnalysisPayload,
}

/// Chart-specific analysis. Each variant carries exactly the sections its
/// chart type guarantees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnalysisPayload {
    Bar(BarAnalysis),
    Line(LineAnalysis),
    Pie(PieAnalysis),
    Histogram(HistogramAnalysis),
}

impl AnalysisPayload {
    pub fn chart_type(&self) -> ChartType {
        match self {
            AnalysisPayload::Bar(_) => ChartType::Bar,
            AnalysisPayload::Line(_) => ChartType::Line,
            AnalysisPayload::Pie(_) => ChartType::Pie,
            AnalysisPayload::Histogram(_) => ChartType::Histogram,
        }
    }

    pub fn statistics(&self) -> &Statistics {
        match self {
            AnalysisPayload::Bar(a) => &a.statistics,
            AnalysisPayload::Line(a) => &a.statistics,
            AnalysisPayload::Pie(a) => &a.statistics,
            AnalysisPayload::Histogram(a) => &a.statistics,
        }
    }

    pub fn key_insights(&self) -> &[String] {
        match self {
            AnalysisPayload::Bar(a) => &a.key_insights,
            AnalysisPayload::Line(a) => &a.key_insights,
            AnalysisPayload::Pie(a) => &a.key_insights,
            AnalysisPayload::Histogram(a) => &a.key_insights,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarAnalysis {
    pub statistics: Statistics,
    pub top_performers: Vec<RankedEntry>,
    pub bottom_performers: Vec<RankedEntry>,
    pub key_insights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineAnalysis {
    pub statistics: Statistics,
    pub trend_analysis: TrendAnalysis,
    pub key_insights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieAnalysis {
    pub statistics: Statistics,
    pub distribution: Vec<DistributionEntry>,
    pub key_insights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramAnalysis {
    pub statistics: Statistics,
    pub quartiles: Quartiles,
    pub bins: Vec<HistogramBin>,
    pub key_insights: Vec<String>,
}

/// A chart type that could not be analysed in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFailure {
    pub chart_type: ChartType,
    pub error: String,
}

/// The outcome of a multi-chart analysis: the reports that succeeded, in
/// generation order, and the chart types that failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchAnalysis {
    pub reports: Vec<Report>,
    #[serde(default)]
    pub failures: Vec<ChartFailure>,
}
