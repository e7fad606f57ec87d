//! # DataLens Analytics Engine
//!
//! This crate turns two selected columns of a dataset into fitted trend
//! models, forecasts and per-chart analytical reports.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No I/O and no knowledge of where rows come from. It
//!   depends only on `core-types` for its inputs and `configuration` for its
//!   tunables.
//! - **Stateless Calculation:** The `AnalyticsEngine` takes a `Series` and
//!   produces a `ChartData`, `Report`, `BatchAnalysis` or `Prediction`. Nothing
//!   outlives a call, so concurrent use needs no coordination.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: the facade over every operation below.
//! - `statistics`, `regression`, `trend`, `ranking`, `histogram`: the building
//!   blocks, usable on their own.
//! - `ReportComposer` / `ForecastComposer`: chart reports and forecasts.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod chart;
pub mod composer;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod histogram;
mod insights;
pub mod ranking;
pub mod regression;
pub mod report;
mod selection;
pub mod statistics;
pub mod trend;

// Re-export the key components to create a clean, public-facing API.
pub use chart::{ChartData, ChartOptions};
pub use composer::ReportComposer;
pub use configuration::{
    AnalysisConfig, DEFAULT_HISTOGRAM_BINS, DEFAULT_TOP_N, DEFAULT_TREND_THRESHOLD,
};
pub use engine::{AnalyticsEngine, ChartSelection};
pub use error::AnalyticsError;
pub use forecast::{ForecastComposer, ModelInfo, Prediction};
pub use histogram::HistogramBin;
pub use ranking::{CategoryTotal, DistributionEntry, RankedEntry};
pub use regression::{ForecastPoint, RegressionModel, XEncoding};
pub use report::{AnalysisPayload, BatchAnalysis, ChartFailure, Report};
pub use statistics::{Quartiles, Statistics};
pub use trend::{TrendAnalysis, TrendDirection};
