use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The chart types a selection can be rendered and analysed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
    Histogram,
}

impl ChartType {
    /// The fixed order in which batch reports are generated and numbered.
    pub const GENERATION_ORDER: [ChartType; 4] =
        [ChartType::Bar, ChartType::Line, ChartType::Pie, ChartType::Histogram];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Pie => "pie",
            ChartType::Histogram => "histogram",
        }
    }

    /// The indicator shown next to a report of this type.
    pub fn icon(&self) -> &'static str {
        match self {
            ChartType::Bar => "📊",
            ChartType::Line => "📈",
            ChartType::Pie => "🥧",
            ChartType::Histogram => "📶",
        }
    }

    /// Whether the chart plots a y column against x.
    pub fn requires_y(&self) -> bool {
        !matches!(self, ChartType::Histogram)
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" => Ok(ChartType::Bar),
            "line" => Ok(ChartType::Line),
            "pie" => Ok(ChartType::Pie),
            "histogram" => Ok(ChartType::Histogram),
            other => Err(CoreError::InvalidInput("chart type".to_string(), other.to_string())),
        }
    }
}

/// How grouped y values are combined when building chart payloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    #[default]
    Mean,
    Sum,
}
