use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: {0}")]
    InsufficientData(String),

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Invalid column selection: {0}")]
    InvalidColumnSelection(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
