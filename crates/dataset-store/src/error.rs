use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Dataset {0} was not found.")]
    NotFound(Uuid),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),
}
