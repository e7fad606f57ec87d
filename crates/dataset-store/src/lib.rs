//! # DataLens Dataset Store
//!
//! This crate keeps uploaded tabular datasets and serves them to the rest of
//! the application.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** Everything about how rows are held, typed and looked up
//!   lives here. The analytics engine only ever sees the `Series` this crate
//!   extracts for a column pair.
//! - **In-Memory & Shared:** Datasets live in an async `RwLock` map of
//!   immutable `Arc<Dataset>` snapshots, so readers never block each other
//!   and a deletion never invalidates a request already in flight.
//!
//! ## Public API
//!
//! - `DatasetRepository`: save, list, fetch and delete datasets.
//! - `Dataset`: column metadata, row preview and `series` extraction.
//! - `StoreError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod model;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use error::StoreError;
pub use model::{ColumnKind, ColumnMeta, Dataset, DatasetSummary, NewDataset, Preview};
pub use repository::DatasetRepository;
