//! Bronze/silver/gold layering for astronomical catalog tables.
//!
//! Bronze is the raw registry table, silver maps it onto a standardized
//! snake_case schema, gold adds derived keys and spectral class columns.
//! Each layer is one CSV file; each stage reads one file and writes one.

pub mod config;
pub mod constants;
pub mod error;
pub mod observability;
pub mod pipeline;

// Ports and their adapters
pub mod app;
pub mod infra;

pub use config::Config;
pub use error::{LayerError, Result};
pub use pipeline::{Layer, LayerPipeline, PipelineConfig, StageReport, Table};
