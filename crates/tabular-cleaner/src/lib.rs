//! Tabular Record Cleaner
//!
//! Cleans CSV employee records with Polars: exact duplicate removal,
//! rule-driven imputation of missing values, and date normalization.
//!
//! # Overview
//!
//! - **Deduplication**: drops rows repeating an earlier row, first one wins
//! - **Imputation**: constant fills for text, rounded means for integers
//! - **Dates**: several input formats in, `YYYY-MM-DD` out
//! - **Summary**: counts and statistics for every run
//! - **Reports**: before/after column statistics as JSON
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tabular_cleaner::{CleanerConfig, Pipeline, io};
//!
//! let config = CleanerConfig::default();
//! let df = io::conform_schema(io::read_csv("dirty_data.csv")?, &config)?;
//!
//! let mut cleaned = Pipeline::builder()
//!     .config(config.clone())
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .process(df)?;
//!
//! println!("Mean age: {:?}", cleaned.summary.mean_age());
//! io::write_csv(&mut cleaned.data, config.output_path())?;
//! ```
//!
//! # Configuration
//!
//! ```rust,ignore
//! use tabular_cleaner::config::*;
//!
//! let config = CleanerConfig::builder()
//!     .column(ColumnSpec::text("Name", "Unknown"))
//!     .column(ColumnSpec::integer_mean("Age"))
//!     .column(ColumnSpec::date("JoiningDate", NaiveDate::from_ymd_opt(2025, 1, 4).unwrap()))
//!     .invalid_dates(InvalidDatePolicy::RejectRow)
//!     .build()?;
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod io;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{DateNormalizer, TabularCleaner};
pub use config::{
    CleanerConfig, CleanerConfigBuilder, ColumnKind, ColumnSpec, ConfigValidationError,
    ImputationRule, InvalidDatePolicy,
};
pub use error::{CleaningError, Result as CleaningResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use pipeline::{
    CleaningStage, ClosureProgressReporter, Pipeline, PipelineBuilder, ProgressReporter,
    ProgressUpdate,
};
pub use profiler::{ColumnStatistics, Correlation, DataProfiler};
pub use reporting::{CleaningReport, ReportGenerator};
pub use types::{CleanedDataset, CleaningSummary, DateOutcome, ImputationOutcome};
