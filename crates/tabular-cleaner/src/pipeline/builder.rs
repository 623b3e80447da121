//! Pipeline orchestration.
//!
//! The `Pipeline` wraps a [`TabularCleaner`] with progress reporting and
//! run-level logging. Runs are synchronous and single-threaded.

use crate::cleaner::TabularCleaner;
use crate::config::{CleanerConfig, ConfigValidationError};
use crate::error::Result;
use crate::pipeline::progress::{ClosureProgressReporter, ProgressReporter, ProgressUpdate};
use crate::types::CleanedDataset;
use polars::prelude::*;
use std::sync::Arc;
use tracing::{error, info};

/// A configured cleaning run.
///
/// # Example
///
/// ```rust,ignore
/// use tabular_cleaner::{CleanerConfig, Pipeline};
///
/// let cleaned = Pipeline::builder()
///     .config(CleanerConfig::default())
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .process(dataframe)?;
/// ```
pub struct Pipeline {
    cleaner: TabularCleaner,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// Pipelines may be built on one thread and run on another.
static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &CleanerConfig {
        self.cleaner.config()
    }

    /// Clean a DataFrame, reporting each stage.
    ///
    /// A `Complete` or `Failed` update is always the last one sent.
    pub fn process(&self, df: DataFrame) -> Result<CleanedDataset> {
        info!("Starting cleaning pipeline...");
        let result = self
            .cleaner
            .clean_with_progress(df, &|update: ProgressUpdate| self.report_progress(update));

        match result {
            Ok(cleaned) => {
                self.report_progress(ProgressUpdate::complete(format!(
                    "Cleaned {} rows in {}ms",
                    cleaned.summary.rows_after, cleaned.summary.duration_ms
                )));
                Ok(cleaned)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<CleanerConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the cleaning configuration. Defaults to [`CleanerConfig::default`].
    pub fn config(mut self, config: CleanerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a custom [`ProgressReporter`].
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Receive progress updates through a closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Validate the configuration and build the pipeline.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            cleaner: TabularCleaner::new(config),
            progress_reporter: self.progress_reporter,
        })
    }
}
