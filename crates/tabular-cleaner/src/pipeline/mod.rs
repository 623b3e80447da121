//! Pipeline module for orchestrating a cleaning run.

mod builder;
pub mod progress;

pub use builder::{Pipeline, PipelineBuilder};
pub use progress::{
    CleaningStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
