//! Report generation module.
//!
//! A [`CleaningReport`] combines the run summary with before/after column
//! statistics and category frequencies. It is printed with `--json` and
//! written with `--emit-report`.
//!
//! # Example
//!
//! ```rust,ignore
//! use tabular_cleaner::reporting::ReportGenerator;
//!
//! let generator = ReportGenerator::new("output");
//! let report = generator.build_report("dirty.csv", Some(&output_path), &raw_df, &cleaned)?;
//! generator.write_report_to_file(&report, "cleaned_data")?;
//! ```

mod generator;

pub use generator::{CleaningReport, DEFAULT_CATEGORY_COLUMNS, ReportGenerator, ValueCount};
