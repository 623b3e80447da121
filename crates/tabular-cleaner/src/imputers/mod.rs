//! Imputation module for handling missing values.
//!
//! Constant fills for text and date columns, rounded-mean fills for integer
//! columns.

mod statistical;

pub use statistical::StatisticalImputer;
