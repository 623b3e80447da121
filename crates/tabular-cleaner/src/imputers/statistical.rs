//! Statistical and constant imputation.
//!
//! Every method takes the column as it was before any imputation and returns
//! the filled column with the number of values it replaced, leaving the
//! DataFrame untouched. The caller decides when to swap columns in.

use crate::error::{CleaningError, Result};
use crate::utils::{float_chunked, numeric_values, round_half_even, string_values};
use polars::prelude::*;
use tracing::debug;

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Mean of the non-null values, rounded half-to-even.
    ///
    /// NaN counts as missing. Returns [`CleaningError::MissingStatistic`]
    /// when the column has no other value.
    pub fn rounded_mean(series: &Series) -> Result<i64> {
        float_chunked(series)?
            .mean()
            .map(|mean| round_half_even(mean) as i64)
            .ok_or_else(|| CleaningError::MissingStatistic(series.name().to_string()))
    }

    /// Fill nulls of an integer column and emit it as `Int64`.
    ///
    /// Present values are rounded half-to-even as well, so the column
    /// has a single integer representation afterwards.
    pub fn fill_integer(series: &Series, fill_value: Option<f64>) -> Result<(Series, usize)> {
        let values = numeric_values(series)?;
        let fill = fill_value.map(|v| round_half_even(v) as i64);
        let mut filled = 0usize;

        let result: Vec<Option<i64>> = values
            .into_iter()
            .map(|value| match value {
                Some(v) => Some(round_half_even(v) as i64),
                None => {
                    if fill.is_some() {
                        filled += 1;
                    }
                    fill
                }
            })
            .collect();

        debug!(
            "Filled {} values in '{}' with {:?}",
            filled,
            series.name(),
            fill
        );
        Ok((Series::new(series.name().clone(), result), filled))
    }

    /// Fill nulls of a text column with a constant and emit it as `String`.
    ///
    /// With no fill value the column is only cast.
    pub fn fill_text(series: &Series, fill_value: Option<&str>) -> Result<(Series, usize)> {
        let values = string_values(series)?;
        let mut filled = 0usize;

        let result: Vec<Option<String>> = values
            .into_iter()
            .map(|value| match (value, fill_value) {
                (Some(v), _) => Some(v),
                (None, Some(fill)) => {
                    filled += 1;
                    Some(fill.to_string())
                }
                (None, None) => None,
            })
            .collect();

        debug!(
            "Filled {} values in '{}' with {:?}",
            filled,
            series.name(),
            fill_value
        );
        Ok((Series::new(series.name().clone(), result), filled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(series: &Series) -> Vec<Option<i64>> {
        series.i64().unwrap().into_iter().collect()
    }

    // ========================================================================
    // rounded_mean() tests
    // ========================================================================

    #[test]
    fn test_rounded_mean_exact() {
        let series = Series::new("Age".into(), &[Some(30.0), None, Some(40.0)]);
        assert_eq!(StatisticalImputer::rounded_mean(&series).unwrap(), 35);
    }

    #[test]
    fn test_rounded_mean_tie_rounds_down_to_even() {
        // 30.5 -> 30
        let series = Series::new("Age".into(), &[Some(30.0), Some(31.0), None]);
        assert_eq!(StatisticalImputer::rounded_mean(&series).unwrap(), 30);
    }

    #[test]
    fn test_rounded_mean_tie_rounds_up_to_even() {
        // 31.5 -> 32
        let series = Series::new("Age".into(), &[Some(31.0), Some(32.0), None]);
        assert_eq!(StatisticalImputer::rounded_mean(&series).unwrap(), 32);
    }

    #[test]
    fn test_rounded_mean_from_integer_dtype() {
        let series = Series::new("Salary".into(), &[Some(50_000i64), Some(60_001), None]);
        // 55000.5 -> 55000
        assert_eq!(StatisticalImputer::rounded_mean(&series).unwrap(), 55_000);
    }

    #[test]
    fn test_rounded_mean_all_nulls() {
        let series = Series::new("Age".into(), &[Option::<f64>::None, None, None]);
        let err = StatisticalImputer::rounded_mean(&series).unwrap_err();
        assert!(matches!(err, CleaningError::MissingStatistic(name) if name == "Age"));
    }

    #[test]
    fn test_rounded_mean_skips_nan() {
        let series = Series::new("Age".into(), &[Some(30.0), Some(f64::NAN), None]);
        assert_eq!(StatisticalImputer::rounded_mean(&series).unwrap(), 30);
    }

    // ========================================================================
    // fill_integer() tests
    // ========================================================================

    #[test]
    fn test_fill_integer_basic() {
        let series = Series::new("Age".into(), &[Some(30.0), None, Some(40.0), None]);
        let (filled, count) = StatisticalImputer::fill_integer(&series, Some(35.0)).unwrap();

        assert_eq!(count, 2);
        assert_eq!(filled.dtype(), &DataType::Int64);
        assert_eq!(ints(&filled), vec![Some(30), Some(35), Some(40), Some(35)]);
    }

    #[test]
    fn test_fill_integer_rounds_present_values() {
        let series = Series::new("Age".into(), &[Some(29.5), Some(30.5), Some(30.6)]);
        let (filled, count) = StatisticalImputer::fill_integer(&series, Some(0.0)).unwrap();

        assert_eq!(count, 0);
        assert_eq!(ints(&filled), vec![Some(30), Some(30), Some(31)]);
    }

    #[test]
    fn test_fill_integer_fills_nan() {
        let series = Series::new("Age".into(), &[Some(f64::NAN), Some(20.0)]);
        let (filled, count) = StatisticalImputer::fill_integer(&series, Some(20.0)).unwrap();

        assert_eq!(count, 1);
        assert_eq!(ints(&filled), vec![Some(20), Some(20)]);
    }

    #[test]
    fn test_fill_integer_without_rule_keeps_nulls() {
        let series = Series::new("Age".into(), &[Some(30.0), None]);
        let (filled, count) = StatisticalImputer::fill_integer(&series, None).unwrap();

        assert_eq!(count, 0);
        assert_eq!(filled.null_count(), 1);
    }

    // ========================================================================
    // fill_text() tests
    // ========================================================================

    #[test]
    fn test_fill_text_basic() {
        let series = Series::new("Name".into(), &[Some("Alice"), None, Some("Bob")]);
        let (filled, count) = StatisticalImputer::fill_text(&series, Some("Unknown")).unwrap();

        assert_eq!(count, 1);
        assert_eq!(filled.null_count(), 0);
        assert_eq!(filled.str().unwrap().get(1), Some("Unknown"));
        assert_eq!(filled.str().unwrap().get(0), Some("Alice"));
    }

    #[test]
    fn test_fill_text_casts_numbers() {
        let series = Series::new("PhoneNumber".into(), &[Some(5551234i64), None]);
        let (filled, count) =
            StatisticalImputer::fill_text(&series, Some("Unavailable")).unwrap();

        assert_eq!(count, 1);
        assert_eq!(filled.dtype(), &DataType::String);
        assert_eq!(filled.str().unwrap().get(0), Some("5551234"));
        assert_eq!(filled.str().unwrap().get(1), Some("Unavailable"));
    }
}
