//! Descriptive statistics for a single column.

use crate::error::Result;
use crate::utils::{float_chunked, is_numeric_dtype};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Summary of one column, in the spirit of a `describe()` table.
///
/// Numeric fields are only populated for numeric columns, where NaN counts
/// as null. Quartiles interpolate linearly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    pub name: String,
    pub dtype: String,
    /// Non-null values.
    pub count: usize,
    pub null_count: usize,
    /// Distinct non-null values.
    pub distinct: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q25: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q75: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl ColumnStatistics {
    pub fn from_series(series: &Series) -> Result<Self> {
        let mut stats = Self {
            name: series.name().to_string(),
            dtype: series.dtype().to_string(),
            count: 0,
            null_count: 0,
            distinct: 0,
            mean: None,
            std: None,
            min: None,
            q25: None,
            median: None,
            q75: None,
            max: None,
        };

        if is_numeric_dtype(series.dtype()) {
            let ca = float_chunked(series)?;
            stats.null_count = ca.null_count();
            stats.count = ca.len() - stats.null_count;
            stats.distinct = ca.clone().into_series().drop_nulls().n_unique()?;
            stats.mean = ca.mean();
            stats.std = if stats.count > 1 { ca.std(1) } else { None };
            stats.min = ca.min();
            stats.q25 = ca.quantile(0.25, QuantileMethod::Linear)?;
            stats.median = ca.median();
            stats.q75 = ca.quantile(0.75, QuantileMethod::Linear)?;
            stats.max = ca.max();
        } else {
            let non_null = series.drop_nulls();
            stats.null_count = series.null_count();
            stats.count = non_null.len();
            stats.distinct = non_null.n_unique()?;
        }

        Ok(stats)
    }
}

/// Pearson correlation of two numeric columns over rows where both are
/// present.
///
/// `None` when either column is constant or fewer than two rows pair up.
pub fn pearson_correlation(left: &Series, right: &Series) -> Result<Option<f64>> {
    let left = float_chunked(left)?;
    let right = float_chunked(right)?;
    let paired = (&left)
        .into_iter()
        .zip(&right)
        .filter(|(l, r)| l.is_some() && r.is_some())
        .count();
    if paired < 2 {
        return Ok(None);
    }
    Ok(cov::pearson_corr(&left, &right).filter(|r| r.is_finite()))
}
