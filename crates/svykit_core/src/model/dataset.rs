//! Columnar storage for collected survey responses.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::EstimatorError;

/// A weighted survey dataset with named-column access.
///
/// Numeric columns hold outcome variables and weights; label columns hold
/// cluster (PSU) and strata identifiers. All columns share one row count,
/// fixed by the first column inserted. The estimator only ever reads from a
/// dataset; resampling works on row indices, never on the stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeightedDataset {
    n_rows: usize,
    numeric: FxHashMap<String, Vec<f64>>,
    labels: FxHashMap<String, Vec<String>>,
}

impl WeightedDataset {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a numeric column. The first column inserted fixes the row count.
    pub fn push_numeric(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), EstimatorError> {
        let name = name.into();
        self.check_len(&name, values.len())?;
        self.numeric.insert(name, values);
        Ok(())
    }

    /// Add a label (identifier) column, e.g. PSU or stratum ids.
    pub fn push_labels(
        &mut self,
        name: impl Into<String>,
        values: Vec<String>,
    ) -> Result<(), EstimatorError> {
        let name = name.into();
        self.check_len(&name, values.len())?;
        self.labels.insert(name, values);
        Ok(())
    }

    fn check_len(&mut self, name: &str, len: usize) -> Result<(), EstimatorError> {
        if self.numeric.is_empty() && self.labels.is_empty() {
            self.n_rows = len;
            return Ok(());
        }
        if len != self.n_rows {
            return Err(EstimatorError::LengthMismatch {
                column: name.to_string(),
                expected: self.n_rows,
                actual: len,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn numeric(&self, name: &str) -> Option<&[f64]> {
        self.numeric.get(name).map(Vec::as_slice)
    }

    #[must_use]
    pub fn labels(&self, name: &str) -> Option<&[String]> {
        self.labels.get(name).map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.n_rows
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_column_fixes_row_count() {
        let mut data = WeightedDataset::new();
        data.push_numeric("y", vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(data.len(), 3);

        let err = data.push_numeric("w", vec![1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            EstimatorError::LengthMismatch {
                column: "w".to_string(),
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_named_access() {
        let mut data = WeightedDataset::new();
        data.push_numeric("y", vec![1.0, 2.0]).unwrap();
        data.push_labels("psu", vec!["a".to_string(), "b".to_string()])
            .unwrap();

        assert_eq!(data.numeric("y"), Some(&[1.0, 2.0][..]));
        assert_eq!(data.labels("psu").map(<[String]>::len), Some(2));
        assert_eq!(data.numeric("missing"), None);
    }
}
