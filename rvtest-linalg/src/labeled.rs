//! Matrix with a label attached to every column.
//!
//! Used for covariate tables, where the report prints each
//! covariate's name next to its summary.

use crate::dense::DenseMatrix;
use crate::error::LinalgError;

/// A `DenseMatrix` plus one label per column.
#[derive(Debug, Clone)]
pub struct LabeledMatrix {
    matrix: DenseMatrix,
    labels: Vec<String>,
}

impl LabeledMatrix {
    pub fn new(matrix: DenseMatrix, labels: Vec<String>) -> Result<Self, LinalgError> {
        if labels.len() != matrix.ncols() {
            return Err(LinalgError::LabelCount {
                expected: matrix.ncols(),
                got: labels.len(),
            });
        }
        Ok(Self { matrix, labels })
    }

    pub fn nrows(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.matrix.ncols()
    }

    /// Label of column `j`.
    pub fn column_label(&self, j: usize) -> &str {
        &self.labels[j]
    }

    /// Values of column `j`.
    pub fn column(&self, j: usize) -> Vec<f64> {
        self.matrix.col(j)
    }
}
