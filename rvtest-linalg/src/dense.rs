#![allow(clippy::needless_range_loop)]
//! Dense matrix container backed by faer.
//!
//! Genotype matrices are stored samples x markers; collapsed burden
//! scores come back as samples x groups. All element access is
//! bounds-checked.

use faer::Mat;

use crate::error::LinalgError;

/// A dense matrix wrapper around faer's `Mat<f64>`.
#[derive(Debug, Clone)]
pub struct DenseMatrix {
    inner: Mat<f64>,
}

impl DenseMatrix {
    /// Create a new dense matrix filled with zeros.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            inner: Mat::zeros(nrows, ncols),
        }
    }

    /// Create a dense matrix from a flat slice in row-major order.
    pub fn from_row_major(nrows: usize, ncols: usize, data: &[f64]) -> Self {
        assert_eq!(data.len(), nrows * ncols);
        let inner = Mat::from_fn(nrows, ncols, |i, j| data[i * ncols + j]);
        Self { inner }
    }

    /// Build a matrix from one `Vec` per row.
    ///
    /// All rows must have the same length. An empty row list gives a 0 x 0 matrix.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, LinalgError> {
        let ncols = rows.first().map_or(0, |r| r.len());
        for (i, r) in rows.iter().enumerate() {
            if r.len() != ncols {
                return Err(LinalgError::RaggedRow {
                    row: i,
                    expected: ncols,
                    got: r.len(),
                });
            }
        }
        let inner = Mat::from_fn(rows.len(), ncols, |i, j| rows[i][j]);
        Ok(Self { inner })
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.inner.nrows()
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.inner.ncols()
    }

    /// Get element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.check_bounds(row, col);
        self.inner.read(row, col)
    }

    /// Set element at (row, col).
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.check_bounds(row, col);
        self.inner.write(row, col, value);
    }

    /// Add `value` to the element at (row, col).
    pub fn add_to(&mut self, row: usize, col: usize, value: f64) {
        self.check_bounds(row, col);
        let cur = self.inner.read(row, col);
        self.inner.write(row, col, cur + value);
    }

    #[inline]
    fn check_bounds(&self, row: usize, col: usize) {
        assert!(
            row < self.nrows() && col < self.ncols(),
            "index ({}, {}) out of bounds for {} x {} matrix",
            row,
            col,
            self.nrows(),
            self.ncols()
        );
    }

    /// Extract column as a Vec<f64>.
    pub fn col(&self, j: usize) -> Vec<f64> {
        assert!(j < self.ncols(), "column {} out of bounds", j);
        (0..self.nrows()).map(|i| self.inner.read(i, j)).collect()
    }

    /// Extract row as a Vec<f64>.
    pub fn row(&self, i: usize) -> Vec<f64> {
        assert!(i < self.nrows(), "row {} out of bounds", i);
        (0..self.ncols()).map(|j| self.inner.read(i, j)).collect()
    }

    /// Set an entire column from a slice.
    pub fn set_col(&mut self, j: usize, data: &[f64]) {
        assert_eq!(data.len(), self.nrows());
        assert!(j < self.ncols(), "column {} out of bounds", j);
        for i in 0..self.nrows() {
            self.inner.write(i, j, data[i]);
        }
    }

    /// Copy the given columns, in order, into a new matrix.
    pub fn select_cols(&self, cols: &[usize]) -> DenseMatrix {
        for &j in cols {
            assert!(j < self.ncols(), "column {} out of bounds", j);
        }
        let inner = Mat::from_fn(self.nrows(), cols.len(), |i, k| self.inner.read(i, cols[k]));
        DenseMatrix { inner }
    }

    /// Copy the given rows, in order, into a new matrix.
    pub fn select_rows(&self, rows: &[usize]) -> DenseMatrix {
        for &i in rows {
            assert!(i < self.nrows(), "row {} out of bounds", i);
        }
        let inner = Mat::from_fn(rows.len(), self.ncols(), |k, j| self.inner.read(rows[k], j));
        DenseMatrix { inner }
    }
}
