//! Five-number summary plus mean and sample standard deviation.

use serde::{Deserialize, Serialize};

use crate::util::math::{mean, sample_sd};

/// Distribution summary of one phenotype or covariate column.
///
/// Quantiles are nearest-rank without interpolation: the q-th quantile
/// is `sorted[floor(n * q)]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub sd: f64,
    pub n: usize,
}

impl Summary {
    /// Summarize `values`.
    ///
    /// # Panics
    /// If `values` is empty.
    pub fn from_observations(values: &[f64]) -> Self {
        let mut s = Summary::default();
        s.add(values);
        s
    }

    /// Recompute every field from `values`, replacing the previous state.
    ///
    /// # Panics
    /// If `values` is empty.
    pub fn add(&mut self, values: &[f64]) {
        assert!(!values.is_empty(), "cannot summarize an empty observation set");
        let n = values.len();

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        self.n = n;
        self.min = sorted[0];
        self.q1 = sorted[quantile_index(n, 0.25)];
        self.median = sorted[quantile_index(n, 0.5)];
        self.q3 = sorted[quantile_index(n, 0.75)];
        self.max = sorted[n - 1];
        self.mean = mean(values);
        self.sd = sample_sd(values);
    }

    /// Sample variance, `sd^2`.
    pub fn variance(&self) -> f64 {
        self.sd * self.sd
    }
}

#[inline]
fn quantile_index(n: usize, q: f64) -> usize {
    (n as f64 * q) as usize
}
