//! Phenotype transforms applied before analysis.

use anyhow::{Context, Result};
use statrs::distribution::{ContinuousCDF, Normal};

use super::math::average_ranks;

/// Rank-based inverse normal transform.
///
/// Non-missing values are ranked (ties share their average rank) and
/// mapped to `Phi^-1((rank - 0.5) / n)`, where `n` counts only
/// non-missing values. NaN entries stay NaN.
pub fn inverse_normal_transform(values: &[f64]) -> Result<Vec<f64>> {
    let normal = Normal::new(0.0, 1.0).context("standard normal distribution")?;

    let present: Vec<usize> = (0..values.len()).filter(|&i| !values[i].is_nan()).collect();
    let observed: Vec<f64> = present.iter().map(|&i| values[i]).collect();
    let ranks = average_ranks(&observed);
    let n = observed.len() as f64;

    let mut out = vec![f64::NAN; values.len()];
    for (&i, &r) in present.iter().zip(ranks.iter()) {
        out[i] = normal.inverse_cdf((r - 0.5) / n);
    }
    Ok(out)
}
