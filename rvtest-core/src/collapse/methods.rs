//! Collapsing methods: reduce a samples x markers genotype matrix to
//! one burden score per sample.
//!
//! Every whole-set method returns a freshly zeroed samples x 1 matrix.
//! Missing genotypes (negative dosages) never contribute.

use rayon::prelude::*;
use tracing::debug;

use rvtest_linalg::DenseMatrix;

use super::frequency::{marker_frequency, marker_frequency_from_controls};

/// A dosage counts as carrying the alternate allele when its integer
/// part is positive, so imputed dosages below 1 do not.
#[inline]
fn is_carrier(g: f64) -> bool {
    g.trunc() > 0.0
}

/// Carrier indicator per sample over the markers in `index`.
fn carrier_indicator(genotypes: &DenseMatrix, index: &[usize]) -> Vec<f64> {
    (0..genotypes.nrows())
        .map(|p| {
            if index.iter().any(|&m| is_carrier(genotypes.get(p, m))) {
                1.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Combined Multivariate and Collapsing (CMC).
///
/// 1 for samples carrying an alternate allele at any marker, else 0.
pub fn cmc_collapse(genotypes: &DenseMatrix) -> DenseMatrix {
    let mut out = DenseMatrix::zeros(genotypes.nrows(), 1);
    for p in 0..genotypes.nrows() {
        for m in 0..genotypes.ncols() {
            if is_carrier(genotypes.get(p, m)) {
                out.set(p, 0, 1.0);
                break;
            }
        }
    }
    out
}

/// CMC over the marker columns in `index`, written into column `out_col`
/// of an existing matrix. Other cells of `out` are left as they are.
///
/// # Panics
/// If `out` does not have one row per sample or has no column `out_col`.
pub fn cmc_collapse_indexed(
    genotypes: &DenseMatrix,
    index: &[usize],
    out: &mut DenseMatrix,
    out_col: usize,
) {
    assert_eq!(out.nrows(), genotypes.nrows(), "output must have one row per sample");
    assert!(out.ncols() > out_col, "output has no column {}", out_col);

    for p in 0..genotypes.nrows() {
        for &m in index {
            if is_carrier(genotypes.get(p, m)) {
                out.set(p, out_col, 1.0);
                break;
            }
        }
    }
}

/// CMC for several marker groups at once: column `j` of the result is
/// the indicator over `groups[j]`.
///
/// Groups are independent, so their columns are computed in parallel.
pub fn cmc_collapse_groups(genotypes: &DenseMatrix, groups: &[Vec<usize>]) -> DenseMatrix {
    let columns: Vec<Vec<f64>> = groups
        .par_iter()
        .map(|index| carrier_indicator(genotypes, index))
        .collect();

    let mut out = DenseMatrix::zeros(genotypes.nrows(), groups.len());
    for (j, col) in columns.iter().enumerate() {
        out.set_col(j, col);
    }
    out
}

/// Morris-Zeggini collapsing: number of markers at which each sample
/// carries an alternate allele.
pub fn zeggini_collapse(genotypes: &DenseMatrix) -> DenseMatrix {
    let mut out = DenseMatrix::zeros(genotypes.nrows(), 1);
    for p in 0..genotypes.nrows() {
        for m in 0..genotypes.ncols() {
            if is_carrier(genotypes.get(p, m)) {
                out.add_to(p, 0, 1.0);
            }
        }
    }
    out
}

/// Add `weight * genotype` for one marker to every sample's score.
fn accumulate_weighted(genotypes: &DenseMatrix, marker: usize, weight: f64, out: &mut DenseMatrix) {
    for p in 0..genotypes.nrows() {
        let g = genotypes.get(p, marker);
        if g >= 0.0 {
            out.add_to(p, 0, g * weight);
        }
    }
}

#[inline]
fn is_degenerate(freq: f64) -> bool {
    freq <= 0.0 || freq >= 1.0
}

/// Madsen-Browning weighted sum with frequencies estimated from controls.
///
/// `weight = 1 / sqrt(f * (1 - f) * n)` with `n` the total sample count.
/// Markers whose frequency is 0 or 1 are skipped.
///
/// # Panics
/// If `phenotype` does not have one entry per sample.
pub fn madsen_browning_collapse(genotypes: &DenseMatrix, phenotype: &[f64]) -> DenseMatrix {
    let n = genotypes.nrows();
    let mut out = DenseMatrix::zeros(n, 1);
    let mut n_skipped = 0usize;

    for m in 0..genotypes.ncols() {
        let freq = marker_frequency_from_controls(genotypes, phenotype, m);
        if is_degenerate(freq) {
            n_skipped += 1;
            continue;
        }
        let weight = 1.0 / (freq * (1.0 - freq) * n as f64).sqrt();
        accumulate_weighted(genotypes, m, weight, &mut out);
    }

    if n_skipped > 0 {
        debug!("Madsen-Browning: skipped {} markers with degenerate frequency", n_skipped);
    }
    out
}

/// Madsen-Browning weighted sum with frequencies from all samples.
///
/// `weight = 1 / sqrt(f * (1 - f))`; no phenotype needed. Markers whose
/// frequency is 0 or 1 (including all-missing markers) are skipped.
pub fn madsen_browning_collapse_unconditional(genotypes: &DenseMatrix) -> DenseMatrix {
    let mut out = DenseMatrix::zeros(genotypes.nrows(), 1);
    let mut n_skipped = 0usize;

    for m in 0..genotypes.ncols() {
        let freq = marker_frequency(genotypes, m);
        if is_degenerate(freq) {
            n_skipped += 1;
            continue;
        }
        let weight = 1.0 / (freq * (1.0 - freq)).sqrt();
        accumulate_weighted(genotypes, m, weight, &mut out);
    }

    if n_skipped > 0 {
        debug!("Madsen-Browning: skipped {} markers with degenerate frequency", n_skipped);
    }
    out
}

/// Frequency-weighted ("fp") collapsing.
///
/// Currently the same statistic as [`madsen_browning_collapse_unconditional`].
pub fn fp_collapse(genotypes: &DenseMatrix) -> DenseMatrix {
    madsen_browning_collapse_unconditional(genotypes)
}
