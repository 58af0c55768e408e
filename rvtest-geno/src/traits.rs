//! Core trait for loading genotype matrices.

use anyhow::Result;

use rvtest_linalg::DenseMatrix;

/// Dosage used for a missing genotype call. Any negative dosage is
/// treated as missing by the collapsing methods.
pub const MISSING_GENOTYPE: f64 = -9.0;

/// A source of sample x marker genotype dosages.
///
/// Implemented by the PLINK reader and the dosage-table reader. The
/// CLI holds a `Box<dyn GenotypeSource>` and pulls one matrix per run.
pub trait GenotypeSource {
    /// Total number of markers.
    fn n_markers(&self) -> usize;

    /// Total number of samples.
    fn n_samples(&self) -> usize {
        self.sample_ids().len()
    }

    /// Sample IDs in file order.
    fn sample_ids(&self) -> &[String];

    /// Index of the marker with the given ID, if present.
    fn marker_index(&self, id: &str) -> Option<usize>;

    /// Load a samples x markers matrix for the given marker and sample
    /// indices, in the order given. Missing calls are `MISSING_GENOTYPE`.
    fn read_genotypes(&self, markers: &[usize], samples: &[usize]) -> Result<DenseMatrix>;
}
