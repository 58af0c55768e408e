//! rvtest-core: Collapsing and summary statistics for rvtest-rs
//!
//! Implements the rare-variant collapsing methods (CMC, Morris-Zeggini,
//! Madsen-Browning, frequency-weighted), the allele frequency estimators
//! they use, and the phenotype/covariate summaries written to the
//! header of every report.

pub mod collapse;
pub mod summary;
pub mod util;
