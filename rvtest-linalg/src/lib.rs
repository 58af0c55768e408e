//! rvtest-linalg: Matrix containers for rvtest-rs
//!
//! Provides the faer-backed dense matrix used for genotype and
//! collapsed-score matrices, and a column-labelled variant for
//! covariate tables.

pub mod dense;
pub mod error;
pub mod labeled;

pub use dense::DenseMatrix;
pub use error::LinalgError;
pub use labeled::LabeledMatrix;
