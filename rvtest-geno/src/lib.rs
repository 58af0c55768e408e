//! rvtest-geno: Genotype and phenotype I/O for rvtest-rs
//!
//! Provides a GenotypeSource trait with PLINK bed/bim/fam and plain
//! dosage-table implementations, plus parsers for group files and
//! phenotype/covariate files.

pub mod dosage;
pub mod group_file;
pub mod phenotype;
pub mod plink;
pub mod sample;
pub mod traits;

pub use traits::{GenotypeSource, MISSING_GENOTYPE};
