//! Rare-variant collapsing.
//!
//! Each method maps a samples x markers genotype matrix (and for some
//! methods a binary phenotype) to burden scores consumed by downstream
//! association models.

pub mod frequency;
pub mod methods;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use rvtest_linalg::DenseMatrix;

pub use frequency::{
    group_by_frequency, marker_frequencies, marker_frequency, marker_frequency_from_controls,
    FrequencyGroup,
};
pub use methods::{
    cmc_collapse, cmc_collapse_groups, cmc_collapse_indexed, fp_collapse,
    madsen_browning_collapse, madsen_browning_collapse_unconditional, zeggini_collapse,
};

#[derive(Error, Debug)]
pub enum CollapseError {
    #[error("Collapsing method '{0}' requires a binary phenotype")]
    MissingPhenotype(CollapseMethod),

    #[error("Phenotype has {got} values but genotype matrix has {expected} samples")]
    PhenotypeLength { expected: usize, got: usize },

    #[error("Unknown collapsing method '{0}' (expected cmc, zeggini, mb, mb-unconditional or fp)")]
    UnknownMethod(String),
}

/// Collapsing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollapseMethod {
    /// Carrier indicator (CMC).
    Cmc,
    /// Carrier count (Morris-Zeggini).
    Zeggini,
    /// Madsen-Browning, weights from control frequencies.
    #[serde(rename = "mb")]
    MadsenBrowning,
    /// Madsen-Browning, weights from whole-sample frequencies.
    #[serde(rename = "mb-unconditional")]
    MadsenBrowningUnconditional,
    /// Frequency-weighted collapsing.
    Fp,
}

impl CollapseMethod {
    pub const ALL: [CollapseMethod; 5] = [
        CollapseMethod::Cmc,
        CollapseMethod::Zeggini,
        CollapseMethod::MadsenBrowning,
        CollapseMethod::MadsenBrowningUnconditional,
        CollapseMethod::Fp,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CollapseMethod::Cmc => "cmc",
            CollapseMethod::Zeggini => "zeggini",
            CollapseMethod::MadsenBrowning => "mb",
            CollapseMethod::MadsenBrowningUnconditional => "mb-unconditional",
            CollapseMethod::Fp => "fp",
        }
    }

    pub fn requires_phenotype(&self) -> bool {
        matches!(self, CollapseMethod::MadsenBrowning)
    }
}

impl fmt::Display for CollapseMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CollapseMethod {
    type Err = CollapseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        CollapseMethod::ALL
            .into_iter()
            .find(|m| m.name() == lower)
            .ok_or_else(|| CollapseError::UnknownMethod(s.to_string()))
    }
}

/// Collapse `genotypes` with the given method.
///
/// `phenotype` is only consulted by [`CollapseMethod::MadsenBrowning`],
/// for which it is required.
pub fn collapse(
    method: CollapseMethod,
    genotypes: &DenseMatrix,
    phenotype: Option<&[f64]>,
) -> Result<DenseMatrix, CollapseError> {
    debug!(
        "Collapsing {} samples x {} markers with {}",
        genotypes.nrows(),
        genotypes.ncols(),
        method
    );
    let out = match method {
        CollapseMethod::Cmc => cmc_collapse(genotypes),
        CollapseMethod::Zeggini => zeggini_collapse(genotypes),
        CollapseMethod::MadsenBrowning => {
            let pheno = phenotype.ok_or(CollapseError::MissingPhenotype(method))?;
            if pheno.len() != genotypes.nrows() {
                return Err(CollapseError::PhenotypeLength {
                    expected: genotypes.nrows(),
                    got: pheno.len(),
                });
            }
            madsen_browning_collapse(genotypes, pheno)
        }
        CollapseMethod::MadsenBrowningUnconditional => {
            madsen_browning_collapse_unconditional(genotypes)
        }
        CollapseMethod::Fp => fp_collapse(genotypes),
    };
    Ok(out)
}
