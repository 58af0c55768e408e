//! Plain-text dosage table reader.
//!
//! One row per sample, one column per marker, tab or space delimited:
//! ```text
//! IID  1:100:A:C  1:200:G:T
//! S1   0          1
//! S2   2          NA
//! ```
//! `NA`, `.` and negative values are missing.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};

use rvtest_linalg::DenseMatrix;

use crate::traits::{GenotypeSource, MISSING_GENOTYPE};

/// A dosage table held in memory.
#[derive(Debug, Clone)]
pub struct DosageMatrix {
    pub sample_ids: Vec<String>,
    pub marker_ids: Vec<String>,
    /// samples x markers
    pub genotypes: DenseMatrix,
    marker_lookup: HashMap<String, usize>,
}

impl DosageMatrix {
    /// Read a dosage table from `path`.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dosage file: {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Invalid dosage file: {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let mut lines = contents
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'));

        let header = lines
            .next()
            .ok_or_else(|| anyhow::anyhow!("Empty dosage file"))?;
        let marker_ids: Vec<String> = header
            .split_whitespace()
            .skip(1)
            .map(String::from)
            .collect();

        let mut sample_ids = Vec::new();
        let mut rows = Vec::new();
        for (line_num, line) in lines.enumerate() {
            let mut fields = line.split_whitespace();
            let id = match fields.next() {
                Some(id) => id.to_string(),
                None => continue,
            };
            let row: Vec<f64> = fields.map(parse_dosage).collect::<Result<_>>()?;
            if row.len() != marker_ids.len() {
                bail!(
                    "Sample {} (line {}) has {} dosages, expected {}",
                    id,
                    line_num + 2,
                    row.len(),
                    marker_ids.len()
                );
            }
            sample_ids.push(id);
            rows.push(row);
        }

        let genotypes = if rows.is_empty() {
            DenseMatrix::zeros(0, marker_ids.len())
        } else {
            DenseMatrix::from_rows(&rows)?
        };

        let mut marker_lookup = HashMap::with_capacity(marker_ids.len());
        for (i, id) in marker_ids.iter().enumerate() {
            marker_lookup.entry(id.clone()).or_insert(i);
        }

        Ok(Self {
            sample_ids,
            marker_ids,
            genotypes,
            marker_lookup,
        })
    }
}

fn parse_dosage(s: &str) -> Result<f64> {
    match s {
        "NA" | "na" | "." | "-" => Ok(MISSING_GENOTYPE),
        _ => {
            let v: f64 = s
                .parse()
                .with_context(|| format!("Invalid dosage value '{}'", s))?;
            Ok(if v < 0.0 || v.is_nan() { MISSING_GENOTYPE } else { v })
        }
    }
}

impl GenotypeSource for DosageMatrix {
    fn n_markers(&self) -> usize {
        self.marker_ids.len()
    }

    fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    fn marker_index(&self, id: &str) -> Option<usize> {
        self.marker_lookup.get(id).copied()
    }

    fn read_genotypes(&self, markers: &[usize], samples: &[usize]) -> Result<DenseMatrix> {
        if let Some(&m) = markers.iter().find(|&&m| m >= self.marker_ids.len()) {
            bail!("Marker index {} out of range ({})", m, self.marker_ids.len());
        }
        if let Some(&s) = samples.iter().find(|&&s| s >= self.sample_ids.len()) {
            bail!("Sample index {} out of range ({})", s, self.sample_ids.len());
        }
        Ok(self.genotypes.select_cols(markers).select_rows(samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_dosage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dosage.tsv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "IID\tv1\tv2\tv3").unwrap();
        writeln!(f, "S1\t0\t1\t0.4").unwrap();
        writeln!(f, "S2\t2\tNA\t-1").unwrap();

        let d = DosageMatrix::read(&path).unwrap();
        assert_eq!(d.sample_ids, vec!["S1", "S2"]);
        assert_eq!(d.marker_ids, vec!["v1", "v2", "v3"]);
        assert_eq!(d.genotypes.row(0), vec![0.0, 1.0, 0.4]);
        assert_eq!(d.genotypes.row(1), vec![2.0, MISSING_GENOTYPE, MISSING_GENOTYPE]);
        assert_eq!(d.marker_index("v3"), Some(2));

        let g = d.read_genotypes(&[2, 0], &[1]).unwrap();
        assert_eq!(g.row(0), vec![MISSING_GENOTYPE, 2.0]);
    }

    #[test]
    fn test_ragged_row_rejected() {
        let err = DosageMatrix::parse("IID v1 v2\nS1 0\n").unwrap_err();
        assert!(err.to_string().contains("has 1 dosages, expected 2"));
    }

    #[test]
    fn test_bad_value_rejected() {
        assert!(DosageMatrix::parse("IID v1\nS1 x\n").is_err());
    }
}
