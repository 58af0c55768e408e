//! Phenotype and covariate file parser.
//!
//! Tab- or space-delimited with a header line naming the columns.
//! `NA`, `.`, `-` and empty fields are missing (NaN).

use std::path::Path;

use anyhow::{bail, Context, Result};

use rvtest_linalg::{DenseMatrix, LabeledMatrix};

/// Parsed phenotype data for all samples in the file.
#[derive(Debug, Clone)]
pub struct PhenotypeData {
    /// Sample IDs in file order.
    pub sample_ids: Vec<String>,
    /// Phenotype column name.
    pub phenotype_name: String,
    /// Phenotype values (NaN for missing).
    pub phenotype: Vec<f64>,
    /// covariates[i][j] = sample i, covariate j.
    pub covariates: Vec<Vec<f64>>,
    pub covariate_names: Vec<String>,
}

impl PhenotypeData {
    /// Samples with a phenotype and every covariate present.
    pub fn valid_sample_indices(&self) -> Vec<usize> {
        (0..self.sample_ids.len())
            .filter(|&i| {
                !self.phenotype[i].is_nan() && self.covariates[i].iter().all(|c| !c.is_nan())
            })
            .collect()
    }

    /// Phenotype values for the given samples.
    pub fn phenotype_for(&self, samples: &[usize]) -> Vec<f64> {
        samples.iter().map(|&i| self.phenotype[i]).collect()
    }

    /// Covariates for the given samples, labelled by column name.
    pub fn covariate_matrix(&self, samples: &[usize]) -> Result<LabeledMatrix> {
        let rows: Vec<Vec<f64>> = samples.iter().map(|&i| self.covariates[i].clone()).collect();
        let matrix = if rows.is_empty() {
            DenseMatrix::zeros(0, self.covariate_names.len())
        } else {
            DenseMatrix::from_rows(&rows)?
        };
        Ok(LabeledMatrix::new(matrix, self.covariate_names.clone())?)
    }
}

/// Parse a phenotype/covariate file.
///
/// - `pheno_col`: name of the phenotype column
/// - `covar_cols`: names of covariate columns (may be empty)
/// - `sample_id_col`: name of the sample ID column, usually "IID"
pub fn parse_phenotype_file(
    path: &Path,
    pheno_col: &str,
    covar_cols: &[String],
    sample_id_col: &str,
) -> Result<PhenotypeData> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read phenotype file: {}", path.display()))?;

    let mut lines = contents.lines();
    let header_line = lines
        .next()
        .ok_or_else(|| anyhow::anyhow!("Empty phenotype file: {}", path.display()))?;
    let tab_delimited = header_line.contains('\t');
    let headers = split_fields(header_line, tab_delimited);

    let column = |name: &str, what: &str| -> Result<usize> {
        headers
            .iter()
            .position(|&h| h == name)
            .ok_or_else(|| anyhow::anyhow!("{} column '{}' not found in header", what, name))
    };
    let id_idx = column(sample_id_col, "Sample ID")?;
    let pheno_idx = column(pheno_col, "Phenotype")?;
    let covar_indices: Vec<usize> = covar_cols
        .iter()
        .map(|name| column(name.as_str(), "Covariate"))
        .collect::<Result<_>>()?;

    let mut data = PhenotypeData {
        sample_ids: Vec::new(),
        phenotype_name: pheno_col.to_string(),
        phenotype: Vec::new(),
        covariates: Vec::new(),
        covariate_names: covar_cols.to_vec(),
    };

    for (line_num, line) in lines.enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields = split_fields(line, tab_delimited);
        let needed = id_idx.max(pheno_idx) + 1;
        if fields.len() < needed {
            bail!(
                "Line {} has too few fields (expected at least {})",
                line_num + 2,
                needed
            );
        }

        data.sample_ids.push(fields[id_idx].to_string());
        data.phenotype.push(parse_value(fields[pheno_idx]));
        data.covariates.push(
            covar_indices
                .iter()
                .map(|&ci| fields.get(ci).map_or(f64::NAN, |f| parse_value(f)))
                .collect(),
        );
    }

    Ok(data)
}

/// Tab-delimited files keep empty fields (missing values); otherwise any
/// run of spaces separates two fields.
fn split_fields(line: &str, tab_delimited: bool) -> Vec<&str> {
    if tab_delimited {
        line.split('\t').map(str::trim).collect()
    } else {
        line.split_whitespace().collect()
    }
}

/// Parse a string value to f64, treating NA/missing as NaN.
fn parse_value(s: &str) -> f64 {
    match s {
        "NA" | "na" | "Na" | "." | "" | "-" | "NaN" | "nan" => f64::NAN,
        _ => s.parse().unwrap_or(f64::NAN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_pheno(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("pheno.tsv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "IID\ty\tage\tsex").unwrap();
        writeln!(f, "S1\t1\t45\t1").unwrap();
        writeln!(f, "S2\t0\t50\t2").unwrap();
        writeln!(f, "S3\tNA\t55\t1").unwrap();
        writeln!(f, "S4\t0\t.\t2").unwrap();
        path
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("1.5"), 1.5);
        assert!(parse_value("NA").is_nan());
        assert!(parse_value(".").is_nan());
        assert!(parse_value("").is_nan());
    }

    #[test]
    fn test_parse_phenotype_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pheno(dir.path());
        let data =
            parse_phenotype_file(&path, "y", &["age".to_string(), "sex".to_string()], "IID").unwrap();

        assert_eq!(data.sample_ids, vec!["S1", "S2", "S3", "S4"]);
        assert_eq!(data.phenotype_name, "y");
        assert_eq!(data.phenotype[0], 1.0);
        assert!(data.phenotype[2].is_nan());
        assert_eq!(data.covariates[0], vec![45.0, 1.0]);
        assert_eq!(data.valid_sample_indices(), vec![0, 1]);
    }

    #[test]
    fn test_covariate_matrix() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pheno(dir.path());
        let data =
            parse_phenotype_file(&path, "y", &["age".to_string(), "sex".to_string()], "IID").unwrap();
        let valid = data.valid_sample_indices();
        let cov = data.covariate_matrix(&valid).unwrap();
        assert_eq!(cov.nrows(), 2);
        assert_eq!(cov.column_label(0), "age");
        assert_eq!(cov.column(0), vec![45.0, 50.0]);
        assert_eq!(data.phenotype_for(&valid), vec![1.0, 0.0]);
    }

    #[test]
    fn test_space_aligned_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pheno.txt");
        std::fs::write(&path, "IID  y    AGE\nS1   1    10\nS22  0.5  20\n").unwrap();
        let data = parse_phenotype_file(&path, "y", &["AGE".to_string()], "IID").unwrap();
        assert_eq!(data.sample_ids, vec!["S1", "S22"]);
        assert_eq!(data.phenotype, vec![1.0, 0.5]);
        assert_eq!(data.covariates, vec![vec![10.0], vec![20.0]]);
    }

    #[test]
    fn test_tab_delimited_empty_field_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pheno.tsv");
        std::fs::write(&path, "IID\ty\tAGE\nS1\t\t10\nS2\t1\t20\n").unwrap();
        let data = parse_phenotype_file(&path, "y", &["AGE".to_string()], "IID").unwrap();
        assert!(data.phenotype[0].is_nan());
        assert_eq!(data.covariates[1], vec![20.0]);
        assert_eq!(data.valid_sample_indices(), vec![1]);
    }

    #[test]
    fn test_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pheno(dir.path());
        let err = parse_phenotype_file(&path, "bmi", &[], "IID").unwrap_err();
        assert!(err.to_string().contains("Phenotype column 'bmi' not found"));
    }
}
