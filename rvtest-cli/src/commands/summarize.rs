//! Phenotype and covariate summary header.
//!
//! rvtest summarize --pheno-file ... --pheno-col y --covar-cols age,sex --output-file ...

use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Result};
use clap::Args;
use tracing::info;

use rvtest_core::summary::SummaryHeader;
use rvtest_core::util::transform::inverse_normal_transform;
use rvtest_geno::phenotype::parse_phenotype_file;

#[derive(Args)]
pub struct SummarizeArgs {
    /// Phenotype file
    #[arg(long)]
    pheno_file: String,

    /// Phenotype column name
    #[arg(long, default_value = "y")]
    pheno_col: String,

    /// Sample ID column name in the phenotype file
    #[arg(long, default_value = "IID")]
    sample_id_col: String,

    /// Covariate column names (comma-separated)
    #[arg(long, value_delimiter = ',')]
    covar_cols: Vec<String>,

    /// Rank-based inverse normal transform of the phenotype before summarizing
    #[arg(long)]
    inverse_normal: bool,

    /// Output file for the header block
    #[arg(long)]
    output_file: String,

    /// Also write the summaries as JSON
    #[arg(long)]
    json_file: Option<String>,
}

pub fn run(args: SummarizeArgs) -> Result<()> {
    info!("=== rvtest summarize ===");

    let pheno = parse_phenotype_file(
        Path::new(&args.pheno_file),
        &args.pheno_col,
        &args.covar_cols,
        &args.sample_id_col,
    )?;
    let valid = pheno.valid_sample_indices();
    if valid.is_empty() {
        bail!("No samples with a phenotype and all covariates present");
    }
    info!(
        "{} of {} samples have a phenotype and all covariates",
        valid.len(),
        pheno.sample_ids.len()
    );

    let mut values = pheno.phenotype_for(&valid);
    if args.inverse_normal {
        info!("Applying inverse normal transform to {}", pheno.phenotype_name);
        values = inverse_normal_transform(&values)?;
    }

    let mut header = SummaryHeader::new();
    header.record_phenotype(&pheno.phenotype_name, &values);
    header.set_inverse_normal(args.inverse_normal);
    if !pheno.covariate_names.is_empty() {
        header.record_covariates(&pheno.covariate_matrix(&valid)?);
    }

    let output_file = std::fs::File::create(&args.output_file)?;
    let mut writer = BufWriter::new(output_file);
    header.write_header(&mut writer)?;
    writer.flush()?;
    info!("Header written to {}", args.output_file);

    if let Some(ref path) = args.json_file {
        std::fs::write(path, header.to_json()?)?;
        info!("JSON summary written to {}", path);
    }
    Ok(())
}
