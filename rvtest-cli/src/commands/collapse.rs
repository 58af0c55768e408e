//! Gene-level collapsing.
//!
//! rvtest collapse --group-file ... (--plink-file ... | --dosage-file ...) --method cmc --output-file ...

use std::collections::HashMap;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Result};
use clap::Args;
use tracing::{info, warn};

use rvtest_core::collapse::{self, cmc_collapse_groups, CollapseMethod};
use rvtest_geno::dosage::DosageMatrix;
use rvtest_geno::group_file::GroupFile;
use rvtest_geno::phenotype::parse_phenotype_file;
use rvtest_geno::plink::PlinkReader;
use rvtest_geno::sample::{match_samples, reorder_f64};
use rvtest_geno::GenotypeSource;
use rvtest_linalg::DenseMatrix;

#[derive(Args)]
pub struct CollapseArgs {
    /// Group file listing the markers of each gene
    #[arg(long)]
    group_file: String,

    /// PLINK file prefix
    #[arg(long)]
    plink_file: Option<String>,

    /// Dosage table (IID column followed by one column per marker)
    #[arg(long)]
    dosage_file: Option<String>,

    /// Phenotype file; required for --method mb
    #[arg(long)]
    pheno_file: Option<String>,

    /// Phenotype column name (1 = case, 0 = control; 1/2 coding is converted)
    #[arg(long, default_value = "y")]
    pheno_col: String,

    /// Sample ID column name in the phenotype file
    #[arg(long, default_value = "IID")]
    sample_id_col: String,

    /// Collapsing method: cmc, zeggini, mb, mb-unconditional, fp
    #[arg(long, default_value = "cmc")]
    method: CollapseMethod,

    /// Only collapse markers carrying this annotation
    #[arg(long)]
    annotation: Option<String>,

    /// Output file path
    #[arg(long)]
    output_file: String,
}

/// Markers of one gene, as columns of the loaded genotype matrix.
struct ResolvedGroup {
    name: String,
    columns: Vec<usize>,
}

pub fn run(args: CollapseArgs) -> Result<()> {
    info!("=== rvtest collapse ({}) ===", args.method);

    if args.method.requires_phenotype() && args.pheno_file.is_none() {
        bail!("--method {} requires --pheno-file", args.method);
    }

    let source: Box<dyn GenotypeSource> = if let Some(ref prefix) = args.plink_file {
        Box::new(PlinkReader::new(prefix)?)
    } else if let Some(ref path) = args.dosage_file {
        Box::new(DosageMatrix::read(path)?)
    } else {
        bail!("Must specify --plink-file or --dosage-file");
    };
    info!(
        "Genotype source: {} markers x {} samples",
        source.n_markers(),
        source.n_samples()
    );

    // Samples to analyze, and their phenotype in the same order.
    let (sample_indices, sample_ids, phenotype) = match args.pheno_file {
        Some(ref path) => {
            let pheno =
                parse_phenotype_file(Path::new(path), &args.pheno_col, &[], &args.sample_id_col)?;
            let valid = pheno.valid_sample_indices();
            let valid_ids: Vec<String> =
                valid.iter().map(|&i| pheno.sample_ids[i].clone()).collect();
            let matched = match_samples(source.sample_ids(), &valid_ids);
            if matched.is_empty() {
                bail!("No samples shared between genotype and phenotype files");
            }
            info!("{} samples with genotype and phenotype", matched.len());
            let values = reorder_f64(&pheno.phenotype_for(&valid), &matched.phenotype_indices);
            (matched.genotype_indices, matched.ids, Some(to_case_control(&values)))
        }
        None => (
            (0..source.n_samples()).collect(),
            source.sample_ids().to_vec(),
            None,
        ),
    };

    let group_file = GroupFile::parse(&args.group_file)?;
    let (markers, groups) =
        resolve_groups(source.as_ref(), &group_file, args.annotation.as_deref());
    if groups.is_empty() {
        bail!("No group has markers present in the genotype file");
    }
    info!(
        "{} of {} groups have markers ({} distinct markers)",
        groups.len(),
        group_file.groups.len(),
        markers.len()
    );

    let genotypes = source.read_genotypes(&markers, &sample_indices)?;
    let collapsed = collapse_groups(args.method, &genotypes, &groups, phenotype.as_deref())?;

    let output_file = std::fs::File::create(&args.output_file)?;
    let mut writer = BufWriter::new(output_file);
    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    write_collapsed(&mut writer, &sample_ids, &names, &collapsed)?;
    writer.flush()?;

    info!("Results written to {}", args.output_file);
    Ok(())
}

/// Map every group's marker IDs onto columns of one shared genotype matrix.
///
/// Returns the distinct source marker indices to load and, per group with at
/// least one known marker, the matrix columns it uses.
fn resolve_groups(
    source: &dyn GenotypeSource,
    group_file: &GroupFile,
    annotation: Option<&str>,
) -> (Vec<usize>, Vec<ResolvedGroup>) {
    let mut markers: Vec<usize> = Vec::new();
    let mut column_of: HashMap<usize, usize> = HashMap::new();
    let mut groups = Vec::new();

    for group in &group_file.groups {
        let mut columns = Vec::new();
        let mut n_unknown = 0;
        for id in group.variants_with_annotation(annotation) {
            match source.marker_index(id) {
                Some(m) => {
                    let col = *column_of.entry(m).or_insert_with(|| {
                        markers.push(m);
                        markers.len() - 1
                    });
                    columns.push(col);
                }
                None => n_unknown += 1,
            }
        }
        if n_unknown > 0 {
            warn!("Group {}: {} markers not found in genotype file", group.name, n_unknown);
        }
        if columns.is_empty() {
            warn!("Group {}: no markers to collapse, skipping", group.name);
            continue;
        }
        groups.push(ResolvedGroup {
            name: group.name.clone(),
            columns,
        });
    }
    (markers, groups)
}

/// One output column per group.
fn collapse_groups(
    method: CollapseMethod,
    genotypes: &DenseMatrix,
    groups: &[ResolvedGroup],
    phenotype: Option<&[f64]>,
) -> Result<DenseMatrix> {
    if method == CollapseMethod::Cmc {
        let indices: Vec<Vec<usize>> = groups.iter().map(|g| g.columns.clone()).collect();
        return Ok(cmc_collapse_groups(genotypes, &indices));
    }

    let mut out = DenseMatrix::zeros(genotypes.nrows(), groups.len());
    for (j, group) in groups.iter().enumerate() {
        let sub = genotypes.select_cols(&group.columns);
        let score = collapse::collapse(method, &sub, phenotype)?;
        out.set_col(j, &score.col(0));
    }
    Ok(out)
}

/// Convert PLINK-style 1/2 (control/case) coding to 0/1.
///
/// Values are returned unchanged unless every non-missing value is 1 or 2.
fn to_case_control(values: &[f64]) -> Vec<f64> {
    let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    let plink_coded = present.iter().all(|&v| v == 1.0 || v == 2.0);
    if plink_coded && present.contains(&2.0) {
        info!("Phenotype coded 1/2, converting to 0/1");
        values.iter().map(|v| v - 1.0).collect()
    } else {
        values.to_vec()
    }
}

fn write_collapsed(
    writer: &mut impl Write,
    sample_ids: &[String],
    names: &[&str],
    scores: &DenseMatrix,
) -> Result<()> {
    writeln!(writer, "IID\t{}", names.join("\t"))?;
    for (i, id) in sample_ids.iter().enumerate() {
        write!(writer, "{}", id)?;
        for j in 0..scores.ncols() {
            write!(writer, "\t{}", scores.get(i, j))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
