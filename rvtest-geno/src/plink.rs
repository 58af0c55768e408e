//! PLINK bed/bim/fam reader using memory-mapped files.
//!
//! - .bed: 2-bit packed genotypes, SNP-major
//! - .bim: variant information (chrom, id, cm, pos, a1, a2)
//! - .fam: sample information (fid, iid, father, mother, sex, pheno)
//!
//! Dosages count copies of allele 1, the usual minor/alternate allele.
//!
//! Reference: https://www.cog-genomics.org/plink/1.9/formats#bed

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use memmap2::Mmap;
use tracing::debug;

use rvtest_linalg::DenseMatrix;

use crate::traits::{GenotypeSource, MISSING_GENOTYPE};

const BED_MAGIC: [u8; 2] = [0x6C, 0x1B];
const SNP_MAJOR: u8 = 0x01;

/// PLINK BIM file entry (one per variant).
#[derive(Debug, Clone)]
pub struct BimEntry {
    pub chrom: String,
    pub id: String,
    pub pos: u64,
    pub allele1: String,
    pub allele2: String,
}

/// Reader for PLINK bed/bim/fam files.
pub struct PlinkReader {
    mmap: Mmap,
    bim: Vec<BimEntry>,
    marker_lookup: HashMap<String, usize>,
    sample_ids: Vec<String>,
    bytes_per_marker: usize,
}

impl PlinkReader {
    /// Open `<prefix>.bed`, `<prefix>.bim` and `<prefix>.fam`.
    pub fn new<P: AsRef<Path>>(prefix: P) -> Result<Self> {
        let base = prefix.as_ref();
        let bed_path = fileset_path(base, "bed");

        let sample_ids = parse_fam(&fileset_path(base, "fam"))?;
        let bim = parse_bim(&fileset_path(base, "bim"))?;

        let bed_file = std::fs::File::open(&bed_path)
            .with_context(|| format!("Failed to open bed file: {}", bed_path.display()))?;
        let mmap = unsafe { Mmap::map(&bed_file)? };

        if mmap.len() < 3 || mmap[..2] != BED_MAGIC {
            bail!("Invalid PLINK bed file magic number: {}", bed_path.display());
        }
        if mmap[2] != SNP_MAJOR {
            bail!("Only SNP-major bed files are supported (mode byte = 0x01)");
        }

        let bytes_per_marker = sample_ids.len().div_ceil(4);
        let expected_size = 3 + bytes_per_marker * bim.len();
        if mmap.len() < expected_size {
            bail!(
                "Bed file too small: expected at least {} bytes, got {}",
                expected_size,
                mmap.len()
            );
        }

        let mut marker_lookup = HashMap::with_capacity(bim.len());
        for (i, b) in bim.iter().enumerate() {
            // first occurrence wins for duplicated IDs
            marker_lookup.entry(b.id.clone()).or_insert(i);
        }

        debug!(
            "Opened PLINK fileset {}: {} samples, {} markers",
            base.display(),
            sample_ids.len(),
            bim.len()
        );

        Ok(Self {
            mmap,
            bim,
            marker_lookup,
            sample_ids,
            bytes_per_marker,
        })
    }

    /// Decode the genotype of one sample from a packed byte.
    #[inline]
    fn decode_genotype(byte: u8, offset: usize) -> f64 {
        match (byte >> (offset * 2)) & 0x03 {
            0b00 => 2.0,
            0b01 => MISSING_GENOTYPE,
            0b10 => 1.0,
            _ => 0.0,
        }
    }

    #[inline]
    fn genotype(&self, marker: usize, sample: usize) -> f64 {
        let byte = self.mmap[3 + marker * self.bytes_per_marker + sample / 4];
        Self::decode_genotype(byte, sample % 4)
    }
}

impl GenotypeSource for PlinkReader {
    fn n_markers(&self) -> usize {
        self.bim.len()
    }

    fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    fn marker_index(&self, id: &str) -> Option<usize> {
        self.marker_lookup.get(id).copied()
    }

    fn read_genotypes(&self, markers: &[usize], samples: &[usize]) -> Result<DenseMatrix> {
        if let Some(&m) = markers.iter().find(|&&m| m >= self.bim.len()) {
            bail!("Marker index {} out of range ({})", m, self.bim.len());
        }
        if let Some(&s) = samples.iter().find(|&&s| s >= self.sample_ids.len()) {
            bail!("Sample index {} out of range ({})", s, self.sample_ids.len());
        }

        let mut out = DenseMatrix::zeros(samples.len(), markers.len());
        for (j, &m) in markers.iter().enumerate() {
            for (i, &s) in samples.iter().enumerate() {
                out.set(i, j, self.genotype(m, s));
            }
        }
        Ok(out)
    }
}

/// `<prefix>.<ext>`. Dots already in the prefix (`chr1.qc`) are kept.
fn fileset_path(prefix: &Path, ext: &str) -> PathBuf {
    let mut path = prefix.as_os_str().to_owned();
    path.push(".");
    path.push(ext);
    PathBuf::from(path)
}

/// Parse a .fam file, returning the IID of every sample.
fn parse_fam(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fam file: {}", path.display()))?;
    let mut ids = Vec::new();
    for (line_num, line) in contents.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() < 6 {
            bail!("Fam file line {} has fewer than 6 fields", line_num + 1);
        }
        ids.push(fields[1].to_string());
    }
    Ok(ids)
}

/// Parse a .bim file.
fn parse_bim(path: &Path) -> Result<Vec<BimEntry>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read bim file: {}", path.display()))?;
    let mut entries = Vec::new();
    for (line_num, line) in contents.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() < 6 {
            bail!("Bim file line {} has fewer than 6 fields", line_num + 1);
        }
        entries.push(BimEntry {
            chrom: fields[0].to_string(),
            id: fields[1].to_string(),
            pos: fields[3]
                .parse()
                .with_context(|| format!("Bad position on bim line {}", line_num + 1))?,
            allele1: fields[4].to_string(),
            allele2: fields[5].to_string(),
        });
    }
    Ok(entries)
}
