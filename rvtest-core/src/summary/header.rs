//! `##` header block written at the top of association reports.
//!
//! Layout:
//! ```text
//! ##Samples=3
//! ##AnalyzedSamples=3
//! ##Families=3
//! ##AnalyzedFamilies=3
//! ##Founders=3
//! ##AnalyzedFounders=3
//! ##InverseNormal=OFF
//! ##TraitSummary	min	25th	median	75th	max	mean	variance
//! ##y	0	0	1	1	1	0.666667	0.333333
//! ##Covariates=age,sex
//! ##CovariateSummary	min	25th	median	75th	max	mean	variance
//! ##age	45	45	50	55	55	50	25
//! ##sex	1	1	2	2	2	1.66667	0.333333
//! ```
//! Samples are unrelated, so family and founder counts equal the sample
//! count. The covariate lines are omitted when no covariate was recorded.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use rvtest_linalg::LabeledMatrix;

use super::descriptive::Summary;
use crate::util::format::format_g;

const SUMMARY_COLUMNS: &str = "min\t25th\tmedian\t75th\tmax\tmean\tvariance";

/// Summaries collected over one analysis run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SummaryHeader {
    phenotypes: Vec<LabeledSummary>,
    inverse_normal: bool,
    covariates: Vec<LabeledSummary>,
}

#[derive(Debug, Clone, Serialize)]
struct LabeledSummary {
    label: String,
    #[serde(flatten)]
    summary: Summary,
}

impl SummaryHeader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the distribution of a phenotype.
    pub fn record_phenotype(&mut self, label: &str, values: &[f64]) {
        self.phenotypes.push(LabeledSummary {
            label: label.to_string(),
            summary: Summary::from_observations(values),
        });
    }

    pub fn set_inverse_normal(&mut self, applied: bool) {
        self.inverse_normal = applied;
    }

    /// Record one covariate column.
    pub fn record_covariate_column(&mut self, label: &str, values: &[f64]) {
        self.covariates.push(LabeledSummary {
            label: label.to_string(),
            summary: Summary::from_observations(values),
        });
    }

    /// Replace all recorded covariates with one summary per column of `covariates`.
    pub fn record_covariates(&mut self, covariates: &LabeledMatrix) {
        self.covariates.clear();
        for j in 0..covariates.ncols() {
            let values = covariates.column(j);
            self.record_covariate_column(covariates.column_label(j), &values);
        }
    }

    /// Sample count reported in the header: n of the first phenotype.
    pub fn n_samples(&self) -> usize {
        self.phenotypes.first().map_or(0, |p| p.summary.n)
    }

    pub fn phenotype_summaries(&self) -> impl Iterator<Item = (&str, &Summary)> {
        self.phenotypes.iter().map(|p| (p.label.as_str(), &p.summary))
    }

    pub fn covariate_summaries(&self) -> impl Iterator<Item = (&str, &Summary)> {
        self.covariates.iter().map(|c| (c.label.as_str(), &c.summary))
    }

    /// Write the header block.
    pub fn write_header(&self, writer: &mut impl Write) -> Result<()> {
        let n = self.n_samples();
        writeln!(writer, "##Samples={}", n)?;
        writeln!(writer, "##AnalyzedSamples={}", n)?;
        writeln!(writer, "##Families={}", n)?;
        writeln!(writer, "##AnalyzedFamilies={}", n)?;
        writeln!(writer, "##Founders={}", n)?;
        writeln!(writer, "##AnalyzedFounders={}", n)?;
        writeln!(
            writer,
            "##InverseNormal={}",
            if self.inverse_normal { "ON" } else { "OFF" }
        )?;

        writeln!(writer, "##TraitSummary\t{}", SUMMARY_COLUMNS)?;
        for p in &self.phenotypes {
            write_summary_row(writer, p)?;
        }

        if self.covariates.is_empty() {
            return Ok(());
        }

        let labels: Vec<&str> = self.covariates.iter().map(|c| c.label.as_str()).collect();
        writeln!(writer, "##Covariates={}", labels.join(","))?;

        writeln!(writer, "##CovariateSummary\t{}", SUMMARY_COLUMNS)?;
        for c in &self.covariates {
            write_summary_row(writer, c)?;
        }
        Ok(())
    }

    /// Same content as the header block, as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn write_summary_row(writer: &mut impl Write, row: &LabeledSummary) -> Result<()> {
    let s = &row.summary;
    writeln!(
        writer,
        "##{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        row.label,
        format_g(s.min),
        format_g(s.q1),
        format_g(s.median),
        format_g(s.q3),
        format_g(s.max),
        format_g(s.mean),
        format_g(s.variance()),
    )?;
    Ok(())
}
