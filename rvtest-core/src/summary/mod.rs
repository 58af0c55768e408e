//! Phenotype and covariate summaries for report headers.

pub mod descriptive;
pub mod header;

pub use descriptive::Summary;
pub use header::SummaryHeader;
