//! Matching sample IDs between genotype and phenotype files.

use std::collections::HashMap;

/// Samples present in both sources.
#[derive(Debug, Clone, Default)]
pub struct SampleMatch {
    /// Shared sample IDs, in genotype-file order.
    pub ids: Vec<String>,
    /// Row of each shared sample in the genotype source.
    pub genotype_indices: Vec<usize>,
    /// Row of each shared sample in the phenotype source.
    pub phenotype_indices: Vec<usize>,
}

impl SampleMatch {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Match genotype sample IDs against phenotype sample IDs.
///
/// Order follows the genotype source. If an ID appears more than once in
/// the phenotype source, its first occurrence is used.
pub fn match_samples(genotype_ids: &[String], phenotype_ids: &[String]) -> SampleMatch {
    let mut lookup: HashMap<&str, usize> = HashMap::with_capacity(phenotype_ids.len());
    for (i, id) in phenotype_ids.iter().enumerate() {
        lookup.entry(id.as_str()).or_insert(i);
    }

    let mut result = SampleMatch::default();
    for (gi, id) in genotype_ids.iter().enumerate() {
        if let Some(&pi) = lookup.get(id.as_str()) {
            result.ids.push(id.clone());
            result.genotype_indices.push(gi);
            result.phenotype_indices.push(pi);
        }
    }
    result
}

/// Pick `data[i]` for each index, in order.
pub fn reorder_f64(data: &[f64], indices: &[usize]) -> Vec<f64> {
    indices.iter().map(|&i| data[i]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_match_follows_genotype_order() {
        let geno = ids(&["A", "B", "C", "D"]);
        let pheno = ids(&["C", "A", "E"]);
        let m = match_samples(&geno, &pheno);
        assert_eq!(m.ids, vec!["A", "C"]);
        assert_eq!(m.genotype_indices, vec![0, 2]);
        assert_eq!(m.phenotype_indices, vec![1, 0]);
    }

    #[test]
    fn test_duplicate_phenotype_ids_use_first() {
        let m = match_samples(&ids(&["A"]), &ids(&["A", "A"]));
        assert_eq!(m.phenotype_indices, vec![0]);
    }

    #[test]
    fn test_no_overlap() {
        let m = match_samples(&ids(&["A", "B"]), &ids(&["C"]));
        assert!(m.is_empty());
    }

    #[test]
    fn test_reorder() {
        assert_eq!(reorder_f64(&[10.0, 20.0, 30.0], &[2, 0]), vec![30.0, 10.0]);
    }
}
