//! Allele frequency estimators used to weight markers.
//!
//! Genotypes are diploid dosages; any negative value marks a missing
//! call and is left out of both the allele count and the allele number.
//!
//! Reference: Madsen BE, Browning SR (2009). A groupwise association test
//! for rare mutations using a weighted sum statistic. PLoS Genet 5(2).

use rvtest_linalg::DenseMatrix;

/// Alternate allele frequency at `marker` over all samples.
///
/// Returns 0 when every sample is missing.
pub fn marker_frequency(genotypes: &DenseMatrix, marker: usize) -> f64 {
    let mut ac = 0.0; // dosages may be imputed, so not integral
    let mut an = 0usize;
    for p in 0..genotypes.nrows() {
        let g = genotypes.get(p, marker);
        if g >= 0.0 {
            ac += g;
            an += 2;
        }
    }
    if an == 0 {
        return 0.0;
    }
    ac / an as f64
}

/// Alternate allele frequency at `marker` estimated from controls only.
///
/// Samples whose phenotype is exactly 1 are cases and are skipped.
/// Uses `(ac + 1) / (an + 2)`, which stays strictly inside (0, 1).
pub fn marker_frequency_from_controls(
    genotypes: &DenseMatrix,
    phenotype: &[f64],
    marker: usize,
) -> f64 {
    assert_eq!(
        phenotype.len(),
        genotypes.nrows(),
        "phenotype length must match sample count"
    );
    let mut ac = 0.0;
    let mut an = 0usize;
    for (p, &y) in phenotype.iter().enumerate() {
        if y == 1.0 {
            continue;
        }
        let g = genotypes.get(p, marker);
        if g >= 0.0 {
            ac += g;
            an += 2;
        }
    }
    (ac + 1.0) / (an as f64 + 2.0)
}

/// `marker_frequency` for every column.
pub fn marker_frequencies(genotypes: &DenseMatrix) -> Vec<f64> {
    (0..genotypes.ncols())
        .map(|m| marker_frequency(genotypes, m))
        .collect()
}

/// Markers sharing one exact frequency value.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyGroup {
    pub frequency: f64,
    /// Marker indices, ascending.
    pub markers: Vec<usize>,
}

/// Group marker indices by exactly equal frequency.
///
/// Groups come back in ascending frequency order.
/// e.g. `[0.1, 0.2, 0.1, 0.3]` gives `0.1 -> [0, 2]`, `0.2 -> [1]`, `0.3 -> [3]`.
pub fn group_by_frequency(freqs: &[f64]) -> Vec<FrequencyGroup> {
    let mut order: Vec<usize> = (0..freqs.len()).collect();
    // Stable sort keeps indices ascending within a tie.
    order.sort_by(|&a, &b| freqs[a].total_cmp(&freqs[b]));

    let mut groups: Vec<FrequencyGroup> = Vec::new();
    for idx in order {
        let f = freqs[idx];
        match groups.last_mut() {
            Some(g) if g.frequency.total_cmp(&f).is_eq() => g.markers.push(idx),
            _ => groups.push(FrequencyGroup {
                frequency: f,
                markers: vec![idx],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[f64]]) -> DenseMatrix {
        DenseMatrix::from_rows(&rows.iter().map(|r| r.to_vec()).collect::<Vec<_>>()).unwrap()
    }

    #[test]
    fn test_frequency_skips_missing() {
        let g = matrix(&[&[0.0], &[1.0], &[-9.0], &[2.0]]);
        // ac = 3, an = 6
        assert!((marker_frequency(&g, 0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_frequency_all_missing() {
        let g = matrix(&[&[-9.0], &[-1.0]]);
        assert_eq!(marker_frequency(&g, 0), 0.0);
    }

    #[test]
    fn test_frequency_imputed_dosage() {
        let g = matrix(&[&[0.3], &[0.0]]);
        assert!((marker_frequency(&g, 0) - 0.075).abs() < 1e-12);
    }

    #[test]
    fn test_control_frequency_excludes_cases() {
        let g = matrix(&[&[2.0], &[1.0], &[0.0], &[-9.0]]);
        let y = [1.0, 0.0, 0.0, 0.0];
        // controls with calls: samples 1, 2 -> ac = 1, an = 4
        let f = marker_frequency_from_controls(&g, &y, 0);
        assert!((f - 2.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_control_frequency_no_informative_controls() {
        let g = matrix(&[&[2.0], &[-9.0]]);
        let y = [1.0, 0.0];
        assert!((marker_frequency_from_controls(&g, &y, 0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_marker_frequencies() {
        let g = matrix(&[&[0.0, 2.0], &[1.0, 2.0]]);
        assert_eq!(marker_frequencies(&g), vec![0.25, 1.0]);
    }

    #[test]
    fn test_group_by_frequency() {
        let groups = group_by_frequency(&[0.1, 0.2, 0.1, 0.3]);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].frequency, 0.1);
        assert_eq!(groups[0].markers, vec![0, 2]);
        assert_eq!(groups[1].markers, vec![1]);
        assert_eq!(groups[2].markers, vec![3]);
    }

    #[test]
    fn test_group_by_frequency_empty() {
        assert!(group_by_frequency(&[]).is_empty());
    }
}
