//! Property-based tests using proptest.
//!
//! These tests check invariants that hold for every input rather than
//! specific values:
//!   - frequency estimates stay in range, including all-missing markers
//!   - collapsed scores have the shape and domain each method promises
//!   - summaries are ordered and do not depend on input order

use proptest::prelude::*;
use rand::{Rng, SeedableRng};

use rvtest_core::collapse::{
    cmc_collapse, cmc_collapse_groups, collapse, fp_collapse, group_by_frequency,
    madsen_browning_collapse, marker_frequencies, marker_frequency,
    marker_frequency_from_controls, zeggini_collapse, CollapseMethod,
};
use rvtest_core::summary::Summary;
use rvtest_linalg::DenseMatrix;

/// Random diploid genotypes with roughly 10% missing calls and a skew
/// towards the reference allele, as rare-variant data would have.
fn random_genotypes(n: usize, m: usize, seed: u64) -> DenseMatrix {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
    let mut g = DenseMatrix::zeros(n, m);
    for i in 0..n {
        for j in 0..m {
            let u: f64 = rng.gen();
            let value = if u < 0.1 {
                -9.0
            } else if u < 0.8 {
                0.0
            } else if u < 0.95 {
                1.0
            } else {
                2.0
            };
            g.set(i, j, value);
        }
    }
    g
}

fn random_phenotype(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    (0..n).map(|_| if rng.gen::<bool>() { 1.0 } else { 0.0 }).collect()
}

// ---------------------------------------------------------------------------
// 1. Allele frequency estimators
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_frequency_in_unit_interval(
        n in 1usize..40,
        m in 1usize..10,
        seed in 0u64..1000,
    ) {
        let g = random_genotypes(n, m, seed);
        for f in marker_frequencies(&g) {
            prop_assert!((0.0..=1.0).contains(&f), "frequency out of range: {}", f);
        }
    }

    #[test]
    fn prop_control_frequency_strictly_inside(
        n in 1usize..40,
        m in 1usize..10,
        seed in 0u64..1000,
    ) {
        let g = random_genotypes(n, m, seed);
        let y = random_phenotype(n, seed);
        for j in 0..m {
            let f = marker_frequency_from_controls(&g, &y, j);
            prop_assert!(f > 0.0 && f < 1.0, "control frequency {} not in (0, 1)", f);
        }
    }

    #[test]
    fn prop_all_missing_marker_has_zero_frequency(n in 1usize..30) {
        let mut g = DenseMatrix::zeros(n, 1);
        for i in 0..n {
            g.set(i, 0, -9.0);
        }
        prop_assert_eq!(marker_frequency(&g, 0), 0.0);
    }

    #[test]
    fn prop_frequency_groups_partition_markers(
        freqs in prop::collection::vec(prop::sample::select(vec![0.0, 0.05, 0.1, 0.25]), 0..20),
    ) {
        let groups = group_by_frequency(&freqs);
        let mut seen: Vec<usize> = groups.iter().flat_map(|g| g.markers.clone()).collect();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..freqs.len()).collect::<Vec<_>>());

        for w in groups.windows(2) {
            prop_assert!(w[0].frequency < w[1].frequency);
        }
        for g in &groups {
            prop_assert!(g.markers.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(g.markers.iter().all(|&i| freqs[i] == g.frequency));
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Collapsing
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_cmc_is_binary(
        n in 1usize..40,
        m in 1usize..10,
        seed in 0u64..1000,
    ) {
        let g = random_genotypes(n, m, seed);
        let out = cmc_collapse(&g);
        prop_assert_eq!(out.nrows(), n);
        prop_assert_eq!(out.ncols(), 1);
        for v in out.col(0) {
            prop_assert!(v == 0.0 || v == 1.0);
        }
    }

    #[test]
    fn prop_zeggini_counts_carried_markers(
        n in 1usize..40,
        m in 1usize..10,
        seed in 0u64..1000,
    ) {
        let g = random_genotypes(n, m, seed);
        let mz = zeggini_collapse(&g);
        let cmc = cmc_collapse(&g);
        for i in 0..n {
            let carried = g.row(i).iter().filter(|&&x| x >= 1.0).count() as f64;
            prop_assert_eq!(mz.get(i, 0), carried);
            prop_assert_eq!(cmc.get(i, 0), if carried > 0.0 { 1.0 } else { 0.0 });
        }
    }

    #[test]
    fn prop_cmc_groups_match_single_group(
        n in 1usize..30,
        seed in 0u64..1000,
    ) {
        let g = random_genotypes(n, 6, seed);
        let groups = vec![vec![0, 1], vec![2, 3, 4], vec![5]];
        let out = cmc_collapse_groups(&g, &groups);
        for (j, index) in groups.iter().enumerate() {
            let single = cmc_collapse(&g.select_cols(index));
            prop_assert_eq!(out.col(j), single.col(0));
        }
    }

    #[test]
    fn prop_weighted_scores_non_negative(
        n in 1usize..40,
        m in 1usize..10,
        seed in 0u64..1000,
    ) {
        let g = random_genotypes(n, m, seed);
        let y = random_phenotype(n, seed);
        let mb = madsen_browning_collapse(&g, &y);
        let fp = fp_collapse(&g);
        for i in 0..n {
            prop_assert!(mb.get(i, 0) >= 0.0 && mb.get(i, 0).is_finite());
            prop_assert!(fp.get(i, 0) >= 0.0 && fp.get(i, 0).is_finite());
        }
    }

    #[test]
    fn prop_monomorphic_markers_contribute_nothing(
        n in 1usize..40,
        seed in 0u64..1000,
    ) {
        // column 0 all reference, column 1 all missing
        let mut g = random_genotypes(n, 3, seed);
        for i in 0..n {
            g.set(i, 0, 0.0);
            g.set(i, 1, -9.0);
        }
        let full = fp_collapse(&g);
        let only_last = fp_collapse(&g.select_cols(&[2]));
        for i in 0..n {
            prop_assert!((full.get(i, 0) - only_last.get(i, 0)).abs() < 1e-12);
        }
    }

    #[test]
    fn prop_dispatch_matches_direct_call(
        n in 1usize..30,
        m in 1usize..8,
        seed in 0u64..1000,
    ) {
        let g = random_genotypes(n, m, seed);
        let y = random_phenotype(n, seed);
        prop_assert_eq!(
            collapse(CollapseMethod::Zeggini, &g, None).unwrap().col(0),
            zeggini_collapse(&g).col(0)
        );
        prop_assert_eq!(
            collapse(CollapseMethod::MadsenBrowning, &g, Some(&y)).unwrap().col(0),
            madsen_browning_collapse(&g, &y).col(0)
        );
    }
}

// ---------------------------------------------------------------------------
// 3. Summaries
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_summary_is_ordered(
        values in prop::collection::vec(-1e6f64..1e6, 1..50),
    ) {
        let s = Summary::from_observations(&values);
        prop_assert_eq!(s.n, values.len());
        prop_assert!(s.min <= s.q1);
        prop_assert!(s.q1 <= s.median);
        prop_assert!(s.median <= s.q3);
        prop_assert!(s.q3 <= s.max);
        prop_assert!(s.sd >= 0.0);
        // mean may exceed the extremes only by rounding
        let tol = 1e-9 * (s.max.abs() + s.min.abs() + 1.0);
        prop_assert!(s.mean >= s.min - tol && s.mean <= s.max + tol);
    }

    #[test]
    fn prop_summary_add_replaces_state(
        first in prop::collection::vec(-100f64..100.0, 1..20),
        second in prop::collection::vec(-100f64..100.0, 1..20),
    ) {
        let mut s = Summary::from_observations(&first);
        s.add(&second);
        prop_assert_eq!(s, Summary::from_observations(&second));
    }

    #[test]
    fn prop_quantiles_ignore_input_order(
        values in prop::collection::vec(-100f64..100.0, 1..30),
    ) {
        let mut reversed = values.clone();
        reversed.reverse();
        let a = Summary::from_observations(&values);
        let b = Summary::from_observations(&reversed);
        prop_assert_eq!(a.min, b.min);
        prop_assert_eq!(a.q1, b.q1);
        prop_assert_eq!(a.median, b.median);
        prop_assert_eq!(a.q3, b.q3);
        prop_assert_eq!(a.max, b.max);
        prop_assert!((a.mean - b.mean).abs() < 1e-9);
    }
}
