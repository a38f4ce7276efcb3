//! Property tests for the PDM building blocks.
//!
//! Purpose
//! -------
//! - Check structural invariants over randomized inputs: grid shape,
//!   phase range and periodicity, bin-index range for every cover
//!   (including the wraparound cover), θ bounds, and sweep determinism.
//!
//! Exclusions
//! ----------
//! - Statistical power and signal recovery; see
//!   `tests/integration_pdm_pipeline.rs`.
use proptest::prelude::*;
use rust_phasedm::pdm::{
    CoverEdges, FrequencyGrid, PdmEngine, PdmOptions, fold::phase_of, make_grid,
};

fn circular_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).abs();
    d.min(1.0 - d)
}

proptest! {
    #[test]
    fn linear_grid_has_requested_shape(
        min_freq in 0.01f64..10.0, span in 0.01f64..50.0, n in 1usize..500,
    ) {
        let max_freq = min_freq + span;
        let grid = make_grid(min_freq, max_freq, n).unwrap();

        prop_assert_eq!(grid.len(), n);
        prop_assert_eq!(grid[0], min_freq);
        if n > 1 {
            prop_assert_eq!(grid[n - 1], max_freq);
        }
        for w in grid.windows(2) {
            prop_assert!(w[1] > w[0], "grid not ascending: {} then {}", w[0], w[1]);
        }
    }

    #[test]
    fn phase_is_in_unit_interval_and_periodic(
        t in -1.0e4f64..1.0e4, period in 1.0e-3f64..1.0e3, k in -5i32..5,
    ) {
        let phase = phase_of(t, period, 0.0);
        let shifted = phase_of(t + k as f64 * period, period, 0.0);

        prop_assert!((0.0..1.0).contains(&phase), "phase = {}", phase);
        prop_assert!((0.0..1.0).contains(&shifted), "shifted = {}", shifted);
        prop_assert!(circular_distance(phase, shifted) < 1e-6, "{} vs {}", phase, shifted);
    }

    #[test]
    fn every_cover_assigns_every_phase_in_range(
        n_bins in 1usize..50,
        n_covers in 1usize..6,
        phases in proptest::collection::vec(0.0f64..1.0, 1..200),
    ) {
        for c in 0..n_covers {
            let cover = CoverEdges::new(n_bins, c, n_covers).unwrap();
            let edges = cover.edges();

            prop_assert_eq!(edges.len(), n_bins + 1);
            for w in edges.windows(2) {
                prop_assert!(w[1] >= w[0], "edges not sorted: {:?}", edges);
            }
            if cover.is_wraparound() {
                prop_assert_eq!(edges[n_bins], 1.0);
            }
            for &p in &phases {
                let b = cover.bin_of(p);
                prop_assert!(b < n_bins, "phase {} -> bin {} (n_bins {})", p, b, n_bins);
            }
        }
    }

    #[test]
    fn theta_is_non_negative_and_sweeps_are_deterministic(
        samples in proptest::collection::vec((0.0f64..100.0, -10.0f64..10.0), 5..120),
        n_bins in 2usize..16,
        n_covers in 1usize..4,
    ) {
        let (times, values): (Vec<f64>, Vec<f64>) = samples.into_iter().unzip();
        prop_assume!(values.iter().any(|&v| v != values[0]));

        let options = PdmOptions::new(n_bins, n_covers).unwrap();
        let engine = PdmEngine::new(&times, &values, options).unwrap();
        let grid = FrequencyGrid::linear(0.05, 3.0, 64).unwrap();

        let first = engine.run(&grid).unwrap();
        let second = engine.run(&grid).unwrap();

        prop_assert_eq!(first.len(), 64);
        for (a, b) in first.thetas().iter().zip(second.thetas()) {
            prop_assert!(a.is_finite() && *a >= 0.0, "theta = {}", a);
            prop_assert_eq!(a.to_bits(), b.to_bits());
        }
    }
}
