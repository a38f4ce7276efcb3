//! pdm — Phase Dispersion Minimisation period search.
//!
//! Purpose
//! -------
//! Find periodicities in unevenly sampled series by folding the samples at
//! many trial periods and measuring how much of the scatter each fold
//! removes. The statistic θ is the pooled within-bin variance divided by
//! the overall variance; the best trial period minimises θ.
//!
//! Key behaviors
//! -------------
//! - Build trial grids in [`grid`]: evenly spaced in frequency
//!   ([`FrequencyGrid::linear`]) or explicit lists of frequencies/periods.
//! - Fold timestamps onto phase in [`fold`] and assign phases to bins in
//!   [`cover`], where `n_covers` staggered binnings per trial reduce
//!   sensitivity to where bin edges fall. The last shifted cover wraps
//!   around phase 0 and is repaired so every phase lands in a valid bin.
//! - Pool per-bin variance across covers in [`variance`] and turn it into θ
//!   in [`theta`].
//! - Orchestrate sweeps in [`engine`]: [`PdmEngine`] validates a dataset
//!   once and evaluates every trial, in parallel with the `parallel`
//!   feature, returning a [`Periodogram`] in grid order.
//! - Assess a θ value in [`significance`] with the F-test chance
//!   probability or the beta-distribution false-alarm model.
//! - Centralize failures in [`errors`] (`PDMError`, `PDMResult`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Series are aligned, finite, and hold at least 2 samples with nonzero
//!   variance ([`validation::validate_series`] plus
//!   [`theta::overall_variance`]).
//! - Phases lie in `[0, 1)`; bin indices lie in `[0, n_bins)`.
//! - θ ≥ 0; θ ≈ 1 means no dispersion reduction. θ > 1 is possible and is
//!   reported, not rejected.
//!
//! Conventions
//! -----------
//! - Frequencies are cycles per time unit of the input timestamps; periods
//!   are `1 / frequency`.
//! - Bins are right-open `[e_j, e_{j+1})`.
//! - The library never installs a `tracing` subscriber; sweep diagnostics
//!   are emitted as events for the caller to collect.
//!
//! Downstream usage
//! ----------------
//! - Rust callers typically need [`PdmEngine`], [`FrequencyGrid`],
//!   [`PdmOptions`], and [`significance()`]; `use
//!   rust_phasedm::pdm::prelude::*` imports them in one line.
//! - The Python bindings in the crate root wrap the same surface.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its own contract. End-to-end
//!   sweeps and property tests live under `tests/`.

pub mod cover;
pub mod engine;
pub mod errors;
pub mod fold;
pub mod grid;
pub mod options;
pub mod significance;
pub mod theta;
pub mod validation;
pub mod variance;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::cover::{CoverEdges, EDGE_WRAP_TOL, assign};
pub use self::engine::{BestTrial, CancelToken, PdmEngine, Periodogram, compute_pdm};
pub use self::errors::{ErrorKind, PDMError, PDMResult};
pub use self::fold::{fold, phase_of};
pub use self::grid::{FrequencyGrid, make_grid, make_grid_from};
pub use self::options::{DEFAULT_N_BINS, DEFAULT_N_COVERS, PdmOptions};
pub use self::significance::{FTestOutcome, beta_false_alarm, significance, theta_threshold};
pub use self::theta::{overall_variance, theta};
pub use self::variance::{PooledVariance, VarianceAggregator, accumulate};

// ---- Optional convenience prelude for downstream crates -------------------
//
//     use rust_phasedm::pdm::prelude::*;

pub mod prelude {
    pub use super::{
        BestTrial, CancelToken, FrequencyGrid, PDMError, PDMResult, PdmEngine, PdmOptions,
        Periodogram, compute_pdm, significance, theta_threshold,
    };
}
