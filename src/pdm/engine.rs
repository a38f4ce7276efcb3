//! pdm::engine — orchestration of a PDM sweep over a trial grid.
//!
//! Purpose
//! -------
//! Drive the fold → bin → pool → theta pipeline for every trial frequency of
//! a [`FrequencyGrid`] and return one theta per trial in grid order, along
//! with helpers for picking the best trial and testing its significance.
//!
//! Key behaviors
//! -------------
//! - [`PdmEngine::new`] validates the series and options once and computes
//!   the overall variance once per dataset.
//! - [`PdmEngine::run`] / [`PdmEngine::run_with_cancel`] evaluate every trial.
//!   With the `parallel` feature (default) trials run on the rayon pool; each
//!   worker owns its scratch buffers and results are collected by index, so
//!   the output order always matches the grid.
//! - [`CancelToken`] is checked before each trial; a cancelled sweep returns
//!   [`PDMError::Cancelled`] and never a partial result.
//! - [`Periodogram`] holds `(frequency, theta)` pairs and exposes
//!   [`Periodogram::best`] (argmin, ties to the first grid position) and
//!   [`Periodogram::out_of_range`] (trials with θ > 1).
//!
//! Invariants & assumptions
//! ------------------------
//! - Shared state across trials is read-only: samples, overall variance, and
//!   the per-cover bin edges (which do not depend on the trial period).
//! - Any per-trial failure aborts the whole sweep; gaps would break the
//!   alignment between frequencies and thetas. A validated grid never holds
//!   an invalid period, so such a failure indicates a programming error and
//!   is reported as [`PDMError::InvalidPeriod`] with the grid index.
//! - θ > 1 is possible (pooled variance above the overall variance) and is
//!   flagged, not treated as an error.
//!
//! Conventions
//! -----------
//! - Phases are folded with zero offset; covers shift bin edges.
//! - Sweep progress is reported through `tracing` (`debug!` on start,
//!   `info!` on completion with elapsed time, `warn!` on cancellation or
//!   θ > 1). No subscriber is installed by the library.
//!
//! Downstream usage
//! ----------------
//! ```rust
//! use rust_phasedm::pdm::{FrequencyGrid, PdmEngine, PdmOptions};
//!
//! let times: Vec<f64> = (0..400).map(|i| i as f64 * 0.037).collect();
//! let values: Vec<f64> =
//!     times.iter().map(|t| (2.0 * std::f64::consts::PI * t / 1.3).sin()).collect();
//!
//! let engine = PdmEngine::new(&times, &values, PdmOptions::default())?;
//! let grid = FrequencyGrid::linear(0.2, 2.0, 500)?;
//! let periodogram = engine.run(&grid)?;
//! let best = periodogram.best().expect("non-empty grid");
//! assert!((best.period - 1.3).abs() < 0.05);
//! # Ok::<(), rust_phasedm::pdm::PDMError>(())
//! ```
//!
//! Testing notes
//! -------------
//! - Unit tests cover hand-checkable sweeps, ordering, idempotence,
//!   cancellation, and error propagation. Signal-recovery scenarios live in
//!   `tests/integration_pdm_pipeline.rs`.
use std::{
    borrow::Cow,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Instant,
};

use ndarray::{Array1, ArrayView1};
use tracing::{debug, info, warn};

use crate::pdm::{
    cover::CoverEdges,
    errors::{PDMError, PDMResult},
    fold::fold_into,
    grid::FrequencyGrid,
    options::PdmOptions,
    significance::significance,
    theta::{overall_variance, theta_unchecked},
    validation::validate_series,
    variance::{PooledVariance, VarianceAggregator},
};

/// Cooperative cancellation flag shared between a sweep and its caller.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// PdmEngine — validated dataset ready for period sweeps.
///
/// Fields
/// ------
/// - `times`, `values`: `Cow<'a, [f64]>`
///   Aligned, finite samples; borrowed when the caller's storage is
///   contiguous.
/// - `options`: [`PdmOptions`]
///   Bin and cover counts.
/// - `overall_variance`: `f64`
///   Unbiased variance of `values`; strictly positive.
/// - `covers`: `Vec<CoverEdges>`
///   Bin edges of each cover, built once.
///
/// Invariants
/// ----------
/// - `times.len() == values.len() ≥ 2`, all entries finite.
/// - `overall_variance > 0`.
/// - `covers.len() == options.n_covers`.
///
/// Performance
/// -----------
/// - Each trial costs O(n_covers · n · log n_bins) with no allocation once
///   a worker's scratch buffers are warm.
#[derive(Debug, Clone)]
pub struct PdmEngine<'a> {
    times: Cow<'a, [f64]>,
    values: Cow<'a, [f64]>,
    options: PdmOptions,
    overall_variance: f64,
    covers: Vec<CoverEdges>,
}

impl<'a> PdmEngine<'a> {
    /// Validate a dataset and prepare it for sweeps.
    ///
    /// Parameters
    /// ----------
    /// - `times`: `&'a [f64]`
    ///   Timestamps; any order, duplicates allowed, all finite.
    /// - `values`: `&'a [f64]`
    ///   Measurements aligned with `times`; all finite, not constant.
    /// - `options`: [`PdmOptions`]
    ///   Bin and cover counts.
    ///
    /// Returns
    /// -------
    /// `PDMResult<PdmEngine<'a>>`
    ///   An engine borrowing the samples.
    ///
    /// Errors
    /// ------
    /// - `PDMError::LengthMismatch` when the series differ in length.
    /// - `PDMError::NonFiniteInput` for NaN/±∞ entries.
    /// - `PDMError::DegenerateData` for fewer than 2 samples or a constant
    ///   series.
    /// - `PDMError::InvalidBinning` for zero bins or covers, or an overflowing
    ///   `n_bins · n_covers`.
    pub fn new(times: &'a [f64], values: &'a [f64], options: PdmOptions) -> PDMResult<Self> {
        Self::build(Cow::Borrowed(times), Cow::Borrowed(values), options)
    }

    /// Same as [`PdmEngine::new`] for `ndarray` views. Contiguous views are
    /// borrowed; strided views are copied once.
    pub fn from_views(
        times: ArrayView1<'a, f64>, values: ArrayView1<'a, f64>, options: PdmOptions,
    ) -> PDMResult<Self> {
        Self::build(view_to_cow(times), view_to_cow(values), options)
    }

    fn build(
        times: Cow<'a, [f64]>, values: Cow<'a, [f64]>, options: PdmOptions,
    ) -> PDMResult<Self> {
        validate_series(&times, &values)?;
        let options = PdmOptions::new(options.n_bins, options.n_covers)?;
        let overall_variance = overall_variance(&values)?;
        let covers = (0..options.n_covers)
            .map(|c| CoverEdges::new(options.n_bins, c, options.n_covers))
            .collect::<PDMResult<Vec<_>>>()?;

        debug!(
            n_samples = times.len(),
            n_bins = options.n_bins,
            n_covers = options.n_covers,
            overall_variance,
            "PDM engine ready"
        );
        Ok(PdmEngine { times, values, options, overall_variance, covers })
    }

    pub fn n_samples(&self) -> usize {
        self.times.len()
    }

    pub fn options(&self) -> PdmOptions {
        self.options
    }

    pub fn overall_variance(&self) -> f64 {
        self.overall_variance
    }

    /// Theta for a single trial period.
    ///
    /// Errors
    /// ------
    /// - `PDMError::InvalidPeriod` if `period` is not finite and > 0.
    pub fn theta_at(&self, period: f64) -> PDMResult<f64> {
        let mut scratch = TrialScratch::new(self.n_samples(), self.options.n_bins);
        self.trial(period, &mut scratch)
    }

    /// Evaluate every trial of `grid`.
    pub fn run(&self, grid: &FrequencyGrid) -> PDMResult<Periodogram> {
        self.run_with_cancel(grid, &CancelToken::new())
    }

    /// Evaluate every trial of `grid`, checking `cancel` before each trial.
    ///
    /// Errors
    /// ------
    /// - `PDMError::Cancelled` if `cancel` was set before the sweep finished.
    /// - `PDMError::InvalidPeriod { index, .. }` if a trial period is
    ///   invalid (only reachable through an unvalidated grid).
    pub fn run_with_cancel(
        &self, grid: &FrequencyGrid, cancel: &CancelToken,
    ) -> PDMResult<Periodogram> {
        let n_trials = grid.len();
        debug!(n_trials, n_samples = self.n_samples(), "starting PDM sweep");
        let started = Instant::now();

        let thetas = match self.sweep(grid, cancel) {
            Ok(thetas) => thetas,
            Err(PDMError::Cancelled) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                warn!(n_trials, elapsed_ms, "PDM sweep cancelled");
                return Err(PDMError::Cancelled);
            }
            Err(err) => return Err(err),
        };
        let periodogram = Periodogram { frequencies: grid.iter().collect(), thetas };

        let above_one = periodogram.out_of_range().len();
        if above_one > 0 {
            warn!(above_one, "theta exceeds 1.0 for some trials");
        }
        if let Some(best) = periodogram.best() {
            info!(
                n_trials,
                elapsed_ms = started.elapsed().as_millis() as u64,
                best_frequency = best.frequency,
                best_theta = best.theta,
                "PDM sweep complete"
            );
        }
        Ok(periodogram)
    }

    #[cfg(feature = "parallel")]
    fn sweep(&self, grid: &FrequencyGrid, cancel: &CancelToken) -> PDMResult<Vec<f64>> {
        use rayon::prelude::*;

        (0..grid.len())
            .into_par_iter()
            .map_init(
                || TrialScratch::new(self.n_samples(), self.options.n_bins),
                |scratch, i| self.trial_at(grid, i, cancel, scratch),
            )
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn sweep(&self, grid: &FrequencyGrid, cancel: &CancelToken) -> PDMResult<Vec<f64>> {
        let mut scratch = TrialScratch::new(self.n_samples(), self.options.n_bins);
        (0..grid.len()).map(|i| self.trial_at(grid, i, cancel, &mut scratch)).collect()
    }

    #[inline]
    fn trial_at(
        &self, grid: &FrequencyGrid, index: usize, cancel: &CancelToken,
        scratch: &mut TrialScratch,
    ) -> PDMResult<f64> {
        if cancel.is_cancelled() {
            return Err(PDMError::Cancelled);
        }
        self.trial(grid.period_at(index), scratch).map_err(|err| match err {
            PDMError::InvalidPeriod { value, .. } => PDMError::InvalidPeriod { index, value },
            other => other,
        })
    }

    fn trial(&self, period: f64, scratch: &mut TrialScratch) -> PDMResult<f64> {
        fold_into(&self.times, period, 0.0, &mut scratch.phases)?;

        let mut pooled = PooledVariance::default();
        for cover in &self.covers {
            cover.assign_into(&scratch.phases, &mut scratch.bins);
            pooled += scratch.aggregator.accumulate_cover(&self.values, &scratch.bins);
        }
        Ok(theta_unchecked(pooled, self.overall_variance))
    }
}

/// Per-worker buffers reused across trials.
struct TrialScratch {
    phases: Vec<f64>,
    bins: Vec<usize>,
    aggregator: VarianceAggregator,
}

impl TrialScratch {
    fn new(n_samples: usize, n_bins: usize) -> Self {
        TrialScratch {
            phases: Vec::with_capacity(n_samples),
            bins: Vec::with_capacity(n_samples),
            aggregator: VarianceAggregator::new(n_bins),
        }
    }
}

fn view_to_cow(view: ArrayView1<'_, f64>) -> Cow<'_, [f64]> {
    match view.to_slice() {
        Some(slice) => Cow::Borrowed(slice),
        None => Cow::Owned(view.to_vec()),
    }
}

/// Best (minimum-theta) trial of a sweep.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BestTrial {
    pub index: usize,
    pub frequency: f64,
    pub period: f64,
    pub theta: f64,
}

impl BestTrial {
    /// F-test chance probability of this trial's theta.
    pub fn significance(&self, n_samples: usize, options: PdmOptions) -> PDMResult<f64> {
        significance(self.theta, n_samples, options.n_bins, options.n_covers)
    }
}

/// Periodogram — `(frequency, theta)` pairs in grid order.
///
/// Invariants
/// ----------
/// - `frequencies.len() == thetas.len()`; entry `i` belongs to grid
///   position `i`. The array is not sorted by theta.
#[derive(Debug, Clone, PartialEq)]
pub struct Periodogram {
    frequencies: Vec<f64>,
    thetas: Vec<f64>,
}

impl Periodogram {
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn thetas(&self) -> &[f64] {
        &self.thetas
    }

    /// Trial periods, `1 / frequency`, in grid order.
    pub fn periods(&self) -> Vec<f64> {
        self.frequencies.iter().map(|f| 1.0 / f).collect()
    }

    pub fn len(&self) -> usize {
        self.thetas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thetas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies.iter().copied().zip(self.thetas.iter().copied())
    }

    /// Minimum-theta trial; ties go to the earliest grid position and NaN
    /// thetas are never selected.
    pub fn best(&self) -> Option<BestTrial> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &theta) in self.thetas.iter().enumerate() {
            if theta.is_nan() {
                continue;
            }
            match best {
                Some((_, current)) if theta >= current => {}
                _ => best = Some((i, theta)),
            }
        }
        best.map(|(index, theta)| {
            let frequency = self.frequencies[index];
            BestTrial { index, frequency, period: 1.0 / frequency, theta }
        })
    }

    /// F-test chance probability of [`Periodogram::best`]; `Ok(None)` when
    /// every theta is NaN or the periodogram is empty.
    pub fn significance_of_best(
        &self, n_samples: usize, options: PdmOptions,
    ) -> PDMResult<Option<f64>> {
        self.best().map(|best| best.significance(n_samples, options)).transpose()
    }

    /// Grid positions whose theta exceeds 1.0.
    pub fn out_of_range(&self) -> Vec<usize> {
        self.thetas.iter().enumerate().filter(|(_, t)| **t > 1.0).map(|(i, _)| i).collect()
    }

    pub fn to_arrays(&self) -> (Array1<f64>, Array1<f64>) {
        (Array1::from(self.frequencies.clone()), Array1::from(self.thetas.clone()))
    }

    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.frequencies, self.thetas)
    }
}

/// One-call sweep over explicit trial frequencies.
///
/// Parameters
/// ----------
/// - `times`, `values`: aligned finite samples (≥ 2, not constant).
/// - `frequencies`: trial frequencies, each finite and > 0.
/// - `n_bins`, `n_covers`: binning configuration; [`PdmOptions::default`]
///   uses 10 and 2.
///
/// Errors
/// ------
/// - Any error of [`FrequencyGrid::frequencies`], [`PdmOptions::new`], or
///   [`PdmEngine::new`].
pub fn compute_pdm(
    times: &[f64], values: &[f64], frequencies: &[f64], n_bins: usize, n_covers: usize,
) -> PDMResult<Periodogram> {
    let options = PdmOptions::new(n_bins, n_covers)?;
    let grid = FrequencyGrid::frequencies(frequencies.to_vec())?;
    PdmEngine::new(times, values, options)?.run(&grid)
}
