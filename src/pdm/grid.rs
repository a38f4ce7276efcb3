//! pdm::grid — trial frequency grids for the period search.
//!
//! Purpose
//! -------
//! Describe the ordered sequence of trial frequencies a sweep evaluates,
//! either as an inclusive linear range or as an explicit list of trial
//! frequencies or periods supplied by the caller.
//!
//! Key behaviors
//! -------------
//! - [`FrequencyGrid::linear`] validates `(min_freq, max_freq, n_freqs)` and
//!   yields `n_freqs` evenly spaced values with both endpoints included.
//! - [`FrequencyGrid::frequencies`] / [`FrequencyGrid::periods`] pass an
//!   explicit sequence through unchanged (periods are exposed as `1 / p`).
//! - The grid is lazy and restartable: [`FrequencyGrid::iter`] can be called
//!   any number of times, and [`FrequencyGrid::frequency_at`] gives
//!   index-addressed access for parallel sweeps.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every trial frequency is finite and strictly positive, so every trial
//!   period handed to the folder is valid. Violations are rejected at
//!   construction time.
//! - Linear grids are strictly ascending with `first == min_freq` and
//!   `last == max_freq` exactly.
//! - Explicit grids may contain duplicates and need not be sorted.
//!
//! Testing notes
//! -------------
//! - Unit tests cover endpoint pinning, spacing, the single-point grid, the
//!   error branches, and the period ↔ frequency mapping. Property tests in
//!   `tests/pdm_properties.rs` check size and monotonicity over random
//!   ranges.
use crate::pdm::errors::{PDMError, PDMResult};

/// FrequencyGrid — ordered trial frequencies for a PDM sweep.
///
/// Variants
/// --------
/// - `Linear { min_freq, max_freq, n_freqs }`
///   Inclusive linear spacing over `[min_freq, max_freq]`.
/// - `Frequencies(Vec<f64>)`
///   Explicit trial frequencies, used as given.
/// - `Periods(Vec<f64>)`
///   Explicit trial periods; the sweep tests frequency `1 / p` for each.
///
/// Invariants
/// ----------
/// - Constructed only through the validating constructors, so every
///   variant holds at least one finite, strictly positive trial.
#[derive(Debug, Clone, PartialEq)]
pub enum FrequencyGrid {
    Linear { min_freq: f64, max_freq: f64, n_freqs: usize },
    Frequencies(Vec<f64>),
    Periods(Vec<f64>),
}

impl FrequencyGrid {
    /// Build an inclusive linear grid of `n_freqs` trial frequencies.
    ///
    /// Errors
    /// ------
    /// - `PDMError::InvalidRange` when either bound is non-finite,
    ///   `min_freq <= 0`, `max_freq <= min_freq`, or `n_freqs == 0`.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rust_phasedm::pdm::grid::FrequencyGrid;
    /// let grid = FrequencyGrid::linear(1.0, 2.0, 5).unwrap();
    /// let freqs: Vec<f64> = grid.iter().collect();
    /// assert_eq!(freqs, vec![1.0, 1.25, 1.5, 1.75, 2.0]);
    /// ```
    pub fn linear(min_freq: f64, max_freq: f64, n_freqs: usize) -> PDMResult<Self> {
        let bounds_ok = min_freq.is_finite() && max_freq.is_finite() && min_freq > 0.0;
        if !bounds_ok || max_freq <= min_freq || n_freqs < 1 {
            return Err(PDMError::InvalidRange { min_freq, max_freq, n_freqs });
        }
        Ok(FrequencyGrid::Linear { min_freq, max_freq, n_freqs })
    }

    /// Wrap an explicit sequence of trial frequencies.
    ///
    /// Errors
    /// ------
    /// - `PDMError::EmptyGrid` for an empty sequence.
    /// - `PDMError::InvalidPeriod { index, value }` for the first entry that
    ///   is non-finite or ≤ 0.
    pub fn frequencies(freqs: Vec<f64>) -> PDMResult<Self> {
        check_explicit(&freqs)?;
        Ok(FrequencyGrid::Frequencies(freqs))
    }

    /// Wrap an explicit sequence of trial periods.
    ///
    /// Errors
    /// ------
    /// - Same as [`FrequencyGrid::frequencies`].
    pub fn periods(periods: Vec<f64>) -> PDMResult<Self> {
        check_explicit(&periods)?;
        Ok(FrequencyGrid::Periods(periods))
    }

    /// Number of trials in the grid.
    pub fn len(&self) -> usize {
        match self {
            FrequencyGrid::Linear { n_freqs, .. } => *n_freqs,
            FrequencyGrid::Frequencies(v) | FrequencyGrid::Periods(v) => v.len(),
        }
    }

    /// Always `false` for a validated grid; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Trial frequency at grid position `i`.
    ///
    /// Panics
    /// ------
    /// - Panics if `i >= self.len()` for explicit grids.
    #[inline]
    pub fn frequency_at(&self, i: usize) -> f64 {
        match self {
            FrequencyGrid::Linear { min_freq, max_freq, n_freqs } => {
                if i + 1 >= *n_freqs {
                    if *n_freqs == 1 { *min_freq } else { *max_freq }
                } else {
                    let step = (max_freq - min_freq) / (*n_freqs - 1) as f64;
                    min_freq + i as f64 * step
                }
            }
            FrequencyGrid::Frequencies(v) => v[i],
            FrequencyGrid::Periods(v) => 1.0 / v[i],
        }
    }

    /// Trial period at grid position `i`.
    #[inline]
    pub fn period_at(&self, i: usize) -> f64 {
        match self {
            FrequencyGrid::Periods(v) => v[i],
            _ => 1.0 / self.frequency_at(i),
        }
    }

    /// Fresh iterator over the trial frequencies, in grid order.
    pub fn iter(&self) -> GridIter<'_> {
        GridIter { grid: self, next: 0, end: self.len() }
    }
}

impl<'a> IntoIterator for &'a FrequencyGrid {
    type Item = f64;
    type IntoIter = GridIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the frequencies of a [`FrequencyGrid`].
#[derive(Debug, Clone)]
pub struct GridIter<'a> {
    grid: &'a FrequencyGrid,
    next: usize,
    end: usize,
}

impl Iterator for GridIter<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.next >= self.end {
            return None;
        }
        let f = self.grid.frequency_at(self.next);
        self.next += 1;
        Some(f)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridIter<'_> {}

/// Materialize an inclusive linear grid of trial frequencies.
pub fn make_grid(min_freq: f64, max_freq: f64, n_freqs: usize) -> PDMResult<Vec<f64>> {
    Ok(FrequencyGrid::linear(min_freq, max_freq, n_freqs)?.iter().collect())
}

/// Validate and return an explicit trial sequence unchanged.
pub fn make_grid_from(explicit: &[f64]) -> PDMResult<Vec<f64>> {
    check_explicit(explicit)?;
    Ok(explicit.to_vec())
}

fn check_explicit(trials: &[f64]) -> PDMResult<()> {
    if trials.is_empty() {
        return Err(PDMError::EmptyGrid);
    }
    match trials.iter().position(|&v| !(v.is_finite() && v > 0.0)) {
        Some(index) => Err(PDMError::InvalidPeriod { index, value: trials[index] }),
        None => Ok(()),
    }
}
