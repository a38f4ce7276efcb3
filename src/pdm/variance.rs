//! pdm::variance — per-bin variance pooling across covers.
//!
//! Purpose
//! -------
//! Reduce one cover's bin assignments to the pooled within-bin sum of
//! squares `s2_sum` and pooled degrees of freedom `m_sum` used by the theta
//! statistic, and provide the unbiased sample variance shared with the
//! overall-variance computation.
//!
//! Key behaviors
//! -------------
//! - For each bin with `count ≥ 2`, add `var_b · (count − 1)` (the sum of
//!   squared deviations about the bin mean) to `s2_sum` and `count − 1` to
//!   `m_sum`. Bins with 0 or 1 points contribute nothing.
//! - [`PooledVariance`] values add across covers (`+=` / [`PooledVariance::merge`]).
//! - [`VarianceAggregator`] owns per-bin scratch so a worker can reuse it for
//!   every trial it processes.
//!
//! Invariants & assumptions
//! ------------------------
//! - `values` and `bin_indices` are aligned; indices lie in `[0, n_bins)`.
//!   The free function [`accumulate`] checks both; the aggregator's
//!   internal path relies on [`crate::pdm::cover::CoverEdges`] producing
//!   valid indices.
//! - Sums of squares are computed two-pass (bin means first, then squared
//!   deviations), matching `var(ddof = 1) · (count − 1)` without the
//!   cancellation of a one-pass `Σx² − (Σx)²/n`.
//!
//! Testing notes
//! -------------
//! - Unit tests compare pooled sums with hand-computed values, check the
//!   skip rule for sparse bins, and cover the error branches.
use std::ops::AddAssign;

use crate::pdm::errors::{PDMError, PDMResult};

/// Pooled within-bin sum of squares and degrees of freedom.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PooledVariance {
    pub s2_sum: f64,
    pub m_sum: usize,
}

impl PooledVariance {
    pub fn merge(self, other: PooledVariance) -> PooledVariance {
        PooledVariance { s2_sum: self.s2_sum + other.s2_sum, m_sum: self.m_sum + other.m_sum }
    }
}

impl AddAssign for PooledVariance {
    fn add_assign(&mut self, rhs: PooledVariance) {
        self.s2_sum += rhs.s2_sum;
        self.m_sum += rhs.m_sum;
    }
}

/// VarianceAggregator — reusable per-bin scratch for pooling one cover.
///
/// Fields
/// ------
/// - `counts`, `sums`, `sq_dev`: per-bin scratch, length `n_bins`.
///
/// Performance
/// -----------
/// - Two linear passes over the samples per cover plus O(n_bins) work; no
///   allocation after construction.
#[derive(Debug, Clone)]
pub struct VarianceAggregator {
    counts: Vec<usize>,
    sums: Vec<f64>,
    sq_dev: Vec<f64>,
}

impl VarianceAggregator {
    pub fn new(n_bins: usize) -> Self {
        VarianceAggregator {
            counts: vec![0; n_bins],
            sums: vec![0.0; n_bins],
            sq_dev: vec![0.0; n_bins],
        }
    }

    pub fn n_bins(&self) -> usize {
        self.counts.len()
    }

    /// Pool one cover. `bin_indices` must be aligned with `values` and in
    /// range; see [`accumulate`] for the checked variant.
    pub fn accumulate_cover(&mut self, values: &[f64], bin_indices: &[usize]) -> PooledVariance {
        debug_assert_eq!(values.len(), bin_indices.len());
        self.counts.fill(0);
        self.sums.fill(0.0);
        self.sq_dev.fill(0.0);

        for (&v, &b) in values.iter().zip(bin_indices) {
            self.counts[b] += 1;
            self.sums[b] += v;
        }
        // Reuse `sums` as bin means.
        for (sum, &count) in self.sums.iter_mut().zip(&self.counts) {
            if count > 0 {
                *sum /= count as f64;
            }
        }
        for (&v, &b) in values.iter().zip(bin_indices) {
            let d = v - self.sums[b];
            self.sq_dev[b] += d * d;
        }

        let mut pooled = PooledVariance::default();
        for (&count, &ss) in self.counts.iter().zip(&self.sq_dev) {
            if count > 1 {
                pooled.s2_sum += ss;
                pooled.m_sum += count - 1;
            }
        }
        pooled
    }
}

/// Pool one cover's bins after checking alignment and index range.
///
/// Errors
/// ------
/// - `PDMError::LengthMismatch` when `bin_indices.len() != values.len()`.
/// - `PDMError::BinIndexOutOfRange` for the first index `>= n_bins`.
/// - `PDMError::InvalidBinning` when `n_bins == 0`.
///
/// Examples
/// --------
/// ```rust
/// # use rust_phasedm::pdm::variance::accumulate;
/// // Bin 0 holds {1, 3} (ss = 2), bin 1 holds {5} (skipped).
/// let pooled = accumulate(&[1.0, 3.0, 5.0], &[0, 0, 1], 2).unwrap();
/// assert_eq!(pooled.s2_sum, 2.0);
/// assert_eq!(pooled.m_sum, 1);
/// ```
pub fn accumulate(
    values: &[f64], bin_indices: &[usize], n_bins: usize,
) -> PDMResult<PooledVariance> {
    if n_bins == 0 {
        let reason = "n_bins must be ≥ 1";
        return Err(PDMError::InvalidBinning { n_bins, n_covers: 1, reason });
    }
    if values.len() != bin_indices.len() {
        return Err(PDMError::LengthMismatch { expected: values.len(), actual: bin_indices.len() });
    }
    if let Some(&index) = bin_indices.iter().find(|&&b| b >= n_bins) {
        return Err(PDMError::BinIndexOutOfRange { index, n_bins });
    }
    Ok(VarianceAggregator::new(n_bins).accumulate_cover(values, bin_indices))
}

/// Unbiased sample variance (`n − 1` denominator). `None` for fewer than
/// two values.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let ss: f64 = values.iter().map(|&v| (v - mean) * (v - mean)).sum();
    Some(ss / (n - 1) as f64)
}
