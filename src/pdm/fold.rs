//! pdm::fold — map timestamps onto phase for a trial period.
//!
//! `phase = ((t / period) + offset) mod 1`, always in `[0, 1)`. The engine
//! folds with `offset = 0` and staggers covers by shifting bin edges
//! instead (see [`crate::pdm::cover`]); the offset argument is kept for
//! callers that prefer shifting phases.
use crate::pdm::errors::{PDMError, PDMResult};

/// Phase of a single timestamp. Assumes `period` has been validated.
#[inline]
pub fn phase_of(time: f64, period: f64, offset: f64) -> f64 {
    let phase = (time / period + offset).rem_euclid(1.0);
    // rem_euclid can round tiny negative inputs up to exactly 1.0.
    if phase >= 1.0 { 0.0 } else { phase }
}

/// Fold `times` at `period`, returning one phase per timestamp.
///
/// Errors
/// ------
/// - `PDMError::InvalidPeriod { index: 0, value }` if `period` is not finite
///   and strictly positive.
/// - `PDMError::InvalidOffset { value }` if `offset` is not finite.
pub fn fold(times: &[f64], period: f64, offset: f64) -> PDMResult<Vec<f64>> {
    let mut phases = Vec::with_capacity(times.len());
    fold_into(times, period, offset, &mut phases)?;
    Ok(phases)
}

/// Fold into a caller-owned buffer, replacing its contents.
pub fn fold_into(
    times: &[f64], period: f64, offset: f64, phases: &mut Vec<f64>,
) -> PDMResult<()> {
    check_period(period)?;
    if !offset.is_finite() {
        return Err(PDMError::InvalidOffset { value: offset });
    }
    phases.clear();
    phases.extend(times.iter().map(|&t| phase_of(t, period, offset)));
    Ok(())
}

#[inline]
pub(crate) fn check_period(period: f64) -> PDMResult<()> {
    if period.is_finite() && period > 0.0 {
        Ok(())
    } else {
        Err(PDMError::InvalidPeriod { index: 0, value: period })
    }
}
