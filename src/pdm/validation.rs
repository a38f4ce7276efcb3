//! pdm::validation — shared input guards for the period search.
//!
//! Purpose
//! -------
//! Centralize the boundary checks every PDM entry point performs on the
//! caller's time series and binning configuration, so the inner stages can
//! assume clean, aligned, finite data.
//!
//! Key behaviors
//! -------------
//! - [`validate_series`] enforces equal lengths, at least two samples, and
//!   finiteness of both `times` and `values`.
//! - [`validate_binning`] enforces `n_bins ≥ 1`, `n_covers ≥ 1`, and a
//!   non-overflowing `n_bins · n_covers`.
//! - Failures map to structured [`PDMError`] values; nothing is masked or
//!   silently dropped.
//!
//! Conventions
//! -----------
//! - Missing-value filtering belongs to the ingestion layer. A NaN reaching
//!   this module is reported as [`PDMError::NonFiniteInput`] with the index
//!   of the first offending entry.
//! - Sortedness of `times` is not required.
//!
//! Testing notes
//! -------------
//! - Unit tests cover each error branch and a simple success path.
use crate::pdm::errors::{PDMError, PDMResult};

/// Validate an aligned (times, values) pair.
///
/// Parameters
/// ----------
/// - `times`: `&[f64]`
///   Observation timestamps, any order, duplicates allowed.
/// - `values`: `&[f64]`
///   Measurements aligned with `times`.
///
/// Returns
/// -------
/// `PDMResult<()>`
///   - `Ok(())` when both series are finite, aligned, and hold ≥ 2 samples.
///
/// Errors
/// ------
/// - `PDMError::LengthMismatch { expected, actual }`
///   Returned when `values.len() != times.len()`; `expected` is the length
///   of `times`.
/// - `PDMError::DegenerateData`
///   Returned when fewer than two samples are supplied.
/// - `PDMError::NonFiniteInput { series, index, value }`
///   Returned for the first NaN/±∞ in `times`, then in `values`.
///
/// Panics
/// ------
/// - Never panics.
pub fn validate_series(times: &[f64], values: &[f64]) -> PDMResult<()> {
    if times.len() != values.len() {
        return Err(PDMError::LengthMismatch { expected: times.len(), actual: values.len() });
    }
    if times.len() < 2 {
        return Err(PDMError::DegenerateData { reason: "need at least 2 samples" });
    }
    check_finite("times", times)?;
    check_finite("values", values)?;
    Ok(())
}

/// Validate bin and cover counts.
///
/// Errors
/// ------
/// - `PDMError::InvalidBinning` when `n_bins == 0`, `n_covers == 0`, or
///   `n_bins · n_covers` overflows `usize`.
pub fn validate_binning(n_bins: usize, n_covers: usize) -> PDMResult<()> {
    if n_bins == 0 {
        return Err(PDMError::InvalidBinning { n_bins, n_covers, reason: "n_bins must be ≥ 1" });
    }
    if n_covers == 0 {
        return Err(PDMError::InvalidBinning { n_bins, n_covers, reason: "n_covers must be ≥ 1" });
    }
    if n_bins.checked_mul(n_covers).is_none() {
        let reason = "n_bins · n_covers overflows usize";
        return Err(PDMError::InvalidBinning { n_bins, n_covers, reason });
    }
    Ok(())
}

#[inline]
fn check_finite(series: &'static str, data: &[f64]) -> PDMResult<()> {
    match data.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(PDMError::NonFiniteInput { series, index, value: data[index] }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Successful validation of a well-formed series pair.
    // - Each error branch of `validate_series` and `validate_binning`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that a finite, aligned pair of length 3 passes.
    //
    // Expect
    // ------
    // - `validate_series` returns `Ok(())`.
    fn validate_series_valid_pair_succeeds() {
        // Arrange
        let times = vec![0.0_f64, 0.3, 1.7];
        let values = vec![1.0_f64, -0.5, 0.25];

        // Act
        let result = validate_series(&times, &values);

        // Assert
        assert!(result.is_ok(), "Expected Ok(()) for valid inputs, got {result:?}");
    }

    #[test]
    // Purpose
    // -------
    // Ensure that misaligned inputs are reported with both lengths.
    //
    // Given
    // -----
    // - times of length 3, values of length 2.
    //
    // Expect
    // ------
    // - `Err(PDMError::LengthMismatch { expected: 3, actual: 2 })`.
    fn validate_series_length_mismatch_reports_both_lengths() {
        // Arrange
        let times = vec![0.0_f64, 1.0, 2.0];
        let values = vec![1.0_f64, 2.0];

        // Act
        let result = validate_series(&times, &values);

        // Assert
        assert_eq!(result, Err(PDMError::LengthMismatch { expected: 3, actual: 2 }));
    }

    #[test]
    // Purpose
    // -------
    // Ensure that a single sample is rejected as degenerate.
    //
    // Expect
    // ------
    // - `Err(PDMError::DegenerateData { .. })`.
    fn validate_series_single_sample_is_degenerate() {
        // Arrange
        let times = vec![0.0_f64];
        let values = vec![1.0_f64];

        // Act
        let result = validate_series(&times, &values);

        // Assert
        match result {
            Err(PDMError::DegenerateData { .. }) => (),
            other => panic!("expected DegenerateData error, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that a NaN in `values` is surfaced with its index rather than
    // being masked.
    //
    // Given
    // -----
    // - values = [1.0, NaN, 3.0].
    //
    // Expect
    // ------
    // - `Err(PDMError::NonFiniteInput { series: "values", index: 1, .. })`.
    fn validate_series_nan_value_returns_non_finite_input() {
        // Arrange
        let times = vec![0.0_f64, 1.0, 2.0];
        let values = vec![1.0_f64, f64::NAN, 3.0];

        // Act
        let result = validate_series(&times, &values);

        // Assert
        match result {
            Err(PDMError::NonFiniteInput { series, index, value }) => {
                assert_eq!(series, "values");
                assert_eq!(index, 1);
                assert!(value.is_nan());
            }
            other => panic!("expected NonFiniteInput error, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that an infinite timestamp is reported against `times`.
    //
    // Expect
    // ------
    // - `Err(PDMError::NonFiniteInput { series: "times", index: 2, .. })`.
    fn validate_series_infinite_time_returns_non_finite_input() {
        // Arrange
        let times = vec![0.0_f64, 1.0, f64::INFINITY];
        let values = vec![1.0_f64, 2.0, 3.0];

        // Act
        let result = validate_series(&times, &values);

        // Assert
        match result {
            Err(PDMError::NonFiniteInput { series: "times", index: 2, .. }) => (),
            other => panic!("expected NonFiniteInput on times, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure zero bins and zero covers are both rejected.
    //
    // Expect
    // ------
    // - `Err(PDMError::InvalidBinning { .. })` in both cases; (10, 2) passes.
    fn validate_binning_rejects_zero_counts() {
        // Arrange / Act / Assert
        assert!(matches!(validate_binning(0, 2), Err(PDMError::InvalidBinning { .. })));
        assert!(matches!(validate_binning(10, 0), Err(PDMError::InvalidBinning { .. })));
        assert!(validate_binning(10, 2).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Ensure counts whose product overflows `usize` are rejected instead of
    // panicking downstream.
    //
    // Given
    // -----
    // - (usize::MAX / 2 + 1, 2) and (usize::MAX, usize::MAX).
    //
    // Expect
    // ------
    // - `Err(PDMError::InvalidBinning { .. })` for both.
    fn validate_binning_rejects_overflowing_product() {
        // Arrange
        let cases = [(usize::MAX / 2 + 1, 2), (usize::MAX, usize::MAX)];

        for (n_bins, n_covers) in cases {
            // Act
            let result = validate_binning(n_bins, n_covers);

            // Assert
            assert!(
                matches!(result, Err(PDMError::InvalidBinning { .. })),
                "({n_bins}, {n_covers}) -> {result:?}"
            );
        }
    }
}
