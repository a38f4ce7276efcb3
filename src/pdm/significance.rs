//! pdm::significance — chance-probability of an observed theta.
//!
//! Purpose
//! -------
//! Quantify whether a theta minimum reflects genuine periodicity or could
//! arise from aperiodic data. Two complementary tests are provided:
//!
//! - An F-test on the dispersion reduction (Stellingwerf 1978): with
//!   `M = n_bins · n_covers` effective bins and `N` samples,
//!   `F = ((1 − θ) / θ) · (ν₁ / ν₂)` with `ν₁ = N − M`, `ν₂ = M − 1`, and the
//!   chance probability is `1 − F_cdf(F; ν₂, ν₁)`.
//! - A Beta-distribution false-alarm threshold (Schwarzenberg-Czerny 1997):
//!   under the null of Gaussian noise, `θ · (N − M) / (N − 1)` follows
//!   `Beta((N − M) / 2, (M − 1) / 2)`.
//!
//! Key behaviors
//! -------------
//! - [`significance`] returns the F-test chance probability in `[0, 1]`,
//!   defaulting to 1.0 (not significant) whenever the degrees of freedom are
//!   insufficient or θ ≥ 1.
//! - [`FTestOutcome::f_test`] exposes the intermediate F value and degrees
//!   of freedom.
//! - [`theta_threshold`] inverts the Beta null to give the θ below which a
//!   single trial falls with probability `p`; [`beta_false_alarm`] is the
//!   forward probability.
//!
//! Invariants & assumptions
//! ------------------------
//! - θ must be finite and ≥ 0; θ = 0 (a perfect fit) maps to probability 0
//!   without dividing by zero.
//! - Probabilities are clamped into `[0, 1]` to absorb CDF roundoff.
//! - Both tests are single-trial probabilities; they do not correct for the
//!   number of frequencies searched.
//!
//! Conventions
//! -----------
//! - Distributions come from `statrs`; construction failures surface as
//!   [`PDMError::Distribution`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover the no-signal defaults (θ = 1, insufficient degrees
//!   of freedom), the θ = 0 edge case, monotonicity in θ, the threshold
//!   round trip against the forward probability, and error branches.
use statrs::distribution::{Beta, ContinuousCDF, FisherSnedecor};

use crate::pdm::errors::{PDMError, PDMResult};

/// FTestOutcome — F-test on the dispersion reduction of one theta.
///
/// Fields
/// ------
/// - `f_value`: `f64`
///   `((1 − θ) / θ) · (ν₁ / ν₂)`; `+∞` for θ = 0, 0 when the test is not
///   applicable.
/// - `nu1`, `nu2`: `usize`
///   `N − M` and `M − 1`; both 0 when the test is not applicable.
/// - `p_value`: `f64`
///   Chance probability `1 − F_cdf(f_value; ν₂, ν₁)` in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FTestOutcome {
    f_value: f64,
    nu1: usize,
    nu2: usize,
    p_value: f64,
}

impl FTestOutcome {
    /// Run the F-test for `theta` with `n_samples` samples and
    /// `n_bins · n_covers` effective bins.
    ///
    /// Errors
    /// ------
    /// - `PDMError::InvalidTheta` for negative or non-finite θ.
    /// - `PDMError::Distribution` if statrs rejects the degrees of freedom.
    pub fn f_test(
        theta: f64, n_samples: usize, n_bins: usize, n_covers: usize,
    ) -> PDMResult<Self> {
        if !theta.is_finite() || theta < 0.0 {
            return Err(PDMError::InvalidTheta { value: theta });
        }
        let not_applicable = FTestOutcome { f_value: 0.0, nu1: 0, nu2: 0, p_value: 1.0 };

        // An effective bin count that overflows can never leave positive dof.
        let Some(n_bins_eff) = n_bins.checked_mul(n_covers) else {
            return Ok(not_applicable);
        };
        if n_bins_eff <= 1 || n_samples <= n_bins_eff.saturating_add(1) {
            return Ok(not_applicable);
        }
        let nu1 = n_samples - n_bins_eff;
        let nu2 = n_bins_eff - 1;

        if theta == 0.0 {
            return Ok(FTestOutcome { f_value: f64::INFINITY, nu1, nu2, p_value: 0.0 });
        }
        let f_value = (1.0 - theta) / theta * (nu1 as f64 / nu2 as f64);
        if f_value <= 0.0 {
            return Ok(FTestOutcome { f_value, nu1, nu2, p_value: 1.0 });
        }

        let dist = FisherSnedecor::new(nu2 as f64, nu1 as f64)
            .map_err(|e| PDMError::Distribution { reason: e.to_string() })?;
        let p_value = (1.0 - dist.cdf(f_value)).clamp(0.0, 1.0);
        Ok(FTestOutcome { f_value, nu1, nu2, p_value })
    }

    pub fn f_value(&self) -> f64 {
        self.f_value
    }

    pub fn nu1(&self) -> usize {
        self.nu1
    }

    pub fn nu2(&self) -> usize {
        self.nu2
    }

    /// Probability that the dispersion reduction is due to chance.
    pub fn p_value(&self) -> f64 {
        self.p_value
    }
}

/// Probability in `[0, 1]` that `theta` arose by chance (F-test).
///
/// Returns 1.0 when `n_bins · n_covers ≤ 1` or
/// `n_samples ≤ n_bins · n_covers + 1`, and whenever θ ≥ 1.
///
/// Errors
/// ------
/// - As for [`FTestOutcome::f_test`].
///
/// Examples
/// --------
/// ```rust
/// # use rust_phasedm::pdm::significance::significance;
/// assert_eq!(significance(1.0, 500, 10, 2).unwrap(), 1.0);
/// assert_eq!(significance(0.1, 15, 10, 2).unwrap(), 1.0); // too few samples
/// assert!(significance(0.1, 500, 10, 2).unwrap() < 1e-6);
/// ```
pub fn significance(
    theta: f64, n_samples: usize, n_bins: usize, n_covers: usize,
) -> PDMResult<f64> {
    Ok(FTestOutcome::f_test(theta, n_samples, n_bins, n_covers)?.p_value())
}

/// Theta below which a single trial falls with probability `p` under the
/// null of no periodicity.
///
/// Parameters
/// ----------
/// - `n_samples`: `usize`
///   Number of measurements `N`.
/// - `n_bins`: `usize`
///   Number of bins `M` (pass `n_bins · n_covers` to account for covers).
/// - `p`: `f64`
///   False-alarm probability in `[0, 1]`.
///
/// Returns
/// -------
/// `PDMResult<f64>`
///   `((N − 1) / (N − M)) · B⁻¹(p)` with `B = Beta((N − M) / 2, (M − 1) / 2)`;
///   0.0 for `p = 0`, the support maximum `(N − 1) / (N − M)` for `p = 1`,
///   and 0.0 when `N ≤ M` or `M < 2`.
///
/// Errors
/// ------
/// - `PDMError::InvalidProbability` for `p` outside `[0, 1]` or NaN.
/// - `PDMError::Distribution` if statrs rejects the shape parameters.
pub fn theta_threshold(n_samples: usize, n_bins: usize, p: f64) -> PDMResult<f64> {
    if !(0.0..=1.0).contains(&p) {
        return Err(PDMError::InvalidProbability { value: p });
    }
    let Some((scale, dist)) = beta_null(n_samples, n_bins)? else {
        return Ok(0.0);
    };
    if p == 0.0 {
        return Ok(0.0);
    }
    if p == 1.0 {
        return Ok(scale);
    }
    Ok(scale * dist.inverse_cdf(p))
}

/// Probability that a single aperiodic trial yields a theta at or below
/// `theta` (forward counterpart of [`theta_threshold`]).
///
/// Errors
/// ------
/// - `PDMError::InvalidTheta` for negative or non-finite θ.
/// - `PDMError::Distribution` if statrs rejects the shape parameters.
pub fn beta_false_alarm(theta: f64, n_samples: usize, n_bins: usize) -> PDMResult<f64> {
    if !theta.is_finite() || theta < 0.0 {
        return Err(PDMError::InvalidTheta { value: theta });
    }
    let Some((scale, dist)) = beta_null(n_samples, n_bins)? else {
        return Ok(1.0);
    };
    let x = theta / scale;
    if x >= 1.0 {
        return Ok(1.0);
    }
    Ok(dist.cdf(x).clamp(0.0, 1.0))
}

/// Scale `(N − 1) / (N − M)` and the Beta null, or `None` when undefined.
fn beta_null(n_samples: usize, n_bins: usize) -> PDMResult<Option<(f64, Beta)>> {
    if n_bins < 2 || n_samples <= n_bins {
        return Ok(None);
    }
    let d0 = (n_samples - 1) as f64;
    let d1 = (n_bins - 1) as f64;
    let d2 = (n_samples - n_bins) as f64;
    let dist = Beta::new(d2 / 2.0, d1 / 2.0)
        .map_err(|e| PDMError::Distribution { reason: e.to_string() })?;
    Ok(Some((d0 / d2, dist)))
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The no-signal defaults of the F-test.
    // - θ = 0 and θ > 1 edge cases.
    // - Monotonicity of the chance probability in θ.
    // - Beta threshold / false-alarm consistency and error branches.
    //
    // They intentionally DO NOT cover:
    // - Calibration of the tests on simulated noise (size/power studies).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify θ = 1 is never significant for any valid sample/bin counts.
    fn theta_one_is_not_significant() {
        // Arrange / Act / Assert
        for (n, bins, covers) in [(100, 10, 2), (1000, 5, 1), (30, 3, 3)] {
            assert_eq!(significance(1.0, n, bins, covers), Ok(1.0), "n={n} bins={bins}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure insufficient degrees of freedom short-circuit to 1.0
    // regardless of θ.
    //
    // Given
    // -----
    // - n_bins · n_covers = 20 and n_samples ∈ {5, 20, 21}.
    // - n_bins · n_covers = 1.
    //
    // Expect
    // ------
    // - 1.0 in every case, even for θ = 0.01.
    fn insufficient_dof_returns_one() {
        // Arrange / Act / Assert
        for n in [5, 20, 21] {
            assert_eq!(significance(0.01, n, 10, 2), Ok(1.0), "n = {n}");
        }
        assert_eq!(significance(0.01, 100, 1, 1), Ok(1.0));
    }

    #[test]
    // Purpose
    // -------
    // Ensure an effective bin count that overflows `usize` is treated as
    // insufficient degrees of freedom rather than panicking.
    //
    // Expect
    // ------
    // - 1.0 for (usize::MAX / 2 + 1) · 2 and for usize::MAX · usize::MAX.
    // - 1.0 when n_bins · n_covers == usize::MAX.
    fn overflowing_effective_bins_returns_one() {
        // Arrange / Act / Assert
        assert_eq!(significance(0.5, 100, usize::MAX / 2 + 1, 2), Ok(1.0));
        assert_eq!(significance(0.5, 100, usize::MAX, usize::MAX), Ok(1.0));
        assert_eq!(significance(0.5, usize::MAX, usize::MAX, 1), Ok(1.0));
    }

    #[test]
    // Purpose
    // -------
    // Ensure θ = 0 is handled as F → ∞ without dividing by zero.
    fn theta_zero_maps_to_zero_probability() {
        // Arrange / Act
        let outcome = FTestOutcome::f_test(0.0, 100, 10, 2).expect("valid theta");

        // Assert
        assert_eq!(outcome.p_value(), 0.0);
        assert!(outcome.f_value().is_infinite());
        assert_eq!((outcome.nu1(), outcome.nu2()), (80, 19));
    }

    #[test]
    // Purpose
    // -------
    // Verify the chance probability increases with θ and stays in [0, 1],
    // including θ > 1 (pooled variance above overall variance).
    fn probability_is_monotone_in_theta() {
        // Arrange
        let thetas = [0.05, 0.2, 0.5, 0.8, 0.95, 1.2];

        // Act
        let probs: Vec<f64> = thetas
            .iter()
            .map(|&t| significance(t, 200, 10, 2).expect("valid theta"))
            .collect();

        // Assert
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)), "probs: {probs:?}");
        assert!(probs.windows(2).all(|w| w[1] >= w[0]), "probs: {probs:?}");
        assert_eq!(*probs.last().unwrap(), 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Ensure negative and non-finite θ are rejected.
    fn invalid_theta_is_rejected() {
        // Arrange / Act / Assert
        for t in [-0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(significance(t, 100, 10, 2), Err(PDMError::InvalidTheta { .. })));
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify the Beta threshold and the forward false-alarm probability are
    // inverses of each other.
    //
    // Given
    // -----
    // - N = 1000, M = 10, p = 0.01.
    //
    // Expect
    // ------
    // - 0 < θ_p < 1 and beta_false_alarm(θ_p) ≈ 0.01.
    fn theta_threshold_round_trips_with_false_alarm() {
        // Arrange
        let (n, m, p) = (1000, 10, 0.01);

        // Act
        let threshold = theta_threshold(n, m, p).expect("valid probability");
        let back = beta_false_alarm(threshold, n, m).expect("valid theta");

        // Assert
        assert!(threshold > 0.0 && threshold < 1.0, "threshold = {threshold}");
        assert!((back - p).abs() < 1e-4, "round trip gave {back}");
    }

    #[test]
    // Purpose
    // -------
    // Check the documented endpoint and degenerate conventions of the
    // Beta threshold.
    fn theta_threshold_endpoints_and_errors() {
        // Arrange / Act / Assert
        assert_eq!(theta_threshold(100, 10, 0.0), Ok(0.0));
        assert_eq!(theta_threshold(100, 10, 1.0), Ok(99.0 / 90.0));
        assert_eq!(theta_threshold(10, 10, 0.5), Ok(0.0));
        assert_eq!(beta_false_alarm(0.5, 10, 10), Ok(1.0));
        assert!(matches!(
            theta_threshold(100, 10, 1.5),
            Err(PDMError::InvalidProbability { .. })
        ));
        assert!(matches!(
            theta_threshold(100, 10, f64::NAN),
            Err(PDMError::InvalidProbability { .. })
        ));
    }
}
