//! pdm::theta — the PDM dispersion statistic.
//!
//! θ = (s2_sum / m_sum) / σ², the pooled within-bin variance relative to the
//! overall variance σ² of the measurements. Small θ means folding at the
//! trial period removes most of the scatter. When no bin holds two points
//! (`m_sum == 0`) θ is 1.0: no detectable dispersion reduction.
use crate::pdm::{
    errors::{PDMError, PDMResult},
    variance::{PooledVariance, sample_variance},
};

/// Overall unbiased variance of the measurement series, computed once per
/// dataset.
///
/// Errors
/// ------
/// - `PDMError::DegenerateData` for fewer than 2 samples or a flat series.
pub fn overall_variance(values: &[f64]) -> PDMResult<f64> {
    let var = sample_variance(values)
        .ok_or(PDMError::DegenerateData { reason: "need at least 2 samples" })?;
    // Summation roundoff can leave a tiny nonzero variance for a flat series.
    if values.iter().all(|&v| v == values[0]) {
        return Err(PDMError::DegenerateData { reason: "measurement series is constant" });
    }
    check_overall_variance(var)?;
    Ok(var)
}

/// Theta statistic for one trial period.
///
/// Errors
/// ------
/// - `PDMError::DegenerateData` if `overall_variance` is zero, negative, or
///   non-finite.
#[inline]
pub fn theta(pooled: PooledVariance, overall_variance: f64) -> PDMResult<f64> {
    check_overall_variance(overall_variance)?;
    Ok(theta_unchecked(pooled, overall_variance))
}

/// Engine hot path; `overall_variance` was validated once up front.
#[inline]
pub(crate) fn theta_unchecked(pooled: PooledVariance, overall_variance: f64) -> f64 {
    if pooled.m_sum == 0 {
        1.0
    } else {
        pooled.s2_sum / (overall_variance * pooled.m_sum as f64)
    }
}

fn check_overall_variance(var: f64) -> PDMResult<()> {
    if var.is_finite() && var > 0.0 {
        Ok(())
    } else {
        Err(PDMError::DegenerateData { reason: "overall variance is zero or non-finite" })
    }
}
