//! pdm::options — binning configuration for PDM sweeps.
//!
//! Purpose
//! -------
//! Collect the binning knobs of a period search (number of phase bins and
//! number of covers) in one validated value, so entry points accept a single
//! configuration handle instead of loose integers.
//!
//! Key behaviors
//! -------------
//! - [`PdmOptions::new`] validates `n_bins ≥ 1`, `n_covers ≥ 1`, and a
//!   product that fits in `usize`.
//! - [`PdmOptions::default`] gives 10 bins and 2 covers.
//! - [`PdmOptions::effective_bins`] reports `n_bins · n_covers`, the bin
//!   count used by the significance test.
//!
//! Conventions
//! -----------
//! - Parallel execution across trials is a build-time choice (the `parallel`
//!   cargo feature), not a runtime option.
//!
//! Testing notes
//! -------------
//! - Unit tests check the defaults and the validating constructor.
use crate::pdm::{errors::PDMResult, validation::validate_binning};

pub const DEFAULT_N_BINS: usize = 10;
pub const DEFAULT_N_COVERS: usize = 2;

/// PdmOptions — validated binning configuration.
///
/// Fields
/// ------
/// - `n_bins`: `usize`
///   Phase bins per cover; ≥ 1.
/// - `n_covers`: `usize`
///   Offset binning passes per trial; ≥ 1. Cover `c` shifts edges by
///   `c / (n_covers · n_bins)`.
///
/// Invariants
/// ----------
/// - Both fields are ≥ 1 when built through [`PdmOptions::new`] or
///   [`Default`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PdmOptions {
    pub n_bins: usize,
    pub n_covers: usize,
}

impl PdmOptions {
    /// Construct validated options.
    ///
    /// Errors
    /// ------
    /// - `PDMError::InvalidBinning` when either count is zero.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rust_phasedm::pdm::options::PdmOptions;
    /// let opts = PdmOptions::new(8, 3).unwrap();
    /// assert_eq!(opts.effective_bins(), 24);
    /// assert!(PdmOptions::new(0, 2).is_err());
    /// ```
    pub fn new(n_bins: usize, n_covers: usize) -> PDMResult<Self> {
        validate_binning(n_bins, n_covers)?;
        Ok(PdmOptions { n_bins, n_covers })
    }

    /// `n_bins · n_covers`, saturating at `usize::MAX` for options built
    /// field-by-field without [`PdmOptions::new`].
    pub fn effective_bins(&self) -> usize {
        self.n_bins.saturating_mul(self.n_covers)
    }
}

impl Default for PdmOptions {
    fn default() -> Self {
        PdmOptions { n_bins: DEFAULT_N_BINS, n_covers: DEFAULT_N_COVERS }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Verify the documented defaults: 10 bins, 2 covers.
    fn default_options_use_ten_bins_two_covers() {
        // Arrange / Act
        let opts = PdmOptions::default();

        // Assert
        assert_eq!(opts, PdmOptions { n_bins: 10, n_covers: 2 });
        assert_eq!(opts.effective_bins(), 20);
    }

    #[test]
    // Purpose
    // -------
    // Ensure the constructor preserves valid inputs and rejects zeros.
    fn new_validates_counts() {
        // Arrange / Act / Assert
        assert_eq!(PdmOptions::new(5, 1), Ok(PdmOptions { n_bins: 5, n_covers: 1 }));
        assert!(PdmOptions::new(5, 0).is_err());
        assert!(PdmOptions::new(0, 1).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Ensure overflowing counts are rejected by the constructor and that
    // `effective_bins` saturates for options built field-by-field.
    fn overflowing_counts_are_rejected_and_saturate() {
        // Arrange
        let raw = PdmOptions { n_bins: usize::MAX / 2 + 1, n_covers: 2 };

        // Act / Assert
        assert!(PdmOptions::new(raw.n_bins, raw.n_covers).is_err());
        assert_eq!(raw.effective_bins(), usize::MAX);
    }
}
