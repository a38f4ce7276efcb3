//! pdm::errors — error types for the phase dispersion engine.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias shared by every stage of the PDM
//! pipeline (grid construction, folding, binning, variance pooling, the theta
//! statistic, and significance), together with a Python bridge for the
//! PyO3 bindings.
//!
//! Key behaviors
//! -------------
//! - Define [`PDMResult`] and [`PDMError`] as the canonical result and error
//!   types for the crate's period-search routines.
//! - Attach human-readable `Display` messages that embed the offending
//!   payload (bounds, indices, lengths) so logs are useful without context.
//! - Classify each variant via [`PDMError::kind`] into configuration,
//!   data-quality, or runtime problems so upstream tooling can message
//!   appropriately.
//! - Implement `From<PDMError> for PyErr` behind the `python-bindings`
//!   feature, mapping every variant to `ValueError`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every public entry point validates at its own boundary and returns
//!   [`PDMResult<T>`]; panics indicate programming errors only.
//! - The statistical no-signal defaults (theta = 1.0 when no bin has two
//!   points, significance = 1.0 when degrees of freedom are insufficient)
//!   are conventions and never surface as errors.
//!
//! Conventions
//! -----------
//! - Indices are 0-based.
//! - statrs distribution-construction failures are wrapped in
//!   [`PDMError::Distribution`] with the backend message preserved.
//!
//! Testing notes
//! -------------
//! - Unit tests check payload embedding in `Display` messages and the
//!   [`ErrorKind`] classification of each variant family.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type PDMResult<T> = Result<T, PDMError>;

/// ErrorKind — coarse classification of [`PDMError`] variants.
///
/// - `Configuration`: the caller asked for something ill-formed (bad bounds,
///   empty grid, zero bins, mismatched lengths).
/// - `DataQuality`: the measurements themselves cannot support the statistic
///   (non-finite values, flat series, too few samples).
/// - `Runtime`: the run was interrupted or a backend failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    DataQuality,
    Runtime,
}

/// PDMError — failure conditions for PDM period searches.
///
/// Variants
/// --------
/// - `InvalidRange { min_freq, max_freq, n_freqs }`
///   Linear grid bounds are not finite, not strictly ordered, not positive,
///   or `n_freqs == 0`.
/// - `EmptyGrid`
///   An explicit trial sequence has zero length.
/// - `InvalidPeriod { index, value }`
///   A trial period (or frequency) is non-finite or non-positive. `index`
///   points into the grid.
/// - `InvalidOffset { value }`
///   A phase offset handed to the folder is non-finite.
/// - `DegenerateData { reason }`
///   The measurement series has fewer than 2 samples or zero variance.
/// - `LengthMismatch { expected, actual }`
///   Two aligned sequences (times/values, values/bin indices) differ in
///   length.
/// - `NonFiniteInput { series, index, value }`
///   A NaN or ±∞ was found in an input series.
/// - `InvalidBinning { n_bins, n_covers, reason }`
///   Bin or cover counts are unusable (zero, or cover index out of range).
/// - `BinIndexOutOfRange { index, n_bins }`
///   A bin assignment points outside `[0, n_bins)`.
/// - `InvalidTheta { value }`
///   A theta handed to the significance estimator is negative or non-finite.
/// - `InvalidProbability { value }`
///   A probability argument lies outside `[0, 1]`.
/// - `Distribution { reason }`
///   statrs rejected the requested distribution parameters.
/// - `Cancelled`
///   A sweep observed its cancellation token before completing.
#[derive(Debug, Clone, PartialEq)]
pub enum PDMError {
    // ---- Grid configuration ----
    InvalidRange { min_freq: f64, max_freq: f64, n_freqs: usize },
    EmptyGrid,
    InvalidPeriod { index: usize, value: f64 },
    InvalidOffset { value: f64 },

    // ---- Input data ----
    DegenerateData { reason: &'static str },
    LengthMismatch { expected: usize, actual: usize },
    NonFiniteInput { series: &'static str, index: usize, value: f64 },

    // ---- Binning ----
    InvalidBinning { n_bins: usize, n_covers: usize, reason: &'static str },
    BinIndexOutOfRange { index: usize, n_bins: usize },

    // ---- Significance ----
    InvalidTheta { value: f64 },
    InvalidProbability { value: f64 },
    Distribution { reason: String },

    // ---- Execution ----
    Cancelled,
}

impl PDMError {
    /// Classify the error for upstream messaging.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PDMError::InvalidRange { .. }
            | PDMError::EmptyGrid
            | PDMError::InvalidPeriod { .. }
            | PDMError::InvalidOffset { .. }
            | PDMError::LengthMismatch { .. }
            | PDMError::InvalidBinning { .. }
            | PDMError::BinIndexOutOfRange { .. }
            | PDMError::InvalidTheta { .. }
            | PDMError::InvalidProbability { .. } => ErrorKind::Configuration,
            PDMError::DegenerateData { .. } | PDMError::NonFiniteInput { .. } => {
                ErrorKind::DataQuality
            }
            PDMError::Distribution { .. } | PDMError::Cancelled => ErrorKind::Runtime,
        }
    }
}

impl std::error::Error for PDMError {}

impl std::fmt::Display for PDMError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PDMError::InvalidRange { min_freq, max_freq, n_freqs } => write!(
                f,
                "Invalid frequency range: min_freq {min_freq}, max_freq {max_freq}, \
                 n_freqs {n_freqs}. Need 0 < min_freq < max_freq (finite) and n_freqs ≥ 1."
            ),
            PDMError::EmptyGrid => write!(f, "Trial grid is empty."),
            PDMError::InvalidPeriod { index, value } => write!(
                f,
                "Invalid trial period at grid index {index}: {value}. Must be finite and > 0."
            ),
            PDMError::InvalidOffset { value } => {
                write!(f, "Invalid phase offset: {value}. Must be finite.")
            }
            PDMError::DegenerateData { reason } => {
                write!(f, "Degenerate measurement series: {reason}")
            }
            PDMError::LengthMismatch { expected, actual } => {
                write!(f, "Array length mismatch: expected length {expected}, got {actual}.")
            }
            PDMError::NonFiniteInput { series, index, value } => {
                write!(f, "Non-finite {series} value at index {index}: {value}")
            }
            PDMError::InvalidBinning { n_bins, n_covers, reason } => {
                write!(f, "Invalid binning (n_bins {n_bins}, n_covers {n_covers}): {reason}")
            }
            PDMError::BinIndexOutOfRange { index, n_bins } => {
                write!(f, "Bin index {index} out of range for {n_bins} bins.")
            }
            PDMError::InvalidTheta { value } => {
                write!(f, "Invalid theta value: {value}. Must be finite and ≥ 0.")
            }
            PDMError::InvalidProbability { value } => {
                write!(f, "Invalid probability: {value}. Must lie in [0, 1].")
            }
            PDMError::Distribution { reason } => {
                write!(f, "Distribution construction failed: {reason}")
            }
            PDMError::Cancelled => write!(f, "Period search was cancelled."),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<PDMError> for PyErr {
    fn from(err: PDMError) -> PyErr {
        PyValueError::new_err(format!("PDMError: {err}"))
    }
}
