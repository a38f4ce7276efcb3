//! rust_phasedm — Phase Dispersion Minimisation period search with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the PDM period search to Python via the `_rust_phasedm` extension module.
//! When the `python-bindings` feature is enabled, this module defines the
//! Python-facing class, functions, and submodule used by the `rust_phasedm`
//! package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust module ([`pdm`]) as the public crate surface.
//! - Define the `PDM` `#[pyclass]`, the module-level `pdm`, `significance`,
//!   and `theta_threshold` functions, and the `#[pymodule]` initializer.
//! - Create and register the `periodogram` submodule under `rust_phasedm` so
//!   that dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in [`pdm`]; this file performs only FFI glue,
//!   argument defaulting, and error mapping.
//! - Python inputs are copied into owned buffers before a sweep so the GIL
//!   can be released while trials run.
//!
//! Conventions
//! -----------
//! - Python-exposed items live under `_rust_phasedm.periodogram` and are
//!   typically wrapped by thin pure-Python facades.
//! - Errors from core Rust code surface as `PDMError` internally and are
//!   converted to `ValueError` at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on [`pdm`] directly (or
//!   `rust_phasedm::pdm::prelude::*`) and can ignore the PyO3 items guarded by
//!   the `python-bindings` feature.
//!
//! Testing notes
//! -------------
//! - Numerical behavior is covered by unit tests in [`pdm`] and by the
//!   integration tests under `tests/`. The PyO3 layer is exercised from
//!   Python.

pub mod pdm;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    pdm::{
        BestTrial, FrequencyGrid, PDMResult, PdmEngine, PdmOptions, Periodogram,
        significance::{significance, theta_threshold},
    },
    utils::{extract_grid_values, extract_pdm_options, extract_series},
};

/// PDM — Python-facing result of a PDM sweep.
///
/// Purpose
/// -------
/// Run a period search from Python arguments and keep the resulting
/// periodogram for inspection through read-only properties.
///
/// Key behaviors
/// -------------
/// - `PDM(time, signal, min_freq, max_freq, n_freqs, n_bins=10, n_covers=2)`
///   sweeps an evenly spaced frequency grid.
/// - `PDM.from_periods(...)` / `PDM.from_frequencies(...)` sweep an explicit
///   grid.
/// - The sweep runs with the GIL released.
///
/// Fields
/// ------
/// - `inner`: [`Periodogram`]
///   Frequencies and thetas in grid order.
/// - `n_samples`: `usize`
///   Sample count of the swept series, kept for significance tests.
/// - `options`: [`PdmOptions`]
///   Binning configuration used for the sweep.
///
/// Notes
/// -----
/// - Native Rust code should use [`PdmEngine`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_phasedm.periodogram")]
pub struct PDM {
    inner: Periodogram,
    n_samples: usize,
    options: PdmOptions,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PDM {
    #[new]
    #[pyo3(
        signature = (time, signal, min_freq, max_freq, n_freqs, n_bins = None, n_covers = None),
        text_signature = "(time, signal, min_freq, max_freq, n_freqs, /, n_bins=10, n_covers=2)"
    )]
    pub fn linear<'py>(
        py: Python<'py>, time: &Bound<'py, PyAny>, signal: &Bound<'py, PyAny>, min_freq: f64,
        max_freq: f64, n_freqs: usize, n_bins: Option<usize>, n_covers: Option<usize>,
    ) -> PyResult<Self> {
        let grid = FrequencyGrid::linear(min_freq, max_freq, n_freqs)?;
        sweep(py, time, signal, grid, n_bins, n_covers)
    }

    #[staticmethod]
    #[pyo3(
        signature = (time, signal, periods, n_bins = None, n_covers = None),
        text_signature = "(time, signal, periods, /, n_bins=10, n_covers=2)"
    )]
    pub fn from_periods<'py>(
        py: Python<'py>, time: &Bound<'py, PyAny>, signal: &Bound<'py, PyAny>,
        periods: &Bound<'py, PyAny>, n_bins: Option<usize>, n_covers: Option<usize>,
    ) -> PyResult<Self> {
        let grid = FrequencyGrid::periods(extract_grid_values(py, periods, "periods")?)?;
        sweep(py, time, signal, grid, n_bins, n_covers)
    }

    #[staticmethod]
    #[pyo3(
        signature = (time, signal, frequencies, n_bins = None, n_covers = None),
        text_signature = "(time, signal, frequencies, /, n_bins=10, n_covers=2)"
    )]
    pub fn from_frequencies<'py>(
        py: Python<'py>, time: &Bound<'py, PyAny>, signal: &Bound<'py, PyAny>,
        frequencies: &Bound<'py, PyAny>, n_bins: Option<usize>, n_covers: Option<usize>,
    ) -> PyResult<Self> {
        let freqs = extract_grid_values(py, frequencies, "frequencies")?;
        let grid = FrequencyGrid::frequencies(freqs)?;
        sweep(py, time, signal, grid, n_bins, n_covers)
    }

    /// Chance probability (F-test) of the minimum theta.
    #[pyo3(text_signature = "(self)")]
    pub fn significance(&self) -> PyResult<f64> {
        Ok(self.best()?.significance(self.n_samples, self.options)?)
    }

    #[getter]
    pub fn frequencies<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.frequencies().to_vec().into_pyarray(py)
    }

    #[getter]
    pub fn periods<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.periods().into_pyarray(py)
    }

    #[getter]
    pub fn thetas<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.thetas().to_vec().into_pyarray(py)
    }

    #[getter]
    pub fn best_frequency(&self) -> PyResult<f64> {
        Ok(self.best()?.frequency)
    }

    #[getter]
    pub fn best_period(&self) -> PyResult<f64> {
        Ok(self.best()?.period)
    }

    #[getter]
    pub fn best_theta(&self) -> PyResult<f64> {
        Ok(self.best()?.theta)
    }

    /// Grid positions whose theta exceeds 1.0.
    #[getter]
    pub fn out_of_range(&self) -> Vec<usize> {
        self.inner.out_of_range()
    }

    #[getter]
    pub fn n_bins(&self) -> usize {
        self.options.n_bins
    }

    #[getter]
    pub fn n_covers(&self) -> usize {
        self.options.n_covers
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}

#[cfg(feature = "python-bindings")]
impl PDM {
    fn best(&self) -> PyResult<BestTrial> {
        self.inner.best().ok_or_else(|| PyValueError::new_err("periodogram has no finite theta"))
    }
}

#[cfg(feature = "python-bindings")]
fn run_detached(
    py: Python<'_>, times: &[f64], values: &[f64], grid: &FrequencyGrid, options: PdmOptions,
) -> PDMResult<Periodogram> {
    py.allow_threads(|| PdmEngine::new(times, values, options)?.run(grid))
}

#[cfg(feature = "python-bindings")]
fn sweep<'py>(
    py: Python<'py>, time: &Bound<'py, PyAny>, signal: &Bound<'py, PyAny>, grid: FrequencyGrid,
    n_bins: Option<usize>, n_covers: Option<usize>,
) -> PyResult<PDM> {
    let options = extract_pdm_options(n_bins, n_covers)?;
    let (times, values) = extract_series(py, time, signal)?;
    let inner = run_detached(py, &times, &values, &grid, options)?;
    Ok(PDM { inner, n_samples: times.len(), options })
}

/// Sweep an evenly spaced grid and return `(frequencies, thetas)`.
#[cfg(feature = "python-bindings")]
#[pyfunction(name = "pdm")]
#[pyo3(
    signature = (time, signal, min_freq, max_freq, n_freqs, n_bins = None, n_covers = None),
    text_signature = "(time, signal, min_freq, max_freq, n_freqs, /, n_bins=10, n_covers=2)"
)]
fn pdm_py<'py>(
    py: Python<'py>, time: &Bound<'py, PyAny>, signal: &Bound<'py, PyAny>, min_freq: f64,
    max_freq: f64, n_freqs: usize, n_bins: Option<usize>, n_covers: Option<usize>,
) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>)> {
    let result = PDM::linear(py, time, signal, min_freq, max_freq, n_freqs, n_bins, n_covers)?;
    let (freqs, thetas) = result.inner.to_arrays();
    Ok((freqs.into_pyarray(py), thetas.into_pyarray(py)))
}

/// F-test chance probability of `theta`.
#[cfg(feature = "python-bindings")]
#[pyfunction(name = "significance")]
#[pyo3(
    signature = (theta, n_samples, n_bins = None, n_covers = None),
    text_signature = "(theta, n_samples, /, n_bins=10, n_covers=2)"
)]
fn significance_py(
    theta: f64, n_samples: usize, n_bins: Option<usize>, n_covers: Option<usize>,
) -> PyResult<f64> {
    let options = extract_pdm_options(n_bins, n_covers)?;
    Ok(significance(theta, n_samples, options.n_bins, options.n_covers)?)
}

/// Beta-null theta threshold for false-alarm probability `p`.
#[cfg(feature = "python-bindings")]
#[pyfunction(name = "theta_threshold")]
#[pyo3(text_signature = "(n_samples, n_bins, p)")]
fn theta_threshold_py(n_samples: usize, n_bins: usize, p: f64) -> PyResult<f64> {
    Ok(theta_threshold(n_samples, n_bins, p)?)
}

/// _rust_phasedm — PyO3 module initializer for the Python extension.
///
/// Purpose
/// -------
/// Define the `_rust_phasedm` Python module and register the `periodogram`
/// submodule used by the public `rust_phasedm` package.
///
/// Key behaviors
/// -------------
/// - Create the `periodogram` submodule and attach it to `_rust_phasedm`.
/// - Register it in `sys.modules` so it is importable via a dotted path.
///
/// Errors
/// ------
/// - `PyErr`
///   If creating the submodule or manipulating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_phasedm<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let periodogram_mod = PyModule::new(_py, "periodogram")?;
    periodogram(_py, m, &periodogram_mod)?;

    // Manually add the submodule into sys.modules to allow for dot notation.
    _py.import("sys")?
        .getattr("modules")?
        .set_item("rust_phasedm.periodogram", periodogram_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn periodogram<'py>(
    _py: Python, rust_phasedm: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<PDM>()?;
    m.add_function(wrap_pyfunction!(pdm_py, m)?)?;
    m.add_function(wrap_pyfunction!(significance_py, m)?)?;
    m.add_function(wrap_pyfunction!(theta_threshold_py, m)?)?;
    rust_phasedm.add_submodule(m)?;
    Ok(())
}
