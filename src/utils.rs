//! utils — Python-boundary helpers for the PyO3 bindings.
//!
//! Converts loosely typed Python arguments (numpy arrays, pandas Series,
//! plain sequences, optional keyword integers) into the validated Rust
//! inputs of [`crate::pdm`]. Everything here is compiled only with the
//! `python-bindings` feature.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

#[cfg(feature = "python-bindings")]
use crate::pdm::{DEFAULT_N_BINS, DEFAULT_N_COVERS, PdmOptions};

/// Borrow or copy a Python array-like into a contiguous read-only `f64`
/// array.
///
/// Accepts, in order of preference: a contiguous 1-D float64 ndarray
/// (borrowed), any object with `to_numpy()` such as a pandas Series, or a
/// Python sequence of floats (copied).
///
/// Errors
/// ------
/// - `TypeError` if the object is none of the above.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Copy a `(time, signal)` pair into owned buffers so the sweep can run
/// with the GIL released.
///
/// Length and finiteness checks are left to
/// [`crate::pdm::PdmEngine::new`]; this only guarantees contiguity.
#[cfg(feature = "python-bindings")]
pub fn extract_series<'py>(
    py: Python<'py>, time: &Bound<'py, PyAny>, signal: &Bound<'py, PyAny>,
) -> PyResult<(Vec<f64>, Vec<f64>)> {
    let time_arr = extract_f64_array(py, time)?;
    let signal_arr = extract_f64_array(py, signal)?;
    let time_slice = time_arr
        .as_slice()
        .map_err(|_| PyValueError::new_err("time must be a 1-D contiguous float64 array"))?;
    let signal_slice = signal_arr
        .as_slice()
        .map_err(|_| PyValueError::new_err("signal must be a 1-D contiguous float64 array"))?;
    Ok((time_slice.to_vec(), signal_slice.to_vec()))
}

/// Same as [`extract_series`] for a single grid array (frequencies or
/// periods).
#[cfg(feature = "python-bindings")]
pub fn extract_grid_values<'py>(
    py: Python<'py>, raw: &Bound<'py, PyAny>, name: &str,
) -> PyResult<Vec<f64>> {
    let arr = extract_f64_array(py, raw)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err(format!("{name} must be a 1-D contiguous float64 array"))
    })?;
    Ok(slice.to_vec())
}

/// Build [`PdmOptions`] from optional keyword arguments, defaulting to 10
/// bins and 2 covers.
///
/// Errors
/// ------
/// - `ValueError` (via `PDMError::InvalidBinning`) when either count is 0.
#[cfg(feature = "python-bindings")]
pub fn extract_pdm_options(n_bins: Option<usize>, n_covers: Option<usize>) -> PyResult<PdmOptions> {
    let opts = PdmOptions::new(
        n_bins.unwrap_or(DEFAULT_N_BINS),
        n_covers.unwrap_or(DEFAULT_N_COVERS),
    )?;
    Ok(opts)
}
