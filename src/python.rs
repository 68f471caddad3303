//! Python bindings (enabled with the `python` feature)

use crate::core::{coherence, kernel};
use crate::types::{CslcError, SlcComplex};
use numpy::{IntoPyArray, PyReadonlyArray2};
use pyo3::exceptions::{PyRuntimeError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyLong;

fn to_py_err(err: CslcError) -> PyErr {
    match err {
        CslcError::InvalidArgumentType(msg) => PyTypeError::new_err(msg),
        CslcError::InvalidParameter(_)
        | CslcError::ShapeMismatch { .. }
        | CslcError::EmptyInput(_) => PyValueError::new_err(format!("{}", err)),
        CslcError::Processing(_) => PyRuntimeError::new_err(format!("{}", err)),
    }
}

/// Python module definition
#[pymodule]
fn _cslc(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(get_kernel, m)?)?;
    m.add_function(wrap_pyfunction!(smoothed_dot_prod, m)?)?;
    m.add_function(wrap_pyfunction!(coherence_magnitude, m)?)?;
    Ok(())
}

/// Smoothing kernel from `num_conv` self-convolutions of a `size` box
#[pyfunction]
fn get_kernel<'py>(py: Python<'py>, size: usize, num_conv: &PyAny) -> PyResult<&'py PyAny> {
    // Exact type check: bool and float are rejected
    if !num_conv.is_exact_instance_of::<PyLong>() {
        return Err(to_py_err(CslcError::InvalidArgumentType(
            "num_conv must be an integer".to_string(),
        )));
    }
    let num_conv: usize = num_conv.extract()?;

    let k = kernel::get_kernel(size, num_conv).map_err(to_py_err)?;
    Ok(k.into_pyarray(py).as_ref())
}

/// Smoothed dot product of two complex64 scenes
#[pyfunction]
#[pyo3(signature = (z1, z2, k, real = false))]
fn smoothed_dot_prod<'py>(
    py: Python<'py>,
    z1: PyReadonlyArray2<'py, SlcComplex>,
    z2: PyReadonlyArray2<'py, SlcComplex>,
    k: PyReadonlyArray2<'py, f32>,
    real: bool,
) -> PyResult<&'py PyAny> {
    let z1 = z1.as_array().to_owned();
    let z2 = z2.as_array().to_owned();
    let k = k.as_array().to_owned();

    let field = coherence::smoothed_dot_prod(&z1, &z2, &k, real).map_err(to_py_err)?;
    Ok(match field {
        coherence::SmoothedField::Complex(out) => out.into_pyarray(py).as_ref(),
        coherence::SmoothedField::Real(out) => out.into_pyarray(py).as_ref(),
    })
}

/// Coherence magnitude of two complex64 scenes with a prebuilt kernel
#[pyfunction]
#[pyo3(name = "coherence")]
fn coherence_magnitude<'py>(
    py: Python<'py>,
    z1: PyReadonlyArray2<'py, SlcComplex>,
    z2: PyReadonlyArray2<'py, SlcComplex>,
    k: PyReadonlyArray2<'py, f32>,
) -> PyResult<&'py PyAny> {
    let estimator = coherence::CoherenceEstimator::new(k.as_array().to_owned());
    let z1 = z1.as_array().to_owned();
    let z2 = z2.as_array().to_owned();

    let coh = estimator.coherence(&z1, &z2).map_err(to_py_err)?;
    Ok(coh.into_pyarray(py).as_ref())
}
