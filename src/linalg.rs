//! Small dense helpers bridging nalgebra (factorizations) and ndarray (tensors).

use nalgebra::DMatrix;
use ndarray::{Array2, ArrayD, ArrayView2};

/// Copy an nalgebra matrix into an ndarray matrix.
pub fn to_ndarray(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// Copy an ndarray matrix into an nalgebra matrix.
pub fn to_nalgebra(a: &ArrayView2<'_, f64>) -> DMatrix<f64> {
    let (r, c) = a.dim();
    DMatrix::from_fn(r, c, |i, j| a[[i, j]])
}

/// Operator 2-norm (largest singular value).
pub fn spectral_norm(m: &DMatrix<f64>) -> f64 {
    if m.is_empty() {
        return 0.0;
    }
    m.singular_values().iter().copied().fold(0.0, f64::max)
}

/// Frobenius norm of a tensor of any order.
pub fn frobenius_norm(t: &ArrayD<f64>) -> f64 {
    t.iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// Euclidean norm of a slice.
pub fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}
