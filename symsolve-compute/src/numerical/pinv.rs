//! Moore–Penrose pseudo-inverse.

use nalgebra::{DMatrix, SVD};

/// The iteration cap for the SVD. The decomposition of a Jacobian this solver deals with
/// converges in far fewer iterations.
const SVD_MAX_ITERATIONS: usize = 1000;

/// Computes the Moore–Penrose pseudo-inverse of `matrix` through its singular value
/// decomposition.
///
/// Singular values at or below `tolerance` are treated as zero, so a singular or non-square
/// matrix yields the least-squares inverse instead of failing. For a well-conditioned square
/// matrix the result is the ordinary inverse. A negative tolerance is treated as `0`.
///
/// The result has shape `ncols × nrows`. If `matrix` contains a non-finite entry, or the SVD does
/// not converge, every entry of the result is `NaN`.
///
/// ```
/// use nalgebra::DMatrix;
/// use symsolve_compute::numerical::pseudo_inverse;
///
/// let m = DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 4.0]);
/// let inv = pseudo_inverse(&m, f64::EPSILON);
/// let expected = DMatrix::from_row_slice(2, 2, &[0.5, 0.0, 0.0, 0.25]);
/// assert!((inv - expected).amax() < 1e-12);
/// ```
pub fn pseudo_inverse(matrix: &DMatrix<f64>, tolerance: f64) -> DMatrix<f64> {
    let (rows, cols) = matrix.shape();
    if rows == 0 || cols == 0 {
        return DMatrix::zeros(cols, rows);
    }

    if matrix.iter().any(|value| !value.is_finite()) {
        return DMatrix::from_element(cols, rows, f64::NAN);
    }

    let tolerance = tolerance.max(0.0);
    SVD::try_new(matrix.clone(), true, true, f64::EPSILON, SVD_MAX_ITERATIONS)
        .and_then(|svd| svd.pseudo_inverse(tolerance).ok())
        .unwrap_or_else(|| DMatrix::from_element(cols, rows, f64::NAN))
}
