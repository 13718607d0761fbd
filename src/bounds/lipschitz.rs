//! Numerical Lipschitz-constant estimates from a derivative oracle.
//!
//! Given an oracle for the `k`-th derivative, the constant of that derivative
//! is estimated as `max_i ‖D(x0 + sᵢ) − D(x0)‖ / ‖sᵢ‖` over the columns of a
//! direction set. Columns of zero length carry no information; when every
//! column is zero the result is [`LipschitzEstimate::Undefined`] rather than
//! a zero that would pass for a proof of flatness.

use ndarray::{Array2, ArrayD};
use tracing::debug;

use crate::directions::{check_point, DirectionMatrix};
use crate::error::{Result, SimplexError};
use crate::linalg::{frobenius_norm, norm, spectral_norm, to_nalgebra};
use crate::oracle::check_output_len;

/// Outcome of a numerical Lipschitz estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LipschitzEstimate {
    /// Largest observed difference quotient.
    Estimated(f64),
    /// No direction had positive length.
    Undefined,
}

impl LipschitzEstimate {
    pub fn value(self) -> Option<f64> {
        match self {
            LipschitzEstimate::Estimated(l) => Some(l),
            LipschitzEstimate::Undefined => None,
        }
    }

    pub fn is_defined(self) -> bool {
        matches!(self, LipschitzEstimate::Estimated(_))
    }

    /// The estimate, or `default` when undefined.
    pub fn unwrap_or(self, default: f64) -> f64 {
        self.value().unwrap_or(default)
    }
}

/// Gradient Lipschitz constant, Euclidean norm of gradient differences.
pub fn lipschitz_from_gradients<G>(
    x0: &[f64],
    s: &DirectionMatrix,
    gradient_oracle: G,
) -> Result<LipschitzEstimate>
where
    G: Fn(&[f64]) -> Vec<f64>,
{
    let n = x0.len();
    estimate(
        x0,
        s,
        |x| {
            let g = gradient_oracle(x);
            check_output_len(g.len(), n)?;
            check_finite(x, g.iter())?;
            Ok(g)
        },
        |a, b| norm(&a.iter().zip(b).map(|(u, v)| u - v).collect::<Vec<_>>()),
    )
}

/// Hessian Lipschitz constant, spectral norm of Hessian differences.
pub fn lipschitz_from_hessians<H>(
    x0: &[f64],
    s: &DirectionMatrix,
    hessian_oracle: H,
) -> Result<LipschitzEstimate>
where
    H: Fn(&[f64]) -> Array2<f64>,
{
    let n = x0.len();
    estimate(
        x0,
        s,
        |x| {
            let h = hessian_oracle(x);
            if h.dim() != (n, n) {
                return Err(SimplexError::OracleOutput {
                    expected: vec![n, n],
                    found: h.shape().to_vec(),
                });
            }
            check_finite(x, h.iter())?;
            Ok(h)
        },
        |a, b| spectral_norm(&to_nalgebra(&(a - b).view())),
    )
}

/// Lipschitz constant of an order-`p` derivative tensor, Frobenius norm of
/// differences. Every tensor must have shape `(n, …, n)` with the same order
/// as the one returned at `x0`.
pub fn lipschitz_from_tensors<T>(
    x0: &[f64],
    s: &DirectionMatrix,
    tensor_oracle: T,
) -> Result<LipschitzEstimate>
where
    T: Fn(&[f64]) -> ArrayD<f64>,
{
    let n = x0.len();
    let mut order = None;
    let checked = |x: &[f64]| {
        let t = tensor_oracle(x);
        let p = t.ndim();
        let expected = vec![n; *order.get_or_insert(p)];
        if t.shape() != expected.as_slice() {
            return Err(SimplexError::OracleOutput {
                expected,
                found: t.shape().to_vec(),
            });
        }
        check_finite(x, t.iter())?;
        Ok(t)
    };
    estimate(x0, s, checked, |a, b| frobenius_norm(&(a - b)))
}

fn estimate<T, E, D>(
    x0: &[f64],
    s: &DirectionMatrix,
    mut eval: E,
    distance: D,
) -> Result<LipschitzEstimate>
where
    E: FnMut(&[f64]) -> Result<T>,
    D: Fn(&T, &T) -> f64,
{
    check_point(x0, &[s])?;
    let base = eval(x0)?;
    let mut best: Option<f64> = None;
    let mut x = vec![0.0; x0.len()];
    for i in 0..s.num_directions() {
        let step = s.column_norm(i);
        if step <= 0.0 {
            continue;
        }
        x.copy_from_slice(x0);
        s.add_scaled_column(i, 1.0, &mut x);
        let ratio = distance(&eval(&x)?, &base) / step;
        best = Some(best.map_or(ratio, |b| b.max(ratio)));
    }
    let result = match best {
        Some(l) => LipschitzEstimate::Estimated(l),
        None => LipschitzEstimate::Undefined,
    };
    debug!(?result, "Lipschitz estimate");
    Ok(result)
}

fn check_finite<'a>(x: &[f64], values: impl IntoIterator<Item = &'a f64>) -> Result<()> {
    match values.into_iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(SimplexError::NonFiniteOracleValue {
            point: x.to_vec(),
            value,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, IxDyn};

    #[test]
    fn gradient_of_quadratic_gives_operator_norm_along_columns() {
        // ∇f = A x with A = diag(2, 6): the quotient along eᵢ is Aᵢᵢ.
        let grad = |x: &[f64]| vec![2.0 * x[0], 6.0 * x[1]];
        let s = DirectionMatrix::scaled_identity(2, 0.1).unwrap();
        let l = lipschitz_from_gradients(&[1.0, 1.0], &s, grad).unwrap();
        assert_relative_eq!(l.value().unwrap(), 6.0, max_relative = 1e-12);
    }

    #[test]
    fn zero_directions_are_undefined_not_zero() {
        let s = DirectionMatrix::new(nalgebra::DMatrix::zeros(2, 2)).unwrap();
        let l = lipschitz_from_gradients(&[0.0, 0.0], &s, |x| x.to_vec()).unwrap();
        assert_eq!(l, LipschitzEstimate::Undefined);
        assert!(!l.is_defined());
        assert_eq!(l.unwrap_or(0.0), 0.0);
    }

    #[test]
    fn zero_columns_skipped() {
        let s = DirectionMatrix::from_columns(&[vec![0.0, 0.0], vec![0.5, 0.0]]).unwrap();
        let l = lipschitz_from_gradients(&[0.0, 0.0], &s, |x| vec![3.0 * x[0], 0.0]).unwrap();
        assert_relative_eq!(l.value().unwrap(), 3.0, max_relative = 1e-12);
    }

    #[test]
    fn hessian_differences_use_spectral_norm() {
        // H(x) = diag(x0, 2 x0): ΔH along e0 is diag(1, 2), spectral norm 2.
        let hess = |x: &[f64]| array![[x[0], 0.0], [0.0, 2.0 * x[0]]];
        let s = DirectionMatrix::identity(2).unwrap();
        let l = lipschitz_from_hessians(&[1.0, 1.0], &s, hess).unwrap();
        assert_relative_eq!(l.value().unwrap(), 2.0, max_relative = 1e-12);
    }

    #[test]
    fn tensor_differences_use_frobenius_norm() {
        let s = DirectionMatrix::identity(2).unwrap();
        let t = |x: &[f64]| ArrayD::from_elem(IxDyn(&[2, 2, 2]), x[1]);
        let l = lipschitz_from_tensors(&[0.0, 0.0], &s, t).unwrap();
        // Eight entries each changing by 1 along e1.
        assert_relative_eq!(l.value().unwrap(), 8.0_f64.sqrt(), max_relative = 1e-12);
    }

    #[test]
    fn tensor_order_must_be_stable() {
        let s = DirectionMatrix::identity(2).unwrap();
        let t = |x: &[f64]| {
            if x[0] == 0.0 && x[1] == 0.0 {
                ArrayD::zeros(IxDyn(&[2, 2]))
            } else {
                ArrayD::zeros(IxDyn(&[2, 2, 2]))
            }
        };
        assert!(matches!(
            lipschitz_from_tensors(&[0.0, 0.0], &s, t),
            Err(SimplexError::OracleOutput { .. })
        ));
    }

    #[test]
    fn wrong_gradient_length_rejected() {
        let s = DirectionMatrix::identity(2).unwrap();
        let err = lipschitz_from_gradients(&[0.0, 0.0], &s, |_| vec![0.0]).unwrap_err();
        assert!(matches!(err, SimplexError::OracleOutput { .. }));
    }
}
