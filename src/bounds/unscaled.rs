//! Error bounds for direction sets whose columns carry their own scale.

use ndarray::{Array1, Array2};
use tracing::debug;

use super::{check_lipschitz, warn_if_underdetermined};
use crate::config::SimplexConfig;
use crate::directions::{check_point, DirectionMatrix};
use crate::error::{Result, SimplexError};
use crate::pinv::Projector;

/// Simplex gradient: `L · max_i ‖sᵢ‖`.
pub fn gradient_bound(s: &DirectionMatrix, lipschitz: f64) -> Result<f64> {
    check_lipschitz(lipschitz)?;
    warn_if_underdetermined("unscaled gradient", &[s]);
    Ok(lipschitz * s.max_column_norm())
}

/// Simplex Hessian:
/// `4 · √(m k) · L · (δᵤ / δₗ) · ‖pinv(Ŝᵀ)‖₂ · ‖pinv(T̂ᵀ)‖₂ · δᵤ`
///
/// where `Ŝ = S / δ_S` and `T̂ = T / δ_T` are normalized by their maximum
/// column norms, and `δᵤ`, `δₗ` are the larger and smaller of `δ_S`, `δ_T`.
/// Scaling both sets by `c > 0` scales the bound by `c`.
pub fn hessian_bound(s: &DirectionMatrix, t: &DirectionMatrix, lipschitz: f64) -> Result<f64> {
    hessian_bound_with(s, t, lipschitz, &SimplexConfig::default())
}

/// [`hessian_bound`] with the pseudoinverse cutoff taken from `config`.
pub fn hessian_bound_with(
    s: &DirectionMatrix,
    t: &DirectionMatrix,
    lipschitz: f64,
    config: &SimplexConfig,
) -> Result<f64> {
    check_lipschitz(lipschitz)?;
    t.check_dim(s.dim(), "direction matrices must share a dimension")?;
    warn_if_underdetermined("unscaled Hessian", &[s, t]);

    let (s_hat, delta_s) = s.normalized()?;
    let (t_hat, delta_t) = t.normalized()?;
    let delta_upper = delta_s.max(delta_t);
    let delta_lower = delta_s.min(delta_t);
    let ps = Projector::with_rcond(&s_hat, config.rcond)?;
    let pt = Projector::with_rcond(&t_hat, config.rcond)?;

    let mk = (s.num_directions() * t.num_directions()) as f64;
    let bound = 4.0
        * mk.sqrt()
        * lipschitz
        * (delta_upper / delta_lower)
        * ps.spectral_norm()
        * pt.spectral_norm()
        * delta_upper;
    debug!(bound, delta_upper, delta_lower, "unscaled Hessian bound");
    Ok(bound)
}

/// Simplex gradient bound from the curvature at `x0`:
/// `½ · max_i |sᵢᵀ H sᵢ| / max_i ‖sᵢ‖`, with `H` from `hessian_oracle(x0)`.
pub fn gradient_bound_from_hessian<H>(
    x0: &[f64],
    s: &DirectionMatrix,
    hessian_oracle: H,
) -> Result<f64>
where
    H: Fn(&[f64]) -> Array2<f64>,
{
    check_point(x0, &[s])?;
    let n = x0.len();
    let hess = hessian_oracle(x0);
    if hess.dim() != (n, n) {
        return Err(SimplexError::OracleOutput {
            expected: vec![n, n],
            found: hess.shape().to_vec(),
        });
    }
    if let Some(&value) = hess.iter().find(|v| !v.is_finite()) {
        return Err(SimplexError::NonFiniteOracleValue {
            point: x0.to_vec(),
            value,
        });
    }
    warn_if_underdetermined("Hessian-based gradient", &[s]);

    let max_norm = s.max_column_norm();
    if max_norm <= 0.0 {
        return Err(SimplexError::DegenerateDirections(
            "every column of a direction set is zero",
        ));
    }
    let max_quad = (0..s.num_directions())
        .map(|i| {
            let col = Array1::from_iter(s.column(i).iter().copied());
            col.dot(&hess.dot(&col)).abs()
        })
        .fold(0.0, f64::max);
    Ok(0.5 * max_quad / max_norm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn gradient_bound_scales_with_column_norm() {
        let s = DirectionMatrix::scaled_identity(3, 0.01).unwrap();
        assert_relative_eq!(gradient_bound(&s, 5.0).unwrap(), 0.05, epsilon = 1e-15);
    }

    #[test]
    fn hessian_bound_for_scaled_identity() {
        // δᵤ = δₗ = h, normalized sets are I: 4 · 2 · L · 1 · 1 · 1 · h = 8 L h.
        let h = 0.1;
        let s = DirectionMatrix::scaled_identity(2, h).unwrap();
        let bound = hessian_bound(&s, &s, 1.0).unwrap();
        assert_relative_eq!(bound, 8.0 * h, max_relative = 1e-12);
    }

    #[test]
    fn hessian_bound_uses_norm_ratio() {
        let s = DirectionMatrix::scaled_identity(2, 1.0).unwrap();
        let t = DirectionMatrix::scaled_identity(2, 0.5).unwrap();
        // δᵤ = 1, δₗ = 0.5, both normalized sets are I.
        let bound = hessian_bound(&s, &t, 1.0).unwrap();
        assert_relative_eq!(bound, 4.0 * 2.0 * 2.0, max_relative = 1e-12);
    }

    #[test]
    fn hessian_bound_rejects_zero_directions() {
        let s = DirectionMatrix::identity(2).unwrap();
        let zero = DirectionMatrix::scaled_identity(2, 0.0).unwrap();
        assert!(matches!(
            hessian_bound(&s, &zero, 1.0),
            Err(SimplexError::DegenerateDirections(_))
        ));
    }

    #[test]
    fn curvature_bound_reads_quadratic_forms() {
        let s = DirectionMatrix::from_columns(&[vec![1.0, 0.0], vec![0.0, 2.0]]).unwrap();
        let h = |_: &[f64]| array![[2.0, 0.0], [0.0, -3.0]];
        // |s₁ᵀHs₁| = 2, |s₂ᵀHs₂| = 12, max norm 2.
        let bound = gradient_bound_from_hessian(&[0.0, 0.0], &s, h).unwrap();
        assert_relative_eq!(bound, 3.0, epsilon = 1e-15);
    }

    #[test]
    fn wrong_hessian_shape_rejected() {
        let s = DirectionMatrix::identity(2).unwrap();
        let err = gradient_bound_from_hessian(&[0.0, 0.0], &s, |_| Array2::zeros((3, 3)))
            .unwrap_err();
        assert_eq!(
            err,
            SimplexError::OracleOutput {
                expected: vec![2, 2],
                found: vec![3, 3]
            }
        );
    }
}
