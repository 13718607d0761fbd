//! Reference Lipschitz constants from exact higher derivatives.
//!
//! The largest absolute `(k+1)`-th partial at a point stands in for the
//! Lipschitz constant of the `k`-th derivative near that point. It is a local
//! quantity, not a certified bound over a region.

use crate::error::Result;
use crate::exact::derivative_tensor;
use crate::jet::Jet;

/// `max |∂ᵖf / ∂x_{i₁}⋯∂x_{iₚ}|` at `x`.
pub fn max_abs_derivative<const K: usize, Func>(f: Func, x: &[f64], order: usize) -> Result<f64>
where
    Func: Fn(&[Jet<f64, K>]) -> Jet<f64, K>,
{
    let t = derivative_tensor(f, x, order)?;
    Ok(t.iter().fold(0.0, |m, v| m.max(v.abs())))
}

/// Hessian Lipschitz estimate: the largest third partial. Needs `K ≥ 4`.
pub fn hessian_lipschitz<const K: usize, Func>(f: Func, x: &[f64]) -> Result<f64>
where
    Func: Fn(&[Jet<f64, K>]) -> Jet<f64, K>,
{
    max_abs_derivative(f, x, 3)
}

/// Tressian Lipschitz estimate: the largest fourth partial. Needs `K ≥ 5`.
pub fn tressian_lipschitz<const K: usize, Func>(f: Func, x: &[f64]) -> Result<f64>
where
    Func: Fn(&[Jet<f64, K>]) -> Jet<f64, K>,
{
    max_abs_derivative(f, x, 4)
}
