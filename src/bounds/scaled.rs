//! Error bounds for unit-normalized direction sets with an explicit step.
//!
//! Each bound is linear in both the Lipschitz constant and `h`.

use tracing::debug;

use super::{check_lipschitz, warn_if_underdetermined};
use crate::config::validate_step;
use crate::directions::DirectionMatrix;
use crate::error::Result;

/// Simplex gradient: `(√m / 2) · L · h`, `L` the gradient's Lipschitz constant.
pub fn gradient_bound(s: &DirectionMatrix, lipschitz: f64, h: f64) -> Result<f64> {
    check_lipschitz(lipschitz)?;
    validate_step(0, h)?;
    warn_if_underdetermined("scaled gradient", &[s]);
    let m = s.num_directions() as f64;
    Ok(m.sqrt() / 2.0 * lipschitz * h)
}

/// Simplex Hessian: `4 · √(m k) · L · h`, `L` the Hessian's Lipschitz constant.
pub fn hessian_bound(
    s: &DirectionMatrix,
    t: &DirectionMatrix,
    lipschitz: f64,
    h: f64,
) -> Result<f64> {
    check_lipschitz(lipschitz)?;
    validate_step(0, h)?;
    warn_if_underdetermined("scaled Hessian", &[s, t]);
    let mk = (s.num_directions() * t.num_directions()) as f64;
    let bound = 4.0 * mk.sqrt() * lipschitz * h;
    debug!(bound, "scaled Hessian bound");
    Ok(bound)
}

/// Simplex Tressian: `(√(m k l) / 2) · L · h`, `L` the Tressian's Lipschitz
/// constant.
pub fn tressian_bound(
    s: &DirectionMatrix,
    t: &DirectionMatrix,
    u: &DirectionMatrix,
    lipschitz: f64,
    h: f64,
) -> Result<f64> {
    check_lipschitz(lipschitz)?;
    validate_step(0, h)?;
    warn_if_underdetermined("scaled Tressian", &[s, t, u]);
    let mkl = (s.num_directions() * t.num_directions() * u.num_directions()) as f64;
    Ok(mkl.sqrt() / 2.0 * lipschitz * h)
}
