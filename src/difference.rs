//! Forward simplex derivatives in closed form: gradient, Hessian, Tressian and
//! their order-`p` generalization.
//!
//! Every estimator follows the same pipeline: fill a [`SampleGrid`], take the
//! inclusion-exclusion delta tensor, then contract each axis against the
//! pseudoinverse of its direction set. The `_from_values` variants skip the
//! oracle and take grid values whose displacements already include the step
//! size, so no division by `h` is applied.
//!
//! ```
//! use simplex_deriv::{gradient, hessian, DirectionMatrix};
//!
//! let f = |x: &[f64]| x[0] * x[0] + 3.0 * x[0] * x[1];
//! let s = DirectionMatrix::identity(2).unwrap();
//! let h = hessian(&f, &[1.0, 2.0], &s, &s, 0.1).unwrap();
//! assert!((h[[0, 1]] - 3.0).abs() < 1e-10);
//! let g = gradient(&f, &[1.0, 2.0], &s, 1e-6).unwrap();
//! assert!((g[1] - 3.0).abs() < 1e-6);
//! ```

use ndarray::{Array1, Array2, Array3, ArrayD, Ix1, Ix2, Ix3};
use tracing::debug;

use crate::config::{validate_step, SimplexConfig, StepSizes};
use crate::directions::{check_point, DirectionMatrix};
use crate::error::{Result, SimplexError};
use crate::grid::SampleGrid;
use crate::oracle::Oracle;
use crate::pinv::{contract_all, Projector};

/// Order-`p` forward simplex derivative, one direction set per axis.
///
/// Returns an `(n, …, n)` tensor with `p = directions.len()` axes.
pub fn forward_derivative<O: Oracle + ?Sized>(
    oracle: &O,
    x0: &[f64],
    directions: &[&DirectionMatrix],
    steps: impl Into<StepSizes>,
) -> Result<ArrayD<f64>> {
    forward_derivative_with(oracle, x0, directions, steps, &SimplexConfig::default())
}

/// [`forward_derivative`] with explicit numerical settings.
pub fn forward_derivative_with<O: Oracle + ?Sized>(
    oracle: &O,
    x0: &[f64],
    directions: &[&DirectionMatrix],
    steps: impl Into<StepSizes>,
    config: &SimplexConfig,
) -> Result<ArrayD<f64>> {
    if directions.is_empty() {
        return Err(SimplexError::NoLevels);
    }
    let steps = steps.into().resolve(directions.len())?;
    check_point(x0, directions)?;
    let projectors = projectors(directions, config)?;
    let grid = SampleGrid::from_oracle(oracle, x0, directions, &steps, config)?;
    let delta = grid.delta(&steps)?;
    debug!(
        order = directions.len(),
        evaluations = grid.num_evaluations(),
        "forward simplex derivative"
    );
    project(&delta, &projectors)
}

/// Order-`p` simplex derivative from a precomputed `(m₁+1, …, mₚ+1)` grid.
pub fn forward_derivative_from_values(
    values: &ArrayD<f64>,
    directions: &[&DirectionMatrix],
) -> Result<ArrayD<f64>> {
    forward_derivative_from_values_with(values, directions, &SimplexConfig::default())
}

/// [`forward_derivative_from_values`] with explicit numerical settings.
pub fn forward_derivative_from_values_with(
    values: &ArrayD<f64>,
    directions: &[&DirectionMatrix],
    config: &SimplexConfig,
) -> Result<ArrayD<f64>> {
    let grid = SampleGrid::from_values(values.clone(), directions)?;
    let n = directions[0].dim();
    for d in &directions[1..] {
        d.check_dim(n, "direction matrices must share a dimension")?;
    }
    let projectors = projectors(directions, config)?;
    let delta = grid.delta(&vec![1.0; directions.len()])?;
    project(&delta, &projectors)
}

/// Simplex gradient: `pinv(Sᵀ) · δ` with `δᵢ = (f(x0 + h sᵢ) − f(x0)) / h`.
///
/// Costs `m + 1` evaluations.
pub fn gradient<O: Oracle + ?Sized>(
    oracle: &O,
    x0: &[f64],
    s: &DirectionMatrix,
    h: f64,
) -> Result<Array1<f64>> {
    gradient_with(oracle, x0, s, h, &SimplexConfig::default())
}

/// [`gradient`] with explicit numerical settings.
pub fn gradient_with<O: Oracle + ?Sized>(
    oracle: &O,
    x0: &[f64],
    s: &DirectionMatrix,
    h: f64,
    config: &SimplexConfig,
) -> Result<Array1<f64>> {
    Ok(forward_derivative_with(oracle, x0, &[s], h, config)?.into_dimensionality::<Ix1>()?)
}

/// Simplex gradient from `v = [f(x0), f(x0 + s₁), …, f(x0 + sₘ)]`.
pub fn gradient_from_values(values: &[f64], s: &DirectionMatrix) -> Result<Array1<f64>> {
    let m = s.num_directions();
    if values.len() != m + 1 {
        return Err(SimplexError::ValuesShape {
            expected: vec![m + 1],
            found: vec![values.len()],
        });
    }
    let values = Array1::from(values.to_vec()).into_dyn();
    Ok(forward_derivative_from_values(&values, &[s])?.into_dimensionality::<Ix1>()?)
}

/// Simplex Hessian: `pinv(Sᵀ) · δ · pinv(Tᵀ)ᵀ` with
/// `δᵢⱼ = (f₁₁ − f₁₀ − f₀₁ + f₀₀) / h²`.
///
/// Costs `(m + 1)(k + 1)` evaluations.
pub fn hessian<O: Oracle + ?Sized>(
    oracle: &O,
    x0: &[f64],
    s: &DirectionMatrix,
    t: &DirectionMatrix,
    h: f64,
) -> Result<Array2<f64>> {
    hessian_with(oracle, x0, s, t, h, &SimplexConfig::default())
}

/// [`hessian`] with explicit numerical settings.
pub fn hessian_with<O: Oracle + ?Sized>(
    oracle: &O,
    x0: &[f64],
    s: &DirectionMatrix,
    t: &DirectionMatrix,
    h: f64,
    config: &SimplexConfig,
) -> Result<Array2<f64>> {
    Ok(forward_derivative_with(oracle, x0, &[s, t], h, config)?.into_dimensionality::<Ix2>()?)
}

/// Simplex Hessian from an `(m+1) × (k+1)` grid:
/// `v[0,0] = f(x0)`, `v[i,0] = f(x0 + sᵢ)`, `v[0,j] = f(x0 + tⱼ)`,
/// `v[i,j] = f(x0 + sᵢ + tⱼ)`.
pub fn hessian_from_values(
    values: &Array2<f64>,
    s: &DirectionMatrix,
    t: &DirectionMatrix,
) -> Result<Array2<f64>> {
    let values = values.clone().into_dyn();
    Ok(forward_derivative_from_values(&values, &[s, t])?.into_dimensionality::<Ix2>()?)
}

/// Simplex Tressian (third derivative tensor), `δ` contracted against
/// `pinv(Sᵀ)`, `pinv(Tᵀ)` and `pinv(Uᵀ)`.
///
/// Costs `(m + 1)(k + 1)(l + 1)` evaluations.
pub fn tressian<O: Oracle + ?Sized>(
    oracle: &O,
    x0: &[f64],
    s: &DirectionMatrix,
    t: &DirectionMatrix,
    u: &DirectionMatrix,
    h: f64,
) -> Result<Array3<f64>> {
    tressian_with(oracle, x0, s, t, u, h, &SimplexConfig::default())
}

/// [`tressian`] with explicit numerical settings.
pub fn tressian_with<O: Oracle + ?Sized>(
    oracle: &O,
    x0: &[f64],
    s: &DirectionMatrix,
    t: &DirectionMatrix,
    u: &DirectionMatrix,
    h: f64,
    config: &SimplexConfig,
) -> Result<Array3<f64>> {
    Ok(forward_derivative_with(oracle, x0, &[s, t, u], h, config)?.into_dimensionality::<Ix3>()?)
}

/// Simplex Tressian from an `(m+1) × (k+1) × (l+1)` grid, indexed as in
/// [`hessian_from_values`] with a third axis.
pub fn tressian_from_values(
    values: &Array3<f64>,
    s: &DirectionMatrix,
    t: &DirectionMatrix,
    u: &DirectionMatrix,
) -> Result<Array3<f64>> {
    let values = values.clone().into_dyn();
    Ok(forward_derivative_from_values(&values, &[s, t, u])?.into_dimensionality::<Ix3>()?)
}

/// Secondary direction sets for [`hessian_nested`].
#[derive(Debug, Clone, PartialEq)]
pub enum SecondaryDirections {
    /// One set `T` used for every column of `S`.
    Shared(DirectionMatrix),
    /// One set `Tᵢ` per column `sᵢ` of `S`.
    PerColumn(Vec<DirectionMatrix>),
}

impl SecondaryDirections {
    fn for_column(&self, i: usize) -> &DirectionMatrix {
        match self {
            SecondaryDirections::Shared(t) => t,
            SecondaryDirections::PerColumn(ts) => &ts[i],
        }
    }

    pub(crate) fn negated(&self) -> Self {
        match self {
            SecondaryDirections::Shared(t) => SecondaryDirections::Shared(t.negated()),
            SecondaryDirections::PerColumn(ts) => {
                SecondaryDirections::PerColumn(ts.iter().map(DirectionMatrix::negated).collect())
            }
        }
    }

    fn check(&self, n: usize, m: usize) -> Result<()> {
        match self {
            SecondaryDirections::Shared(t) => {
                t.check_dim(n, "secondary direction rows vs. base point length")
            }
            SecondaryDirections::PerColumn(ts) => {
                if ts.len() != m {
                    return Err(SimplexError::DimensionMismatch {
                        context: "one secondary direction set per primary column",
                        expected: m,
                        found: ts.len(),
                    });
                }
                ts.iter().try_for_each(|t| {
                    t.check_dim(n, "secondary direction rows vs. base point length")
                })
            }
        }
    }
}

/// Hessian as the simplex gradient of simplex gradients.
///
/// Row `i` of the intermediate matrix is
/// `(∇ₛ f(x0 + h₁ sᵢ; Tᵢ, h₂) − ∇ₛ f(x0; Tᵢ, h₂)) / h₁`, and the estimate is
/// `pinv(Sᵀ)` applied to it. With a shared `T` the base gradient is computed
/// once.
pub fn hessian_nested<O: Oracle + ?Sized>(
    oracle: &O,
    x0: &[f64],
    s: &DirectionMatrix,
    secondary: &SecondaryDirections,
    h1: f64,
    h2: f64,
) -> Result<Array2<f64>> {
    hessian_nested_with(oracle, x0, s, secondary, h1, h2, &SimplexConfig::default())
}

/// [`hessian_nested`] with explicit numerical settings.
pub fn hessian_nested_with<O: Oracle + ?Sized>(
    oracle: &O,
    x0: &[f64],
    s: &DirectionMatrix,
    secondary: &SecondaryDirections,
    h1: f64,
    h2: f64,
    config: &SimplexConfig,
) -> Result<Array2<f64>> {
    validate_step(0, h1)?;
    validate_step(1, h2)?;
    check_point(x0, &[s])?;
    let (n, m) = (s.dim(), s.num_directions());
    secondary.check(n, m)?;
    let ps = Projector::with_rcond(s, config.rcond)?;

    let shared_base = match secondary {
        SecondaryDirections::Shared(t) => Some(gradient_with(oracle, x0, t, h2, config)?),
        SecondaryDirections::PerColumn(_) => None,
    };

    let mut slices = Array2::zeros((m, n));
    let mut x = vec![0.0; n];
    for i in 0..m {
        let t = secondary.for_column(i);
        x.copy_from_slice(x0);
        s.add_scaled_column(i, h1, &mut x);
        let moved = gradient_with(oracle, &x, t, h2, config)?;
        let base = match &shared_base {
            Some(g) => g.clone(),
            None => gradient_with(oracle, x0, t, h2, config)?,
        };
        slices.row_mut(i).assign(&((moved - base) / h1));
    }
    debug!(m, n, "nested simplex Hessian");
    Ok(ps.matrix().dot(&slices))
}

pub(crate) fn projectors(
    directions: &[&DirectionMatrix],
    config: &SimplexConfig,
) -> Result<Vec<Projector>> {
    directions
        .iter()
        .map(|d| Projector::with_rcond(d, config.rcond))
        .collect()
}

pub(crate) fn project(delta: &ArrayD<f64>, projectors: &[Projector]) -> Result<ArrayD<f64>> {
    let refs: Vec<&Projector> = projectors.iter().collect();
    contract_all(delta, &refs)
}
