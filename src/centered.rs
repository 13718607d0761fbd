//! Centered simplex derivatives.
//!
//! A centered estimate is the mean of a forward estimate along `D` and the
//! same forward estimate along `−D`. The odd-order error terms cancel, so the
//! centered gradient and Hessian are exact on quadratics. The combiner never
//! looks inside the forward formula: anything of the form
//! `Fn(&D) -> Result<Array>` can be centered.

use ndarray::{Array, Array1, Array2, Dimension};

use crate::config::SimplexConfig;
use crate::difference::{
    gradient_from_values, gradient_with, hessian_from_values, hessian_nested_with, hessian_with,
    SecondaryDirections,
};
use crate::directions::DirectionMatrix;
use crate::error::{Result, SimplexError};
use crate::oracle::Oracle;

/// Direction sets that can be reflected through the base point.
pub trait Reflect {
    /// The set with every direction negated.
    fn reflected(&self) -> Self;
}

impl Reflect for DirectionMatrix {
    fn reflected(&self) -> Self {
        self.negated()
    }
}

impl Reflect for SecondaryDirections {
    fn reflected(&self) -> Self {
        self.negated()
    }
}

impl<D: Reflect> Reflect for Vec<D> {
    fn reflected(&self) -> Self {
        self.iter().map(Reflect::reflected).collect()
    }
}

impl<A: Reflect, B: Reflect> Reflect for (A, B) {
    fn reflected(&self) -> Self {
        (self.0.reflected(), self.1.reflected())
    }
}

/// `½ (forward(dirs) + forward(−dirs))`.
pub fn centered<D, E, F>(forward: F, dirs: &D) -> Result<Array<f64, E>>
where
    D: Reflect,
    E: Dimension,
    F: Fn(&D) -> Result<Array<f64, E>>,
{
    let plus = forward(dirs)?;
    let minus = forward(&dirs.reflected())?;
    average(plus, minus)
}

fn average<E: Dimension>(plus: Array<f64, E>, minus: Array<f64, E>) -> Result<Array<f64, E>> {
    if plus.shape() != minus.shape() {
        return Err(SimplexError::ValuesShape {
            expected: plus.shape().to_vec(),
            found: minus.shape().to_vec(),
        });
    }
    Ok((plus + &minus) * 0.5)
}

/// Centered simplex gradient. Costs `2m + 2` evaluations.
pub fn centered_gradient<O: Oracle + ?Sized>(
    oracle: &O,
    x0: &[f64],
    s: &DirectionMatrix,
    h: f64,
) -> Result<Array1<f64>> {
    centered_gradient_with(oracle, x0, s, h, &SimplexConfig::default())
}

/// [`centered_gradient`] with explicit numerical settings.
pub fn centered_gradient_with<O: Oracle + ?Sized>(
    oracle: &O,
    x0: &[f64],
    s: &DirectionMatrix,
    h: f64,
    config: &SimplexConfig,
) -> Result<Array1<f64>> {
    centered(|d| gradient_with(oracle, x0, d, h, config), s)
}

/// Centered simplex Hessian: `S` and `T` are negated together.
pub fn centered_hessian<O: Oracle + ?Sized>(
    oracle: &O,
    x0: &[f64],
    s: &DirectionMatrix,
    t: &DirectionMatrix,
    h: f64,
) -> Result<Array2<f64>> {
    centered_hessian_with(oracle, x0, s, t, h, &SimplexConfig::default())
}

/// [`centered_hessian`] with explicit numerical settings.
pub fn centered_hessian_with<O: Oracle + ?Sized>(
    oracle: &O,
    x0: &[f64],
    s: &DirectionMatrix,
    t: &DirectionMatrix,
    h: f64,
    config: &SimplexConfig,
) -> Result<Array2<f64>> {
    centered(
        |(s, t): &(DirectionMatrix, DirectionMatrix)| hessian_with(oracle, x0, s, t, h, config),
        &(s.clone(), t.clone()),
    )
}

/// Centered simplex gradient from two value vectors:
/// `plus = [f(x0), f(x0 + s₁), …]` and `minus = [f(x0), f(x0 − s₁), …]`.
pub fn centered_gradient_from_values(
    plus: &[f64],
    minus: &[f64],
    s: &DirectionMatrix,
) -> Result<Array1<f64>> {
    average(
        gradient_from_values(plus, s)?,
        gradient_from_values(minus, &s.reflected())?,
    )
}

/// Centered simplex Hessian from two grids, the second sampled along `−S`
/// and `−T`.
pub fn centered_hessian_from_values(
    plus: &Array2<f64>,
    minus: &Array2<f64>,
    s: &DirectionMatrix,
    t: &DirectionMatrix,
) -> Result<Array2<f64>> {
    average(
        hessian_from_values(plus, s, t)?,
        hessian_from_values(minus, &s.reflected(), &t.reflected())?,
    )
}

/// Centered form of [`hessian_nested`](crate::difference::hessian_nested):
/// the primary set and every secondary set are negated together.
pub fn centered_hessian_nested<O: Oracle + ?Sized>(
    oracle: &O,
    x0: &[f64],
    s: &DirectionMatrix,
    secondary: &SecondaryDirections,
    h1: f64,
    h2: f64,
) -> Result<Array2<f64>> {
    centered_hessian_nested_with(oracle, x0, s, secondary, h1, h2, &SimplexConfig::default())
}

/// [`centered_hessian_nested`] with explicit numerical settings.
pub fn centered_hessian_nested_with<O: Oracle + ?Sized>(
    oracle: &O,
    x0: &[f64],
    s: &DirectionMatrix,
    secondary: &SecondaryDirections,
    h1: f64,
    h2: f64,
    config: &SimplexConfig,
) -> Result<Array2<f64>> {
    centered(
        |(s, t): &(DirectionMatrix, SecondaryDirections)| {
            hessian_nested_with(oracle, x0, s, t, h1, h2, config)
        },
        &(s.clone(), secondary.clone()),
    )
}
