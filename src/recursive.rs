//! Generalized simplex derivatives of arbitrary order.
//!
//! The order-`p` estimate at `x` with levels `(S₁, h₁), …, (Sₚ, hₚ)` is built
//! from order-`(p−1)` estimates over the tail levels `(S₂, h₂), …, (Sₚ, hₚ)`:
//!
//! ```text
//! base      = D^{p−1} f(x)
//! slice_j   = (D^{p−1} f(x + h₁ S₁[:, j]) − base) / h₁      j = 1..m₁
//! D^p f(x)  = pinv(S₁ᵀ) ×₀ stack(slice_1, …, slice_m₁)
//! ```
//!
//! bottoming out at the simplex gradient for one level. For one level this is
//! exactly [`gradient`](crate::gradient); for two levels it is exactly
//! [`hessian`](crate::hessian) with `S = S₁`, `T = S₂`. An order-`p` pass
//! costs `∏ᵢ (mᵢ + 1)` oracle evaluations.
//!
//! A [`SimplexEngine`] validates the levels and computes one pseudoinverse
//! per level up front, then evaluates at as many base points as needed.

use std::collections::BTreeMap;

use ndarray::{stack, ArrayD, ArrayView1, ArrayView2, ArrayView3, ArrayViewD, Axis, Ix1, Ix2, Ix3};
use tracing::debug;

use crate::config::{SimplexConfig, StepSizes};
use crate::directions::{check_point, DirectionMatrix};
use crate::error::{Result, SimplexError};
use crate::grid::{checked_product, SampleGrid};
use crate::oracle::Oracle;
use crate::pinv::Projector;

/// One recursion level: a direction set, its step and its pseudoinverse.
#[derive(Debug, Clone)]
pub(crate) struct Level {
    pub(crate) directions: DirectionMatrix,
    pub(crate) step: f64,
    pub(crate) projector: Projector,
}

/// Planned multi-level simplex derivative, reusable across base points.
///
/// ```
/// use simplex_deriv::{DirectionMatrix, SimplexEngine};
///
/// let f = |x: &[f64]| x[0] * x[0] * x[1];
/// let d = DirectionMatrix::identity(2).unwrap();
/// let engine = SimplexEngine::new(vec![d.clone(), d.clone(), d], 1e-2).unwrap();
/// let layers = engine.derivatives(&f, &[1.0, 2.0]).unwrap();
/// let hess = layers.hessian().unwrap();
/// // Forward differences of x0² x1 carry an O(h) bias: 2 x0 + h.
/// assert!((hess[[0, 1]] - 2.01).abs() < 1e-8);
/// assert_eq!(engine.total_evaluation_count(), Some(3 + 9 + 27));
/// ```
#[derive(Debug, Clone)]
pub struct SimplexEngine {
    pub(crate) levels: Vec<Level>,
    pub(crate) config: SimplexConfig,
}

impl SimplexEngine {
    /// Plan with default numerical settings.
    ///
    /// `directions[0]` is the outermost level `S₁`. All direction sets must
    /// share their row count.
    pub fn new(directions: Vec<DirectionMatrix>, steps: impl Into<StepSizes>) -> Result<Self> {
        Self::with_config(directions, steps, SimplexConfig::default())
    }

    pub fn with_config(
        directions: Vec<DirectionMatrix>,
        steps: impl Into<StepSizes>,
        config: SimplexConfig,
    ) -> Result<Self> {
        let first = directions.first().ok_or(SimplexError::NoLevels)?;
        let n = first.dim();
        for d in &directions[1..] {
            d.check_dim(n, "direction matrices must share a dimension")?;
        }
        let steps = steps.into().resolve(directions.len())?;

        let levels = directions
            .into_iter()
            .zip(steps)
            .map(|(directions, step)| {
                let projector = Projector::with_rcond(&directions, config.rcond)?;
                Ok(Level {
                    directions,
                    step,
                    projector,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(
            levels = levels.len(),
            n,
            columns = ?levels.iter().map(|l| l.directions.num_directions()).collect::<Vec<_>>(),
            "simplex engine planned"
        );
        Ok(SimplexEngine { levels, config })
    }

    /// Highest order this engine can compute.
    pub fn max_order(&self) -> usize {
        self.levels.len()
    }

    /// Ambient dimension `n`.
    pub fn dim(&self) -> usize {
        self.levels[0].directions.dim()
    }

    pub fn directions(&self, level: usize) -> Option<&DirectionMatrix> {
        self.levels.get(level).map(|l| &l.directions)
    }

    pub fn steps(&self) -> Vec<f64> {
        self.levels.iter().map(|l| l.step).collect()
    }

    /// Oracle evaluations for one order-`p` pass: `∏ᵢ₌₁ᵖ (mᵢ + 1)`.
    ///
    /// `Some(0)` for an order this engine cannot compute, `None` when the
    /// count does not fit in a `usize`.
    pub fn evaluation_count(&self, order: usize) -> Option<usize> {
        if order == 0 || order > self.max_order() {
            return Some(0);
        }
        let sizes: Vec<usize> = self.levels[..order]
            .iter()
            .map(|l| l.directions.num_directions() + 1)
            .collect();
        checked_product(&sizes)
    }

    /// Oracle evaluations for [`derivatives`](Self::derivatives), `None` on
    /// overflow.
    pub fn total_evaluation_count(&self) -> Option<usize> {
        (1..=self.max_order())
            .try_fold(0usize, |acc, p| acc.checked_add(self.evaluation_count(p)?))
    }

    /// The order-`p` estimate at `x0`, using levels `1..=p`.
    pub fn derivative<O: Oracle + ?Sized>(
        &self,
        oracle: &O,
        x0: &[f64],
        order: usize,
    ) -> Result<ArrayD<f64>> {
        self.check_call(x0, order)?;
        let out = self.recurse(oracle, x0, &self.levels[..order])?;
        debug!(order, evaluations = ?self.evaluation_count(order), "simplex derivative");
        Ok(out)
    }

    /// Every order `1..=P` at `x0`.
    pub fn derivatives<O: Oracle + ?Sized>(
        &self,
        oracle: &O,
        x0: &[f64],
    ) -> Result<DerivativeLayers> {
        let mut layers = DerivativeLayers::default();
        for p in 1..=self.max_order() {
            layers.insert(p, self.derivative(oracle, x0, p)?);
        }
        Ok(layers)
    }

    pub(crate) fn check_call(&self, x0: &[f64], order: usize) -> Result<()> {
        if order == 0 || order > self.max_order() {
            return Err(SimplexError::OrderOutOfRange {
                order,
                max: self.max_order(),
            });
        }
        if self.evaluation_count(order).is_none() {
            return Err(SimplexError::GridTooLarge {
                shape: self.levels[..order]
                    .iter()
                    .map(|l| l.directions.num_directions() + 1)
                    .collect(),
            });
        }
        let dirs: Vec<&DirectionMatrix> = self.levels.iter().map(|l| &l.directions).collect();
        check_point(x0, &dirs)
    }

    pub(crate) fn recurse<O: Oracle + ?Sized>(
        &self,
        oracle: &O,
        x: &[f64],
        levels: &[Level],
    ) -> Result<ArrayD<f64>> {
        let (top, tail) = match levels.split_first() {
            Some(split) => split,
            None => return Err(SimplexError::NoLevels),
        };
        if tail.is_empty() {
            return self.gradient_at(oracle, x, top);
        }

        let base = self.recurse(oracle, x, tail)?;
        let lowers = (0..top.directions.num_directions())
            .map(|j| {
                let xj = shifted(x, top, j);
                self.recurse(oracle, &xj, tail)
            })
            .collect::<Result<Vec<_>>>()?;
        fold_level(top, &base, lowers)
    }

    fn gradient_at<O: Oracle + ?Sized>(
        &self,
        oracle: &O,
        x: &[f64],
        level: &Level,
    ) -> Result<ArrayD<f64>> {
        let grid = SampleGrid::from_oracle(
            oracle,
            x,
            &[&level.directions],
            &[level.step],
            &self.config,
        )?;
        let delta = grid.delta(&[level.step])?;
        level.projector.contract_axis(&delta, 0)
    }
}

/// `x + h · S[:, j]` for the level's direction set.
pub(crate) fn shifted(x: &[f64], level: &Level, j: usize) -> Vec<f64> {
    let mut xj = x.to_vec();
    level.directions.add_scaled_column(j, level.step, &mut xj);
    xj
}

/// Difference each lower-order estimate against `base`, stack the slices on
/// a new leading axis and contract it against the level's pseudoinverse.
pub(crate) fn fold_level(
    level: &Level,
    base: &ArrayD<f64>,
    lowers: Vec<ArrayD<f64>>,
) -> Result<ArrayD<f64>> {
    let slices: Vec<ArrayD<f64>> = lowers
        .into_iter()
        .map(|lower| (lower - base) / level.step)
        .collect();
    let views: Vec<ArrayViewD<'_, f64>> = slices.iter().map(|s| s.view()).collect();
    let stacked = stack(Axis(0), &views)?;
    level.projector.contract_axis(&stacked, 0)
}

/// Derivative tensors keyed by order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivativeLayers {
    layers: BTreeMap<usize, ArrayD<f64>>,
}

impl DerivativeLayers {
    pub(crate) fn insert(&mut self, order: usize, tensor: ArrayD<f64>) {
        self.layers.insert(order, tensor);
    }

    /// The order-`p` tensor, shape `(n, …, n)`.
    pub fn get(&self, order: usize) -> Option<&ArrayD<f64>> {
        self.layers.get(&order)
    }

    pub fn gradient(&self) -> Option<ArrayView1<'_, f64>> {
        self.get(1)?.view().into_dimensionality::<Ix1>().ok()
    }

    pub fn hessian(&self) -> Option<ArrayView2<'_, f64>> {
        self.get(2)?.view().into_dimensionality::<Ix2>().ok()
    }

    pub fn tressian(&self) -> Option<ArrayView3<'_, f64>> {
        self.get(3)?.view().into_dimensionality::<Ix3>().ok()
    }

    pub fn max_order(&self) -> usize {
        self.layers.keys().next_back().copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &ArrayD<f64>)> {
        self.layers.iter().map(|(&p, t)| (p, t))
    }

    pub fn into_inner(self) -> BTreeMap<usize, ArrayD<f64>> {
        self.layers
    }
}

/// Every order `1..=directions.len()` in one call.
///
/// ```
/// use simplex_deriv::{simplex_derivatives, DirectionMatrix};
///
/// let f = |x: &[f64]| x[0] * x[0] + x[1] * x[1];
/// let d = DirectionMatrix::identity(2).unwrap();
/// let layers = simplex_derivatives(&f, &[1.0, 1.0], &[d.clone(), d], 0.01).unwrap();
/// let g = layers.gradient().unwrap();
/// assert!((g[0] - 2.01).abs() < 1e-10);
/// ```
pub fn simplex_derivatives<O: Oracle + ?Sized>(
    oracle: &O,
    x0: &[f64],
    directions: &[DirectionMatrix],
    steps: impl Into<StepSizes>,
) -> Result<DerivativeLayers> {
    SimplexEngine::new(directions.to_vec(), steps)?.derivatives(oracle, x0)
}
