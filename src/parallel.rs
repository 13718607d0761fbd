//! Parallel evaluation with rayon.
//!
//! Oracle samples are independent, so the sample grid is filled from a
//! parallel iterator. The delta tensor is always complete before the
//! contraction runs, and results equal the serial estimators'.

use ndarray::{Array1, Array2, Array3, ArrayD, Ix1, Ix2, Ix3, IxDyn};
use rayon::prelude::*;
use tracing::debug;

use crate::config::{SimplexConfig, StepSizes};
use crate::difference::{project, projectors};
use crate::directions::DirectionMatrix;
use crate::error::{Result, SimplexError};
use crate::grid::{check_levels, grid_len, grid_shape, sample_point, unravel, SampleGrid};
use crate::oracle::{sample, Oracle};
use crate::recursive::{fold_level, shifted, DerivativeLayers, SimplexEngine};

impl SampleGrid {
    /// Parallel [`SampleGrid::from_oracle`].
    pub fn from_oracle_par<O: Oracle + Sync + ?Sized>(
        oracle: &O,
        x0: &[f64],
        directions: &[&DirectionMatrix],
        steps: &[f64],
        config: &SimplexConfig,
    ) -> Result<Self> {
        check_levels(x0, directions, steps)?;
        let shape = grid_shape(directions);
        let total = grid_len(&shape)?;

        let values = (0..total)
            .into_par_iter()
            .map(|flat| {
                let mut index = vec![0usize; shape.len()];
                unravel(flat, &shape, &mut index);
                let x = sample_point(x0, directions, steps, &index);
                sample(oracle, &x, config)
            })
            .collect::<Result<Vec<f64>>>()?;
        debug!(order = shape.len(), ?shape, evaluations = total, "sample grid filled in parallel");

        Ok(SampleGrid::from_array(ArrayD::from_shape_vec(
            IxDyn(&shape),
            values,
        )?))
    }
}

/// Parallel [`forward_derivative`](crate::forward_derivative).
pub fn forward_derivative_par<O: Oracle + Sync + ?Sized>(
    oracle: &O,
    x0: &[f64],
    directions: &[&DirectionMatrix],
    steps: impl Into<StepSizes>,
) -> Result<ArrayD<f64>> {
    forward_derivative_par_with(oracle, x0, directions, steps, &SimplexConfig::default())
}

/// [`forward_derivative_par`] with explicit numerical settings.
pub fn forward_derivative_par_with<O: Oracle + Sync + ?Sized>(
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
    let projectors = projectors(directions, config)?;
    let grid = SampleGrid::from_oracle_par(oracle, x0, directions, &steps, config)?;
    project(&grid.delta(&steps)?, &projectors)
}

/// Parallel [`gradient`](crate::gradient).
pub fn gradient_par<O: Oracle + Sync + ?Sized>(
    oracle: &O,
    x0: &[f64],
    s: &DirectionMatrix,
    h: f64,
) -> Result<Array1<f64>> {
    gradient_par_with(oracle, x0, s, h, &SimplexConfig::default())
}

/// [`gradient_par`] with explicit numerical settings.
pub fn gradient_par_with<O: Oracle + Sync + ?Sized>(
    oracle: &O,
    x0: &[f64],
    s: &DirectionMatrix,
    h: f64,
    config: &SimplexConfig,
) -> Result<Array1<f64>> {
    Ok(forward_derivative_par_with(oracle, x0, &[s], h, config)?.into_dimensionality::<Ix1>()?)
}

/// Parallel [`hessian`](crate::hessian).
pub fn hessian_par<O: Oracle + Sync + ?Sized>(
    oracle: &O,
    x0: &[f64],
    s: &DirectionMatrix,
    t: &DirectionMatrix,
    h: f64,
) -> Result<Array2<f64>> {
    hessian_par_with(oracle, x0, s, t, h, &SimplexConfig::default())
}

/// [`hessian_par`] with explicit numerical settings.
pub fn hessian_par_with<O: Oracle + Sync + ?Sized>(
    oracle: &O,
    x0: &[f64],
    s: &DirectionMatrix,
    t: &DirectionMatrix,
    h: f64,
    config: &SimplexConfig,
) -> Result<Array2<f64>> {
    Ok(forward_derivative_par_with(oracle, x0, &[s, t], h, config)?
        .into_dimensionality::<Ix2>()?)
}

/// Parallel [`tressian`](crate::tressian).
pub fn tressian_par<O: Oracle + Sync + ?Sized>(
    oracle: &O,
    x0: &[f64],
    s: &DirectionMatrix,
    t: &DirectionMatrix,
    u: &DirectionMatrix,
    h: f64,
) -> Result<Array3<f64>> {
    tressian_par_with(oracle, x0, s, t, u, h, &SimplexConfig::default())
}

/// [`tressian_par`] with explicit numerical settings.
pub fn tressian_par_with<O: Oracle + Sync + ?Sized>(
    oracle: &O,
    x0: &[f64],
    s: &DirectionMatrix,
    t: &DirectionMatrix,
    u: &DirectionMatrix,
    h: f64,
    config: &SimplexConfig,
) -> Result<Array3<f64>> {
    Ok(forward_derivative_par_with(oracle, x0, &[s, t, u], h, config)?
        .into_dimensionality::<Ix3>()?)
}

impl SimplexEngine {
    /// Parallel [`derivative`](Self::derivative): the base point and each
    /// column of the outermost level are evaluated concurrently.
    pub fn derivative_par<O: Oracle + Sync + ?Sized>(
        &self,
        oracle: &O,
        x0: &[f64],
        order: usize,
    ) -> Result<ArrayD<f64>> {
        self.check_call(x0, order)?;
        let levels = &self.levels[..order];
        let top = &levels[0];
        if order == 1 {
            let grid = SampleGrid::from_oracle_par(
                oracle,
                x0,
                &[&top.directions],
                &[top.step],
                &self.config,
            )?;
            return top.projector.contract_axis(&grid.delta(&[top.step])?, 0);
        }

        let tail = &levels[1..];
        let mut estimates = (0..=top.directions.num_directions())
            .into_par_iter()
            .map(|j| match j {
                0 => self.recurse(oracle, x0, tail),
                _ => self.recurse(oracle, &shifted(x0, top, j - 1), tail),
            })
            .collect::<Result<Vec<_>>>()?;
        let base = estimates.remove(0);
        debug!(order, evaluations = ?self.evaluation_count(order), "parallel simplex derivative");
        fold_level(top, &base, estimates)
    }

    /// Parallel [`derivatives`](Self::derivatives).
    pub fn derivatives_par<O: Oracle + Sync + ?Sized>(
        &self,
        oracle: &O,
        x0: &[f64],
    ) -> Result<DerivativeLayers> {
        let mut layers = DerivativeLayers::default();
        for p in 1..=self.max_order() {
            layers.insert(p, self.derivative_par(oracle, x0, p)?);
        }
        Ok(layers)
    }
}
