//! Sample grids and the inclusion-exclusion delta tensor.
//!
//! For direction sets `D₁, …, Dₚ` (`Dₖ` has `mₖ` columns) and steps
//! `h₁, …, hₚ`, the sample grid is the `(m₁+1) × ⋯ × (mₚ+1)` tensor
//!
//! ```text
//! v[i₁, …, iₚ] = f(x0 + Σ_{k : iₖ > 0} hₖ · Dₖ[:, iₖ − 1])
//! ```
//!
//! so index 0 on an axis means "this level does not move". The entry
//! `v[0, …, 0]` is `f(x0)` and is shared by every corner. The delta tensor is
//! the mixed forward difference over each `2^p` corner cube:
//!
//! ```text
//! δ[i₁, …, iₚ] = Σ_{mask ⊆ {1..p}} (−1)^{p − |mask|} v[corner(mask)] / (h₁⋯hₚ)
//! ```
//!
//! where `corner(mask)` takes index `iₖ + 1` on the axes in `mask` and `0`
//! elsewhere.

use ndarray::{ArrayD, IxDyn};
use tracing::debug;

use crate::config::{validate_step, SimplexConfig};
use crate::directions::{check_point, DirectionMatrix};
use crate::error::{Result, SimplexError};
use crate::oracle::{sample, Oracle};

/// Function values on the corner lattice of one or more direction sets.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGrid {
    values: ArrayD<f64>,
}

impl SampleGrid {
    /// Sample `oracle` on the full grid, one evaluation per entry.
    pub fn from_oracle<O: Oracle + ?Sized>(
        oracle: &O,
        x0: &[f64],
        directions: &[&DirectionMatrix],
        steps: &[f64],
        config: &SimplexConfig,
    ) -> Result<Self> {
        check_levels(x0, directions, steps)?;
        let shape = grid_shape(directions);
        let total = grid_len(&shape)?;

        let mut values = Vec::with_capacity(total);
        let mut index = vec![0usize; shape.len()];
        for flat in 0..total {
            unravel(flat, &shape, &mut index);
            let x = sample_point(x0, directions, steps, &index);
            values.push(sample(oracle, &x, config)?);
        }
        debug!(order = shape.len(), ?shape, evaluations = total, "sample grid filled");

        Ok(SampleGrid {
            values: ArrayD::from_shape_vec(IxDyn(&shape), values)?,
        })
    }

    /// Wrap caller-supplied values; the shape must be `(m₁+1, …, mₚ+1)`.
    pub fn from_values(values: ArrayD<f64>, directions: &[&DirectionMatrix]) -> Result<Self> {
        if directions.is_empty() {
            return Err(SimplexError::NoLevels);
        }
        let expected = grid_shape(directions);
        if values.shape() != expected.as_slice() {
            return Err(SimplexError::ValuesShape {
                expected,
                found: values.shape().to_vec(),
            });
        }
        Ok(SampleGrid { values })
    }

    pub(crate) fn from_array(values: ArrayD<f64>) -> Self {
        SampleGrid { values }
    }

    /// The derivative order `p` (number of axes).
    pub fn order(&self) -> usize {
        self.values.ndim()
    }

    pub fn values(&self) -> &ArrayD<f64> {
        &self.values
    }

    pub fn into_values(self) -> ArrayD<f64> {
        self.values
    }

    /// Number of grid entries, i.e. oracle evaluations needed to fill it.
    pub fn num_evaluations(&self) -> usize {
        self.values.len()
    }

    /// The `(m₁, …, mₚ)` delta tensor divided by `∏ steps`.
    ///
    /// Pass unit steps for grids whose displacements already carry the scale.
    pub fn delta(&self, steps: &[f64]) -> Result<ArrayD<f64>> {
        let p = self.order();
        if steps.len() != p {
            return Err(SimplexError::StepCount {
                expected: p,
                found: steps.len(),
            });
        }
        for (level, &h) in steps.iter().enumerate() {
            validate_step(level, h)?;
        }
        let scale: f64 = steps.iter().product();

        let shape: Vec<usize> = self.values.shape().iter().map(|&s| s - 1).collect();
        let mut corner = vec![0usize; p];
        let delta = ArrayD::from_shape_fn(IxDyn(&shape), |idx| {
            let mut acc = 0.0;
            for mask in 0..(1usize << p) {
                for (k, c) in corner.iter_mut().enumerate() {
                    *c = if mask & (1 << k) != 0 { idx[k] + 1 } else { 0 };
                }
                let v = self.values[IxDyn(&corner)];
                // Sign is + when the number of dropped axes is even.
                if (p - mask.count_ones() as usize) % 2 == 0 {
                    acc += v;
                } else {
                    acc -= v;
                }
            }
            acc / scale
        });
        Ok(delta)
    }
}

/// `(m₁+1, …, mₚ+1)`.
pub(crate) fn grid_shape(directions: &[&DirectionMatrix]) -> Vec<usize> {
    directions.iter().map(|d| d.num_directions() + 1).collect()
}

/// `∏ sizes`, or `None` when it overflows `usize`.
pub(crate) fn checked_product(sizes: &[usize]) -> Option<usize> {
    sizes.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n))
}

/// Number of entries of a grid with this shape.
pub(crate) fn grid_len(shape: &[usize]) -> Result<usize> {
    checked_product(shape).ok_or_else(|| SimplexError::GridTooLarge {
        shape: shape.to_vec(),
    })
}

/// Validate a base point, its direction sets and their steps.
pub(crate) fn check_levels(
    x0: &[f64],
    directions: &[&DirectionMatrix],
    steps: &[f64],
) -> Result<()> {
    if directions.is_empty() {
        return Err(SimplexError::NoLevels);
    }
    if steps.len() != directions.len() {
        return Err(SimplexError::StepCount {
            expected: directions.len(),
            found: steps.len(),
        });
    }
    for (level, &h) in steps.iter().enumerate() {
        validate_step(level, h)?;
    }
    check_point(x0, directions)
}

/// The point `x0 + Σ_{k : iₖ > 0} hₖ · Dₖ[:, iₖ − 1]`.
pub(crate) fn sample_point(
    x0: &[f64],
    directions: &[&DirectionMatrix],
    steps: &[f64],
    index: &[usize],
) -> Vec<f64> {
    let mut x = x0.to_vec();
    for ((d, &h), &i) in directions.iter().zip(steps).zip(index) {
        if i > 0 {
            d.add_scaled_column(i - 1, h, &mut x);
        }
    }
    x
}

/// Row-major multi-index of `flat` within `shape`.
pub(crate) fn unravel(mut flat: usize, shape: &[usize], index: &mut [usize]) {
    for (i, &s) in index.iter_mut().zip(shape).rev() {
        *i = flat % s;
        flat /= s;
    }
}
