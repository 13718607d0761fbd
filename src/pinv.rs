//! Moore-Penrose pseudoinverse of a direction set and tensor contraction.
//!
//! For a direction matrix `D` (`n × m`) the simplex estimate solves the
//! directional system `Dᵀ g ≈ δ` in the least-squares / minimum-norm sense,
//! i.e. `g = pinv(Dᵀ) δ`. A [`Projector`] stores `pinv(Dᵀ)` as an `n × m`
//! matrix and maps any tensor axis of length `m` to an axis of length `n`.
//!
//! Conditioning is the caller's responsibility: near rank-deficient direction
//! sets produce a result (singular values below the cutoff are dropped) but the
//! estimate may be meaningless. A rank deficit is logged at `warn` level.

use nalgebra::DMatrix;
use ndarray::{Array2, ArrayD, IxDyn};
use tracing::{debug, warn};

use crate::directions::DirectionMatrix;
use crate::error::{Result, SimplexError};
use crate::linalg::to_ndarray;

/// `pinv(Dᵀ)` for one direction level, with its spectral data.
#[derive(Debug, Clone)]
pub struct Projector {
    pinv: Array2<f64>,
    singular_values: Vec<f64>,
    cutoff: f64,
}

impl Projector {
    /// Pseudoinverse with the default cutoff `max(n, m) · ε · σ_max`.
    pub fn new(directions: &DirectionMatrix) -> Result<Self> {
        Self::with_rcond(directions, None)
    }

    /// Pseudoinverse with relative cutoff `rcond · σ_max` (`None` for the default).
    pub fn with_rcond(directions: &DirectionMatrix, rcond: Option<f64>) -> Result<Self> {
        let n = directions.dim();
        let m = directions.num_directions();
        let rcond = rcond.unwrap_or(n.max(m) as f64 * f64::EPSILON);
        if !(rcond.is_finite() && rcond >= 0.0) {
            return Err(SimplexError::Pseudoinverse(format!(
                "rcond must be finite and non-negative, got {rcond}"
            )));
        }

        let transposed: DMatrix<f64> = directions.as_matrix().transpose();
        let svd = transposed.svd(true, true);
        let singular_values: Vec<f64> = svd.singular_values.iter().copied().collect();
        let sigma_max = singular_values.iter().copied().fold(0.0, f64::max);
        let cutoff = rcond * sigma_max;

        let pinv = svd
            .pseudo_inverse(cutoff)
            .map_err(|e| SimplexError::Pseudoinverse(e.to_string()))?;

        let projector = Projector {
            pinv: to_ndarray(&pinv),
            singular_values,
            cutoff,
        };
        let rank = projector.rank();
        if rank < n.min(m) {
            warn!(
                n,
                m,
                rank,
                "direction matrix is rank deficient; dropped singular values below {cutoff:e}"
            );
        } else {
            debug!(n, m, rank, "pseudoinverse computed");
        }
        Ok(projector)
    }

    /// `pinv(Dᵀ)`, shape `n × m`.
    #[inline]
    pub fn matrix(&self) -> &Array2<f64> {
        &self.pinv
    }

    /// Ambient dimension `n`.
    #[inline]
    pub fn dim(&self) -> usize {
        self.pinv.nrows()
    }

    /// Number of directions `m`.
    #[inline]
    pub fn num_directions(&self) -> usize {
        self.pinv.ncols()
    }

    /// Singular values of `D`, descending.
    pub fn singular_values(&self) -> &[f64] {
        &self.singular_values
    }

    /// Number of singular values above the cutoff.
    pub fn rank(&self) -> usize {
        self.singular_values
            .iter()
            .filter(|&&s| s > self.cutoff)
            .count()
    }

    /// `‖pinv(Dᵀ)‖₂`: the reciprocal of the smallest retained singular value.
    ///
    /// Zero when every singular value was dropped.
    pub fn spectral_norm(&self) -> f64 {
        self.singular_values
            .iter()
            .copied()
            .filter(|&s| s > self.cutoff)
            .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |a| a.min(s))))
            .map_or(0.0, |s_min| 1.0 / s_min)
    }

    /// Contract axis `axis` of `tensor` (length `m`) against this projector.
    ///
    /// `out[.., a, ..] = Σ_i pinv(Dᵀ)[a, i] · tensor[.., i, ..]`, so the axis
    /// keeps its position and changes length from `m` to `n`.
    pub fn contract_axis(&self, tensor: &ArrayD<f64>, axis: usize) -> Result<ArrayD<f64>> {
        let ndim = tensor.ndim();
        if axis >= ndim {
            return Err(SimplexError::DimensionMismatch {
                context: "contraction axis must be below the tensor order",
                expected: ndim,
                found: axis,
            });
        }
        let m = self.num_directions();
        if tensor.shape()[axis] != m {
            return Err(SimplexError::DimensionMismatch {
                context: "tensor axis length vs. projector directions",
                expected: m,
                found: tensor.shape()[axis],
            });
        }

        // Bring `axis` to the front, flatten the rest, multiply, undo.
        let mut front: Vec<usize> = (0..ndim).collect();
        front.remove(axis);
        front.insert(0, axis);
        let moved = tensor.view().permuted_axes(front);
        let rest: Vec<usize> = moved.shape()[1..].to_vec();
        let cols: usize = rest.iter().product();

        let flat = moved
            .as_standard_layout()
            .into_owned()
            .into_shape_with_order((m, cols))?;
        let projected = self.pinv.dot(&flat);

        let mut dims = Vec::with_capacity(ndim);
        dims.push(self.dim());
        dims.extend_from_slice(&rest);
        let unfolded = projected.into_shape_with_order(IxDyn(&dims))?;

        let mut back: Vec<usize> = (1..ndim).collect();
        back.insert(axis, 0);
        Ok(unfolded.permuted_axes(back).as_standard_layout().into_owned())
    }
}

/// Contract every axis `i` of `tensor` against `projectors[i]`.
///
/// Turns an `(m₁, …, mₚ)` delta tensor into an `(n, …, n)` derivative tensor.
/// The per-axis contractions commute, so they are applied in axis order.
pub fn contract_all(tensor: &ArrayD<f64>, projectors: &[&Projector]) -> Result<ArrayD<f64>> {
    if projectors.len() != tensor.ndim() {
        return Err(SimplexError::DimensionMismatch {
            context: "one projector per tensor axis",
            expected: tensor.ndim(),
            found: projectors.len(),
        });
    }
    let mut out = tensor.clone();
    for (axis, p) in projectors.iter().enumerate() {
        out = p.contract_axis(&out, axis)?;
    }
    Ok(out)
}
