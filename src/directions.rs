//! Direction matrices: the displacement sets a simplex derivative samples along.
//!
//! A [`DirectionMatrix`] is an `n × m` matrix whose columns are directions in
//! `R^n`. Whether the columns are unit-normalized is a convention of the call
//! site: the scaled error bounds in [`crate::bounds::scaled`] assume unit
//! columns with the step size carrying the scale, the unscaled bounds in
//! [`crate::bounds::unscaled`] read the scale off the columns themselves.

use nalgebra::{DMatrix, DVector};
use ndarray::Array2;

use crate::error::{Result, SimplexError};

/// An `n × m` matrix of sampling directions, one direction per column.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionMatrix {
    matrix: DMatrix<f64>,
}

impl DirectionMatrix {
    /// Wrap an `n × m` matrix. Fails on an empty shape or non-finite entries.
    pub fn new(matrix: DMatrix<f64>) -> Result<Self> {
        if matrix.nrows() == 0 || matrix.ncols() == 0 {
            return Err(SimplexError::EmptyDirections {
                rows: matrix.nrows(),
                cols: matrix.ncols(),
            });
        }
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(SimplexError::NonFiniteInput {
                context: "direction matrix",
            });
        }
        Ok(DirectionMatrix { matrix })
    }

    /// Build from a list of direction vectors, each of length `n`.
    pub fn from_columns(columns: &[Vec<f64>]) -> Result<Self> {
        let n = columns.first().map_or(0, Vec::len);
        if let Some(bad) = columns.iter().find(|c| c.len() != n) {
            return Err(SimplexError::DimensionMismatch {
                context: "direction column length",
                expected: n,
                found: bad.len(),
            });
        }
        let flat: Vec<f64> = columns.iter().flatten().copied().collect();
        Self::new(DMatrix::from_column_slice(n, columns.len(), &flat))
    }

    /// Build an `n × m` matrix from row-major data.
    pub fn from_row_slice(n: usize, m: usize, data: &[f64]) -> Result<Self> {
        if data.len() != n * m {
            return Err(SimplexError::DimensionMismatch {
                context: "row-major direction data",
                expected: n * m,
                found: data.len(),
            });
        }
        Self::new(DMatrix::from_row_slice(n, m, data))
    }

    /// Build from an ndarray matrix (rows are coordinates, columns directions).
    pub fn from_ndarray(a: &Array2<f64>) -> Result<Self> {
        let (n, m) = a.dim();
        Self::new(DMatrix::from_fn(n, m, |i, j| a[[i, j]]))
    }

    /// The `n × n` standard basis.
    pub fn identity(n: usize) -> Result<Self> {
        Self::new(DMatrix::identity(n, n))
    }

    /// `s · I` for an `n × n` identity.
    pub fn scaled_identity(n: usize, s: f64) -> Result<Self> {
        Self::new(DMatrix::identity(n, n) * s)
    }

    /// Ambient dimension `n` (row count).
    #[inline]
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of directions `m` (column count).
    #[inline]
    pub fn num_directions(&self) -> usize {
        self.matrix.ncols()
    }

    /// Borrow the underlying matrix.
    #[inline]
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Copy of column `j`.
    pub fn column(&self, j: usize) -> DVector<f64> {
        self.matrix.column(j).into_owned()
    }

    /// Euclidean norm of column `j`.
    pub fn column_norm(&self, j: usize) -> f64 {
        self.matrix.column(j).norm()
    }

    /// Largest column norm.
    pub fn max_column_norm(&self) -> f64 {
        self.column_norms().fold(0.0, f64::max)
    }

    /// Smallest column norm.
    pub fn min_column_norm(&self) -> f64 {
        self.column_norms().fold(f64::INFINITY, f64::min)
    }

    fn column_norms(&self) -> impl Iterator<Item = f64> + '_ {
        self.matrix.column_iter().map(|c| c.norm())
    }

    /// `-D`, the direction set used by the centered combiner.
    pub fn negated(&self) -> Self {
        DirectionMatrix {
            matrix: self.matrix.map(|v| -v),
        }
    }

    /// `h · D`. Rejects non-finite results.
    pub fn scaled(&self, h: f64) -> Result<Self> {
        Self::new(self.matrix.map(|v| v * h))
    }

    /// Divide every column by the largest column norm `δ`.
    ///
    /// Returns `(D / δ, δ)`. A caller sampling with step `h` along `D` samples
    /// the same points with step `h · δ` along the normalized set, and a caller
    /// with a target step `h` along the normalized set should pass `h / δ`
    /// when it keeps the raw columns. Fails when every column is zero.
    pub fn normalized(&self) -> Result<(Self, f64)> {
        let delta = self.max_column_norm();
        if delta <= 0.0 {
            return Err(SimplexError::DegenerateDirections(
                "cannot normalize a direction matrix whose columns are all zero",
            ));
        }
        Ok((
            DirectionMatrix {
                matrix: self.matrix.map(|v| v / delta),
            },
            delta,
        ))
    }

    /// `out += h · D[:, j]`.
    #[inline]
    pub(crate) fn add_scaled_column(&self, j: usize, h: f64, out: &mut [f64]) {
        for (o, d) in out.iter_mut().zip(self.matrix.column(j).iter()) {
            *o += h * d;
        }
    }

    /// Fail unless this matrix has `n` rows.
    pub(crate) fn check_dim(&self, n: usize, context: &'static str) -> Result<()> {
        if self.dim() == n {
            Ok(())
        } else {
            Err(SimplexError::DimensionMismatch {
                context,
                expected: n,
                found: self.dim(),
            })
        }
    }
}

impl TryFrom<DMatrix<f64>> for DirectionMatrix {
    type Error = SimplexError;

    fn try_from(matrix: DMatrix<f64>) -> Result<Self> {
        DirectionMatrix::new(matrix)
    }
}

/// Check that a base point is finite and matches every direction set.
pub(crate) fn check_point(x0: &[f64], directions: &[&DirectionMatrix]) -> Result<()> {
    if x0.iter().any(|v| !v.is_finite()) {
        return Err(SimplexError::NonFiniteInput {
            context: "base point",
        });
    }
    for d in directions {
        d.check_dim(x0.len(), "direction matrix rows vs. base point length")?;
    }
    Ok(())
}
