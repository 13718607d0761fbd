//! Comparing estimates against exact derivatives.

use std::collections::BTreeMap;
use std::fmt;

use ndarray::{Array, Dimension};
use simplex_deriv::DerivativeLayers;
use tracing::debug;

use crate::error::{ExactError, Result};
use crate::exact::derivative_tensor;
use crate::jet::Jet;

/// Offset in the relative-error denominator, `|truth| + RELATIVE_FLOOR`.
pub const RELATIVE_FLOOR: f64 = 1e-8;

/// Worst-case entrywise errors of an estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorReport {
    /// `max |estimate − truth|`.
    pub max_abs: f64,
    /// `max |estimate − truth| / (|truth| + 1e-8)`.
    pub max_rel: f64,
}

impl ErrorReport {
    /// Compare two tensors of the same shape.
    pub fn between<D: Dimension>(
        estimate: &Array<f64, D>,
        truth: &Array<f64, D>,
    ) -> Result<Self> {
        if estimate.shape() != truth.shape() {
            return Err(ExactError::ShapeMismatch {
                expected: truth.shape().to_vec(),
                found: estimate.shape().to_vec(),
            });
        }
        let (max_abs, max_rel) = estimate.iter().zip(truth.iter()).fold(
            (0.0_f64, 0.0_f64),
            |(a, r), (&e, &t)| {
                let abs = (e - t).abs();
                (a.max(abs), r.max(abs / (t.abs() + RELATIVE_FLOOR)))
            },
        );
        Ok(ErrorReport { max_abs, max_rel })
    }

    /// `max_abs ≤ tol`.
    pub fn within(&self, tol: f64) -> bool {
        self.max_abs <= tol
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "max abs error {:.3e}, max rel error {:.3e}", self.max_abs, self.max_rel)
    }
}

/// Report every layer of a multi-order estimate against the exact tensors.
///
/// `K` must exceed the highest order in `layers`.
pub fn compare_layers<const K: usize, Func>(
    layers: &DerivativeLayers,
    f: Func,
    x: &[f64],
) -> Result<BTreeMap<usize, ErrorReport>>
where
    Func: Fn(&[Jet<f64, K>]) -> Jet<f64, K>,
{
    let mut reports = BTreeMap::new();
    for (order, estimate) in layers.iter() {
        let truth = derivative_tensor(&f, x, order)?;
        let report = ErrorReport::between(estimate, &truth)?;
        debug!(order, %report, "layer compared");
        reports.insert(order, report);
    }
    Ok(reports)
}
