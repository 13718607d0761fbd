//! Closed-form error bounds and Lipschitz-constant estimators.
//!
//! Two bound families coexist with different preconditions:
//!
//! - [`scaled`]: direction columns are unit-normalized and the step `h`
//!   carries the scale.
//! - [`unscaled`]: the direction columns carry their own magnitude and no
//!   separate step is applied.
//!
//! Mixing them (e.g. passing raw columns to a scaled bound) silently produces
//! a wrong bound. None of the formulas cover under-determined direction sets
//! (`m < n`); the bounds are still evaluated there but a warning is logged.

pub mod lipschitz;
pub mod scaled;
pub mod unscaled;

pub use lipschitz::LipschitzEstimate;

use tracing::warn;

use crate::directions::DirectionMatrix;
use crate::error::{Result, SimplexError};

/// Lipschitz constants must be finite and non-negative.
pub(crate) fn check_lipschitz(lipschitz: f64) -> Result<()> {
    if lipschitz.is_finite() && lipschitz >= 0.0 {
        Ok(())
    } else {
        Err(SimplexError::InvalidLipschitz(lipschitz))
    }
}

/// Log when a direction set cannot span `R^n`.
pub(crate) fn warn_if_underdetermined(bound: &'static str, directions: &[&DirectionMatrix]) {
    for (level, d) in directions.iter().enumerate() {
        if d.num_directions() < d.dim() {
            warn!(
                bound,
                level,
                n = d.dim(),
                m = d.num_directions(),
                "error bound does not hold for under-determined direction sets"
            );
        }
    }
}
