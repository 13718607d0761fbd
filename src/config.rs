use crate::error::{Result, SimplexError};

/// Step sizes for the levels of a simplex derivative.
///
/// Level `k` scales the columns of the `k`-th direction matrix before sampling.
/// A single `Uniform` step is broadcast to every level.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepSizes {
    /// One step shared by every level.
    Uniform(f64),
    /// One step per level, outermost first.
    PerLevel(Vec<f64>),
}

impl StepSizes {
    /// Resolve to exactly `levels` validated steps.
    ///
    /// Zero steps are rejected here rather than surfacing later as a division
    /// by zero in a difference quotient.
    pub fn resolve(&self, levels: usize) -> Result<Vec<f64>> {
        let steps = match self {
            StepSizes::Uniform(h) => vec![*h; levels],
            StepSizes::PerLevel(hs) => {
                if hs.len() != levels {
                    return Err(SimplexError::StepCount {
                        expected: levels,
                        found: hs.len(),
                    });
                }
                hs.clone()
            }
        };
        for (level, &h) in steps.iter().enumerate() {
            validate_step(level, h)?;
        }
        Ok(steps)
    }
}

impl From<f64> for StepSizes {
    fn from(h: f64) -> Self {
        StepSizes::Uniform(h)
    }
}

impl From<Vec<f64>> for StepSizes {
    fn from(hs: Vec<f64>) -> Self {
        StepSizes::PerLevel(hs)
    }
}

/// Check a single step size.
pub fn validate_step(level: usize, h: f64) -> Result<()> {
    if h.is_finite() && h > 0.0 {
        Ok(())
    } else {
        Err(SimplexError::InvalidStep { level, value: h })
    }
}

/// Numerical settings shared by every estimator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimplexConfig {
    /// Relative singular-value cutoff for the pseudoinverse: singular values
    /// at or below `rcond · σ_max` are treated as zero.
    /// `None` uses `max(n, m) · f64::EPSILON` (default: `None`).
    pub rcond: Option<f64>,
    /// Fail with [`SimplexError::NonFiniteOracleValue`] when the oracle returns
    /// NaN or an infinity (default: `true`).
    pub reject_non_finite: bool,
}

impl Default for SimplexConfig {
    fn default() -> Self {
        SimplexConfig {
            rcond: None,
            reject_non_finite: true,
        }
    }
}
