//! Black-box function oracles.
//!
//! Any `Fn(&[f64]) -> f64` is an [`Oracle`]. The estimators take oracles by
//! shared reference and never cache values across calls.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::trace;

use crate::config::SimplexConfig;
use crate::error::{Result, SimplexError};

/// A scalar function `f : R^n → R` sampled by the simplex estimators.
pub trait Oracle {
    /// Evaluate `f(x)`.
    fn eval(&self, x: &[f64]) -> f64;
}

impl<F> Oracle for F
where
    F: Fn(&[f64]) -> f64,
{
    #[inline]
    fn eval(&self, x: &[f64]) -> f64 {
        self(x)
    }
}

/// Wraps an oracle and counts its evaluations.
///
/// The counter is atomic so the wrapper can be shared by the `parallel`
/// estimators.
///
/// ```
/// use simplex_deriv::{gradient, CountingOracle, DirectionMatrix};
///
/// let f = CountingOracle::new(|x: &[f64]| x[0] * x[0] + x[1]);
/// let s = DirectionMatrix::identity(2).unwrap();
/// let _g = gradient(&f, &[1.0, 2.0], &s, 1e-3).unwrap();
/// assert_eq!(f.evaluations(), 3);
/// ```
#[derive(Debug, Default)]
pub struct CountingOracle<O> {
    inner: O,
    evals: AtomicUsize,
}

impl<O> CountingOracle<O> {
    pub fn new(inner: O) -> Self {
        CountingOracle {
            inner,
            evals: AtomicUsize::new(0),
        }
    }

    /// Evaluations since construction or the last [`reset`](Self::reset).
    pub fn evaluations(&self) -> usize {
        self.evals.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.evals.store(0, Ordering::Relaxed);
    }

    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: Oracle> Oracle for CountingOracle<O> {
    fn eval(&self, x: &[f64]) -> f64 {
        self.evals.fetch_add(1, Ordering::Relaxed);
        self.inner.eval(x)
    }
}

/// Evaluate `oracle` at `x`, rejecting NaN and infinities unless disabled.
pub(crate) fn sample<O: Oracle + ?Sized>(
    oracle: &O,
    x: &[f64],
    config: &SimplexConfig,
) -> Result<f64> {
    let value = oracle.eval(x);
    trace!(?x, value, "oracle sample");
    if config.reject_non_finite && !value.is_finite() {
        return Err(SimplexError::NonFiniteOracleValue {
            point: x.to_vec(),
            value,
        });
    }
    Ok(value)
}

/// Check a vector-valued oracle's output length.
pub(crate) fn check_output_len(found: usize, expected: usize) -> Result<()> {
    if found == expected {
        Ok(())
    } else {
        Err(SimplexError::OracleOutput {
            expected: vec![expected],
            found: vec![found],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_oracles() {
        let f = |x: &[f64]| x.iter().sum::<f64>();
        assert_eq!(f.eval(&[1.0, 2.0, 3.0]), 6.0);
    }

    #[test]
    fn counting_oracle_counts_and_resets() {
        let f = CountingOracle::new(|x: &[f64]| x[0]);
        for i in 0..5 {
            assert_eq!(f.eval(&[i as f64]), i as f64);
        }
        assert_eq!(f.evaluations(), 5);
        f.reset();
        assert_eq!(f.evaluations(), 0);
    }

    #[test]
    fn non_finite_values_rejected_by_default() {
        let f = |_: &[f64]| f64::NAN;
        let err = sample(&f, &[1.0], &SimplexConfig::default()).unwrap_err();
        assert!(matches!(err, SimplexError::NonFiniteOracleValue { .. }));

        let lenient = SimplexConfig {
            reject_non_finite: false,
            ..SimplexConfig::default()
        };
        assert!(sample(&f, &[1.0], &lenient).unwrap().is_nan());
    }

    #[test]
    fn output_length_checked() {
        assert!(check_output_len(3, 3).is_ok());
        assert_eq!(
            check_output_len(2, 3).unwrap_err(),
            SimplexError::OracleOutput {
                expected: vec![3],
                found: vec![2]
            }
        );
    }
}
