//! The [`Scalar`] trait for writing test functions once.
//!
//! A function written as `fn f<T: Scalar>(x: &[T]) -> T` can be handed to the
//! simplex estimators at `f64` and differentiated exactly at `Jet<f64, K>`.
//!
//! ```
//! use simplex_deriv_exact::{Jet64, Scalar};
//!
//! fn rosenbrock<T: Scalar>(x: &[T]) -> T {
//!     let one = T::from_f64(1.0);
//!     let a = one - x[0];
//!     let b = x[1] - x[0] * x[0];
//!     a * a + T::from_f64(100.0) * b * b
//! }
//!
//! assert_eq!(rosenbrock(&[1.0_f64, 1.0]), 0.0);
//! let seeded = [Jet64::<3>::line(1.0, 1.0), Jet64::<3>::constant(1.0)];
//! assert_eq!(rosenbrock(&seeded).derivative(2), 802.0);
//! ```

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::float::Float;
use crate::jet::Jet;

/// Arithmetic and elementary functions shared by plain floats and jets.
pub trait Scalar:
    Copy
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Send
    + Sync
    + 'static
{
    /// The underlying primitive float type.
    type Float: Float;

    /// Lift a plain float to a constant.
    fn from_f(val: Self::Float) -> Self;

    /// Lift an `f64` literal to a constant.
    #[inline]
    fn from_f64(val: f64) -> Self {
        Self::from_f(Self::Float::cast(val))
    }

    /// The primal value.
    fn value(&self) -> Self::Float;

    fn recip(self) -> Self;
    fn sqrt(self) -> Self;
    fn exp(self) -> Self;
    fn ln(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn powi(self, n: i32) -> Self;
}

macro_rules! impl_scalar_for_float {
    ($t:ty) => {
        impl Scalar for $t {
            type Float = $t;

            #[inline]
            fn from_f(val: $t) -> Self {
                val
            }

            #[inline]
            fn value(&self) -> $t {
                *self
            }

            #[inline]
            fn recip(self) -> Self {
                <$t>::recip(self)
            }

            #[inline]
            fn sqrt(self) -> Self {
                <$t>::sqrt(self)
            }

            #[inline]
            fn exp(self) -> Self {
                <$t>::exp(self)
            }

            #[inline]
            fn ln(self) -> Self {
                <$t>::ln(self)
            }

            #[inline]
            fn sin(self) -> Self {
                <$t>::sin(self)
            }

            #[inline]
            fn cos(self) -> Self {
                <$t>::cos(self)
            }

            #[inline]
            fn powi(self, n: i32) -> Self {
                <$t>::powi(self, n)
            }
        }
    };
}

impl_scalar_for_float!(f32);
impl_scalar_for_float!(f64);

impl<F: Float, const K: usize> Scalar for Jet<F, K> {
    type Float = F;

    #[inline]
    fn from_f(val: F) -> Self {
        Jet::constant(val)
    }

    #[inline]
    fn value(&self) -> F {
        self.coeffs[0]
    }

    #[inline]
    fn recip(self) -> Self {
        Jet::recip(self)
    }

    #[inline]
    fn sqrt(self) -> Self {
        Jet::sqrt(self)
    }

    #[inline]
    fn exp(self) -> Self {
        Jet::exp(self)
    }

    #[inline]
    fn ln(self) -> Self {
        Jet::ln(self)
    }

    #[inline]
    fn sin(self) -> Self {
        Jet::sin(self)
    }

    #[inline]
    fn cos(self) -> Self {
        Jet::cos(self)
    }

    #[inline]
    fn powi(self, n: i32) -> Self {
        Jet::powi(self, n)
    }
}
