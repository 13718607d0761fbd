use std::fmt::{Debug, Display};

use num_traits::Float as NumFloat;

/// Marker trait for the primitive float types a [`Jet`](crate::Jet) is built on.
///
/// Only `f32` and `f64` implement it. The conversions are infallible, so jet
/// recurrences never need to handle a failed cast.
pub trait Float: NumFloat + Copy + Send + Sync + Default + Debug + Display + 'static {
    fn cast(v: f64) -> Self;

    fn as_f64(self) -> f64;

    #[inline]
    fn from_usize(k: usize) -> Self {
        Self::cast(k as f64)
    }
}

impl Float for f32 {
    #[inline]
    fn cast(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl Float for f64 {
    #[inline]
    fn cast(v: f64) -> Self {
        v
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self
    }
}
