//! Const-generic truncated Taylor numbers: `Jet<F, K>`.
//!
//! A jet holds `K` scaled coefficients of a univariate series,
//! `coeffs[k] = g⁽ᵏ⁾(0) / k!`. Evaluating `f(x + t·v)` on jets yields every
//! directional derivative of `f` along `v` up to order `K − 1` in one pass.
//!
//! Stack-allocated and `Copy`.

use std::fmt::{self, Display};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::float::Float;
use crate::taylor_ops;

/// Truncated Taylor series with `K` coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Jet<F: Float, const K: usize> {
    pub coeffs: [F; K],
}

/// `Jet<f64, K>`.
pub type Jet64<const K: usize> = Jet<f64, K>;

impl<F: Float, const K: usize> Default for Jet<F, K> {
    fn default() -> Self {
        Jet {
            coeffs: [F::zero(); K],
        }
    }
}

impl<F: Float, const K: usize> Display for Jet<F, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coeffs[0])?;
        for (k, c) in self.coeffs.iter().enumerate().skip(1) {
            write!(f, " + {c}·t^{k}")?;
        }
        Ok(())
    }
}

impl<F: Float, const K: usize> From<F> for Jet<F, K> {
    #[inline]
    fn from(val: F) -> Self {
        Jet::constant(val)
    }
}

impl<F: Float, const K: usize> Jet<F, K> {
    #[inline]
    pub fn new(coeffs: [F; K]) -> Self {
        Jet { coeffs }
    }

    /// `t ↦ val`.
    #[inline]
    pub fn constant(val: F) -> Self {
        let mut j = Self::default();
        j.coeffs[0] = val;
        j
    }

    /// `t ↦ val + slope · t`, the seed for a directional pass.
    #[inline]
    pub fn line(val: F, slope: F) -> Self {
        let mut j = Self::constant(val);
        if K > 1 {
            j.coeffs[1] = slope;
        }
        j
    }

    #[inline]
    pub fn value(&self) -> F {
        self.coeffs[0]
    }

    /// Scaled coefficient `g⁽ᵏ⁾(0) / k!`.
    #[inline]
    pub fn coeff(&self, k: usize) -> F {
        self.coeffs[k]
    }

    /// Unscaled derivative `g⁽ᵏ⁾(0) = k! · coeffs[k]`.
    pub fn derivative(&self, k: usize) -> F {
        let factorial = (2..=k).fold(F::one(), |acc, i| acc * F::from_usize(i));
        self.coeffs[k] * factorial
    }

    #[inline]
    fn unary(self, op: impl FnOnce(&[F], &mut [F])) -> Self {
        let mut out = Self::default();
        op(&self.coeffs, &mut out.coeffs);
        out
    }

    pub fn recip(self) -> Self {
        Self::constant(F::one()) / self
    }

    pub fn sqrt(self) -> Self {
        self.unary(taylor_ops::sqrt)
    }

    pub fn exp(self) -> Self {
        self.unary(taylor_ops::exp)
    }

    pub fn ln(self) -> Self {
        self.unary(taylor_ops::ln)
    }

    pub fn sin_cos(self) -> (Self, Self) {
        let mut s = Self::default();
        let mut c = Self::default();
        taylor_ops::sin_cos(&self.coeffs, &mut s.coeffs, &mut c.coeffs);
        (s, c)
    }

    pub fn sin(self) -> Self {
        self.sin_cos().0
    }

    pub fn cos(self) -> Self {
        self.sin_cos().1
    }

    /// Integer power by repeated squaring; exact at a zero base.
    pub fn powi(self, n: i32) -> Self {
        if n < 0 {
            return self.powi(-n).recip();
        }
        let mut result = Self::constant(F::one());
        let mut base = self;
        let mut e = n as u32;
        while e > 0 {
            if e & 1 == 1 {
                result = result * base;
            }
            base = base * base;
            e >>= 1;
        }
        result
    }
}

impl<F: Float, const K: usize> Add for Jet<F, K> {
    type Output = Self;

    #[inline]
    fn add(mut self, rhs: Self) -> Self {
        for (a, b) in self.coeffs.iter_mut().zip(rhs.coeffs) {
            *a = *a + b;
        }
        self
    }
}

impl<F: Float, const K: usize> Sub for Jet<F, K> {
    type Output = Self;

    #[inline]
    fn sub(mut self, rhs: Self) -> Self {
        for (a, b) in self.coeffs.iter_mut().zip(rhs.coeffs) {
            *a = *a - b;
        }
        self
    }
}

impl<F: Float, const K: usize> Mul for Jet<F, K> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let mut out = Self::default();
        taylor_ops::mul(&self.coeffs, &rhs.coeffs, &mut out.coeffs);
        out
    }
}

impl<F: Float, const K: usize> Div for Jet<F, K> {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        let mut out = Self::default();
        taylor_ops::div(&self.coeffs, &rhs.coeffs, &mut out.coeffs);
        out
    }
}

impl<F: Float, const K: usize> Neg for Jet<F, K> {
    type Output = Self;

    #[inline]
    fn neg(mut self) -> Self {
        for a in &mut self.coeffs {
            *a = -*a;
        }
        self
    }
}

macro_rules! assign_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl<F: Float, const K: usize> $trait for Jet<F, K> {
            #[inline]
            fn $method(&mut self, rhs: Self) {
                *self = *self $op rhs;
            }
        }
    };
}

assign_op!(AddAssign, add_assign, +);
assign_op!(SubAssign, sub_assign, -);
assign_op!(MulAssign, mul_assign, *);
assign_op!(DivAssign, div_assign, /);
