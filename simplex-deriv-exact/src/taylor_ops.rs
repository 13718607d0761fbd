//! Truncated power-series recurrences.
//!
//! Coefficients are scaled: `a[k] = a⁽ᵏ⁾(0) / k!`. Every routine writes
//! `out.len()` coefficients and reads no further into its inputs.

use crate::float::Float;

/// `out = a · b` (Cauchy product).
pub fn mul<F: Float>(a: &[F], b: &[F], out: &mut [F]) {
    for k in 0..out.len() {
        out[k] = (0..=k).fold(F::zero(), |acc, j| acc + a[j] * b[k - j]);
    }
}

/// `out = a / b`. Requires `b[0] ≠ 0`.
pub fn div<F: Float>(a: &[F], b: &[F], out: &mut [F]) {
    let inv = b[0].recip();
    for k in 0..out.len() {
        let tail = (1..=k).fold(F::zero(), |acc, j| acc + b[j] * out[k - j]);
        out[k] = (a[k] - tail) * inv;
    }
}

/// `out = exp(a)`, from `out' = a' · out`.
pub fn exp<F: Float>(a: &[F], out: &mut [F]) {
    out[0] = a[0].exp();
    for k in 1..out.len() {
        let s = (1..=k).fold(F::zero(), |acc, j| {
            acc + F::from_usize(j) * a[j] * out[k - j]
        });
        out[k] = s / F::from_usize(k);
    }
}

/// `out = ln(a)`, from `a · out' = a'`. Requires `a[0] > 0`.
pub fn ln<F: Float>(a: &[F], out: &mut [F]) {
    let inv = a[0].recip();
    out[0] = a[0].ln();
    for k in 1..out.len() {
        let s = (1..k).fold(F::zero(), |acc, j| {
            acc + F::from_usize(j) * out[j] * a[k - j]
        });
        out[k] = (a[k] - s / F::from_usize(k)) * inv;
    }
}

/// `out = √a`, from `out² = a`. Requires `a[0] > 0`.
pub fn sqrt<F: Float>(a: &[F], out: &mut [F]) {
    out[0] = a[0].sqrt();
    let denom = out[0] + out[0];
    for k in 1..out.len() {
        let s = (1..k).fold(F::zero(), |acc, j| acc + out[j] * out[k - j]);
        out[k] = (a[k] - s) / denom;
    }
}

/// `(s, c) = (sin a, cos a)`, from `s' = a' c` and `c' = −a' s`.
pub fn sin_cos<F: Float>(a: &[F], s: &mut [F], c: &mut [F]) {
    let (s0, c0) = a[0].sin_cos();
    s[0] = s0;
    c[0] = c0;
    for k in 1..s.len() {
        let mut ds = F::zero();
        let mut dc = F::zero();
        for j in 1..=k {
            let w = F::from_usize(j) * a[j];
            ds = ds + w * c[k - j];
            dc = dc + w * s[k - j];
        }
        let kf = F::from_usize(k);
        s[k] = ds / kf;
        c[k] = -dc / kf;
    }
}
