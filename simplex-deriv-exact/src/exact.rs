//! Exact derivative tensors by directional Taylor passes and polarization.
//!
//! One jet pass along `w` gives `c_p(w)`, the `p`-th scaled coefficient of
//! `t ↦ f(x + t·w)`, which equals `Dᵖf(x)[w, …, w] / p!`. Mixed partials
//! follow from the polarization identity for symmetric `p`-linear forms:
//!
//! ```text
//! ∂ᵖf / ∂x_{i₁}⋯∂x_{iₚ} = Σ_{∅ ≠ S ⊆ {1..p}} (−1)^{p − |S|} c_p(Σ_{k ∈ S} e_{iₖ})
//! ```
//!
//! Symmetry is used: each multiset of indices is evaluated once and copied to
//! all of its permutations.

use std::collections::HashMap;

use ndarray::{Array1, Array2, ArrayD, Dimension, Ix1, Ix2, IxDyn};
use tracing::debug;

use crate::error::{ExactError, Result};
use crate::jet::Jet;

/// `Dᵖf(x)[w, …, w] / p!` from one jet pass.
fn directional_coeff<const K: usize, Func>(f: &Func, x: &[f64], w: &[f64], order: usize) -> f64
where
    Func: Fn(&[Jet<f64, K>]) -> Jet<f64, K>,
{
    let seeded: Vec<Jet<f64, K>> = x
        .iter()
        .zip(w)
        .map(|(&xi, &wi)| Jet::line(xi, wi))
        .collect();
    f(&seeded).coeff(order)
}

/// Directional derivative `Dᵖf(x)[v, …, v]`.
pub fn directional_derivative<const K: usize, Func>(
    f: Func,
    x: &[f64],
    v: &[f64],
    order: usize,
) -> Result<f64>
where
    Func: Fn(&[Jet<f64, K>]) -> Jet<f64, K>,
{
    check_order::<K>(x, order)?;
    if v.len() != x.len() {
        return Err(ExactError::ShapeMismatch {
            expected: vec![x.len()],
            found: vec![v.len()],
        });
    }
    let factorial: f64 = (2..=order).map(|i| i as f64).product();
    Ok(directional_coeff(&f, x, v, order) * factorial)
}

/// The exact order-`p` derivative tensor of `f` at `x`, shape `(n, …, n)`.
///
/// `K` (the jet length) must exceed `order`.
///
/// ```
/// use simplex_deriv_exact::{derivative_tensor, Jet64};
///
/// let f = |x: &[Jet64<4>]| x[0] * x[0] * x[1];
/// let t = derivative_tensor(f, &[1.0, 2.0], 3).unwrap();
/// assert!((t[[0, 0, 1]] - 2.0).abs() < 1e-12);
/// assert!((t[[1, 0, 0]] - 2.0).abs() < 1e-12);
/// assert!(t[[1, 1, 1]].abs() < 1e-12);
/// ```
pub fn derivative_tensor<const K: usize, Func>(
    f: Func,
    x: &[f64],
    order: usize,
) -> Result<ArrayD<f64>>
where
    Func: Fn(&[Jet<f64, K>]) -> Jet<f64, K>,
{
    check_order::<K>(x, order)?;
    let n = x.len();
    let shape = vec![n; order];

    let mut by_multiset: HashMap<Vec<usize>, f64> = HashMap::new();
    let mut w = vec![0.0; n];
    let mut passes = 0usize;
    let mut tensor = ArrayD::zeros(IxDyn(&shape));
    for (idx, entry) in tensor.indexed_iter_mut() {
        let mut key: Vec<usize> = idx.slice().to_vec();
        key.sort_unstable();
        if let Some(&v) = by_multiset.get(&key) {
            *entry = v;
            continue;
        }

        let mut acc = 0.0;
        for mask in 1usize..(1 << order) {
            w.iter_mut().for_each(|wi| *wi = 0.0);
            for (k, &i) in key.iter().enumerate() {
                if mask & (1 << k) != 0 {
                    w[i] += 1.0;
                }
            }
            let c = directional_coeff(&f, x, &w, order);
            passes += 1;
            if (order - mask.count_ones() as usize) % 2 == 0 {
                acc += c;
            } else {
                acc -= c;
            }
        }
        if !acc.is_finite() {
            return Err(ExactError::NonFinite {
                point: x.to_vec(),
                value: acc,
            });
        }
        by_multiset.insert(key, acc);
        *entry = acc;
    }
    debug!(order, n, passes, "exact derivative tensor");
    Ok(tensor)
}

/// Exact gradient.
pub fn gradient<const K: usize, Func>(f: Func, x: &[f64]) -> Result<Array1<f64>>
where
    Func: Fn(&[Jet<f64, K>]) -> Jet<f64, K>,
{
    Ok(derivative_tensor(f, x, 1)?.into_dimensionality::<Ix1>()?)
}

/// Exact Hessian.
pub fn hessian<const K: usize, Func>(f: Func, x: &[f64]) -> Result<Array2<f64>>
where
    Func: Fn(&[Jet<f64, K>]) -> Jet<f64, K>,
{
    Ok(derivative_tensor(f, x, 2)?.into_dimensionality::<Ix2>()?)
}

fn check_order<const K: usize>(x: &[f64], order: usize) -> Result<()> {
    if order == 0 {
        return Err(ExactError::ZeroOrder);
    }
    if order >= K {
        return Err(ExactError::OrderTooHigh {
            order,
            coefficients: K,
        });
    }
    if x.is_empty() {
        return Err(ExactError::EmptyPoint);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jet::Jet64;
    use crate::scalar::Scalar;

    fn f<T: Scalar>(x: &[T]) -> T {
        x[0].exp() * x[1].sin() + x[0] * x[1] * x[1]
    }

    #[test]
    fn gradient_matches_hand_derivative() {
        let (a, b) = (0.3_f64, 1.1_f64);
        let g = gradient(f::<Jet64<2>>, &[a, b]).unwrap();
        assert!((g[0] - (a.exp() * b.sin() + b * b)).abs() < 1e-14);
        assert!((g[1] - (a.exp() * b.cos() + 2.0 * a * b)).abs() < 1e-14);
    }

    #[test]
    fn hessian_matches_hand_derivative() {
        let (a, b) = (0.3_f64, 1.1_f64);
        let h = hessian(f::<Jet64<3>>, &[a, b]).unwrap();
        assert!((h[[0, 0]] - a.exp() * b.sin()).abs() < 1e-13);
        assert!((h[[0, 1]] - (a.exp() * b.cos() + 2.0 * b)).abs() < 1e-13);
        assert!((h[[1, 0]] - h[[0, 1]]).abs() < 1e-15);
        assert!((h[[1, 1]] - (-a.exp() * b.sin() + 2.0 * a)).abs() < 1e-13);
    }

    #[test]
    fn fourth_order_of_polynomial() {
        // x0² x1²: ∂⁴/∂x0²∂x1² = 4, pure fourth partials vanish.
        let p = |x: &[Jet64<5>]| x[0] * x[0] * x[1] * x[1];
        let t = derivative_tensor(p, &[0.5, -0.7], 4).unwrap();
        assert_eq!(t.shape(), &[2, 2, 2, 2]);
        assert!((t[[0, 0, 1, 1]] - 4.0).abs() < 1e-10);
        assert!((t[[1, 0, 1, 0]] - 4.0).abs() < 1e-10);
        assert!(t[[0, 0, 0, 0]].abs() < 1e-10);
        assert!(t[[0, 1, 1, 1]].abs() < 1e-10);
    }

    #[test]
    fn directional_matches_contraction() {
        let v = [0.6, -0.8];
        let x = [0.3, 1.1];
        let d2 = directional_derivative(f::<Jet64<3>>, &x, &v, 2).unwrap();
        let h = hessian(f::<Jet64<3>>, &x).unwrap();
        let quad = (0..2)
            .flat_map(|i| (0..2).map(move |j| (i, j)))
            .map(|(i, j)| v[i] * h[[i, j]] * v[j])
            .sum::<f64>();
        assert!((d2 - quad).abs() < 1e-12);
    }

    #[test]
    fn jet_too_short_rejected() {
        let err = derivative_tensor(f::<Jet64<3>>, &[0.0, 0.0], 3).unwrap_err();
        assert_eq!(
            err,
            ExactError::OrderTooHigh {
                order: 3,
                coefficients: 3
            }
        );
        assert_eq!(
            derivative_tensor(f::<Jet64<3>>, &[0.0, 0.0], 0).unwrap_err(),
            ExactError::ZeroOrder
        );
    }
}
