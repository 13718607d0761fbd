#![allow(dead_code)]

use simplex_deriv::DirectionMatrix;

// ─── Test functions ────────────────────────────────────────────────────────

pub fn rosenbrock(x: &[f64]) -> f64 {
    let mut sum = 0.0;
    for i in 0..x.len() - 1 {
        let t1 = 1.0 - x[i];
        let t2 = x[i + 1] - x[i] * x[i];
        sum += t1 * t1 + 100.0 * t2 * t2;
    }
    sum
}

pub fn trig_sum(x: &[f64]) -> f64 {
    x.iter().enumerate().map(|(i, v)| (v * (i + 1) as f64).sin()).sum()
}

// ─── Inputs ────────────────────────────────────────────────────────────────

pub fn make_input(n: usize) -> Vec<f64> {
    (0..n).map(|i| 0.5 + 0.1 * i as f64).collect()
}

/// The standard basis plus the negated all-ones direction: a positive basis.
pub fn positive_basis(n: usize) -> DirectionMatrix {
    let mut columns: Vec<Vec<f64>> = (0..n)
        .map(|j| (0..n).map(|i| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();
    columns.push(vec![-1.0 / (n as f64).sqrt(); n]);
    DirectionMatrix::from_columns(&columns).unwrap()
}
