use ndarray::{Array1, Array2};
use proptest::prelude::*;
use simplex_deriv::{
    centered_gradient, centered_hessian, gradient, hessian, DirectionMatrix, SimplexEngine,
};

/// `f(x) = xᵀ A x + bᵀ x` with symmetric `A`.
#[derive(Debug, Clone)]
struct Quadratic {
    a: Array2<f64>,
    b: Array1<f64>,
}

impl Quadratic {
    fn eval(&self, x: &[f64]) -> f64 {
        let x = Array1::from_vec(x.to_vec());
        x.dot(&self.a.dot(&x)) + self.b.dot(&x)
    }

    fn gradient(&self, x: &[f64]) -> Array1<f64> {
        let x = Array1::from_vec(x.to_vec());
        2.0 * self.a.dot(&x) + &self.b
    }
}

fn quadratic() -> impl Strategy<Value = Quadratic> {
    (
        prop::array::uniform6(-5.0..5.0_f64),
        prop::array::uniform3(-5.0..5.0_f64),
    )
        .prop_map(|(u, b)| {
            let a = Array2::from_shape_vec(
                (3, 3),
                vec![u[0], u[1], u[2], u[1], u[3], u[4], u[2], u[4], u[5]],
            )
            .unwrap();
            Quadratic {
                a,
                b: Array1::from_vec(b.to_vec()),
            }
        })
}

fn frame() -> DirectionMatrix {
    DirectionMatrix::from_columns(&[
        vec![1.0, 0.0, 0.0],
        vec![0.0, 1.0, 0.0],
        vec![0.0, 0.0, 1.0],
        vec![-1.0, -1.0, -1.0],
    ])
    .unwrap()
}

fn max_diff<'a>(a: impl IntoIterator<Item = &'a f64>, b: impl IntoIterator<Item = &'a f64>) -> f64 {
    a.into_iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

proptest! {
    /// Centered gradients of quadratics are exact for any step.
    #[test]
    fn centered_gradient_exact(
        q in quadratic(),
        x0 in prop::array::uniform3(-2.0..2.0_f64),
        h in 0.01..1.0_f64,
    ) {
        let f = |x: &[f64]| q.eval(x);
        let est = centered_gradient(&f, &x0, &frame(), h).unwrap();
        let err = max_diff(est.iter(), q.gradient(&x0).iter());
        prop_assert!(err < 1e-8, "error {}", err);
    }

    /// Forward Hessians of quadratics are exact for any step.
    #[test]
    fn forward_hessian_exact(
        q in quadratic(),
        x0 in prop::array::uniform3(-2.0..2.0_f64),
        h in 0.01..1.0_f64,
    ) {
        let f = |x: &[f64]| q.eval(x);
        let s = frame();
        let t = DirectionMatrix::identity(3).unwrap();
        let est = hessian(&f, &x0, &s, &t, h).unwrap();
        let truth = 2.0 * &q.a;
        let err = max_diff(est.iter(), truth.iter());
        prop_assert!(err < 1e-6, "error {}", err);

        let centered = centered_hessian(&f, &x0, &s, &t, h).unwrap();
        prop_assert!(max_diff(centered.iter(), truth.iter()) < 1e-6);
    }

    /// Along the standard basis the forward bias is exactly `h · diag(A)`.
    #[test]
    fn forward_gradient_bias(
        q in quadratic(),
        x0 in prop::array::uniform3(-2.0..2.0_f64),
        h in 0.01..1.0_f64,
    ) {
        let f = |x: &[f64]| q.eval(x);
        let s = DirectionMatrix::identity(3).unwrap();
        let est = gradient(&f, &x0, &s, h).unwrap();
        let truth = q.gradient(&x0);
        for i in 0..3 {
            let bias = est[i] - truth[i];
            prop_assert!((bias - h * q.a[[i, i]]).abs() < 1e-8, "axis {}: bias {}", i, bias);
        }
    }

    /// The recursive engine's second layer is exact on quadratics too.
    #[test]
    fn engine_hessian_exact(
        q in quadratic(),
        x0 in prop::array::uniform3(-2.0..2.0_f64),
        h in 0.01..1.0_f64,
    ) {
        let f = |x: &[f64]| q.eval(x);
        let engine = SimplexEngine::new(vec![frame(), frame()], h).unwrap();
        let est = engine.derivative(&f, &x0, 2).unwrap();
        let truth = 2.0 * &q.a;
        prop_assert!(max_diff(est.iter(), truth.iter()) < 1e-6);
    }
}
