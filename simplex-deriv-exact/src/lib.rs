//! Ground-truth derivatives for checking `simplex-deriv` estimates.
//!
//! Functions are written once over [`Scalar`], evaluated at `f64` by the
//! estimators and at [`Jet`] here. [`derivative_tensor`] recovers every mixed
//! partial of a given order exactly (to rounding) from directional Taylor
//! passes; [`ErrorReport`] and [`compare_layers`] measure how far an estimate
//! is from it.

pub mod error;
pub mod exact;
pub mod float;
pub mod jet;
pub mod lipschitz;
pub mod report;
pub mod scalar;
pub mod taylor_ops;

pub use error::{ExactError, Result};
pub use exact::{derivative_tensor, directional_derivative, gradient, hessian};
pub use float::Float;
pub use jet::{Jet, Jet64};
pub use lipschitz::{hessian_lipschitz, max_abs_derivative, tressian_lipschitz};
pub use report::{compare_layers, ErrorReport};
pub use scalar::Scalar;
