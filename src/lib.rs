pub mod bounds;
pub mod centered;
pub mod config;
pub mod difference;
pub mod directions;
pub mod error;
pub mod grid;
pub mod linalg;
pub mod oracle;
pub mod pinv;
pub mod recursive;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use bounds::LipschitzEstimate;
pub use centered::{
    centered, centered_gradient, centered_gradient_from_values, centered_gradient_with,
    centered_hessian, centered_hessian_from_values, centered_hessian_nested,
    centered_hessian_nested_with, centered_hessian_with, Reflect,
};
pub use config::{SimplexConfig, StepSizes};
pub use difference::{
    forward_derivative, forward_derivative_from_values, forward_derivative_from_values_with,
    forward_derivative_with, gradient, gradient_from_values, gradient_with, hessian,
    hessian_from_values, hessian_nested, hessian_nested_with, hessian_with, tressian,
    tressian_from_values, tressian_with, SecondaryDirections,
};
pub use directions::DirectionMatrix;
pub use error::{Result, SimplexError};
pub use grid::SampleGrid;
pub use oracle::{CountingOracle, Oracle};
pub use pinv::{contract_all, Projector};
pub use recursive::{simplex_derivatives, DerivativeLayers, SimplexEngine};

#[cfg(feature = "parallel")]
pub use parallel::{
    forward_derivative_par, forward_derivative_par_with, gradient_par, gradient_par_with,
    hessian_par, hessian_par_with, tressian_par, tressian_par_with,
};
