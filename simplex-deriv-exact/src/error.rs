use thiserror::Error;

/// Failures computing exact derivatives or comparing against them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExactError {
    /// Order-`p` derivatives need at least `p + 1` jet coefficients.
    #[error("order {order} needs more than {coefficients} Taylor coefficients")]
    OrderTooHigh { order: usize, coefficients: usize },

    #[error("derivative order must be at least 1")]
    ZeroOrder,

    #[error("evaluation point must be non-empty")]
    EmptyPoint,

    /// The function produced NaN or an infinity.
    #[error("derivative evaluated to {value} at {point:?}")]
    NonFinite { point: Vec<f64>, value: f64 },

    /// An estimate and its reference tensor disagree in shape.
    #[error("estimate has shape {found:?}, reference has shape {expected:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("tensor shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

pub type Result<T> = std::result::Result<T, ExactError>;
