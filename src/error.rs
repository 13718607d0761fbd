use thiserror::Error;

/// Validation and numerical failures reported by the simplex estimators.
///
/// Every variant is a local precondition violation: nothing is retried and no
/// partial tensor is ever returned alongside an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimplexError {
    /// A direction matrix with no rows or no columns.
    #[error("direction matrix must be non-empty, got {rows}x{cols}")]
    EmptyDirections { rows: usize, cols: usize },

    /// Two inputs disagree on a dimension (point length vs. matrix rows, tensor
    /// axis vs. projector width, ...).
    #[error("{context}: expected dimension {expected}, found {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    /// A precomputed value array whose shape does not match the direction sets.
    #[error("values must have shape {expected:?}, found {found:?}")]
    ValuesShape {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// A step size that is zero, negative or not finite.
    #[error("step size for level {level} must be positive and finite, got {value}")]
    InvalidStep { level: usize, value: f64 },

    /// A per-level step list whose length does not match the number of levels.
    #[error("expected {expected} step sizes, found {found}")]
    StepCount { expected: usize, found: usize },

    /// A direction set that cannot support the requested operation.
    #[error("degenerate directions: {0}")]
    DegenerateDirections(&'static str),

    /// A non-finite entry in a direction matrix or base point.
    #[error("{context} contains a non-finite entry")]
    NonFiniteInput { context: &'static str },

    /// The oracle produced NaN or an infinity.
    #[error("oracle returned {value} at {point:?}")]
    NonFiniteOracleValue { point: Vec<f64>, value: f64 },

    /// A gradient/Hessian/tensor oracle returned the wrong number of entries.
    #[error("oracle output must have shape {expected:?}, found {found:?}")]
    OracleOutput {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// A sample grid with more entries than a `usize` can count.
    #[error("sample grid of shape {shape:?} is too large to evaluate")]
    GridTooLarge { shape: Vec<usize> },

    /// A Lipschitz constant that is negative or not finite.
    #[error("Lipschitz constant must be finite and non-negative, got {0}")]
    InvalidLipschitz(f64),

    /// The recursive engine was given no direction matrices.
    #[error("at least one direction level is required")]
    NoLevels,

    /// A derivative order outside `1..=max`.
    #[error("derivative order {order} is outside 1..={max}")]
    OrderOutOfRange { order: usize, max: usize },

    /// The SVD backing the pseudoinverse failed.
    #[error("pseudoinverse failed: {0}")]
    Pseudoinverse(String),

    /// Tensor reshaping failed.
    #[error("tensor shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

pub type Result<T> = std::result::Result<T, SimplexError>;
