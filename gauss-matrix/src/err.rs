use derive_more::Display;

/// Failures of construction, access, mutation and the function set.
/// All of these are deterministic and surface at the point of detection;
/// a failed mutation leaves its receiver untouched.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum MatError {
    #[display("invalid shape: {_0}")]
    InvalidShape(String),

    #[display("index {index} out of range 1..={bound}")]
    IndexOutOfRange { index: usize, bound: usize },

    #[display("dimension mismatch: {_0}")]
    DimensionMismatch(String),

    #[display("invalid value: {_0}")]
    InvalidValue(String),

    #[display("matrix is not square: shape ({_0}, {_1})")]
    NotSquare(usize, usize),

    #[display("no real eigenvalue")]
    NoRealEigenvalue,

    #[display("no convergence after {_0} iterations")]
    NotConverged(usize)
}

impl std::error::Error for MatError {}
