use std::io;
use thiserror::Error;

/// Error type for invalid model definitions and failed functional evaluations.
#[derive(Error, Debug)]
pub enum FexError {
    // generic error with custom message
    #[error("{0}")]
    Error(String),

    // errors raised during construction
    #[error("Invalid parameter: {name} = {value}.")]
    InvalidParameter { name: String, value: f64 },
    #[error("The molecule has {0} density channels while the input specifies {1}.")]
    IncompatibleChannels(usize, usize),
    #[error("Fields are defined on incompatible grids: {0}")]
    GridMismatch(String),

    // errors raised during evaluation
    #[error("`{routine}` left the valid domain of the equation of state at density {density}.")]
    DomainError { routine: String, density: f64 },

    // errors related to file handling
    #[error(transparent)]
    FileIO(#[from] io::Error),

    // json errors
    #[error(transparent)]
    Serde(#[from] serde_json::Error),

    // errors related to parameter handling
    #[error("The following record(s) were not found: {0}")]
    RecordNotFound(String),
}

impl FexError {
    /// Construction error for a parameter outside of its valid range.
    pub fn invalid_parameter<S: Into<String>>(name: S, value: f64) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            value,
        }
    }
}

/// Convenience type for `Result<T, FexError>`.
pub type FexResult<T> = Result<T, FexError>;
