//! Error types for simdloc.
//!
//! Only setup and data loading failures are errors. Violated numeric
//! preconditions (kernel domains, degenerate weights) are programmer errors
//! and are caught by debug assertions instead.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while configuring the filter or loading its inputs.
#[derive(Debug, Error)]
pub enum LocalizationError {
    /// An input file could not be opened or read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The observation CSV could not be parsed or written.
    #[error("observation data error: {0}")]
    Csv(#[from] csv::Error),

    /// A record parsed but holds values the filter cannot use.
    #[error("malformed observation {index}: {message}")]
    MalformedObservation { index: usize, message: String },

    /// An observation names a landmark the world does not know.
    #[error("observation {index} references landmark {id}, but only {known} landmarks are registered")]
    UnknownLandmark { index: usize, id: usize, known: usize },

    /// The YAML configuration could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),

    /// The configuration parsed but violates a constraint.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The floating point environment does not match the kernels' assumptions.
    #[error("numeric environment misconfigured: {0}")]
    NumericEnvironment(String),
}

/// Result type alias for simdloc operations.
pub type Result<T> = std::result::Result<T, LocalizationError>;

/// Creates an I/O error tagged with the path being accessed.
pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> LocalizationError {
    LocalizationError::Io {
        path: path.into(),
        source,
    }
}

/// Creates an invalid configuration error.
pub fn invalid_config(message: impl Into<String>) -> LocalizationError {
    LocalizationError::InvalidConfig {
        message: message.into(),
    }
}

/// Creates a malformed observation error.
pub fn malformed_observation(index: usize, message: impl Into<String>) -> LocalizationError {
    LocalizationError::MalformedObservation {
        index,
        message: message.into(),
    }
}
