//! Error types for the lattice core.

use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy for conversion, configuration, and remote sync.
///
/// Conversion errors propagate unchanged through every recursive frame; only
/// the top-level context frame logs them, and only a batch driver may swallow
/// them (see [`crate::batch`]).
#[derive(Error, Debug)]
pub enum Error {
    /// No converter in the active strategy claims the value.
    #[error("no type converter found for {rendered} (strategy {strategy})")]
    UnsupportedType {
        rendered: String,
        strategy: &'static str,
    },

    /// Any other failure raised during recursive conversion.
    #[error("conversion failed: {message}")]
    Conversion { message: String },

    /// Bad or missing project configuration.
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// Failure communicating with the schema service. Aborts the affected
    /// entity's remaining sync steps only.
    #[error("schema service error: {message}")]
    Sync { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub fn conversion(message: impl Into<String>) -> Self {
        Error::Conversion {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    pub fn sync(message: impl Into<String>) -> Self {
        Error::Sync {
            message: message.into(),
        }
    }
}
