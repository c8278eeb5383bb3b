//! Error types for the image optimizer.
//!
//! Provides a hierarchy of error types using `thiserror` for ergonomic error handling.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use serde::Serialize;

/// Validation errors for caller-supplied settings and paths.
#[derive(Error, Debug, Clone, Serialize, PartialEq)]
pub enum ValidationError {
    /// Path-related validation error
    #[error("Path error: {0}")]
    Path(#[from] PathError),
    /// Invalid settings error
    #[error("Settings error: {0}")]
    Settings(String),
}

/// File path errors.
#[derive(Error, Debug, Clone, Serialize, PartialEq)]
pub enum PathError {
    /// File does not exist
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    /// Path exists but is not a file
    #[error("Not a file: {0}")]
    NotFile(PathBuf),
    /// IO error accessing the path
    #[error("IO error: {0}")]
    IO(String),
}

/// Main error type for the optimizer.
///
/// Encoding failures are scoped to a single entry; batch operations collect
/// them per entry instead of aborting.
#[derive(Error, Debug, Clone, Serialize, PartialEq)]
pub enum OptimizerError {
    /// Input or settings validation failed
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Raw file could not be read into memory
    #[error("Read error: {0}")]
    Read(String),

    /// Source bytes could not be decoded into pixels
    #[error("Decode error: {0}")]
    Decode(String),

    /// No rendering surface, or the encoder produced no output
    #[error("Encode error: {0}")]
    Encode(String),

    /// File IO error
    #[error("IO error: {0}")]
    IO(String),

    /// Invalid or unreadable configuration
    #[error("Config error: {0}")]
    Config(String),
}

/// Convenience result type for optimizer operations.
pub type OptimizerResult<T> = Result<T, OptimizerError>;

impl OptimizerError {
    pub fn read<T: Into<String>>(msg: T) -> Self {
        Self::Read(msg.into())
    }

    pub fn decode<T: Into<String>>(msg: T) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode<T: Into<String>>(msg: T) -> Self {
        Self::Encode(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        Self::IO(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }

    pub fn settings<T: Into<String>>(msg: T) -> Self {
        Self::Validation(ValidationError::settings(msg))
    }
}

impl ValidationError {
    pub fn path_not_found(path: impl Into<PathBuf>) -> Self {
        Self::Path(PathError::NotFound(path.into()))
    }

    pub fn not_a_file(path: impl Into<PathBuf>) -> Self {
        Self::Path(PathError::NotFile(path.into()))
    }

    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}

impl From<io::Error> for OptimizerError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

impl From<io::Error> for PathError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

impl From<PathError> for OptimizerError {
    fn from(err: PathError) -> Self {
        Self::Validation(ValidationError::Path(err))
    }
}

impl From<serde_json::Error> for OptimizerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_errors_nest_under_validation() {
        let err: OptimizerError = PathError::NotFound(PathBuf::from("missing.png")).into();
        assert_eq!(
            err.to_string(),
            "Validation error: Path error: File not found: missing.png"
        );
    }

    #[test]
    fn errors_serialize_with_variant_tag() {
        let json = serde_json::to_value(OptimizerError::decode("bad header")).unwrap();
        assert_eq!(json, serde_json::json!({ "Decode": "bad header" }));
    }
}
