//! Error types for msxpack

use std::fmt;

/// Main error type for pack assembly
#[derive(Debug)]
pub enum PackError {
    /// A mirror block's reference start bank has no sibling block
    UnresolvedReference(String),

    /// A declared content digest is absent from the ROM index
    UnresolvedContent(String),

    /// Machine generation missing or not one of the recognized names
    UnsupportedMachine(String),

    /// Block kind outside the fixed enumeration
    UnknownBlockKind(String),

    /// Firmware extension name outside the fixed enumeration
    UnknownExtension(String),

    /// IO error
    IoError(std::io::Error),

    /// JSON parsing error
    JsonError(serde_json::Error),

    /// Generic error with message
    Generic(String),
}

impl fmt::Display for PackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackError::UnresolvedReference(msg) => write!(f, "Unresolved reference: {msg}"),
            PackError::UnresolvedContent(msg) => write!(f, "Unresolved content: {msg}"),
            PackError::UnsupportedMachine(msg) => write!(f, "Unsupported machine: {msg}"),
            PackError::UnknownBlockKind(msg) => write!(f, "Unknown block kind: {msg}"),
            PackError::UnknownExtension(msg) => write!(f, "Unknown extension: {msg}"),
            PackError::IoError(err) => write!(f, "IO error: {err}"),
            PackError::JsonError(err) => write!(f, "JSON error: {err}"),
            PackError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PackError {}

impl From<std::io::Error> for PackError {
    fn from(err: std::io::Error) -> Self {
        PackError::IoError(err)
    }
}

impl From<serde_json::Error> for PackError {
    fn from(err: serde_json::Error) -> Self {
        PackError::JsonError(err)
    }
}

impl From<anyhow::Error> for PackError {
    fn from(err: anyhow::Error) -> Self {
        PackError::Generic(err.to_string())
    }
}

/// Result type for pack operations
pub type Result<T> = std::result::Result<T, PackError>;
