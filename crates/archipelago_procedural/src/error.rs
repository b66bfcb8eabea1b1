//! # Procedural Error Types
//!
//! Generation itself never fails; a rejected candidate is a normal branch.
//! The only fallible surface is loading the world configuration.

use thiserror::Error;

/// Errors that can occur while setting up world generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProceduralError {
    /// A configuration value is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration document is not valid TOML for `WorldConfig`.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),

    /// The configuration file could not be read.
    #[error("failed to read configuration {path}: {message}")]
    ConfigIo {
        /// Path that was read.
        path: String,
        /// Underlying I/O error message.
        message: String,
    },
}

/// Result type for procedural setup operations.
pub type ProceduralResult<T> = Result<T, ProceduralError>;
