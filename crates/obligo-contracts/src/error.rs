//! Error types for the obligo configuration and reporting layers.
//!
//! The extraction engine itself is total: data-quality problems in the input
//! text or in individual rules yield fewer records, never an error. Only
//! loading rule packs, validating overlays, and writing output can fail.

use thiserror::Error;

/// The unified error type for the obligo crates.
#[derive(Debug, Error)]
pub enum ObligoError {
    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A rule pack failed structural validation.
    ///
    /// `reason` lists every violation found, one per line.
    #[error("invalid rule pack: {reason}")]
    RulePackInvalid { reason: String },

    /// Two rules in one pack share the same `id`.
    #[error("duplicate rule id '{id}' in rule pack")]
    DuplicateRuleId { id: String },

    /// A file could not be read or written.
    #[error("i/o error on '{path}': {reason}")]
    Io { path: String, reason: String },

    /// A value could not be serialized for output.
    #[error("serialization error: {reason}")]
    SerializationError { reason: String },

    /// A task overlay references records that do not exist.
    #[error("invalid task overlay: {reason}")]
    OverlayInvalid { reason: String },
}

/// Convenience alias used throughout the obligo crates.
pub type ObligoResult<T> = Result<T, ObligoError>;
