//! Error types for the SKOS expansion library.
//!
//! All fallible operations return [`SkosError`]. The variants follow the
//! life cycle of an expansion setup: configuration is parsed, a vocabulary is
//! loaded, a concept store is built, and finally the store is queried while
//! token streams are analyzed.
//!
//! Setup-time failures (configuration, format, load, build) are always fatal.
//! Lookups that resolve to no concept are *not* errors; they are logged and
//! produce an empty expansion.
//!
//! # Examples
//!
//! ```
//! use sarissa_skos::error::{SkosError, Result};
//!
//! fn check_buffer(size: usize) -> Result<()> {
//!     if size < 1 {
//!         return Err(SkosError::configuration("'bufferSize' must be a positive integer"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_buffer(0).is_err());
//! ```

use std::io;

use thiserror::Error;

/// Boxed source error carried by [`SkosError::Load`].
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for SKOS expansion operations.
#[derive(Error, Debug)]
pub enum SkosError {
    /// I/O errors (file operations, network, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Missing or invalid settings.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Unsupported vocabulary serialization.
    #[error("Format error: {0}")]
    Format(String),

    /// The vocabulary could not be resolved or parsed.
    #[error("Load error: {message}")]
    Load {
        message: String,
        #[source]
        source: BoxedCause,
    },

    /// The concept store could not be constructed.
    #[error("Build error: {0}")]
    Build(String),

    /// Failures reported by the backing concept store.
    #[error("Store error: {0}")]
    Store(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Binary encoding errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with SkosError.
pub type Result<T> = std::result::Result<T, SkosError>;

impl SkosError {
    /// Create a new configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        SkosError::Configuration(msg.into())
    }

    /// Create a new format error.
    pub fn format<S: Into<String>>(msg: S) -> Self {
        SkosError::Format(msg.into())
    }

    /// Create a new load error wrapping its original cause.
    pub fn load<S, E>(msg: S, source: E) -> Self
    where
        S: Into<String>,
        E: Into<BoxedCause>,
    {
        SkosError::Load {
            message: msg.into(),
            source: source.into(),
        }
    }

    /// Create a new build error.
    pub fn build<S: Into<String>>(msg: S) -> Self {
        SkosError::Build(msg.into())
    }

    /// Create a new store error.
    pub fn store<S: Into<String>>(msg: S) -> Self {
        SkosError::Store(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        SkosError::Analysis(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        SkosError::Serialization(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SkosError::Other(msg.into())
    }

    /// Whether this error belongs to the setup phase (always fatal).
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            SkosError::Configuration(_)
                | SkosError::Format(_)
                | SkosError::Load { .. }
                | SkosError::Build(_)
        )
    }
}

impl From<bincode::Error> for SkosError {
    fn from(err: bincode::Error) -> Self {
        SkosError::Serialization(err.to_string())
    }
}
