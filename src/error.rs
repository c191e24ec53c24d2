//! # Error Types
//!
//! This module defines the error and notice types for the chord-chart engine.
//!
//! Text transformations never fail: chart text comes from noisy transcription, so
//! every operation degrades gracefully. The few operations that genuinely can fail
//! (loading configuration, parsing a semitone argument, file I/O in the binary)
//! return [`ChartError`]. Everything else reports a [`Notice`], which is purely
//! informational.
//!
//! ## Usage
//! ```rust
//! use chordchart::{try_transpose_key, Notice};
//!
//! match try_transpose_key("H minor", 2) {
//!     Ok(key) => println!("New key: {}", key),
//!     Err(Notice::UnsupportedKey(key)) => eprintln!("Left '{}' unchanged", key),
//!     Err(other) => eprintln!("{}", other),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    /// Engine configuration could not be read.
    ///
    /// # Example
    /// ```
    /// # use chordchart::ChartError;
    /// let err = ChartError::ConfigError("chord-line: invalid type".to_string());
    /// assert_eq!(err.to_string(), "Invalid configuration: chord-line: invalid type");
    /// ```
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// A semitone count that is not an integer.
    #[error("Invalid semitone count '{0}'")]
    InvalidSteps(String),

    #[error("I/O error on '{path}': {message}")]
    Io { path: String, message: String },
}

/// Informational outcome of a degrading operation.
///
/// None of these abort processing. The operation that produced one has already
/// fallen back to passing its input through unchanged (or, for
/// [`Notice::NoNashvilleMapping`], to showing the plain chord).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    #[error("Unrecognized chord root in '{0}'")]
    UnrecognizedRoot(String),

    #[error("Unsupported key '{0}'")]
    UnsupportedKey(String),

    #[error("No Nashville number for '{chord}' in key '{key}'")]
    NoNashvilleMapping { chord: String, key: String },

    /// A normalization pass found nothing to change.
    #[error("Already normalized: {0}")]
    AlreadyNormalized(&'static str),
}

impl Notice {
    /// Log the notice at debug level and hand it back.
    pub(crate) fn logged(self) -> Self {
        log::debug!("{}", self);
        self
    }
}
