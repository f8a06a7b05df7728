//! Error types for loudness compensation

use thiserror::Error;

/// Result type for loudness operations
pub type Result<T> = std::result::Result<T, LoudnessError>;

/// Errors that can occur while deriving compensation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoudnessError {
    /// Album loudness was NaN or infinite
    #[error("Album loudness is not a finite number: {0}")]
    NonFiniteLoudness(f64),

    /// Reference level was NaN or infinite
    #[error("Reference level is not a finite number: {0}")]
    NonFiniteReference(f64),
}
