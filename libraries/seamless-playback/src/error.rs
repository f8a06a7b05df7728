//! Error types for playback management

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No stream source has been attached
    #[error("No source loaded")]
    NoSourceLoaded,

    /// Trial load of one format failed
    #[error("Trial load of {format} failed: {reason}")]
    TrialFailed {
        /// Format name
        format: String,
        /// What the runtime reported
        reason: String,
    },

    /// Media transport error
    #[error("Transport error: {0}")]
    Transport(String),

    /// Preference storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Unknown track slug
    #[error("Unknown track: {0}")]
    UnknownTrack(String),

    /// Stream URL could not be built
    #[error("Invalid stream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Invalid page configuration or track table
    #[error(transparent)]
    Config(#[from] seamless_core::CoreError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
