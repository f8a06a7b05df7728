/// Core error types for Seamless
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for Seamless
#[derive(Error, Debug)]
pub enum CoreError {
    /// A required page attribute was not present
    #[error("Missing attribute: {0}")]
    MissingAttribute(String),

    /// A page attribute could not be parsed
    #[error("Invalid attribute {name}: {reason}")]
    InvalidAttribute {
        /// Attribute name as it appears on the page
        name: String,
        /// What was wrong with it
        reason: String,
    },

    /// Track boundaries are inverted or overlap
    #[error("Invalid track table at index {index}: {reason}")]
    InvalidTrackTable {
        /// Offending track index
        index: usize,
        /// What was wrong with it
        reason: String,
    },

    /// No tracks were supplied
    #[error("Track list is empty")]
    NoTracks,

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Create an invalid attribute error
    pub fn invalid_attribute(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid track table error
    pub fn invalid_track_table(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidTrackTable {
            index,
            reason: reason.into(),
        }
    }
}
