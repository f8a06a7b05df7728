//! Stream format candidates

use serde::{Deserialize, Serialize};

/// A transcode format the server can stream
///
/// `name` is what the transcoding endpoint expects in its `format` query
/// parameter, `mime` is what the runtime's codec-support query is asked about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format {
    /// Server-side format name
    pub name: String,

    /// MIME type, optionally with a `codecs` parameter
    pub mime: String,
}

impl Format {
    /// Create a new format candidate
    pub fn new(name: impl Into<String>, mime: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
        }
    }
}
