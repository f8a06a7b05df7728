//! Track domain types

use serde::{Deserialize, Serialize};

/// Track metadata as the page supplies it
///
/// Offsets are seconds into the continuous release stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    /// URL slug, also used to find the track's row in the page
    pub slug: String,

    /// Track title
    pub title: String,

    /// Secondary line shown under the title
    #[serde(default)]
    pub subtitle: String,

    /// Start offset in seconds
    pub start: f64,

    /// End offset in seconds
    pub end: f64,
}

/// A logical track inside the continuous stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// URL slug
    pub slug: String,

    /// Track title
    pub title: String,

    /// Secondary line shown under the title
    pub subtitle: String,

    /// Start offset in seconds
    pub start: f64,

    /// End offset in seconds
    pub end: f64,

    /// Position in the release, zero-based
    pub index: usize,
}

impl Track {
    /// Create a track from its page descriptor and its position in the release
    pub fn from_descriptor(descriptor: TrackDescriptor, index: usize) -> Self {
        Self {
            slug: descriptor.slug,
            title: descriptor.title,
            subtitle: descriptor.subtitle,
            start: descriptor.start,
            end: descriptor.end,
            index,
        }
    }

    /// Track length in seconds
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `time` falls in `[start, end)`
    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time < self.end
    }
}
