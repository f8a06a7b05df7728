//! Core types for the playback controller

use serde::{Deserialize, Serialize};

/// Transport status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportStatus {
    /// Currently playing
    Playing,

    /// Paused (also the state before first play)
    Paused,
}

/// Snapshot of the controller's state
///
/// Everything the widget displays derives from these values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    /// Index of the track the position last resolved to
    pub current_track_index: usize,

    /// Transport status
    pub status: TransportStatus,

    /// Continuous stream position in seconds
    pub position: f64,

    /// User-facing volume, compensation divided out (`0..=max_volume`)
    pub volume: f64,

    /// Upper bound of `volume`
    pub max_volume: f64,

    /// Whether loudness compensation is applied
    pub replaygain_enabled: bool,

    /// Negotiated format name, `None` when nothing is playable
    pub format: Option<String>,
}

/// A transport control on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Control {
    /// The widget's play/pause toggle
    GlobalPlayPause,

    /// A track row's play/pause button, keyed by track slug
    Track(String),
}

/// Icon state class carried by a transport control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlClass {
    /// Waiting for the stream to become playable
    Loading,

    /// Shows a play icon (transport is paused)
    Play,

    /// Shows a pause icon (transport is playing)
    Pause,
}

impl ControlClass {
    /// CSS class name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Play => "play",
            Self::Pause => "pause",
        }
    }
}

/// Bounding box of a bar element in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BarRect {
    /// Left edge
    pub left: f64,

    /// Top edge
    pub top: f64,

    /// Width
    pub width: f64,

    /// Height
    pub height: f64,
}
