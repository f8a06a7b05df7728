//! Pointer and display math for the widget's bars and buttons

use crate::time::format_time;
use crate::track_index::TrackIndex;
use crate::types::BarRect;
use seamless_core::{Track, VolumeBarOrientation};
use serde::{Deserialize, Serialize};

impl BarRect {
    /// Horizontal pointer position as a fraction of the bar, clamped
    pub fn fraction_x(&self, client_x: f64) -> f64 {
        clamp_unit((client_x - self.left) / self.width)
    }

    /// Vertical pointer position as a fraction of the bar, top is 1
    pub fn fraction_y(&self, client_y: f64) -> f64 {
        1.0 - clamp_unit((client_y - self.top) / self.height)
    }

    /// Pointer fraction along a volume bar of the given orientation
    pub fn volume_fraction(&self, orientation: VolumeBarOrientation, x: f64, y: f64) -> f64 {
        match orientation {
            VolumeBarOrientation::Vertical => self.fraction_y(y),
            VolumeBarOrientation::Horizontal => self.fraction_x(x),
        }
    }
}

/// Clamp to `[0, 1]`; NaN (zero-sized bar) reads as 0
fn clamp_unit(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Stream time for a seek bar fraction within `track`
pub fn seek_target(track: &Track, fraction: f64) -> f64 {
    track.start + track.length() * clamp_unit(fraction)
}

/// Seek bar fill for `time` within `track`
pub fn progress(track: &Track, time: f64) -> f64 {
    let length = track.length();
    if length > 0.0 {
        (time - track.start) / length
    } else {
        0.0
    }
}

/// Buffered fill for `buffered_end` within `track`, clamped
pub fn buffered_progress(track: &Track, buffered_end: f64) -> f64 {
    clamp_unit(progress(track, buffered_end))
}

/// Skip button enablement for the current track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipState {
    /// Nothing before the current track
    pub prev_disabled: bool,
    /// Nothing after the current track
    pub next_disabled: bool,
}

impl SkipState {
    /// State for `current` in `tracks`
    pub fn for_track(tracks: &TrackIndex, current: usize) -> Self {
        Self {
            prev_disabled: current == 0,
            next_disabled: current >= tracks.last_index(),
        }
    }
}

/// Content of an auto-generated track row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRow {
    /// Track slug (`data-track-slug`)
    pub slug: String,
    /// One-based display number
    pub number: usize,
    /// Title
    pub title: String,
    /// Subtitle, may be empty
    pub subtitle: String,
    /// Formatted length
    pub duration: String,
}

/// Rows for every track, in order
pub fn track_rows(tracks: &TrackIndex) -> Vec<TrackRow> {
    tracks
        .iter()
        .map(|track| TrackRow {
            slug: track.slug.clone(),
            number: track.index + 1,
            title: track.title.clone(),
            subtitle: track.subtitle.clone(),
            duration: format_time(track.length(), None),
        })
        .collect()
}
