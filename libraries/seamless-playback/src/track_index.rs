//! Track boundary table
//!
//! Maps continuous stream time onto the logical tracks of a release.

use crate::error::Result;
use seamless_core::{CoreError, Track, TrackDescriptor};

/// Ordered, non-overlapping track boundaries over one continuous stream
#[derive(Debug, Clone, PartialEq)]
pub struct TrackIndex {
    tracks: Vec<Track>,
}

impl TrackIndex {
    /// Build the table from page descriptors
    ///
    /// Fails on an empty list, on a track whose end precedes its start, and
    /// on a track that starts before the previous one ends.
    pub fn from_descriptors(descriptors: Vec<TrackDescriptor>) -> Result<Self> {
        if descriptors.is_empty() {
            return Err(CoreError::NoTracks.into());
        }

        let tracks: Vec<Track> = descriptors
            .into_iter()
            .enumerate()
            .map(|(index, descriptor)| Track::from_descriptor(descriptor, index))
            .collect();

        for track in &tracks {
            if !track.start.is_finite() || !track.end.is_finite() {
                return Err(CoreError::invalid_track_table(track.index, "non-finite boundary").into());
            }
            if track.end < track.start {
                return Err(CoreError::invalid_track_table(
                    track.index,
                    format!("ends at {} before it starts at {}", track.end, track.start),
                )
                .into());
            }
        }

        for pair in tracks.windows(2) {
            if pair[1].start < pair[0].end {
                return Err(CoreError::invalid_track_table(
                    pair[1].index,
                    format!(
                        "starts at {} before previous track ends at {}",
                        pair[1].start, pair[0].end
                    ),
                )
                .into());
            }
        }

        Ok(Self { tracks })
    }

    /// The track playing at continuous time `time`
    ///
    /// Boundaries are half-open (`start <= time < end`), except that the
    /// final track's end still belongs to the final track so the end of the
    /// stream resolves to something. Time before the first track, in a gap,
    /// or past the end resolves to nothing.
    pub fn track_for_position(&self, time: f64) -> Option<&Track> {
        if let Some(track) = self.tracks.iter().find(|track| track.contains(time)) {
            return Some(track);
        }
        self.tracks.last().filter(|last| time == last.end)
    }

    /// Track at `index`
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Track with the given slug
    pub fn by_slug(&self, slug: &str) -> Option<&Track> {
        self.tracks.iter().find(|track| track.slug == slug)
    }

    /// First track
    pub fn first(&self) -> &Track {
        // Non-empty by construction
        &self.tracks[0]
    }

    /// Index of the last track
    pub fn last_index(&self) -> usize {
        self.tracks.len() - 1
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Always false; an index holds at least one track
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Whether the release has a single track
    pub fn is_single(&self) -> bool {
        self.tracks.len() == 1
    }

    /// All tracks in stream order
    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }
}

impl<'a> IntoIterator for &'a TrackIndex {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}
