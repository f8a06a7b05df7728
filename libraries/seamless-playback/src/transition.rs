//! Track transition detection
//!
//! The current track is a function of stream position. Each position
//! update re-derives it and, when it differs from the recorded one,
//! reports a transition so the page can move its highlights. Lyrics
//! panels follow the listener: an open panel on the outgoing track is
//! closed and its counterpart on the incoming track opened.

use crate::track_index::TrackIndex;

/// A change of current track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackTransition {
    /// Index of the outgoing track
    pub previous: usize,

    /// Index of the incoming track
    pub current: usize,

    /// Track whose lyrics panel must be closed
    pub close_lyrics: Option<usize>,

    /// Track whose lyrics panel must be opened
    pub open_lyrics: Option<usize>,
}

/// Derives the current track from position updates
#[derive(Debug, Clone)]
pub struct TrackTransitionDetector {
    current: usize,
    /// Lyrics panel per track: `None` when the track has none, else open
    lyrics: Vec<Option<bool>>,
    /// Open the next available panel even though the last track had none
    wants_lyrics: bool,
}

impl TrackTransitionDetector {
    /// Detector starting on the first track, with no lyrics panels
    pub fn new(track_count: usize) -> Self {
        Self {
            current: 0,
            lyrics: vec![None; track_count],
            wants_lyrics: false,
        }
    }

    /// Register that `index` has a lyrics panel, open or closed
    pub fn register_lyrics(&mut self, index: usize, open: bool) {
        if let Some(slot) = self.lyrics.get_mut(index) {
            *slot = Some(open);
        }
    }

    /// The listener opened or closed a panel
    pub fn set_lyrics_open(&mut self, index: usize, open: bool) {
        if let Some(Some(state)) = self.lyrics.get_mut(index) {
            *state = open;
        }
    }

    /// Whether `index` has a lyrics panel that is open
    pub fn lyrics_open(&self, index: usize) -> bool {
        matches!(self.lyrics.get(index), Some(Some(true)))
    }

    /// Index of the current track
    pub fn current(&self) -> usize {
        self.current
    }

    /// Resolve `time` and report a transition if the track changed
    ///
    /// A position covered by no track changes nothing.
    pub fn observe(&mut self, tracks: &TrackIndex, time: f64) -> Option<TrackTransition> {
        let track = tracks.track_for_position(time)?;
        if track.index == self.current {
            return None;
        }

        let previous = self.current;
        let mut open = self.wants_lyrics;
        let mut close_lyrics = None;

        match self.lyrics.get(previous).copied().flatten() {
            Some(true) => {
                open = true;
                close_lyrics = Some(previous);
                self.lyrics[previous] = Some(false);
            }
            Some(false) => {
                self.wants_lyrics = false;
                open = false;
            }
            None => {}
        }

        self.current = track.index;

        let mut open_lyrics = None;
        if open {
            match self.lyrics.get_mut(track.index) {
                Some(Some(state)) => {
                    *state = true;
                    open_lyrics = Some(track.index);
                }
                _ => self.wants_lyrics = true,
            }
        }

        tracing::debug!("Track {} -> {} at {:.2}s", previous, track.index, time);

        Some(TrackTransition {
            previous,
            current: track.index,
            close_lyrics,
            open_lyrics,
        })
    }
}
