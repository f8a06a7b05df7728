//! Platform-agnostic media transport trait
//!
//! Abstracts the single media resource the player streams from (an HTML
//! audio element in the browser, an in-memory clock headless).

use crate::error::{PlaybackError, Result};

/// Platform-agnostic media transport
///
/// Implementors own one continuous media resource and report their own
/// play/pause/time notifications back to the player. All times are
/// absolute seconds into the continuous stream.
pub trait MediaTransport {
    /// Point the transport at a new resource URL
    fn set_source(&mut self, url: &str);

    /// Begin fetching the current resource
    fn load(&mut self);

    /// Start or resume playback
    ///
    /// # Returns
    /// * `Ok(())` - Playback was requested
    /// * `Err(_)` - The runtime refused (no source, autoplay policy, ...)
    fn play(&mut self) -> Result<()>;

    /// Pause playback
    fn pause(&mut self);

    /// Whether the transport is paused
    fn is_paused(&self) -> bool;

    /// Current position
    fn current_time(&self) -> f64;

    /// Move to an absolute position
    fn set_current_time(&mut self, time: f64);

    /// Total duration, once known
    fn duration(&self) -> Option<f64>;

    /// End of the last buffered range, if anything is buffered
    fn buffered_end(&self) -> Option<f64>;
}

/// In-memory transport for headless use and tests
///
/// Keeps a position that only moves when told to (`advance`), so callers
/// control time explicitly.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    source: Option<String>,
    loaded: bool,
    paused: bool,
    position: f64,
    duration: Option<f64>,
    buffered_end: Option<f64>,
    play_calls: usize,
}

impl MemoryTransport {
    /// Create a paused transport at position zero
    pub fn new() -> Self {
        Self {
            paused: true,
            ..Self::default()
        }
    }

    /// Create a transport with a known duration
    pub fn with_duration(duration: f64) -> Self {
        Self {
            duration: Some(duration),
            ..Self::new()
        }
    }

    /// Advance the clock by `seconds` if playing, stopping at the duration
    pub fn advance(&mut self, seconds: f64) {
        if self.paused {
            return;
        }
        let next = self.position + seconds;
        self.position = match self.duration {
            Some(duration) if next >= duration => {
                self.paused = true;
                duration
            }
            _ => next,
        };
    }

    /// Set the buffered extent
    pub fn set_buffered_end(&mut self, end: Option<f64>) {
        self.buffered_end = end;
    }

    /// Attached source URL
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Whether `load` was called for the current source
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Number of successful `play` calls
    pub fn play_calls(&self) -> usize {
        self.play_calls
    }
}

impl MediaTransport for MemoryTransport {
    fn set_source(&mut self, url: &str) {
        self.source = Some(url.to_string());
        self.loaded = false;
        self.position = 0.0;
    }

    fn load(&mut self) {
        self.loaded = self.source.is_some();
    }

    fn play(&mut self) -> Result<()> {
        if self.source.is_none() {
            return Err(PlaybackError::NoSourceLoaded);
        }
        self.paused = false;
        self.play_calls += 1;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn set_current_time(&mut self, time: f64) {
        self.position = match self.duration {
            Some(duration) => time.clamp(0.0, duration),
            None => time.max(0.0),
        };
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn buffered_end(&self) -> Option<f64> {
        self.buffered_end
    }
}
