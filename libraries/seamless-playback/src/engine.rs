//! Playback engine - one continuous resource, absolute stream time
//!
//! Track boundaries are a logical overlay on top of the engine: moving
//! between tracks is a seek, never a reload.

use crate::{
    error::{PlaybackError, Result},
    source::MediaTransport,
    types::TransportStatus,
};

/// Transport operations over the continuous release stream
#[derive(Debug)]
pub struct PlaybackEngine<T: MediaTransport> {
    transport: T,
    source: Option<String>,
}

impl<T: MediaTransport> PlaybackEngine<T> {
    /// Wrap a transport with no source attached
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            source: None,
        }
    }

    /// Attach the stream URL and begin loading it
    pub fn load_source(&mut self, url: impl Into<String>) {
        let url = url.into();
        tracing::debug!("Loading stream {}", url);
        self.transport.set_source(&url);
        self.transport.load();
        self.source = Some(url);
    }

    /// Attached stream URL
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Whether a stream is attached
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Start or resume playback
    pub fn play(&mut self) -> Result<()> {
        if self.source.is_none() {
            return Err(PlaybackError::NoSourceLoaded);
        }
        self.transport.play()
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.transport.pause();
    }

    /// Toggle between playing and paused
    pub fn toggle(&mut self) -> Result<()> {
        if self.transport.is_paused() {
            self.play()
        } else {
            self.pause();
            Ok(())
        }
    }

    /// Seek to an absolute stream position
    ///
    /// Negative targets clamp to 0, targets past a known duration clamp to it.
    pub fn seek_to(&mut self, time: f64) {
        if !time.is_finite() {
            tracing::warn!("Ignoring seek to non-finite position {}", time);
            return;
        }
        let upper = self.transport.duration().filter(|d| d.is_finite());
        let target = match upper {
            Some(duration) => time.clamp(0.0, duration),
            None => time.max(0.0),
        };
        self.transport.set_current_time(target);
    }

    /// Current stream position
    pub fn position(&self) -> f64 {
        self.transport.current_time()
    }

    /// End of the buffered range
    pub fn buffered_end(&self) -> Option<f64> {
        self.transport.buffered_end()
    }

    /// Total stream duration, once known
    pub fn duration(&self) -> Option<f64> {
        self.transport.duration()
    }

    /// Whether the transport is paused
    pub fn is_paused(&self) -> bool {
        self.transport.is_paused()
    }

    /// Transport status
    pub fn status(&self) -> TransportStatus {
        if self.transport.is_paused() {
            TransportStatus::Paused
        } else {
            TransportStatus::Playing
        }
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Underlying transport (mutable)
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryTransport;

    #[test]
    fn play_without_source_fails() {
        let mut engine = PlaybackEngine::new(MemoryTransport::new());
        assert!(matches!(engine.play(), Err(PlaybackError::NoSourceLoaded)));
        assert_eq!(engine.status(), TransportStatus::Paused);
    }

    #[test]
    fn load_source_attaches_and_loads() {
        let mut engine = PlaybackEngine::new(MemoryTransport::new());
        engine.load_source("memory://release");
        assert_eq!(engine.source(), Some("memory://release"));
        assert!(engine.transport().is_loaded());
    }

    #[test]
    fn toggle_flips_status() {
        let mut engine = PlaybackEngine::new(MemoryTransport::new());
        engine.load_source("memory://release");
        engine.toggle().unwrap();
        assert_eq!(engine.status(), TransportStatus::Playing);
        engine.toggle().unwrap();
        assert_eq!(engine.status(), TransportStatus::Paused);
    }

    #[test]
    fn seek_clamps_to_stream_bounds() {
        let mut engine = PlaybackEngine::new(MemoryTransport::with_duration(360.0));
        engine.seek_to(-5.0);
        assert_eq!(engine.position(), 0.0);
        engine.seek_to(400.0);
        assert_eq!(engine.position(), 360.0);
        engine.seek_to(200.0);
        assert_eq!(engine.position(), 200.0);
    }

    #[test]
    fn non_finite_seek_is_ignored() {
        let mut engine = PlaybackEngine::new(MemoryTransport::with_duration(360.0));
        engine.seek_to(42.0);
        engine.seek_to(f64::NAN);
        assert_eq!(engine.position(), 42.0);
    }
}
