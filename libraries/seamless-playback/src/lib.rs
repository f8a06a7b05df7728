//! Seamless - Gapless Playback
//!
//! Playback controller for a release streamed as one continuous resource.
//!
//! This crate provides:
//! - Track boundary table and position-to-track resolution
//! - Format negotiation by trial load
//! - Transport control over absolute stream time
//! - Loudness-compensated volume with a persisted preference
//! - Track transition detection (highlights, titles, lyrics panels)
//! - Pointer math for the seek and volume bars
//! - A cancellable frame ticker
//!
//! # Architecture
//!
//! The controller is platform-agnostic. Every platform concern sits behind
//! a trait with an in-memory implementation in this crate:
//! - [`MediaTransport`] plays the stream
//! - [`GainOutput`] sets the output gain
//! - [`PreferenceStore`] persists preferences
//! - [`FormatProbe`] answers codec queries and runs trial loads
//! - [`FrameScheduler`] schedules display frames
//!
//! Browser implementations live in the `wasm` feature.
//!
//! # Example
//!
//! ```rust
//! use seamless_core::PlayerConfig;
//! use seamless_playback::{
//!     GaplessPlayer, ManualScheduler, MemoryStore, MemoryTransport, PlayerParts,
//!     SoftwareGain, StreamEndpoint, TransportEvent, UiEffect,
//! };
//!
//! let config = PlayerConfig::from_attributes([
//!     ("tracks", r#"[{"slug":"a","title":"A","start":0,"end":180},
//!                   {"slug":"b","title":"B","start":180,"end":360}]"#),
//!     ("formats", r#"[{"name":"opus","mime":"audio/ogg; codecs=opus"}]"#),
//!     ("loudness", "-12"),
//!     ("releaseSlug", "first-light"),
//! ])?;
//!
//! let parts = PlayerParts {
//!     transport: MemoryTransport::with_duration(360.0),
//!     gain: SoftwareGain::amplified(),
//!     store: MemoryStore::new(),
//!     scheduler: ManualScheduler::new(),
//! };
//! let mut player = GaplessPlayer::new(&config, parts)?;
//! let endpoint = StreamEndpoint::with_origin("https://music.example", &config.root)?;
//! player.attach_source(config.formats.first().cloned(), &endpoint)?;
//! player.render_initial();
//!
//! player.engine_mut().seek_to(200.0);
//! player.handle_transport(TransportEvent::TimeUpdate);
//!
//! assert_eq!(player.state().current_track_index, 1);
//! assert!(player.drain_effects().contains(&UiEffect::SetTime {
//!     elapsed: "0:20".to_string(),
//!     total: "3:00".to_string(),
//! }));
//! # Ok::<(), seamless_playback::PlaybackError>(())
//! ```

mod endpoint;
mod engine;
mod error;
pub mod events;
mod format;
mod player;
pub mod preferences;
mod source;
pub mod ticker;
pub mod time;
mod track_index;
mod transition;
pub mod types;
pub mod ui;
mod volume;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use endpoint::{StreamEndpoint, TEST_TRACK_SLUG};
pub use engine::PlaybackEngine;
pub use error::{PlaybackError, Result};
pub use events::{TransportEvent, UiEffect, CLASS_SWAP_DELAY_MS};
pub use format::{CodecSupport, FormatNegotiator, FormatProbe};
pub use player::{GaplessPlayer, PlayerParts};
pub use preferences::{MemoryStore, PreferenceStore, Preferences, StoredPreferences};
pub use source::{MediaTransport, MemoryTransport};
pub use ticker::{FrameScheduler, ManualScheduler, Ticker};
pub use time::format_time;
pub use track_index::TrackIndex;
pub use transition::{TrackTransition, TrackTransitionDetector};
pub use types::{BarRect, Control, ControlClass, PlayerState, TransportStatus};
pub use volume::{GainOutput, SoftwareGain, VolumeController, VolumeLevel};
