//! Seamless Core
//!
//! Platform-agnostic core types and page configuration for the Seamless
//! gapless release player.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackDescriptor`, `Format`
//! - **Configuration**: `PlayerConfig`, parsed from the attributes a page
//!   embeds next to the player widget
//! - **Error Handling**: `CoreError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use seamless_core::PlayerConfig;
//!
//! let config = PlayerConfig::from_attributes([
//!     ("tracks", r#"[{"slug":"intro","title":"Intro","start":0,"end":95.5}]"#),
//!     ("formats", r#"[{"name":"opus","mime":"audio/ogg; codecs=opus"}]"#),
//!     ("loudness", "-9.4"),
//!     ("releaseSlug", "first-light"),
//! ])
//! .unwrap();
//!
//! assert_eq!(config.tracks.len(), 1);
//! assert_eq!(config.release_slug.as_deref(), Some("first-light"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod types;

pub use config::{PlayerConfig, TrialClip, VolumeBarOrientation};
pub use error::{CoreError, Result};
pub use types::{Format, Track, TrackDescriptor};
