//! Loudness compensation for Seamless
//!
//! This crate provides:
//! - The album compensation factor derived from measured album loudness
//! - The output headroom policy (unity gain vs amplified gain)
//! - The near-unity snap used by pointer-driven volume controls
//!
//! # Control Flow
//!
//! ```text
//! ┌──────────────┐     ┌────────────────────┐     ┌───────────────┐
//! │ Album LUFS   │ ──► │ AlbumCompensation  │ ──► │ factor (lin.) │
//! └──────────────┘     └────────────────────┘     └───────────────┘
//!                               │
//!                               ▼
//!                      ┌────────────────────┐
//!                      │ Headroom (limits)  │
//!                      └────────────────────┘
//!
//! During Playback:
//! ┌──────────────┐     ┌────────────────────┐     ┌───────────────┐
//! │ Stored vol.  │ ──► │ × factor (if on)   │ ──► │ Output gain   │
//! └──────────────┘     └────────────────────┘     └───────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use seamless_loudness::{AlbumCompensation, Headroom};
//!
//! let compensation = AlbumCompensation::new(-18.0).unwrap();
//! assert!((compensation.factor() - 3.981).abs() < 0.001);
//!
//! // Without an amplification graph the player cannot boost.
//! let limited = compensation.limited_to(Headroom::Unity);
//! assert_eq!(limited.factor(), 1.0);
//! ```

#![deny(unsafe_code)]

mod compensation;
mod error;
pub mod headroom;

pub use compensation::{compensation_factor, relative_loudness, AlbumCompensation};
pub use error::{LoudnessError, Result};
pub use headroom::Headroom;

/// Target output level for compensation, in dB
///
/// R128 is -23, ReplayGain is -18, Apple Music is -16, Spotify and YouTube
/// are -14. Releases mastered for stores that apply no normalization sound
/// very quiet against any of those, so a louder target is used.
pub const REFERENCE_LEVEL: f64 = -12.0;

/// EBU R128 broadcast reference level (-23 LUFS)
pub const EBU_R128_BROADCAST_LUFS: f64 = -23.0;

/// ReplayGain 2.0 reference loudness level (-18 LUFS)
pub const REPLAYGAIN_REFERENCE_LUFS: f64 = -18.0;

/// Streaming platform reference level (-14 LUFS)
pub const STREAMING_REFERENCE_LUFS: f64 = -14.0;
