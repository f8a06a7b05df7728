//! Player Events
//!
//! Transport notifications flow in, rendering effects flow out:
//! - `TransportEvent` is what the media element reports
//! - `UiEffect` is what the page must show in response
//!
//! Handlers on the controller return effects instead of touching the page,
//! so the whole interaction model runs headless.

use crate::types::{Control, ControlClass};
use crate::volume::VolumeLevel;
use serde::{Deserialize, Serialize};

/// Delay between adding `trans` and completing a class swap
pub const CLASS_SWAP_DELAY_MS: u32 = 200;

/// Notifications from the media transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum TransportEvent {
    /// Native position update
    TimeUpdate,

    /// More of the stream was buffered
    Progress,

    /// The stream can start playing
    CanPlay,

    /// Playback started
    Play,

    /// Playback paused
    Pause,

    /// The stream failed mid-playback
    Error {
        /// What the runtime reported
        message: String,
    },
}

/// Rendering effects for the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum UiEffect {
    /// Delayed class swap on a control
    ///
    /// Only runs if the control carries `from`: add `trans`, then after
    /// [`CLASS_SWAP_DELAY_MS`] remove `from`, add `to`, remove `trans`.
    SwapClass {
        /// Target control
        control: Control,
        /// Class that must be present
        from: ControlClass,
        /// Class that replaces it
        to: ControlClass,
    },

    /// Show the current track's title
    SetTitle {
        /// Title text
        title: String,
    },

    /// Hide the title display
    HideTitle,

    /// Elapsed and total time labels
    SetTime {
        /// Time into the current track
        elapsed: String,
        /// Length of the current track
        total: String,
    },

    /// Seek bar fill, `0..=1`
    SetSeekPosition {
        /// Fill fraction
        fraction: f64,
    },

    /// Buffered fill, `0..=1`
    SetBuffered {
        /// Fill fraction
        fraction: f64,
    },

    /// Skip button enablement
    SetSkipState {
        /// `skip-prev` carries `disabled`
        prev_disabled: bool,
        /// `skip-next` carries `disabled`
        next_disabled: bool,
    },

    /// Hide both skip buttons (single-track release)
    HideSkipButtons,

    /// Volume icon, tooltip and bar fill
    SetVolume {
        /// Icon class
        level: VolumeLevel,
        /// Tooltip
        title: String,
        /// Volume bar fill fraction
        fill: f64,
    },

    /// Replaygain button class (`replaygain` or `replaygain-off`)
    SetReplaygain {
        /// Whether compensation is on
        enabled: bool,
    },

    /// Volume drop-down `open` class
    SetVolumeDropOpen {
        /// Whether the drop-down is open
        open: bool,
    },

    /// Open or close a track's lyrics panel
    SetLyricsOpen {
        /// Track slug
        slug: String,
        /// New state
        open: bool,
    },

    /// A track row's duration label
    SetTrackDuration {
        /// Track slug
        slug: String,
        /// Formatted length
        label: String,
    },

    /// No playable format was found
    Unavailable {
        /// Why
        reason: String,
    },
}

impl UiEffect {
    /// Class swap helper
    pub fn swap(control: Control, from: ControlClass, to: ControlClass) -> Self {
        Self::SwapClass { control, from, to }
    }
}
