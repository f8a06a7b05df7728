//! Output headroom policy
//!
//! Decides how far output gain may go above native unity gain.
//!
//! # Modes
//!
//! - **Unity**: plain media element volume, capped at 1.0
//! - **Amplified**: output routed through a gain graph, user range up to 1.5
//!
//! # Example
//!
//! ```
//! use seamless_loudness::headroom::Headroom;
//!
//! let headroom = Headroom::Amplified;
//! assert_eq!(headroom.max_volume(), 1.5);
//!
//! // A drag that lands close to 100% lands exactly on it.
//! assert_eq!(headroom.snap(1.04), 1.0);
//! assert_eq!(headroom.snap(1.2), 1.2);
//! ```

/// Headroom available to the output path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Headroom {
    /// Output cannot exceed native gain
    #[default]
    Unity,
    /// Output can be boosted by an amplification graph
    Amplified,
}

impl Headroom {
    /// Upper bound of the user-facing volume range when amplified
    pub const AMPLIFIED_MAX_VOLUME: f64 = 1.5;

    /// Distance from 1.0 within which pointer volume snaps to exactly 1.0
    pub const SNAP_TOLERANCE: f64 = 0.05;

    /// Pick a headroom policy from whether an amplification graph exists
    pub fn detect(graph_available: bool) -> Self {
        if graph_available {
            Self::Amplified
        } else {
            Self::Unity
        }
    }

    /// Whether output gain may exceed 1.0
    pub fn allows_boost(&self) -> bool {
        matches!(self, Self::Amplified)
    }

    /// Upper bound of the user-facing volume range
    pub fn max_volume(&self) -> f64 {
        match self {
            Self::Unity => 1.0,
            Self::Amplified => Self::AMPLIFIED_MAX_VOLUME,
        }
    }

    /// Clamp a user-facing volume to `[0, max_volume]`
    pub fn clamp_volume(&self, volume: f64) -> f64 {
        volume.clamp(0.0, self.max_volume())
    }

    /// Clamp an output gain to what the path can produce
    ///
    /// Unity output is capped at 1.0. Amplified output is only floored at 0.
    pub fn clamp_output(&self, gain: f64) -> f64 {
        match self {
            Self::Unity => gain.clamp(0.0, 1.0),
            Self::Amplified => gain.max(0.0),
        }
    }

    /// Snap a pointer-selected volume to exactly 1.0 when it is close
    ///
    /// Only applies when the range extends past 1.0, otherwise 1.0 is the
    /// end of the bar and already reachable.
    pub fn snap(&self, volume: f64) -> f64 {
        if self.allows_boost() && (volume - 1.0).abs() < Self::SNAP_TOLERANCE {
            1.0
        } else {
            volume
        }
    }

    /// Name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unity => "unity",
            Self::Amplified => "amplified",
        }
    }
}
