//! Album loudness compensation
//!
//! The compensation factor scales output gain so releases mastered at
//! different loudness play back at a similar perceived level:
//!
//! - Relative loudness = Reference Level (-12 dB) - Album Loudness
//! - Factor = 10^(Relative Loudness / 10)

use crate::{Headroom, LoudnessError, Result, REFERENCE_LEVEL};

/// Relative loudness of an album against [`REFERENCE_LEVEL`], in dB
pub fn relative_loudness(album_loudness: f64) -> f64 {
    REFERENCE_LEVEL - album_loudness
}

/// Linear compensation factor for an album against [`REFERENCE_LEVEL`]
pub fn compensation_factor(album_loudness: f64) -> f64 {
    10.0_f64.powf(relative_loudness(album_loudness) / 10.0)
}

/// Compensation for one album
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlbumCompensation {
    /// Measured album loudness, `None` when the server had no measurement
    album_loudness: Option<f64>,
    /// Reference level the factor was computed against
    reference_level: f64,
    /// Linear gain multiplier
    factor: f64,
}

impl AlbumCompensation {
    /// Compensation against the default reference level
    pub fn new(album_loudness: f64) -> Result<Self> {
        Self::with_reference(album_loudness, REFERENCE_LEVEL)
    }

    /// Compensation against a custom reference level
    pub fn with_reference(album_loudness: f64, reference_level: f64) -> Result<Self> {
        if !album_loudness.is_finite() {
            return Err(LoudnessError::NonFiniteLoudness(album_loudness));
        }
        if !reference_level.is_finite() {
            return Err(LoudnessError::NonFiniteReference(reference_level));
        }

        Ok(Self {
            album_loudness: Some(album_loudness),
            reference_level,
            factor: 10.0_f64.powf((reference_level - album_loudness) / 10.0),
        })
    }

    /// No measurement available: the factor is 1
    pub fn unmeasured() -> Self {
        Self {
            album_loudness: None,
            reference_level: REFERENCE_LEVEL,
            factor: 1.0,
        }
    }

    /// Measured album loudness
    pub fn album_loudness(&self) -> Option<f64> {
        self.album_loudness
    }

    /// Reference level in dB
    pub fn reference_level(&self) -> f64 {
        self.reference_level
    }

    /// Relative loudness in dB (0 when unmeasured)
    pub fn relative_db(&self) -> f64 {
        self.album_loudness
            .map_or(0.0, |loudness| self.reference_level - loudness)
    }

    /// Linear gain multiplier
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Restrict the factor to what the output path can deliver
    ///
    /// Under [`Headroom::Unity`] the output cannot exceed native gain, so a
    /// boosting factor is dropped to 1. Attenuating factors are kept.
    pub fn limited_to(mut self, headroom: Headroom) -> Self {
        if !headroom.allows_boost() && self.factor > 1.0 {
            tracing::warn!(
                "Can't make audio louder than 100% without an amplification graph, ignoring gain of {:.2} dB",
                self.relative_db()
            );
            self.factor = 1.0;
        }
        self
    }

    /// Output gain for a stored preference
    pub fn apply(&self, stored_volume: f64, enabled: bool) -> f64 {
        if enabled {
            stored_volume * self.factor
        } else {
            stored_volume
        }
    }

    /// Stored preference for an output gain (compensation divided out)
    pub fn remove(&self, output_volume: f64, enabled: bool) -> f64 {
        if enabled {
            output_volume / self.factor
        } else {
            output_volume
        }
    }
}

impl Default for AlbumCompensation {
    fn default() -> Self {
        Self::unmeasured()
    }
}
