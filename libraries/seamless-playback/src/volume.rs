//! Volume control with loudness compensation
//!
//! The user picks a volume in `0..=max_volume`; the output gain is that
//! volume times the album compensation factor while replaygain is on.
//! What gets persisted is always the user-facing volume, so it does not
//! depend on which album happened to be playing.

use seamless_loudness::{AlbumCompensation, Headroom};
use serde::{Deserialize, Serialize};

/// Output gain stage
///
/// One implementation drives the media element's own volume (which cannot
/// exceed 1.0), another drives an amplification graph with room above it.
/// The player picks one at startup and never branches on it again.
pub trait GainOutput {
    /// How far above unity this output can go
    fn headroom(&self) -> Headroom;

    /// Set the linear output gain
    fn set_gain(&mut self, gain: f64);

    /// Current linear output gain
    fn gain(&self) -> f64;
}

impl<G: GainOutput + ?Sized> GainOutput for Box<G> {
    fn headroom(&self) -> Headroom {
        (**self).headroom()
    }

    fn set_gain(&mut self, gain: f64) {
        (**self).set_gain(gain);
    }

    fn gain(&self) -> f64 {
        (**self).gain()
    }
}

/// Gain held in memory, for headless use and tests
#[derive(Debug, Clone, PartialEq)]
pub struct SoftwareGain {
    headroom: Headroom,
    gain: f64,
}

impl SoftwareGain {
    /// Output capped at unity
    pub fn unity() -> Self {
        Self::new(Headroom::Unity)
    }

    /// Output with amplification headroom
    pub fn amplified() -> Self {
        Self::new(Headroom::Amplified)
    }

    /// Output with the given headroom at unity gain
    pub fn new(headroom: Headroom) -> Self {
        Self { headroom, gain: 1.0 }
    }
}

impl GainOutput for SoftwareGain {
    fn headroom(&self) -> Headroom {
        self.headroom
    }

    fn set_gain(&mut self, gain: f64) {
        self.gain = gain;
    }

    fn gain(&self) -> f64 {
        self.gain
    }
}

/// Volume icon state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeLevel {
    /// Below 1%
    Muted,
    /// Up to a third
    Low,
    /// Up to two thirds
    Medium,
    /// Up to 120%
    High,
    /// Above 120%
    Danger,
}

impl VolumeLevel {
    /// Classify a user-facing volume
    pub fn from_volume(volume: f64) -> Self {
        if volume < 0.01 {
            Self::Muted
        } else if volume <= 1.0 / 3.0 {
            Self::Low
        } else if volume <= 2.0 / 3.0 {
            Self::Medium
        } else if volume > 1.2 {
            Self::Danger
        } else {
            Self::High
        }
    }

    /// CSS class name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Muted => "muted",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Danger => "danger",
        }
    }

    /// Every level, for clearing classes
    pub const ALL: [VolumeLevel; 5] = [
        Self::Muted,
        Self::Low,
        Self::Medium,
        Self::High,
        Self::Danger,
    ];
}

/// Maps user volume and loudness compensation onto an output gain
#[derive(Debug)]
pub struct VolumeController<G: GainOutput> {
    output: G,
    headroom: Headroom,
    compensation: AlbumCompensation,
    replaygain_enabled: bool,
    /// User-facing volume to go back to when unmuting
    muted_restore: f64,
}

impl<G: GainOutput> VolumeController<G> {
    /// Create a controller for `output`
    ///
    /// The compensation is limited to what the output's headroom allows.
    pub fn new(output: G, compensation: AlbumCompensation, replaygain_enabled: bool) -> Self {
        let headroom = output.headroom();
        tracing::debug!("Output headroom: {}", headroom.as_str());
        Self {
            output,
            headroom,
            compensation: compensation.limited_to(headroom),
            replaygain_enabled,
            muted_restore: 0.0,
        }
    }

    /// Apply a stored user volume
    pub fn restore(&mut self, stored_volume: f64) {
        self.set_volume(stored_volume);
    }

    /// Set the user-facing volume directly
    pub fn set_volume(&mut self, volume: f64) {
        let volume = self.headroom.clamp_volume(volume);
        self.set_output(self.compensation.apply(volume, self.replaygain_enabled));
    }

    /// Set volume from a fraction of the volume bar
    ///
    /// The fraction is clamped to `[0, 1]` and scaled to `max_volume`, then
    /// snapped to exactly 1.0 when close to it.
    pub fn set_from_fraction(&mut self, fraction: f64) {
        let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
        self.set_volume(self.headroom.snap(fraction * self.headroom.max_volume()));
    }

    /// Toggle loudness compensation
    ///
    /// The output gain is multiplied or divided by the factor, leaving the
    /// user-facing volume where it was. Returns the new state.
    pub fn toggle_replaygain(&mut self) -> bool {
        let factor = self.compensation.factor();
        let gain = self.output.gain();
        self.replaygain_enabled = !self.replaygain_enabled;
        if self.replaygain_enabled {
            self.set_output(gain * factor);
        } else {
            self.set_output(gain / factor);
        }
        self.replaygain_enabled
    }

    /// Mute, or restore the volume from before the last mute
    ///
    /// The restored volume is re-compensated with the current factor, so
    /// toggling replaygain while muted cannot push it out of range.
    pub fn toggle_mute(&mut self) {
        if self.output.gain() == 0.0 {
            self.set_volume(self.muted_restore);
        } else {
            self.muted_restore = self.volume();
            self.set_output(0.0);
        }
    }

    /// User-facing volume: output gain with compensation divided out
    pub fn volume(&self) -> f64 {
        self.compensation
            .remove(self.output.gain(), self.replaygain_enabled)
    }

    /// Linear output gain
    pub fn output_gain(&self) -> f64 {
        self.output.gain()
    }

    /// Upper bound of the user-facing range
    pub fn max_volume(&self) -> f64 {
        self.headroom.max_volume()
    }

    /// Headroom of the output path
    pub fn headroom(&self) -> Headroom {
        self.headroom
    }

    /// Compensation in use (already limited to the headroom)
    pub fn compensation(&self) -> &AlbumCompensation {
        &self.compensation
    }

    /// Whether replaygain is on
    pub fn replaygain_enabled(&self) -> bool {
        self.replaygain_enabled
    }

    /// Icon state for the current volume
    pub fn level(&self) -> VolumeLevel {
        VolumeLevel::from_volume(self.volume())
    }

    /// Tooltip text, e.g. `Volume: 80% (Normalized)`
    pub fn title(&self) -> String {
        let percent = (self.volume() * 100.0 + 1e-9).floor().max(0.0);
        let suffix = if self.replaygain_enabled { " (Normalized)" } else { "" };
        format!("Volume: {percent}%{suffix}")
    }

    /// Fill fraction of the volume bar
    pub fn fill(&self) -> f64 {
        (self.volume() / self.max_volume()).clamp(0.0, 1.0)
    }

    /// Underlying output
    pub fn output(&self) -> &G {
        &self.output
    }

    fn set_output(&mut self, gain: f64) {
        self.output.set_gain(self.headroom.clamp_output(gain));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_album() -> AlbumCompensation {
        AlbumCompensation::new(-18.0).unwrap()
    }

    #[test]
    fn restore_applies_compensation() {
        let mut volume = VolumeController::new(SoftwareGain::amplified(), quiet_album(), true);
        volume.restore(0.25);
        assert!((volume.output_gain() - 0.25 * 3.981).abs() < 0.001);
        assert!((volume.volume() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn unity_output_never_boosts() {
        let mut volume = VolumeController::new(SoftwareGain::unity(), quiet_album(), true);
        assert_eq!(volume.compensation().factor(), 1.0);
        volume.restore(1.0);
        assert_eq!(volume.output_gain(), 1.0);
        volume.set_volume(1.4);
        assert_eq!(volume.output_gain(), 1.0);
    }

    #[test]
    fn fraction_maps_to_range_and_snaps() {
        let mut volume =
            VolumeController::new(SoftwareGain::amplified(), AlbumCompensation::unmeasured(), true);
        volume.set_from_fraction(1.0);
        assert_eq!(volume.volume(), 1.5);
        volume.set_from_fraction(0.68);
        assert_eq!(volume.volume(), 1.0);
        volume.set_from_fraction(-2.0);
        assert_eq!(volume.volume(), 0.0);
    }

    #[test]
    fn toggle_replaygain_keeps_loudness_then_restores() {
        let mut volume = VolumeController::new(SoftwareGain::amplified(), quiet_album(), true);
        volume.restore(0.3);
        let before = volume.output_gain();

        assert!(!volume.toggle_replaygain());
        assert!((volume.output_gain() - before / 3.981).abs() < 0.001);

        assert!(volume.toggle_replaygain());
        assert!((volume.output_gain() - before).abs() < 1e-12);
    }

    #[test]
    fn user_volume_survives_toggle() {
        let mut volume = VolumeController::new(SoftwareGain::amplified(), quiet_album(), false);
        volume.restore(0.5);
        volume.toggle_replaygain();
        assert!((volume.volume() - 0.5).abs() < 1e-12);
        assert!((volume.output_gain() - 0.5 * 3.981).abs() < 0.001);
    }

    #[test]
    fn mute_and_unmute() {
        let mut volume =
            VolumeController::new(SoftwareGain::unity(), AlbumCompensation::unmeasured(), true);
        volume.restore(0.6);
        volume.toggle_mute();
        assert_eq!(volume.output_gain(), 0.0);
        assert_eq!(volume.level(), VolumeLevel::Muted);
        volume.toggle_mute();
        assert_eq!(volume.output_gain(), 0.6);
    }

    #[test]
    fn replaygain_toggled_while_muted_unmutes_in_range() {
        let mut volume = VolumeController::new(SoftwareGain::amplified(), quiet_album(), true);
        volume.restore(1.0);
        volume.toggle_mute();
        volume.toggle_replaygain();
        assert_eq!(volume.output_gain(), 0.0);

        volume.toggle_mute();
        assert!((volume.volume() - 1.0).abs() < 1e-12);
        assert!(volume.volume() <= volume.max_volume());
        assert!((volume.output_gain() - 1.0).abs() < 1e-12);

        volume.toggle_mute();
        volume.toggle_replaygain();
        volume.toggle_mute();
        assert!((volume.volume() - 1.0).abs() < 1e-12);
        assert!((volume.output_gain() - 3.981).abs() < 0.001);
    }

    #[test]
    fn unmute_before_any_mute_stays_silent() {
        let mut volume =
            VolumeController::new(SoftwareGain::unity(), AlbumCompensation::unmeasured(), true);
        volume.restore(0.0);
        volume.toggle_mute();
        assert_eq!(volume.output_gain(), 0.0);
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(VolumeLevel::from_volume(0.005), VolumeLevel::Muted);
        assert_eq!(VolumeLevel::from_volume(0.2), VolumeLevel::Low);
        assert_eq!(VolumeLevel::from_volume(1.0 / 3.0), VolumeLevel::Low);
        assert_eq!(VolumeLevel::from_volume(0.5), VolumeLevel::Medium);
        assert_eq!(VolumeLevel::from_volume(1.0), VolumeLevel::High);
        assert_eq!(VolumeLevel::from_volume(1.2), VolumeLevel::High);
        assert_eq!(VolumeLevel::from_volume(1.3), VolumeLevel::Danger);
    }

    #[test]
    fn title_and_fill() {
        let mut volume =
            VolumeController::new(SoftwareGain::amplified(), AlbumCompensation::unmeasured(), true);
        volume.set_volume(0.75);
        assert_eq!(volume.title(), "Volume: 75% (Normalized)");
        assert!((volume.fill() - 0.5).abs() < 1e-12);

        volume.toggle_replaygain();
        assert_eq!(volume.title(), "Volume: 75%");
    }
}
