//! Player configuration
//!
//! The server renders the release page with the player's inputs embedded as
//! string attributes next to the widget. `PlayerConfig` is the typed form of
//! those attributes. It can be built either from the raw attribute pairs
//! (`from_attributes`) or from one JSON object (`from_json`).

use crate::error::{CoreError, Result};
use crate::types::{Format, TrackDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which clip the format negotiator trial-loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrialClip {
    /// The server's one-second silent test track
    #[default]
    Silence,
    /// The first track of the release
    FirstTrack,
}

impl TrialClip {
    /// Parse from an attribute value
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "silence" | "testtrack" => Some(Self::Silence),
            "first-track" | "first" | "track" => Some(Self::FirstTrack),
            _ => None,
        }
    }

    /// Convert to an attribute value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Silence => "silence",
            Self::FirstTrack => "first-track",
        }
    }
}

/// Axis the volume bar is laid out on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VolumeBarOrientation {
    /// Bottom is silent, top is maximum
    #[default]
    Vertical,
    /// Left is silent, right is maximum
    Horizontal,
}

impl VolumeBarOrientation {
    /// Parse from an attribute value
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "vertical" => Some(Self::Vertical),
            "horizontal" => Some(Self::Horizontal),
            _ => None,
        }
    }

    /// Convert to an attribute value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
        }
    }
}

/// Inputs the page hands to the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerConfig {
    /// URL prefix of the site, always ending in `/`
    #[serde(default = "default_root")]
    pub root: String,

    /// Tracks of the release in stream order
    pub tracks: Vec<TrackDescriptor>,

    /// Candidate formats, most preferred first
    pub formats: Vec<Format>,

    /// Album integrated loudness, if the server measured it
    #[serde(default)]
    pub loudness: Option<f64>,

    /// Release slug; when present the whole release streams as one resource
    #[serde(default)]
    pub release_slug: Option<String>,

    /// Track slug to stream instead of the first track on single-track pages
    #[serde(default)]
    pub override_slug: Option<String>,

    /// Hide the current-track title display
    #[serde(default)]
    pub hide_title: bool,

    /// Clip used for format trials
    #[serde(default)]
    pub trial_clip: TrialClip,

    /// Axis of the volume bar
    #[serde(default)]
    pub volume_bar: VolumeBarOrientation,
}

fn default_root() -> String {
    "/".to_string()
}

impl PlayerConfig {
    /// Build from page attribute pairs (camelCase names, as a dataset exposes them)
    pub fn from_attributes<I, K, V>(attributes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let attributes: HashMap<String, String> = attributes
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
            .collect();

        let tracks = parse_json_attribute(&attributes, "tracks")?;
        let formats = parse_json_attribute(&attributes, "formats")?;

        let loudness = match non_empty(&attributes, "loudness") {
            Some(raw) => Some(raw.trim().parse::<f64>().map_err(|e| {
                CoreError::invalid_attribute("loudness", format!("{raw:?}: {e}"))
            })?),
            None => None,
        };

        let trial_clip = match non_empty(&attributes, "trialClip") {
            Some(raw) => TrialClip::from_str(raw)
                .ok_or_else(|| CoreError::invalid_attribute("trialClip", raw))?,
            None => TrialClip::default(),
        };

        let volume_bar = match non_empty(&attributes, "volumeBar") {
            Some(raw) => VolumeBarOrientation::from_str(raw)
                .ok_or_else(|| CoreError::invalid_attribute("volumeBar", raw))?,
            None => VolumeBarOrientation::default(),
        };

        let config = Self {
            root: non_empty(&attributes, "root").map_or_else(default_root, str::to_string),
            tracks,
            formats,
            loudness,
            release_slug: non_empty(&attributes, "releaseSlug").map(str::to_string),
            override_slug: non_empty(&attributes, "overrideSlug").map(str::to_string),
            hide_title: attributes.get("hideTitle").is_some_and(|v| v == "true"),
            trial_clip,
            volume_bar,
        };

        config.normalized()
    }

    /// Build from a single JSON object
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.normalized()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(position) = self.formats.iter().position(|f| f.name.trim().is_empty()) {
            return Err(CoreError::invalid_attribute(
                "formats",
                format!("format at index {position} has no name"),
            ));
        }

        if let Some(loudness) = self.loudness {
            if !loudness.is_finite() {
                return Err(CoreError::invalid_attribute(
                    "loudness",
                    format!("{loudness} is not a finite number"),
                ));
            }
        }

        Ok(())
    }

    fn normalized(mut self) -> Result<Self> {
        if !self.root.ends_with('/') {
            self.root.push('/');
        }
        self.release_slug = self.release_slug.filter(|s| !s.is_empty());
        self.override_slug = self.override_slug.filter(|s| !s.is_empty());
        self.validate()?;
        Ok(self)
    }
}

fn non_empty<'a>(attributes: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    attributes
        .get(name)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
}

fn parse_json_attribute<T: serde::de::DeserializeOwned>(
    attributes: &HashMap<String, String>,
    name: &str,
) -> Result<T> {
    let raw = attributes
        .get(name)
        .ok_or_else(|| CoreError::MissingAttribute(name.to_string()))?;
    serde_json::from_str(raw).map_err(|e| CoreError::invalid_attribute(name, e.to_string()))
}
