//! Format negotiation
//!
//! Codec-support queries are poor predictors of whether a stream actually
//! decodes, so each candidate the runtime claims to support is
//! trial-loaded. Trials run one at a time in preference order, and the
//! first candidate that reaches "ready to play" wins.

use crate::{endpoint::StreamEndpoint, error::Result};
use async_trait::async_trait;
use seamless_core::{Format, TrialClip};

/// Answer of a runtime codec-support query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecSupport {
    /// The runtime cannot play this type
    No,
    /// The runtime might play this type
    Maybe,
    /// The runtime is confident it plays this type
    Probably,
}

impl CodecSupport {
    /// Parse the answer string of a `canPlayType`-style query
    ///
    /// An empty answer means no support; anything else counts as possible.
    pub fn from_answer(answer: &str) -> Self {
        match answer.trim() {
            "" => Self::No,
            "probably" => Self::Probably,
            _ => Self::Maybe,
        }
    }

    /// Whether a trial is worth attempting
    pub fn is_possible(&self) -> bool {
        !matches!(self, Self::No)
    }
}

/// Runtime capability probe
///
/// Trials are awaited on the runtime's own event loop, so futures need not
/// be `Send`.
#[async_trait(?Send)]
pub trait FormatProbe {
    /// Ask the runtime whether it can decode `mime`
    fn can_play_type(&self, mime: &str) -> CodecSupport;

    /// Load `url`, a clip encoded as `format`, until it is ready to play or errors
    ///
    /// # Returns
    /// * `Ok(())` - The runtime reported it can play the clip
    /// * `Err(PlaybackError::TrialFailed)` - The runtime reported a load or decode error
    async fn trial_load(&self, format: &Format, url: &str) -> Result<()>;
}

/// Picks the first format the runtime can actually decode
#[derive(Debug, Clone)]
pub struct FormatNegotiator<'a> {
    endpoint: &'a StreamEndpoint,
    clip: TrialClip,
    first_track_slug: &'a str,
}

impl<'a> FormatNegotiator<'a> {
    /// Create a negotiator trial-loading `clip` from `endpoint`
    pub fn new(endpoint: &'a StreamEndpoint, clip: TrialClip, first_track_slug: &'a str) -> Self {
        Self {
            endpoint,
            clip,
            first_track_slug,
        }
    }

    /// Select the first candidate whose trial load succeeds
    ///
    /// Candidates the runtime reports no support for are skipped without a
    /// trial. Once a trial succeeds no later candidate is touched. `None`
    /// means nothing is playable.
    pub async fn select_format<P: FormatProbe + ?Sized>(
        &self,
        probe: &P,
        candidates: &[Format],
    ) -> Option<Format> {
        for format in candidates {
            if !probe.can_play_type(&format.mime).is_possible() {
                tracing::debug!("Skipping {} ({} unsupported)", format.name, format.mime);
                continue;
            }

            let url = match self.endpoint.trial_url(self.clip, self.first_track_slug, &format.name) {
                Ok(url) => url,
                Err(e) => {
                    tracing::error!("Can't build trial URL for {}: {}", format.name, e);
                    continue;
                }
            };

            tracing::debug!("Trying {}...", format.name);
            match probe.trial_load(format, &url).await {
                Ok(()) => {
                    tracing::info!("Successfully loaded {}", format.name);
                    return Some(format.clone());
                }
                Err(e) => {
                    tracing::error!("Can't play media format: {}", e);
                }
            }
        }

        tracing::error!(
            "No playable format among {} candidates, player left without a source",
            candidates.len()
        );
        None
    }
}
