//! Transcoding endpoint URLs

use crate::error::{PlaybackError, Result};
use seamless_core::TrialClip;
use url::Url;

/// Slug of the server's one-second silent test track
pub const TEST_TRACK_SLUG: &str = "__testtrack";

/// Builds stream URLs against the site's transcoding endpoint
///
/// `{root}transcode/release/{slug}?format={name}` streams a whole release,
/// `{root}transcode/track/{slug}?format={name}` a single track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEndpoint {
    base: Url,
}

impl StreamEndpoint {
    /// Endpoint rooted at an absolute site URL (e.g. `https://music.example/`)
    pub fn new(root: &str) -> Result<Self> {
        let mut base = Url::parse(root)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    /// Endpoint for a page-relative root (e.g. `/`) on a given origin
    pub fn with_origin(origin: &str, root: &str) -> Result<Self> {
        let origin = Url::parse(origin)?;
        let base = origin.join(root)?;
        Self::new(base.as_str())
    }

    /// URL of the continuous stream the player attaches
    ///
    /// A release slug streams the concatenated release. Without one, the
    /// override slug or else the first track streams on its own.
    pub fn stream_url(
        &self,
        release_slug: Option<&str>,
        override_slug: Option<&str>,
        first_track_slug: &str,
        format: &str,
    ) -> Result<String> {
        match release_slug {
            Some(release) => self.build("release", release, format),
            None => self.build("track", override_slug.unwrap_or(first_track_slug), format),
        }
    }

    /// URL a format trial loads
    pub fn trial_url(&self, clip: TrialClip, first_track_slug: &str, format: &str) -> Result<String> {
        match clip {
            TrialClip::Silence => self.build("track", TEST_TRACK_SLUG, format),
            TrialClip::FirstTrack => self.build("track", first_track_slug, format),
        }
    }

    fn build(&self, kind: &str, slug: &str, format: &str) -> Result<String> {
        let mut url = self.base.join("transcode/")?;
        url.path_segments_mut()
            .map_err(|()| PlaybackError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(kind)
            .push(slug);
        url.query_pairs_mut().append_pair("format", format);
        Ok(url.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> StreamEndpoint {
        StreamEndpoint::with_origin("https://music.example", "/").unwrap()
    }

    #[test]
    fn release_stream_url() {
        let url = endpoint()
            .stream_url(Some("first-light"), None, "intro", "opus")
            .unwrap();
        assert_eq!(url, "https://music.example/transcode/release/first-light?format=opus");
    }

    #[test]
    fn override_slug_beats_first_track() {
        let endpoint = endpoint();
        assert_eq!(
            endpoint.stream_url(None, Some("b-side"), "intro", "mp3").unwrap(),
            "https://music.example/transcode/track/b-side?format=mp3"
        );
        assert_eq!(
            endpoint.stream_url(None, None, "intro", "mp3").unwrap(),
            "https://music.example/transcode/track/intro?format=mp3"
        );
    }

    #[test]
    fn trial_urls() {
        let endpoint = endpoint();
        assert_eq!(
            endpoint.trial_url(TrialClip::Silence, "intro", "flac").unwrap(),
            "https://music.example/transcode/track/__testtrack?format=flac"
        );
        assert_eq!(
            endpoint.trial_url(TrialClip::FirstTrack, "intro", "flac").unwrap(),
            "https://music.example/transcode/track/intro?format=flac"
        );
    }

    #[test]
    fn nested_root_is_kept() {
        let endpoint = StreamEndpoint::with_origin("https://example.org", "/music").unwrap();
        assert_eq!(
            endpoint.stream_url(Some("dawn"), None, "a", "mp3").unwrap(),
            "https://example.org/music/transcode/release/dawn?format=mp3"
        );
    }

    #[test]
    fn format_and_slug_are_encoded() {
        let url = endpoint()
            .stream_url(None, None, "a b", "mp3@low")
            .unwrap();
        assert_eq!(url, "https://music.example/transcode/track/a%20b?format=mp3%40low");
    }

    #[test]
    fn relative_root_without_origin_is_rejected() {
        assert!(StreamEndpoint::new("/").is_err());
    }
}
