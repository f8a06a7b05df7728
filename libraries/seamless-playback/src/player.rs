//! Gapless player - core orchestration
//!
//! Coordinates the engine, track detection, volume, persistence and the
//! frame ticker. Every handler runs synchronously and queues the rendering
//! effects it causes; the page drains them with [`GaplessPlayer::drain_effects`].

use crate::{
    endpoint::StreamEndpoint,
    engine::PlaybackEngine,
    error::{PlaybackError, Result},
    events::{TransportEvent, UiEffect},
    preferences::{PreferenceStore, Preferences},
    source::MediaTransport,
    ticker::{FrameScheduler, Ticker},
    time::format_time,
    track_index::TrackIndex,
    transition::TrackTransitionDetector,
    types::{BarRect, Control, ControlClass, PlayerState},
    ui::{buffered_progress, progress, seek_target, SkipState},
    volume::{GainOutput, VolumeController},
};
use seamless_core::{Format, PlayerConfig, Track, VolumeBarOrientation};
use seamless_loudness::{AlbumCompensation, REFERENCE_LEVEL};

/// Platform pieces the player is assembled from
#[derive(Debug)]
pub struct PlayerParts<T, G, S, F> {
    /// Media transport for the continuous stream
    pub transport: T,
    /// Output gain stage
    pub gain: G,
    /// Durable preference store
    pub store: S,
    /// Display frame scheduler
    pub scheduler: F,
}

/// Active pointer drag and the bar it started on
#[derive(Debug, Clone, Copy, PartialEq)]
enum Drag {
    Seek(BarRect),
    Volume(BarRect),
}

/// Gapless multi-track player
pub struct GaplessPlayer<T, G, S, F>
where
    T: MediaTransport,
    G: GainOutput,
    S: PreferenceStore,
    F: FrameScheduler,
{
    tracks: TrackIndex,
    engine: PlaybackEngine<T>,
    volume: VolumeController<G>,
    preferences: Preferences<S>,
    ticker: Ticker<F>,
    detector: TrackTransitionDetector,

    // Settings
    hide_title: bool,
    volume_bar: VolumeBarOrientation,
    release_slug: Option<String>,
    override_slug: Option<String>,

    format: Option<Format>,
    drag: Option<Drag>,

    // Effect queue for the page
    pending_effects: Vec<UiEffect>,
}

impl<T, G, S, F> GaplessPlayer<T, G, S, F>
where
    T: MediaTransport,
    G: GainOutput,
    S: PreferenceStore,
    F: FrameScheduler,
{
    /// Assemble a player for `config`
    ///
    /// Reads the stored preferences and applies the stored volume. No
    /// source is attached until [`attach_source`](Self::attach_source).
    pub fn new(config: &PlayerConfig, parts: PlayerParts<T, G, S, F>) -> Result<Self> {
        config.validate()?;
        let tracks = TrackIndex::from_descriptors(config.tracks.clone())?;

        let compensation = match config.loudness {
            Some(loudness) => AlbumCompensation::new(loudness).unwrap_or_else(|e| {
                tracing::warn!("Ignoring album loudness: {}", e);
                AlbumCompensation::unmeasured()
            }),
            None => {
                tracing::warn!("No album loudness given, compensation disabled");
                AlbumCompensation::unmeasured()
            }
        };
        tracing::info!(
            "Album gain: {:.2} ({}dB reference level)",
            compensation.relative_db(),
            REFERENCE_LEVEL
        );

        let preferences = Preferences::new(parts.store);
        let stored = preferences.load();
        let mut volume =
            VolumeController::new(parts.gain, compensation, stored.replaygain_enabled);
        volume.restore(stored.volume);

        let detector = TrackTransitionDetector::new(tracks.len());

        Ok(Self {
            tracks,
            engine: PlaybackEngine::new(parts.transport),
            volume,
            preferences,
            ticker: Ticker::new(parts.scheduler),
            detector,
            hide_title: config.hide_title,
            volume_bar: config.volume_bar,
            release_slug: config.release_slug.clone(),
            override_slug: config.override_slug.clone(),
            format: None,
            drag: None,
            pending_effects: Vec::new(),
        })
    }

    // ===== Startup =====

    /// Queue the effects that bring the page in line with the initial state
    pub fn render_initial(&mut self) {
        if self.tracks.is_single() {
            self.pending_effects.push(UiEffect::HideSkipButtons);
        }
        if self.hide_title {
            self.pending_effects.push(UiEffect::HideTitle);
        }

        let first = self.current_track().clone();
        self.pending_effects.push(UiEffect::SetTitle { title: first.title });
        self.pending_effects.push(UiEffect::SetReplaygain {
            enabled: self.volume.replaygain_enabled(),
        });
        self.push_skip_state();

        let durations: Vec<UiEffect> = self
            .tracks
            .iter()
            .map(|track| UiEffect::SetTrackDuration {
                slug: track.slug.clone(),
                label: format_time(track.length(), None),
            })
            .collect();
        self.pending_effects.extend(durations);

        self.volume_changed();
        self.update_time();
    }

    /// Attach the continuous stream in the negotiated format
    ///
    /// Without a format the player stays sourceless and the page is told
    /// the release can't be played here.
    pub fn attach_source(&mut self, format: Option<Format>, endpoint: &StreamEndpoint) -> Result<()> {
        let Some(format) = format else {
            tracing::warn!("No playable format, player left without a source");
            self.pending_effects.push(UiEffect::Unavailable {
                reason: "No supported audio format".to_string(),
            });
            return Ok(());
        };

        let url = endpoint.stream_url(
            self.release_slug.as_deref(),
            self.override_slug.as_deref(),
            &self.tracks.first().slug,
            &format.name,
        )?;
        tracing::info!("Streaming {} as {}", url, format.name);
        self.engine.load_source(url);
        self.format = Some(format);
        Ok(())
    }

    /// Record whether a track has a lyrics panel, and its initial state
    pub fn register_lyrics(&mut self, slug: &str, open: bool) -> Result<()> {
        let index = self.index_of(slug)?;
        self.detector.register_lyrics(index, open);
        Ok(())
    }

    // ===== Transport notifications =====

    /// Handle a notification from the media transport
    pub fn handle_transport(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::TimeUpdate => self.update_time(),
            TransportEvent::Progress => self.update_buffered(),
            TransportEvent::CanPlay => {
                self.pending_effects.push(UiEffect::swap(
                    Control::GlobalPlayPause,
                    ControlClass::Loading,
                    ControlClass::Play,
                ));
            }
            TransportEvent::Play => {
                if self.is_seek_dragging() {
                    return;
                }
                self.swap_transport_controls(ControlClass::Play, ControlClass::Pause);
                self.ticker.start();
            }
            TransportEvent::Pause => {
                self.ticker.stop();
                if self.is_seek_dragging() {
                    return;
                }
                self.swap_transport_controls(ControlClass::Pause, ControlClass::Play);
            }
            TransportEvent::Error { message } => {
                tracing::error!("Can't play: {}", message);
            }
        }
    }

    /// Handle a display frame from the ticker
    pub fn on_frame(&mut self) {
        self.update_time();
        let playing = !self.engine.is_paused();
        self.ticker.on_frame(playing);
    }

    // ===== Pointer interaction =====

    /// Pointer pressed on the seek bar: pause and start dragging
    pub fn seek_pointer_down(&mut self, bar: BarRect, client_x: f64) {
        self.engine.pause();
        self.drag = Some(Drag::Seek(bar));
        self.drag_seek(bar, client_x);
    }

    /// Pointer pressed on the volume bar: open the drop-down and start dragging
    pub fn volume_pointer_down(&mut self, bar: BarRect, client_x: f64, client_y: f64) {
        self.drag = Some(Drag::Volume(bar));
        self.pending_effects
            .push(UiEffect::SetVolumeDropOpen { open: true });
        self.drag_volume(bar, client_x, client_y);
    }

    /// Pointer moved anywhere on the page
    pub fn pointer_move(&mut self, client_x: f64, client_y: f64) {
        match self.drag {
            Some(Drag::Seek(bar)) => self.drag_seek(bar, client_x),
            Some(Drag::Volume(bar)) => self.drag_volume(bar, client_x, client_y),
            None => {}
        }
    }

    /// Pointer released anywhere on the page
    ///
    /// Ends any drag, resumes playback after a seek drag and closes the
    /// volume drop-down.
    pub fn pointer_up(&mut self) {
        let drag = self.drag.take();
        if matches!(drag, Some(Drag::Seek(_))) {
            self.play();
        }
        self.pending_effects
            .push(UiEffect::SetVolumeDropOpen { open: false });
    }

    /// Whether a seek drag is in progress
    pub fn is_seek_dragging(&self) -> bool {
        matches!(self.drag, Some(Drag::Seek(_)))
    }

    /// Whether a volume drag is in progress
    pub fn is_volume_dragging(&self) -> bool {
        matches!(self.drag, Some(Drag::Volume(_)))
    }

    // ===== Buttons =====

    /// The global play/pause button
    pub fn toggle_play(&mut self) {
        if self.engine.is_paused() {
            self.play();
        } else {
            self.engine.pause();
        }
    }

    /// Seek to the previous track's start
    pub fn skip_previous(&mut self) {
        let current = self.detector.current();
        if current == 0 {
            return;
        }
        if let Some(start) = self.tracks.get(current - 1).map(|t| t.start) {
            self.engine.seek_to(start);
            self.update_time();
        }
    }

    /// Seek to the next track's start
    pub fn skip_next(&mut self) {
        let current = self.detector.current();
        if current >= self.tracks.last_index() {
            return;
        }
        if let Some(start) = self.tracks.get(current + 1).map(|t| t.start) {
            self.engine.seek_to(start);
            self.update_time();
        }
    }

    /// A track row's play button
    ///
    /// Another track seeks to its start and plays; the current track
    /// toggles play/pause.
    pub fn track_button(&mut self, slug: &str) -> Result<()> {
        let index = self.index_of(slug)?;
        let mut paused = self.engine.is_paused();
        if index != self.detector.current() {
            if let Some(start) = self.tracks.get(index).map(|t| t.start) {
                self.engine.seek_to(start);
            }
            self.update_time();
            paused = true;
        }
        if paused {
            self.play();
        } else {
            self.engine.pause();
        }
        Ok(())
    }

    /// The volume drop target: mute or restore
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.volume_changed();
    }

    /// The replaygain button
    pub fn toggle_replaygain(&mut self) {
        let enabled = self.volume.toggle_replaygain();
        self.preferences.store_replaygain(enabled);
        tracing::debug!("Replaygain {}", if enabled { "on" } else { "off" });
        self.pending_effects.push(UiEffect::SetReplaygain { enabled });
        self.volume_changed();
    }

    /// The listener opened or closed a lyrics panel
    pub fn lyrics_toggled(&mut self, slug: &str, open: bool) -> Result<()> {
        let index = self.index_of(slug)?;
        self.detector.set_lyrics_open(index, open);
        Ok(())
    }

    // ===== State =====

    /// Take every queued effect
    pub fn drain_effects(&mut self) -> Vec<UiEffect> {
        std::mem::take(&mut self.pending_effects)
    }

    /// Whether effects are waiting to be drained
    pub fn has_pending_effects(&self) -> bool {
        !self.pending_effects.is_empty()
    }

    /// Snapshot of the player's state
    pub fn state(&self) -> PlayerState {
        PlayerState {
            current_track_index: self.detector.current(),
            status: self.engine.status(),
            position: self.engine.position(),
            volume: self.volume.volume(),
            max_volume: self.volume.max_volume(),
            replaygain_enabled: self.volume.replaygain_enabled(),
            format: self.format.as_ref().map(|f| f.name.clone()),
        }
    }

    /// Track the position last resolved to
    pub fn current_track(&self) -> &Track {
        self.tracks
            .get(self.detector.current())
            .unwrap_or_else(|| self.tracks.first())
    }

    /// Boundary table
    pub fn tracks(&self) -> &TrackIndex {
        &self.tracks
    }

    /// Negotiated format
    pub fn format(&self) -> Option<&Format> {
        self.format.as_ref()
    }

    /// Volume bar orientation
    pub fn volume_bar(&self) -> VolumeBarOrientation {
        self.volume_bar
    }

    /// Playback engine
    pub fn engine(&self) -> &PlaybackEngine<T> {
        &self.engine
    }

    /// Playback engine, mutably (platform glue and tests)
    pub fn engine_mut(&mut self) -> &mut PlaybackEngine<T> {
        &mut self.engine
    }

    /// Volume controller
    pub fn volume(&self) -> &VolumeController<G> {
        &self.volume
    }

    /// Preference store
    pub fn store(&self) -> &S {
        self.preferences.store()
    }

    /// Frame ticker
    pub fn ticker(&self) -> &Ticker<F> {
        &self.ticker
    }

    // ===== Internals =====

    fn play(&mut self) {
        if let Err(e) = self.engine.play() {
            tracing::warn!("Can't start playback: {}", e);
        }
    }

    fn index_of(&self, slug: &str) -> Result<usize> {
        self.tracks
            .by_slug(slug)
            .map(|t| t.index)
            .ok_or_else(|| PlaybackError::UnknownTrack(slug.to_string()))
    }

    fn drag_seek(&mut self, bar: BarRect, client_x: f64) {
        let target = seek_target(self.current_track(), bar.fraction_x(client_x));
        self.engine.seek_to(target);
        self.update_time();
    }

    fn drag_volume(&mut self, bar: BarRect, client_x: f64, client_y: f64) {
        let fraction = bar.volume_fraction(self.volume_bar, client_x, client_y);
        self.volume.set_from_fraction(fraction);
        self.volume_changed();
    }

    /// Re-derive the current track and time display from the position
    fn update_time(&mut self) {
        let time = self.engine.position();

        if let Some(transition) = self.detector.observe(&self.tracks, time) {
            let previous = self.tracks.get(transition.previous).map(|t| t.slug.clone());
            let current = self.current_track().clone();

            if let Some(slug) = previous {
                self.pending_effects.push(UiEffect::swap(
                    Control::Track(slug),
                    ControlClass::Pause,
                    ControlClass::Play,
                ));
            }
            if let Some(slug) = self.slug_at(transition.close_lyrics) {
                self.pending_effects
                    .push(UiEffect::SetLyricsOpen { slug, open: false });
            }
            if let Some(slug) = self.slug_at(transition.open_lyrics) {
                self.pending_effects
                    .push(UiEffect::SetLyricsOpen { slug, open: true });
            }
            self.pending_effects.push(UiEffect::SetTitle {
                title: current.title.clone(),
            });
            self.pending_effects.push(UiEffect::swap(
                Control::Track(current.slug),
                ControlClass::Play,
                ControlClass::Pause,
            ));
            self.push_skip_state();
        }

        let Some(track) = self.tracks.track_for_position(time) else {
            return;
        };
        let length = track.length();
        let effects = [
            UiEffect::SetSeekPosition {
                fraction: progress(track, time),
            },
            UiEffect::SetTime {
                elapsed: format_time(time - track.start, Some(length)),
                total: format_time(length, None),
            },
        ];
        self.pending_effects.extend(effects);
        self.update_buffered();
    }

    fn update_buffered(&mut self) {
        if let Some(end) = self.engine.buffered_end() {
            let fraction = buffered_progress(self.current_track(), end);
            self.pending_effects.push(UiEffect::SetBuffered { fraction });
        }
    }

    /// Render and persist the volume after any change
    fn volume_changed(&mut self) {
        let volume = self.volume.volume();
        self.preferences.store_volume(volume);
        self.pending_effects.push(UiEffect::SetVolume {
            level: self.volume.level(),
            title: self.volume.title(),
            fill: self.volume.fill(),
        });
    }

    fn push_skip_state(&mut self) {
        let skip = SkipState::for_track(&self.tracks, self.detector.current());
        self.pending_effects.push(UiEffect::SetSkipState {
            prev_disabled: skip.prev_disabled,
            next_disabled: skip.next_disabled,
        });
    }

    fn swap_transport_controls(&mut self, from: ControlClass, to: ControlClass) {
        let slug = self.current_track().slug.clone();
        self.pending_effects
            .push(UiEffect::swap(Control::GlobalPlayPause, from, to));
        self.pending_effects
            .push(UiEffect::swap(Control::Track(slug), from, to));
    }

    fn slug_at(&self, index: Option<usize>) -> Option<String> {
        index
            .and_then(|i| self.tracks.get(i))
            .map(|t| t.slug.clone())
    }
}

impl<T, G, S, F> std::fmt::Debug for GaplessPlayer<T, G, S, F>
where
    T: MediaTransport,
    G: GainOutput,
    S: PreferenceStore,
    F: FrameScheduler,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GaplessPlayer")
            .field("tracks", &self.tracks.len())
            .field("state", &self.state())
            .field("drag", &self.drag)
            .finish_non_exhaustive()
    }
}
