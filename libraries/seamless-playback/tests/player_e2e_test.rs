//! End-to-end tests for GaplessPlayer
//!
//! Drives the controller through its public handlers with in-memory
//! transport, gain, storage and frame scheduling:
//! - Track resolution and time display
//! - Skip buttons and track buttons
//! - Seek and volume drags
//! - Loudness compensation and persistence
//! - Ticker lifecycle
//! - Lyrics carry

use seamless_core::{CoreError, Format, PlayerConfig, TrackDescriptor};
use seamless_loudness::Headroom;
use seamless_playback::{
    BarRect, Control, ControlClass, GaplessPlayer, ManualScheduler, MemoryStore, MemoryTransport,
    PlaybackError, PlayerParts, SoftwareGain, StreamEndpoint, TransportEvent, TransportStatus,
    UiEffect, VolumeLevel,
};
use std::sync::Once;

// ============================================================================
// Test Infrastructure
// ============================================================================

static INIT: Once = Once::new();

/// Route player logs to the test output
fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

type TestPlayer = GaplessPlayer<MemoryTransport, SoftwareGain, MemoryStore, ManualScheduler>;

const SEEKBAR: BarRect = BarRect {
    left: 100.0,
    top: 0.0,
    width: 400.0,
    height: 10.0,
};

const VOLUMEBAR: BarRect = BarRect {
    left: 0.0,
    top: 200.0,
    width: 10.0,
    height: 100.0,
};

fn descriptor(slug: &str, start: f64, end: f64) -> TrackDescriptor {
    TrackDescriptor {
        slug: slug.to_string(),
        title: slug.to_uppercase(),
        subtitle: String::new(),
        start,
        end,
    }
}

fn config(tracks: Vec<TrackDescriptor>, loudness: Option<f64>) -> PlayerConfig {
    PlayerConfig {
        root: "/".to_string(),
        tracks,
        formats: vec![Format::new("opus", "audio/ogg; codecs=opus")],
        loudness,
        release_slug: Some("first-light".to_string()),
        override_slug: None,
        hide_title: false,
        trial_clip: Default::default(),
        volume_bar: Default::default(),
    }
}

fn two_tracks() -> Vec<TrackDescriptor> {
    vec![descriptor("dawn", 0.0, 180.0), descriptor("dusk", 180.0, 360.0)]
}

fn three_tracks() -> Vec<TrackDescriptor> {
    vec![
        descriptor("one", 0.0, 100.0),
        descriptor("two", 100.0, 200.0),
        descriptor("three", 200.0, 300.0),
    ]
}

fn build(config: &PlayerConfig, gain: SoftwareGain, store: MemoryStore) -> TestPlayer {
    init_tracing();
    let duration = config.tracks.last().map_or(0.0, |t| t.end);
    let parts = PlayerParts {
        transport: MemoryTransport::with_duration(duration),
        gain,
        store,
        scheduler: ManualScheduler::new(),
    };
    let mut player = GaplessPlayer::new(config, parts).unwrap();
    let endpoint = StreamEndpoint::with_origin("https://music.example", &config.root).unwrap();
    player
        .attach_source(config.formats.first().cloned(), &endpoint)
        .unwrap();
    player.render_initial();
    player.drain_effects();
    player
}

fn player(tracks: Vec<TrackDescriptor>) -> TestPlayer {
    build(
        &config(tracks, Some(-12.0)),
        SoftwareGain::amplified(),
        MemoryStore::new(),
    )
}

fn seek(player: &mut TestPlayer, time: f64) -> Vec<UiEffect> {
    player.engine_mut().seek_to(time);
    player.handle_transport(TransportEvent::TimeUpdate);
    player.drain_effects()
}

fn skip_state(effects: &[UiEffect]) -> Option<(bool, bool)> {
    effects.iter().rev().find_map(|e| match e {
        UiEffect::SetSkipState {
            prev_disabled,
            next_disabled,
        } => Some((*prev_disabled, *next_disabled)),
        _ => None,
    })
}

fn time_labels(effects: &[UiEffect]) -> Option<(String, String)> {
    effects.iter().rev().find_map(|e| match e {
        UiEffect::SetTime { elapsed, total } => Some((elapsed.clone(), total.clone())),
        _ => None,
    })
}

// ============================================================================
// Track Resolution
// ============================================================================

#[test]
fn position_200_is_second_track_20_seconds_in() {
    let mut player = player(two_tracks());
    let effects = seek(&mut player, 200.0);

    assert_eq!(player.state().current_track_index, 1);
    assert_eq!(
        time_labels(&effects),
        Some(("0:20".to_string(), "3:00".to_string()))
    );
    assert!(effects.contains(&UiEffect::SetTitle {
        title: "DUSK".to_string()
    }));
}

#[test]
fn transition_swaps_both_track_buttons() {
    let mut player = player(two_tracks());
    let effects = seek(&mut player, 190.0);

    assert!(effects.contains(&UiEffect::swap(
        Control::Track("dawn".to_string()),
        ControlClass::Pause,
        ControlClass::Play,
    )));
    assert!(effects.contains(&UiEffect::swap(
        Control::Track("dusk".to_string()),
        ControlClass::Play,
        ControlClass::Pause,
    )));
}

#[test]
fn staying_inside_a_track_does_not_retrigger_transition() {
    let mut player = player(two_tracks());
    seek(&mut player, 190.0);
    let effects = seek(&mut player, 200.0);

    assert!(!effects
        .iter()
        .any(|e| matches!(e, UiEffect::SwapClass { .. } | UiEffect::SetTitle { .. })));
    assert!(time_labels(&effects).is_some());
}

#[test]
fn seek_position_tracks_progress_within_track() {
    let mut player = player(two_tracks());
    let effects = seek(&mut player, 270.0);
    assert!(effects.contains(&UiEffect::SetSeekPosition { fraction: 0.5 }));
}

#[test]
fn buffered_fill_is_relative_to_current_track() {
    let mut player = player(two_tracks());
    seek(&mut player, 200.0);
    player
        .engine_mut()
        .transport_mut()
        .set_buffered_end(Some(270.0));
    player.handle_transport(TransportEvent::Progress);
    assert_eq!(
        player.drain_effects(),
        vec![UiEffect::SetBuffered { fraction: 0.5 }]
    );
}

// ============================================================================
// Skip Buttons
// ============================================================================

#[test]
fn skip_state_follows_track_index() {
    let mut player = player(three_tracks());

    assert_eq!(skip_state(&seek(&mut player, 150.0)), Some((false, false)));
    assert_eq!(skip_state(&seek(&mut player, 250.0)), Some((false, true)));
    assert_eq!(skip_state(&seek(&mut player, 10.0)), Some((true, false)));
}

#[test]
fn skip_next_and_previous_seek_to_track_starts() {
    let mut player = player(three_tracks());

    player.skip_next();
    assert_eq!(player.engine().position(), 100.0);
    assert_eq!(player.state().current_track_index, 1);

    player.skip_next();
    assert_eq!(player.engine().position(), 200.0);

    player.skip_previous();
    assert_eq!(player.engine().position(), 100.0);
}

#[test]
fn skip_is_a_no_op_at_the_edges() {
    let mut player = player(three_tracks());
    player.skip_previous();
    assert_eq!(player.engine().position(), 0.0);

    seek(&mut player, 250.0);
    player.skip_next();
    assert_eq!(player.engine().position(), 250.0);
    assert_eq!(player.state().current_track_index, 2);
}

#[test]
fn single_track_hides_and_disables_skip_buttons() {
    let config = config(vec![descriptor("only", 0.0, 240.0)], Some(-12.0));
    let parts = PlayerParts {
        transport: MemoryTransport::with_duration(240.0),
        gain: SoftwareGain::unity(),
        store: MemoryStore::new(),
        scheduler: ManualScheduler::new(),
    };
    let mut player = GaplessPlayer::new(&config, parts).unwrap();
    player.render_initial();
    let effects = player.drain_effects();

    assert!(effects.contains(&UiEffect::HideSkipButtons));
    assert_eq!(skip_state(&effects), Some((true, true)));

    player.skip_next();
    assert_eq!(player.engine().position(), 0.0);
}

// ============================================================================
// Track Buttons and Transport
// ============================================================================

#[test]
fn track_button_for_other_track_seeks_and_plays() {
    let mut player = player(three_tracks());
    player.track_button("three").unwrap();

    assert_eq!(player.engine().position(), 200.0);
    assert_eq!(player.state().status, TransportStatus::Playing);
    assert_eq!(player.state().current_track_index, 2);
}

#[test]
fn track_button_for_current_track_toggles() {
    let mut player = player(three_tracks());
    player.track_button("one").unwrap();
    assert_eq!(player.state().status, TransportStatus::Playing);

    player.track_button("one").unwrap();
    assert_eq!(player.state().status, TransportStatus::Paused);
    assert_eq!(player.engine().position(), 0.0);
}

#[test]
fn can_play_swaps_loading_to_play() {
    let mut player = player(two_tracks());
    player.handle_transport(TransportEvent::CanPlay);
    assert_eq!(
        player.drain_effects(),
        vec![UiEffect::swap(
            Control::GlobalPlayPause,
            ControlClass::Loading,
            ControlClass::Play
        )]
    );
}

#[test]
fn play_and_pause_swap_global_and_track_controls() {
    let mut player = player(two_tracks());
    player.handle_transport(TransportEvent::Play);
    assert_eq!(
        player.drain_effects(),
        vec![
            UiEffect::swap(Control::GlobalPlayPause, ControlClass::Play, ControlClass::Pause),
            UiEffect::swap(
                Control::Track("dawn".to_string()),
                ControlClass::Play,
                ControlClass::Pause
            ),
        ]
    );

    player.handle_transport(TransportEvent::Pause);
    assert_eq!(player.drain_effects().len(), 2);
}

#[test]
fn transport_error_is_only_logged() {
    let mut player = player(two_tracks());
    player.handle_transport(TransportEvent::Error {
        message: "decode".to_string(),
    });
    assert!(!player.has_pending_effects());
}

// ============================================================================
// Seek Drag
// ============================================================================

#[test]
fn seek_drag_maps_bar_onto_current_track() {
    let mut player = player(two_tracks());
    seek(&mut player, 200.0);

    player.seek_pointer_down(SEEKBAR, 100.0);
    assert_eq!(player.engine().position(), 180.0);

    // The last track keeps its own end position
    player.pointer_move(500.0, 0.0);
    assert_eq!(player.engine().position(), 360.0);

    player.pointer_move(-50.0, 0.0);
    assert_eq!(player.engine().position(), 180.0);
}

#[test]
fn seek_drag_pauses_then_resumes() {
    let mut player = player(two_tracks());
    player.toggle_play();
    assert_eq!(player.state().status, TransportStatus::Playing);

    player.seek_pointer_down(SEEKBAR, 300.0);
    assert_eq!(player.state().status, TransportStatus::Paused);
    assert!(player.is_seek_dragging());

    player.pointer_up();
    assert!(!player.is_seek_dragging());
    assert_eq!(player.state().status, TransportStatus::Playing);
}

#[test]
fn pause_during_seek_drag_stops_ticker_without_swapping_classes() {
    let mut player = player(two_tracks());
    player.toggle_play();
    player.handle_transport(TransportEvent::Play);
    assert!(player.ticker().is_running());
    player.drain_effects();

    player.seek_pointer_down(SEEKBAR, 200.0);
    player.drain_effects();
    player.handle_transport(TransportEvent::Pause);

    assert!(!player.ticker().is_running());
    assert!(!player.has_pending_effects());
}

#[test]
fn pointer_up_without_drag_does_not_play() {
    let mut player = player(two_tracks());
    player.pointer_up();
    assert_eq!(player.state().status, TransportStatus::Paused);
    assert_eq!(
        player.drain_effects(),
        vec![UiEffect::SetVolumeDropOpen { open: false }]
    );
}

// ============================================================================
// Volume
// ============================================================================

#[test]
fn volume_drag_is_vertical_with_top_at_max() {
    let mut player = player(two_tracks());

    player.volume_pointer_down(VOLUMEBAR, 5.0, 200.0);
    assert_eq!(player.state().volume, 1.5);
    assert_eq!(player.state().status, TransportStatus::Paused);

    player.pointer_move(5.0, 300.0);
    assert_eq!(player.state().volume, 0.0);

    // 0.68 of the bar is 1.02, inside the snap window
    player.pointer_move(5.0, 232.0);
    assert_eq!(player.state().volume, 1.0);

    player.pointer_up();
    assert!(!player.is_volume_dragging());
}

#[test]
fn volume_drag_opens_drop_down() {
    let mut player = player(two_tracks());
    player.volume_pointer_down(VOLUMEBAR, 5.0, 250.0);
    let effects = player.drain_effects();
    assert_eq!(effects[0], UiEffect::SetVolumeDropOpen { open: true });
    assert!(matches!(effects[1], UiEffect::SetVolume { .. }));
}

#[test]
fn volume_changes_render_level_title_and_fill() {
    let mut player = player(two_tracks());
    player.volume_pointer_down(VOLUMEBAR, 5.0, 250.0);
    let effects = player.drain_effects();
    assert_eq!(
        effects[1],
        UiEffect::SetVolume {
            level: VolumeLevel::High,
            title: "Volume: 75% (Normalized)".to_string(),
            fill: 0.5,
        }
    );
}

#[test]
fn quiet_album_is_boosted_only_with_headroom() {
    let amplified = build(
        &config(two_tracks(), Some(-18.0)),
        SoftwareGain::amplified(),
        MemoryStore::with_entries([("volume", "0.25")]),
    );
    assert!((amplified.volume().output_gain() - 0.25 * 3.981).abs() < 0.001);

    let unity = build(
        &config(two_tracks(), Some(-18.0)),
        SoftwareGain::unity(),
        MemoryStore::with_entries([("volume", "0.25")]),
    );
    assert_eq!(unity.volume().headroom(), Headroom::Unity);
    assert_eq!(unity.volume().output_gain(), 0.25);
    assert_eq!(unity.state().max_volume, 1.0);
}

#[test]
fn toggling_replaygain_twice_restores_output() {
    let mut player = build(
        &config(two_tracks(), Some(-20.0)),
        SoftwareGain::amplified(),
        MemoryStore::with_entries([("volume", "0.3")]),
    );
    let before = player.volume().output_gain();

    player.toggle_replaygain();
    assert!(!player.state().replaygain_enabled);
    assert_eq!(player.store().value("replaygain"), Some("off"));

    player.toggle_replaygain();
    assert!(player.state().replaygain_enabled);
    assert_eq!(player.store().value("replaygain"), Some("on"));
    assert!((player.volume().output_gain() - before).abs() < 1e-9);
}

#[test]
fn replaygain_toggle_renders_button_state() {
    let mut player = player(two_tracks());
    player.toggle_replaygain();
    let effects = player.drain_effects();
    assert_eq!(effects[0], UiEffect::SetReplaygain { enabled: false });
}

#[test]
fn persisted_volume_is_independent_of_replaygain() {
    let mut on = build(
        &config(two_tracks(), Some(-18.0)),
        SoftwareGain::amplified(),
        MemoryStore::with_entries([("volume", "0.4"), ("replaygain", "on")]),
    );
    let off = build(
        &config(two_tracks(), Some(-18.0)),
        SoftwareGain::amplified(),
        MemoryStore::with_entries([("volume", "0.4"), ("replaygain", "off")]),
    );

    let stored = |player: &TestPlayer| -> f64 {
        player.store().value("volume").unwrap().parse().unwrap()
    };
    assert!((stored(&on) - 0.4).abs() < 1e-9);
    assert!((stored(&off) - 0.4).abs() < 1e-9);

    // Toggling changes the output, and the stored value is re-derived
    // from it with compensation divided out.
    on.toggle_replaygain();
    assert!((stored(&on) - on.volume().output_gain()).abs() < 1e-9);
}

#[test]
fn missing_preferences_start_at_full_volume_with_replaygain() {
    let player = player(two_tracks());
    let state = player.state();
    assert_eq!(state.volume, 1.0);
    assert!(state.replaygain_enabled);
    assert_eq!(player.store().value("volume"), Some("1"));
}

#[test]
fn mute_remembers_previous_volume() {
    let mut player = build(
        &config(two_tracks(), Some(-12.0)),
        SoftwareGain::amplified(),
        MemoryStore::with_entries([("volume", "0.7")]),
    );

    player.toggle_mute();
    assert_eq!(player.state().volume, 0.0);
    assert_eq!(player.store().value("volume"), Some("0"));

    player.toggle_mute();
    assert!((player.state().volume - 0.7).abs() < 1e-12);
}

#[test]
fn replaygain_toggle_while_muted_keeps_volume_in_range() {
    let mut player = build(
        &config(two_tracks(), Some(-18.0)),
        SoftwareGain::amplified(),
        MemoryStore::with_entries([("volume", "1")]),
    );

    player.toggle_mute();
    player.toggle_replaygain();
    player.toggle_mute();

    let state = player.state();
    assert!(state.volume <= state.max_volume, "{}", state.volume);
    assert!((state.volume - 1.0).abs() < 1e-9);
    let stored: f64 = player.store().value("volume").unwrap().parse().unwrap();
    assert!((stored - 1.0).abs() < 1e-9);

    let effects = player.drain_effects();
    assert!(matches!(
        effects.last(),
        Some(UiEffect::SetVolume { title, .. }) if title == "Volume: 100%"
    ));
}

// ============================================================================
// Ticker
// ============================================================================

#[test]
fn ticker_runs_while_playing() {
    let mut player = player(two_tracks());
    player.toggle_play();
    player.handle_transport(TransportEvent::Play);
    assert!(player.ticker().is_running());

    player.engine_mut().transport_mut().advance(200.0);
    player.on_frame();
    assert!(player.ticker().is_running());
    assert_eq!(player.state().current_track_index, 1);
}

#[test]
fn frame_while_paused_does_not_reschedule() {
    let mut player = player(two_tracks());
    player.toggle_play();
    player.handle_transport(TransportEvent::Play);
    let requested = player.ticker().scheduler().requested();

    player.engine_mut().pause();
    player.on_frame();
    assert!(!player.ticker().is_running());
    assert_eq!(player.ticker().scheduler().requested(), requested);
}

#[test]
fn pause_cancels_pending_frame() {
    let mut player = player(two_tracks());
    player.handle_transport(TransportEvent::Play);
    player.handle_transport(TransportEvent::Pause);
    assert!(!player.ticker().is_running());
    assert_eq!(player.ticker().scheduler().cancelled(), 1);
}

// ============================================================================
// Lyrics
// ============================================================================

#[test]
fn open_lyrics_move_with_the_current_track() {
    let mut player = player(three_tracks());
    player.register_lyrics("one", false).unwrap();
    player.register_lyrics("two", false).unwrap();
    player.lyrics_toggled("one", true).unwrap();

    let effects = seek(&mut player, 150.0);
    assert!(effects.contains(&UiEffect::SetLyricsOpen {
        slug: "one".to_string(),
        open: false,
    }));
    assert!(effects.contains(&UiEffect::SetLyricsOpen {
        slug: "two".to_string(),
        open: true,
    }));
}

#[test]
fn closed_lyrics_stay_closed() {
    let mut player = player(three_tracks());
    player.register_lyrics("one", false).unwrap();
    player.register_lyrics("two", false).unwrap();

    let effects = seek(&mut player, 150.0);
    assert!(!effects
        .iter()
        .any(|e| matches!(e, UiEffect::SetLyricsOpen { .. })));
}

// ============================================================================
// Startup and Sources
// ============================================================================

#[test]
fn initial_render_labels_every_track() {
    let config = config(three_tracks(), Some(-12.0));
    let parts = PlayerParts {
        transport: MemoryTransport::with_duration(300.0),
        gain: SoftwareGain::amplified(),
        store: MemoryStore::new(),
        scheduler: ManualScheduler::new(),
    };
    let mut player = GaplessPlayer::new(&config, parts).unwrap();
    player.render_initial();
    let effects = player.drain_effects();

    let durations = effects
        .iter()
        .filter(|e| matches!(e, UiEffect::SetTrackDuration { .. }))
        .count();
    assert_eq!(durations, 3);
    assert!(effects.contains(&UiEffect::SetTitle {
        title: "ONE".to_string()
    }));
    assert!(!effects.contains(&UiEffect::HideSkipButtons));
}

#[test]
fn hide_title_is_rendered() {
    let mut config = config(two_tracks(), None);
    config.hide_title = true;
    let parts = PlayerParts {
        transport: MemoryTransport::with_duration(360.0),
        gain: SoftwareGain::amplified(),
        store: MemoryStore::new(),
        scheduler: ManualScheduler::new(),
    };
    let mut player = GaplessPlayer::new(&config, parts).unwrap();
    player.render_initial();
    assert!(player.drain_effects().contains(&UiEffect::HideTitle));
}

#[test]
fn override_slug_streams_a_single_track() {
    let mut config = config(two_tracks(), None);
    config.release_slug = None;
    config.override_slug = Some("dusk".to_string());
    let player = build(&config, SoftwareGain::amplified(), MemoryStore::new());
    assert_eq!(
        player.engine().source(),
        Some("https://music.example/transcode/track/dusk?format=opus")
    );
}

#[test]
fn no_format_leaves_player_unavailable() {
    let config = config(two_tracks(), None);
    let parts = PlayerParts {
        transport: MemoryTransport::with_duration(360.0),
        gain: SoftwareGain::amplified(),
        store: MemoryStore::new(),
        scheduler: ManualScheduler::new(),
    };
    let mut player = GaplessPlayer::new(&config, parts).unwrap();
    let endpoint = StreamEndpoint::with_origin("https://music.example", "/").unwrap();
    player.attach_source(None, &endpoint).unwrap();

    assert!(matches!(
        player.drain_effects().as_slice(),
        [UiEffect::Unavailable { .. }]
    ));
    assert!(!player.engine().has_source());

    player.toggle_play();
    assert_eq!(player.state().status, TransportStatus::Paused);
}

#[test]
fn overlapping_tracks_are_rejected() {
    let config = config(
        vec![descriptor("a", 0.0, 120.0), descriptor("b", 100.0, 200.0)],
        None,
    );
    let parts = PlayerParts {
        transport: MemoryTransport::new(),
        gain: SoftwareGain::unity(),
        store: MemoryStore::new(),
        scheduler: ManualScheduler::new(),
    };
    let err = GaplessPlayer::new(&config, parts).unwrap_err();
    assert!(matches!(
        err,
        PlaybackError::Config(CoreError::InvalidTrackTable { index: 1, .. })
    ));
}
