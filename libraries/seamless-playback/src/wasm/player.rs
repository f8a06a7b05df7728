//! WASM-compatible GaplessPlayer wrapper

use super::{
    dom::{bar_rect, build_track_rows, Widget},
    frames::AnimationFrames,
    logging,
    media::{connect_gain, BrowserTransport},
    probe::BrowserProbe,
    storage::BrowserStore,
};
use crate::{
    events::{TransportEvent, UiEffect},
    format::FormatNegotiator,
    player::{GaplessPlayer, PlayerParts},
    ui::track_rows,
    volume::GainOutput,
    PlaybackError, StreamEndpoint,
};
use js_sys::Function;
use seamless_core::PlayerConfig;
use std::{cell::RefCell, collections::HashMap, rc::Rc};
use wasm_bindgen::{closure::Closure, prelude::*, JsCast};
use web_sys::{Event, EventTarget, HtmlAudioElement, MouseEvent};

type BrowserPlayer =
    GaplessPlayer<BrowserTransport, Box<dyn GainOutput>, BrowserStore, AnimationFrames>;

/// Player, page and callback shared by every listener
struct Shared {
    player: RefCell<BrowserPlayer>,
    widget: Widget,
    on_effect: RefCell<Option<Function>>,
}

impl Shared {
    /// Run `f` on the player, then render what it queued
    fn dispatch(&self, f: impl FnOnce(&mut BrowserPlayer)) {
        let effects = match self.player.try_borrow_mut() {
            Ok(mut player) => {
                f(&mut player);
                player.drain_effects()
            }
            Err(_) => {
                tracing::warn!("Player is busy, dropping event");
                return;
            }
        };
        self.render(&effects);
    }

    fn render(&self, effects: &[UiEffect]) {
        for effect in effects {
            self.widget.apply(effect);
        }
        let callback = self.on_effect.borrow().clone();
        if let Some(cb) = callback {
            for effect in effects {
                if let Ok(value) = serde_wasm_bindgen::to_value(effect) {
                    cb.call1(&JsValue::NULL, &value).ok();
                }
            }
        }
    }
}

/// Gapless player mounted on `#player-widget`
#[wasm_bindgen]
pub struct WasmGaplessPlayer {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl WasmGaplessPlayer {
    /// Mount the player
    ///
    /// `attributes` is the page data (usually the script element's
    /// `dataset`). Negotiates a format, binds the widget and attaches the
    /// stream.
    pub async fn mount(attributes: JsValue) -> Result<WasmGaplessPlayer, JsValue> {
        logging::init();

        let attributes: HashMap<String, String> = serde_wasm_bindgen::from_value(attributes)
            .map_err(|e| JsValue::from_str(&format!("Failed to read page data: {}", e)))?;
        let config = PlayerConfig::from_attributes(attributes).map_err(to_js)?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document"))?;
        if let Some(body) = document.body() {
            body.class_list().add_1("yesscript").ok();
        }

        let audio = HtmlAudioElement::new()?;
        let frames = AnimationFrames::new();
        let parts = PlayerParts {
            transport: BrowserTransport::new(audio.clone()),
            gain: connect_gain(&audio),
            store: BrowserStore::open(),
            scheduler: frames.clone(),
        };
        let mut player = GaplessPlayer::new(&config, parts).map_err(to_js)?;

        build_track_rows(&document, &track_rows(player.tracks()));
        let widget = Widget::query(&document)
            .ok_or_else(|| JsValue::from_str("#player-widget not found"))?;
        for (slug, open) in widget.lyrics_panels() {
            if let Err(e) = player.register_lyrics(&slug, open) {
                tracing::debug!("Ignoring lyrics panel: {}", e);
            }
        }

        player.render_initial();
        for effect in &player.drain_effects() {
            widget.apply(effect);
        }

        let origin = window.location().origin()?;
        let endpoint = StreamEndpoint::with_origin(&origin, &config.root).map_err(to_js)?;
        let first_slug = player.tracks().first().slug.clone();
        let probe = BrowserProbe::new()?;
        let format = FormatNegotiator::new(&endpoint, config.trial_clip, &first_slug)
            .select_format(&probe, &config.formats)
            .await;
        player.attach_source(format, &endpoint).map_err(to_js)?;
        let pending = player.drain_effects();

        let shared = Rc::new(Shared {
            player: RefCell::new(player),
            widget,
            on_effect: RefCell::new(None),
        });
        shared.render(&pending);

        let weak = Rc::downgrade(&shared);
        frames.set_callback(move |_timestamp| {
            if let Some(shared) = weak.upgrade() {
                shared.dispatch(BrowserPlayer::on_frame);
            }
        });
        bind_transport(&shared, &audio);
        bind_widget(&shared);

        Ok(Self { shared })
    }

    // ===== Controls =====

    /// Toggle play/pause
    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&self) {
        self.shared.dispatch(BrowserPlayer::toggle_play);
    }

    /// Seek to the next track
    #[wasm_bindgen(js_name = skipNext)]
    pub fn skip_next(&self) {
        self.shared.dispatch(BrowserPlayer::skip_next);
    }

    /// Seek to the previous track
    #[wasm_bindgen(js_name = skipPrevious)]
    pub fn skip_previous(&self) {
        self.shared.dispatch(BrowserPlayer::skip_previous);
    }

    /// Play a track by slug
    #[wasm_bindgen(js_name = playTrack)]
    pub fn play_track(&self, slug: &str) -> Result<(), JsValue> {
        let mut result = Ok(());
        self.shared.dispatch(|p| result = p.track_button(slug));
        result.map_err(to_js)
    }

    /// Toggle loudness compensation
    #[wasm_bindgen(js_name = toggleReplaygain)]
    pub fn toggle_replaygain(&self) {
        self.shared.dispatch(BrowserPlayer::toggle_replaygain);
    }

    // ===== State Queries =====

    /// Current player state as a plain object
    pub fn state(&self) -> Result<JsValue, JsValue> {
        let state = self
            .shared
            .player
            .try_borrow()
            .map_err(|_| JsValue::from_str("Player is busy"))?
            .state();
        serde_wasm_bindgen::to_value(&state)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    // ===== Event Listeners =====

    /// Register a callback receiving every rendered effect
    #[wasm_bindgen(js_name = onEffect)]
    pub fn on_effect(&self, callback: Function) {
        *self.shared.on_effect.borrow_mut() = Some(callback);
    }
}

fn to_js(error: impl Into<PlaybackError>) -> JsValue {
    let error = error.into();
    tracing::error!("{}", error);
    JsValue::from_str(&error.to_string())
}

fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    if let Err(e) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
        tracing::warn!("Can't listen for {}: {:?}", event, e);
    }
    closure.forget();
}

fn client_position(event: &Event) -> Option<(f64, f64)> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some((f64::from(mouse.client_x()), f64::from(mouse.client_y())))
}

fn bind_transport(shared: &Rc<Shared>, audio: &HtmlAudioElement) {
    let notifications = [
        ("timeupdate", TransportEvent::TimeUpdate),
        ("progress", TransportEvent::Progress),
        ("canplay", TransportEvent::CanPlay),
        ("play", TransportEvent::Play),
        ("pause", TransportEvent::Pause),
    ];
    for (name, event) in notifications {
        let shared = Rc::clone(shared);
        listen(audio, name, move |_| {
            let event = event.clone();
            shared.dispatch(|p| p.handle_transport(event));
        });
    }

    let shared = Rc::clone(shared);
    let element = audio.clone();
    listen(audio, "error", move |_| {
        let message = element
            .error()
            .map_or_else(|| "unknown error".to_string(), |e| format!("media error code {}", e.code()));
        shared.dispatch(|p| p.handle_transport(TransportEvent::Error { message }));
    });
}

fn bind_widget(shared: &Rc<Shared>) {
    let widget = &shared.widget;

    if let Some(window) = web_sys::window() {
        let s = Rc::clone(shared);
        listen(&window, "mouseup", move |_| s.dispatch(BrowserPlayer::pointer_up));

        let s = Rc::clone(shared);
        listen(&window, "mousemove", move |e| {
            if let Some((x, y)) = client_position(&e) {
                s.dispatch(|p| p.pointer_move(x, y));
            }
        });
    }

    if let Some(seekbar) = widget.seekbar.clone() {
        let s = Rc::clone(shared);
        let bar = seekbar.clone();
        listen(&seekbar, "mousedown", move |e| {
            e.prevent_default();
            if let Some((x, _)) = client_position(&e) {
                let rect = bar_rect(&bar);
                s.dispatch(|p| p.seek_pointer_down(rect, x));
            }
        });
    }

    if let Some(volumebar) = widget.volumebar.clone() {
        let s = Rc::clone(shared);
        let bar = volumebar.clone();
        listen(&volumebar, "mousedown", move |e| {
            e.prevent_default();
            if let Some((x, y)) = client_position(&e) {
                let rect = bar_rect(&bar);
                s.dispatch(|p| p.volume_pointer_down(rect, x, y));
            }
        });
    }

    if let Some(voldrop) = &widget.voldrop {
        let s = Rc::clone(shared);
        listen(voldrop, "click", move |e| {
            e.prevent_default();
            s.dispatch(BrowserPlayer::toggle_mute);
        });
    }

    if let Some(contents) = &widget.voldrop_contents {
        listen(contents, "click", |e| {
            e.prevent_default();
            e.stop_propagation();
        });
    }

    let buttons: [(Option<&web_sys::Element>, fn(&mut BrowserPlayer)); 4] = [
        (widget.skip_prev.as_ref(), BrowserPlayer::skip_previous),
        (widget.skip_next.as_ref(), BrowserPlayer::skip_next),
        (widget.replaygain.as_ref(), BrowserPlayer::toggle_replaygain),
        (widget.play_toggle.as_ref(), BrowserPlayer::toggle_play),
    ];
    for (element, action) in buttons {
        if let Some(element) = element {
            let s = Rc::clone(shared);
            listen(element, "click", move |e| {
                e.prevent_default();
                s.dispatch(action);
            });
        }
    }

    for (slug, row) in &widget.tracks {
        if let Some(button) = &row.button {
            let s = Rc::clone(shared);
            let slug = slug.clone();
            listen(button, "click", move |e| {
                e.prevent_default();
                s.dispatch(|p| {
                    if let Err(e) = p.track_button(&slug) {
                        tracing::warn!("{}", e);
                    }
                });
            });
        }
        if let Some(lyrics) = &row.lyrics {
            let s = Rc::clone(shared);
            let slug = slug.clone();
            let panel = lyrics.clone();
            listen(lyrics, "toggle", move |_| {
                let open = panel.open();
                s.dispatch(|p| {
                    if let Err(e) = p.lyrics_toggled(&slug, open) {
                        tracing::warn!("{}", e);
                    }
                });
            });
        }
    }
}
