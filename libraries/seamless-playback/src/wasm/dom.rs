//! Player widget markup: element lookup and effect rendering
//!
//! Every element is optional. A missing control simply never renders and
//! never produces input.

use crate::{
    events::{UiEffect, CLASS_SWAP_DELAY_MS},
    types::{BarRect, Control, ControlClass},
    ui::TrackRow,
    volume::VolumeLevel,
};
use gloo_timers::future::TimeoutFuture;
use std::collections::HashMap;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlDetailsElement, HtmlElement};

/// Elements of one track row
#[derive(Debug, Clone)]
pub(super) struct TrackElements {
    pub(super) button: Option<Element>,
    pub(super) lyrics: Option<HtmlDetailsElement>,
    pub(super) duration: Option<Element>,
}

/// Handles to the `#player-widget` markup
#[derive(Debug, Clone)]
pub struct Widget {
    pub(super) root: Element,
    pub(super) seekbar: Option<Element>,
    seek_position: Option<Element>,
    seek_buffered: Option<Element>,
    pub(super) volumebar: Option<Element>,
    volume_position: Option<Element>,
    pub(super) voldrop: Option<Element>,
    pub(super) voldrop_contents: Option<Element>,
    volicon: Option<Element>,
    pub(super) replaygain: Option<Element>,
    pub(super) play_toggle: Option<Element>,
    pub(super) skip_prev: Option<Element>,
    pub(super) skip_next: Option<Element>,
    track_name: Option<Element>,
    time_current: Option<Element>,
    time_total: Option<Element>,
    pub(super) tracks: HashMap<String, TrackElements>,
}

impl Widget {
    /// Look up the widget and every track row in `document`
    pub fn query(document: &Document) -> Option<Self> {
        let root = document.query_selector("#player-widget").ok().flatten()?;
        let find = |selector: &str| -> Option<Element> {
            root.query_selector(selector).ok().flatten()
        };
        let seekbar = find(".seekbar");
        let volumebar = find(".volumebar");
        let voldrop = find(".voldrop");

        let widget = Self {
            seek_position: child(seekbar.as_ref(), ".position"),
            seek_buffered: child(seekbar.as_ref(), ".buffered"),
            volume_position: child(volumebar.as_ref(), ".position"),
            voldrop_contents: child(voldrop.as_ref(), ".contents"),
            volicon: find(".volicon"),
            replaygain: find(".replaygain, .replaygain-off"),
            play_toggle: find(".play-toggle"),
            skip_prev: find(".skip-prev"),
            skip_next: find(".skip-next"),
            track_name: find(".track-name"),
            time_current: find(".play-position .current"),
            time_total: find(".play-position .total"),
            tracks: query_tracks(document),
            seekbar,
            volumebar,
            voldrop,
            root,
        };
        Some(widget)
    }

    /// Lyrics panels present on the page, with their open state
    pub fn lyrics_panels(&self) -> Vec<(String, bool)> {
        self.tracks
            .iter()
            .filter_map(|(slug, row)| row.lyrics.as_ref().map(|l| (slug.clone(), l.open())))
            .collect()
    }

    /// Render one effect
    pub fn apply(&self, effect: &UiEffect) {
        match effect {
            UiEffect::SwapClass { control, from, to } => {
                if let Some(element) = self.control(control) {
                    swap_class(element, *from, *to);
                }
            }
            UiEffect::SetTitle { title } => set_text(self.track_name.as_ref(), title),
            UiEffect::HideTitle => hide(self.track_name.as_ref()),
            UiEffect::SetTime { elapsed, total } => {
                set_text(self.time_current.as_ref(), elapsed);
                set_text(self.time_total.as_ref(), total);
            }
            UiEffect::SetSeekPosition { fraction } => set_width(self.seek_position.as_ref(), *fraction),
            UiEffect::SetBuffered { fraction } => set_width(self.seek_buffered.as_ref(), *fraction),
            UiEffect::SetSkipState {
                prev_disabled,
                next_disabled,
            } => {
                set_class(self.skip_prev.as_ref(), "disabled", *prev_disabled);
                set_class(self.skip_next.as_ref(), "disabled", *next_disabled);
            }
            UiEffect::HideSkipButtons => {
                hide(self.skip_prev.as_ref());
                hide(self.skip_next.as_ref());
            }
            UiEffect::SetVolume { level, title, fill } => {
                if let Some(icon) = &self.volicon {
                    let classes = icon.class_list();
                    for other in VolumeLevel::ALL {
                        classes.remove_1(other.as_str()).ok();
                    }
                    classes.add_1(level.as_str()).ok();
                }
                if let Some(drop) = &self.voldrop {
                    drop.set_attribute("title", title).ok();
                }
                set_width(self.volume_position.as_ref(), *fill);
            }
            UiEffect::SetReplaygain { enabled } => {
                set_class(self.replaygain.as_ref(), "replaygain", *enabled);
                set_class(self.replaygain.as_ref(), "replaygain-off", !*enabled);
            }
            UiEffect::SetVolumeDropOpen { open } => set_class(self.voldrop.as_ref(), "open", *open),
            UiEffect::SetLyricsOpen { slug, open } => {
                if let Some(lyrics) = self.tracks.get(slug).and_then(|t| t.lyrics.as_ref()) {
                    lyrics.set_open(*open);
                }
            }
            UiEffect::SetTrackDuration { slug, label } => {
                set_text(self.tracks.get(slug).and_then(|t| t.duration.as_ref()), label);
            }
            UiEffect::Unavailable { reason } => {
                self.root.class_list().add_1("unavailable").ok();
                self.root.set_attribute("title", reason).ok();
            }
        }
    }

    fn control(&self, control: &Control) -> Option<&Element> {
        match control {
            Control::GlobalPlayPause => self.play_toggle.as_ref(),
            Control::Track(slug) => self.tracks.get(slug).and_then(|t| t.button.as_ref()),
        }
    }
}

/// Bounding box of `element`
pub(super) fn bar_rect(element: &Element) -> BarRect {
    let rect = element.get_bounding_client_rect();
    BarRect {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    }
}

/// Fill `#tracks` with generated rows when it asks for them
pub(super) fn build_track_rows(document: &Document, rows: &[TrackRow]) {
    let Some(container) = document.query_selector("#tracks").ok().flatten() else {
        return;
    };
    if container.get_attribute("data-auto").as_deref() != Some("true") {
        return;
    }
    for row in rows {
        if let Err(e) = append_row(document, &container, row) {
            tracing::warn!("Can't create row for {}: {:?}", row.slug, e);
        }
    }
}

fn append_row(
    document: &Document,
    container: &Element,
    row: &TrackRow,
) -> Result<(), wasm_bindgen::JsValue> {
    let element = |tag: &str, class: &str, text: Option<&str>| -> Result<Element, wasm_bindgen::JsValue> {
        let e = document.create_element(tag)?;
        e.set_class_name(class);
        if let Some(text) = text {
            e.set_text_content(Some(text));
        }
        Ok(e)
    };

    let track = element("div", "track", None)?;
    track.set_attribute("data-track-slug", &row.slug)?;
    track.append_child(&element("button", "player-control play", None)?)?;

    let link = element("a", "", None)?;
    link.set_attribute("href", "#")?;
    link.append_child(&element("span", "trackNumber", Some(&row.number.to_string()))?)?;
    link.append_child(&element("span", "title", Some(&row.title))?)?;
    link.append_child(&element("span", "subtitle", Some(&row.subtitle))?)?;
    track.append_child(&link)?;

    track.append_child(&element("span", "track-duration", Some(&row.duration))?)?;
    container.append_child(&track)?;
    Ok(())
}

fn query_tracks(document: &Document) -> HashMap<String, TrackElements> {
    let mut tracks = HashMap::new();
    let Ok(rows) = document.query_selector_all(".track[data-track-slug]") else {
        return tracks;
    };
    for i in 0..rows.length() {
        let Some(row) = rows.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let Some(slug) = row.get_attribute("data-track-slug") else {
            continue;
        };
        let lyrics = child(Some(&row), ".lyrics").and_then(|e| e.dyn_into::<HtmlDetailsElement>().ok());
        tracks.insert(
            slug,
            TrackElements {
                button: child(Some(&row), ".player-control"),
                lyrics,
                duration: child(Some(&row), ".track-duration"),
            },
        );
    }
    tracks
}

fn child(parent: Option<&Element>, selector: &str) -> Option<Element> {
    parent?.query_selector(selector).ok().flatten()
}

/// Delayed class swap; only runs if `element` carries `from`
fn swap_class(element: &Element, from: ControlClass, to: ControlClass) {
    let classes = element.class_list();
    if !classes.contains(from.as_str()) {
        return;
    }
    classes.add_1("trans").ok();
    wasm_bindgen_futures::spawn_local(async move {
        TimeoutFuture::new(CLASS_SWAP_DELAY_MS).await;
        classes.remove_1(from.as_str()).ok();
        classes.add_1(to.as_str()).ok();
        classes.remove_1("trans").ok();
    });
}

fn set_class(element: Option<&Element>, class: &str, on: bool) {
    if let Some(element) = element {
        element.class_list().toggle_with_force(class, on).ok();
    }
}

fn set_text(element: Option<&Element>, text: &str) {
    if let Some(element) = element {
        element.set_text_content(Some(text));
    }
}

fn set_width(element: Option<&Element>, fraction: f64) {
    if let Some(element) = element.and_then(|e| e.dyn_ref::<HtmlElement>()) {
        element
            .style()
            .set_property("width", &format!("{}%", fraction * 100.0))
            .ok();
    }
}

fn hide(element: Option<&Element>) {
    if let Some(element) = element.and_then(|e| e.dyn_ref::<HtmlElement>()) {
        element.style().set_property("display", "none").ok();
    }
}
