//! HTML audio element transport and the two gain paths

use crate::{
    error::{PlaybackError, Result},
    source::MediaTransport,
    volume::GainOutput,
};
use seamless_loudness::Headroom;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AudioContext, AudioContextOptions, GainNode, HtmlAudioElement};

/// Transport backed by an `HTMLAudioElement`
#[derive(Debug, Clone)]
pub struct BrowserTransport {
    audio: HtmlAudioElement,
}

impl BrowserTransport {
    /// Wrap an audio element
    pub fn new(audio: HtmlAudioElement) -> Self {
        Self { audio }
    }

    /// The element, for attaching listeners
    pub fn element(&self) -> &HtmlAudioElement {
        &self.audio
    }
}

impl MediaTransport for BrowserTransport {
    fn set_source(&mut self, url: &str) {
        self.audio.set_src(url);
    }

    fn load(&mut self) {
        self.audio.load();
    }

    fn play(&mut self) -> Result<()> {
        let promise = self
            .audio
            .play()
            .map_err(|e| PlaybackError::Transport(format!("{e:?}")))?;
        // Autoplay policies reject the promise instead of throwing.
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                tracing::warn!("Playback was refused: {:?}", e);
            }
        });
        Ok(())
    }

    fn pause(&mut self) {
        if let Err(e) = self.audio.pause() {
            tracing::warn!("Can't pause: {:?}", e);
        }
    }

    fn is_paused(&self) -> bool {
        self.audio.paused()
    }

    fn current_time(&self) -> f64 {
        self.audio.current_time()
    }

    fn set_current_time(&mut self, time: f64) {
        self.audio.set_current_time(time);
    }

    fn duration(&self) -> Option<f64> {
        let duration = self.audio.duration();
        duration.is_finite().then_some(duration)
    }

    fn buffered_end(&self) -> Option<f64> {
        let ranges = self.audio.buffered();
        let count = ranges.length();
        if count == 0 {
            return None;
        }
        ranges.end(count - 1).ok()
    }
}

/// Gain through the element's own volume (cannot exceed 1.0)
#[derive(Debug, Clone)]
pub struct ElementGain {
    audio: HtmlAudioElement,
}

impl ElementGain {
    /// Drive `audio`'s volume
    pub fn new(audio: HtmlAudioElement) -> Self {
        Self { audio }
    }
}

impl GainOutput for ElementGain {
    fn headroom(&self) -> Headroom {
        Headroom::Unity
    }

    fn set_gain(&mut self, gain: f64) {
        self.audio.set_volume(gain.clamp(0.0, 1.0));
    }

    fn gain(&self) -> f64 {
        self.audio.volume()
    }
}

/// Gain through a Web Audio graph: element source, gain node, destination
#[derive(Debug, Clone)]
pub struct GraphGain {
    // Keeps the graph alive
    _context: AudioContext,
    node: GainNode,
}

impl GraphGain {
    /// Route `audio` through a new gain node
    pub fn connect(audio: &HtmlAudioElement) -> std::result::Result<Self, JsValue> {
        let options = AudioContextOptions::new();
        options.set_latency_hint(&JsValue::from_str("playback"));
        let context = AudioContext::new_with_context_options(&options)?;
        let source = context.create_media_element_source(audio)?;
        let node = context.create_gain()?;
        source.connect_with_audio_node(&node)?;
        node.connect_with_audio_node(&context.destination())?;
        Ok(Self {
            _context: context,
            node,
        })
    }
}

impl GainOutput for GraphGain {
    fn headroom(&self) -> Headroom {
        Headroom::Amplified
    }

    fn set_gain(&mut self, gain: f64) {
        self.node.gain().set_value(gain as f32);
    }

    fn gain(&self) -> f64 {
        f64::from(self.node.gain().value())
    }
}

/// Pick the gain path once: a graph when Web Audio works, else the element
pub fn connect_gain(audio: &HtmlAudioElement) -> Box<dyn GainOutput> {
    let has_web_audio = js_sys::Reflect::has(&js_sys::global(), &JsValue::from_str("AudioContext"))
        .unwrap_or(false);
    if Headroom::detect(has_web_audio).allows_boost() {
        match GraphGain::connect(audio) {
            Ok(graph) => return Box::new(graph),
            Err(e) => tracing::warn!("Can't build an amplification graph: {:?}", e),
        }
    }
    tracing::debug!("Using element volume, output limited to 100%");
    Box::new(ElementGain::new(audio.clone()))
}
