//! Codec queries and trial loads through throwaway audio elements

use crate::{
    error::{PlaybackError, Result},
    format::{CodecSupport, FormatProbe},
};
use async_trait::async_trait;
use seamless_core::Format;
use js_sys::{Function, Promise};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

/// Probe backed by the browser's media stack
#[derive(Debug, Clone)]
pub struct BrowserProbe {
    query: HtmlAudioElement,
}

impl BrowserProbe {
    /// Create a probe
    pub fn new() -> std::result::Result<Self, JsValue> {
        Ok(Self {
            query: HtmlAudioElement::new()?,
        })
    }
}

#[async_trait(?Send)]
impl FormatProbe for BrowserProbe {
    fn can_play_type(&self, mime: &str) -> CodecSupport {
        CodecSupport::from_answer(&self.query.can_play_type(mime))
    }

    async fn trial_load(&self, format: &Format, url: &str) -> Result<()> {
        let audio = HtmlAudioElement::new()
            .map_err(|e| PlaybackError::Transport(format!("{e:?}")))?;

        let pending = Promise::new(&mut |resolve: Function, reject: Function| {
            let on_ready = Closure::once_into_js(move || {
                resolve.call0(&JsValue::NULL).ok();
            });
            let on_error = Closure::once_into_js(move |e: JsValue| {
                reject.call1(&JsValue::NULL, &e).ok();
            });
            audio
                .add_event_listener_with_callback("canplay", on_ready.unchecked_ref())
                .ok();
            audio
                .add_event_listener_with_callback("error", on_error.unchecked_ref())
                .ok();
        });

        audio.set_src(url);
        audio.load();

        let outcome = match JsFuture::from(pending).await {
            Ok(_) => Ok(()),
            Err(_) => Err(PlaybackError::TrialFailed {
                format: format.name.clone(),
                reason: audio
                    .error()
                    .map_or_else(|| "unknown error".to_string(), |e| format!("media error code {}", e.code())),
            }),
        };
        audio.remove_attribute("src").ok();
        outcome
    }
}
