//! WASM bindings for seamless-playback
//!
//! Browser implementations of the controller's platform traits, the DOM
//! adapter for the player widget, and the `WasmGaplessPlayer` entry point.

mod dom;
mod frames;
mod logging;
mod media;
mod player;
mod probe;
mod storage;

pub use dom::Widget;
pub use frames::AnimationFrames;
pub use media::{connect_gain, BrowserTransport, ElementGain, GraphGain};
pub use player::WasmGaplessPlayer;
pub use probe::BrowserProbe;
pub use storage::BrowserStore;
