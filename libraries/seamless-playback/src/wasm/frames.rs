//! `requestAnimationFrame` scheduler

use crate::ticker::FrameScheduler;
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::{closure::Closure, JsCast};

type FrameCallback = Closure<dyn FnMut(f64)>;

/// Schedules the player's frame callback on display frames
///
/// The callback is installed after the player exists, since it needs a
/// handle back to it.
#[derive(Debug, Clone, Default)]
pub struct AnimationFrames {
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl AnimationFrames {
    /// Scheduler with no callback yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the function each frame runs
    pub fn set_callback(&self, callback: impl FnMut(f64) + 'static) {
        let closure = Closure::wrap(Box::new(callback) as Box<dyn FnMut(f64)>);
        *self.callback.borrow_mut() = Some(closure);
    }
}

impl FrameScheduler for AnimationFrames {
    type Handle = i32;

    fn request_frame(&mut self) -> Option<i32> {
        let window = web_sys::window()?;
        let callback = self.callback.borrow();
        let function: &js_sys::Function = callback.as_ref()?.as_ref().unchecked_ref();
        match window.request_animation_frame(function) {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!("Can't request animation frame: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: i32) {
        if let Some(window) = web_sys::window() {
            window.cancel_animation_frame(handle).ok();
        }
    }
}
