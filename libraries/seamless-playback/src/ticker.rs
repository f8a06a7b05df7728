//! Frame ticker
//!
//! Drives position updates while the transport plays. Native time events
//! arrive only a few times per second, which is too coarse for the seek
//! bar, so the player also polls once per display frame.

/// Schedules one callback on the next display frame
pub trait FrameScheduler {
    /// Handle used to cancel a pending frame
    type Handle;

    /// Request a frame
    ///
    /// `None` means the request was refused and no frame will fire.
    fn request_frame(&mut self) -> Option<Self::Handle>;

    /// Cancel a pending frame
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// Start/stop wrapper around a [`FrameScheduler`]
///
/// At most one frame is pending at a time.
#[derive(Debug)]
pub struct Ticker<S: FrameScheduler> {
    scheduler: S,
    pending: Option<S::Handle>,
}

impl<S: FrameScheduler> Ticker<S> {
    /// Create a stopped ticker
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
        }
    }

    /// Request a frame unless one is already pending
    ///
    /// A refused request leaves the ticker stopped, so the next `start`
    /// asks again.
    pub fn start(&mut self) {
        if self.pending.is_none() {
            self.pending = self.scheduler.request_frame();
        }
    }

    /// Cancel the pending frame, if any
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    /// Whether a frame is pending
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Record that the pending frame fired
    ///
    /// Reschedules only while `still_playing`. Returns whether another
    /// frame was requested.
    pub fn on_frame(&mut self, still_playing: bool) -> bool {
        self.pending = None;
        if still_playing {
            self.start();
        }
        self.pending.is_some()
    }

    /// Underlying scheduler
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Underlying scheduler, mutably
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

/// Scheduler that only counts requests, for headless use and tests
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    refusing: bool,
    next_handle: u32,
    pending: Vec<u32>,
    requested: usize,
    cancelled: usize,
}

impl ManualScheduler {
    /// New scheduler with nothing pending
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every request while `refusing` is set
    pub fn set_refusing(&mut self, refusing: bool) {
        self.refusing = refusing;
    }

    /// Frames requested and not yet cancelled or fired
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Total frames requested
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Total frames cancelled
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }

    /// Consume the oldest pending frame, returning whether there was one
    ///
    /// The caller is expected to pass the frame on to the ticker's owner.
    pub fn fire(&mut self) -> bool {
        if self.pending.is_empty() {
            false
        } else {
            self.pending.remove(0);
            true
        }
    }
}

impl FrameScheduler for ManualScheduler {
    type Handle = u32;

    fn request_frame(&mut self) -> Option<u32> {
        self.requested += 1;
        if self.refusing {
            return None;
        }
        self.next_handle += 1;
        self.pending.push(self.next_handle);
        Some(self.next_handle)
    }

    fn cancel_frame(&mut self, handle: u32) {
        self.pending.retain(|&h| h != handle);
        self.cancelled += 1;
    }
}
