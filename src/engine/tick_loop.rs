/// Per-mode frame scheduling state.
///
/// Pausing is a flag plus cancellation of the pending frame; resuming
/// re-schedules it. The host only delivers a frame to a mode whose loop is
/// scheduled, so nothing advances between `pause` and `resume`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickLoop {
    scheduled: bool,
    paused: bool,
    stopped: bool,
    frames: u64,
}

impl TickLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the first frame.
    pub fn start(&mut self) {
        if self.stopped {
            return;
        }
        self.scheduled = true;
        self.paused = false;
    }

    pub fn pause(&mut self) {
        self.paused = true;
        self.scheduled = false;
    }

    /// Re-schedule after a pause. Returns false (and does nothing) when the loop
    /// was not paused, so a second resume cannot start a second chain.
    pub fn resume(&mut self) -> bool {
        if !self.paused || self.stopped {
            return false;
        }
        self.paused = false;
        self.scheduled = true;
        true
    }

    /// Teardown: cancel the pending frame for good.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.scheduled = false;
    }

    /// Consume a delivered frame. Returns whether the owner should tick.
    pub fn take_frame(&mut self) -> bool {
        if !self.scheduled {
            return false;
        }
        self.frames += 1;
        true
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
