/// Frame driver - next-frame scheduling and per-frame statistics

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Callback run at the next frame boundary
pub type FrameCallback = Box<dyn FnOnce() + 'static>;

/// Host frame-pacing primitive
///
/// `request_frame` registers the callback and returns immediately; the
/// callback runs once, at the next frame boundary.
pub trait FramePacer {
    fn request_frame(&mut self, callback: FrameCallback);
}

/// Frame pacer for hosts driving their own loop
///
/// Clones share one queue: hand one to `Gfx` and call `run_pending` on
/// another once per host frame.
#[derive(Clone, Default)]
pub struct ManualFramePacer {
    queue: Rc<RefCell<VecDeque<FrameCallback>>>,
}

impl ManualFramePacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks waiting for the next frame
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run the callbacks queued before this call
    ///
    /// Callbacks requested while running wait for the next call. Returns
    /// the number of callbacks run.
    pub fn run_pending(&self) -> usize {
        let due: Vec<FrameCallback> = self.queue.borrow_mut().drain(..).collect();
        let count = due.len();
        for callback in due {
            callback();
        }
        count
    }
}

impl FramePacer for ManualFramePacer {
    fn request_frame(&mut self, callback: FrameCallback) {
        self.queue.borrow_mut().push_back(callback);
    }
}

/// Per-frame counters, reset by `commit_frame`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Draw calls sent to the driver
    pub draw_calls: u32,
    /// Render-state groups sent to the driver
    pub state_changes: u32,
    /// Passes begun
    pub passes: u32,
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
