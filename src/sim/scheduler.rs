//! Frame scheduling abstraction
//!
//! The engine never talks to a platform animation-frame API directly. It asks a
//! [`FrameScheduler`] for the next frame and cancels requests it no longer wants;
//! whoever owns the scheduler delivers the frame back with the handle it was issued.

use serde::{Deserialize, Serialize};

/// Identifies one requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameHandle(pub u32);

pub trait FrameScheduler {
    /// Ask for one callback on the next frame
    fn request_frame(&mut self) -> FrameHandle;

    /// Drop a request that has not fired yet
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Synthetic clock for tests and headless runs.
///
/// Only records what was asked of it; the driver reads [`ManualScheduler::pending`]
/// and calls back into the engine itself.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    next_id: u32,
    pending: Option<FrameHandle>,
    requested: u32,
    cancelled: u32,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent request that is still outstanding
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Take the outstanding request, marking it as fired
    pub fn fire(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    pub fn requested(&self) -> u32 {
        self.requested
    }

    pub fn cancelled(&self) -> u32 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id = self.next_id.wrapping_add(1);
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        self.requested += 1;
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        self.cancelled += 1;
    }
}
