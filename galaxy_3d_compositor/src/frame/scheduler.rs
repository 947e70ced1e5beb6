/// Tick scheduling — how the driver asks its host for the next refresh.

use std::sync::atomic::{AtomicU64, Ordering};

/// Requests one more tick from the host
pub trait TickScheduler {
    fn schedule_next_tick(&self);
}

impl TickScheduler for winit::window::Window {
    fn schedule_next_tick(&self) {
        self.request_redraw();
    }
}

/// Scheduler that only counts requests.
///
/// For hosts that tick on their own clock (tests, offline rendering).
#[derive(Debug, Default)]
pub struct ManualScheduler {
    scheduled: AtomicU64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ticks requested so far
    pub fn scheduled(&self) -> u64 {
        self.scheduled.load(Ordering::Relaxed)
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule_next_tick(&self) {
        self.scheduled.fetch_add(1, Ordering::Relaxed);
    }
}
