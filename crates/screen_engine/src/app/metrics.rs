use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LockResult, RwLock};
use std::time::{Duration, Instant};

use tracing::warn;

static POISON_REPORTED: AtomicBool = AtomicBool::new(false);

/// Takes the guard out of a possibly poisoned lock; the snapshot is plain data,
/// so a writer that panicked cannot leave it half-updated.
fn recover<G>(result: LockResult<G>, operation: &'static str) -> G {
    result.unwrap_or_else(|poisoned| {
        if !POISON_REPORTED.swap(true, Ordering::Relaxed) {
            warn!(operation, "loop_metrics_lock_poisoned");
        }
        poisoned.into_inner()
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub tps: f32,
    pub frame_time_ms: f32,
    pub dropped_stalls: u32,
}

/// Shared view of the most recent metrics window.
#[derive(Debug, Clone, Default)]
pub struct MetricsHandle {
    latest: Arc<RwLock<LoopMetricsSnapshot>>,
}

impl MetricsHandle {
    pub fn snapshot(&self) -> LoopMetricsSnapshot {
        *recover(self.latest.read(), "read")
    }

    pub(crate) fn publish(&self, snapshot: LoopMetricsSnapshot) {
        *recover(self.latest.write(), "write") = snapshot;
    }
}

#[derive(Debug, Default)]
struct WindowCounts {
    frames: u32,
    ticks: u32,
    stalls: u32,
    frame_time: Duration,
}

impl WindowCounts {
    fn into_snapshot(self, window: Duration) -> LoopMetricsSnapshot {
        let seconds = window.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = match self.frames {
            0 => 0.0,
            frames => self.frame_time.as_secs_f32() * 1000.0 / frames as f32,
        };
        LoopMetricsSnapshot {
            fps: self.frames as f32 / seconds,
            tps: self.ticks as f32 / seconds,
            frame_time_ms,
            dropped_stalls: self.stalls,
        }
    }
}

/// Counts frames, steps and discarded stalls over fixed wall-clock windows.
#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    window: Duration,
    window_start: Option<Instant>,
    counts: WindowCounts,
}

impl MetricsAccumulator {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            window,
            window_start: None,
            counts: WindowCounts::default(),
        }
    }

    pub(crate) fn start(&mut self, now: Instant) {
        self.window_start = Some(now);
        self.counts = WindowCounts::default();
    }

    pub(crate) fn record_frame(&mut self, frame_time: Duration) {
        self.counts.frames = self.counts.frames.saturating_add(1);
        self.counts.frame_time = self.counts.frame_time.saturating_add(frame_time);
    }

    pub(crate) fn record_tick(&mut self) {
        self.counts.ticks = self.counts.ticks.saturating_add(1);
    }

    pub(crate) fn record_stall(&mut self) {
        self.counts.stalls = self.counts.stalls.saturating_add(1);
    }

    /// Closes the window once it is at least `window` long and starts the next one at `now`.
    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let start = *self.window_start.get_or_insert(now);
        let elapsed = now.saturating_duration_since(start);
        if elapsed < self.window {
            return None;
        }
        self.window_start = Some(now);
        Some(mem::take(&mut self.counts).into_snapshot(elapsed))
    }
}
