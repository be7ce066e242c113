use std::thread;
use std::time::{Duration, Instant};

use tracing::warn;

/// Upper bound on catch-up simulation steps in one loop iteration.
pub const MAX_FRAME_SKIP: u32 = 2;
/// Accumulated lag of this many frame intervals is dropped instead of simulated.
pub const STALL_THRESHOLD_FRAMES: u32 = 4;
pub const DEFAULT_TARGET_FRAMERATE: f32 = 60.0;

pub trait FrameClock {
    fn now(&self) -> Instant;
    fn sleep(&mut self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl FrameClock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Real and scaled game time advanced by fixed simulation steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameClock {
    real_time: f64,
    game_time: f64,
    speed: f32,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            real_time: 0.0,
            game_time: 0.0,
            speed: 1.0,
        }
    }
}

impl GameClock {
    pub fn real_time(&self) -> f64 {
        self.real_time
    }

    pub fn game_time(&self) -> f64 {
        self.game_time
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Sets the game-time multiplier; `0` pauses. Negative or non-finite values pause.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
    }

    pub fn reset_speed(&mut self) {
        self.speed = 1.0;
    }

    /// Advances both clocks by one step and returns the scaled step in seconds.
    pub fn advance(&mut self, step: Duration) -> f32 {
        let step_seconds = step.as_secs_f64();
        self.real_time += step_seconds;
        let scaled = step_seconds * f64::from(self.speed);
        self.game_time += scaled;
        scaled as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePlan {
    pub steps: u32,
    pub sleep: Duration,
    pub dropped_backlog: Duration,
    pub remainder: Duration,
}

/// Fixed-timestep accumulator pacing simulation steps against wall-clock time.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    target_framerate: f32,
    pacing_multiplier: f32,
    step: Duration,
    frame_interval: Duration,
    remainder: Duration,
    max_frame_skip: u32,
}

impl FrameScheduler {
    pub fn new(target_framerate: f32) -> Self {
        let mut scheduler = Self {
            target_framerate: DEFAULT_TARGET_FRAMERATE,
            pacing_multiplier: 1.0,
            step: Duration::ZERO,
            frame_interval: Duration::ZERO,
            remainder: Duration::ZERO,
            max_frame_skip: MAX_FRAME_SKIP,
        };
        scheduler.set_target_framerate(target_framerate);
        scheduler
    }

    pub fn target_framerate(&self) -> f32 {
        self.target_framerate
    }

    pub fn set_target_framerate(&mut self, framerate: f32) {
        let framerate = normalize_positive(framerate, DEFAULT_TARGET_FRAMERATE, "target_framerate");
        if framerate != self.target_framerate || self.step.is_zero() {
            self.target_framerate = framerate;
            self.recompute_intervals();
        }
    }

    /// Stretches wall-clock pacing without changing the simulated step length.
    pub fn set_pacing_multiplier(&mut self, multiplier: f32) {
        let multiplier = normalize_positive(multiplier, 1.0, "game_speed_multiplier");
        if multiplier != self.pacing_multiplier {
            self.pacing_multiplier = multiplier;
            self.recompute_intervals();
        }
    }

    pub fn set_max_frame_skip(&mut self, max_frame_skip: u32) {
        self.max_frame_skip = max_frame_skip.max(1);
    }

    /// Simulated duration of one step.
    pub fn step(&self) -> Duration {
        self.step
    }

    /// Wall-clock duration one step consumes from the remainder.
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn remainder(&self) -> Duration {
        self.remainder
    }

    pub fn plan(&mut self, elapsed: Duration) -> FramePlan {
        let plan = plan_frame(
            self.remainder,
            elapsed,
            self.frame_interval,
            self.max_frame_skip,
        );
        self.remainder = plan.remainder;
        plan
    }

    fn recompute_intervals(&mut self) {
        self.step = Duration::from_secs_f64(1.0 / f64::from(self.target_framerate));
        self.frame_interval = self.step.mul_f64(f64::from(self.pacing_multiplier));
    }
}

/// The three outcomes are exclusive: an iteration that sleeps does not also
/// step, so the caller renders once after the sleep and the folded remainder
/// pays for one step on the next iteration. At steady state this renders two
/// frames per simulation step.
fn plan_frame(
    remainder: Duration,
    elapsed: Duration,
    frame_interval: Duration,
    max_frame_skip: u32,
) -> FramePlan {
    let mut remainder = remainder.saturating_add(elapsed);

    if remainder >= frame_interval.saturating_mul(STALL_THRESHOLD_FRAMES) {
        return FramePlan {
            steps: 0,
            sleep: Duration::ZERO,
            dropped_backlog: remainder,
            remainder: Duration::ZERO,
        };
    }

    if remainder < frame_interval {
        let sleep = frame_interval - remainder;
        return FramePlan {
            steps: 0,
            sleep,
            dropped_backlog: Duration::ZERO,
            remainder: remainder + sleep,
        };
    }

    let mut steps = 0u32;
    while remainder >= frame_interval && steps < max_frame_skip {
        remainder -= frame_interval;
        steps += 1;
    }

    FramePlan {
        steps,
        sleep: Duration::ZERO,
        dropped_backlog: Duration::ZERO,
        remainder,
    }
}

fn normalize_positive(value: f32, fallback: f32, field: &'static str) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        warn!(field, value, fallback, "invalid scheduler value; using fallback");
        fallback
    }
}
