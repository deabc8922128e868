//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Time (monotonic millisecond clock)
//! - Frame scheduling ("schedule next tick" / "cancel")
//! - Input (held keys sampled once per tick)
//!
//! The manual implementations share state through cheap clonable handles so a
//! test or headless driver can steer the same clock and scheduler the session
//! holds.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use crate::session::Session;
use crate::sim::TickInput;

/// Monotonic, non-decreasing time source
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by `Instant`
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock advanced by hand
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    /// Move time forward; negative steps are ignored
    pub fn advance(&self, ms: f64) {
        if ms > 0.0 {
            self.now.set(self.now.get() + ms);
        }
    }

    /// Jump to an absolute time, never backwards
    pub fn set(&self, ms: f64) {
        if ms > self.now.get() {
            self.now.set(ms);
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Port for the host's frame callback (request-animation-frame style)
pub trait FrameScheduler {
    /// Ask for one more tick
    fn schedule_next(&mut self);
    /// Drop any outstanding request
    fn cancel(&mut self);
    /// Whether a tick is outstanding
    fn is_scheduled(&self) -> bool;
}

/// Scheduler whose pending request is consumed explicitly by a driver
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    pending: Rc<Cell<bool>>,
    requests: Rc<Cell<u64>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the outstanding request, if any
    pub fn take_pending(&self) -> bool {
        self.pending.replace(false)
    }

    /// Total number of `schedule_next` calls
    pub fn requests(&self) -> u64 {
        self.requests.get()
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_next(&mut self) {
        self.pending.set(true);
        self.requests.set(self.requests.get() + 1);
    }

    fn cancel(&mut self) {
        self.pending.set(false);
    }

    fn is_scheduled(&self) -> bool {
        self.pending.get()
    }
}

/// Source of held keys, sampled once at the start of every tick
pub trait InputSource {
    fn poll(&mut self) -> TickInput;
}

/// Constant input
impl InputSource for TickInput {
    fn poll(&mut self) -> TickInput {
        *self
    }
}

/// Deterministic fixed-step host: advances a manual clock and fires the
/// session's scheduled ticks one after another
#[derive(Debug, Clone)]
pub struct FixedStepDriver {
    clock: ManualClock,
    scheduler: ManualScheduler,
    step_ms: f64,
}

impl FixedStepDriver {
    /// 60 Hz frame period
    pub const DEFAULT_STEP_MS: f64 = 1000.0 / 60.0;

    pub fn new(clock: ManualClock, scheduler: ManualScheduler, step_ms: f64) -> Self {
        Self {
            clock,
            scheduler,
            step_ms,
        }
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Run scheduled ticks until none is pending or `max_ticks` ran.
    /// Returns the number of ticks executed.
    pub fn run(&self, session: &mut Session, input: &mut dyn InputSource, max_ticks: u64) -> u64 {
        let mut ran = 0;
        while ran < max_ticks && self.scheduler.take_pending() {
            self.clock.advance(self.step_ms);
            let held = input.poll();
            session.frame(&held);
            ran += 1;
        }
        ran
    }
}
