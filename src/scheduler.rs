//! Fixed-step tick scheduling
//!
//! The simulation never asks for frames itself. A platform frame callback
//! (requestAnimationFrame, a vsync'd loop, a test harness) calls `advance`
//! with the elapsed time, and the scheduler runs whole ticks against the
//! target it is handed by `&mut`.

use std::cell::Cell;
use std::rc::Rc;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame we try to catch up on (seconds)
const MAX_FRAME_DT: f32 = 0.1;
/// Slack for accumulated float error when comparing against `dt`
const DT_EPSILON: f32 = 1.0e-6;

/// What the tick callback wants next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    /// Stop scheduling until `start` is called again
    Stop,
}

/// Cancels a scheduler from outside the tick loop (teardown, navigation)
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    active: Rc<Cell<bool>>,
}

impl SchedulerHandle {
    pub fn stop(&self) {
        self.active.set(false);
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

type TickFn<T> = Box<dyn FnMut(&mut T) -> TickControl>;

/// Runs a registered tick callback at a fixed rate
pub struct FixedStepScheduler<T> {
    dt: f32,
    max_substeps: u32,
    accumulator: f32,
    active: Rc<Cell<bool>>,
    on_tick: Option<TickFn<T>>,
    ticks: u64,
}

impl<T> Default for FixedStepScheduler<T> {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl<T> FixedStepScheduler<T> {
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        Self {
            dt,
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
            active: Rc::new(Cell::new(false)),
            on_tick: None,
            ticks: 0,
        }
    }

    /// Register the step function, replacing any previous one
    pub fn on_tick<F>(&mut self, step: F)
    where
        F: FnMut(&mut T) -> TickControl + 'static,
    {
        self.on_tick = Some(Box::new(step));
    }

    /// Begin (or resume) scheduling; clears any stale time backlog
    pub fn start(&mut self) {
        self.accumulator = 0.0;
        self.active.set(true);
    }

    pub fn stop(&mut self) {
        self.active.set(false);
        self.accumulator = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.active.get()
    }

    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            active: Rc::clone(&self.active),
        }
    }

    /// Total ticks run since construction
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run exactly one tick if active. Returns whether a tick ran.
    pub fn step(&mut self, target: &mut T) -> bool {
        // Liveness is re-checked on every tick: a stale schedule is a no-op
        if !self.active.get() {
            return false;
        }
        let Some(on_tick) = self.on_tick.as_mut() else {
            return false;
        };
        self.ticks += 1;
        if on_tick(target) == TickControl::Stop {
            self.stop();
        }
        true
    }

    /// Feed elapsed frame time, running as many whole ticks as fit.
    ///
    /// Returns the number of ticks run.
    pub fn advance(&mut self, frame_dt: f32, target: &mut T) -> u32 {
        if !self.active.get() {
            return 0;
        }
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator + DT_EPSILON >= self.dt && substeps < self.max_substeps {
            if !self.step(target) {
                break;
            }
            substeps += 1;
            if !self.active.get() {
                return substeps;
            }
            self.accumulator -= self.dt;
        }
        if substeps == self.max_substeps {
            // Too far behind; drop the backlog instead of spiralling
            self.accumulator = 0.0;
        }
        substeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting() -> FixedStepScheduler<u32> {
        let mut scheduler = FixedStepScheduler::default();
        scheduler.on_tick(|count: &mut u32| {
            *count += 1;
            TickControl::Continue
        });
        scheduler
    }

    #[test]
    fn test_not_started_is_noop() {
        let mut scheduler = counting();
        let mut count = 0;
        assert_eq!(scheduler.advance(1.0, &mut count), 0);
        assert!(!scheduler.step(&mut count));
        assert_eq!(count, 0);
    }

    #[test]
    fn test_one_tick_per_frame() {
        let mut scheduler = counting();
        let mut count = 0;
        scheduler.start();
        for _ in 0..10 {
            assert_eq!(scheduler.advance(SIM_DT, &mut count), 1);
        }
        assert_eq!(count, 10);
        assert_eq!(scheduler.ticks(), 10);
    }

    #[test]
    fn test_partial_frames_accumulate() {
        let mut scheduler = counting();
        let mut count = 0;
        scheduler.start();
        assert_eq!(scheduler.advance(SIM_DT * 0.5, &mut count), 0);
        assert_eq!(scheduler.advance(SIM_DT * 0.5, &mut count), 1);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_substep_cap() {
        let mut scheduler = counting();
        let mut count = 0;
        scheduler.start();
        assert_eq!(scheduler.advance(5.0, &mut count), MAX_SUBSTEPS);
        // Backlog dropped
        assert_eq!(scheduler.advance(0.0, &mut count), 0);
    }

    #[test]
    fn test_callback_can_stop() {
        let mut scheduler = FixedStepScheduler::default();
        scheduler.on_tick(|count: &mut u32| {
            *count += 1;
            if *count == 3 {
                TickControl::Stop
            } else {
                TickControl::Continue
            }
        });
        let mut count = 0;
        scheduler.start();
        for _ in 0..10 {
            scheduler.advance(SIM_DT, &mut count);
        }
        assert_eq!(count, 3);
        assert!(!scheduler.is_running());

        scheduler.start();
        scheduler.advance(SIM_DT, &mut count);
        assert_eq!(count, 4);
    }

    #[test]
    fn test_handle_cancels() {
        let mut scheduler = counting();
        let handle = scheduler.handle();
        let mut count = 0;
        scheduler.start();
        assert!(handle.is_active());
        scheduler.advance(SIM_DT, &mut count);
        handle.stop();
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.advance(SIM_DT, &mut count), 0);
        assert!(!scheduler.step(&mut count));
        assert_eq!(count, 1);
    }
}
