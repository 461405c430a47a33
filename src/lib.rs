//! Dragon Dash - simulation core for a side-scrolling endless runner
//!
//! Core modules:
//! - `sim`: Per-tick simulation (physics, spawning, collisions, run state)
//! - `session`: Ready / running / game-over state machine and input mapping
//! - `scheduler`: Fixed-step tick driver, independent of any frame primitive
//! - `persistence`: Key-value store seam for best scores
//! - `tuning`: Data-driven game balance

pub mod feedback;
pub mod highscores;
pub mod persistence;
pub mod scheduler;
pub mod session;
pub mod sim;
pub mod tuning;

pub use feedback::{Feedback, FeedbackSink};
pub use highscores::PersonalBest;
pub use scheduler::{FixedStepScheduler, SchedulerHandle, TickControl};
pub use session::{Session, SessionError, SessionPhase};
pub use tuning::{Tuning, Viewport};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Maximum jump charges (ground jump + one air jump)
    pub const MAX_JUMPS: u8 = 2;

    /// Dragon sprite size (square, pixels)
    pub const DRAGON_SIZE: f32 = 44.0;
    /// Ring sprite size (visual only, hitbox is larger)
    pub const RING_SIZE: f32 = 24.0;

    /// Ground line as a fraction of viewport height
    pub const GROUND_PERCENT: f32 = 0.78;
    /// Dragon horizontal position as a fraction of viewport width
    pub const DRAGON_X_PERCENT: f32 = 0.15;

    /// Topmost allowed dragon centre
    pub const CEILING_MARGIN: f32 = 20.0;

    /// Entities left of these are pruned
    pub const OBSTACLE_PRUNE_X: f32 = -100.0;
    pub const RING_PRUNE_X: f32 = -60.0;
}
