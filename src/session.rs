//! Session state machine
//!
//! Owns the live run, maps raw press/release input onto it and settles the
//! personal best when a run ends. Input methods only record intent; the run
//! itself changes exclusively inside `step`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::feedback::{Feedback, FeedbackSink, NoFeedback};
use crate::consts::MAX_JUMPS;
use crate::highscores::{PersonalBest, RecordOutcome};
use crate::persistence::KeyValueStore;
use crate::scheduler::TickControl;
use crate::sim::{RunState, Snapshot, TickInput, TickOutcome, tick};
use crate::tuning::Tuning;

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for the first press
    Ready,
    Running,
    /// Run ended; only retry leaves this phase
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot {action} while {phase:?}")]
    InvalidTransition {
        action: &'static str,
        phase: SessionPhase,
    },
}

/// One player's session: a sequence of runs sharing a best score
pub struct Session<S: KeyValueStore, F: FeedbackSink = NoFeedback> {
    tuning: Tuning,
    run: RunState,
    phase: SessionPhase,
    /// Glide held since the last press
    hold: bool,
    /// Taps not yet turned into jumps; one is applied per tick
    pending_jumps: u8,
    best: PersonalBest,
    /// Records broken by the last finished run
    record: RecordOutcome,
    store: S,
    feedback: F,
    /// Source of per-run seeds
    seeds: Pcg32,
    runs_started: u32,
}

impl<S: KeyValueStore, F: FeedbackSink> Session<S, F> {
    /// Session with runs seeded from OS entropy
    pub fn new(tuning: Tuning, store: S, feedback: F) -> Self {
        Self::build(tuning, store, feedback, Pcg32::from_rng(&mut rand::rng()))
    }

    /// Session whose run sequence is reproducible from `seed`
    pub fn with_seed(tuning: Tuning, store: S, feedback: F, seed: u64) -> Self {
        Self::build(tuning, store, feedback, Pcg32::seed_from_u64(seed))
    }

    fn build(tuning: Tuning, store: S, feedback: F, mut seeds: Pcg32) -> Self {
        let best = PersonalBest::load(&store);
        let run = RunState::new(seeds.random(), &tuning);
        Self {
            tuning,
            run,
            phase: SessionPhase::Ready,
            hold: false,
            pending_jumps: 0,
            best,
            record: RecordOutcome::default(),
            store,
            feedback,
            seeds,
            runs_started: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn best(&self) -> PersonalBest {
        self.best
    }

    /// Did the last finished run set a new best score
    pub fn is_new_best(&self) -> bool {
        self.record.new_best_score
    }

    /// Did the last finished run collect more rings than any before it
    pub fn is_new_best_rings(&self) -> bool {
        self.record.new_best_rings
    }

    pub fn runs_started(&self) -> u32 {
        self.runs_started
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.run, &self.tuning)
    }

    /// Start the first run
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Ready {
            return Err(SessionError::InvalidTransition {
                action: "start",
                phase: self.phase,
            });
        }
        self.begin_run();
        Ok(())
    }

    /// Start a fresh run after game over
    pub fn retry(&mut self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::GameOver {
            return Err(SessionError::InvalidTransition {
                action: "retry",
                phase: self.phase,
            });
        }
        self.feedback.emit(Feedback::Retry);
        self.begin_run();
        Ok(())
    }

    /// Press began: starts the run when ready, otherwise jumps and glides
    pub fn press_start(&mut self) {
        match self.phase {
            SessionPhase::Ready => self.begin_run(),
            SessionPhase::Running => {
                self.pending_jumps = (self.pending_jumps + 1).min(MAX_JUMPS);
            }
            SessionPhase::GameOver => {}
        }
        self.hold = true;
    }

    /// Press released: ends the glide
    pub fn press_end(&mut self) {
        self.hold = false;
    }

    /// Advance the live run by one tick
    pub fn step(&mut self) -> TickOutcome {
        if self.phase != SessionPhase::Running {
            return TickOutcome::Idle;
        }

        let input = TickInput {
            jump: self.pending_jumps > 0,
            hold: self.hold,
        };
        self.pending_jumps = self.pending_jumps.saturating_sub(1);

        let outcome = tick(&mut self.run, &input, &self.tuning);
        for event in self.run.drain_events() {
            if let Some(cue) = Feedback::for_event(&event) {
                self.feedback.emit(cue);
            }
        }
        if outcome == TickOutcome::GameOver {
            self.finish_run();
        }
        outcome
    }

    /// `step` shaped for `FixedStepScheduler::on_tick`
    pub fn step_control(&mut self) -> TickControl {
        match self.step() {
            TickOutcome::Continue => TickControl::Continue,
            TickOutcome::Idle | TickOutcome::GameOver => TickControl::Stop,
        }
    }

    fn begin_run(&mut self) {
        let seed = self.seeds.random();
        self.run = RunState::new(seed, &self.tuning);
        self.run.is_running = true;
        self.phase = SessionPhase::Running;
        self.hold = false;
        self.pending_jumps = 0;
        self.record = RecordOutcome::default();
        self.runs_started += 1;
        log::info!("Run {} started (seed {})", self.runs_started, seed);
    }

    fn finish_run(&mut self) {
        self.phase = SessionPhase::GameOver;
        let score = self.run.score;
        let rings = self.run.rings_collected;
        self.record = self.best.record(score, rings, &mut self.store);
        log::info!(
            "Game over: score {}, rings {}, best {}{}",
            score,
            rings,
            self.best.score,
            if self.record.new_best_score { " (new best!)" } else { "" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HIGH_SCORE_KEY;
    use crate::persistence::{MemoryStore, StoreError};
    use crate::sim::Obstacle;

    type TestSession = Session<MemoryStore, Vec<Feedback>>;

    fn session_with(store: MemoryStore) -> TestSession {
        Session::with_seed(Tuning::default(), store, Vec::new(), 1234)
    }

    /// Put a wall on the dragon so the next step crashes
    fn place_wall(session: &mut TestSession) {
        let player_x = session.tuning.viewport.player_x();
        let ground_y = session.tuning.viewport.ground_y();
        let speed = session.run.speed;
        let id = session.run.next_entity_id();
        session.run.obstacles.push(Obstacle {
            id,
            x: player_x - 40.0 + speed,
            y: 0.0,
            width: 80.0,
            height: ground_y,
            from_ceiling: true,
        });
    }

    fn run_until_score(session: &mut TestSession, score: u64) {
        while session.run.score < score {
            // Keep the field clear so only the planted wall can end the run
            session.run.obstacles.clear();
            assert_eq!(session.step(), TickOutcome::Continue);
        }
    }

    #[test]
    fn test_starts_ready() {
        let session = session_with(MemoryStore::new());
        assert_eq!(session.phase(), SessionPhase::Ready);
        assert!(!session.run().is_running);
        assert_eq!(session.best(), PersonalBest::default());
    }

    #[test]
    fn test_step_while_ready_is_idle() {
        let mut session = session_with(MemoryStore::new());
        assert_eq!(session.step(), TickOutcome::Idle);
        assert_eq!(session.run().time_ticks, 0);
    }

    #[test]
    fn test_press_starts_then_jumps() {
        let mut session = session_with(MemoryStore::new());
        session.press_start();
        assert_eq!(session.phase(), SessionPhase::Running);
        assert!(session.run().is_running);
        // The starting press does not also jump
        session.step();
        assert!(session.run().player.on_ground);
        session.press_end();

        session.press_start();
        // Recorded only; applied on the next tick
        assert_eq!(session.run().player.jumps_remaining, 2);
        session.step();
        assert_eq!(session.run().player.jumps_remaining, 1);
        assert!(!session.run().player.on_ground);
        assert_eq!(session.feedback(), &vec![Feedback::Jump]);

        // Jump request is one-shot, hold is sustained
        session.step();
        assert_eq!(session.run().player.jumps_remaining, 1);
        assert!(session.run().player.gliding);
        session.press_end();
        session.step();
        assert!(!session.run().player.gliding);
    }

    #[test]
    fn test_two_taps_between_ticks_spend_both_jumps() {
        let mut session = session_with(MemoryStore::new());
        session.start().unwrap();
        session.step();
        assert!(session.run().player.on_ground);

        for _ in 0..3 {
            session.press_start();
            session.press_end();
        }
        session.step();
        assert_eq!(session.run().player.jumps_remaining, 1);
        session.step();
        assert_eq!(session.run().player.jumps_remaining, 0);
        assert_eq!(session.feedback(), &vec![Feedback::Jump, Feedback::Jump]);

        // The third tap had no charge to buffer against
        session.step();
        assert_eq!(session.feedback().len(), 2);
    }

    #[test]
    fn test_ring_record_reported() {
        let mut session = session_with(MemoryStore::new());
        session.start().unwrap();
        run_until_score(&mut session, 2);
        session.run.rings_collected = 3;
        place_wall(&mut session);
        assert_eq!(session.step(), TickOutcome::GameOver);
        assert!(session.is_new_best_rings());
        assert_eq!(session.best().rings, 3);

        session.retry().unwrap();
        assert!(!session.is_new_best_rings());
    }

    #[test]
    fn test_invalid_transitions() {
        let mut session = session_with(MemoryStore::new());
        assert_eq!(
            session.retry(),
            Err(SessionError::InvalidTransition {
                action: "retry",
                phase: SessionPhase::Ready
            })
        );
        session.start().unwrap();
        assert!(session.start().is_err());
        assert!(session.retry().is_err());
        assert_eq!(session.runs_started(), 1);
    }

    #[test]
    fn test_crash_sets_new_best_once() {
        let mut session = session_with(MemoryStore::new());
        session.start().unwrap();
        run_until_score(&mut session, 5);
        place_wall(&mut session);
        assert_eq!(session.step(), TickOutcome::GameOver);

        assert_eq!(session.phase(), SessionPhase::GameOver);
        assert!(session.is_new_best());
        let final_score = session.run().score;
        assert_eq!(session.best().score, final_score);
        assert_eq!(
            session.store().get(HIGH_SCORE_KEY).unwrap(),
            Some(final_score.to_string())
        );
        assert_eq!(session.feedback().last(), Some(&Feedback::Crash));

        // Frozen, flag not re-raised
        assert_eq!(session.step(), TickOutcome::Idle);
        assert!(session.is_new_best());
        assert_eq!(session.run().score, final_score);

        // Presses on the game-over screen do nothing to the run
        session.press_start();
        assert_eq!(session.phase(), SessionPhase::GameOver);
        session.press_end();
    }

    #[test]
    fn test_crash_below_best_keeps_record() {
        let mut store = MemoryStore::new();
        store.set(HIGH_SCORE_KEY, "1000").unwrap();
        let mut session = session_with(store);
        assert_eq!(session.best().score, 1000);

        session.start().unwrap();
        run_until_score(&mut session, 3);
        place_wall(&mut session);
        session.step();

        assert_eq!(session.phase(), SessionPhase::GameOver);
        assert!(!session.is_new_best());
        assert_eq!(session.best().score, 1000);
        assert_eq!(session.store().get(HIGH_SCORE_KEY).unwrap().as_deref(), Some("1000"));
    }

    #[test]
    fn test_retry_builds_fresh_run() {
        let mut session = session_with(MemoryStore::new());
        session.start().unwrap();
        run_until_score(&mut session, 2);
        let first_seed = session.run().seed;
        place_wall(&mut session);
        session.step();
        assert!(session.is_new_best());

        session.retry().unwrap();
        assert_eq!(session.phase(), SessionPhase::Running);
        assert!(!session.is_new_best());
        let run = session.run();
        assert_eq!(run.score, 0);
        assert_eq!(run.distance, 0.0);
        assert!(run.obstacles.is_empty());
        assert!(run.is_running && !run.is_game_over);
        assert_eq!(run.peek_next_id(), 0);
        assert_ne!(run.seed, first_seed);
        assert_eq!(session.feedback().last(), Some(&Feedback::Retry));
        assert_eq!(session.runs_started(), 2);
    }

    #[test]
    fn test_same_seed_same_runs() {
        let mut a = session_with(MemoryStore::new());
        let mut b = session_with(MemoryStore::new());
        a.start().unwrap();
        b.start().unwrap();
        assert_eq!(a.run().seed, b.run().seed);
        for _ in 0..300 {
            a.step();
            b.step();
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_broken_store_does_not_stop_play() {
        struct BrokenStore;
        impl KeyValueStore for BrokenStore {
            fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
                Err(StoreError::Unavailable)
            }
            fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
                Err(StoreError::Unavailable)
            }
        }

        let mut session = Session::with_seed(Tuning::default(), BrokenStore, NoFeedback, 5);
        session.start().unwrap();
        for _ in 0..50 {
            session.run.obstacles.clear();
            session.step();
        }
        let speed = session.run.speed;
        let player_x = session.tuning.viewport.player_x();
        let id = session.run.next_entity_id();
        session.run.obstacles.push(Obstacle {
            id,
            x: player_x - 40.0 + speed,
            y: 0.0,
            width: 80.0,
            height: session.tuning.viewport.ground_y(),
            from_ceiling: true,
        });
        assert_eq!(session.step(), TickOutcome::GameOver);
        assert!(session.is_new_best());
        session.retry().unwrap();
        assert_eq!(session.step(), TickOutcome::Continue);
    }

    #[test]
    fn test_step_control_maps_outcomes() {
        let mut session = session_with(MemoryStore::new());
        assert_eq!(session.step_control(), TickControl::Stop);
        session.start().unwrap();
        assert_eq!(session.step_control(), TickControl::Continue);
    }
}
