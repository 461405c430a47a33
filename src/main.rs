//! Dragon Dash headless runner
//!
//! Drives a session through the fixed-step scheduler with a simple autopilot
//! standing in for the player, and logs each run. Rendering and input live in
//! the platform shells; this binary exercises the core on its own.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use dragon_dash::consts::SIM_DT;
    use dragon_dash::feedback::LogFeedback;
    use dragon_dash::persistence::MemoryStore;
    use dragon_dash::sim::Snapshot;
    use dragon_dash::{FixedStepScheduler, Session, SessionPhase, Tuning};

    type HeadlessSession = Session<MemoryStore, LogFeedback>;

    /// Runs to play before exiting
    const RUNS: u32 = 3;
    /// Give up on a run after this many simulated frames (~10 minutes)
    const MAX_FRAMES_PER_RUN: u32 = 60 * 60 * 10;

    /// Autopilot: hop over ground obstacles as they come into range
    struct Autopilot {
        holding: bool,
    }

    impl Autopilot {
        fn decide(&mut self, snapshot: &Snapshot, session: &mut HeadlessSession) {
            let player = &snapshot.player;
            let threat = snapshot
                .obstacles
                .iter()
                .filter(|o| !o.from_ceiling && o.x + o.width > player.x)
                .map(|o| o.x - player.x)
                .fold(f32::INFINITY, f32::min);

            let reach = snapshot.speed * 22.0;
            if player.on_ground && threat < reach && !self.holding {
                session.press_start();
                self.holding = true;
            } else if self.holding && (player.vy > 0.0 || threat > reach) {
                session.press_end();
                self.holding = false;
            }
        }
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        log::info!("Dragon Dash (headless) starting...");

        let tuning = match std::env::var("DRAGON_DASH_TUNING") {
            Ok(path) => match std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
            {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path);
                    tuning
                }
                Err(e) => {
                    log::warn!("Using default tuning ({}): {}", path, e);
                    Tuning::default()
                }
            },
            Err(_) => Tuning::default(),
        };

        let mut session = Session::new(tuning, MemoryStore::new(), LogFeedback);
        let mut scheduler = FixedStepScheduler::default();
        scheduler.on_tick(|session: &mut HeadlessSession| session.step_control());

        let mut pilot = Autopilot { holding: false };

        for run in 1..=RUNS {
            if session.phase() == SessionPhase::Ready {
                session.press_start();
                session.press_end();
            } else if let Err(e) = session.retry() {
                log::error!("Could not start run {}: {}", run, e);
                break;
            }
            scheduler.start();

            let mut frames = 0;
            while scheduler.is_running() && frames < MAX_FRAMES_PER_RUN {
                let snapshot = session.snapshot();
                pilot.decide(&snapshot, &mut session);
                scheduler.advance(SIM_DT, &mut session);
                frames += 1;
            }
            scheduler.stop();
            pilot.holding = false;

            let snapshot = session.snapshot();
            log::info!(
                "Run {}: score {}, rings {}, distance {:.0}, world {} (best {})",
                run,
                snapshot.score,
                snapshot.rings_collected,
                snapshot.distance,
                snapshot.theme.label(),
                session.best().score
            );
            match serde_json::to_string(&snapshot) {
                Ok(json) => log::debug!("Final snapshot: {}", json),
                Err(e) => log::warn!("Could not serialize snapshot: {}", e),
            }

            if session.phase() != SessionPhase::GameOver {
                log::info!("Run {} did not end within the frame limit", run);
                break;
            }
        }
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    headless::run();
}
