//! Personal best tracking
//!
//! Persisted through a `KeyValueStore` as plain decimal text under fixed
//! keys. A missing or unreadable value counts as zero.

use crate::persistence::KeyValueStore;

/// Store key for the best score
pub const HIGH_SCORE_KEY: &str = "dragon_dash_high_score";
/// Store key for the most rings collected in one run
pub const HIGH_RINGS_KEY: &str = "dragon_dash_high_rings";

/// Which records a finished run broke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordOutcome {
    pub new_best_score: bool,
    pub new_best_rings: bool,
}

/// Best score and ring count across runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PersonalBest {
    pub score: u64,
    pub rings: u32,
}

impl PersonalBest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load records; anything missing or malformed reads as zero
    pub fn load(store: &impl KeyValueStore) -> Self {
        let best = Self {
            score: read_number(store, HIGH_SCORE_KEY),
            rings: read_number(store, HIGH_RINGS_KEY),
        };
        log::info!("Loaded personal best: score {}, rings {}", best.score, best.rings);
        best
    }

    /// Check if a score beats the stored best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.score
    }

    /// Fold a finished run into the records, writing any that improved.
    ///
    /// Write failures are logged and otherwise ignored.
    pub fn record(
        &mut self,
        score: u64,
        rings: u32,
        store: &mut impl KeyValueStore,
    ) -> RecordOutcome {
        let mut outcome = RecordOutcome::default();

        if self.qualifies(score) {
            self.score = score;
            outcome.new_best_score = true;
            write_number(store, HIGH_SCORE_KEY, score);
            log::info!("New best score: {}", score);
        }
        if rings > self.rings {
            self.rings = rings;
            outcome.new_best_rings = true;
            write_number(store, HIGH_RINGS_KEY, rings as u64);
        }

        outcome
    }
}

fn read_number<T: std::str::FromStr + Default>(store: &impl KeyValueStore, key: &str) -> T {
    match store.get(key) {
        Ok(Some(text)) => text.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring unreadable value for {}: {:?}", key, text);
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            log::warn!("Could not read {}: {}", key, e);
            T::default()
        }
    }
}

fn write_number(store: &mut impl KeyValueStore, key: &str, value: u64) {
    if let Err(e) = store.set(key, &value.to_string()) {
        log::warn!("Could not save {}: {}", key, e);
    }
}
