//! Player feedback cues (haptics, sound)
//!
//! The simulation only says *what* happened; a platform layer decides how it
//! feels. Cues are advisory: nothing is returned and nothing depends on them.

use crate::sim::GameEvent;

/// Feedback cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// Jump charge spent
    Jump,
    /// Ring collected
    RingPickup,
    /// Run ended against an obstacle
    Crash,
    /// New run started from the game-over screen
    Retry,
}

impl Feedback {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jumped { .. } => Some(Feedback::Jump),
            GameEvent::RingCollected { .. } => Some(Feedback::RingPickup),
            GameEvent::Crashed { .. } => Some(Feedback::Crash),
            GameEvent::Landed | GameEvent::ThemeChanged(_) => None,
        }
    }
}

/// Receiver for feedback cues
pub trait FeedbackSink {
    fn emit(&mut self, cue: Feedback);
}

/// Discards every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFeedback;

impl FeedbackSink for NoFeedback {
    fn emit(&mut self, _cue: Feedback) {}
}

/// Writes cues to the log (useful headless)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFeedback;

impl FeedbackSink for LogFeedback {
    fn emit(&mut self, cue: Feedback) {
        log::trace!("feedback: {:?}", cue);
    }
}

/// Records cues in order
impl FeedbackSink for Vec<Feedback> {
    fn emit(&mut self, cue: Feedback) {
        self.push(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::RingKind;

    #[test]
    fn test_event_mapping() {
        assert_eq!(Feedback::for_event(&GameEvent::Jumped { air: true }), Some(Feedback::Jump));
        assert_eq!(
            Feedback::for_event(&GameEvent::RingCollected { id: 1, kind: RingKind::Chaos }),
            Some(Feedback::RingPickup)
        );
        assert_eq!(
            Feedback::for_event(&GameEvent::Crashed { obstacle_id: 4 }),
            Some(Feedback::Crash)
        );
        assert_eq!(Feedback::for_event(&GameEvent::Landed), None);
    }
}
