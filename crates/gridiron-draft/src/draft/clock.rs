// Draft phase and the per-pick countdown.

use serde::{Deserialize, Serialize};

/// Default seconds on the clock for each pick.
pub const DEFAULT_PICK_SECONDS: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftPhase {
    NotStarted,
    Active,
    Paused,
    Complete,
}

impl DraftPhase {
    pub fn label(&self) -> &'static str {
        match self {
            DraftPhase::NotStarted => "not started",
            DraftPhase::Active => "active",
            DraftPhase::Paused => "paused",
            DraftPhase::Complete => "complete",
        }
    }
}

/// Countdown for the pick on the clock. Pausing the draft simply stops
/// ticking; the remaining time is kept as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickClock {
    pub seconds_per_pick: u32,
    pub remaining: u32,
}

impl PickClock {
    pub fn new(seconds_per_pick: u32) -> Self {
        PickClock {
            seconds_per_pick,
            remaining: seconds_per_pick,
        }
    }

    pub fn reset(&mut self) {
        self.remaining = self.seconds_per_pick;
    }

    /// Count down one second. Returns `true` when time has run out.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }

    pub fn expired(&self) -> bool {
        self.remaining == 0
    }
}

impl Default for PickClock {
    fn default() -> Self {
        PickClock::new(DEFAULT_PICK_SECONDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_down_to_expiry() {
        let mut clock = PickClock::new(3);
        assert!(!clock.tick());
        assert!(!clock.tick());
        assert!(clock.tick());
        assert!(clock.expired());
        // Further ticks stay at zero.
        assert!(clock.tick());
        assert_eq!(clock.remaining, 0);
    }

    #[test]
    fn reset_restores_full_time() {
        let mut clock = PickClock::new(30);
        clock.tick();
        clock.tick();
        assert_eq!(clock.remaining, 28);
        clock.reset();
        assert_eq!(clock.remaining, 30);
    }

    #[test]
    fn phase_serializes_snake_case() {
        let json = serde_json::to_string(&DraftPhase::NotStarted).unwrap();
        assert_eq!(json, "\"not_started\"");
    }
}
