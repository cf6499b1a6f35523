use serde::{Deserialize, Serialize};

/// Tracks match time: a monotonic tick counter, the current round, and
/// the actions left in it.
///
/// Each tick is one simulated action lasting `seconds_per_action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchClock {
    tick: u64,
    round: u32,
    remaining_in_round: u32,
    actions_per_round: u32,
    seconds_per_action: f64,
}

impl MatchClock {
    /// Create a clock at tick 0 of round 1.
    pub fn new(actions_per_round: u32, seconds_per_action: f64) -> Self {
        Self {
            tick: 0,
            round: 1,
            remaining_in_round: actions_per_round,
            actions_per_round,
            seconds_per_action,
        }
    }

    /// Advance the clock by one action. Returns the new tick number.
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.remaining_in_round = self.remaining_in_round.saturating_sub(1);
        self.tick
    }

    /// Start the next round with a full action budget.
    pub fn next_round(&mut self) -> u32 {
        self.round += 1;
        self.remaining_in_round = self.actions_per_round;
        self.round
    }

    /// Return the current tick number.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Return the current round (1-based).
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Actions left before the current round ends.
    pub fn remaining_in_round(&self) -> u32 {
        self.remaining_in_round
    }

    /// Returns true once the current round has no actions left.
    pub fn round_exhausted(&self) -> bool {
        self.remaining_in_round == 0
    }

    /// Total simulated seconds since the match started.
    pub fn elapsed_seconds(&self) -> f64 {
        self.tick as f64 * self.seconds_per_action
    }

    /// Simulated seconds into the current round.
    pub fn round_seconds(&self) -> f64 {
        f64::from(self.actions_per_round - self.remaining_in_round) * self.seconds_per_action
    }
}

impl std::fmt::Display for MatchClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let secs = self.round_seconds().floor() as u64;
        write!(f, "R{} {}:{:02}", self.round, secs / 60, secs % 60)
    }
}
