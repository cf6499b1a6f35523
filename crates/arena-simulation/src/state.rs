use arena_mechanics::{
    ActionCosts, Actor, Outcome, OutcomeCategory, SampleContext, Side, apply_outcome,
};
use serde::{Deserialize, Serialize};

use crate::clock::MatchClock;
use crate::config::{RoundRecovery, Scoring};
use crate::error::{SimError, SimResult};

/// Lifecycle of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Created but not started.
    Pending,
    /// Actions are being simulated.
    Active,
    /// Between rounds; the next tick applies recovery.
    RoundBreak,
    /// A result has been reached. No further mutation is allowed.
    Finished,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Active => write!(f, "active"),
            Self::RoundBreak => write!(f, "between rounds"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

/// How a finished match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishMethod {
    /// An actor's health reached zero.
    Knockout,
    /// An actor reached the score target (or counted down to exactly zero).
    ScoreThreshold,
    /// The clock ran out and the decision rule picked a winner.
    Decision,
    /// The clock ran out with an exact tie and draws are allowed.
    Draw,
    /// The match was stopped before a result.
    Aborted,
}

impl FinishMethod {
    /// Returns true for methods that always produce a winner.
    pub fn has_winner(self) -> bool {
        !matches!(self, Self::Draw | Self::Aborted)
    }
}

impl std::fmt::Display for FinishMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Knockout => write!(f, "knockout"),
            Self::ScoreThreshold => write!(f, "score"),
            Self::Decision => write!(f, "decision"),
            Self::Draw => write!(f, "draw"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

/// Aggregated per-actor statistics, derived from the outcome log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorStats {
    /// Actions taken.
    pub actions: u32,
    /// Strike, grapple and score attempts.
    pub attempts: u32,
    /// Successful strikes, grapples and scores.
    pub landed: u32,
    /// Health removed from the opponent.
    pub damage_dealt: u32,
    /// Critical successes.
    pub criticals: u32,
    /// Penalty cards received.
    pub cards: u32,
    /// Busted point attempts.
    pub busts: u32,
    /// Self-inflicted injuries.
    pub injuries: u32,
}

impl ActorStats {
    /// Fraction of attempts that landed (0.0 when nothing was attempted).
    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        f64::from(self.landed) / f64::from(self.attempts)
    }
}

/// The complete, serializable state of one match.
///
/// Owned and mutated by a single [`crate::MatchController`]. Once the
/// status is [`MatchStatus::Finished`] every mutating call fails with
/// [`SimError::MatchAlreadyFinished`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    actors: [Actor; 2],
    clock: MatchClock,
    log: Vec<Outcome>,
    status: MatchStatus,
    winner: Option<Side>,
    method: Option<FinishMethod>,
    guarding: [bool; 2],
    next_side: Side,
}

impl MatchState {
    /// Create a pending match between two actors.
    pub fn new(a: Actor, b: Actor, clock: MatchClock) -> Self {
        Self {
            actors: [a, b],
            clock,
            log: Vec::new(),
            status: MatchStatus::Pending,
            winner: None,
            method: None,
            guarding: [false, false],
            next_side: Side::A,
        }
    }

    /// Both actors, in listing order.
    pub fn actors(&self) -> &[Actor; 2] {
        &self.actors
    }

    /// The actor on one side.
    pub fn actor(&self, side: Side) -> &Actor {
        &self.actors[side.index()]
    }

    /// The match clock.
    pub fn clock(&self) -> &MatchClock {
        &self.clock
    }

    /// Current round (1-based).
    pub fn round(&self) -> u32 {
        self.clock.round()
    }

    /// Every applied outcome, oldest first.
    pub fn log(&self) -> &[Outcome] {
        &self.log
    }

    /// Current lifecycle status.
    pub fn status(&self) -> MatchStatus {
        self.status
    }

    /// Returns true once a result has been reached.
    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    /// The winning side, once finished with a winner.
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// How the match ended, once finished.
    pub fn method(&self) -> Option<FinishMethod> {
        self.method
    }

    /// Whether the actor on `side` is currently guarding.
    pub fn is_guarding(&self, side: Side) -> bool {
        self.guarding[side.index()]
    }

    /// The side due to act next under alternating turn order.
    pub fn next_side(&self) -> Side {
        self.next_side
    }

    /// Situational modifiers for `side` acting now.
    pub fn sample_context(&self, side: Side, scoring: &Scoring) -> SampleContext {
        SampleContext {
            modifier: 0.0,
            opponent_guarding: self.is_guarding(side.opponent()),
            remaining: scoring.remaining(self.actor(side).score),
        }
    }

    /// Move from pending to active, restoring both actors to full resources.
    pub fn begin(&mut self) -> SimResult<()> {
        match self.status {
            MatchStatus::Pending => {
                for actor in &mut self.actors {
                    actor.reset_for_match();
                }
                self.status = MatchStatus::Active;
                Ok(())
            }
            MatchStatus::Finished => Err(SimError::MatchAlreadyFinished),
            status => Err(SimError::InvalidTransition {
                action: "start",
                status,
            }),
        }
    }

    /// Apply one sampled outcome, record it, and update guards and turn order.
    pub fn apply_outcome(&mut self, outcome: &Outcome, costs: &ActionCosts) -> SimResult<()> {
        self.ensure_active("apply an outcome")?;

        apply_outcome(&mut self.actors, outcome, costs);

        // Acting consumes the opponent's guard; a successful defend raises our own.
        self.guarding[outcome.actor.opponent().index()] = false;
        if outcome.category == OutcomeCategory::Defend && outcome.success {
            self.guarding[outcome.actor.index()] = true;
        }
        self.next_side = outcome.actor.opponent();
        self.log.push(*outcome);
        Ok(())
    }

    /// The knockout or score result implied by the current actors, if any.
    pub fn decisive_result(&self, scoring: &Scoring) -> Option<(Side, FinishMethod)> {
        let down = Side::both().map(|s| self.actor(s).is_down());
        let loser = match down {
            // Both at zero: whoever took the last blow loses (the injured actor for injuries).
            [true, true] => Some(self.log.last().map_or(Side::B, |o| o.target)),
            [true, false] => Some(Side::A),
            [false, true] => Some(Side::B),
            [false, false] => None,
        };
        if let Some(loser) = loser {
            return Some((loser.opponent(), FinishMethod::Knockout));
        }
        Side::both()
            .into_iter()
            .find(|s| scoring.is_reached(self.actor(*s).score))
            .map(|s| (s, FinishMethod::ScoreThreshold))
    }

    /// Aggregate statistics for one side from the outcome log.
    pub fn stats(&self, side: Side) -> ActorStats {
        let mut stats = ActorStats::default();
        for outcome in self.log.iter().filter(|o| o.actor == side) {
            stats.actions += 1;
            match outcome.category {
                OutcomeCategory::Strike | OutcomeCategory::Grapple => {
                    stats.attempts += 1;
                    if outcome.success {
                        stats.landed += 1;
                        stats.damage_dealt = stats.damage_dealt.saturating_add(outcome.magnitude);
                    }
                }
                OutcomeCategory::Score => {
                    stats.attempts += 1;
                    if outcome.success {
                        stats.landed += 1;
                    }
                }
                OutcomeCategory::Miss => {
                    stats.attempts += 1;
                    stats.busts += 1;
                }
                OutcomeCategory::Card => stats.cards += 1,
                OutcomeCategory::Injury => stats.injuries += 1,
                OutcomeCategory::Defend | OutcomeCategory::Rest => {}
            }
            if outcome.critical {
                stats.criticals += 1;
            }
        }
        stats
    }

    pub(crate) fn advance_clock(&mut self) -> u64 {
        self.clock.advance()
    }

    pub(crate) fn set_next_side(&mut self, side: Side) {
        self.next_side = side;
    }

    pub(crate) fn enter_round_break(&mut self) -> SimResult<()> {
        self.ensure_active("end the round")?;
        self.status = MatchStatus::RoundBreak;
        Ok(())
    }

    /// Apply between-round recovery and start the next round.
    pub(crate) fn start_next_round(&mut self, recovery: &RoundRecovery) -> SimResult<u32> {
        match self.status {
            MatchStatus::RoundBreak => {}
            MatchStatus::Finished => return Err(SimError::MatchAlreadyFinished),
            status => {
                return Err(SimError::InvalidTransition {
                    action: "start the next round",
                    status,
                });
            }
        }
        for actor in &mut self.actors {
            actor.stamina.restore_fraction(recovery.stamina_fraction);
            actor.health.restore_fraction(recovery.health_fraction);
        }
        self.guarding = [false, false];
        self.next_side = Side::A;
        self.status = MatchStatus::Active;
        Ok(self.clock.next_round())
    }

    pub(crate) fn finish(&mut self, method: FinishMethod, winner: Option<Side>) -> SimResult<()> {
        if self.is_finished() {
            return Err(SimError::MatchAlreadyFinished);
        }
        self.status = MatchStatus::Finished;
        self.method = Some(method);
        self.winner = winner;
        Ok(())
    }

    fn ensure_active(&self, action: &'static str) -> SimResult<()> {
        match self.status {
            MatchStatus::Active => Ok(()),
            MatchStatus::Finished => Err(SimError::MatchAlreadyFinished),
            MatchStatus::Pending => Err(SimError::NotStarted),
            status @ MatchStatus::RoundBreak => {
                Err(SimError::InvalidTransition { action, status })
            }
        }
    }
}
