use arena_mechanics::{ActionCosts, ActionWeights, Sampler, SamplerConfig};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// How points end a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scoring {
    /// Points never end the match; only knockouts and the clock do.
    #[default]
    None,
    /// The first actor to reach this many points wins.
    FirstTo(u32),
    /// Each actor counts down from this total; reaching exactly zero wins.
    Countdown(u32),
}

impl Scoring {
    /// Points an actor with `score` still needs under countdown scoring.
    pub fn remaining(&self, score: u32) -> Option<u32> {
        match self {
            Self::Countdown(total) => Some(total.saturating_sub(score)),
            Self::None | Self::FirstTo(_) => None,
        }
    }

    /// Returns true if `score` ends the match.
    pub fn is_reached(&self, score: u32) -> bool {
        match self {
            Self::None => false,
            Self::FirstTo(target) | Self::Countdown(target) => score >= *target,
        }
    }
}

/// Who acts on each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOrder {
    /// Sides take turns, starting with side A.
    #[default]
    Alternating,
    /// Each tick, side A acts with probability `speed_a / (speed_a + speed_b)`.
    Speed,
}

/// How a match that runs out of time is decided.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionRule {
    /// Weighted sum of health and stamina ratios.
    Composite {
        /// Weight of the remaining health ratio.
        health_weight: f64,
        /// Weight of the remaining stamina ratio.
        stamina_weight: f64,
    },
    /// Higher raw score wins.
    Score,
}

impl Default for DecisionRule {
    fn default() -> Self {
        Self::Composite {
            health_weight: 0.6,
            stamina_weight: 0.4,
        }
    }
}

/// Recovery applied to both actors between rounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundRecovery {
    /// Fraction of max stamina restored.
    pub stamina_fraction: f64,
    /// Fraction of max health restored.
    pub health_fraction: f64,
}

impl Default for RoundRecovery {
    fn default() -> Self {
        Self {
            stamina_fraction: 0.3,
            health_fraction: 0.0,
        }
    }
}

/// Configuration for a match.
///
/// Every field has a default, so a JSON file only needs to name the
/// values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// RNG seed for deterministic matches.
    pub seed: u64,
    /// Number of rounds before the match goes to a decision.
    pub max_rounds: u32,
    /// Actions per round.
    pub actions_per_round: u32,
    /// Simulated seconds each action takes.
    pub seconds_per_action: f64,
    /// How points end the match.
    pub scoring: Scoring,
    /// Who acts on each tick.
    pub turn_order: TurnOrder,
    /// How a timed-out match is decided.
    pub decision: DecisionRule,
    /// Whether an exact tie at the decision is recorded as a draw.
    pub allow_draws: bool,
    /// Recovery between rounds.
    pub recovery: RoundRecovery,
    /// Sampling constants.
    pub sampler: SamplerConfig,
    /// Action selection weights.
    pub weights: ActionWeights,
    /// Stamina costs.
    pub costs: ActionCosts,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_rounds: 3,
            actions_per_round: 40,
            seconds_per_action: 4.5,
            scoring: Scoring::None,
            turn_order: TurnOrder::Alternating,
            decision: DecisionRule::default(),
            allow_draws: false,
            recovery: RoundRecovery::default(),
            sampler: SamplerConfig::default(),
            weights: ActionWeights::default(),
            costs: ActionCosts::default(),
            max_events: 0,
        }
    }
}

impl MatchConfig {
    /// Parse a config from JSON and validate it.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SimError::InvalidConfiguration(format!("malformed config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of rounds.
    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Set the number of actions per round.
    pub fn with_actions_per_round(mut self, actions: u32) -> Self {
        self.actions_per_round = actions;
        self
    }

    /// Set the simulated duration of one action.
    pub fn with_seconds_per_action(mut self, seconds: f64) -> Self {
        self.seconds_per_action = seconds;
        self
    }

    /// Set the scoring rule.
    pub fn with_scoring(mut self, scoring: Scoring) -> Self {
        self.scoring = scoring;
        self
    }

    /// Set the turn order.
    pub fn with_turn_order(mut self, order: TurnOrder) -> Self {
        self.turn_order = order;
        self
    }

    /// Set the decision rule.
    pub fn with_decision(mut self, decision: DecisionRule) -> Self {
        self.decision = decision;
        self
    }

    /// Allow or forbid draws at the decision.
    pub fn with_draws(mut self, allow: bool) -> Self {
        self.allow_draws = allow;
        self
    }

    /// Set the recovery between rounds.
    pub fn with_recovery(mut self, recovery: RoundRecovery) -> Self {
        self.recovery = recovery;
        self
    }

    /// Set the sampling constants.
    pub fn with_sampler(mut self, sampler: SamplerConfig) -> Self {
        self.sampler = sampler;
        self
    }

    /// Set the action weights.
    pub fn with_weights(mut self, weights: ActionWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set the stamina costs.
    pub fn with_costs(mut self, costs: ActionCosts) -> Self {
        self.costs = costs;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Reject configurations that could not produce a well-formed match.
    pub fn validate(&self) -> SimResult<()> {
        if self.max_rounds == 0 {
            return Err(invalid("max_rounds must be at least 1"));
        }
        if self.actions_per_round == 0 {
            return Err(invalid("actions_per_round must be at least 1"));
        }
        if !self.seconds_per_action.is_finite() || self.seconds_per_action < 0.0 {
            return Err(invalid("seconds_per_action must be a non-negative number"));
        }
        match self.scoring {
            Scoring::FirstTo(0) | Scoring::Countdown(0) => {
                return Err(invalid("scoring target must be positive"));
            }
            Scoring::None | Scoring::FirstTo(_) | Scoring::Countdown(_) => {}
        }
        if let DecisionRule::Composite {
            health_weight,
            stamina_weight,
        } = self.decision
        {
            let valid = |w: f64| w.is_finite() && w >= 0.0;
            if !valid(health_weight) || !valid(stamina_weight) {
                return Err(invalid("decision weights must be non-negative numbers"));
            }
            if health_weight + stamina_weight == 0.0 {
                return Err(invalid("decision weights cannot both be zero"));
            }
        }
        let unit = |v: f64| (0.0..=1.0).contains(&v);
        if !unit(self.recovery.stamina_fraction) || !unit(self.recovery.health_fraction) {
            return Err(invalid("recovery fractions must lie within [0, 1]"));
        }
        let ratio = |v: f64| v.is_finite() && v >= 0.0;
        if !ratio(self.costs.stamina_damage_ratio) || !ratio(self.costs.grapple_stamina_ratio) {
            return Err(invalid("stamina drain ratios must be non-negative numbers"));
        }
        self.sampler.validate()?;
        self.weights.validate()?;
        Ok(())
    }

    /// Build the sampler described by this config.
    pub fn build_sampler(&self) -> SimResult<Sampler> {
        Ok(Sampler::new(self.sampler.clone(), self.weights.clone())?)
    }

    /// Total actions before the clock runs out.
    pub fn total_actions(&self) -> u64 {
        u64::from(self.max_rounds) * u64::from(self.actions_per_round)
    }
}

fn invalid(message: &str) -> SimError {
    SimError::InvalidConfiguration(message.to_string())
}
