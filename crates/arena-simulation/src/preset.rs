//! Pre-configured match rules for common sports.
//!
//! These produce the same [`MatchConfig`] a hand-written JSON file would,
//! without requiring one.

use arena_mechanics::{ActionCosts, ActionWeights, SamplerConfig};

use crate::config::{DecisionRule, MatchConfig, RoundRecovery, Scoring, TurnOrder};
use crate::error::{SimError, SimResult};

/// Names accepted by [`preset`].
pub const PRESET_NAMES: [&str; 3] = ["fencing", "darts", "mma"];

/// Look up a preset by name (case-insensitive).
pub fn preset(name: &str) -> SimResult<MatchConfig> {
    match name.trim().to_lowercase().as_str() {
        "fencing" => Ok(fencing()),
        "darts" => Ok(darts()),
        "mma" => Ok(mma()),
        other => Err(SimError::UnknownPreset(other.to_string())),
    }
}

/// Fencing bout.
///
/// First to five touches in a single timed period. Every action is a
/// touch attempt; a failed attempt occasionally draws a penalty card
/// that awards the opponent a touch. Timed-out bouts go to the higher score.
pub fn fencing() -> MatchConfig {
    MatchConfig {
        max_rounds: 1,
        actions_per_round: 60,
        seconds_per_action: 3.0,
        scoring: Scoring::FirstTo(5),
        turn_order: TurnOrder::Alternating,
        decision: DecisionRule::Score,
        sampler: SamplerConfig {
            fatigue_weight: 0.1,
            card_chance: 0.03,
            score_base: 1,
            score_range: 0,
            ..SamplerConfig::default()
        },
        weights: ActionWeights::scoring(),
        costs: ActionCosts {
            action_cost: 1,
            miss_cost: 1,
            ..ActionCosts::free()
        },
        ..MatchConfig::default()
    }
}

/// 301 darts leg.
///
/// Each action is one dart. Players count down from 301; a dart that
/// would overshoot busts, and within checkout range a hit finishes the
/// leg exactly.
pub fn darts() -> MatchConfig {
    MatchConfig {
        max_rounds: 1,
        actions_per_round: 200,
        seconds_per_action: 5.0,
        scoring: Scoring::Countdown(301),
        turn_order: TurnOrder::Alternating,
        decision: DecisionRule::Score,
        sampler: SamplerConfig {
            fatigue_weight: 0.0,
            critical_chance: 0.08,
            score_base: 5,
            score_range: 55,
            checkout_threshold: 40,
            ..SamplerConfig::default()
        },
        weights: ActionWeights::scoring(),
        costs: ActionCosts::free(),
        ..MatchConfig::default()
    }
}

/// Three-round MMA bout.
///
/// Strikes, grapples, guards and rests; faster fighters act more often.
/// A fighter at zero health is knocked out. Fighters recover 30% of their
/// stamina between rounds, and bouts that go the distance are decided on
/// remaining health and stamina.
pub fn mma() -> MatchConfig {
    MatchConfig {
        max_rounds: 3,
        actions_per_round: 40,
        seconds_per_action: 7.5,
        scoring: Scoring::None,
        turn_order: TurnOrder::Speed,
        decision: DecisionRule::Composite {
            health_weight: 0.6,
            stamina_weight: 0.4,
        },
        recovery: RoundRecovery {
            stamina_fraction: 0.3,
            health_fraction: 0.0,
        },
        sampler: SamplerConfig {
            injury_chance: 0.02,
            ..SamplerConfig::default()
        },
        weights: ActionWeights::combat(),
        costs: ActionCosts::default(),
        ..MatchConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fencing_preset() {
        let config = fencing();
        assert_eq!(config.scoring, Scoring::FirstTo(5));
        assert_eq!(config.max_rounds, 1);
        assert_eq!(config.decision, DecisionRule::Score);
        assert!(config.sampler.card_chance > 0.0);
    }

    #[test]
    fn darts_preset() {
        let config = darts();
        assert_eq!(config.scoring, Scoring::Countdown(301));
        assert_eq!(config.sampler.checkout_threshold, 40);
        assert_eq!(config.costs, ActionCosts::free());
    }

    #[test]
    fn mma_preset() {
        let config = mma();
        assert_eq!(config.max_rounds, 3);
        assert_eq!(config.turn_order, TurnOrder::Speed);
        assert!((config.recovery.stamina_fraction - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn presets_are_valid() {
        for name in PRESET_NAMES {
            let config = preset(name).unwrap();
            assert!(config.validate().is_ok(), "{name} preset is invalid");
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(preset(" MMA ").unwrap(), mma());
        assert!(matches!(preset("curling"), Err(SimError::UnknownPreset(n)) if n == "curling"));
    }
}
