//! Applying sampled outcomes to actor state.
//!
//! [`apply_outcome`] is the only way the engine mutates health, stamina and
//! score during a match. It is pure given its inputs: no randomness, and
//! every health/stamina change is clamped by [`crate::Track`].

use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::outcome::{Outcome, OutcomeCategory};

/// Stamina costs and drain ratios used when applying outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionCosts {
    /// Stamina spent by a successful strike, grapple or score.
    pub action_cost: u32,
    /// Stamina spent by a failed attempt.
    pub miss_cost: u32,
    /// Target stamina lost per point of strike damage.
    pub stamina_damage_ratio: f64,
    /// Target stamina lost per point of grapple damage.
    pub grapple_stamina_ratio: f64,
}

impl Default for ActionCosts {
    fn default() -> Self {
        Self {
            action_cost: 4,
            miss_cost: 2,
            stamina_damage_ratio: 0.5,
            grapple_stamina_ratio: 1.5,
        }
    }
}

impl ActionCosts {
    /// Costs for games where actions do not tire the actors.
    pub fn free() -> Self {
        Self {
            action_cost: 0,
            miss_cost: 0,
            stamina_damage_ratio: 0.0,
            grapple_stamina_ratio: 0.0,
        }
    }
}

/// Apply one outcome to the pair of actors it refers to.
pub fn apply_outcome(actors: &mut [Actor; 2], outcome: &Outcome, costs: &ActionCosts) {
    let actor = outcome.actor.index();
    let target = outcome.target.index();

    match (outcome.category, outcome.success) {
        (OutcomeCategory::Strike | OutcomeCategory::Grapple, true) => {
            let ratio = if outcome.category == OutcomeCategory::Grapple {
                costs.grapple_stamina_ratio
            } else {
                costs.stamina_damage_ratio
            };
            let drain = (outcome.magnitude as f64 * ratio).round() as i32;
            actors[target].health.adjust(-to_delta(outcome.magnitude));
            actors[target].stamina.adjust(-drain);
            actors[actor].score = actors[actor].score.saturating_add(1);
            actors[actor].stamina.adjust(-to_delta(costs.action_cost));
        }
        (OutcomeCategory::Score, true) => {
            actors[actor].score = actors[actor].score.saturating_add(outcome.magnitude);
            actors[actor].stamina.adjust(-to_delta(costs.action_cost));
        }
        (OutcomeCategory::Defend | OutcomeCategory::Rest, true) => {
            actors[actor].stamina.adjust(to_delta(outcome.magnitude));
        }
        (OutcomeCategory::Card, _) => {
            actors[target].score = actors[target].score.saturating_add(outcome.magnitude);
        }
        (OutcomeCategory::Injury, _) => {
            actors[target].health.adjust(-to_delta(outcome.magnitude));
        }
        (
            OutcomeCategory::Strike
            | OutcomeCategory::Grapple
            | OutcomeCategory::Score
            | OutcomeCategory::Miss,
            _,
        ) => {
            actors[actor].stamina.adjust(-to_delta(costs.miss_cost));
        }
        (OutcomeCategory::Defend | OutcomeCategory::Rest, false) => {}
    }
}

fn to_delta(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
