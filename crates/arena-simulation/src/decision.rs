use std::cmp::Ordering;

use arena_mechanics::{Actor, Side};

use crate::config::DecisionRule;
use crate::state::FinishMethod;

/// The primary value an actor is judged on under `rule`.
pub fn decision_value(actor: &Actor, rule: &DecisionRule) -> f64 {
    match rule {
        DecisionRule::Composite {
            health_weight,
            stamina_weight,
        } => health_weight * actor.health_ratio() + stamina_weight * actor.stamina_ratio(),
        DecisionRule::Score => f64::from(actor.score),
    }
}

/// Pick the winner of a timed-out match. Uses no randomness.
///
/// Equal primary values fall back to raw score. A tie on both is a draw
/// when `allow_draws` is set, otherwise side A takes it.
pub fn decide(actors: &[Actor; 2], rule: &DecisionRule, allow_draws: bool) -> (FinishMethod, Option<Side>) {
    let [a, b] = actors;
    let primary = decision_value(a, rule)
        .partial_cmp(&decision_value(b, rule))
        .unwrap_or(Ordering::Equal);
    let ordering = primary.then_with(|| a.score.cmp(&b.score));

    match ordering {
        Ordering::Greater => (FinishMethod::Decision, Some(Side::A)),
        Ordering::Less => (FinishMethod::Decision, Some(Side::B)),
        Ordering::Equal if allow_draws => (FinishMethod::Draw, None),
        Ordering::Equal => (FinishMethod::Decision, Some(Side::A)),
    }
}
