//! One-call match running and seeded Monte Carlo trials.

use std::collections::BTreeMap;

use arena_mechanics::{Actor, ActorId, Side};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::MatchConfig;
use crate::controller::MatchController;
use crate::error::{SimError, SimResult};
use crate::observer::MatchObserver;
use crate::state::{ActorStats, FinishMethod, MatchState};

/// The final result of one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// The winner, unless the match was drawn or aborted.
    pub winner: Option<ActorId>,
    /// The loser, unless the match was drawn or aborted.
    pub loser: Option<ActorId>,
    /// How the match ended.
    pub method: FinishMethod,
    /// The round the match ended in.
    pub round_number: u32,
    /// Simulated seconds (`ticks * seconds_per_action`).
    pub elapsed_time: f64,
    /// Actions simulated.
    pub ticks: u64,
    /// Both actors as they finished.
    pub actors: [Actor; 2],
    /// Per-actor statistics, in the same order as `actors`.
    pub stats: [ActorStats; 2],
}

impl MatchResult {
    /// Summarize a finished state. Returns `None` while the match is still running.
    pub fn from_state(state: &MatchState) -> Option<Self> {
        let method = state.method()?;
        let winner = state.winner();
        Some(Self {
            winner: winner.map(|side| state.actor(side).id),
            loser: winner.map(|side| state.actor(side.opponent()).id),
            method,
            round_number: state.round(),
            elapsed_time: state.clock().elapsed_seconds(),
            ticks: state.clock().tick(),
            actors: state.actors().clone(),
            stats: Side::both().map(|side| state.stats(side)),
        })
    }

    /// The side that won, if any.
    pub fn winner_side(&self) -> Option<Side> {
        let winner = self.winner?;
        Side::both()
            .into_iter()
            .find(|side| self.actors[side.index()].id == winner)
    }

    /// The winning actor, if any.
    pub fn winner_actor(&self) -> Option<&Actor> {
        self.winner_side().map(|side| &self.actors[side.index()])
    }

    /// The losing actor, if any.
    pub fn loser_actor(&self) -> Option<&Actor> {
        self.winner_side()
            .map(|side| &self.actors[side.opponent().index()])
    }
}

/// Run a complete match seeded from `config.seed`.
pub fn run_match(a: Actor, b: Actor, config: &MatchConfig) -> SimResult<MatchResult> {
    let mut controller = MatchController::new(a, b, config.clone())?;
    finish(&mut controller)
}

/// Run a complete match drawing from a shared RNG stream, notifying `observers`.
pub fn run_match_with<R: Rng + ?Sized>(
    a: Actor,
    b: Actor,
    config: &MatchConfig,
    rng: &mut R,
    observers: &mut [&mut dyn MatchObserver],
) -> SimResult<MatchResult> {
    let mut controller = MatchController::with_rng(a, b, config.clone(), rng)?;
    for observer in observers.iter_mut() {
        controller.add_observer(&mut **observer);
    }
    finish(&mut controller)
}

fn finish<R: Rng>(controller: &mut MatchController<'_, R>) -> SimResult<MatchResult> {
    controller.run_to_completion()?;
    let state = controller.state();
    MatchResult::from_state(state).ok_or(SimError::InvalidTransition {
        action: "summarize the match",
        status: state.status(),
    })
}

/// Aggregate outcome of repeated seeded matches between the same pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialSummary {
    /// Matches played.
    pub trials: u32,
    /// Matches won by the first actor.
    pub wins_a: u32,
    /// Matches won by the second actor.
    pub wins_b: u32,
    /// Drawn or aborted matches.
    pub draws: u32,
    /// Match counts per finish method.
    pub by_method: BTreeMap<FinishMethod, u32>,
}

impl TrialSummary {
    /// Fraction of trials won by the first actor.
    pub fn win_rate_a(&self) -> f64 {
        rate(self.wins_a, self.trials)
    }

    /// Fraction of trials won by the second actor.
    pub fn win_rate_b(&self) -> f64 {
        rate(self.wins_b, self.trials)
    }
}

fn rate(count: u32, trials: u32) -> f64 {
    if trials == 0 {
        0.0
    } else {
        f64::from(count) / f64::from(trials)
    }
}

/// Play `trials` matches between `a` and `b`, seeding trial `i` with `config.seed + i`.
pub fn run_trials(a: &Actor, b: &Actor, config: &MatchConfig, trials: u32) -> SimResult<TrialSummary> {
    let mut summary = TrialSummary {
        trials,
        ..TrialSummary::default()
    };
    for i in 0..trials {
        let trial_config = config.clone().with_seed(config.seed.wrapping_add(u64::from(i)));
        let result = run_match(a.clone(), b.clone(), &trial_config)?;
        match result.winner_side() {
            Some(Side::A) => summary.wins_a += 1,
            Some(Side::B) => summary.wins_b += 1,
            None => summary.draws += 1,
        }
        *summary.by_method.entry(result.method).or_default() += 1;
    }
    log::info!(
        "{} trials: {} {} - {} {} ({} drawn)",
        trials,
        a.name,
        summary.wins_a,
        summary.wins_b,
        b.name,
        summary.draws
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Scoring;
    use crate::observer::EventRecorder;
    use arena_mechanics::Attributes;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn actor(id: u32, name: &str, skill: f64) -> Actor {
        Actor::new(ActorId(id), name, Attributes::with_skill(skill).unwrap(), 100, 100)
    }

    #[test]
    fn finished_match_has_winner_unless_drawn() {
        for seed in 0..20 {
            let config = MatchConfig::default().with_seed(seed);
            let result = run_match(actor(1, "Ada", 0.5), actor(2, "Bo", 0.5), &config).unwrap();
            assert!(result.method.has_winner());
            assert!(result.winner.is_some());
            assert_ne!(result.winner, result.loser);
        }
    }

    #[test]
    fn elapsed_time_matches_ticks() {
        let config = MatchConfig::default().with_seconds_per_action(2.5);
        let result = run_match(actor(1, "Ada", 0.5), actor(2, "Bo", 0.5), &config).unwrap();
        assert!((result.elapsed_time - result.ticks as f64 * 2.5).abs() < 1e-9);
        assert!(result.ticks <= config.total_actions());
    }

    #[test]
    fn winner_and_loser_lookup() {
        let result = run_match(
            actor(1, "Ada", 0.9),
            actor(2, "Bo", 0.1),
            &crate::preset::fencing(),
        )
        .unwrap();
        let winner = result.winner_actor().unwrap();
        let loser = result.loser_actor().unwrap();
        assert_eq!(Some(winner.id), result.winner);
        assert_eq!(Some(loser.id), result.loser);
    }

    #[test]
    fn shared_stream_with_observers() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut recorder = EventRecorder::default();
        let result = run_match_with(
            actor(1, "Ada", 0.5),
            actor(2, "Bo", 0.5),
            &MatchConfig::default(),
            &mut rng,
            &mut [&mut recorder as &mut dyn MatchObserver],
        )
        .unwrap();
        let finished = recorder
            .events
            .iter()
            .filter(|e| matches!(e.kind, crate::MatchEventKind::Finished { .. }))
            .count();
        assert_eq!(finished, 1);
        assert!(recorder.ticks >= result.ticks);
    }

    #[test]
    fn trials_are_reproducible_and_tallied() {
        let config = MatchConfig::default()
            .with_scoring(Scoring::FirstTo(5))
            .with_weights(arena_mechanics::ActionWeights::scoring())
            .with_max_rounds(1)
            .with_actions_per_round(60);
        let a = actor(1, "Ada", 0.7);
        let b = actor(2, "Bo", 0.4);
        let first = run_trials(&a, &b, &config, 50).unwrap();
        let second = run_trials(&a, &b, &config, 50).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.wins_a + first.wins_b + first.draws, 50);
        assert_eq!(first.by_method.values().sum::<u32>(), 50);
        assert!(first.win_rate_a() > first.win_rate_b());
    }

    #[test]
    fn zero_trials() {
        let summary = run_trials(
            &actor(1, "Ada", 0.5),
            &actor(2, "Bo", 0.5),
            &MatchConfig::default(),
            0,
        )
        .unwrap();
        assert_eq!(summary.win_rate_a(), 0.0);
        assert!(summary.by_method.is_empty());
    }
}
