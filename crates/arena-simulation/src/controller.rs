use arena_mechanics::{Actor, Outcome, Sampler, Side};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::clock::MatchClock;
use crate::config::{MatchConfig, TurnOrder};
use crate::decision::decide;
use crate::error::{SimError, SimResult};
use crate::event::{EventLog, MatchEvent, MatchEventKind};
use crate::observer::{MatchObserver, TickSnapshot};
use crate::state::{FinishMethod, MatchState, MatchStatus};

/// What a single call to [`MatchController::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// The outcome applied, or `None` for a round-transition tick.
    pub outcome: Option<Outcome>,
    /// The match status after the tick.
    pub status: MatchStatus,
}

impl TickReport {
    /// Returns true if this tick finished the match.
    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }
}

/// Drives one match as an explicit state machine.
///
/// Owns the [`MatchState`], the sampler, the RNG stream, the event log
/// and any registered observers. Every call to [`tick`](Self::tick)
/// either simulates one action or performs one round transition.
pub struct MatchController<'o, R = StdRng> {
    state: MatchState,
    config: MatchConfig,
    sampler: Sampler,
    rng: R,
    events: EventLog,
    observers: Vec<Box<dyn MatchObserver + 'o>>,
}

impl<R> std::fmt::Debug for MatchController<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchController")
            .field("status", &self.state.status())
            .field("tick", &self.state.clock().tick())
            .field("observers", &self.observers.len())
            .field("events", &self.events.len())
            .finish()
    }
}

impl<'o> MatchController<'o, StdRng> {
    /// Create a pending match seeded from `config.seed`.
    pub fn new(a: Actor, b: Actor, config: MatchConfig) -> SimResult<Self> {
        let rng = StdRng::seed_from_u64(config.seed);
        Self::with_rng(a, b, config, rng)
    }
}

impl<'o, R: Rng> MatchController<'o, R> {
    /// Create a pending match drawing from an existing RNG stream.
    pub fn with_rng(a: Actor, b: Actor, config: MatchConfig, rng: R) -> SimResult<Self> {
        let clock = MatchClock::new(config.actions_per_round, config.seconds_per_action);
        let state = MatchState::new(a, b, clock);
        Self::resume(state, config, rng)
    }

    /// Rebuild a controller around a previously saved state.
    ///
    /// Given the same state, config and RNG position, the resumed match
    /// continues exactly as the original would have.
    pub fn resume(state: MatchState, config: MatchConfig, rng: R) -> SimResult<Self> {
        config.validate()?;
        let sampler = config.build_sampler()?;
        let events = EventLog::new(config.max_events);
        Ok(Self {
            state,
            config,
            sampler,
            rng,
            events,
            observers: Vec::new(),
        })
    }

    /// Split the controller into its state, config and RNG.
    pub fn into_parts(self) -> (MatchState, MatchConfig, R) {
        (self.state, self.config, self.rng)
    }

    /// Register an observer. Observers are notified in registration order.
    pub fn add_observer<O: MatchObserver + 'o>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    /// The current match state.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// The match configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Events recorded so far.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Move the match from pending to active.
    pub fn start(&mut self) -> SimResult<()> {
        self.state.begin()?;
        let [a, b] = self.state.actors();
        let description = format!("{} vs {}", a.name, b.name);
        log::info!("match started: {description}");
        self.record(MatchEventKind::MatchStarted, description);
        Ok(())
    }

    /// Advance the match by one tick.
    pub fn tick(&mut self) -> SimResult<TickReport> {
        match self.state.status() {
            MatchStatus::Pending => Err(SimError::NotStarted),
            MatchStatus::Finished => Err(SimError::MatchAlreadyFinished),
            MatchStatus::RoundBreak => self.begin_next_round(),
            MatchStatus::Active => self.play_action(),
        }
    }

    /// Stop the match without a winner.
    pub fn abort(&mut self) -> SimResult<()> {
        if self.state.is_finished() {
            return Err(SimError::MatchAlreadyFinished);
        }
        log::warn!("match aborted at tick {}", self.state.clock().tick());
        self.conclude(FinishMethod::Aborted, None)?;
        self.notify(None);
        Ok(())
    }

    /// Tick until the match finishes, starting it first if still pending.
    ///
    /// Fails with [`SimError::MatchAlreadyFinished`] if there is nothing
    /// left to play. Terminates because the clock allows a finite number
    /// of actions.
    pub fn run_to_completion(&mut self) -> SimResult<FinishMethod> {
        match self.state.status() {
            MatchStatus::Finished => return Err(SimError::MatchAlreadyFinished),
            MatchStatus::Pending => self.start()?,
            MatchStatus::Active | MatchStatus::RoundBreak => {}
        }
        while !self.state.is_finished() {
            self.tick()?;
        }
        self.state.method().ok_or(SimError::InvalidTransition {
            action: "read the result",
            status: self.state.status(),
        })
    }

    fn play_action(&mut self) -> SimResult<TickReport> {
        let side = self.select_side();
        let ctx = self.state.sample_context(side, &self.config.scoring);
        let outcome = self.sampler.sample(
            side,
            self.state.actor(side),
            self.state.actor(side.opponent()),
            &ctx,
            &mut self.rng,
        );
        self.state.apply_outcome(&outcome, &self.config.costs)?;
        let tick = self.state.advance_clock();

        let description = outcome.describe(
            &self.state.actor(outcome.actor).name,
            &self.state.actor(outcome.target).name,
        );
        log::debug!("tick {tick}: {description}");
        self.record(MatchEventKind::Action { outcome }, description);

        if let Some((winner, method)) = self.state.decisive_result(&self.config.scoring) {
            self.conclude(method, Some(winner))?;
        } else if self.state.clock().round_exhausted() {
            let round = self.state.round();
            if round < self.config.max_rounds {
                self.state.enter_round_break()?;
                log::debug!("round {round} ended");
                self.record(
                    MatchEventKind::RoundEnded { round },
                    format!("End of round {round}"),
                );
            } else {
                let (method, winner) =
                    decide(self.state.actors(), &self.config.decision, self.config.allow_draws);
                self.conclude(method, winner)?;
            }
        }

        self.notify(Some(&outcome));
        Ok(TickReport {
            outcome: Some(outcome),
            status: self.state.status(),
        })
    }

    fn begin_next_round(&mut self) -> SimResult<TickReport> {
        let round = self.state.start_next_round(&self.config.recovery)?;
        log::debug!("round {round} started");
        self.record(
            MatchEventKind::RoundStarted { round },
            format!("Round {round} begins"),
        );
        self.notify(None);
        Ok(TickReport {
            outcome: None,
            status: self.state.status(),
        })
    }

    fn select_side(&mut self) -> Side {
        match self.config.turn_order {
            TurnOrder::Alternating => self.state.next_side(),
            TurnOrder::Speed => {
                let speed_a = self.state.actor(Side::A).attributes.speed;
                let speed_b = self.state.actor(Side::B).attributes.speed;
                let total = speed_a + speed_b;
                let p_a = if total > 0.0 { speed_a / total } else { 0.5 };
                let side = if self.rng.random::<f64>() < p_a {
                    Side::A
                } else {
                    Side::B
                };
                self.state.set_next_side(side);
                side
            }
        }
    }

    fn conclude(&mut self, method: FinishMethod, winner: Option<Side>) -> SimResult<()> {
        self.state.finish(method, winner)?;
        let description = match winner {
            Some(side) => format!("{} wins by {method}", self.state.actor(side).name),
            None => format!("Match ends: {method}"),
        };
        log::info!("{description} after {} ticks", self.state.clock().tick());
        let winner = winner.map(|side| self.state.actor(side).id);
        self.record(MatchEventKind::Finished { method, winner }, description);
        Ok(())
    }

    fn record(&mut self, kind: MatchEventKind, description: String) {
        let clock = self.state.clock();
        let event = MatchEvent::new(clock.tick(), clock.round(), kind, description);
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
        self.events.push(event);
    }

    fn notify(&mut self, outcome: Option<&Outcome>) {
        let snapshot = TickSnapshot {
            state: &self.state,
            outcome,
        };
        for observer in &mut self.observers {
            observer.on_tick(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DecisionRule, Scoring};
    use crate::observer::EventRecorder;
    use arena_mechanics::{ActorId, Attributes, OutcomeCategory};

    fn actor(id: u32, name: &str, skill: f64) -> Actor {
        Actor::new(ActorId(id), name, Attributes::with_skill(skill).unwrap(), 100, 100)
    }

    fn controller(config: MatchConfig) -> MatchController<'static> {
        MatchController::new(actor(1, "Ada", 0.6), actor(2, "Bo", 0.4), config).unwrap()
    }

    #[test]
    fn tick_before_start_fails() {
        let mut c = controller(MatchConfig::default());
        assert_eq!(c.tick(), Err(SimError::NotStarted));
    }

    #[test]
    fn start_twice_is_invalid() {
        let mut c = controller(MatchConfig::default());
        c.start().unwrap();
        assert!(matches!(
            c.start(),
            Err(SimError::InvalidTransition { status: MatchStatus::Active, .. })
        ));
    }

    #[test]
    fn tick_after_finish_fails() {
        let mut c = controller(MatchConfig::default());
        c.run_to_completion().unwrap();
        assert_eq!(c.tick(), Err(SimError::MatchAlreadyFinished));
        assert_eq!(c.abort(), Err(SimError::MatchAlreadyFinished));
    }

    #[test]
    fn rerunning_a_finished_match_fails() {
        let mut c = controller(MatchConfig::default());
        c.run_to_completion().unwrap();
        assert_eq!(c.run_to_completion(), Err(SimError::MatchAlreadyFinished));

        let (state, config, rng) = c.into_parts();
        let mut resumed = MatchController::resume(state, config, rng).unwrap();
        assert_eq!(resumed.run_to_completion(), Err(SimError::MatchAlreadyFinished));
    }

    #[test]
    fn alternating_turns_start_with_side_a() {
        let mut c = controller(MatchConfig::default());
        c.start().unwrap();
        let first = c.tick().unwrap().outcome.unwrap();
        let second = c.tick().unwrap().outcome.unwrap();
        assert_eq!(first.actor, Side::A);
        assert_eq!(second.actor, Side::B);
    }

    #[test]
    fn round_break_takes_its_own_tick() {
        let config = MatchConfig::default()
            .with_max_rounds(2)
            .with_actions_per_round(2)
            .with_sampler(arena_mechanics::SamplerConfig {
                base_magnitude: 0,
                power_magnitude: 0,
                ..Default::default()
            });
        let mut c = controller(config);
        c.start().unwrap();
        c.tick().unwrap();
        let end = c.tick().unwrap();
        assert_eq!(end.status, MatchStatus::RoundBreak);
        let transition = c.tick().unwrap();
        assert_eq!(transition.outcome, None);
        assert_eq!(transition.status, MatchStatus::Active);
        assert_eq!(c.state().round(), 2);
        assert_eq!(c.state().clock().tick(), 2);
    }

    #[test]
    fn clock_exhaustion_goes_to_decision() {
        let config = MatchConfig::default()
            .with_max_rounds(1)
            .with_actions_per_round(4)
            .with_sampler(arena_mechanics::SamplerConfig {
                base_magnitude: 0,
                power_magnitude: 0,
                ..Default::default()
            });
        let mut c = controller(config);
        let method = c.run_to_completion().unwrap();
        assert!(matches!(method, FinishMethod::Decision));
        assert!(c.state().winner().is_some());
        assert_eq!(c.state().clock().tick(), 4);
    }

    #[test]
    fn exact_tie_with_draws_enabled() {
        // Nobody ever acts successfully, so nothing changes and the decision ties.
        let config = MatchConfig::default()
            .with_max_rounds(1)
            .with_actions_per_round(6)
            .with_draws(true)
            .with_decision(DecisionRule::Score)
            .with_costs(arena_mechanics::ActionCosts::free())
            .with_weights(arena_mechanics::ActionWeights {
                strike: 0.0,
                grapple: 0.0,
                defend: 0.0,
                rest: 1.0,
                score: 0.0,
            });
        let mut c = controller(config);
        assert_eq!(c.run_to_completion().unwrap(), FinishMethod::Draw);
        assert_eq!(c.state().winner(), None);
    }

    #[test]
    fn first_to_score_finishes_early() {
        let config = crate::preset::fencing();
        let mut c = controller(config);
        let method = c.run_to_completion().unwrap();
        let state = c.state();
        if method == FinishMethod::ScoreThreshold {
            let winner = state.actor(state.winner().unwrap());
            assert!(winner.score >= 5);
            assert!(state.clock().tick() <= 60);
        } else {
            assert_eq!(state.clock().tick(), 60);
        }
    }

    #[test]
    fn abort_mid_match() {
        let mut c = controller(MatchConfig::default());
        c.start().unwrap();
        c.tick().unwrap();
        c.abort().unwrap();
        assert_eq!(c.state().method(), Some(FinishMethod::Aborted));
        assert_eq!(c.state().winner(), None);
        assert!(matches!(
            c.events().last().unwrap().kind,
            MatchEventKind::Finished { method: FinishMethod::Aborted, winner: None }
        ));
    }

    #[test]
    fn abort_during_round_break() {
        let config = MatchConfig::default()
            .with_max_rounds(2)
            .with_actions_per_round(2)
            .with_sampler(arena_mechanics::SamplerConfig {
                base_magnitude: 0,
                power_magnitude: 0,
                ..Default::default()
            });
        let mut c = controller(config);
        c.start().unwrap();
        c.tick().unwrap();
        assert_eq!(c.tick().unwrap().status, MatchStatus::RoundBreak);

        c.abort().unwrap();
        assert_eq!(c.state().status(), MatchStatus::Finished);
        assert_eq!(c.state().method(), Some(FinishMethod::Aborted));
        assert_eq!(c.state().round(), 1);
        assert_eq!(c.tick(), Err(SimError::MatchAlreadyFinished));
    }

    #[test]
    fn abort_pending_match() {
        let mut c = controller(MatchConfig::default());
        c.abort().unwrap();
        assert!(c.state().is_finished());
    }

    #[test]
    fn speed_turn_order_favors_faster_actor() {
        let fast = Actor::new(
            ActorId(1),
            "Fast",
            Attributes::new(0.5, 0.5, 0.5, 1.0, 0.5).unwrap(),
            10_000,
            10_000,
        );
        let slow = Actor::new(
            ActorId(2),
            "Slow",
            Attributes::new(0.5, 0.5, 0.5, 0.1, 0.5).unwrap(),
            10_000,
            10_000,
        );
        let config = MatchConfig::default()
            .with_turn_order(TurnOrder::Speed)
            .with_max_rounds(1)
            .with_actions_per_round(200);
        let mut c = MatchController::new(fast, slow, config).unwrap();
        c.start().unwrap();
        let mut fast_turns = 0;
        for _ in 0..200 {
            let report = c.tick().unwrap();
            if report.outcome.is_some_and(|o| o.actor == Side::A) {
                fast_turns += 1;
            }
            if report.is_finished() {
                break;
            }
        }
        assert!(fast_turns > 150, "fast actor acted {fast_turns} times");
    }

    #[test]
    fn zero_speed_actors_share_turns() {
        let still = |id, name| {
            Actor::new(
                ActorId(id),
                name,
                Attributes::new(0.5, 0.5, 0.5, 0.0, 0.5).unwrap(),
                10_000,
                10_000,
            )
        };
        let config = MatchConfig::default()
            .with_turn_order(TurnOrder::Speed)
            .with_scoring(Scoring::None)
            .with_max_rounds(1)
            .with_actions_per_round(400);
        let mut c = MatchController::new(still(1, "Ada"), still(2, "Bo"), config).unwrap();
        c.run_to_completion().unwrap();
        let a_turns = c.state().log().iter().filter(|o| o.actor == Side::A).count();
        assert_eq!(c.state().log().len(), 400);
        assert!((140..=260).contains(&a_turns), "side A acted {a_turns} times");
    }

    #[test]
    fn oversized_scores_saturate_instead_of_panicking() {
        let config = MatchConfig::default()
            .with_scoring(Scoring::FirstTo(u32::MAX))
            .with_weights(arena_mechanics::ActionWeights::scoring())
            .with_max_rounds(1)
            .with_actions_per_round(10)
            .with_sampler(arena_mechanics::SamplerConfig {
                score_base: 3_000_000_000,
                critical_chance: 0.0,
                min_probability: 1.0,
                max_probability: 1.0,
                ..Default::default()
            });
        config.validate().unwrap();
        let mut c = controller(config);
        assert_eq!(c.run_to_completion().unwrap(), FinishMethod::ScoreThreshold);
        let winner = c.state().winner().unwrap();
        assert_eq!(winner, Side::A);
        assert_eq!(c.state().actor(winner).score, u32::MAX);
        assert_eq!(c.state().clock().tick(), 3);
    }

    #[test]
    fn observers_see_every_tick_and_event() {
        let mut recorder = EventRecorder::default();
        {
            let mut c = MatchController::new(
                actor(1, "Ada", 0.6),
                actor(2, "Bo", 0.4),
                MatchConfig::default().with_max_rounds(2).with_actions_per_round(5),
            )
            .unwrap();
            c.add_observer(&mut recorder);
            c.run_to_completion().unwrap();
        }
        assert!(matches!(recorder.events[0].kind, MatchEventKind::MatchStarted));
        assert!(matches!(
            recorder.events.last().unwrap().kind,
            MatchEventKind::Finished { .. }
        ));
        assert!(recorder.ticks > 0);
    }

    #[test]
    fn event_log_records_actions() {
        let mut c = controller(MatchConfig::default().with_max_rounds(1).with_actions_per_round(10));
        c.run_to_completion().unwrap();
        let actions = c.events().actions().count();
        assert_eq!(actions as u64, c.state().clock().tick());
        assert_eq!(c.state().log().len(), actions);
    }

    #[test]
    fn countdown_never_goes_below_zero() {
        let mut c = controller(crate::preset::darts());
        c.run_to_completion().unwrap();
        let state = c.state();
        for actor in state.actors() {
            assert!(actor.score <= 301);
        }
        if state.method() == Some(FinishMethod::ScoreThreshold) {
            assert_eq!(state.actor(state.winner().unwrap()).score, 301);
        }
        assert!(
            state
                .log()
                .iter()
                .all(|o| o.category != OutcomeCategory::Card)
        );
    }

    #[test]
    fn same_seed_same_match() {
        let run = || {
            let mut c = controller(MatchConfig::default().with_seed(7).with_scoring(Scoring::None));
            c.run_to_completion().unwrap();
            c.into_parts().0
        };
        assert_eq!(run(), run());
    }
}
