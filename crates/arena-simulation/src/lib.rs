//! Tick-based match simulation for Arena.
//!
//! A [`MatchController`] drives one match between two
//! [`arena_mechanics::Actor`]s as an explicit state machine: each tick
//! samples one outcome, applies it, and checks for a knockout, a score
//! threshold or the end of the clock. [`run_match`] wraps that loop, and
//! [`Bracket`] chains matches into a single-elimination tournament.

/// Match clock: ticks, rounds and simulated time.
pub mod clock;
/// Configuration types for matches.
pub mod config;
/// The per-tick match state machine.
pub mod controller;
/// Deciding matches that run out of time.
pub mod decision;
/// Error types for the simulation crate.
pub mod error;
/// Match event types and the event log.
pub mod event;
/// Observers notified after every tick.
pub mod observer;
/// One-call match running and Monte Carlo trials.
pub mod orchestrator;
/// Ready-made configs for common sports.
pub mod preset;
/// Serializable match state.
pub mod state;
/// Single-elimination brackets and rosters.
pub mod tournament;

/// Re-export of [`clock::MatchClock`].
pub use clock::MatchClock;
/// Re-exports of the config types.
pub use config::{DecisionRule, MatchConfig, RoundRecovery, Scoring, TurnOrder};
/// Re-exports of [`controller::MatchController`] and [`controller::TickReport`].
pub use controller::{MatchController, TickReport};
/// Re-export of [`decision::decide`].
pub use decision::decide;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of [`event::EventLog`], [`event::MatchEvent`], and [`event::MatchEventKind`].
pub use event::{EventLog, MatchEvent, MatchEventKind};
/// Re-exports of the observer types.
pub use observer::{EventRecorder, MatchObserver, TickSnapshot};
/// Re-exports of the orchestrator entry points.
pub use orchestrator::{MatchResult, TrialSummary, run_match, run_match_with, run_trials};
/// Re-exports of the presets.
pub use preset::{PRESET_NAMES, preset};
/// Re-exports of the state types.
pub use state::{ActorStats, FinishMethod, MatchState, MatchStatus};
/// Re-exports of the bracket types.
pub use tournament::{Bracket, BracketMatch, BracketRound, BracketView, Record, Roster, round_name};
