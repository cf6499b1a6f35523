use arena_mechanics::{ActorId, Outcome};
use serde::{Deserialize, Serialize};

use crate::state::FinishMethod;

/// What kind of match event occurred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MatchEventKind {
    /// The match moved from pending to active.
    MatchStarted,
    /// An action was sampled and applied.
    Action {
        /// The applied outcome.
        outcome: Outcome,
    },
    /// A round ran out of actions and the match paused.
    RoundEnded {
        /// The round that ended.
        round: u32,
    },
    /// Recovery was applied and a new round began.
    RoundStarted {
        /// The round that began.
        round: u32,
    },
    /// The match reached a result.
    Finished {
        /// How it ended.
        method: FinishMethod,
        /// The winner, if any.
        winner: Option<ActorId>,
    },
}

impl MatchEventKind {
    /// Returns true for lifecycle events (everything but actions).
    pub fn is_lifecycle(&self) -> bool {
        !matches!(self, Self::Action { .. })
    }
}

/// One line of match commentary, stamped with the clock position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    /// Actions elapsed when the event was recorded.
    pub tick: u64,
    /// Round in progress.
    pub round: u32,
    /// What happened.
    pub kind: MatchEventKind,
    /// Rendered commentary, e.g. "Ada strikes Bo for 12".
    pub description: String,
}

impl MatchEvent {
    /// Stamp an event at `tick` in `round`.
    pub fn new(tick: u64, round: u32, kind: MatchEventKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            round,
            kind,
            description: description.into(),
        }
    }
}

/// The commentary feed of one match, oldest first.
///
/// With a `limit`, only the most recent `limit` events are kept and the
/// number of evicted ones is counted.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<MatchEvent>,
    limit: usize,
    dropped: u64,
}

impl EventLog {
    /// An empty feed keeping at most `limit` events (0 keeps everything).
    pub fn new(limit: usize) -> Self {
        Self {
            events: Vec::new(),
            limit,
            dropped: 0,
        }
    }

    /// Record an event, evicting the oldest once over the limit.
    pub fn push(&mut self, event: MatchEvent) {
        self.events.push(event);
        if self.limit > 0 && self.events.len() > self.limit {
            let excess = self.events.len() - self.limit;
            self.events.drain(..excess);
            self.dropped += excess as u64;
        }
    }

    /// Retained events.
    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    /// Retained action events, skipping round and match lifecycle markers.
    pub fn actions(&self) -> impl Iterator<Item = &MatchEvent> {
        self.events.iter().filter(|e| !e.kind.is_lifecycle())
    }

    /// Retained events from one round.
    pub fn events_in_round(&self, round: u32) -> Vec<&MatchEvent> {
        self.events.iter().filter(|e| e.round == round).collect()
    }

    /// The latest event.
    pub fn last(&self) -> Option<&MatchEvent> {
        self.events.last()
    }

    /// Events evicted by the limit so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Number of retained events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_mechanics::{OutcomeCategory, Side};

    fn action(tick: u64, round: u32) -> MatchEvent {
        MatchEvent::new(
            tick,
            round,
            MatchEventKind::Action {
                outcome: Outcome::hit(Side::A, OutcomeCategory::Strike, 5),
            },
            "hit",
        )
    }

    #[test]
    fn event_log_push_and_query() {
        let mut log = EventLog::new(0);
        log.push(MatchEvent::new(0, 1, MatchEventKind::MatchStarted, "start"));
        log.push(action(1, 1));
        log.push(action(2, 2));
        assert_eq!(log.len(), 3);
        assert_eq!(log.events_in_round(1).len(), 2);
        assert_eq!(log.last().unwrap().tick, 2);
    }

    #[test]
    fn limit_keeps_the_latest_events() {
        let mut log = EventLog::new(2);
        for i in 0..5 {
            log.push(action(i, 1));
        }
        assert_eq!(log.len(), 2);
        assert_eq!(log.dropped(), 3);
        assert_eq!(log.events()[0].tick, 3);
        assert_eq!(log.events()[1].tick, 4);
    }

    #[test]
    fn actions_skip_lifecycle_markers() {
        let mut log = EventLog::new(0);
        log.push(MatchEvent::new(0, 1, MatchEventKind::MatchStarted, "start"));
        log.push(action(1, 1));
        log.push(MatchEvent::new(1, 1, MatchEventKind::RoundEnded { round: 1 }, "end"));
        let ticks: Vec<_> = log.actions().map(|e| e.tick).collect();
        assert_eq!(ticks, [1]);
        assert_eq!(log.dropped(), 0);
    }

    #[test]
    fn lifecycle_filter() {
        assert!(MatchEventKind::MatchStarted.is_lifecycle());
        assert!(MatchEventKind::RoundEnded { round: 1 }.is_lifecycle());
        assert!(!action(1, 1).kind.is_lifecycle());
    }

    #[test]
    fn empty_log() {
        let log = EventLog::new(0);
        assert!(log.is_empty());
        assert_eq!(log.dropped(), 0);
        assert!(log.last().is_none());
        assert!(log.events_in_round(1).is_empty());
    }
}
