use arena_mechanics::Outcome;

use crate::event::MatchEvent;
use crate::state::MatchState;

/// A read-only view of the match after one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickSnapshot<'a> {
    /// The state after the tick was applied.
    pub state: &'a MatchState,
    /// The outcome applied this tick, if the tick simulated an action.
    pub outcome: Option<&'a Outcome>,
}

/// Receives per-tick snapshots and events from a running match.
///
/// Observers are called in registration order after every tick. They
/// cannot mutate the match.
pub trait MatchObserver {
    /// Called once per tick with the updated state.
    fn on_tick(&mut self, snapshot: &TickSnapshot<'_>);

    /// Called for every event the match records. Optional.
    fn on_event(&mut self, _event: &MatchEvent) {}
}

/// Collects every event it sees. Useful for tests and replays.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    /// Events in the order they were observed.
    pub events: Vec<MatchEvent>,
    /// Number of snapshots observed.
    pub ticks: u64,
}

impl MatchObserver for EventRecorder {
    fn on_tick(&mut self, _snapshot: &TickSnapshot<'_>) {
        self.ticks += 1;
    }

    fn on_event(&mut self, event: &MatchEvent) {
        self.events.push(event.clone());
    }
}

impl<T: MatchObserver + ?Sized> MatchObserver for &mut T {
    fn on_tick(&mut self, snapshot: &TickSnapshot<'_>) {
        (**self).on_tick(snapshot);
    }

    fn on_event(&mut self, event: &MatchEvent) {
        (**self).on_event(event);
    }
}
