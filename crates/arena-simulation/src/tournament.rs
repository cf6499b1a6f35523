//! Single-elimination brackets.
//!
//! A [`Bracket`] pairs entrants in listing order, plays matches one at a
//! time in bracket order, and threads each winner into the next round.
//! Win/loss records are kept in the bracket's [`Roster`].

use std::collections::{BTreeMap, BTreeSet};

use arena_mechanics::{Actor, ActorId};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::MatchConfig;
use crate::error::{SimError, SimResult};
use crate::orchestrator::{MatchResult, run_match_with};

/// Wins and losses for one entrant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Matches won.
    pub wins: u32,
    /// Matches lost.
    pub losses: u32,
}

impl Record {
    /// Matches played.
    pub fn played(&self) -> u32 {
        self.wins + self.losses
    }
}

/// The entrants of a competition and their records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    entrants: Vec<Actor>,
    records: BTreeMap<ActorId, Record>,
}

impl Roster {
    /// Create a roster. Actor ids must be unique.
    pub fn new(entrants: Vec<Actor>) -> SimResult<Self> {
        let mut records = BTreeMap::new();
        for actor in &entrants {
            if records.insert(actor.id, Record::default()).is_some() {
                return Err(SimError::InvalidConfiguration(format!(
                    "duplicate entrant id {}",
                    actor.id
                )));
            }
        }
        Ok(Self { entrants, records })
    }

    /// Entrants in listing order.
    pub fn entrants(&self) -> &[Actor] {
        &self.entrants
    }

    /// Look up an entrant by id.
    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.entrants.iter().find(|a| a.id == id)
    }

    /// The record of an entrant.
    pub fn record(&self, id: ActorId) -> Record {
        self.records.get(&id).copied().unwrap_or_default()
    }

    /// Credit a win and a loss.
    pub fn record_result(&mut self, winner: ActorId, loser: ActorId) {
        self.records.entry(winner).or_default().wins += 1;
        self.records.entry(loser).or_default().losses += 1;
    }

    /// Entrants ordered by wins (descending), then fewest losses, then listing order.
    pub fn standings(&self) -> Vec<(&Actor, Record)> {
        let mut table: Vec<_> = self.entrants.iter().map(|a| (a, self.record(a.id))).collect();
        table.sort_by(|(_, x), (_, y)| y.wins.cmp(&x.wins).then(x.losses.cmp(&y.losses)));
        table
    }

    /// Number of entrants.
    pub fn len(&self) -> usize {
        self.entrants.len()
    }

    /// Returns true if the roster has no entrants.
    pub fn is_empty(&self) -> bool {
        self.entrants.is_empty()
    }
}

/// One slot in a bracket round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketMatch {
    /// First entrant, once known.
    pub a: Option<ActorId>,
    /// Second entrant, once known.
    pub b: Option<ActorId>,
    /// The result, once played.
    pub result: Option<MatchResult>,
}

impl BracketMatch {
    fn empty() -> Self {
        Self {
            a: None,
            b: None,
            result: None,
        }
    }

    /// Returns true once the match has been played.
    pub fn is_played(&self) -> bool {
        self.result.is_some()
    }

    /// The winner, once played.
    pub fn winner(&self) -> Option<ActorId> {
        self.result.as_ref().and_then(|r| r.winner)
    }
}

/// One round of a bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketRound {
    /// Display name ("Final", "Semifinal", "Round of 16", ...).
    pub name: String,
    /// Matches in bracket order.
    pub matches: Vec<BracketMatch>,
}

/// Name of a round that starts with `entrants` competitors.
pub fn round_name(entrants: usize) -> String {
    match entrants {
        2 => "Final".to_string(),
        4 => "Semifinal".to_string(),
        8 => "Quarterfinal".to_string(),
        n => format!("Round of {n}"),
    }
}

/// Read-only view of a bracket for rendering.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BracketView<'a> {
    /// Every round, first to final.
    pub rounds: &'a [BracketRound],
    /// `(round, match)` position of the next match to play.
    pub current_match_index: Option<(usize, usize)>,
    /// The champion, once decided.
    pub champion: Option<&'a Actor>,
}

/// A single-elimination bracket over `2^k` entrants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bracket {
    roster: Roster,
    rounds: Vec<BracketRound>,
    champion: Option<ActorId>,
}

impl Bracket {
    /// Seed a bracket in listing order: 1 vs 2, 3 vs 4, ...
    ///
    /// The entrant count must be a power of two and at least 2.
    pub fn new(entrants: Vec<Actor>) -> SimResult<Self> {
        let count = entrants.len();
        if count < 2 || !count.is_power_of_two() {
            return Err(SimError::InvalidConfiguration(format!(
                "a bracket needs a power-of-two number of entrants (at least 2), got {count}"
            )));
        }
        let roster = Roster::new(entrants)?;

        let first = BracketRound {
            name: round_name(count),
            matches: roster
                .entrants()
                .chunks(2)
                .map(|pair| BracketMatch {
                    a: Some(pair[0].id),
                    b: Some(pair[1].id),
                    result: None,
                })
                .collect(),
        };
        let mut rounds = vec![first];
        let mut remaining = count / 2;
        while remaining >= 2 {
            rounds.push(BracketRound {
                name: round_name(remaining),
                matches: (0..remaining / 2).map(|_| BracketMatch::empty()).collect(),
            });
            remaining /= 2;
        }

        log::debug!("bracket of {count} entrants with {} rounds", rounds.len());
        Ok(Self {
            roster,
            rounds,
            champion: None,
        })
    }

    /// Check that the rounds halve down to a single final and only refer
    /// to roster entrants.
    fn check_shape(&self) -> SimResult<()> {
        let invalid = |msg: String| Err(SimError::InvalidConfiguration(msg));
        let count = self.roster.len();
        if count < 2 || !count.is_power_of_two() {
            return invalid(format!("bracket roster has {count} entrants"));
        }
        let ids: BTreeSet<ActorId> = self.roster.entrants().iter().map(|a| a.id).collect();
        if ids.len() != count {
            return invalid("bracket roster has duplicate ids".to_string());
        }
        let expected_rounds = count.trailing_zeros() as usize;
        if self.rounds.len() != expected_rounds {
            return invalid(format!(
                "{count} entrants need {expected_rounds} rounds, found {}",
                self.rounds.len()
            ));
        }
        for (r, round) in self.rounds.iter().enumerate() {
            let expected = count >> (r + 1);
            if round.matches.len() != expected {
                return invalid(format!(
                    "{} has {} matches, expected {expected}",
                    round.name,
                    round.matches.len()
                ));
            }
            let mut slots = round.matches.iter().flat_map(|m| [m.a, m.b]).flatten();
            if let Some(id) = slots.find(|id| !ids.contains(id)) {
                return invalid(format!("{} refers to unknown entrant {id}", round.name));
            }
        }
        match self.champion {
            Some(id) if !ids.contains(&id) => invalid(format!("unknown champion {id}")),
            _ => Ok(()),
        }
    }

    /// All rounds, first to final.
    pub fn rounds(&self) -> &[BracketRound] {
        &self.rounds
    }

    /// The entrants and their records.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Total matches in the bracket.
    pub fn match_count(&self) -> usize {
        self.rounds.iter().map(|r| r.matches.len()).sum()
    }

    /// The champion, once the final is played.
    pub fn champion(&self) -> Option<&Actor> {
        self.champion.and_then(|id| self.roster.get(id))
    }

    /// `(round, match)` position of the next unplayed match.
    pub fn current_match(&self) -> Option<(usize, usize)> {
        self.rounds.iter().enumerate().find_map(|(r, round)| {
            round
                .matches
                .iter()
                .position(|m| !m.is_played())
                .map(|m| (r, m))
        })
    }

    /// A read-only snapshot for rendering.
    pub fn view(&self) -> BracketView<'_> {
        BracketView {
            rounds: &self.rounds,
            current_match_index: self.current_match(),
            champion: self.champion(),
        }
    }

    /// Play the next match in bracket order. Returns `Ok(None)` once a champion exists.
    pub fn play_next<R: Rng + ?Sized>(
        &mut self,
        config: &MatchConfig,
        rng: &mut R,
    ) -> SimResult<Option<MatchResult>> {
        if config.allow_draws {
            return Err(SimError::InvalidConfiguration(
                "bracket matches must produce a winner; disable allow_draws".to_string(),
            ));
        }
        let Some((r, m)) = self.current_match() else {
            return Ok(None);
        };

        let slot = &self.rounds[r].matches[m];
        let (a, b) = match (slot.a, slot.b) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(SimError::InvalidConfiguration(format!(
                    "{} match {} has no opponents yet",
                    self.rounds[r].name,
                    m + 1
                )));
            }
        };
        let (Some(actor_a), Some(actor_b)) = (self.roster.get(a), self.roster.get(b)) else {
            return Err(SimError::InvalidConfiguration(
                "bracket refers to an unknown entrant".to_string(),
            ));
        };

        let result = run_match_with(actor_a.clone(), actor_b.clone(), config, rng, &mut [])?;
        let (Some(winner), Some(loser)) = (result.winner, result.loser) else {
            return Err(SimError::InvalidConfiguration(format!(
                "bracket match ended without a winner ({})",
                result.method
            )));
        };

        log::debug!(
            "{} match {}: {} beat {} by {}",
            self.rounds[r].name,
            m + 1,
            winner,
            loser,
            result.method
        );
        self.roster.record_result(winner, loser);
        self.rounds[r].matches[m].result = Some(result.clone());

        match self.rounds.get_mut(r + 1) {
            Some(next) => {
                let slot = &mut next.matches[m / 2];
                if m % 2 == 0 {
                    slot.a = Some(winner);
                } else {
                    slot.b = Some(winner);
                }
            }
            None => {
                self.champion = Some(winner);
                if let Some(champion) = self.champion() {
                    log::info!("{} wins the bracket", champion.name);
                }
            }
        }
        Ok(Some(result))
    }

    /// Play every remaining match and return the champion.
    pub fn run<R: Rng + ?Sized>(&mut self, config: &MatchConfig, rng: &mut R) -> SimResult<&Actor> {
        while self.play_next(config, rng)?.is_some() {}
        self.champion().ok_or_else(|| {
            SimError::InvalidConfiguration("bracket finished without a champion".to_string())
        })
    }
}

// Deserialized brackets must pass `check_shape` before they can be played.
impl<'de> Deserialize<'de> for Bracket {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Helper {
            roster: Roster,
            rounds: Vec<BracketRound>,
            champion: Option<ActorId>,
        }
        let helper = Helper::deserialize(deserializer)?;
        let bracket = Self {
            roster: helper.roster,
            rounds: helper.rounds,
            champion: helper.champion,
        };
        bracket.check_shape().map_err(serde::de::Error::custom)?;
        Ok(bracket)
    }
}
