//! Sampled action outcomes.

use serde::{Deserialize, Serialize};

/// One of the two slots in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The first-listed actor.
    A,
    /// The second-listed actor.
    B,
}

impl Side {
    /// The other side.
    pub fn opponent(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// Index into a `[T; 2]` pair.
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }

    /// Both sides in listing order.
    pub fn both() -> [Self; 2] {
        [Self::A, Self::B]
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

/// What kind of action an outcome represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeCategory {
    /// Damage attempt against the target's health.
    Strike,
    /// Damage attempt that drains more of the target's stamina.
    Grapple,
    /// Guard: recovers stamina and hampers the opponent's next action.
    Defend,
    /// Recover stamina. Always succeeds.
    Rest,
    /// Point attempt (a touch, a throw).
    Score,
    /// A point attempt that could not count (a bust).
    Miss,
    /// Penalty against the actor; the target is awarded points.
    Card,
    /// Self-inflicted mishap; the target is the actor.
    Injury,
}

impl OutcomeCategory {
    /// Returns true for categories that deal damage on success.
    pub fn is_attack(self) -> bool {
        matches!(self, Self::Strike | Self::Grapple)
    }
}

impl std::fmt::Display for OutcomeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Strike => "strike",
            Self::Grapple => "grapple",
            Self::Defend => "defend",
            Self::Rest => "rest",
            Self::Score => "score",
            Self::Miss => "miss",
            Self::Card => "card",
            Self::Injury => "injury",
        };
        write!(f, "{label}")
    }
}

/// The immutable result of one sampled action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// The side that acted.
    pub actor: Side,
    /// The side the outcome is applied to.
    pub target: Side,
    /// What happened.
    pub category: OutcomeCategory,
    /// Damage, points, or recovery, depending on the category.
    pub magnitude: u32,
    /// Whether the attempted action succeeded.
    pub success: bool,
    /// Whether this was a critical success.
    pub critical: bool,
}

impl Outcome {
    /// A failed attempt with no magnitude.
    pub fn failed(actor: Side, category: OutcomeCategory) -> Self {
        Self {
            actor,
            target: actor.opponent(),
            category,
            magnitude: 0,
            success: false,
            critical: false,
        }
    }

    /// A successful action against the opponent.
    pub fn hit(actor: Side, category: OutcomeCategory, magnitude: u32) -> Self {
        Self {
            actor,
            target: actor.opponent(),
            category,
            magnitude,
            success: true,
            critical: false,
        }
    }

    /// A successful action targeting the actor itself.
    pub fn on_self(actor: Side, category: OutcomeCategory, magnitude: u32) -> Self {
        Self {
            actor,
            target: actor,
            category,
            magnitude,
            success: true,
            critical: false,
        }
    }

    /// Describe the outcome using actor names.
    pub fn describe(&self, actor_name: &str, target_name: &str) -> String {
        let crit = if self.critical { " (critical)" } else { "" };
        match (self.category, self.success) {
            (OutcomeCategory::Strike, true) => {
                format!("{actor_name} strikes {target_name} for {}{crit}", self.magnitude)
            }
            (OutcomeCategory::Grapple, true) => {
                format!("{actor_name} grapples {target_name} for {}{crit}", self.magnitude)
            }
            (OutcomeCategory::Strike | OutcomeCategory::Grapple, false) => {
                format!("{actor_name} misses {target_name} with a {}", self.category)
            }
            (OutcomeCategory::Defend, true) => format!("{actor_name} raises a guard"),
            (OutcomeCategory::Defend, false) => format!("{actor_name} fails to guard"),
            (OutcomeCategory::Rest, _) => {
                format!("{actor_name} recovers {} stamina", self.magnitude)
            }
            (OutcomeCategory::Score, true) => {
                format!("{actor_name} scores {}{crit}", self.magnitude)
            }
            (OutcomeCategory::Score, false) => format!("{actor_name} fails to score"),
            (OutcomeCategory::Miss, _) => format!("{actor_name} busts"),
            (OutcomeCategory::Card, _) => {
                format!("{actor_name} is carded; {target_name} awarded {}", self.magnitude)
            }
            (OutcomeCategory::Injury, _) => {
                format!("{actor_name} is injured for {}", self.magnitude)
            }
        }
    }
}
