//! Match participants and their attributes.

use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};
use crate::track::Track;

/// Identifier for an actor, unique within a roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub u32);

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Skill-like scalars in `[0, 1]` that drive outcome sampling.
///
/// Deserialization goes through [`Attributes::new`], so stored values are
/// clamped and non-finite ones rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Attributes {
    /// Offensive accuracy: raises the actor's success probability.
    pub skill: f64,
    /// Lowers the opponent's success probability.
    pub defense: f64,
    /// Scales the magnitude of successful actions.
    pub power: f64,
    /// Relative chance of acting first under speed-based turn order.
    pub speed: f64,
    /// Narrows the spread of magnitude draws.
    pub consistency: f64,
}

impl Attributes {
    /// Build attributes, clamping each value to `[0, 1]`.
    ///
    /// Non-finite values are rejected.
    pub fn new(skill: f64, defense: f64, power: f64, speed: f64, consistency: f64) -> MechResult<Self> {
        Ok(Self {
            skill: unit("skill", skill)?,
            defense: unit("defense", defense)?,
            power: unit("power", power)?,
            speed: unit("speed", speed)?,
            consistency: unit("consistency", consistency)?,
        })
    }

    /// Every attribute set to the same value.
    pub fn uniform(value: f64) -> MechResult<Self> {
        Self::new(value, value, value, value, value)
    }

    /// Average attributes with only `skill` changed.
    pub fn with_skill(skill: f64) -> MechResult<Self> {
        Self::new(skill, 0.5, 0.5, 0.5, 0.5)
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            skill: 0.5,
            defense: 0.5,
            power: 0.5,
            speed: 0.5,
            consistency: 0.5,
        }
    }
}

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Helper {
            skill: f64,
            defense: f64,
            power: f64,
            speed: f64,
            consistency: f64,
        }
        let h = Helper::deserialize(deserializer)?;
        Self::new(h.skill, h.defense, h.power, h.speed, h.consistency)
            .map_err(serde::de::Error::custom)
    }
}

fn unit(name: &'static str, value: f64) -> MechResult<f64> {
    if !value.is_finite() {
        return Err(MechError::InvalidAttribute { name, value });
    }
    Ok(value.clamp(0.0, 1.0))
}

/// A participant in a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Roster identifier.
    pub id: ActorId,
    /// Display name.
    pub name: String,
    /// Sampling attributes.
    pub attributes: Attributes,
    /// Health, clamped to `[0, max_health]`.
    pub health: Track,
    /// Stamina, clamped to `[0, max_stamina]`.
    pub stamina: Track,
    /// Points accumulated in the current match.
    pub score: u32,
}

impl Actor {
    /// Create an actor at full health and stamina with zero score.
    pub fn new(
        id: ActorId,
        name: impl Into<String>,
        attributes: Attributes,
        max_health: i32,
        max_stamina: i32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            attributes,
            health: Track::new(max_health),
            stamina: Track::new(max_stamina),
            score: 0,
        }
    }

    /// Restore full health and stamina and clear the score.
    pub fn reset_for_match(&mut self) {
        self.health.refill();
        self.stamina.refill();
        self.score = 0;
    }

    /// Fraction of health remaining.
    pub fn health_ratio(&self) -> f64 {
        self.health.fraction()
    }

    /// Fraction of stamina remaining.
    pub fn stamina_ratio(&self) -> f64 {
        self.stamina.fraction()
    }

    /// Returns true when health has reached zero.
    pub fn is_down(&self) -> bool {
        self.health.is_empty()
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (HP {}, ST {}, score {})",
            self.name, self.health, self.stamina, self.score
        )
    }
}
