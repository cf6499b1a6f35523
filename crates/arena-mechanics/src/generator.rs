//! Seeded roster generation.
//!
//! Builds a list of [`Actor`]s from a name pool and attribute ranges,
//! e.g. "8 actors, skill 0.3-0.7".

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::actor::{Actor, ActorId, Attributes};
use crate::error::{MechError, MechResult};

/// An inclusive range for a generated attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttributeRange {
    /// Lowest value that may be generated.
    pub min: f64,
    /// Highest value that may be generated.
    pub max: f64,
}

impl AttributeRange {
    /// Create a range.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A range containing a single value.
    pub fn fixed(value: f64) -> Self {
        Self::new(value, value)
    }

    fn validate(&self, name: &str) -> MechResult<()> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(self.min) || !in_unit(self.max) {
            return Err(MechError::InvalidConfiguration(format!(
                "{name} range must lie within [0, 1], got {}-{}",
                self.min, self.max
            )));
        }
        if self.min > self.max {
            return Err(MechError::InvalidConfiguration(format!(
                "{name} range is inverted: {}-{}",
                self.min, self.max
            )));
        }
        Ok(())
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.min + (self.max - self.min) * rng.random::<f64>()
    }
}

impl Default for AttributeRange {
    fn default() -> Self {
        Self::new(0.3, 0.7)
    }
}

/// Configuration for generating a roster of actors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// How many actors to generate.
    pub count: usize,
    /// Names to draw from (without replacement).
    pub names: Vec<String>,
    /// Range for [`Attributes::skill`].
    pub skill: AttributeRange,
    /// Range for [`Attributes::defense`].
    pub defense: AttributeRange,
    /// Range for [`Attributes::power`].
    pub power: AttributeRange,
    /// Range for [`Attributes::speed`].
    pub speed: AttributeRange,
    /// Range for [`Attributes::consistency`].
    pub consistency: AttributeRange,
    /// Maximum health of every generated actor.
    pub max_health: i32,
    /// Maximum stamina of every generated actor.
    pub max_stamina: i32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: 2,
            names: default_names(),
            skill: AttributeRange::default(),
            defense: AttributeRange::default(),
            power: AttributeRange::default(),
            speed: AttributeRange::default(),
            consistency: AttributeRange::default(),
            max_health: 100,
            max_stamina: 100,
        }
    }
}

impl GeneratorConfig {
    /// Set the number of actors to generate.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Replace the name pool.
    pub fn with_names(mut self, names: Vec<String>) -> Self {
        self.names = names;
        self
    }

    /// Set the skill range.
    pub fn with_skill(mut self, range: AttributeRange) -> Self {
        self.skill = range;
        self
    }

    /// Set maximum health and stamina.
    pub fn with_resources(mut self, max_health: i32, max_stamina: i32) -> Self {
        self.max_health = max_health;
        self.max_stamina = max_stamina;
        self
    }

    /// Reject empty rosters, bad ranges and non-positive resources.
    pub fn validate(&self) -> MechResult<()> {
        if self.count == 0 {
            return Err(MechError::InvalidConfiguration(
                "roster must contain at least one actor".to_string(),
            ));
        }
        self.skill.validate("skill")?;
        self.defense.validate("defense")?;
        self.power.validate("power")?;
        self.speed.validate("speed")?;
        self.consistency.validate("consistency")?;
        if self.max_health <= 0 || self.max_stamina <= 0 {
            return Err(MechError::InvalidConfiguration(format!(
                "max health and stamina must be positive, got {} and {}",
                self.max_health, self.max_stamina
            )));
        }
        Ok(())
    }
}

/// Generate a roster. Ids are assigned sequentially from 1.
pub fn generate<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> MechResult<Vec<Actor>> {
    config.validate()?;

    let mut pool = config.names.clone();
    let mut actors = Vec::with_capacity(config.count);
    for n in 0..config.count {
        let name = if config.names.is_empty() {
            format!("Competitor {}", n + 1)
        } else {
            if pool.is_empty() {
                pool = config.names.clone();
            }
            let base = pool.swap_remove(rng.random_range(0..pool.len()));
            let lap = n / config.names.len();
            if lap == 0 {
                base
            } else {
                format!("{base} {}", lap + 1)
            }
        };

        let attributes = Attributes::new(
            config.skill.draw(rng),
            config.defense.draw(rng),
            config.power.draw(rng),
            config.speed.draw(rng),
            config.consistency.draw(rng),
        )?;
        let id = ActorId(u32::try_from(n + 1).unwrap_or(u32::MAX));
        actors.push(Actor::new(
            id,
            name,
            attributes,
            config.max_health,
            config.max_stamina,
        ));
    }
    log::debug!("generated roster of {} actors", actors.len());
    Ok(actors)
}

fn default_names() -> Vec<String> {
    [
        "Ada", "Bjorn", "Chiara", "Dmitri", "Esme", "Farid", "Greta", "Hiro", "Ines", "Jonas",
        "Kofi", "Lena", "Mateo", "Nadia", "Oskar", "Priya",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn generates_requested_count_with_unique_names() {
        let config = GeneratorConfig::default().with_count(8);
        let mut rng = StdRng::seed_from_u64(42);
        let actors = generate(&config, &mut rng).unwrap();

        assert_eq!(actors.len(), 8);
        let names: HashSet<_> = actors.iter().map(|a| a.name.clone()).collect();
        assert_eq!(names.len(), 8);
        let ids: Vec<_> = actors.iter().map(|a| a.id.0).collect();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn attributes_within_ranges() {
        let config = GeneratorConfig::default()
            .with_count(50)
            .with_skill(AttributeRange::new(0.3, 0.7));
        let mut rng = StdRng::seed_from_u64(7);
        for actor in generate(&config, &mut rng).unwrap() {
            assert!((0.3..=0.7).contains(&actor.attributes.skill));
            assert_eq!(actor.health.current(), 100);
            assert_eq!(actor.stamina.max(), 100);
        }
    }

    #[test]
    fn exhausted_pool_adds_suffix() {
        let config = GeneratorConfig::default()
            .with_count(3)
            .with_names(vec!["Ada".to_string(), "Bo".to_string()]);
        let mut rng = StdRng::seed_from_u64(1);
        let actors = generate(&config, &mut rng).unwrap();
        let names: HashSet<_> = actors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names.len(), 3);
        assert!(actors[2].name.ends_with(" 2"));
    }

    #[test]
    fn empty_pool_uses_placeholder_names() {
        let config = GeneratorConfig::default().with_count(2).with_names(Vec::new());
        let mut rng = StdRng::seed_from_u64(1);
        let actors = generate(&config, &mut rng).unwrap();
        assert_eq!(actors[0].name, "Competitor 1");
        assert_eq!(actors[1].name, "Competitor 2");
    }

    #[test]
    fn same_seed_same_roster() {
        let config = GeneratorConfig::default().with_count(4);
        let a = generate(&config, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = generate(&config, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_configs_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate(&GeneratorConfig::default().with_count(0), &mut rng).is_err());
        assert!(
            generate(
                &GeneratorConfig::default().with_skill(AttributeRange::new(0.8, 0.2)),
                &mut rng
            )
            .is_err()
        );
        assert!(
            generate(
                &GeneratorConfig::default().with_skill(AttributeRange::new(0.5, 1.5)),
                &mut rng
            )
            .is_err()
        );
        assert!(generate(&GeneratorConfig::default().with_resources(0, 10), &mut rng).is_err());
    }

    #[test]
    fn config_from_partial_json() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{"count": 8, "skill": {"min": 0.3, "max": 0.7}}"#).unwrap();
        assert_eq!(config.count, 8);
        assert_eq!(config.max_health, 100);
        assert!(!config.names.is_empty());
    }
}
