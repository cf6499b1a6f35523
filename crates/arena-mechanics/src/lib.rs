//! Match mechanics for Arena.
//!
//! Provides the participants of a match ([`Actor`]), clamped resource
//! tracks, the weighted-random [`Sampler`] that turns attributes into
//! discrete [`Outcome`]s, the pure [`apply_outcome`] mutator, and a
//! seeded roster generator.

pub mod actor;
pub mod apply;
pub mod error;
pub mod generator;
pub mod outcome;
pub mod sampler;
pub mod track;

pub use actor::{Actor, ActorId, Attributes};
pub use apply::{ActionCosts, apply_outcome};
pub use error::{MechError, MechResult};
pub use generator::{AttributeRange, GeneratorConfig, generate};
pub use outcome::{Outcome, OutcomeCategory, Side};
pub use sampler::{ActionWeights, SampleContext, Sampler, SamplerConfig};
pub use track::Track;
