//! Trophic ecosystem simulator.
//!
//! Producers photosynthesize, herbivores graze on producers and carnivores hunt herbivores.
//! Every organism carries heritable traits that mutate on reproduction. [`ecosystem::Ecosystem`]
//! owns the population and advances it one tick at a time.

pub mod ecosystem;
pub mod error;
pub mod organisms;
pub mod rng;

pub use ecosystem::{Ecosystem, EcosystemConfig, EcosystemPlugin, Lifecycle, WorldBounds};
pub use error::ConfigError;
