use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::organisms::components::TrophicType;

/// Rule constants of the ecosystem. Every field can be overridden from the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcosystemTuning {
    // Initial population
    pub initial_producers: usize,
    pub initial_herbivores: usize,
    pub initial_carnivores: usize,
    /// Distance from each edge kept free when placing spawned organisms
    pub spawn_inset: f32,
    /// Distance from each edge organisms are clamped to
    pub boundary_margin: f32,
    /// Fraction of max energy a newborn starts with
    pub initial_energy_fraction: f32,

    // Photosynthesis
    pub photosynthesis_interval: u32,
    pub photosynthesis_gain: f32,

    // Metabolism and lifespan
    /// Energy cost per tick is `size * metabolic_rate / efficiency`
    pub metabolic_rate: f32,
    pub max_age: u32,

    // Foraging
    /// Predator must be at least this fraction of the prey's size to eat it
    pub capture_size_ratio: f32,
    /// Fraction of the prey's energy passed to the predator
    pub prey_energy_transfer: f32,
    /// Max heading perturbation (radians) while wandering
    pub wander_turn: f32,

    // Reproduction
    pub reproduction_energy_fraction: f32,
    pub reproduction_cooldown: u32,
    /// Must have fed more recently than this to reproduce
    pub reproduction_hunger_limit: u32,
    pub reproduction_chance: f32,
    pub mutation_intensity: f32,
    pub offspring_spread: f32,
    pub parent_energy_retained: f32,

    // Producer regeneration
    pub regeneration_interval: u64,
    pub regeneration_threshold: usize,
    pub regeneration_batch: usize,

    // Statistics
    pub ticks_per_generation: u64,
    pub stats_log_interval: u64,
}

impl Default for EcosystemTuning {
    fn default() -> Self {
        Self {
            initial_producers: 50,
            initial_herbivores: 20,
            initial_carnivores: 5,
            spawn_inset: 50.0,
            boundary_margin: 10.0,
            initial_energy_fraction: 0.8,

            photosynthesis_interval: 10,
            photosynthesis_gain: 2.0,

            metabolic_rate: 0.1,
            max_age: 3000,

            capture_size_ratio: 0.8,
            prey_energy_transfer: 0.6,
            wander_turn: 0.3,

            reproduction_energy_fraction: 0.7,
            reproduction_cooldown: 500,
            reproduction_hunger_limit: 200,
            reproduction_chance: 0.01, // per tick, once eligible
            mutation_intensity: 0.05,
            offspring_spread: 30.0,
            parent_energy_retained: 0.6,

            regeneration_interval: 100,
            regeneration_threshold: 30,
            regeneration_batch: 5,

            ticks_per_generation: 1000,
            stats_log_interval: 500,
        }
    }
}

impl EcosystemTuning {
    /// Reject values that would make a rule ill-defined (division or modulo by zero,
    /// probabilities outside [0, 1], negative distances).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.photosynthesis_interval == 0 {
            return Err(ConfigError::InvalidTuning("photosynthesis_interval must be positive"));
        }
        if self.regeneration_interval == 0 {
            return Err(ConfigError::InvalidTuning("regeneration_interval must be positive"));
        }
        if self.ticks_per_generation == 0 {
            return Err(ConfigError::InvalidTuning("ticks_per_generation must be positive"));
        }
        if !(0.0..=1.0).contains(&self.reproduction_chance) {
            return Err(ConfigError::InvalidTuning("reproduction_chance must lie in [0, 1]"));
        }
        if !(0.0..1.0).contains(&self.mutation_intensity) {
            return Err(ConfigError::InvalidTuning("mutation_intensity must lie in [0, 1)"));
        }
        let fractions = [
            self.initial_energy_fraction,
            self.prey_energy_transfer,
            self.parent_energy_retained,
            self.reproduction_energy_fraction,
        ];
        if fractions.iter().any(|f| !(0.0..=1.0).contains(f)) {
            return Err(ConfigError::InvalidTuning("energy fractions must lie in [0, 1]"));
        }
        let non_negative = [
            self.spawn_inset,
            self.boundary_margin,
            self.offspring_spread,
            self.wander_turn,
            self.metabolic_rate,
            self.photosynthesis_gain,
            self.capture_size_ratio,
        ];
        if non_negative.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(ConfigError::InvalidTuning("rates and distances must be finite and non-negative"));
        }
        Ok(())
    }

    /// Smallest world dimension that leaves room for the boundary margin
    pub fn min_world_extent(&self) -> f32 {
        2.0 * self.boundary_margin
    }

    pub fn initial_count(&self, trophic_type: TrophicType) -> usize {
        match trophic_type {
            TrophicType::Producer => self.initial_producers,
            TrophicType::Herbivore => self.initial_herbivores,
            TrophicType::Carnivore => self.initial_carnivores,
        }
    }
}
