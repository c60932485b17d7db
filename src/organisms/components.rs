use fastrand::Rng;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::organisms::behavior::BehaviorState;
use crate::organisms::genetics::GeneticTraits;

/// Ecological role of an organism. Fixed at creation and inherited unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrophicType {
    /// Photosynthesizes, never moves
    Producer,
    /// Eats producers
    Herbivore,
    /// Eats herbivores
    Carnivore,
}

impl TrophicType {
    pub const ALL: [TrophicType; 3] = [
        TrophicType::Producer,
        TrophicType::Herbivore,
        TrophicType::Carnivore,
    ];

    /// Whether an organism of this type may eat one of `prey` type
    pub fn preys_on(self, prey: TrophicType) -> bool {
        matches!(
            (self, prey),
            (TrophicType::Herbivore, TrophicType::Producer)
                | (TrophicType::Carnivore, TrophicType::Herbivore)
        )
    }

    pub fn is_consumer(self) -> bool {
        self != TrophicType::Producer
    }
}

/// Current energy level. `current` never exceeds `max` and never drops below 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Energy {
    pub current: f32,
    pub max: f32,
}

impl Energy {
    pub fn with_energy(max: f32, current: f32) -> Self {
        Self {
            current: current.clamp(0.0, max),
            max,
        }
    }

    pub fn ratio(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    /// Add energy, capped at `max`
    pub fn gain(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }

    /// Remove energy, floored at zero
    pub fn drain(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }

    pub fn scale(&mut self, factor: f32) {
        self.current = (self.current * factor).clamp(0.0, self.max);
    }

    pub fn deplete(&mut self) {
        self.current = 0.0;
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}

/// One living entity of the ecosystem
#[derive(Debug, Clone, PartialEq)]
pub struct Organism {
    pub position: Vec2,
    pub trophic_type: TrophicType,
    pub genes: GeneticTraits,
    pub energy: Energy,
    /// Ticks lived
    pub age: u32,
    /// Radians
    pub heading: f32,
    pub ticks_since_fed: u32,
    pub ticks_since_reproduction: u32,
    /// What the organism did during its last update
    pub behavior: BehaviorState,
}

impl Organism {
    /// Fresh organism at `initial_energy_fraction` of its capacity, random heading, timers at zero.
    pub fn new(
        position: Vec2,
        trophic_type: TrophicType,
        genes: GeneticTraits,
        initial_energy_fraction: f32,
        rng: &mut Rng,
    ) -> Self {
        let max_energy = genes.max_energy;
        Self {
            position,
            trophic_type,
            genes,
            energy: Energy::with_energy(max_energy, max_energy * initial_energy_fraction),
            age: 0,
            heading: rng.f32() * std::f32::consts::TAU,
            ticks_since_fed: 0,
            ticks_since_reproduction: 0,
            behavior: BehaviorState::Idle,
        }
    }

    /// New organism with freshly generated species traits
    pub fn spawn(
        position: Vec2,
        trophic_type: TrophicType,
        initial_energy_fraction: f32,
        rng: &mut Rng,
    ) -> Self {
        let genes = GeneticTraits::generate_initial(trophic_type, rng);
        Self::new(position, trophic_type, genes, initial_energy_fraction, rng)
    }

    pub fn distance_to(&self, other: &Organism) -> f32 {
        self.position.distance(other.position)
    }

    /// Read-only view handed to presentation
    pub fn view(&self) -> OrganismView {
        OrganismView {
            position: self.position,
            trophic_type: self.trophic_type,
            size: self.genes.size,
            energy: self.energy.current,
            max_energy: self.energy.max,
            behavior: self.behavior,
        }
    }
}

/// What the presentation layer may observe about one organism
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrganismView {
    pub position: Vec2,
    pub trophic_type: TrophicType,
    pub size: f32,
    pub energy: f32,
    pub max_energy: f32,
    pub behavior: BehaviorState,
}

impl OrganismView {
    pub fn energy_ratio(&self) -> f32 {
        Energy::with_energy(self.max_energy, self.energy).ratio()
    }
}
