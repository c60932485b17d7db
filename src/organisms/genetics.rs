use fastrand::Rng;
use serde::{Deserialize, Serialize};

use crate::organisms::components::TrophicType;
use crate::rng::uniform;

/// Inclusive range a trait is clamped into after mutation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraitRange {
    pub min: f32,
    pub max: f32,
}

impl TraitRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    fn sample(&self, rng: &mut Rng) -> f32 {
        uniform(rng, self.min, self.max)
    }
}

/// Clamp ranges applied after every mutation
pub mod limits {
    use super::TraitRange;

    pub const SPEED: TraitRange = TraitRange::new(0.5, 5.0);
    pub const VISION_RADIUS: TraitRange = TraitRange::new(20.0, 150.0);
    pub const SIZE: TraitRange = TraitRange::new(3.0, 20.0);
    pub const MAX_ENERGY: TraitRange = TraitRange::new(50.0, 200.0);
    pub const METABOLIC_EFFICIENCY: TraitRange = TraitRange::new(0.5, 2.0);
}

/// Species-specific ranges for freshly generated (non-inherited) traits.
/// `None` means the trait is fixed at zero.
struct InitialRanges {
    speed: Option<TraitRange>,
    vision_radius: Option<TraitRange>,
    size: TraitRange,
    max_energy: TraitRange,
    metabolic_efficiency: TraitRange,
}

impl InitialRanges {
    fn for_type(trophic_type: TrophicType) -> Self {
        match trophic_type {
            TrophicType::Producer => Self {
                speed: None,
                vision_radius: None,
                size: TraitRange::new(5.0, 15.0),
                max_energy: TraitRange::new(80.0, 120.0),
                metabolic_efficiency: TraitRange::new(0.8, 1.2),
            },
            TrophicType::Herbivore => Self {
                speed: Some(TraitRange::new(1.0, 3.0)),
                vision_radius: Some(TraitRange::new(40.0, 80.0)),
                size: TraitRange::new(6.0, 12.0),
                max_energy: TraitRange::new(60.0, 100.0),
                metabolic_efficiency: TraitRange::new(0.7, 1.1),
            },
            TrophicType::Carnivore => Self {
                speed: Some(TraitRange::new(1.5, 4.0)),
                vision_radius: Some(TraitRange::new(60.0, 120.0)),
                size: TraitRange::new(8.0, 16.0),
                max_energy: TraitRange::new(70.0, 110.0),
                metabolic_efficiency: TraitRange::new(0.6, 1.0),
            },
        }
    }
}

/// Heritable trait vector of one organism
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneticTraits {
    /// Distance covered per tick while moving
    pub speed: f32,
    /// Radius within which prey is detected
    pub vision_radius: f32,
    /// Body size: capture radius and metabolic load
    pub size: f32,
    /// Energy capacity
    pub max_energy: f32,
    /// Divides metabolic cost, multiplies photosynthesis
    pub metabolic_efficiency: f32,
}

impl GeneticTraits {
    pub fn new(
        speed: f32,
        vision_radius: f32,
        size: f32,
        max_energy: f32,
        metabolic_efficiency: f32,
    ) -> Self {
        Self {
            speed,
            vision_radius,
            size,
            max_energy,
            metabolic_efficiency,
        }
    }

    /// Draw a fresh trait vector from the species-specific ranges.
    /// Producers get speed and vision of zero.
    pub fn generate_initial(trophic_type: TrophicType, rng: &mut Rng) -> Self {
        let ranges = InitialRanges::for_type(trophic_type);
        let speed = ranges.speed.map_or(0.0, |r| r.sample(rng));
        let vision_radius = ranges.vision_radius.map_or(0.0, |r| r.sample(rng));
        Self {
            speed,
            vision_radius,
            size: ranges.size.sample(rng),
            max_energy: ranges.max_energy.sample(rng),
            metabolic_efficiency: ranges.metabolic_efficiency.sample(rng),
        }
    }

    /// Sessile genomes (producers) never move or look around
    pub fn is_sessile(&self) -> bool {
        self.speed == 0.0 && self.vision_radius == 0.0
    }

    /// Scale every trait by an independent factor in `[1 - intensity, 1 + intensity]`,
    /// then clamp into its limit range. Sessile genomes keep speed and vision at zero.
    pub fn mutate(&mut self, intensity: f32, rng: &mut Rng) {
        let sessile = self.is_sessile();
        let mut factor = || uniform(rng, 1.0 - intensity, 1.0 + intensity);

        let speed = self.speed * factor();
        let vision_radius = self.vision_radius * factor();
        self.size = limits::SIZE.clamp(self.size * factor());
        self.max_energy = limits::MAX_ENERGY.clamp(self.max_energy * factor());
        self.metabolic_efficiency =
            limits::METABOLIC_EFFICIENCY.clamp(self.metabolic_efficiency * factor());

        if sessile {
            self.speed = 0.0;
            self.vision_radius = 0.0;
        } else {
            self.speed = limits::SPEED.clamp(speed);
            self.vision_radius = limits::VISION_RADIUS.clamp(vision_radius);
        }
    }

    /// Copy of these traits with one round of mutation applied
    pub fn inherit(&self, intensity: f32, rng: &mut Rng) -> Self {
        let mut child = self.clone();
        child.mutate(intensity, rng);
        child
    }

    /// True when every trait sits inside its clamp range
    /// (speed and vision are exempt for sessile genomes).
    pub fn within_limits(&self) -> bool {
        let mobility_ok = self.is_sessile()
            || (limits::SPEED.contains(self.speed)
                && limits::VISION_RADIUS.contains(self.vision_radius));
        mobility_ok
            && limits::SIZE.contains(self.size)
            && limits::MAX_ENERGY.contains(self.max_energy)
            && limits::METABOLIC_EFFICIENCY.contains(self.metabolic_efficiency)
    }
}
