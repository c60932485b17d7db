use std::collections::HashMap;

use serde::Serialize;

use crate::organisms::components::*;

/// Population statistics, recomputed from scratch after every tick
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EcosystemStats {
    pub tick: u64,
    pub producer_count: usize,
    pub herbivore_count: usize,
    pub carnivore_count: usize,
    /// Coarse display clock: `tick / ticks_per_generation`
    pub generation: u64,
    /// Offspring appended during the last tick
    pub births: usize,
    /// Organisms removed during the last tick
    pub deaths: usize,
    /// Producers added by regeneration during the last tick
    pub regenerated: usize,
    /// Average traits per trophic type
    pub trait_averages: HashMap<TrophicType, TraitAverages>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TraitAverages {
    pub avg_size: f32,
    pub avg_energy: f32,
    pub avg_speed: f32,
    pub avg_vision_radius: f32,
    pub count: usize,
}

/// Per-tick turnover figures folded into the stats
#[derive(Debug, Clone, Copy, Default)]
pub struct Turnover {
    pub births: usize,
    pub deaths: usize,
    pub regenerated: usize,
}

impl EcosystemStats {
    pub fn collect(
        organisms: &[Organism],
        tick: u64,
        ticks_per_generation: u64,
        turnover: Turnover,
    ) -> Self {
        let mut stats = Self {
            tick,
            generation: tick / ticks_per_generation.max(1),
            births: turnover.births,
            deaths: turnover.deaths,
            regenerated: turnover.regenerated,
            ..Default::default()
        };

        // (size, energy, speed, vision, count)
        let mut sums: HashMap<TrophicType, (f32, f32, f32, f32, usize)> = HashMap::new();

        for organism in organisms {
            match organism.trophic_type {
                TrophicType::Producer => stats.producer_count += 1,
                TrophicType::Herbivore => stats.herbivore_count += 1,
                TrophicType::Carnivore => stats.carnivore_count += 1,
            }

            let entry = sums
                .entry(organism.trophic_type)
                .or_insert((0.0, 0.0, 0.0, 0.0, 0));
            entry.0 += organism.genes.size;
            entry.1 += organism.energy.current;
            entry.2 += organism.genes.speed;
            entry.3 += organism.genes.vision_radius;
            entry.4 += 1;
        }

        for (trophic_type, (size_sum, energy_sum, speed_sum, vision_sum, count)) in sums {
            let n = count as f32;
            stats.trait_averages.insert(
                trophic_type,
                TraitAverages {
                    avg_size: size_sum / n,
                    avg_energy: energy_sum / n,
                    avg_speed: speed_sum / n,
                    avg_vision_radius: vision_sum / n,
                    count,
                },
            );
        }

        stats
    }

    pub fn count(&self, trophic_type: TrophicType) -> usize {
        match trophic_type {
            TrophicType::Producer => self.producer_count,
            TrophicType::Herbivore => self.herbivore_count,
            TrophicType::Carnivore => self.carnivore_count,
        }
    }

    pub fn total(&self) -> usize {
        self.producer_count + self.herbivore_count + self.carnivore_count
    }

    pub fn consumers(&self) -> usize {
        self.herbivore_count + self.carnivore_count
    }

    /// One-line summary used by the periodic log and the window title
    pub fn summary(&self) -> String {
        format!(
            "Tick {} | Producers: {} | Herbivores: {} | Carnivores: {} | Total: {} | Generation: {}",
            self.tick,
            self.producer_count,
            self.herbivore_count,
            self.carnivore_count,
            self.total(),
            self.generation
        )
    }
}
