mod config;
pub mod sweep;
mod systems;

use bevy::prelude::{App, IntoSystemConfigs, Plugin, Update};
use bevy_ecs::prelude::Resource;
use fastrand::Rng;
use smallvec::SmallVec;
use tracing::{debug, info, warn};

pub use config::{EcosystemConfig, WorldBounds};
pub use systems::SimulationControl;

use crate::error::ConfigError;
use crate::organisms::*;
use crate::rng::create_rng;

/// Lifecycle of an ecosystem. Pause and termination belong to whoever drives `tick()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Seeding the initial population
    Initializing,
    /// Ready for `tick()`
    Running,
    /// Discarding the population before reseeding
    Reset,
}

/// The whole simulated population and the rules driving it.
///
/// Owns every organism exclusively; readers get shared slices or snapshots between ticks.
#[derive(Resource)]
pub struct Ecosystem {
    organisms: Vec<Organism>,
    bounds: WorldBounds,
    tuning: EcosystemTuning,
    rng: Rng,
    tick: u64,
    stats: EcosystemStats,
    lifecycle: Lifecycle,
    reset_count: u32,
}

impl Ecosystem {
    /// Validate the config and seed the initial population
    pub fn new(config: EcosystemConfig) -> Result<Self, ConfigError> {
        let mut ecosystem = Self::empty(config)?;
        ecosystem.seed_population();
        Ok(ecosystem)
    }

    /// Build around a caller-provided population instead of the random initial one
    pub fn from_organisms(
        config: EcosystemConfig,
        organisms: Vec<Organism>,
    ) -> Result<Self, ConfigError> {
        let mut ecosystem = Self::empty(config)?;
        for (index, organism) in organisms.iter().enumerate() {
            ecosystem.check_organism(index, organism)?;
        }
        ecosystem.organisms = organisms;
        ecosystem.refresh_stats(Turnover::default());
        ecosystem.lifecycle = Lifecycle::Running;
        Ok(ecosystem)
    }

    fn empty(config: EcosystemConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            organisms: Vec::new(),
            bounds: config.bounds(),
            rng: create_rng(config.random_seed),
            tuning: config.tuning,
            tick: 0,
            stats: EcosystemStats::default(),
            lifecycle: Lifecycle::Initializing,
            reset_count: 0,
        })
    }

    /// Caller-built organisms must already satisfy the tick-boundary invariants
    fn check_organism(&self, index: usize, organism: &Organism) -> Result<(), ConfigError> {
        let reason = if !self.bounds.contains(organism.position) {
            Some("position outside the boundary margin")
        } else if organism.energy.max != organism.genes.max_energy {
            Some("energy capacity differs from max_energy gene")
        } else if !(organism.energy.current > 0.0
            && organism.energy.current <= organism.energy.max)
        {
            Some("energy must be positive and within capacity")
        } else if !organism.genes.within_limits() {
            Some("genes outside their limits")
        } else if organism.trophic_type == TrophicType::Producer && !organism.genes.is_sessile() {
            Some("producers cannot move or see")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ConfigError::InvalidOrganism { index, reason }),
            None => Ok(()),
        }
    }

    fn seed_population(&mut self) {
        self.lifecycle = Lifecycle::Initializing;
        for trophic_type in TrophicType::ALL {
            let count = self.tuning.initial_count(trophic_type);
            self.spawn_fresh(trophic_type, count);
        }
        self.refresh_stats(Turnover::default());
        self.lifecycle = Lifecycle::Running;

        info!(
            "Ecosystem seeded: {} producers, {} herbivores, {} carnivores in {}x{}",
            self.stats.producer_count,
            self.stats.herbivore_count,
            self.stats.carnivore_count,
            self.bounds.width,
            self.bounds.height
        );
    }

    /// Append `count` organisms with fresh traits at random inset positions
    fn spawn_fresh(&mut self, trophic_type: TrophicType, count: usize) {
        self.organisms.reserve(count);
        for _ in 0..count {
            let position = self
                .bounds
                .random_inset_position(self.tuning.spawn_inset, &mut self.rng);
            let organism = Organism::spawn(
                position,
                trophic_type,
                self.tuning.initial_energy_fraction,
                &mut self.rng,
            );
            self.organisms.push(organism);
        }
    }

    /// Advance the whole population by one tick.
    ///
    /// Organisms update in collection order against the live collection, so a prey zeroed
    /// by an earlier predator is seen as dead by everyone after it. Deaths are settled once
    /// the sweep is over: an organism survives only if its update reported it alive and
    /// its energy is still positive. A parent eaten after reproducing keeps its offspring.
    /// Survivors keep their relative order; offspring are appended after them and first
    /// act next tick.
    pub fn tick(&mut self) {
        self.tick += 1;
        let before = self.organisms.len();

        let mut alive_flags = Vec::with_capacity(before);
        let mut births: SmallVec<[Organism; 4]> = SmallVec::new();

        for index in 0..before {
            let alive = update_organism(
                &mut self.organisms,
                index,
                &self.bounds,
                &self.tuning,
                &mut self.rng,
            );
            alive_flags.push(alive);
            if !alive {
                continue;
            }

            let organism = &mut self.organisms[index];
            if organism.can_reproduce(&self.tuning)
                && self.rng.f32() < self.tuning.reproduction_chance
            {
                let child = organism.reproduce(&self.bounds, &self.tuning, &mut self.rng);
                debug!(
                    "{:?} reproduced at ({:.1}, {:.1})",
                    child.trophic_type, child.position.x, child.position.y
                );
                births.push(child);
            }
        }

        // A prey updated before its predator passed its own check; its energy settles it
        let mut alive = alive_flags.into_iter();
        self.organisms
            .retain(|organism| alive.next().unwrap_or(false) && !organism.energy.is_dead());
        let deaths = before - self.organisms.len();
        let birth_count = births.len();
        self.organisms.extend(births);

        let regenerated = self.regenerate_producers();

        let previous = std::mem::take(&mut self.stats);
        self.refresh_stats(Turnover {
            births: birth_count,
            deaths,
            regenerated,
        });
        self.report(&previous);
    }

    /// Every `regeneration_interval` ticks, top up producers when they run scarce
    fn regenerate_producers(&mut self) -> usize {
        if self.tick % self.tuning.regeneration_interval != 0 {
            return 0;
        }

        let producers = self
            .organisms
            .iter()
            .filter(|o| o.trophic_type == TrophicType::Producer)
            .count();
        if producers >= self.tuning.regeneration_threshold {
            return 0;
        }

        let batch = self.tuning.regeneration_batch;
        self.spawn_fresh(TrophicType::Producer, batch);
        debug!(
            "Tick {}: regenerated {} producers ({} left)",
            self.tick, batch, producers
        );
        batch
    }

    fn refresh_stats(&mut self, turnover: Turnover) {
        self.stats = EcosystemStats::collect(
            &self.organisms,
            self.tick,
            self.tuning.ticks_per_generation,
            turnover,
        );
    }

    fn report(&self, previous: &EcosystemStats) {
        for trophic_type in [TrophicType::Herbivore, TrophicType::Carnivore] {
            if previous.count(trophic_type) > 0 && self.stats.count(trophic_type) == 0 {
                warn!("Tick {}: {:?} population went extinct", self.tick, trophic_type);
            }
        }

        if self.tick % self.tuning.stats_log_interval.max(1) == 0 {
            info!("[ECOSYSTEM] {}", self.stats.summary());
        }
    }

    /// Discard the population and reseed it. The random stream carries on, so seeded
    /// runs stay reproducible for the same sequence of ticks and resets.
    pub fn reset(&mut self) {
        self.lifecycle = Lifecycle::Reset;
        info!("Ecosystem reset at tick {}", self.tick);

        self.organisms.clear();
        self.tick = 0;
        self.reset_count += 1;
        self.seed_population();
    }

    pub fn organisms(&self) -> &[Organism] {
        &self.organisms
    }

    /// Presentation-facing copy of every live organism
    pub fn snapshot(&self) -> Vec<OrganismView> {
        self.organisms.iter().map(Organism::view).collect()
    }

    pub fn stats(&self) -> &EcosystemStats {
        &self.stats
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    pub fn tuning(&self) -> &EcosystemTuning {
        &self.tuning
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn reset_count(&self) -> u32 {
        self.reset_count
    }
}

/// Drives an `Ecosystem` resource from the bevy schedule: keyboard control, one tick
/// per frame while running, gizmo drawing and a statistics title bar.
pub struct EcosystemPlugin;

impl Plugin for EcosystemPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationControl>().add_systems(
            Update,
            (
                systems::handle_controls,
                systems::advance_simulation,
                systems::draw_organisms,
                systems::update_window_title,
            )
                .chain(),
        );
    }
}
