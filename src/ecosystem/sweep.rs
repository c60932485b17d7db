//! Headless batch runs: one independent ecosystem per seed, run in parallel.
//!
//! Parallelism is across ecosystems only; every ecosystem still ticks sequentially.

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use super::{Ecosystem, EcosystemConfig};
use crate::error::ConfigError;
use crate::organisms::EcosystemStats;

/// Result of running one seed for a fixed number of ticks
#[derive(Debug, Clone, Serialize)]
pub struct SweepOutcome {
    pub seed: u64,
    pub stats: EcosystemStats,
    /// First tick at which no herbivore or carnivore was left
    pub consumers_extinct_at: Option<u64>,
}

/// Run `ticks` ticks for every seed in `seeds`. Outcomes come back in seed order.
pub fn run_seeds(
    config: &EcosystemConfig,
    seeds: &[u64],
    ticks: u64,
) -> Result<Vec<SweepOutcome>, ConfigError> {
    config.validate()?;
    info!("Sweeping {} seeds for {} ticks", seeds.len(), ticks);

    seeds
        .par_iter()
        .map(|&seed| run_one(config.clone().with_seed(seed), ticks))
        .collect()
}

fn run_one(config: EcosystemConfig, ticks: u64) -> Result<SweepOutcome, ConfigError> {
    let seed = config.random_seed.unwrap_or_default();
    let mut ecosystem = Ecosystem::new(config)?;
    let mut consumers_extinct_at = None;

    for _ in 0..ticks {
        ecosystem.tick();
        if consumers_extinct_at.is_none() && ecosystem.stats().consumers() == 0 {
            consumers_extinct_at = Some(ecosystem.current_tick());
        }
    }

    Ok(SweepOutcome {
        seed,
        stats: ecosystem.stats().clone(),
        consumers_extinct_at,
    })
}
