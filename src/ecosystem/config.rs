use std::path::Path;

use fastrand::Rng;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::organisms::EcosystemTuning;
use crate::rng::uniform;

/// Construction parameters of an ecosystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcosystemConfig {
    pub world_width: f32,
    pub world_height: f32,
    /// Fixed seed for reproducible runs; `None` draws from entropy
    pub random_seed: Option<u64>,
    pub tuning: EcosystemTuning,
}

impl Default for EcosystemConfig {
    fn default() -> Self {
        Self {
            world_width: 1200.0,
            world_height: 800.0,
            random_seed: None,
            tuning: EcosystemTuning::default(),
        }
    }
}

impl EcosystemConfig {
    pub fn new(world_width: f32, world_height: f32) -> Self {
        Self {
            world_width,
            world_height,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_tuning(mut self, tuning: EcosystemTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Fails when either dimension leaves no room inside the boundary margin,
    /// or when the tuning is ill-defined.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tuning.validate()?;
        let min = self.tuning.min_world_extent();
        // Negated comparison so NaN dimensions are rejected too
        if !(self.world_width > min && self.world_height > min) {
            return Err(ConfigError::DegenerateWorld {
                width: self.world_width,
                height: self.world_height,
                min,
            });
        }
        Ok(())
    }

    pub fn bounds(&self) -> WorldBounds {
        WorldBounds {
            width: self.world_width,
            height: self.world_height,
            margin: self.tuning.boundary_margin,
        }
    }
}

/// World rectangle `[0, width] x [0, height]` with the margin organisms are kept inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl WorldBounds {
    /// Clamp a position into `[margin, extent - margin]` on both axes
    pub fn clamp(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            position.x.clamp(self.margin, self.width - self.margin),
            position.y.clamp(self.margin, self.height - self.margin),
        )
    }

    pub fn contains(&self, position: Vec2) -> bool {
        self.clamp(position) == position
    }

    /// Uniform position at least `inset` from every edge. The inset shrinks
    /// to half the extent on worlds too small to honour it.
    pub fn random_inset_position(&self, inset: f32, rng: &mut Rng) -> Vec2 {
        let x_inset = inset.min(self.width / 2.0);
        let y_inset = inset.min(self.height / 2.0);
        Vec2::new(
            uniform(rng, x_inset, self.width - x_inset),
            uniform(rng, y_inset, self.height - y_inset),
        )
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;

    #[test]
    fn degenerate_worlds_are_rejected() {
        for (w, h) in [(20.0, 800.0), (1200.0, 20.0), (0.0, 0.0), (-5.0, 100.0), (f32::NAN, 100.0)] {
            let result = EcosystemConfig::new(w, h).validate();
            assert!(
                matches!(result, Err(ConfigError::DegenerateWorld { .. })),
                "{w}x{h} should be degenerate"
            );
        }
        assert!(EcosystemConfig::new(21.0, 21.0).validate().is_ok());
    }

    #[test]
    fn clamp_keeps_margin() {
        let bounds = EcosystemConfig::default().bounds();
        assert_eq!(bounds.clamp(Vec2::new(-50.0, 900.0)), Vec2::new(10.0, 790.0));
        assert_eq!(bounds.clamp(Vec2::new(600.0, 400.0)), Vec2::new(600.0, 400.0));
        assert!(!bounds.contains(Vec2::new(5.0, 400.0)));
    }

    #[test]
    fn inset_positions_respect_inset() {
        let bounds = EcosystemConfig::default().bounds();
        let mut rng = create_rng(Some(2));
        for _ in 0..500 {
            let p = bounds.random_inset_position(50.0, &mut rng);
            assert!((50.0..=1150.0).contains(&p.x));
            assert!((50.0..=750.0).contains(&p.y));
        }
    }

    #[test]
    fn small_world_still_has_placement_region() {
        let bounds = EcosystemConfig::new(30.0, 30.0).bounds();
        let mut rng = create_rng(Some(2));
        let p = bounds.random_inset_position(50.0, &mut rng);
        assert_eq!(p, Vec2::new(15.0, 15.0));
        assert!(bounds.contains(p));
    }

    #[test]
    fn json_config_round_trips_through_validation() {
        let config = EcosystemConfig::from_json_str(
            r#"{ "world_width": 640, "world_height": 480, "random_seed": 42, "tuning": { "max_age": 2000 } }"#,
        )
        .unwrap();
        assert_eq!(config.world_width, 640.0);
        assert_eq!(config.random_seed, Some(42));
        assert_eq!(config.tuning.max_age, 2000);
        assert_eq!(config.tuning.initial_herbivores, 20);

        let err = EcosystemConfig::from_json_str(r#"{ "world_width": 10 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::DegenerateWorld { .. }));
    }
}
