use fastrand::Rng;

/// Create the simulation RNG. A seed makes the run reproducible.
pub fn create_rng(seed: Option<u64>) -> Rng {
    match seed {
        Some(seed) => Rng::with_seed(seed),
        None => Rng::new(),
    }
}

/// Uniform sample in `[min, max)`.
pub fn uniform(rng: &mut Rng, min: f32, max: f32) -> f32 {
    min + rng.f32() * (max - min)
}
