use fastrand::Rng;
use glam::Vec2;
use serde::Serialize;

use crate::ecosystem::WorldBounds;
use crate::organisms::components::*;
use crate::organisms::tuning::EcosystemTuning;
use crate::rng::uniform;

/// What an organism did during its last update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorState {
    /// Not updated yet (newborn)
    Idle,
    /// Producer tick: no movement, periodic energy gain
    Photosynthesizing,
    /// Prey inside capture radius; feed attempted, no movement
    Eating,
    /// Prey visible but out of reach; moved toward it
    Chasing,
    /// Nothing edible in sight; random walk
    Wandering,
    /// Eaten earlier in the same tick before getting to act
    Captured,
}

/// Behavior chosen for one consumer, with the index of the prey it concerns
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    Eat { target: usize },
    Chase { target: usize },
    Wander,
}

/// Nearest organism `seeker` may eat, within its vision radius.
///
/// Scans the whole population in order, skipping the seeker itself. Candidates at exactly
/// the same distance resolve to the one encountered first. Zero-energy organisms are not
/// filtered out: a prey already captured this tick can be targeted again.
pub fn nearest_eligible_target(population: &[Organism], seeker: usize) -> Option<(usize, f32)> {
    let me = population.get(seeker)?;
    if !me.trophic_type.is_consumer() {
        return None;
    }

    let mut best: Option<(usize, f32)> = None;
    for (index, other) in population.iter().enumerate() {
        if index == seeker || !me.trophic_type.preys_on(other.trophic_type) {
            continue;
        }

        let distance = me.distance_to(other);
        if distance > me.genes.vision_radius {
            continue;
        }

        // Strict comparison keeps the first of equidistant candidates
        if best.map_or(true, |(_, nearest)| distance < nearest) {
            best = Some((index, distance));
        }
    }
    best
}

/// Pick a consumer's action against the current population
pub fn decide_behavior(population: &[Organism], index: usize) -> Decision {
    match nearest_eligible_target(population, index) {
        Some((target, distance)) if distance < population[index].genes.size => {
            Decision::Eat { target }
        }
        Some((target, _)) => Decision::Chase { target },
        None => Decision::Wander,
    }
}

/// Advance organism `index` by one tick. Returns whether it is still alive.
///
/// Mutates only `population[index]`, except that a successful feed zeroes the prey's
/// energy. Writes are immediately visible to organisms updated later in the same sweep.
pub fn update_organism(
    population: &mut [Organism],
    index: usize,
    bounds: &WorldBounds,
    tuning: &EcosystemTuning,
    rng: &mut Rng,
) -> bool {
    let organism = &mut population[index];
    organism.age += 1;
    organism.ticks_since_fed += 1;
    organism.ticks_since_reproduction += 1;

    // Every organism enters the tick with positive energy; zero means a predator got here first
    if organism.energy.is_dead() {
        organism.behavior = BehaviorState::Captured;
        return false;
    }

    if organism.trophic_type == TrophicType::Producer {
        organism.photosynthesize(tuning);
    } else {
        match decide_behavior(population, index) {
            Decision::Eat { target } => {
                feed(population, index, target, tuning);
                population[index].behavior = BehaviorState::Eating;
            }
            Decision::Chase { target } => {
                let target_position = population[target].position;
                let hunter = &mut population[index];
                let offset = target_position - hunter.position;
                hunter.heading = offset.y.atan2(offset.x);
                hunter.move_forward(bounds);
                hunter.behavior = BehaviorState::Chasing;
            }
            Decision::Wander => {
                let wanderer = &mut population[index];
                wanderer.heading += uniform(rng, -tuning.wander_turn, tuning.wander_turn);
                wanderer.move_forward(bounds);
                wanderer.behavior = BehaviorState::Wandering;
            }
        }
    }

    let organism = &mut population[index];
    organism.pay_metabolic_cost(tuning);
    organism.is_alive(tuning)
}

/// Predator `hunter` tries to eat `prey`. Succeeds only when the hunter is at least
/// `capture_size_ratio` of the prey's size; failure changes nothing.
pub fn feed(population: &mut [Organism], hunter: usize, prey: usize, tuning: &EcosystemTuning) -> bool {
    let (prey_size, prey_energy) = {
        let prey = &population[prey];
        (prey.genes.size, prey.energy.current)
    };

    let predator = &mut population[hunter];
    if predator.genes.size < tuning.capture_size_ratio * prey_size {
        return false;
    }

    predator.energy.gain(tuning.prey_energy_transfer * prey_energy);
    predator.ticks_since_fed = 0;
    population[prey].energy.deplete();
    true
}

impl Organism {
    /// Producers gain energy every `photosynthesis_interval` ticks of age
    pub fn photosynthesize(&mut self, tuning: &EcosystemTuning) {
        if self.age % tuning.photosynthesis_interval == 0 {
            self.energy
                .gain(tuning.photosynthesis_gain * self.genes.metabolic_efficiency);
        }
        self.behavior = BehaviorState::Photosynthesizing;
    }

    /// Step `speed` units along the heading, then clamp into the world margin
    pub fn move_forward(&mut self, bounds: &WorldBounds) {
        let step = Vec2::from_angle(self.heading) * self.genes.speed;
        self.position = bounds.clamp(self.position + step);
    }

    /// Energy burned every tick regardless of activity
    pub fn metabolic_cost(&self, tuning: &EcosystemTuning) -> f32 {
        self.genes.size * tuning.metabolic_rate / self.genes.metabolic_efficiency
    }

    pub fn pay_metabolic_cost(&mut self, tuning: &EcosystemTuning) {
        let cost = self.metabolic_cost(tuning);
        self.energy.drain(cost);
    }

    pub fn is_alive(&self, tuning: &EcosystemTuning) -> bool {
        !self.energy.is_dead() && self.age <= tuning.max_age
    }

    pub fn can_reproduce(&self, tuning: &EcosystemTuning) -> bool {
        self.energy.current > self.energy.max * tuning.reproduction_energy_fraction
            && self.ticks_since_reproduction > tuning.reproduction_cooldown
            && self.ticks_since_fed < tuning.reproduction_hunger_limit
    }

    /// Produce one offspring near this organism. The child inherits mutated genes and the
    /// trophic type; the parent keeps `parent_energy_retained` of its energy.
    pub fn reproduce(&mut self, bounds: &WorldBounds, tuning: &EcosystemTuning, rng: &mut Rng) -> Organism {
        let genes = self.genes.inherit(tuning.mutation_intensity, rng);

        let spread = tuning.offspring_spread;
        let offset = Vec2::new(uniform(rng, -spread, spread), uniform(rng, -spread, spread));
        let position = bounds.clamp(self.position + offset);

        let child = Organism::new(
            position,
            self.trophic_type,
            genes,
            tuning.initial_energy_fraction,
            rng,
        );

        self.energy.scale(tuning.parent_energy_retained);
        self.ticks_since_reproduction = 0;
        child
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecosystem::EcosystemConfig;
    use crate::organisms::genetics::GeneticTraits;
    use crate::rng::create_rng;

    fn bounds() -> WorldBounds {
        EcosystemConfig::default().bounds()
    }

    fn organism(kind: TrophicType, x: f32, y: f32, genes: GeneticTraits) -> Organism {
        let mut rng = create_rng(Some(0));
        Organism::new(Vec2::new(x, y), kind, genes, 0.8, &mut rng)
    }

    fn producer(x: f32, y: f32, size: f32) -> Organism {
        organism(TrophicType::Producer, x, y, GeneticTraits::new(0.0, 0.0, size, 100.0, 1.0))
    }

    fn herbivore(x: f32, y: f32, size: f32, vision: f32) -> Organism {
        organism(TrophicType::Herbivore, x, y, GeneticTraits::new(2.0, vision, size, 80.0, 1.0))
    }

    fn carnivore(x: f32, y: f32, size: f32, vision: f32) -> Organism {
        organism(TrophicType::Carnivore, x, y, GeneticTraits::new(3.0, vision, size, 100.0, 1.0))
    }

    #[test]
    fn search_respects_diet_and_vision() {
        let population = vec![
            herbivore(100.0, 100.0, 8.0, 50.0),
            carnivore(110.0, 100.0, 10.0, 80.0), // not food for a herbivore
            producer(160.0, 100.0, 5.0),         // beyond vision
            producer(130.0, 100.0, 5.0),
        ];
        assert_eq!(nearest_eligible_target(&population, 0), Some((3, 30.0)));
        assert_eq!(nearest_eligible_target(&population, 1), Some((0, 10.0)));
    }

    #[test]
    fn vision_boundary_is_inclusive() {
        let population = vec![herbivore(100.0, 100.0, 8.0, 50.0), producer(150.0, 100.0, 5.0)];
        assert_eq!(nearest_eligible_target(&population, 0), Some((1, 50.0)));
    }

    #[test]
    fn producers_never_search() {
        let population = vec![producer(100.0, 100.0, 5.0), producer(101.0, 100.0, 5.0)];
        assert_eq!(nearest_eligible_target(&population, 0), None);
    }

    #[test]
    fn equidistant_targets_resolve_to_first_in_order() {
        let population = vec![
            producer(120.0, 100.0, 5.0),
            herbivore(100.0, 100.0, 8.0, 50.0),
            producer(80.0, 100.0, 5.0),
            producer(100.0, 120.0, 5.0),
        ];
        assert_eq!(nearest_eligible_target(&population, 1), Some((0, 20.0)));
    }

    #[test]
    fn herbivore_feeds_on_producer_in_capture_range() {
        let tuning = EcosystemTuning::default();
        let mut rng = create_rng(Some(1));
        let mut population = vec![herbivore(100.0, 100.0, 8.0, 50.0), producer(105.0, 100.0, 6.0)];
        population[0].energy = Energy::with_energy(80.0, 40.0);
        let prey_energy = population[1].energy.current;

        assert_eq!(decide_behavior(&population, 0), Decision::Eat { target: 1 });
        let alive = update_organism(&mut population, 0, &bounds(), &tuning, &mut rng);

        assert!(alive);
        let herbivore = &population[0];
        let expected = (40.0 + 0.6 * prey_energy).min(80.0) - herbivore.metabolic_cost(&tuning);
        assert!((herbivore.energy.current - expected).abs() < 1e-4);
        assert_eq!(herbivore.position, Vec2::new(100.0, 100.0));
        assert_eq!(herbivore.ticks_since_fed, 0);
        assert_eq!(herbivore.behavior, BehaviorState::Eating);
        assert_eq!(population[1].energy.current, 0.0);
    }

    #[test]
    fn undersized_predator_wastes_the_tick() {
        let tuning = EcosystemTuning::default();
        let mut rng = create_rng(Some(1));
        // 5 < 0.8 * 10: too small to eat
        let mut population = vec![herbivore(100.0, 100.0, 5.0, 50.0), producer(103.0, 100.0, 10.0)];
        let before = population[0].energy.current;
        let prey_before = population[1].energy.current;

        update_organism(&mut population, 0, &bounds(), &tuning, &mut rng);

        let herbivore = &population[0];
        assert_eq!(herbivore.behavior, BehaviorState::Eating);
        assert_eq!(herbivore.position, Vec2::new(100.0, 100.0));
        assert!((herbivore.energy.current - (before - herbivore.metabolic_cost(&tuning))).abs() < 1e-5);
        assert_eq!(herbivore.ticks_since_fed, 1);
        assert_eq!(population[1].energy.current, prey_before);
    }

    #[test]
    fn chaser_moves_toward_prey() {
        let tuning = EcosystemTuning::default();
        let mut rng = create_rng(Some(1));
        let mut population = vec![carnivore(100.0, 100.0, 10.0, 80.0), herbivore(100.0, 160.0, 8.0, 50.0)];

        update_organism(&mut population, 0, &bounds(), &tuning, &mut rng);

        let hunter = &population[0];
        assert_eq!(hunter.behavior, BehaviorState::Chasing);
        assert!((hunter.heading - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert!((hunter.position.y - 103.0).abs() < 1e-4);
        assert!((hunter.position.x - 100.0).abs() < 1e-4);
    }

    #[test]
    fn wanderer_turns_at_most_wander_turn() {
        let tuning = EcosystemTuning::default();
        let mut rng = create_rng(Some(4));
        let mut population = vec![herbivore(600.0, 400.0, 8.0, 50.0)];
        for _ in 0..50 {
            let heading = population[0].heading;
            update_organism(&mut population, 0, &bounds(), &tuning, &mut rng);
            let turned = population[0].heading - heading;
            assert!(turned.abs() <= 0.3 + 1e-6);
            assert_eq!(population[0].behavior, BehaviorState::Wandering);
        }
    }

    #[test]
    fn movement_is_clamped_to_margin() {
        let mut hunter = carnivore(11.0, 400.0, 10.0, 80.0);
        hunter.heading = std::f32::consts::PI;
        hunter.move_forward(&bounds());
        assert!((hunter.position.x - 10.0).abs() < 1e-5);
    }

    #[test]
    fn producer_gains_on_tenth_tick() {
        let tuning = EcosystemTuning::default();
        let mut rng = create_rng(Some(1));
        let mut population = vec![producer(300.0, 300.0, 5.0)];
        population[0].energy = Energy::with_energy(100.0, 80.0);
        let cost = population[0].metabolic_cost(&tuning);

        for tick in 1..=10 {
            let alive = update_organism(&mut population, 0, &bounds(), &tuning, &mut rng);
            assert!(alive);
            let expected = if tick < 10 {
                80.0 - cost * tick as f32
            } else {
                80.0 + 2.0 - cost * 10.0
            };
            assert!((population[0].energy.current - expected).abs() < 1e-4, "tick {tick}");
        }
        assert_eq!(population[0].position, Vec2::new(300.0, 300.0));
    }

    #[test]
    fn captured_prey_reports_dead_before_acting() {
        let tuning = EcosystemTuning::default();
        let mut rng = create_rng(Some(1));
        let mut population = vec![herbivore(100.0, 100.0, 8.0, 50.0), producer(104.0, 100.0, 6.0)];
        // Producer turns 9 -> 10 this tick: photosynthesis would otherwise revive it
        population[1].age = 9;

        assert!(update_organism(&mut population, 0, &bounds(), &tuning, &mut rng));
        assert!(!update_organism(&mut population, 1, &bounds(), &tuning, &mut rng));
        assert_eq!(population[1].behavior, BehaviorState::Captured);
        assert_eq!(population[1].age, 10);
    }

    #[test]
    fn second_predator_gets_nothing_from_zeroed_prey() {
        let tuning = EcosystemTuning::default();
        let mut rng = create_rng(Some(1));
        let mut population = vec![
            carnivore(100.0, 100.0, 12.0, 80.0),
            carnivore(108.0, 100.0, 12.0, 80.0),
            herbivore(104.0, 100.0, 8.0, 50.0),
        ];
        population[1].energy = Energy::with_energy(100.0, 50.0);
        population[1].ticks_since_fed = 120;

        update_organism(&mut population, 0, &bounds(), &tuning, &mut rng);
        assert_eq!(population[2].energy.current, 0.0);

        update_organism(&mut population, 1, &bounds(), &tuning, &mut rng);
        let second = &population[1];
        assert_eq!(second.behavior, BehaviorState::Eating);
        assert_eq!(second.ticks_since_fed, 0);
        assert!((second.energy.current - (50.0 - second.metabolic_cost(&tuning))).abs() < 1e-4);
    }

    #[test]
    fn old_age_kills() {
        let tuning = EcosystemTuning::default();
        let mut rng = create_rng(Some(1));
        let mut population = vec![producer(300.0, 300.0, 5.0)];
        population[0].age = 2999;
        assert!(update_organism(&mut population, 0, &bounds(), &tuning, &mut rng));
        assert!(!update_organism(&mut population, 0, &bounds(), &tuning, &mut rng));
    }

    #[test]
    fn starvation_kills() {
        let tuning = EcosystemTuning::default();
        let mut rng = create_rng(Some(1));
        let mut population = vec![herbivore(600.0, 400.0, 8.0, 50.0)];
        population[0].energy = Energy::with_energy(80.0, 0.5);
        assert!(!update_organism(&mut population, 0, &bounds(), &tuning, &mut rng));
        assert_eq!(population[0].energy.current, 0.0);
    }

    #[test]
    fn reproduction_eligibility_needs_all_three_conditions() {
        let tuning = EcosystemTuning::default();
        let mut parent = herbivore(200.0, 200.0, 8.0, 50.0);
        parent.energy = Energy::with_energy(80.0, 60.0);
        parent.ticks_since_reproduction = 501;
        parent.ticks_since_fed = 10;
        assert!(parent.can_reproduce(&tuning));

        let mut hungry = parent.clone();
        hungry.ticks_since_fed = 200;
        assert!(!hungry.can_reproduce(&tuning));

        let mut recent = parent.clone();
        recent.ticks_since_reproduction = 500;
        assert!(!recent.can_reproduce(&tuning));

        let mut weak = parent;
        weak.energy = Energy::with_energy(80.0, 55.0);
        assert!(!weak.can_reproduce(&tuning));
    }

    #[test]
    fn offspring_follow_reproduction_law() {
        let tuning = EcosystemTuning::default();
        let bounds = bounds();
        let mut rng = create_rng(Some(21));
        for _ in 0..200 {
            let mut parent = carnivore(15.0, 400.0, 10.0, 80.0);
            parent.energy = Energy::with_energy(100.0, 90.0);
            parent.ticks_since_reproduction = 700;

            let child = parent.reproduce(&bounds, &tuning, &mut rng);

            assert_eq!(child.trophic_type, TrophicType::Carnivore);
            assert!((parent.energy.current - 54.0).abs() < 1e-4);
            assert_eq!(parent.ticks_since_reproduction, 0);
            assert!((child.position.x - parent.position.x).abs() <= 30.0);
            assert!((child.position.y - parent.position.y).abs() <= 30.0);
            assert!(bounds.contains(child.position));
            assert!(child.genes.size >= 10.0 * 0.95 - 1e-4 && child.genes.size <= 10.0 * 1.05 + 1e-4);
            assert!(child.genes.speed >= 3.0 * 0.95 - 1e-4 && child.genes.speed <= 3.0 * 1.05 + 1e-4);
            assert!((child.energy.current - 0.8 * child.genes.max_energy).abs() < 1e-3);
            assert_eq!(child.age, 0);
            assert_eq!(child.behavior, BehaviorState::Idle);
        }
    }
}
