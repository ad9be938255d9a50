//! Timed speed pickups placed on waypoints
//!
//! Each level draws fresh pickup spots from the waypoint loop. A pickup is
//! taken by the first car whose sprite box overlaps it and never respawns.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::car::Car;
use super::collision::Rect;
use crate::settings::EffectTuning;

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    /// Raises max velocity
    Boost,
    /// Lowers max velocity
    Slow,
}

/// A pickup on the track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: CollectibleKind,
    pub multiplier: f32,
    /// Effect length in seconds
    pub duration: f64,
    collected: bool,
}

impl Collectible {
    pub fn new(pos: Vec2, kind: CollectibleKind, tuning: &EffectTuning) -> Self {
        let multiplier = match kind {
            CollectibleKind::Boost => tuning.boost_multiplier,
            CollectibleKind::Slow => tuning.slow_multiplier,
        };
        Self {
            pos,
            radius: tuning.pickup_radius,
            kind,
            multiplier,
            duration: tuning.duration_secs,
            collected: false,
        }
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Pickup square (centre ± radius)
    pub fn bounds(&self) -> Rect {
        Rect::around(self.pos, self.radius)
    }

    /// Take the pickup if the car's centred sprite box overlaps it.
    /// True exactly once over the pickup's lifetime.
    pub fn try_collect(&mut self, car: &Car) -> bool {
        if self.collected || !car.centered_bounds().intersects(&self.bounds()) {
            return false;
        }
        self.collected = true;
        true
    }

    /// Take the pickup and, on success, start its effect on the car
    pub fn apply_on_pickup(&mut self, car: &mut Car, now: f64) -> bool {
        if !self.try_collect(car) {
            return false;
        }
        car.apply_effect(self.multiplier, self.duration, now);
        log::debug!(
            "{:?} picked up at ({:.0}, {:.0}): x{} for {}s",
            self.kind,
            self.pos.x,
            self.pos.y,
            self.multiplier,
            self.duration
        );
        true
    }
}

/// Kind pattern for a level: alternating Boost/Slow, starting with Boost,
/// with any surplus of one kind at the end
pub fn kind_pattern(boosts: usize, slows: usize) -> Vec<CollectibleKind> {
    let mut kinds = Vec::with_capacity(boosts + slows);
    let (mut boosts_left, mut slows_left) = (boosts, slows);
    while boosts_left + slows_left > 0 {
        let boost_turn = kinds.len() % 2 == 0;
        if boosts_left > 0 && (boost_turn || slows_left == 0) {
            kinds.push(CollectibleKind::Boost);
            boosts_left -= 1;
        } else {
            kinds.push(CollectibleKind::Slow);
            slows_left -= 1;
        }
    }
    kinds
}

/// Place a level's pickups on distinct waypoints drawn without replacement.
///
/// A path shorter than the pickup count yields one pickup per waypoint.
pub fn spawn<R: Rng + ?Sized>(rng: &mut R, path: &[Vec2], tuning: &EffectTuning) -> Vec<Collectible> {
    let kinds = kind_pattern(tuning.boosts_per_level, tuning.slows_per_level);
    let amount = kinds.len().min(path.len());
    let spots = rand::seq::index::sample(rng, path.len(), amount);
    spots
        .into_iter()
        .zip(kinds)
        .map(|(idx, kind)| Collectible::new(path[idx], kind, tuning))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::CarTuning;
    use crate::sim::car::{Driver, Seat};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn car_centered_at(pos: Vec2) -> Car {
        Car::new(
            Driver::Human(Seat::One),
            &CarTuning::default(),
            pos,
            Vec2::new(20.0, 36.0),
        )
    }

    #[test]
    fn test_kind_pattern_alternates() {
        use CollectibleKind::*;
        assert_eq!(kind_pattern(3, 3), vec![Boost, Slow, Boost, Slow, Boost, Slow]);
        assert_eq!(kind_pattern(1, 3), vec![Boost, Slow, Slow, Slow]);
        assert_eq!(kind_pattern(2, 0), vec![Boost, Boost]);
    }

    #[test]
    fn test_spawn_draws_distinct_waypoints() {
        let path: Vec<Vec2> = (0..22).map(|i| Vec2::new(i as f32 * 10.0, 5.0)).collect();
        let tuning = EffectTuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let pickups = spawn(&mut rng, &path, &tuning);

        assert_eq!(pickups.len(), 6);
        let boosts = pickups.iter().filter(|c| c.kind == CollectibleKind::Boost).count();
        assert_eq!(boosts, 3);
        for (i, a) in pickups.iter().enumerate() {
            assert!(path.contains(&a.pos));
            assert!(!a.is_collected());
            for b in &pickups[i + 1..] {
                assert_ne!(a.pos, b.pos);
            }
        }
    }

    #[test]
    fn test_spawn_is_reproducible_per_seed() {
        let path: Vec<Vec2> = (0..22).map(|i| Vec2::new(i as f32, 0.0)).collect();
        let tuning = EffectTuning::default();
        let a = spawn(&mut Pcg32::seed_from_u64(42), &path, &tuning);
        let b = spawn(&mut Pcg32::seed_from_u64(42), &path, &tuning);
        assert_eq!(a, b);
    }

    #[test]
    fn test_spawn_short_path() {
        let path = vec![Vec2::ZERO, Vec2::ONE];
        let pickups = spawn(&mut Pcg32::seed_from_u64(1), &path, &EffectTuning::default());
        assert_eq!(pickups.len(), 2);
    }

    #[test]
    fn test_collect_requires_overlap() {
        let tuning = EffectTuning::default();
        let mut pickup = Collectible::new(Vec2::new(100.0, 100.0), CollectibleKind::Boost, &tuning);
        // Car box x: 60..80, pickup box x: 85..115
        assert!(!pickup.try_collect(&car_centered_at(Vec2::new(70.0, 100.0))));
        assert!(pickup.try_collect(&car_centered_at(Vec2::new(80.0, 100.0))));
    }

    #[test]
    fn test_pickup_applies_effect() {
        let tuning = EffectTuning::default();
        let mut slow = Collectible::new(Vec2::new(50.0, 50.0), CollectibleKind::Slow, &tuning);
        let mut car = car_centered_at(Vec2::new(50.0, 50.0));
        assert!(slow.apply_on_pickup(&mut car, 10.0));
        assert_eq!(car.speed_multiplier, 0.5);
        assert_eq!(car.max_vel, 2.0);
        assert_eq!(car.effect_expires_at, 13.0);

        // Spent pickups do nothing
        let mut other = car_centered_at(Vec2::new(50.0, 50.0));
        assert!(!slow.apply_on_pickup(&mut other, 11.0));
        assert_eq!(other.speed_multiplier, 1.0);
    }

    proptest! {
        #[test]
        fn prop_collect_succeeds_at_most_once(
            positions in prop::collection::vec((0.0f32..200.0, 0.0f32..200.0), 1..50),
        ) {
            let tuning = EffectTuning::default();
            let mut pickup = Collectible::new(Vec2::new(100.0, 100.0), CollectibleKind::Slow, &tuning);
            let mut successes = 0;
            for (x, y) in positions {
                if pickup.try_collect(&car_centered_at(Vec2::new(x, y))) {
                    successes += 1;
                }
            }
            prop_assert!(successes <= 1);
            prop_assert_eq!(successes == 1, pickup.is_collected());
        }
    }
}
