//! Race state and HUD snapshots
//!
//! Everything a restart throws away lives in `RaceState`. Snapshots are the
//! read-only view handed to the presentation layer each frame.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::autopilot::Autopilot;
use super::car::{Car, Driver, Seat};
use super::collectible::CollectibleKind;
use super::level::{LevelPhase, LevelState};
use super::track::{CarSprites, Track};
use crate::settings::{RaceMode, RaceSettings};

/// Cars and level progress for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceState {
    pub mode: RaceMode,
    /// Seat one
    pub player: Car,
    /// The AI, or seat two in head-to-head races
    pub rival: Car,
    pub level: LevelState,
    /// Set once the race is won
    pub winner: Option<Seat>,
}

impl RaceState {
    pub fn new<R: Rng + ?Sized>(
        settings: &RaceSettings,
        track: &Track,
        sprites: &CarSprites,
        rng: &mut R,
    ) -> Self {
        let player = Car::new(
            Driver::Human(Seat::One),
            &settings.player,
            track.start(0),
            CarSprites::size_of(&sprites.primary),
        );
        let rival_size = CarSprites::size_of(&sprites.rival);
        let rival = match settings.mode {
            RaceMode::VsComputer => {
                let pilot = Autopilot::new(settings.ai.max_vel, settings.ai_level_step);
                let mut ai = Car::new(Driver::Autopilot(pilot), &settings.ai, track.start(1), rival_size);
                ai.next_level(1);
                ai
            }
            RaceMode::VsPlayer => Car::new(Driver::Human(Seat::Two), &settings.player, track.start(1), rival_size),
        };

        Self {
            mode: settings.mode,
            player,
            rival,
            level: LevelState::new(settings.levels, rng, track.waypoints(), &settings.effects),
            winner: None,
        }
    }

    pub fn cars(&self) -> [&Car; 2] {
        [&self.player, &self.rival]
    }

    pub fn snapshot(&self, now: f64) -> RaceSnapshot {
        RaceSnapshot {
            mode: self.mode,
            level: self.level.level(),
            levels: self.level.levels(),
            level_time: self.level.level_time(now),
            phase: self.level.phase(),
            cars: self.cars().map(|car| CarSnapshot::of(car, now)).to_vec(),
            collectibles: self
                .level
                .remaining()
                .map(|c| CollectibleSnapshot {
                    pos: c.pos,
                    radius: c.radius,
                    kind: c.kind,
                })
                .collect(),
            winner: self.winner,
        }
    }
}

/// One car as the HUD sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarSnapshot {
    /// `None` for the AI
    pub seat: Option<Seat>,
    pub pos: Vec2,
    pub angle: f32,
    pub vel: f32,
    pub max_vel: f32,
    pub speed_multiplier: f32,
    pub effect_active: bool,
}

impl CarSnapshot {
    fn of(car: &Car, now: f64) -> Self {
        Self {
            seat: car.seat(),
            pos: car.pos,
            angle: car.angle,
            vel: car.vel,
            max_vel: car.max_vel,
            speed_multiplier: car.speed_multiplier,
            effect_active: car.effect_active(now),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectibleSnapshot {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: CollectibleKind,
}

/// Per-frame view for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceSnapshot {
    pub mode: RaceMode,
    pub level: u32,
    pub levels: u32,
    /// Whole seconds on the current level
    pub level_time: u64,
    pub phase: LevelPhase,
    /// Seat one first, then the rival
    pub cars: Vec<CarSnapshot>,
    /// Uncollected only
    pub collectibles: Vec<CollectibleSnapshot>,
    pub winner: Option<Seat>,
}

impl RaceSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn build(mode: RaceMode) -> RaceState {
        let track = Track::ring().unwrap();
        let sprites = CarSprites::silhouette();
        RaceState::new(&RaceSettings::for_mode(mode), &track, &sprites, &mut Pcg32::seed_from_u64(9))
    }

    #[test]
    fn test_vs_computer_grid() {
        let state = build(RaceMode::VsComputer);
        assert_eq!(state.player.seat(), Some(Seat::One));
        assert_eq!(state.player.pos, Vec2::new(140.0, 320.0));
        assert_eq!(state.player.vel, 0.0);
        assert_eq!(state.player.size, Vec2::new(20.0, 36.0));

        assert!(state.rival.is_autopilot());
        assert_eq!(state.rival.pos, Vec2::new(70.0, 320.0));
        assert_eq!(state.rival.max_vel, 2.0);
        assert_eq!(state.rival.vel, 2.0);
        assert_eq!(state.level.collectibles().len(), 6);
    }

    #[test]
    fn test_vs_player_has_two_humans() {
        let state = build(RaceMode::VsPlayer);
        assert_eq!(state.rival.seat(), Some(Seat::Two));
        assert_eq!(state.rival.max_vel, state.player.max_vel);
        assert!(state.level.collectibles().iter().any(|c| c.multiplier == 2.0));
    }

    #[test]
    fn test_snapshot_lists_uncollected_only() {
        let mut state = build(RaceMode::VsComputer);
        let spot = state.level.collectibles()[2].pos;
        state.player.pos = spot;
        let RaceState { player, level, .. } = &mut state;
        assert!(level.collectibles_mut()[2].apply_on_pickup(player, 1.0));

        let snap = state.snapshot(2.0);
        assert_eq!(snap.collectibles.len(), 5);
        assert!(snap.collectibles.iter().all(|c| c.pos != spot));
        assert_eq!(snap.cars.len(), 2);
        assert!(snap.cars[0].effect_active);
        assert_eq!(snap.cars[1].seat, None);
        assert_eq!(snap.level_time, 0);
        assert_eq!(snap.phase, LevelPhase::NotStarted);
    }

    #[test]
    fn test_snapshot_serializes() {
        let snap = build(RaceMode::VsPlayer).snapshot(0.0);
        let json = snap.to_json().unwrap();
        let back: RaceSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
