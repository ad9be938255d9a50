//! Waypoint-following AI driver
//!
//! The AI steers at a fixed rotation rate toward the next waypoint of a
//! shared closed path and cruises at its current max velocity. Arrival is a
//! bounding-box test against the waypoint point.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::car::{Car, Driver};

/// AI payload carried by an autopilot car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Autopilot {
    /// Index of the next waypoint; equals the path length once exhausted
    pub cursor: usize,
    /// Cruise velocity on level 1
    pub base_cruise_vel: f32,
    /// Extra cruise velocity per level above the first
    pub level_step: f32,
}

impl Autopilot {
    pub fn new(base_cruise_vel: f32, level_step: f32) -> Self {
        Self {
            cursor: 0,
            base_cruise_vel,
            level_step,
        }
    }

    /// Cruise velocity for a level (1-based)
    pub fn cruise_vel(&self, level: u32) -> f32 {
        self.base_cruise_vel + level.saturating_sub(1) as f32 * self.level_step
    }
}

/// Heading (degrees) that points from `from` toward `target`.
///
/// Straight horizontal offsets map to 90°; targets further down the screen
/// get a half-turn correction.
pub fn desired_heading(from: Vec2, target: Vec2) -> f32 {
    let dx = target.x - from.x;
    let dy = target.y - from.y;

    let mut radians = if dy == 0.0 {
        std::f32::consts::FRAC_PI_2
    } else {
        (dx / dy).atan()
    };
    if target.y > from.y {
        radians += std::f32::consts::PI;
    }
    radians.to_degrees()
}

/// Signed difference between the current and desired heading.
///
/// Only the `>= 180` side is folded back by a full turn; a difference at or
/// below -180 is returned unchanged, so the car may take the long way round.
pub fn heading_error(current: f32, desired: f32) -> f32 {
    let mut diff = current - desired;
    if diff >= 180.0 {
        diff -= 360.0;
    }
    diff
}

impl Car {
    pub fn autopilot(&self) -> Option<&Autopilot> {
        match &self.driver {
            Driver::Autopilot(pilot) => Some(pilot),
            Driver::Human(_) => None,
        }
    }

    fn autopilot_mut(&mut self) -> Option<&mut Autopilot> {
        match &mut self.driver {
            Driver::Autopilot(pilot) => Some(pilot),
            Driver::Human(_) => None,
        }
    }

    /// Current waypoint target, `None` for humans or an exhausted path
    pub fn waypoint_target(&self, path: &[Vec2]) -> Option<Vec2> {
        self.autopilot().and_then(|pilot| path.get(pilot.cursor).copied())
    }

    pub fn path_exhausted(&self, path: &[Vec2]) -> bool {
        self.autopilot().is_some_and(|pilot| pilot.cursor >= path.len())
    }

    /// Turn toward the current waypoint by at most one rotation step
    pub fn steer_toward_target(&mut self, path: &[Vec2]) {
        let Some(target) = self.waypoint_target(path) else {
            return;
        };
        let diff = heading_error(self.angle, desired_heading(self.pos, target));
        let step = self.rotation_vel.min(diff.abs());
        if diff > 0.0 {
            self.angle -= step;
        } else {
            self.angle += step;
        }
    }

    /// Move the cursor on once the sprite box covers the current waypoint.
    /// Returns true if the cursor advanced.
    pub fn advance_waypoint(&mut self, path: &[Vec2]) -> bool {
        let Some(target) = self.waypoint_target(path) else {
            return false;
        };
        if !self.bounds().contains_point(target) {
            return false;
        }
        let Some(pilot) = self.autopilot_mut() else {
            return false;
        };
        pilot.cursor += 1;
        if pilot.cursor == path.len() {
            log::debug!("Autopilot reached the last waypoint");
        }
        true
    }

    /// One tick of AI driving: steer, check arrival, then cruise forward.
    /// Does nothing once the path is exhausted. Returns true if the car moved.
    pub fn drive_autopilot(&mut self, path: &[Vec2]) -> bool {
        if self.autopilot().is_none() || self.path_exhausted(path) {
            return false;
        }
        self.steer_toward_target(path);
        self.advance_waypoint(path);
        self.vel = self.max_vel;
        self.integrate();
        true
    }

    /// Back to the grid for a new level, cruising faster on later levels
    pub fn next_level(&mut self, level: u32) {
        self.reset();
        let Some(cruise) = self.autopilot().map(|pilot| pilot.cruise_vel(level)) else {
            return;
        };
        self.base_max_vel = cruise;
        self.max_vel = cruise * self.speed_multiplier;
        self.vel = self.max_vel;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::CarTuning;
    use proptest::prelude::*;

    fn ai_at(pos: Vec2) -> Car {
        let tuning = CarTuning {
            max_vel: 2.0,
            rotation_vel: 4.0,
            acceleration: 0.1,
        };
        let mut car = Car::new(
            Driver::Autopilot(Autopilot::new(2.0, 0.4)),
            &tuning,
            pos,
            Vec2::new(20.0, 36.0),
        );
        car.vel = car.max_vel;
        car
    }

    #[test]
    fn test_desired_heading_cardinals() {
        let from = Vec2::new(100.0, 100.0);
        // Straight up
        assert!(desired_heading(from, Vec2::new(100.0, 50.0)).abs() < 1e-4);
        // Straight down
        assert!((desired_heading(from, Vec2::new(100.0, 150.0)) - 180.0).abs() < 1e-4);
        // Level with the car: fixed 90 regardless of side
        assert!((desired_heading(from, Vec2::new(50.0, 100.0)) - 90.0).abs() < 1e-4);
        assert!((desired_heading(from, Vec2::new(150.0, 100.0)) - 90.0).abs() < 1e-4);
        // Up and to the left
        assert!((desired_heading(from, Vec2::new(50.0, 50.0)) - 45.0).abs() < 1e-4);
    }

    #[test]
    fn test_heading_error_folds_only_positive_side() {
        assert_eq!(heading_error(190.0, 0.0), -170.0);
        assert_eq!(heading_error(180.0, 0.0), -180.0);
        assert_eq!(heading_error(-190.0, 0.0), -190.0);
        assert_eq!(heading_error(10.0, 30.0), -20.0);
    }

    #[test]
    fn test_steer_limited_by_rotation_rate() {
        let mut car = ai_at(Vec2::new(100.0, 100.0));
        let path = [Vec2::new(0.0, 0.0)];
        // Target at 45° (up-left): turn left by one step
        car.steer_toward_target(&path);
        assert_eq!(car.angle, 4.0);

        // Small remaining error snaps exactly
        car.angle = 43.0;
        car.steer_toward_target(&path);
        assert!((car.angle - 45.0).abs() < 1e-4);
    }

    #[test]
    fn test_reaches_waypoint_straight_ahead() {
        let mut car = ai_at(Vec2::new(100.0, 300.0));
        let path = [Vec2::new(100.0, 200.0), Vec2::new(100.0, 100.0)];
        let mut ticks = 0;
        while car.autopilot().map(|p| p.cursor) == Some(0) && ticks < 60 {
            assert!(car.drive_autopilot(&path));
            ticks += 1;
        }
        assert_eq!(car.autopilot().map(|p| p.cursor), Some(1));
        assert_eq!(ticks, 51);
    }

    #[test]
    fn test_exhausted_path_stops_car() {
        let mut car = ai_at(Vec2::new(100.0, 300.0));
        let path = [Vec2::new(110.0, 310.0)];
        assert!(car.drive_autopilot(&path));
        assert!(car.path_exhausted(&path));

        let parked = car.pos;
        assert!(!car.drive_autopilot(&path));
        assert!(!car.advance_waypoint(&path));
        assert_eq!(car.pos, parked);
        assert_eq!(car.autopilot().map(|p| p.cursor), Some(1));
    }

    #[test]
    fn test_next_level_scales_cruise_velocity() {
        let mut car = ai_at(Vec2::new(150.0, 200.0));
        car.pos = Vec2::new(400.0, 400.0);
        car.angle = 33.0;
        if let Driver::Autopilot(pilot) = &mut car.driver {
            pilot.cursor = 7;
        }

        car.next_level(3);
        assert_eq!(car.pos, Vec2::new(150.0, 200.0));
        assert_eq!(car.angle, 0.0);
        assert!((car.vel - 2.8).abs() < 1e-5);
        assert_eq!(car.vel, car.max_vel);
        assert_eq!(car.autopilot().map(|p| p.cursor), Some(0));
    }

    #[test]
    fn test_human_ignores_autopilot_calls() {
        let tuning = CarTuning::default();
        let mut car = Car::new(
            Driver::Human(crate::sim::car::Seat::One),
            &tuning,
            Vec2::ZERO,
            Vec2::splat(10.0),
        );
        let path = [Vec2::new(5.0, 5.0)];
        assert!(!car.drive_autopilot(&path));
        assert!(!car.advance_waypoint(&path));
        assert!(!car.path_exhausted(&path));
    }

    proptest! {
        /// Documents the one-sided wrap: errors below -180 are left as-is
        #[test]
        fn prop_heading_error_wrap_is_asymmetric(current in -360.0f32..360.0, desired in -180.0f32..180.0) {
            let diff = heading_error(current, desired);
            let raw = current - desired;
            prop_assert!(diff < 180.0);
            if raw >= 180.0 {
                prop_assert!((diff - (raw - 360.0)).abs() < 1e-3);
            } else {
                prop_assert_eq!(diff, raw);
            }
        }

        #[test]
        fn prop_waypoint_cursor_monotonic_and_bounded(
            start in (0.0f32..400.0, 0.0f32..400.0),
            points in prop::collection::vec((0.0f32..400.0, 0.0f32..400.0), 1..8),
        ) {
            let path: Vec<Vec2> = points.into_iter().map(|(x, y)| Vec2::new(x, y)).collect();
            let mut car = ai_at(Vec2::new(start.0, start.1));
            let mut last = 0;
            for _ in 0..600 {
                car.drive_autopilot(&path);
                let cursor = car.autopilot().map(|p| p.cursor).unwrap_or(0);
                prop_assert!(cursor >= last);
                prop_assert!(cursor <= path.len());
                last = cursor;
            }
        }
    }
}
