//! Arcade car kinematics
//!
//! A single car record shared by human seats and the AI. Motion is integrated
//! once per call: every throttle, decay or bounce step moves the car by its
//! (new) velocity along its heading.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::autopilot::Autopilot;
use super::collision::Rect;
use crate::heading_vector;
use crate::settings::CarTuning;

/// A human seat at the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    pub fn index(self) -> usize {
        match self {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Seat::One => "Player 1",
            Seat::Two => "Player 2",
        }
    }
}

/// Who is driving a car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Driver {
    Human(Seat),
    Autopilot(Autopilot),
}

/// Rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
}

/// A single control intent from the input collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    RotateLeft,
    RotateRight,
    ThrottleForward,
    ThrottleBackward,
    None,
}

/// Intents held during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub forward: bool,
    pub backward: bool,
}

impl Controls {
    pub fn hold(&mut self, intent: Intent) {
        match intent {
            Intent::RotateLeft => self.left = true,
            Intent::RotateRight => self.right = true,
            Intent::ThrottleForward => self.forward = true,
            Intent::ThrottleBackward => self.backward = true,
            Intent::None => {}
        }
    }

    /// Whether any throttle intent is held
    pub fn throttling(&self) -> bool {
        self.forward || self.backward
    }
}

impl FromIterator<Intent> for Controls {
    fn from_iter<I: IntoIterator<Item = Intent>>(iter: I) -> Self {
        let mut controls = Controls::default();
        for intent in iter {
            controls.hold(intent);
        }
        controls
    }
}

/// A car on the track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Car {
    /// Top-left of the unrotated sprite, in track pixels
    pub pos: Vec2,
    /// Heading in degrees (0 = up, counter-clockwise positive, unbounded)
    pub angle: f32,
    /// Signed velocity along the heading (forward positive)
    pub vel: f32,
    pub base_max_vel: f32,
    /// `base_max_vel * speed_multiplier`
    pub max_vel: f32,
    /// Degrees per tick
    pub rotation_vel: f32,
    pub acceleration: f32,
    pub speed_multiplier: f32,
    /// Absolute clock time (seconds) at which the active effect lapses
    pub effect_expires_at: f64,
    /// Sprite dimensions, for bounding-box tests
    pub size: Vec2,
    pub start_pos: Vec2,
    pub driver: Driver,
}

impl Car {
    pub fn new(driver: Driver, tuning: &CarTuning, start_pos: Vec2, size: Vec2) -> Self {
        Self {
            pos: start_pos,
            angle: 0.0,
            vel: 0.0,
            base_max_vel: tuning.max_vel,
            max_vel: tuning.max_vel,
            rotation_vel: tuning.rotation_vel,
            acceleration: tuning.acceleration,
            speed_multiplier: 1.0,
            effect_expires_at: 0.0,
            size,
            start_pos,
            driver,
        }
    }

    /// Seat at the controls, if human-driven
    pub fn seat(&self) -> Option<Seat> {
        match self.driver {
            Driver::Human(seat) => Some(seat),
            Driver::Autopilot(_) => None,
        }
    }

    pub fn is_autopilot(&self) -> bool {
        matches!(self.driver, Driver::Autopilot(_))
    }

    /// Lowest velocity allowed (reverse is capped at half the forward max)
    #[inline]
    pub fn min_vel(&self) -> f32 {
        -self.max_vel / 2.0
    }

    pub fn rotate(&mut self, turn: Turn) {
        match turn {
            Turn::Left => self.angle += self.rotation_vel,
            Turn::Right => self.angle -= self.rotation_vel,
        }
    }

    pub fn accelerate_forward(&mut self) {
        self.vel = (self.vel + self.acceleration).min(self.max_vel);
        self.integrate();
    }

    pub fn accelerate_backward(&mut self) {
        self.vel = (self.vel - self.acceleration).max(self.min_vel());
        self.integrate();
    }

    /// Coast toward standstill by half an acceleration step
    pub fn decay(&mut self) {
        let step = self.acceleration / 2.0;
        self.vel = if self.vel > 0.0 {
            (self.vel - step).max(0.0)
        } else {
            (self.vel + step).min(0.0)
        };
        self.integrate();
    }

    /// Reverse momentum and back out one step; the heading is untouched
    pub fn bounce(&mut self) {
        self.vel = (-self.vel).clamp(self.min_vel(), self.max_vel);
        self.integrate();
    }

    /// Move one step along the heading
    pub fn integrate(&mut self) {
        self.pos += heading_vector(self.angle) * self.vel;
    }

    /// Apply one tick of human controls.
    ///
    /// Rotation is applied first so throttle uses the new heading; holding
    /// both throttles integrates twice, holding neither coasts.
    pub fn drive(&mut self, controls: Controls) {
        if controls.left {
            self.rotate(Turn::Left);
        }
        if controls.right {
            self.rotate(Turn::Right);
        }
        if controls.forward {
            self.accelerate_forward();
        }
        if controls.backward {
            self.accelerate_backward();
        }
        if !controls.throttling() {
            self.decay();
        }
    }

    /// Start a speed effect, replacing any effect still running
    pub fn apply_effect(&mut self, multiplier: f32, duration: f64, now: f64) {
        self.speed_multiplier = multiplier;
        self.max_vel = self.base_max_vel * multiplier;
        self.effect_expires_at = now + duration;
        self.clamp_vel();
    }

    /// Drop an expired effect. Call once per tick before motion.
    pub fn refresh_effect(&mut self, now: f64) {
        if now >= self.effect_expires_at {
            self.speed_multiplier = 1.0;
            self.max_vel = self.base_max_vel;
            self.clamp_vel();
        }
    }

    pub fn effect_active(&self, now: f64) -> bool {
        now < self.effect_expires_at
    }

    /// Back to the grid with no effect running.
    /// Base stats are kept.
    pub fn reset(&mut self) {
        self.pos = self.start_pos;
        self.angle = 0.0;
        self.vel = 0.0;
        self.speed_multiplier = 1.0;
        self.max_vel = self.base_max_vel;
        self.effect_expires_at = 0.0;
        if let Driver::Autopilot(pilot) = &mut self.driver {
            pilot.cursor = 0;
        }
    }

    /// Sprite box anchored at the car's top-left position
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Sprite-sized box centred on the car's position
    pub fn centered_bounds(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    fn clamp_vel(&mut self) {
        self.vel = self.vel.clamp(self.min_vel(), self.max_vel);
    }
}
