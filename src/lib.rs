//! Top-down racer - arcade racing simulation core
//!
//! Core modules:
//! - `sim`: Simulation (car kinematics, mask collisions, waypoint AI, pickups, levels)
//! - `platform`: Clock sources and key-set to control-intent mapping
//! - `settings`: Data-driven race tuning
//!
//! Rendering, asset loading, menus and raw input polling live outside this
//! crate. The core consumes control intents, timestamps, masks and waypoints
//! and reports a [`sim::TickOutcome`] per tick.

pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::{CarTuning, EffectTuning, RaceMode, RaceSettings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::{IVec2, Vec2};

    /// Fixed simulation rate
    pub const FPS: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f64 = 1.0 / FPS as f64;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Levels to clear before the game is won
    pub const LEVELS: u32 = 10;

    /// Velocity gained per tick of throttle
    pub const ACCELERATION: f32 = 0.1;
    pub const PLAYER_MAX_VEL: f32 = 4.0;
    /// Degrees per tick
    pub const PLAYER_ROTATION_VEL: f32 = 4.0;
    pub const AI_MAX_VEL: f32 = 2.0;
    pub const AI_ROTATION_VEL: f32 = 4.0;
    /// Extra AI cruise velocity per level above the first
    pub const AI_LEVEL_VEL_STEP: f32 = 0.4;

    /// Grid slot for seat one (top-left of the sprite)
    pub const SEAT_ONE_START: Vec2 = Vec2::new(180.0, 200.0);
    /// Grid slot for seat two or the AI
    pub const SEAT_TWO_START: Vec2 = Vec2::new(150.0, 200.0);

    /// Placement of the finish-line mask on the stock track
    pub const FINISH_POSITION: IVec2 = IVec2::new(130, 250);

    /// Collectibles
    pub const COLLECTIBLE_RADIUS: f32 = 15.0;
    pub const EFFECT_DURATION_SECS: f64 = 3.0;
    pub const BOOSTS_PER_LEVEL: usize = 3;
    pub const SLOWS_PER_LEVEL: usize = 3;
    pub const SLOW_MULTIPLIER: f32 = 0.5;
    pub const BOOST_MULTIPLIER_VS_COMPUTER: f32 = 1.5;
    pub const BOOST_MULTIPLIER_VS_PLAYER: f32 = 2.0;

    /// Waypoint loop of the stock track
    pub const STOCK_PATH: [(f32, f32); 22] = [
        (175.0, 119.0),
        (110.0, 70.0),
        (56.0, 133.0),
        (70.0, 481.0),
        (318.0, 731.0),
        (404.0, 680.0),
        (418.0, 521.0),
        (507.0, 475.0),
        (600.0, 551.0),
        (613.0, 715.0),
        (736.0, 713.0),
        (734.0, 399.0),
        (611.0, 357.0),
        (409.0, 343.0),
        (433.0, 257.0),
        (697.0, 258.0),
        (738.0, 123.0),
        (581.0, 71.0),
        (303.0, 78.0),
        (275.0, 377.0),
        (176.0, 388.0),
        (178.0, 260.0),
    ];
}

/// Wrap an angle in degrees to [-180, 180)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// Unit travel direction for a heading in degrees.
///
/// 0° points up the screen and angles grow counter-clockwise; screen Y grows
/// downward, so heading 0 maps to (0, -1).
#[inline]
pub fn heading_vector(angle_deg: f32) -> Vec2 {
    let radians = angle_deg.to_radians();
    Vec2::new(-radians.sin(), -radians.cos())
}
