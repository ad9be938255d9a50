//! Race simulation module
//!
//! All gameplay logic lives here. Nothing in this module renders, polls
//! input devices or reads the clock:
//! - callers pass the current time into every tick
//! - collectible placement draws from a seeded RNG owned by the session
//! - assets arrive as masks and waypoint lists

pub mod autopilot;
pub mod car;
pub mod collectible;
pub mod collision;
pub mod level;
pub mod mask;
pub mod state;
pub mod tick;
pub mod track;

pub use autopilot::{Autopilot, desired_heading, heading_error};
pub use car::{Car, Controls, Driver, Intent, Seat, Turn};
pub use collectible::{Collectible, CollectibleKind};
pub use collision::{FinishContact, Rect, finish_contact, test_overlap};
pub use level::{LevelPhase, LevelState};
pub use mask::Mask;
pub use state::{CarSnapshot, CollectibleSnapshot, RaceSnapshot, RaceState};
pub use tick::{Race, TickInput, TickOutcome, tick};
pub use track::{CarSprites, Track, TrackError};
