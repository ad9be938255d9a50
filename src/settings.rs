//! Race tuning and presets
//!
//! Every gameplay constant that a mode or a config file may override. JSON
//! files may omit any field; omitted fields take the stock values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Which kind of race is being run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RaceMode {
    /// One human seat against the waypoint AI over several levels
    #[default]
    VsComputer,
    /// Two human seats; first valid finish crossing wins
    VsPlayer,
}

impl RaceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RaceMode::VsComputer => "vs-computer",
            RaceMode::VsPlayer => "vs-player",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "vs-computer" | "computer" | "1" => Some(RaceMode::VsComputer),
            "vs-player" | "player" | "2" => Some(RaceMode::VsPlayer),
            _ => None,
        }
    }
}

/// Configuration errors, surfaced before a race starts
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to parse race settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level count must be at least 1")]
    NoLevels,
    #[error("`{field}` must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("boost multiplier must be above 1.0, got {0}")]
    WeakBoost(f32),
    #[error("slow multiplier must be in (0, 1), got {0}")]
    InvalidSlow(f32),
}

/// Per-car motion stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarTuning {
    pub max_vel: f32,
    /// Degrees per tick
    pub rotation_vel: f32,
    pub acceleration: f32,
}

impl Default for CarTuning {
    fn default() -> Self {
        Self {
            max_vel: PLAYER_MAX_VEL,
            rotation_vel: PLAYER_ROTATION_VEL,
            acceleration: ACCELERATION,
        }
    }
}

impl CarTuning {
    fn validate(&self, prefix: &'static [&'static str; 3]) -> Result<(), SettingsError> {
        positive(prefix[0], self.max_vel as f64)?;
        positive(prefix[1], self.rotation_vel as f64)?;
        positive(prefix[2], self.acceleration as f64)
    }
}

/// Collectible placement and effect strength
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTuning {
    pub boost_multiplier: f32,
    pub slow_multiplier: f32,
    pub duration_secs: f64,
    pub pickup_radius: f32,
    pub boosts_per_level: usize,
    pub slows_per_level: usize,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            boost_multiplier: BOOST_MULTIPLIER_VS_COMPUTER,
            slow_multiplier: SLOW_MULTIPLIER,
            duration_secs: EFFECT_DURATION_SECS,
            pickup_radius: COLLECTIBLE_RADIUS,
            boosts_per_level: BOOSTS_PER_LEVEL,
            slows_per_level: SLOWS_PER_LEVEL,
        }
    }
}

impl EffectTuning {
    /// Total collectibles spawned per level
    pub fn per_level(&self) -> usize {
        self.boosts_per_level + self.slows_per_level
    }
}

/// Complete race configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceSettings {
    pub mode: RaceMode,
    /// Levels to clear before the game is won
    pub levels: u32,
    /// Stats for human-driven cars (both seats)
    pub player: CarTuning,
    /// Stats for the AI car
    pub ai: CarTuning,
    /// Extra AI cruise velocity per level above the first
    pub ai_level_step: f32,
    pub effects: EffectTuning,
}

impl Default for RaceSettings {
    fn default() -> Self {
        Self {
            mode: RaceMode::VsComputer,
            levels: LEVELS,
            player: CarTuning::default(),
            ai: CarTuning {
                max_vel: AI_MAX_VEL,
                rotation_vel: AI_ROTATION_VEL,
                acceleration: ACCELERATION,
            },
            ai_level_step: AI_LEVEL_VEL_STEP,
            effects: EffectTuning::default(),
        }
    }
}

impl RaceSettings {
    /// Stock settings for a mode. Head-to-head races use a stronger boost.
    pub fn for_mode(mode: RaceMode) -> Self {
        let mut settings = Self {
            mode,
            ..Self::default()
        };
        if mode == RaceMode::VsPlayer {
            settings.effects.boost_multiplier = BOOST_MULTIPLIER_VS_PLAYER;
        }
        settings
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        log::info!(
            "Loaded race settings: mode={}, levels={}, boost x{}, slow x{}",
            settings.mode.as_str(),
            settings.levels,
            settings.effects.boost_multiplier,
            settings.effects.slow_multiplier
        );
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.levels == 0 {
            return Err(SettingsError::NoLevels);
        }
        self.player.validate(&[
            "player.max_vel",
            "player.rotation_vel",
            "player.acceleration",
        ])?;
        self.ai
            .validate(&["ai.max_vel", "ai.rotation_vel", "ai.acceleration"])?;
        if self.ai_level_step < 0.0 {
            return Err(SettingsError::NotPositive {
                field: "ai_level_step",
                value: self.ai_level_step as f64,
            });
        }

        let effects = &self.effects;
        if effects.boost_multiplier <= 1.0 {
            return Err(SettingsError::WeakBoost(effects.boost_multiplier));
        }
        if effects.slow_multiplier <= 0.0 || effects.slow_multiplier >= 1.0 {
            return Err(SettingsError::InvalidSlow(effects.slow_multiplier));
        }
        positive("effects.duration_secs", effects.duration_secs)?;
        positive("effects.pickup_radius", effects.pickup_radius as f64)
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), SettingsError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::NotPositive { field, value })
    }
}
