//! Level progression
//!
//! A session is a fixed number of levels. Each level waits for a start
//! signal, runs until a finish-line crossing, then waits again on the next
//! level with a fresh set of collectibles.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collectible::{self, Collectible};
use crate::settings::EffectTuning;

/// Where the current level stands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LevelPhase {
    /// Waiting for the start signal; no physics runs
    NotStarted,
    /// Racing since `started_at` (clock seconds)
    Running { started_at: f64 },
    /// Every level cleared, or a head-to-head race decided
    Won,
    /// The AI crossed the finish first
    Lost,
}

impl LevelPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            LevelPhase::NotStarted => "not-started",
            LevelPhase::Running { .. } => "running",
            LevelPhase::Won => "won",
            LevelPhase::Lost => "lost",
        }
    }
}

/// Level counter, phase and the level's collectibles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelState {
    level: u32,
    levels: u32,
    phase: LevelPhase,
    collectibles: Vec<Collectible>,
}

impl LevelState {
    /// Level 1, not started, with a freshly drawn collectible set
    pub fn new<R: Rng + ?Sized>(levels: u32, rng: &mut R, path: &[Vec2], tuning: &EffectTuning) -> Self {
        Self {
            level: 1,
            levels,
            phase: LevelPhase::NotStarted,
            collectibles: collectible::spawn(rng, path, tuning),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn levels(&self) -> u32 {
        self.levels
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }

    pub fn collectibles_mut(&mut self) -> &mut [Collectible] {
        &mut self.collectibles
    }

    /// Collectibles still on the track
    pub fn remaining(&self) -> impl Iterator<Item = &Collectible> {
        self.collectibles.iter().filter(|c| !c.is_collected())
    }

    pub fn is_started(&self) -> bool {
        matches!(self.phase, LevelPhase::Running { .. })
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, LevelPhase::Won | LevelPhase::Lost)
    }

    /// True once the level counter has run past the last level
    pub fn game_finished(&self) -> bool {
        self.level > self.levels
    }

    /// Start the waiting level. Returns false if it was not waiting.
    pub fn start_level(&mut self, now: f64) -> bool {
        if self.phase != LevelPhase::NotStarted {
            return false;
        }
        self.phase = LevelPhase::Running { started_at: now };
        log::info!("Level {} started", self.level);
        true
    }

    /// Whole seconds since the level started, rounded half to even; 0 unless running
    pub fn level_time(&self, now: f64) -> u64 {
        match self.phase {
            LevelPhase::Running { started_at } => (now - started_at).max(0.0).round_ties_even() as u64,
            _ => 0,
        }
    }

    /// Move to the next level after a valid crossing.
    ///
    /// The new level waits for a start signal with new collectibles. Past the
    /// last level the phase becomes `Won` instead. Returns the new level number.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R, path: &[Vec2], tuning: &EffectTuning) -> u32 {
        self.level += 1;
        if self.game_finished() {
            self.phase = LevelPhase::Won;
            self.collectibles.clear();
            log::info!("All {} levels cleared", self.levels);
        } else {
            self.phase = LevelPhase::NotStarted;
            self.collectibles = collectible::spawn(rng, path, tuning);
            log::info!("Advanced to level {}", self.level);
        }
        self.level
    }

    /// End the session as won without advancing (head-to-head races)
    pub fn win(&mut self) {
        self.phase = LevelPhase::Won;
    }

    pub fn lose(&mut self) {
        self.phase = LevelPhase::Lost;
        log::info!("Lost on level {}", self.level);
    }

    /// Back to level 1, waiting, with a new collectible set
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R, path: &[Vec2], tuning: &EffectTuning) {
        *self = Self::new(self.levels, rng, path, tuning);
    }
}
