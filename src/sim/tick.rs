//! Fixed timestep race tick
//!
//! One call per simulation step: read seat controls and session signals,
//! move the cars, resolve collisions and pickups, then report what happened.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::car::{Controls, Seat};
use super::collision::{FinishContact, finish_contact, test_overlap};
use super::level::LevelPhase;
use super::state::{RaceSnapshot, RaceState};
use super::track::{CarSprites, Track};
use crate::settings::{RaceMode, RaceSettings};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held controls for seat one and seat two
    pub seats: [Controls; 2],
    /// Any key: starts a waiting level
    pub start: bool,
    pub restart: bool,
    pub quit: bool,
    pub open_menu: bool,
}

impl TickInput {
    pub fn seat(&self, seat: Seat) -> Controls {
        self.seats[seat.index()]
    }
}

/// What a tick produced, for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// A level was cleared; the new level waits for a start signal
    LevelAdvanced { level: u32 },
    Won { winner: Seat },
    Lost,
    Restarted,
    Quit,
    OpenMenu,
}

/// A race session: the fixed assets plus the state a restart replaces
#[derive(Debug, Clone)]
pub struct Race {
    settings: RaceSettings,
    track: Track,
    sprites: CarSprites,
    seed: u64,
    rng: Pcg32,
    state: RaceState,
}

impl Race {
    pub fn new(settings: RaceSettings, track: Track, sprites: CarSprites, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = RaceState::new(&settings, &track, &sprites, &mut rng);
        log::info!(
            "New {} race: {} levels, {} waypoints, seed {}",
            settings.mode.as_str(),
            settings.levels,
            track.waypoints().len(),
            seed
        );
        Self {
            settings,
            track,
            sprites,
            seed,
            rng,
            state,
        }
    }

    /// Throw away cars and level progress and start over at level 1.
    /// The RNG keeps running, so the new collectible set differs.
    pub fn restart(&mut self) {
        self.state = RaceState::new(&self.settings, &self.track, &self.sprites, &mut self.rng);
        log::info!("Race restarted");
    }

    pub fn settings(&self) -> &RaceSettings {
        &self.settings
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> &RaceState {
        &self.state
    }

    pub fn snapshot(&self, now: f64) -> RaceSnapshot {
        self.state.snapshot(now)
    }
}

/// Advance the race by one tick at clock time `now` (seconds).
///
/// Signals take precedence over simulation: quit, then open-menu, then
/// restart, then start. A waiting level does no physics until started; a
/// decided race keeps reporting its result until restarted.
pub fn tick(race: &mut Race, input: &TickInput, now: f64) -> TickOutcome {
    if input.quit {
        log::info!("Quit requested on level {}", race.state.level.level());
        return TickOutcome::Quit;
    }
    if input.open_menu {
        return TickOutcome::OpenMenu;
    }
    if input.restart {
        race.restart();
        return TickOutcome::Restarted;
    }

    match race.state.level.phase() {
        LevelPhase::Won => {
            return TickOutcome::Won {
                winner: race.state.winner.unwrap_or(Seat::One),
            };
        }
        LevelPhase::Lost => return TickOutcome::Lost,
        LevelPhase::NotStarted => {
            if !input.start {
                return TickOutcome::Continue;
            }
            race.state.level.start_level(now);
        }
        LevelPhase::Running { .. } => {}
    }

    step(race, input, now)
}

/// One simulated tick of a running level
fn step(race: &mut Race, input: &TickInput, now: f64) -> TickOutcome {
    let Race {
        settings,
        track,
        sprites,
        rng,
        state,
        ..
    } = race;
    let path = track.waypoints();

    // Effects lapse before any motion
    state.player.refresh_effect(now);
    state.rival.refresh_effect(now);

    state.player.drive(input.seat(Seat::One));
    match state.mode {
        RaceMode::VsComputer => {
            state.rival.drive_autopilot(path);
        }
        RaceMode::VsPlayer => state.rival.drive(input.seat(Seat::Two)),
    }

    // Walls only stop human drivers
    if test_overlap(&state.player, &sprites.primary, track.boundary(), IVec2::ZERO).is_some() {
        state.player.bounce();
    }
    if !state.rival.is_autopilot()
        && test_overlap(&state.rival, &sprites.rival, track.boundary(), IVec2::ZERO).is_some()
    {
        state.rival.bounce();
    }

    let finish = track.finish();
    let origin = track.finish_origin();
    match state.mode {
        RaceMode::VsComputer => {
            if finish_contact(&state.rival, &sprites.rival, finish, origin) != FinishContact::Clear {
                state.level.lose();
                return TickOutcome::Lost;
            }
            match finish_contact(&state.player, &sprites.primary, finish, origin) {
                FinishContact::Clear => {}
                FinishContact::WrongWay => state.player.bounce(),
                FinishContact::Crossed => {
                    let level = state.level.advance(rng, path, &settings.effects);
                    if state.level.game_finished() {
                        state.winner = Some(Seat::One);
                        return TickOutcome::Won { winner: Seat::One };
                    }
                    state.player.reset();
                    state.rival.next_level(level);
                    return TickOutcome::LevelAdvanced { level };
                }
            }
        }
        RaceMode::VsPlayer => {
            let seats = [
                (&mut state.player, &sprites.primary),
                (&mut state.rival, &sprites.rival),
            ];
            for (car, sprite) in seats {
                match finish_contact(car, sprite, finish, origin) {
                    FinishContact::Clear => {}
                    FinishContact::WrongWay => car.bounce(),
                    FinishContact::Crossed => {
                        let winner = car.seat().unwrap_or(Seat::One);
                        state.winner = Some(winner);
                        state.level.win();
                        log::info!("{} wins", winner.label());
                        return TickOutcome::Won { winner };
                    }
                }
            }
        }
    }

    // First car to reach a pickup takes it; seat one is checked first
    let RaceState {
        player, rival, level, ..
    } = state;
    for pickup in level.collectibles_mut() {
        if !pickup.apply_on_pickup(player, now) {
            pickup.apply_on_pickup(rival, now);
        }
    }

    TickOutcome::Continue
}
