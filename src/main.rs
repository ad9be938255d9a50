//! Top-down racer headless driver
//!
//! Runs a race on the procedural ring track with scripted drivers at the
//! controls and logs what happens. Usage:
//!
//! ```text
//! topdown-racer [seed] [vs-computer|vs-player] [settings.json]
//! ```
//!
//! Set `RUST_LOG=debug` for per-second HUD snapshots.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::error::Error;

    use glam::Vec2;
    use topdown_racer::consts::{FPS, MAX_SUBSTEPS, SIM_DT};
    use topdown_racer::platform::{Clock, Key, KeySet, ManualClock};
    use topdown_racer::sim::{Car, CarSprites, Race, Rect, TickInput, TickOutcome, Track, desired_heading, tick};
    use topdown_racer::wrap_degrees;
    use topdown_racer::{RaceMode, RaceSettings};

    /// Give up after ten simulated minutes
    const TICK_LIMIT: u64 = FPS as u64 * 600;
    /// Host frame length; deliberately off the tick rate
    const FRAME_DT: f64 = 1.0 / 50.0;
    /// Heading error (degrees) tolerated before steering
    const STEER_DEADBAND: f32 = 3.0;
    /// Half-size of the box around a waypoint that counts as reached
    const REACH_RADIUS: f32 = 40.0;

    /// A scripted seat that chases the waypoint loop by pressing keys
    struct Chaser {
        keys: KeySet,
        cursor: usize,
    }

    impl Chaser {
        fn new(keys: KeySet) -> Self {
            Self { keys, cursor: 0 }
        }

        fn held(&mut self, car: &Car, path: &[Vec2]) -> Vec<Key> {
            let center = car.pos + car.size / 2.0;
            if Rect::around(path[self.cursor], REACH_RADIUS).contains_point(center) {
                self.cursor = (self.cursor + 1) % path.len();
            }

            let error = wrap_degrees(desired_heading(center, path[self.cursor]) - car.angle);
            let mut held = Vec::with_capacity(2);
            if error > STEER_DEADBAND {
                held.push(self.keys.left);
            } else if error < -STEER_DEADBAND {
                held.push(self.keys.right);
            }
            // Ease off in sharp turns
            if error.abs() < 60.0 || car.vel < 1.0 {
                held.push(self.keys.forward);
            }
            held
        }
    }

    fn settings_from_args(args: &[String]) -> Result<RaceSettings, Box<dyn Error>> {
        let mode = match args.get(2) {
            Some(name) => RaceMode::from_str(name).ok_or_else(|| format!("unknown mode `{name}`"))?,
            None => RaceMode::VsComputer,
        };
        match args.get(3) {
            Some(path) => {
                let mut settings = RaceSettings::from_json(&std::fs::read_to_string(path)?)?;
                settings.mode = mode;
                Ok(settings)
            }
            None => Ok(RaceSettings::for_mode(mode)),
        }
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let args: Vec<String> = std::env::args().collect();
        let seed = match args.get(1) {
            Some(raw) => raw.parse::<u64>()?,
            None => 0x5eed,
        };
        let settings = settings_from_args(&args)?;
        let mode = settings.mode;

        let mut race = Race::new(settings, Track::ring()?, CarSprites::silhouette(), seed);
        let path = race.track().waypoints().to_vec();
        let mut seats = [Chaser::new(KeySet::wasd()), Chaser::new(KeySet::arrows())];

        let mut clock = ManualClock::default();
        let mut accumulator = 0.0;
        let mut ticks = 0u64;

        'frames: while ticks < TICK_LIMIT {
            accumulator += FRAME_DT;

            let mut substeps = 0;
            while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                clock.advance(SIM_DT);
                accumulator -= SIM_DT;
                substeps += 1;
                ticks += 1;

                let state = race.state();
                let mut input = TickInput {
                    start: !state.level.is_started(),
                    ..Default::default()
                };
                let mut held = seats[0].held(&state.player, &path);
                if mode == RaceMode::VsPlayer {
                    held.extend(seats[1].held(&state.rival, &path));
                }
                input.seats = [seats[0].keys.controls(&held), seats[1].keys.controls(&held)];

                match tick(&mut race, &input, clock.now()) {
                    TickOutcome::Continue => {}
                    TickOutcome::LevelAdvanced { level } => {
                        log::info!("Level {} reached at {:.1}s", level, clock.now());
                        for seat in &mut seats {
                            seat.cursor = 0;
                        }
                    }
                    TickOutcome::Won { winner } => {
                        log::info!("{} won after {:.1}s", winner.label(), clock.now());
                        break 'frames;
                    }
                    TickOutcome::Lost => {
                        log::info!("Lost to the computer on level {}", race.state().level.level());
                        break 'frames;
                    }
                    TickOutcome::Restarted | TickOutcome::Quit | TickOutcome::OpenMenu => break 'frames,
                }

                if ticks % FPS as u64 == 0 {
                    log::debug!("{}", race.snapshot(clock.now()).to_json()?);
                }
            }
        }

        if ticks >= TICK_LIMIT {
            log::warn!("Tick limit reached on level {}", race.state().level.level());
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Top-down racer (headless) starting...");
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless driver on the web; the host embeds the library directly
}
