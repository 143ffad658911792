//! Ball Scrub headless driver
//!
//! Runs one session with a simple autoplay bot at a fixed timestep and prints
//! the session summary as JSON. Usage: `ball-scrub [tuning.json] [seed]`.

use ball_scrub::consts::*;
use ball_scrub::sim::{BallState, Direction, GameEvent, Session, TickInput, step};
use ball_scrub::tuning::{Tuning, TuningError};

/// Host frame length being simulated (60 fps display)
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up after this many frames in case the tuning never ends the session
const MAX_FRAMES: u32 = 60 * 60 * 30;

/// Plays the game by flipping the handle until the ball is spotless
struct Autoplay;

impl Autoplay {
    fn input(&self, session: &Session) -> TickInput {
        let mut input = TickInput::default();
        let handle = &session.handle;

        match session.ball.state {
            BallState::Idle if handle.is_parked() => input.insert_ball = true,
            BallState::Clean => {
                if session.ball.filth == 0.0 {
                    if handle.is_parked() {
                        input.remove_ball = true;
                    } else if handle.is_resting() {
                        input.handle = Some(Direction::Down);
                    }
                } else if handle.is_resting() {
                    input.handle = Some(handle.direction.opposite());
                }

                if session.soap.level() < 0.1 && session.soap.count > 0 {
                    input.add_soap = true;
                }
            }
            _ => {}
        }
        input
    }
}

struct Game {
    session: Session,
    bot: Autoplay,
    accumulator: f32,
}

impl Game {
    fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        Ok(Self {
            session: Session::new(tuning, seed)?,
            bot: Autoplay,
            accumulator: 0.0,
        })
    }

    /// Run simulation ticks for one host frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.bot.input(&self.session);
            step(&mut self.session, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        for event in self.session.drain_events() {
            match event {
                GameEvent::Scrubbed { .. } => log::trace!("{:?}", event),
                GameEvent::SessionEnded(score) => log::info!("Game over, total score {}", score),
                _ => log::debug!("{:?}", event),
            }
        }
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);

    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::error!("Invalid seed: {}", e);
            std::process::exit(1);
        }
        None => 12345,
    };

    let mut game = match Game::new(tuning, seed) {
        Ok(game) => game,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    // keep going past game over until late grants and the last ball resolve
    let mut frames = 0;
    while !game.session.is_settled() && frames < MAX_FRAMES {
        game.update(FRAME_DT);
        frames += 1;
    }

    if !game.session.is_settled() {
        log::warn!("Session still unsettled after {} frames", frames);
    }

    match serde_json::to_string_pretty(&game.session.summary()) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize summary: {}", e);
            std::process::exit(1);
        }
    }
}
