//! Session state and core simulation types
//!
//! One [`Session`] owns every entity for the length of a game. There is no
//! global state; the host holds the session and passes it to [`super::tick`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallState};
use super::handle::Handle;
use super::score::Score;
use super::soap::Soap;
use crate::consts::BALL_PALETTE_SIZE;
use crate::tuning::{Tuning, TuningError};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// "READY" count-in, intents are ignored
    CountIn { remaining: f32 },
    /// Clock is running
    Running,
    /// Clock ran out. Pending grants and in-flight balls still resolve.
    GameOver,
}

/// Discrete notifications for the host (audio cues, HUD messages)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Ready,
    Go,
    BallAttached,
    /// A stroke removed filth from the attached ball
    Scrubbed { delta: f32, filth: f32 },
    SoapRefilled,
    BallScored { points: u64, time_bonus: f32 },
    PrematureEjection,
    PerfectCleanStreak(u32),
    StreakBonus { run: u32, points: u64, seconds: f32 },
    StreakBroken { run: u32 },
    /// "New soap bar in 3.. 2.. 1.."
    SoapGrantScheduled { delay: f32 },
    NewSoapGranted,
    SessionEnded(u64),
}

/// A one-shot deferred reward, polled every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoapGrant {
    pub remaining: f32,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }

    /// A fresh generator on the next stream, so every draw is reproducible
    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::new(self.seed, self.stream);
        self.stream += 1;
        rng
    }
}

/// End-of-game results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub final_score: u64,
    pub balls_washed: u32,
    pub avg_cleanliness: f32,
    pub run_time: f32,
    pub best_streak: u32,
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub handle: Handle,
    pub soap: Soap,
    pub ball: Ball,
    pub score: Score,
    pub pending_grants: Vec<SoapGrant>,
    /// Events raised since the host last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl Session {
    /// Create a new session with the given balance and seed. The tuning is
    /// validated first.
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;

        let rng_state = RngState::new(seed);
        let colour = rng_state.to_rng().random_range(0..BALL_PALETTE_SIZE);

        let mut session = Self {
            seed,
            rng_state,
            handle: Handle::new(&tuning.handle),
            soap: Soap::new(&tuning.soap),
            ball: Ball::new(&tuning.ball, colour),
            score: Score::new(&tuning.score),
            phase: GamePhase::CountIn {
                remaining: tuning.count_in_secs,
            },
            pending_grants: Vec::new(),
            events: vec![GameEvent::Ready],
            tuning,
        };

        if tuning.count_in_secs <= 0.0 {
            session.begin();
        }
        Ok(session)
    }

    /// End the count-in and start the clock
    pub fn begin(&mut self) {
        if matches!(self.phase, GamePhase::CountIn { .. }) {
            self.phase = GamePhase::Running;
            self.score.start();
            self.events.push(GameEvent::Go);
            log::info!(
                "Session started: {:.1}s on the clock, threshold {:.0}",
                self.score.remaining_time,
                self.score.threshold
            );
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Over, with no grant pending and no ball still travelling
    pub fn is_settled(&self) -> bool {
        self.is_over() && self.pending_grants.is_empty() && !self.ball.is_translating()
    }

    /// Hand all pending events to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Where the host should draw the ball
    pub fn ball_position(&self) -> Vec2 {
        match self.ball.state {
            BallState::Clean => Vec2::new(self.ball.x, self.handle.offset()),
            _ => Vec2::new(self.ball.x, 0.0),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            final_score: self.score.total_score,
            balls_washed: self.score.balls_washed,
            avg_cleanliness: self.score.avg_cleanliness(),
            run_time: self.score.total_run_time,
            best_streak: self.score.best_run,
        }
    }
}
