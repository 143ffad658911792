//! Ball Scrub - a ball-washing arcade mini-game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (handle strokes, soap, ball lifecycle, scoring)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, audio playback and raw input decoding belong to the host. The
//! host feeds [`sim::Intent`]s in, calls [`sim::tick`] once per frame and
//! reacts to the [`sim::GameEvent`]s that come out.

pub mod sim;
pub mod tuning;

pub use sim::{Direction, GameEvent, Intent, IntentOutcome, Session, SimError};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Ball radius in world units
    pub const BALL_RADIUS: f32 = 0.021;
    /// Travel of the handle between its two extremes
    pub const STROKE_DISTANCE: f32 = 0.16 - BALL_RADIUS;

    /// Where an idle ball waits before insertion (x axis)
    pub const BALL_REST_X: f32 = -0.2;
    /// Where the ball attaches to the handle
    pub const BALL_ATTACH_X: f32 = 0.0;
    /// Once past this point an extracted ball counts as detached
    pub const BALL_EXIT_X: f32 = 0.01;

    /// Filth of a freshly inserted ball
    pub const MAX_FILTH: f32 = 100.0;

    /// Number of cosmetic ball colours the host can pick from
    pub const BALL_PALETTE_SIZE: usize = 32;
}

/// Sanitize a frame delta: negative or non-finite input becomes zero
#[inline]
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() { dt.max(0.0) } else { 0.0 }
}
