//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Fixed update order (soap, handle, ball, score, deferred grants)
//! - No rendering, audio or platform dependencies

pub mod ball;
pub mod easing;
pub mod error;
pub mod handle;
pub mod score;
pub mod soap;
pub mod state;
pub mod tick;

pub use ball::{Ball, BallState, BallTransition};
pub use error::{IntentOutcome, SimError};
pub use handle::{Direction, Handle};
pub use score::Score;
pub use soap::Soap;
pub use state::{GameEvent, GamePhase, RngState, Session, SessionSummary, SoapGrant};
pub use tick::{Intent, TickInput, apply_intent, step, tick};
