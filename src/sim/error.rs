//! Precondition failures for intents
//!
//! None of these are fatal. The session maps them to [`IntentOutcome::Ignored`]
//! and leaves state untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum SimError {
    #[error("no spare soap bars")]
    NoSpareBars,
    #[error("ball is already in play")]
    AlreadyBusy,
    #[error("no ball attached to the handle")]
    NoBallAttached,
    #[error("handle is still moving")]
    HandleMoving,
    #[error("handle is locked while a ball is inserted")]
    HandleLocked,
    #[error("handle already moving in that direction")]
    SameDirection,
    #[error("session is not running")]
    SessionNotRunning,
}

/// What happened to an intent delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentOutcome {
    /// State was mutated (events may have been emitted)
    Applied,
    /// Precondition unmet, nothing changed
    Ignored(SimError),
}

impl IntentOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, IntentOutcome::Applied)
    }
}

impl From<Result<(), SimError>> for IntentOutcome {
    fn from(result: Result<(), SimError>) -> Self {
        match result {
            Ok(()) => IntentOutcome::Applied,
            Err(e) => IntentOutcome::Ignored(e),
        }
    }
}
