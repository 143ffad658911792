//! Data-driven game balance
//!
//! Every constant a designer may want to tweak lives here. Defaults reproduce
//! the shipped balance; a JSON file may override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_FILTH;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Handle stroke mechanics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandleTuning {
    /// Progress units per second while moving
    pub max_speed: f32,
}

impl Default for HandleTuning {
    fn default() -> Self {
        Self { max_speed: 6.0 }
    }
}

/// Soap supply
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoapTuning {
    pub max_amount: f32,
    pub min_amount: f32,
    /// Largest amount lost on a single direction switch
    pub base_reduction: f32,
    /// Seconds of use before the soap wears at full rate
    pub max_lifetime: f32,
    /// Spare bars at session start
    pub starting_bars: u32,
    /// Grants never raise the spare bar count above this
    pub max_bars: u32,
}

impl Default for SoapTuning {
    fn default() -> Self {
        Self {
            max_amount: 10.0,
            min_amount: 3.0,
            base_reduction: 0.7,
            max_lifetime: 12.0,
            starting_bars: 1,
            max_bars: 5,
        }
    }
}

/// Ball translation and cleaning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallTuning {
    /// World units per second while inserting/extracting
    pub speed: f32,
    /// 0 = every scrub lands in full, 1 = a nearly clean ball barely responds
    pub scrub_resistance: f32,
}

impl Default for BallTuning {
    fn default() -> Self {
        Self {
            speed: 1.0,
            scrub_resistance: 0.0,
        }
    }
}

/// Time budget, scoring and rewards
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTuning {
    pub starting_time: f32,
    /// Minimum cleanliness required to score
    pub starting_threshold: f32,
    /// Seconds awarded for a perfectly clean ball (scaled by cleanliness)
    pub time_bonus: f32,
    /// A soap grant is scheduled every this many washes
    pub grant_every: u32,
    /// Seconds between earning a grant and receiving it
    pub grant_delay: f32,
    pub grant_points: u64,
    pub grant_threshold_step: f32,
    pub grant_time: f32,
    /// Whether a premature ejection resets the perfect streak
    pub premature_ejection_breaks_streak: bool,
}

impl Default for ScoreTuning {
    fn default() -> Self {
        Self {
            starting_time: 30.0,
            starting_threshold: 80.0,
            time_bonus: 6.0,
            grant_every: 5,
            grant_delay: 3.0,
            grant_points: 500,
            grant_threshold_step: 4.0,
            grant_time: 0.5,
            premature_ejection_breaks_streak: false,
        }
    }
}

/// Complete balance sheet for a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub handle: HandleTuning,
    pub soap: SoapTuning,
    pub ball: BallTuning,
    pub score: ScoreTuning,
    /// Length of the "READY" count-in; zero starts the session immediately
    pub count_in_secs: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            handle: HandleTuning::default(),
            soap: SoapTuning::default(),
            ball: BallTuning::default(),
            score: ScoreTuning::default(),
            count_in_secs: 2.0,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break the simulation's range invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        fn check(ok: bool, msg: &str) -> Result<(), TuningError> {
            if ok {
                Ok(())
            } else {
                log::warn!("Rejected tuning: {}", msg);
                Err(TuningError::Invalid(msg.to_string()))
            }
        }

        let finite = [
            self.handle.max_speed,
            self.soap.max_amount,
            self.soap.min_amount,
            self.soap.base_reduction,
            self.soap.max_lifetime,
            self.ball.speed,
            self.ball.scrub_resistance,
            self.score.starting_time,
            self.score.starting_threshold,
            self.score.time_bonus,
            self.score.grant_delay,
            self.score.grant_threshold_step,
            self.score.grant_time,
            self.count_in_secs,
        ]
        .iter()
        .all(|v| v.is_finite());
        check(finite, "all values must be finite")?;

        check(self.handle.max_speed > 0.0, "handle.max_speed must be positive")?;
        check(
            self.soap.min_amount >= 0.0 && self.soap.min_amount <= self.soap.max_amount,
            "soap.min_amount must be within [0, soap.max_amount]",
        )?;
        check(self.soap.base_reduction >= 0.0, "soap.base_reduction must not be negative")?;
        check(self.soap.max_lifetime > 0.0, "soap.max_lifetime must be positive")?;
        check(
            self.soap.starting_bars <= self.soap.max_bars,
            "soap.starting_bars must not exceed soap.max_bars",
        )?;
        check(self.ball.speed > 0.0, "ball.speed must be positive")?;
        check(
            (0.0..=1.0).contains(&self.ball.scrub_resistance),
            "ball.scrub_resistance must be within [0, 1]",
        )?;
        check(self.score.starting_time > 0.0, "score.starting_time must be positive")?;
        check(
            (0.0..=MAX_FILTH).contains(&self.score.starting_threshold),
            "score.starting_threshold must be within [0, 100]",
        )?;
        check(self.score.time_bonus >= 0.0, "score.time_bonus must not be negative")?;
        check(self.score.grant_every > 0, "score.grant_every must be positive")?;
        check(self.score.grant_delay >= 0.0, "score.grant_delay must not be negative")?;
        check(self.score.grant_time >= 0.0, "score.grant_time must not be negative")?;
        check(self.count_in_secs >= 0.0, "count_in_secs must not be negative")?;
        Ok(())
    }
}
