//! The scrub handle
//!
//! The player flips the handle between two extremes. Each flip (or each
//! completed travel to an extreme) produces a cleaning delta whose size depends
//! on how far the handle travelled since the last stroke and on how much
//! potency is left in the soap.

use serde::{Deserialize, Serialize};

use super::easing::{ease_in_quad, ease_out_sine};
use super::error::SimError;
use super::soap::Soap;
use crate::consts::STROKE_DISTANCE;
use crate::tuning::HandleTuning;

/// Direction of travel requested by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    #[default]
    Down,
}

impl Direction {
    /// Down drives progress towards 0, Up towards 1
    pub fn sign(self) -> f32 {
        match self {
            Direction::Up => -1.0,
            Direction::Down => 1.0,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Handle {
    pub direction: Direction,
    /// Normalised travel, 0 = home, 1 = fully stroked
    pub progress: f32,
    pub speed: f32,
    /// Offset at which the current stroke began
    pub stroke_start: f32,
    /// Set while a ball is being inserted
    pub locked: bool,
    /// Strokes only clean while a ball is attached
    pub has_ball: bool,
    max_speed: f32,
}

impl Handle {
    pub fn new(tuning: &HandleTuning) -> Self {
        Self {
            direction: Direction::Down,
            progress: 0.0,
            speed: 0.0,
            stroke_start: 0.0,
            locked: false,
            has_ball: false,
            max_speed: tuning.max_speed,
        }
    }

    /// Current vertical offset derived from progress
    pub fn offset(&self) -> f32 {
        ease_out_sine(self.progress) * -STROKE_DISTANCE
    }

    pub fn is_resting(&self) -> bool {
        self.speed == 0.0
    }

    /// Resting at the home position, where balls are inserted and removed
    pub fn is_parked(&self) -> bool {
        self.is_resting() && self.progress == 0.0
    }

    /// Whether a switch to `requested` would be accepted
    pub fn check_switch(&self, requested: Direction) -> Result<(), SimError> {
        if self.locked {
            Err(SimError::HandleLocked)
        } else if requested == self.direction {
            Err(SimError::SameDirection)
        } else {
            Ok(())
        }
    }

    /// Reverse the handle. Returns the cleaning delta of the stroke that was
    /// interrupted, or 0 if the switch was rejected.
    pub fn switch_direction(&mut self, requested: Direction, soap: &mut Soap) -> f32 {
        if self.check_switch(requested).is_err() {
            return 0.0;
        }

        // uses the old direction
        let delta = self.calc_stroke(soap);

        self.direction = requested;
        self.speed = self.max_speed;

        if self.has_ball {
            soap.wear();
        }
        delta
    }

    /// Close off the current stroke and return its cleaning power
    pub fn calc_stroke(&mut self, soap: &Soap) -> f32 {
        let pos = self.offset();
        let stroke = ((pos - self.stroke_start) / STROKE_DISTANCE) * self.direction.sign();
        self.stroke_start = pos;

        if self.has_ball {
            ease_in_quad(stroke.abs()) * stroke.signum() * soap.amount
        } else {
            0.0
        }
    }

    /// Advance the handle. Returns the completed stroke's delta when the
    /// handle arrives at an extreme.
    pub fn tick(&mut self, dt: f32, soap: &Soap) -> Option<f32> {
        self.progress =
            (self.progress + self.speed * -self.direction.sign() * dt).clamp(0.0, 1.0);

        if (self.progress == 0.0 || self.progress == 1.0) && self.speed != 0.0 {
            let delta = self.calc_stroke(soap);
            self.speed = 0.0;
            return Some(delta);
        }
        None
    }
}
