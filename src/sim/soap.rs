//! Soap supply: a consumable that ages and loses potency

use serde::{Deserialize, Serialize};

use super::easing::ease_in_expo;
use super::error::SimError;
use crate::tuning::SoapTuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Soap {
    /// Cleaning power multiplier, within [min_amount, max_amount]
    pub amount: f32,
    /// Seconds this bar has spent on an attached ball
    pub life_time: f32,
    /// Spare bars
    pub count: u32,
    tuning: SoapTuning,
}

impl Soap {
    pub fn new(tuning: &SoapTuning) -> Self {
        Self {
            amount: tuning.max_amount,
            life_time: 0.0,
            count: tuning.starting_bars,
            tuning: *tuning,
        }
    }

    pub fn min_amount(&self) -> f32 {
        self.tuning.min_amount
    }

    pub fn max_amount(&self) -> f32 {
        self.tuning.max_amount
    }

    /// Amount lost per direction switch. Older soap wears out faster.
    pub fn reduction(&self) -> f32 {
        let age = (self.life_time / self.tuning.max_lifetime).min(1.0);
        self.tuning.base_reduction * ease_in_expo(age)
    }

    /// Wear the bar down by one switch, never below the minimum
    pub fn wear(&mut self) {
        self.amount = (self.amount - self.reduction()).max(self.tuning.min_amount);
    }

    /// Only called while a ball is attached
    pub fn age(&mut self, dt: f32) {
        self.life_time += dt;
    }

    pub fn consume_one_bar(&mut self) -> Result<(), SimError> {
        if self.count == 0 {
            return Err(SimError::NoSpareBars);
        }
        self.count -= 1;
        self.refill();
        Ok(())
    }

    pub fn refill(&mut self) {
        self.life_time = 0.0;
        self.amount = self.tuning.max_amount;
    }

    /// Add a spare bar, capped
    pub fn add_bar(&mut self) {
        self.count = (self.count + 1).min(self.tuning.max_bars);
    }

    /// Normalised level for a HUD gauge
    pub fn level(&self) -> f32 {
        let span = self.tuning.max_amount - self.tuning.min_amount;
        if span <= 0.0 {
            return 1.0;
        }
        ((self.amount - self.tuning.min_amount) / span).clamp(0.0, 1.0)
    }
}
