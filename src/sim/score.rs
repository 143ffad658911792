//! Time budget, scoring and streak bonuses

use serde::{Deserialize, Serialize};

use super::state::GameEvent;
use crate::consts::MAX_FILTH;
use crate::tuning::ScoreTuning;

/// (points, seconds) awarded when a perfect streak hits a milestone
fn streak_bonus(run: u32) -> Option<(u64, f32)> {
    match run {
        3 => Some((3000, 0.5)),
        5 => Some((5000, 2.0)),
        n if n > 0 && n % 10 == 0 => Some((10000, 10.0)),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Score {
    pub remaining_time: f32,
    pub balls_washed: u32,
    /// Divide by `balls_washed` for the average
    pub cleanliness_sum: f32,
    pub total_score: u64,
    /// Consecutive perfectly clean balls
    pub bonus_run: u32,
    /// Longest perfect streak this session
    pub best_run: u32,
    /// Ball must be at least this clean to score
    pub threshold: f32,
    pub game_running: bool,
    pub total_run_time: f32,
    tuning: ScoreTuning,
}

impl Score {
    pub fn new(tuning: &ScoreTuning) -> Self {
        Self {
            remaining_time: tuning.starting_time,
            balls_washed: 0,
            cleanliness_sum: 0.0,
            total_score: 0,
            bonus_run: 0,
            best_run: 0,
            threshold: tuning.starting_threshold,
            game_running: false,
            total_run_time: 0.0,
            tuning: *tuning,
        }
    }

    pub fn avg_cleanliness(&self) -> f32 {
        if self.balls_washed == 0 {
            0.0
        } else {
            self.cleanliness_sum / self.balls_washed as f32
        }
    }

    /// Start the countdown
    pub fn start(&mut self) {
        self.game_running = true;
    }

    /// Score one extracted ball. Returns true when this wash earns a soap grant.
    pub fn update_score(&mut self, cleanliness: f32, events: &mut Vec<GameEvent>) -> bool {
        if cleanliness < self.threshold {
            log::debug!(
                "Premature ejection: cleanliness {:.1} < threshold {:.1}",
                cleanliness,
                self.threshold
            );
            events.push(GameEvent::PrematureEjection);
            if self.tuning.premature_ejection_breaks_streak {
                self.break_streak(events);
            }
            return false;
        }

        self.balls_washed += 1;
        self.cleanliness_sum += cleanliness;

        let points = cleanliness.floor() as u64;
        self.total_score = self.total_score.saturating_add(points);

        let time_bonus = if self.game_running {
            let bonus = self.tuning.time_bonus * (cleanliness / 100.0);
            self.remaining_time += bonus;
            bonus
        } else {
            0.0
        };
        events.push(GameEvent::BallScored { points, time_bonus });
        log::debug!(
            "Ball {} scored {} (cleanliness {:.1}, +{:.2}s)",
            self.balls_washed,
            points,
            cleanliness,
            time_bonus
        );

        if cleanliness == MAX_FILTH {
            self.bonus_run += 1;
            self.best_run = self.best_run.max(self.bonus_run);
            events.push(GameEvent::PerfectCleanStreak(self.bonus_run));

            if let Some((points, seconds)) = streak_bonus(self.bonus_run) {
                self.total_score = self.total_score.saturating_add(points);
                self.remaining_time += seconds;
                events.push(GameEvent::StreakBonus {
                    run: self.bonus_run,
                    points,
                    seconds,
                });
                log::info!("Streak of {} perfect balls: +{}", self.bonus_run, points);
            }
        } else {
            self.break_streak(events);
        }

        self.balls_washed
            .checked_rem(self.tuning.grant_every)
            .is_some_and(|r| r == 0)
    }

    fn break_streak(&mut self, events: &mut Vec<GameEvent>) {
        if self.bonus_run != 0 {
            events.push(GameEvent::StreakBroken { run: self.bonus_run });
        }
        self.bonus_run = 0;
    }

    /// Score-side effects of a matured soap grant. Applied in full even after
    /// the session has ended.
    pub fn apply_soap_grant(&mut self) {
        self.total_score = self.total_score.saturating_add(self.tuning.grant_points);
        self.threshold = (self.threshold + self.tuning.grant_threshold_step).min(MAX_FILTH);
        self.remaining_time += self.tuning.grant_time;
    }

    /// Run the countdown. Returns true on the tick the session ends.
    pub fn tick_session(&mut self, dt: f32, events: &mut Vec<GameEvent>) -> bool {
        if !self.game_running {
            return false;
        }

        self.total_run_time += dt;
        self.remaining_time = (self.remaining_time - dt).max(0.0);

        if self.remaining_time == 0.0 {
            self.game_running = false;
            let bonus = (self.avg_cleanliness().floor() as u64)
                .saturating_add(self.total_run_time.floor() as u64);
            self.total_score = self.total_score.saturating_add(bonus);

            log::info!(
                "Session ended: {} balls, avg {:.1}%, score {}",
                self.balls_washed,
                self.avg_cleanliness(),
                self.total_score
            );
            events.push(GameEvent::SessionEnded(self.total_score));
            return true;
        }
        false
    }
}
