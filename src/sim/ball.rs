//! Ball lifecycle
//!
//! Idle -> Insert -> Clean -> Extract -> Idle. The ball only accepts scrubs
//! while it is attached to the handle (Clean).

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::SimError;
use super::handle::Handle;
use crate::consts::*;
use crate::tuning::BallTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BallState {
    /// Detached, waiting at the rest point
    #[default]
    Idle,
    /// Travelling towards the handle
    Insert,
    /// Attached and scrubbable
    Clean,
    /// Travelling away from the handle
    Extract,
}

/// Reported by [`Ball::tick`] when the ball changes hands
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BallTransition {
    Attached,
    /// Carries `MAX_FILTH - filth` as measured at the moment of detachment
    Detached { cleanliness: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub filth: f32,
    pub state: BallState,
    /// Translation along the insert axis
    pub x: f32,
    /// Cosmetic colour, index into the host's palette
    pub colour_index: usize,
    tuning: BallTuning,
}

impl Ball {
    pub fn new(tuning: &BallTuning, colour_index: usize) -> Self {
        Self {
            filth: MAX_FILTH,
            state: BallState::Idle,
            x: BALL_REST_X,
            colour_index: colour_index % BALL_PALETTE_SIZE,
            tuning: *tuning,
        }
    }

    pub fn cleanliness(&self) -> f32 {
        MAX_FILTH - self.filth
    }

    pub fn is_translating(&self) -> bool {
        matches!(self.state, BallState::Insert | BallState::Extract)
    }

    pub fn begin_insert(&mut self, handle: &mut Handle) -> Result<(), SimError> {
        if self.state != BallState::Idle || handle.has_ball || handle.locked {
            return Err(SimError::AlreadyBusy);
        }
        if !handle.is_parked() {
            return Err(SimError::HandleMoving);
        }
        self.state = BallState::Insert;
        handle.locked = true;
        Ok(())
    }

    pub fn begin_extract(&mut self, handle: &mut Handle) -> Result<(), SimError> {
        if !handle.has_ball || self.state != BallState::Clean {
            return Err(SimError::NoBallAttached);
        }
        if !handle.is_parked() {
            return Err(SimError::HandleMoving);
        }
        self.state = BallState::Extract;
        handle.has_ball = false;
        Ok(())
    }

    /// Remove `|delta|` filth. Returns false if the ball isn't attached.
    pub fn scrub(&mut self, delta: f32) -> bool {
        if self.state != BallState::Clean {
            return false;
        }

        // nearly clean balls resist when scrub_resistance > 0
        let r = self.tuning.scrub_resistance;
        let multiplier = 1.0 - r + r * (self.filth / MAX_FILTH);

        self.filth = (self.filth - delta.abs() * multiplier).clamp(0.0, MAX_FILTH);
        true
    }

    /// Advance insertion/extraction. On detachment the ball resets itself
    /// for the next round and picks a new colour.
    pub fn tick<R: Rng>(
        &mut self,
        dt: f32,
        handle: &mut Handle,
        rng: &mut R,
    ) -> Option<BallTransition> {
        match self.state {
            BallState::Idle | BallState::Clean => None,
            BallState::Insert => {
                self.x = (self.x + self.tuning.speed * dt).min(BALL_ATTACH_X);
                if self.x == BALL_ATTACH_X {
                    self.state = BallState::Clean;
                    handle.has_ball = true;
                    handle.locked = false;
                    return Some(BallTransition::Attached);
                }
                None
            }
            BallState::Extract => {
                self.x += self.tuning.speed * dt;
                if self.x > BALL_EXIT_X {
                    let cleanliness = self.cleanliness();

                    self.state = BallState::Idle;
                    self.filth = MAX_FILTH;
                    self.x = BALL_REST_X;
                    self.colour_index =
                        (self.colour_index + rng.random_range(1..=3)) % BALL_PALETTE_SIZE;

                    return Some(BallTransition::Detached { cleanliness });
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::HandleTuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (Ball, Handle, Pcg32) {
        (
            Ball::new(&BallTuning::default(), 0),
            Handle::new(&HandleTuning::default()),
            Pcg32::seed_from_u64(7),
        )
    }

    fn run_until_transition(ball: &mut Ball, handle: &mut Handle, rng: &mut Pcg32) -> BallTransition {
        for _ in 0..10_000 {
            if let Some(t) = ball.tick(1.0 / 120.0, handle, rng) {
                return t;
            }
        }
        panic!("ball never transitioned");
    }

    #[test]
    fn test_insert_attaches() {
        let (mut ball, mut handle, mut rng) = setup();
        ball.begin_insert(&mut handle).unwrap();
        assert_eq!(ball.state, BallState::Insert);
        assert!(handle.locked);

        let t = run_until_transition(&mut ball, &mut handle, &mut rng);
        assert_eq!(t, BallTransition::Attached);
        assert_eq!(ball.state, BallState::Clean);
        assert!(handle.has_ball);
        assert!(!handle.locked);
    }

    #[test]
    fn test_insert_rejected_while_busy() {
        let (mut ball, mut handle, _) = setup();
        ball.begin_insert(&mut handle).unwrap();
        assert_eq!(ball.begin_insert(&mut handle), Err(SimError::AlreadyBusy));
    }

    #[test]
    fn test_insert_rejected_while_handle_moves() {
        let (mut ball, mut handle, _) = setup();
        handle.speed = 6.0;
        assert_eq!(ball.begin_insert(&mut handle), Err(SimError::HandleMoving));
        assert_eq!(ball.state, BallState::Idle);
        assert!(!handle.locked);
    }

    #[test]
    fn test_extract_detaches_immediately() {
        let (mut ball, mut handle, mut rng) = setup();
        assert_eq!(ball.begin_extract(&mut handle), Err(SimError::NoBallAttached));

        ball.begin_insert(&mut handle).unwrap();
        run_until_transition(&mut ball, &mut handle, &mut rng);
        ball.filth = 38.0;

        ball.begin_extract(&mut handle).unwrap();
        assert_eq!(ball.state, BallState::Extract);
        assert!(!handle.has_ball);
        // no longer scrubbable
        assert!(!ball.scrub(10.0));
        assert_eq!(ball.filth, 38.0);

        let colour = ball.colour_index;
        let t = run_until_transition(&mut ball, &mut handle, &mut rng);
        match t {
            BallTransition::Detached { cleanliness } => assert!((cleanliness - 62.0).abs() < 1e-4),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(ball.state, BallState::Idle);
        assert_eq!(ball.filth, MAX_FILTH);
        assert_eq!(ball.x, BALL_REST_X);
        assert_ne!(ball.colour_index, colour);
    }

    #[test]
    fn test_scrub_clamps() {
        let (mut ball, _, _) = setup();
        ball.state = BallState::Clean;
        ball.scrub(-30.0);
        assert_eq!(ball.filth, 70.0);
        ball.scrub(500.0);
        assert_eq!(ball.filth, 0.0);
        ball.scrub(5.0);
        assert_eq!(ball.filth, 0.0);
    }

    #[test]
    fn test_scrub_resistance() {
        let tuning = BallTuning {
            scrub_resistance: 0.65,
            ..Default::default()
        };
        let mut ball = Ball::new(&tuning, 0);
        ball.state = BallState::Clean;
        ball.filth = 50.0;
        ball.scrub(10.0);
        // multiplier = 0.35 + 0.65 * 0.5
        assert!((ball.filth - (50.0 - 6.75)).abs() < 1e-4);
    }
}
