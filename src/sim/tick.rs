//! Per-frame simulation tick
//!
//! Intents are applied synchronously between frames; `tick` then advances
//! soap aging, the handle, the ball, the clock and pending grants, in that
//! order.

use serde::{Deserialize, Serialize};

use super::ball::{BallState, BallTransition};
use super::error::{IntentOutcome, SimError};
use super::handle::Direction;
use super::state::{GameEvent, GamePhase, Session, SoapGrant};
use crate::clamp_dt;

/// Abstract player intents (the host maps raw input onto these)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    SwitchHandle(Direction),
    InsertBall,
    RemoveBall,
    AddSoapBar,
}

/// Intents collected by the host during one frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Requested handle direction
    pub handle: Option<Direction>,
    pub insert_ball: bool,
    pub remove_ball: bool,
    pub add_soap: bool,
}

impl TickInput {
    /// Intents in the order they are applied
    pub fn intents(&self) -> impl Iterator<Item = Intent> + '_ {
        let flags = [
            (self.add_soap, Intent::AddSoapBar),
            (self.insert_ball, Intent::InsertBall),
            (self.remove_ball, Intent::RemoveBall),
        ];
        self.handle
            .map(Intent::SwitchHandle)
            .into_iter()
            .chain(flags.into_iter().filter_map(|(set, intent)| set.then_some(intent)))
    }
}

/// Apply one intent. Ignored intents leave the session untouched.
pub fn apply_intent(session: &mut Session, intent: Intent) -> IntentOutcome {
    let outcome: IntentOutcome = try_apply(session, intent).into();
    if let IntentOutcome::Ignored(reason) = outcome {
        log::trace!("Ignored {:?}: {}", intent, reason);
    }
    outcome
}

fn try_apply(session: &mut Session, intent: Intent) -> Result<(), SimError> {
    if !session.is_running() {
        return Err(SimError::SessionNotRunning);
    }

    match intent {
        Intent::SwitchHandle(direction) => {
            session.handle.check_switch(direction)?;
            let delta = session.handle.switch_direction(direction, &mut session.soap);
            scrub(session, delta);
        }
        Intent::InsertBall => session.ball.begin_insert(&mut session.handle)?,
        Intent::RemoveBall => session.ball.begin_extract(&mut session.handle)?,
        Intent::AddSoapBar => {
            session.soap.consume_one_bar()?;
            session.events.push(GameEvent::SoapRefilled);
        }
    }
    Ok(())
}

fn scrub(session: &mut Session, delta: f32) {
    if delta != 0.0 && session.ball.scrub(delta) {
        session.events.push(GameEvent::Scrubbed {
            delta,
            filth: session.ball.filth,
        });
    }
}

/// Apply a frame's worth of intents, then tick
pub fn step(session: &mut Session, input: &TickInput, dt: f32) {
    for intent in input.intents() {
        apply_intent(session, intent);
    }
    tick(session, dt);
}

/// Advance the session by `dt` seconds. Negative or non-finite `dt` is
/// treated as zero.
pub fn tick(session: &mut Session, dt: f32) {
    let dt = clamp_dt(dt);

    // soap only ages while it's on a ball
    if session.ball.state == BallState::Clean {
        session.soap.age(dt);
    }

    if let Some(delta) = session.handle.tick(dt, &session.soap) {
        scrub(session, delta);
    }

    if session.ball.is_translating() {
        let mut rng = session.rng_state.next_rng();
        match session.ball.tick(dt, &mut session.handle, &mut rng) {
            Some(BallTransition::Attached) => session.events.push(GameEvent::BallAttached),
            Some(BallTransition::Detached { cleanliness }) => {
                if session.score.update_score(cleanliness, &mut session.events) {
                    let delay = session.tuning.score.grant_delay;
                    session.pending_grants.push(SoapGrant { remaining: delay });
                    session.events.push(GameEvent::SoapGrantScheduled { delay });
                }
            }
            None => {}
        }
    }

    match session.phase {
        GamePhase::CountIn { remaining } => {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                session.begin();
            } else {
                session.phase = GamePhase::CountIn { remaining };
            }
        }
        GamePhase::Running => {
            if session.score.tick_session(dt, &mut session.events) {
                session.phase = GamePhase::GameOver;
            }
        }
        GamePhase::GameOver => {}
    }

    poll_grants(session, dt);
}

/// Count down pending soap grants and pay out the ones that matured. Grants
/// still pay out after the session has ended.
fn poll_grants(session: &mut Session, dt: f32) {
    if session.pending_grants.is_empty() {
        return;
    }

    let mut matured = 0;
    session.pending_grants.retain_mut(|grant| {
        grant.remaining -= dt;
        if grant.remaining <= 0.0 {
            matured += 1;
            false
        } else {
            true
        }
    });

    for _ in 0..matured {
        session.score.apply_soap_grant();
        session.soap.add_bar();
        session.events.push(GameEvent::NewSoapGranted);
        log::info!(
            "New soap bar granted ({} spare), threshold now {:.0}",
            session.soap.count,
            session.score.threshold
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::tuning::Tuning;

    fn running_session() -> Session {
        let tuning = Tuning {
            count_in_secs: 0.0,
            ..Default::default()
        };
        let mut session = Session::new(tuning, 12345).unwrap();
        session.drain_events();
        session
    }

    fn tick_for(session: &mut Session, secs: f32) {
        let ticks = (secs / SIM_DT).round() as u32;
        for _ in 0..ticks {
            tick(session, SIM_DT);
        }
    }

    #[test]
    fn test_count_in_to_running() {
        let mut session = Session::new(Tuning::default(), 1).unwrap();
        assert_eq!(
            apply_intent(&mut session, Intent::InsertBall),
            IntentOutcome::Ignored(SimError::SessionNotRunning)
        );
        tick_for(&mut session, 1.0);
        assert!(!session.is_running());
        tick_for(&mut session, 1.1);
        assert!(session.is_running());
        assert!(session.drain_events().contains(&GameEvent::Go));
        // clock only starts after the count-in
        assert!(session.score.remaining_time > 29.8);
    }

    #[test]
    fn test_insert_scrub_extract() {
        let mut session = running_session();
        assert!(apply_intent(&mut session, Intent::InsertBall).is_applied());
        assert!(session.handle.locked);
        assert_eq!(
            apply_intent(&mut session, Intent::SwitchHandle(Direction::Up)),
            IntentOutcome::Ignored(SimError::HandleLocked)
        );

        tick_for(&mut session, 0.3);
        assert_eq!(session.ball.state, BallState::Clean);
        assert!(session.drain_events().contains(&GameEvent::BallAttached));

        // one full stroke each way
        apply_intent(&mut session, Intent::SwitchHandle(Direction::Up));
        tick_for(&mut session, 0.25);
        apply_intent(&mut session, Intent::SwitchHandle(Direction::Down));
        tick_for(&mut session, 0.25);
        assert!(session.handle.is_parked());
        assert!(session.ball.filth < 85.0);
        assert!(session.soap.life_time > 0.0);

        assert!(apply_intent(&mut session, Intent::RemoveBall).is_applied());
        assert!(!session.handle.has_ball);
        tick_for(&mut session, 0.1);
        assert_eq!(session.ball.state, BallState::Idle);
        // default threshold is 80, so this was premature
        assert!(session.drain_events().contains(&GameEvent::PrematureEjection));
        assert_eq!(session.score.balls_washed, 0);
    }

    #[test]
    fn test_remove_requires_parked_handle() {
        let mut session = running_session();
        apply_intent(&mut session, Intent::InsertBall);
        tick_for(&mut session, 0.3);
        apply_intent(&mut session, Intent::SwitchHandle(Direction::Up));
        tick(&mut session, SIM_DT);
        assert_eq!(
            apply_intent(&mut session, Intent::RemoveBall),
            IntentOutcome::Ignored(SimError::HandleMoving)
        );
        assert!(session.handle.has_ball);
    }

    #[test]
    fn test_add_soap_bar() {
        let mut session = running_session();
        session.soap.amount = 3.0;
        assert!(apply_intent(&mut session, Intent::AddSoapBar).is_applied());
        assert_eq!(session.soap.amount, 10.0);
        assert_eq!(session.soap.count, 0);
        assert_eq!(session.drain_events(), vec![GameEvent::SoapRefilled]);

        assert_eq!(
            apply_intent(&mut session, Intent::AddSoapBar),
            IntentOutcome::Ignored(SimError::NoSpareBars)
        );
        assert!(session.events.is_empty());
    }

    #[test]
    fn test_soap_does_not_age_without_ball() {
        let mut session = running_session();
        tick_for(&mut session, 1.0);
        assert_eq!(session.soap.life_time, 0.0);
    }

    #[test]
    fn test_negative_dt_is_ignored() {
        let mut session = running_session();
        let before = session.score.remaining_time;
        tick(&mut session, -5.0);
        tick(&mut session, f32::NAN);
        assert_eq!(session.score.remaining_time, before);
        assert_eq!(session.score.total_run_time, 0.0);
    }

    #[test]
    fn test_tick_input_order() {
        let input = TickInput {
            handle: Some(Direction::Up),
            insert_ball: true,
            add_soap: true,
            ..Default::default()
        };
        let intents: Vec<Intent> = input.intents().collect();
        assert_eq!(
            intents,
            vec![
                Intent::SwitchHandle(Direction::Up),
                Intent::AddSoapBar,
                Intent::InsertBall
            ]
        );
    }

    #[test]
    fn test_determinism() {
        let mut a = running_session();
        let mut b = running_session();
        let inputs = [
            TickInput {
                insert_ball: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                handle: Some(Direction::Up),
                ..Default::default()
            },
            TickInput {
                handle: Some(Direction::Down),
                ..Default::default()
            },
        ];
        for input in inputs.iter().cycle().take(400) {
            step(&mut a, input, SIM_DT);
            step(&mut b, input, SIM_DT);
        }
        assert_eq!(a.ball.filth, b.ball.filth);
        assert_eq!(a.ball.colour_index, b.ball.colour_index);
        assert_eq!(a.score.total_score, b.score.total_score);
        assert_eq!(a.soap.amount, b.soap.amount);
    }

    #[test]
    fn test_full_stroke_reports_scrub() {
        let mut session = running_session();
        apply_intent(&mut session, Intent::InsertBall);
        tick_for(&mut session, 0.3);
        session.drain_events();

        apply_intent(&mut session, Intent::SwitchHandle(Direction::Up));
        tick_for(&mut session, 0.25);
        let scrubs: Vec<GameEvent> = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Scrubbed { .. }))
            .collect();
        assert_eq!(scrubs.len(), 1);
        match scrubs[0] {
            GameEvent::Scrubbed { delta, filth } => {
                assert!((delta - 10.0).abs() < 1e-3);
                assert_eq!(filth, session.ball.filth);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_huge_dt_ends_session_without_overflow() {
        let mut session = running_session();
        session.score.threshold = 50.0;
        apply_intent(&mut session, Intent::InsertBall);
        tick_for(&mut session, 0.3);
        session.ball.filth = 50.0;
        apply_intent(&mut session, Intent::RemoveBall);
        tick_for(&mut session, 0.05);
        assert_eq!(session.score.total_score, 50);

        tick(&mut session, 1.0e20);
        assert!(session.is_over());
        assert_eq!(session.score.total_score, u64::MAX);
        assert_eq!(session.score.remaining_time, 0.0);

        tick(&mut session, f32::MAX);
        assert_eq!(session.score.total_score, u64::MAX);
    }
}
