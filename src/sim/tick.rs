//! Fixed timestep simulation tick
//!
//! Core game loop that advances one session deterministically.

use super::body::{Body, Role};
use super::classifier::{cull_escaped, handle_contacts};
use super::stabilizer;
use super::state::Session;

/// Steps of ball motion the autopilot leads its target by
const AUTOPILOT_LEAD_STEPS: f32 = 8.0;
/// Largest sideways offset the autopilot adds so hits are not all dead-center
const AUTOPILOT_WOBBLE: f32 = 20.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Desired paddle center x (from mouse/touch position)
    pub paddle_target_x: Option<f32>,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut Session, input: &TickInput) {
    let Some(paddle) = session.store.find_role(Role::Paddle) else {
        log::warn!("Tick skipped: session has no paddle");
        return;
    };
    let half_width = paddle.half_width();

    let target = if input.idle_mode {
        autopilot_target(session).or(input.paddle_target_x)
    } else {
        input.paddle_target_x
    };

    if let Some(x) = target {
        let x = session.bounds.clamp_paddle_x(x, half_width);
        if let Some(paddle) = session.store.find_role_mut(Role::Paddle) {
            paddle.pos.x = x;
        }
    }

    stabilizer::pre_pass(&mut session.store, &session.tuning.stabilizer);
    let events = session.integrator.begin_step(&mut session.store);
    // Contact effects see incoming velocities; the response acts on their result
    handle_contacts(session, &events);
    session.integrator.solve(&mut session.store);
    stabilizer::post_pass(&mut session.store, &session.tuning.stabilizer);

    cull_escaped(session);
    session.time_ticks += 1;
}

/// Track the lowest falling ball, leading it slightly
fn autopilot_target(session: &Session) -> Option<f32> {
    let lowest = |a: &&Body, b: &&Body| {
        a.pos
            .y
            .partial_cmp(&b.pos.y)
            .unwrap_or(std::cmp::Ordering::Equal)
    };

    let ball = session
        .store
        .balls()
        .filter(|b| b.vel.y > 0.0)
        .max_by(lowest)
        .or_else(|| session.store.balls().max_by(lowest))?;

    // Oscillating offset based on time to create variety
    let time_factor = session.time_ticks as f32 * 0.01;
    let wobble = time_factor.sin() * AUTOPILOT_WOBBLE;

    let target = ball.pos + ball.vel * AUTOPILOT_LEAD_STEPS;
    target.x.is_finite().then_some(target.x + wobble)
}
