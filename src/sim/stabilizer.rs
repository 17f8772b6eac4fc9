//! Per-tick velocity stabilization for balls
//!
//! Discrete integration lets a ball stall (gravity and friction cancel) or
//! run away (restitution and paddle boosts stack). These passes are
//! deliberately non-physical and run every tick, contact or not.

use glam::Vec2;

use super::body::BodyStore;
use crate::cap_speed;
use crate::tuning::StabilizerTuning;

/// Before integration: nudge stalled balls and kill horizontal jitter
pub fn pre_pass(store: &mut BodyStore, tuning: &StabilizerTuning) {
    for ball in store.balls_mut() {
        let vy = ball.vel.y;
        let stalled = vy.abs() < tuning.stall_epsilon;
        let drifting_up = vy < 0.0 && vy > tuning.rising_floor;

        if stalled || drifting_up {
            ball.apply_force(Vec2::new(0.0, tuning.stall_force));
        }

        if ball.vel.x.abs() < tuning.horizontal_epsilon {
            ball.vel.x = 0.0;
        }
    }
}

/// After integration and contact handling: cap speed and restart stopped balls
pub fn post_pass(store: &mut BodyStore, tuning: &StabilizerTuning) {
    for ball in store.balls_mut() {
        if !ball.vel.is_finite() {
            log::warn!(
                "Ball {:?} had non-finite velocity {:?}, resetting",
                ball.ball_id,
                ball.vel
            );
            ball.vel = Vec2::new(0.0, tuning.restart_nudge);
            continue;
        }

        ball.vel = cap_speed(ball.vel, tuning.max_speed);

        if ball.vel.length() < tuning.min_speed {
            ball.vel = Vec2::new(0.0, tuning.restart_nudge);
        }

        // Hovering: no sideways motion and barely moving vertically
        let vel = ball.vel;
        if vel.x.abs() < tuning.float_horizontal
            && vel.y > tuning.float_low
            && vel.y < tuning.float_high
        {
            ball.vel.y = tuning.restart_nudge;
        }
    }
}
