//! Contact classification and game effects
//!
//! Each contact-begin event is classified by the roles of its two bodies,
//! independent of order, and dispatched to exactly one effect. Effects run
//! after contacts are detected and before the solver responds, so rules read
//! the incoming velocity and the response acts on whatever they set. Pairs
//! without a game meaning (wall hits, for instance) only matter to the solver.

use glam::Vec2;
use rand::Rng;

use super::body::{BodyId, BodyStore, Role};
use super::integrator::ContactEvent;
use super::state::{GameStatus, Session, spawn_ball_into};
use crate::cap_speed;
use crate::consts::BALL_LAUNCH_SPEED;
use crate::tuning::RuleTuning;

/// Game effect of a ball touching something
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Unstick and speed-limit a ball on the angled obstacle
    ObstacleBounce,
    /// Ball fell out of the arena
    Drain,
    /// Ball flew through the bonus zone
    BonusCapture,
    /// Ball deflected by the paddle
    PaddleHit,
}

impl Interaction {
    /// Classify an unordered role pair
    pub fn classify(a: Role, b: Role) -> Option<Self> {
        match (a, b) {
            (Role::Ball, other) | (other, Role::Ball) => Self::with_ball(other),
            _ => None,
        }
    }

    /// Every role must be listed here, so a new role forces a decision
    fn with_ball(other: Role) -> Option<Self> {
        match other {
            Role::Obstacle => Some(Self::ObstacleBounce),
            Role::BottomSensor => Some(Self::Drain),
            Role::BonusTarget => Some(Self::BonusCapture),
            Role::Paddle => Some(Self::PaddleHit),
            Role::LeftWall | Role::RightWall | Role::TopWall | Role::Ball => None,
        }
    }
}

/// Apply the game effect of every contact that began this step
pub fn handle_contacts(session: &mut Session, events: &[ContactEvent]) {
    for event in events {
        let (Some(a), Some(b)) = (session.store.get(event.a), session.store.get(event.b)) else {
            // A body removed earlier this tick
            continue;
        };
        let Some(interaction) = Interaction::classify(a.role, b.role) else {
            continue;
        };
        let (ball, other) = if a.role == Role::Ball {
            (event.a, event.b)
        } else {
            (event.b, event.a)
        };

        let Session {
            store,
            status,
            bounds,
            tuning,
            rng,
            ..
        } = session;
        let rules = &tuning.rules;

        match interaction {
            Interaction::ObstacleBounce => {
                obstacle_bounce(store, rules, ball, other, event.velocity_of(ball))
            }
            Interaction::Drain => drain(store, status, ball),
            Interaction::BonusCapture => {
                status.score += rules.bonus_score;
                let next = bounds.bonus_relocator().next_position(rng);
                if let Some(bonus) = store.get_mut(other) {
                    log::debug!("Bonus captured, moving {:?} -> {:?}", bonus.pos, next);
                    bonus.pos = next;
                }
            }
            Interaction::PaddleHit => {
                let incoming = event.velocity_of(ball);
                if paddle_hit(store, status, rules, ball, other, incoming) {
                    maybe_spawn(store, status, rules, rng, bounds);
                }
            }
        }
    }
}

fn obstacle_bounce(
    store: &mut BodyStore,
    rules: &RuleTuning,
    ball: BodyId,
    obstacle: BodyId,
    incoming: Option<Vec2>,
) {
    let Some(obstacle_y) = store.get(obstacle).map(|o| o.pos.y) else {
        return;
    };
    let Some(ball) = store.get_mut(ball) else {
        return;
    };

    let vel = incoming.unwrap_or(ball.vel);
    // Screen coordinates: smaller y is higher up
    let above = ball.pos.y < obstacle_y;

    if above && vel.y > rules.obstacle_stall_low && vel.y < rules.obstacle_stall_high {
        ball.vel = Vec2::new(vel.x * rules.obstacle_damping, rules.obstacle_above_nudge);
    }
    if !above && vel.y.abs() < rules.obstacle_trapped {
        ball.vel = Vec2::new(vel.x * rules.obstacle_damping, rules.obstacle_below_nudge);
    }

    // A fast arrival keeps its direction and drops any nudge
    if vel.length() > rules.obstacle_max_speed {
        ball.vel = cap_speed(vel, rules.obstacle_max_speed);
    }
}

fn drain(store: &BodyStore, status: &mut GameStatus, ball: BodyId) {
    if status.over {
        return;
    }
    status.over = true;
    log::info!(
        "Ball {:?} reached the bottom, round over with score {}",
        store.get(ball).and_then(|b| b.ball_id),
        status.score
    );
}

/// Score and deflect; false if either body is missing
fn paddle_hit(
    store: &mut BodyStore,
    status: &mut GameStatus,
    rules: &RuleTuning,
    ball: BodyId,
    paddle: BodyId,
    incoming: Option<Vec2>,
) -> bool {
    let Some((paddle_x, half_width)) = store.get(paddle).map(|p| (p.pos.x, p.half_width())) else {
        return false;
    };
    let Some(ball) = store.get_mut(ball) else {
        return false;
    };

    status.score += rules.paddle_score;

    // -1 at the left tip, +1 at the right tip
    let relative_impact = if half_width > 0.0 {
        (ball.pos.x - paddle_x) / half_width
    } else {
        0.0
    };
    let incoming = incoming.unwrap_or(ball.vel);
    ball.vel = Vec2::new(
        relative_impact * rules.paddle_deflection,
        incoming.y * -rules.paddle_boost,
    );
    true
}

fn maybe_spawn<R: Rng + ?Sized>(
    store: &mut BodyStore,
    status: &mut GameStatus,
    rules: &RuleTuning,
    rng: &mut R,
    bounds: &super::arena::ArenaBounds,
) {
    if !rules.spawn_on_paddle_hit || status.ball_count >= rules.ball_cap() {
        return;
    }
    if !(0.0..=1.0).contains(&rules.spawn_chance) || !rng.random_bool(rules.spawn_chance) {
        return;
    }

    let spread = rules.spawn_max_horizontal.abs();
    let vx = if spread > 0.0 {
        rng.random_range(-spread..=spread)
    } else {
        0.0
    };
    spawn_ball_into(
        store,
        status,
        bounds,
        Vec2::new(vx, BALL_LAUNCH_SPEED),
        rules.ball_cap(),
    );
}

/// Remove balls that left the arena without touching the bottom sensor
pub fn cull_escaped(session: &mut Session) {
    let bounds = session.bounds;
    let removed = session
        .store
        .retain(|b| b.role != Role::Ball || !bounds.is_escaped(b.pos));

    if !removed.is_empty() {
        session.status.ball_count = session.store.ball_count() as u32;
        log::debug!(
            "Culled {} escaped ball(s), {} live",
            removed.len(),
            session.status.ball_count
        );
    }
}
