//! Round state and the session that owns it
//!
//! A session is created whole on start/restart and thrown away whole when the
//! round ends; nothing from an old session is ever reused.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::{ArenaBounds, ball_body, build_world};
use super::body::{BallId, BodyStore};
use super::integrator::Integrator;
use crate::tuning::Tuning;

/// Score and lifecycle flags of one round
///
/// During a tick only the classifier writes this: contact effects, spawns
/// and the recount after escaped balls are culled. `Session::spawn_ball` is
/// the one entry point outside a tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatus {
    pub score: u64,
    /// Set once a ball reaches the bottom sensor
    pub over: bool,
    /// Live balls in the arena
    pub ball_count: u32,
}

/// Gravity strength, stored in tenths so repeated steps never drift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    tenths: u8,
}

/// One button press on the difficulty controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyChange {
    Slower,
    Faster,
}

impl Difficulty {
    pub const MIN_TENTHS: u8 = 2;
    pub const MAX_TENTHS: u8 = 10;

    /// Snap to the nearest 0.1 and clamp to [0.2, 1.0]
    pub fn new(value: f32) -> Self {
        let tenths = if value.is_finite() {
            (value * 10.0)
                .round()
                .clamp(Self::MIN_TENTHS as f32, Self::MAX_TENTHS as f32) as u8
        } else {
            Self::default().tenths
        };
        Self { tenths }
    }

    /// Gravity y for this difficulty
    pub fn value(&self) -> f32 {
        self.tenths as f32 / 10.0
    }

    /// Display level (value × 10)
    pub fn level(&self) -> u8 {
        self.tenths
    }

    pub fn adjusted(self, change: DifficultyChange) -> Self {
        let tenths = match change {
            DifficultyChange::Slower => self.tenths.saturating_sub(1).max(Self::MIN_TENTHS),
            DifficultyChange::Faster => (self.tenths + 1).min(Self::MAX_TENTHS),
        };
        Self { tenths }
    }

    pub fn gravity(&self) -> Vec2 {
        Vec2::new(0.0, self.value())
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self { tenths: 5 }
    }
}

/// Everything one round owns: bodies, status, solver and RNG
#[derive(Debug, Clone)]
pub struct Session {
    pub store: BodyStore,
    pub status: GameStatus,
    pub bounds: ArenaBounds,
    pub integrator: Integrator,
    pub tuning: Tuning,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
}

impl Session {
    /// Build a fresh world; `seed` drives obstacle angle, bonus placement and spawns
    pub fn new(bounds: ArenaBounds, difficulty: Difficulty, tuning: Tuning, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let store = build_world(&bounds, &mut rng);
        let status = GameStatus {
            score: 0,
            over: false,
            ball_count: store.ball_count() as u32,
        };
        let integrator = Integrator::new(difficulty.gravity(), tuning.solver.clone());

        Self {
            store,
            status,
            bounds,
            integrator,
            tuning,
            time_ticks: 0,
            rng,
        }
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.integrator.gravity = difficulty.gravity();
    }

    /// Add a ball at the spawn point unless the cap is reached
    pub fn spawn_ball(&mut self, vel: Vec2) -> Option<BallId> {
        spawn_ball_into(
            &mut self.store,
            &mut self.status,
            &self.bounds,
            vel,
            self.tuning.rules.ball_cap(),
        )
    }
}

/// Shared by the session API and the contact handlers
pub(crate) fn spawn_ball_into(
    store: &mut BodyStore,
    status: &mut GameStatus,
    bounds: &ArenaBounds,
    vel: Vec2,
    max_balls: u32,
) -> Option<BallId> {
    if status.ball_count >= max_balls {
        return None;
    }
    let id = store.insert(ball_body(bounds, vel));
    status.ball_count += 1;
    let ball_id = store.get(id).and_then(|b| b.ball_id);
    log::debug!("Spawned ball {:?} ({} live)", ball_id, status.ball_count);
    ball_id
}
