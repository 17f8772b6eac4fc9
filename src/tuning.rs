//! Data-driven physics and rule constants
//!
//! Every epsilon and threshold the simulation uses lives here so balance
//! changes never touch the simulation code. Defaults reproduce the
//! reference feel of the game.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_BALLS;

/// Solver iteration counts and contact tolerances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverTuning {
    /// Positional correction passes per narrowphase pass
    pub position_iterations: u32,
    /// Impulse passes per narrowphase pass
    pub velocity_iterations: u32,
    /// Narrowphase re-detection passes per step
    pub constraint_iterations: u32,
    /// Allowed penetration before positional correction kicks in (px)
    pub slop: f32,
    /// Fraction of remaining penetration removed per position pass
    pub position_correction: f32,
}

impl Default for SolverTuning {
    fn default() -> Self {
        Self {
            position_iterations: 10,
            velocity_iterations: 10,
            constraint_iterations: 4,
            slop: 0.01,
            position_correction: 0.8,
        }
    }
}

/// Thresholds for the per-tick velocity stabilizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerTuning {
    /// |vy| below this counts as stalled
    pub stall_epsilon: f32,
    /// vy in (rising_floor, 0) counts as slow upward drift
    pub rising_floor: f32,
    /// Downward force applied to stalled balls
    pub stall_force: f32,
    /// |vx| below this is zeroed in the pre-pass
    pub horizontal_epsilon: f32,
    /// Hard speed cap (px/step)
    pub max_speed: f32,
    /// Speeds below this get the restart nudge
    pub min_speed: f32,
    /// Downward velocity given to stopped or floating balls
    pub restart_nudge: f32,
    /// |vx| below this counts as no horizontal motion for the float check
    pub float_horizontal: f32,
    /// Lower bound (exclusive) of the floating vy band
    pub float_low: f32,
    /// Upper bound (exclusive) of the floating vy band
    pub float_high: f32,
}

impl Default for StabilizerTuning {
    fn default() -> Self {
        Self {
            stall_epsilon: 0.1,
            rising_floor: -0.3,
            stall_force: 0.0005,
            horizontal_epsilon: 0.1,
            max_speed: 15.0,
            min_speed: 0.2,
            restart_nudge: 0.5,
            float_horizontal: 0.5,
            float_low: -0.5,
            float_high: 0.2,
        }
    }
}

/// Scoring and contact-effect constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTuning {
    pub paddle_score: u64,
    pub bonus_score: u64,
    /// Horizontal speed at the paddle tip (relative impact ±1)
    pub paddle_deflection: f32,
    /// Vertical reflection gain on a paddle hit
    pub paddle_boost: f32,
    /// Speed cap applied after an obstacle contact
    pub obstacle_max_speed: f32,
    /// vy band (exclusive) counting as stalled on top of the obstacle
    pub obstacle_stall_low: f32,
    pub obstacle_stall_high: f32,
    /// |vy| below this counts as trapped underneath the obstacle
    pub obstacle_trapped: f32,
    /// Horizontal damping applied when unsticking a ball from the obstacle
    pub obstacle_damping: f32,
    /// vy given to a ball stalled on top of the obstacle
    pub obstacle_above_nudge: f32,
    /// vy given to a ball trapped underneath the obstacle
    pub obstacle_below_nudge: f32,
    /// Spawn an extra ball on paddle hits
    pub spawn_on_paddle_hit: bool,
    /// Probability of a spawn per paddle hit
    pub spawn_chance: f64,
    /// Largest |vx| of a spawned ball
    pub spawn_max_horizontal: f32,
    /// Live ball limit; never above `MAX_BALLS`, see [`RuleTuning::ball_cap`]
    pub max_balls: u32,
}

impl Default for RuleTuning {
    fn default() -> Self {
        Self {
            paddle_score: 10,
            bonus_score: 25,
            paddle_deflection: 5.0,
            paddle_boost: 1.05,
            obstacle_max_speed: 10.0,
            obstacle_stall_low: -1.0,
            obstacle_stall_high: 0.5,
            obstacle_trapped: 0.5,
            obstacle_damping: 0.8,
            obstacle_above_nudge: 0.5,
            obstacle_below_nudge: 1.5,
            spawn_on_paddle_hit: true,
            spawn_chance: 0.1,
            spawn_max_horizontal: 1.0,
            max_balls: MAX_BALLS,
        }
    }
}

impl RuleTuning {
    /// Effective live ball limit
    pub fn ball_cap(&self) -> u32 {
        self.max_balls.min(MAX_BALLS)
    }
}

/// All tunable constants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub solver: SolverTuning,
    pub stabilizer: StabilizerTuning,
    pub rules: RuleTuning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "rules": { "spawn_on_paddle_hit": false } }"#;
        let tuning: Tuning = serde_json::from_str(json).unwrap();
        assert!(!tuning.rules.spawn_on_paddle_hit);
        assert_eq!(tuning.rules.paddle_score, 10);
        assert_eq!(tuning.solver.velocity_iterations, 10);
        assert_eq!(tuning.stabilizer.max_speed, 15.0);
    }

    #[test]
    fn test_max_balls_defaults_to_cap() {
        assert_eq!(Tuning::default().rules.max_balls, 7);
        assert_eq!(Tuning::default().rules.ball_cap(), 7);
    }

    #[test]
    fn test_ball_cap_never_exceeds_limit() {
        let json = r#"{ "rules": { "max_balls": 50 } }"#;
        let tuning: Tuning = serde_json::from_str(json).unwrap();
        assert_eq!(tuning.rules.ball_cap(), 7);

        let json = r#"{ "rules": { "max_balls": 3 } }"#;
        let tuning: Tuning = serde_json::from_str(json).unwrap();
        assert_eq!(tuning.rules.ball_cap(), 3);
    }
}
