//! Ball Bounce - a falling-ball paddle arcade toy
//!
//! Core modules:
//! - `sim`: Deterministic simulation (integration, stabilization, collisions, game state)
//! - `settings`: Arena/session configuration loaded from JSON
//! - `tuning`: Data-driven physics and rule constants

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz)
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;
    /// Largest wall-clock delta accepted per frame, in milliseconds
    pub const MAX_FRAME_DELTA_MS: f32 = 32.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 3;
    /// Gravity scale: per-step velocity change is `gravity * GRAVITY_SCALE * SIM_DT_MS²`
    pub const GRAVITY_SCALE: f32 = 0.001;

    /// Arena walls
    pub const WALL_THICKNESS: f32 = 30.0;

    /// Ball defaults (radius, px)
    pub const BALL_RADIUS: f32 = 20.0;
    /// Vertical launch speed of a freshly spawned ball (px/step)
    pub const BALL_LAUNCH_SPEED: f32 = 3.0;
    pub const MAX_BALLS: u32 = 7;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    /// Distance from the bottom edge of the arena to the paddle center
    pub const PADDLE_OFFSET_FROM_BOTTOM: f32 = 100.0;

    /// Bonus zone (square)
    pub const BONUS_SIZE: f32 = 60.0;
    /// Extra clearance between the bonus zone and the walls
    pub const BONUS_CLEARANCE: f32 = 10.0;

    /// Angled obstacle in the middle of the arena
    pub const OBSTACLE_WIDTH: f32 = 150.0;
    pub const OBSTACLE_HEIGHT: f32 = 20.0;
    /// Obstacle angle is drawn from [-MAX, MAX] radians
    pub const OBSTACLE_MAX_ANGLE: f32 = std::f32::consts::FRAC_PI_4;
}

/// Rescale `vel` to `max_speed` if it is faster, preserving direction
#[inline]
pub fn cap_speed(vel: Vec2, max_speed: f32) -> Vec2 {
    let speed = vel.length();
    if speed > max_speed {
        vel * (max_speed / speed)
    } else {
        vel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_speed_preserves_direction() {
        let capped = cap_speed(Vec2::new(30.0, 40.0), 10.0);
        assert!((capped.length() - 10.0).abs() < 1e-4);
        assert!((capped.x - 6.0).abs() < 1e-4);
        assert!((capped.y - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_cap_speed_leaves_slow_vectors() {
        let vel = Vec2::new(1.0, -2.0);
        assert_eq!(cap_speed(vel, 15.0), vel);
    }
}
