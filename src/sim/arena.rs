//! Arena geometry and initial world layout
//!
//! Everything is derived from the presentation surface size; nothing is
//! placed at a hardcoded coordinate.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bonus::BonusRelocator;
use super::body::{Body, BodyStore, CollisionFilter, Material, Role, category};
use crate::consts::*;

/// Arena bounds derived from the surface size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    pub width: f32,
    pub height: f32,
    pub wall_thickness: f32,
}

impl ArenaBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            wall_thickness: WALL_THICKNESS,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Where new balls appear
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 3.0)
    }

    pub fn paddle_y(&self) -> f32 {
        self.height - PADDLE_OFFSET_FROM_BOTTOM
    }

    /// Allowed range of the paddle center for a paddle of `half_width`
    pub fn paddle_x_range(&self, half_width: f32) -> (f32, f32) {
        (
            half_width + self.wall_thickness,
            self.width - half_width - self.wall_thickness,
        )
    }

    /// Clamp a paddle target between the walls (NaN lands on the left stop)
    pub fn clamp_paddle_x(&self, x: f32, half_width: f32) -> f32 {
        let (min_x, max_x) = self.paddle_x_range(half_width);
        if min_x > max_x {
            return self.width / 2.0;
        }
        x.max(min_x).min(max_x)
    }

    /// True once a body has left the arena far enough that it cannot return
    pub fn is_escaped(&self, pos: Vec2) -> bool {
        let slack = self.wall_thickness * 4.0;
        pos.x < -slack
            || pos.x > self.width + slack
            || pos.y < -slack
            || pos.y > self.height + slack
    }

    pub fn bonus_relocator(&self) -> BonusRelocator {
        BonusRelocator::new(*self, BONUS_SIZE / 2.0)
    }
}

pub fn ball_material() -> Material {
    Material {
        restitution: 0.7,
        friction: 0.01,
        air_friction: 0.0008,
        density: 0.015,
    }
}

fn wall_material() -> Material {
    Material {
        restitution: 1.0,
        ..Material::default()
    }
}

fn paddle_material() -> Material {
    Material {
        restitution: 1.0,
        friction: 0.05,
        ..Material::default()
    }
}

fn obstacle_material() -> Material {
    Material {
        restitution: 0.7,
        friction: 0.05,
        ..Material::default()
    }
}

/// A dynamic ball at the spawn point
pub fn ball_body(bounds: &ArenaBounds, vel: Vec2) -> Body {
    Body::circle(Role::Ball, bounds.spawn_point(), BALL_RADIUS)
        .with_material(ball_material())
        .with_filter(CollisionFilter::new(
            category::BALL,
            category::DEFAULT | category::OBSTACLE,
        ))
        .with_velocity(vel)
}

/// Build the full starting world: walls, sensors, paddle, one ball, bonus, obstacle
pub fn build_world<R: Rng + ?Sized>(bounds: &ArenaBounds, rng: &mut R) -> BodyStore {
    let (w, h, t) = (bounds.width, bounds.height, bounds.wall_thickness);
    let mut store = BodyStore::new();

    store.insert(
        Body::rect(Role::LeftWall, Vec2::new(t / 2.0, h / 2.0), Vec2::new(t, h))
            .fixed()
            .with_material(wall_material()),
    );
    store.insert(
        Body::rect(Role::RightWall, Vec2::new(w - t / 2.0, h / 2.0), Vec2::new(t, h))
            .fixed()
            .with_material(wall_material()),
    );
    store.insert(
        Body::rect(Role::TopWall, Vec2::new(w / 2.0, t / 2.0), Vec2::new(w, t))
            .fixed()
            .with_material(wall_material()),
    );
    // Just below the visible arena
    store.insert(
        Body::rect(Role::BottomSensor, Vec2::new(w / 2.0, h + t / 2.0), Vec2::new(w, t))
            .fixed()
            .sensor(),
    );
    store.insert(
        Body::rect(
            Role::Paddle,
            Vec2::new(w / 2.0, bounds.paddle_y()),
            Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT),
        )
        .fixed()
        .with_material(paddle_material()),
    );

    store.insert(ball_body(bounds, Vec2::new(0.0, BALL_LAUNCH_SPEED)));

    let bonus_pos = bounds.bonus_relocator().next_position(rng);
    store.insert(
        Body::rect(Role::BonusTarget, bonus_pos, Vec2::splat(BONUS_SIZE))
            .fixed()
            .sensor(),
    );

    let angle = rng.random_range(-OBSTACLE_MAX_ANGLE..=OBSTACLE_MAX_ANGLE);
    store.insert(
        Body::rect(
            Role::Obstacle,
            bounds.center(),
            Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
        )
        .fixed()
        .with_angle(angle)
        .with_material(obstacle_material())
        .with_filter(CollisionFilter::new(category::OBSTACLE, category::BALL)),
    );

    store
}
