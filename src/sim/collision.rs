//! Narrowphase collision detection
//!
//! Balls are circles; everything they can touch is either a circle or a
//! (possibly rotated) rectangle. Rectangles never move against each other,
//! so rectangle pairs are not tested.

use glam::Vec2;

use super::body::{Body, Shape};

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Collision point (if hit)
    pub point: Vec2,
    /// Surface normal at collision, pointing toward the first body
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }

    fn flipped(mut self) -> Self {
        self.normal = -self.normal;
        self
    }
}

/// Check collision between a circle and a rotated rectangle
///
/// The normal points from the rectangle toward the circle center.
pub fn circle_rect_collision(
    center: Vec2,
    radius: f32,
    rect_pos: Vec2,
    half_extents: Vec2,
    angle: f32,
) -> CollisionResult {
    // Work in the rectangle's frame
    let local = Vec2::from_angle(-angle).rotate(center - rect_pos);
    let closest = local.clamp(-half_extents, half_extents);
    let inside = local.x.abs() <= half_extents.x && local.y.abs() <= half_extents.y;

    let (normal_local, point_local, penetration) = if !inside {
        let diff = local - closest;
        let dist_sq = diff.length_squared();
        if dist_sq >= radius * radius {
            return CollisionResult::miss();
        }
        let dist = dist_sq.sqrt();
        (diff / dist, closest, radius - dist)
    } else {
        // Center is inside the box: push out along the shallowest axis
        let depth_x = half_extents.x - local.x.abs();
        let depth_y = half_extents.y - local.y.abs();
        if depth_x < depth_y {
            let side = local.x.signum();
            (
                Vec2::new(side, 0.0),
                Vec2::new(side * half_extents.x, local.y),
                depth_x + radius,
            )
        } else {
            let side = local.y.signum();
            (
                Vec2::new(0.0, side),
                Vec2::new(local.x, side * half_extents.y),
                depth_y + radius,
            )
        }
    };

    let to_world = Vec2::from_angle(angle);
    CollisionResult {
        hit: true,
        point: rect_pos + to_world.rotate(point_local),
        normal: to_world.rotate(normal_local),
        penetration,
    }
}

/// Check collision between two circles; normal points toward `a`
pub fn circle_circle_collision(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> CollisionResult {
    let diff = a - b;
    let reach = radius_a + radius_b;
    let dist_sq = diff.length_squared();
    if dist_sq >= reach * reach {
        return CollisionResult::miss();
    }
    let dist = dist_sq.sqrt();
    let normal = if dist > f32::EPSILON {
        diff / dist
    } else {
        Vec2::NEG_Y
    };
    CollisionResult {
        hit: true,
        point: b + normal * radius_b,
        normal,
        penetration: reach - dist,
    }
}

/// Check collision between two bodies; normal points toward `a`
pub fn body_collision(a: &Body, b: &Body) -> CollisionResult {
    match (a.shape, b.shape) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circle_circle_collision(a.pos, ra, b.pos, rb)
        }
        (Shape::Circle { radius }, Shape::Rect { half_extents }) => {
            circle_rect_collision(a.pos, radius, b.pos, half_extents, b.angle)
        }
        (Shape::Rect { half_extents }, Shape::Circle { radius }) => {
            circle_rect_collision(b.pos, radius, a.pos, half_extents, a.angle).flipped()
        }
        (Shape::Rect { .. }, Shape::Rect { .. }) => CollisionResult::miss(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_circle_above_rect() {
        // Box centered at origin, 100x20; circle just overlapping its top face
        let result = circle_rect_collision(
            Vec2::new(0.0, -28.0),
            20.0,
            Vec2::ZERO,
            Vec2::new(50.0, 10.0),
            0.0,
        );
        assert!(result.hit);
        assert!((result.penetration - 2.0).abs() < 1e-4);
        // Screen coordinates: up is -y
        assert!((result.normal - Vec2::NEG_Y).length() < 1e-4);
        assert!((result.point.y + 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_circle_misses_rect() {
        let result = circle_rect_collision(
            Vec2::new(0.0, -31.0),
            20.0,
            Vec2::ZERO,
            Vec2::new(50.0, 10.0),
            0.0,
        );
        assert!(!result.hit);
    }

    #[test]
    fn test_rotated_rect() {
        // A 100x20 box rotated 90° is 20 wide and 100 tall
        let result = circle_rect_collision(
            Vec2::new(0.0, -65.0),
            20.0,
            Vec2::ZERO,
            Vec2::new(50.0, 10.0),
            FRAC_PI_2,
        );
        assert!(result.hit);
        assert!((result.penetration - 5.0).abs() < 1e-3);
        assert!(result.normal.y < -0.99);

        let side = circle_rect_collision(
            Vec2::new(35.0, 0.0),
            20.0,
            Vec2::ZERO,
            Vec2::new(50.0, 10.0),
            FRAC_PI_2,
        );
        assert!(!side.hit);
    }

    #[test]
    fn test_center_inside_rect_pushes_out_shallow_axis() {
        let result = circle_rect_collision(
            Vec2::new(45.0, 0.0),
            20.0,
            Vec2::ZERO,
            Vec2::new(50.0, 10.0),
            0.0,
        );
        assert!(result.hit);
        assert!((result.normal - Vec2::X).length() < 1e-4);
        assert!((result.penetration - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_circle_circle() {
        let result = circle_circle_collision(Vec2::new(30.0, 0.0), 20.0, Vec2::ZERO, 20.0);
        assert!(result.hit);
        assert!((result.penetration - 10.0).abs() < 1e-4);
        assert!((result.normal - Vec2::X).length() < 1e-4);

        assert!(!circle_circle_collision(Vec2::new(41.0, 0.0), 20.0, Vec2::ZERO, 20.0).hit);
    }
}
