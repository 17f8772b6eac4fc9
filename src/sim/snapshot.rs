//! Read-only view of a session for presentation
//!
//! The presentation layer never touches the body store; it draws from these
//! copies once per frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{BallId, Body, BodyId, Role, Shape};
use super::state::{Difficulty, Session};

/// Drawing primitive for one body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Circle,
    Rect,
}

/// Everything needed to draw one body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub id: BodyId,
    pub ball_id: Option<BallId>,
    pub role: Role,
    pub shape: ShapeKind,
    /// Full width and height (diameter for circles)
    pub size: Vec2,
    pub position: Vec2,
    /// Rotation in radians
    pub angle: f32,
}

impl From<&Body> for BodySnapshot {
    fn from(body: &Body) -> Self {
        let shape = match body.shape {
            Shape::Circle { .. } => ShapeKind::Circle,
            Shape::Rect { .. } => ShapeKind::Rect,
        };
        Self {
            id: body.id,
            ball_id: body.ball_id,
            role: body.role,
            shape,
            size: body.shape.size(),
            position: body.pos,
            angle: body.angle,
        }
    }
}

/// One frame of presentation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub bodies: Vec<BodySnapshot>,
    pub score: u64,
    pub over: bool,
    pub ball_count: u32,
    /// Gravity y
    pub difficulty: f32,
    /// Difficulty as shown to the player (value × 10)
    pub difficulty_level: u8,
}

impl Snapshot {
    /// Capture a session; bodies come out in id order
    pub fn capture(session: &Session, difficulty: Difficulty) -> Self {
        Self {
            bodies: session.store.iter().map(BodySnapshot::from).collect(),
            score: session.status.score,
            over: session.status.over,
            ball_count: session.status.ball_count,
            difficulty: difficulty.value(),
            difficulty_level: difficulty.level(),
        }
    }

    /// Snapshot with no bodies, for hosts with no live session
    pub fn empty(difficulty: Difficulty) -> Self {
        Self {
            bodies: Vec::new(),
            score: 0,
            over: false,
            ball_count: 0,
            difficulty: difficulty.value(),
            difficulty_level: difficulty.level(),
        }
    }

    pub fn balls(&self) -> impl Iterator<Item = &BodySnapshot> {
        self.bodies.iter().filter(|b| b.role == Role::Ball)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::arena::ArenaBounds;
    use crate::tuning::Tuning;

    #[test]
    fn test_capture_lists_every_body() {
        let session = Session::new(
            ArenaBounds::new(400.0, 800.0),
            Difficulty::new(0.7),
            Tuning::default(),
            5,
        );
        let snap = Snapshot::capture(&session, Difficulty::new(0.7));

        assert_eq!(snap.bodies.len(), session.store.len());
        assert_eq!(snap.difficulty_level, 7);
        assert_eq!(snap.ball_count, 1);
        assert!(!snap.over);

        let ball = snap.balls().next().unwrap();
        assert_eq!(ball.shape, ShapeKind::Circle);
        assert_eq!(ball.size, Vec2::splat(40.0));
        assert!(ball.ball_id.is_some());

        let obstacle = snap.bodies.iter().find(|b| b.role == Role::Obstacle).unwrap();
        assert_eq!(obstacle.shape, ShapeKind::Rect);
        assert_eq!(obstacle.size, Vec2::new(150.0, 20.0));

        let ids: Vec<_> = snap.bodies.iter().map(|b| b.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let snap = Snapshot::empty(Difficulty::default());
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"difficulty_level\":5"));
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
