//! Rigid-body records and the store that owns them
//!
//! Bodies are kept sorted by id; ids are never reused, so a body's identity
//! survives other bodies being added or removed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable identity of any body in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Stable identity of a ball, independent of its position in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BallId(pub u32);

/// What a body is for in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    LeftWall,
    RightWall,
    TopWall,
    /// Sensor strip below the arena; touching it ends the round
    BottomSensor,
    Paddle,
    Ball,
    /// Sensor zone worth bonus points
    BonusTarget,
    Obstacle,
}

/// Collision geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { half_extents: Vec2 },
}

impl Shape {
    pub fn area(&self) -> f32 {
        match *self {
            Shape::Circle { radius } => std::f32::consts::PI * radius * radius,
            Shape::Rect { half_extents } => 4.0 * half_extents.x * half_extents.y,
        }
    }

    /// Full width and height of the shape's unrotated bounds
    pub fn size(&self) -> Vec2 {
        match *self {
            Shape::Circle { radius } => Vec2::splat(radius * 2.0),
            Shape::Rect { half_extents } => half_extents * 2.0,
        }
    }
}

/// Collision category bits
pub mod category {
    pub const DEFAULT: u32 = 0x0001;
    pub const BALL: u32 = 0x0002;
    pub const OBSTACLE: u32 = 0x0004;
    pub const ALL: u32 = u32::MAX;
}

/// Which bodies may touch which
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionFilter {
    pub category: u32,
    pub mask: u32,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            category: category::DEFAULT,
            mask: category::ALL,
        }
    }
}

impl CollisionFilter {
    pub fn new(category: u32, mask: u32) -> Self {
        Self { category, mask }
    }

    /// Both masks must accept the other body's category
    pub fn can_collide(&self, other: &CollisionFilter) -> bool {
        (self.mask & other.category) != 0 && (other.mask & self.category) != 0
    }
}

/// Surface and mass properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub restitution: f32,
    pub friction: f32,
    /// Fraction of velocity lost per step to air drag
    pub air_friction: f32,
    pub density: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            restitution: 0.0,
            friction: 0.1,
            air_friction: 0.01,
            density: 0.001,
        }
    }
}

/// A rigid body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub role: Role,
    /// Set for balls only
    pub ball_id: Option<BallId>,
    pub shape: Shape,
    pub pos: Vec2,
    /// Velocity in px per fixed step
    pub vel: Vec2,
    /// Rotation (radians)
    pub angle: f32,
    pub is_static: bool,
    /// Reports contacts but never pushes back
    pub is_sensor: bool,
    pub material: Material,
    pub filter: CollisionFilter,
    /// Force accumulated for the next step
    #[serde(skip)]
    pub force: Vec2,
}

impl Body {
    fn new(role: Role, shape: Shape, pos: Vec2) -> Self {
        Self {
            id: BodyId(0),
            role,
            ball_id: None,
            shape,
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            is_static: false,
            is_sensor: false,
            material: Material::default(),
            filter: CollisionFilter::default(),
            force: Vec2::ZERO,
        }
    }

    /// Circle centered at `pos`
    pub fn circle(role: Role, pos: Vec2, radius: f32) -> Self {
        Self::new(role, Shape::Circle { radius }, pos)
    }

    /// Rectangle of full `size` centered at `pos`
    pub fn rect(role: Role, pos: Vec2, size: Vec2) -> Self {
        Self::new(
            role,
            Shape::Rect {
                half_extents: size * 0.5,
            },
            pos,
        )
    }

    pub fn fixed(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn sensor(mut self) -> Self {
        self.is_sensor = true;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn mass(&self) -> f32 {
        self.material.density * self.shape.area()
    }

    /// Zero for static bodies
    pub fn inv_mass(&self) -> f32 {
        let mass = self.mass();
        if self.is_static || mass <= 0.0 {
            0.0
        } else {
            1.0 / mass
        }
    }

    pub fn is_dynamic(&self) -> bool {
        !self.is_static
    }

    /// Accumulate a force, consumed by the next integration step
    pub fn apply_force(&mut self, force: Vec2) {
        if self.is_dynamic() {
            self.force += force;
        }
    }

    /// Half width of the body's unrotated bounds
    pub fn half_width(&self) -> f32 {
        self.shape.size().x * 0.5
    }
}

/// Owns every body of one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyStore {
    bodies: Vec<Body>,
    next_body_id: u32,
    next_ball_id: u32,
}

impl Default for BodyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyStore {
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            next_body_id: 1,
            next_ball_id: 1,
        }
    }

    /// Add a body, assigning its id (and ball id for balls)
    pub fn insert(&mut self, mut body: Body) -> BodyId {
        let id = BodyId(self.next_body_id);
        self.next_body_id += 1;
        body.id = id;
        if body.role == Role::Ball {
            body.ball_id = Some(BallId(self.next_ball_id));
            self.next_ball_id += 1;
        } else {
            body.ball_id = None;
        }
        // Ids are monotonic, so pushing keeps the store sorted
        self.bodies.push(body);
        id
    }

    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        let idx = self.index_of(id)?;
        Some(self.bodies.remove(idx))
    }

    pub fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.binary_search_by_key(&id, |b| b.id).ok()
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.index_of(id).map(|idx| &self.bodies[idx])
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        let idx = self.index_of(id)?;
        Some(&mut self.bodies[idx])
    }

    /// First body with the given role
    pub fn find_role(&self, role: Role) -> Option<&Body> {
        self.bodies.iter().find(|b| b.role == role)
    }

    pub fn find_role_mut(&mut self, role: Role) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.role == role)
    }

    pub fn balls(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().filter(|b| b.role == Role::Ball)
    }

    pub fn balls_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.bodies.iter_mut().filter(|b| b.role == Role::Ball)
    }

    pub fn ball_count(&self) -> usize {
        self.balls().count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Raw slice access for the solver
    pub(crate) fn as_mut_slice(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub(crate) fn as_slice(&self) -> &[Body] {
        &self.bodies
    }

    /// Drop every body the predicate rejects, returning the removed ids
    pub fn retain(&mut self, mut keep: impl FnMut(&Body) -> bool) -> Vec<BodyId> {
        let mut removed = Vec::new();
        self.bodies.retain(|b| {
            let kept = keep(b);
            if !kept {
                removed.push(b.id);
            }
            kept
        });
        removed
    }
}
