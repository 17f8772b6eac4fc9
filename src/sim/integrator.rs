//! Fixed-step rigid-body integrator
//!
//! One call to [`Integrator::step`] (or [`Integrator::begin_step`] followed
//! by [`Integrator::solve`]) advances the world by exactly one `SIM_DT_MS`
//! step. Velocities are in px per step. The solver runs several
//! narrowphase passes, each followed by impulse and positional correction
//! passes, so small fast balls do not tunnel through thin walls.

use std::collections::BTreeSet;

use glam::Vec2;

use super::body::{Body, BodyId, BodyStore};
use super::collision::{CollisionResult, body_collision};
use crate::consts::{GRAVITY_SCALE, SIM_DT_MS};
use crate::tuning::SolverTuning;

/// Two bodies started touching this step
#[derive(Debug, Clone, PartialEq)]
pub struct ContactEvent {
    pub a: BodyId,
    pub b: BodyId,
    /// Velocity of `a` when the contact was detected, before any response
    pub velocity_a: Vec2,
    /// Velocity of `b` when the contact was detected, before any response
    pub velocity_b: Vec2,
}

impl ContactEvent {
    /// Pre-response velocity of one side of the pair
    pub fn velocity_of(&self, id: BodyId) -> Option<Vec2> {
        if id == self.a {
            Some(self.velocity_a)
        } else if id == self.b {
            Some(self.velocity_b)
        } else {
            None
        }
    }
}

/// Unordered pair key (lower id first)
type PairKey = (BodyId, BodyId);

fn pair_key(a: BodyId, b: BodyId) -> PairKey {
    if a <= b { (a, b) } else { (b, a) }
}

/// A detected overlap between store indices `a` (always dynamic) and `b`
#[derive(Debug, Clone)]
struct Contact {
    a: usize,
    b: usize,
    result: CollisionResult,
}

/// Advances dynamic bodies under gravity and resolves contacts
#[derive(Debug, Clone)]
pub struct Integrator {
    /// Gravity direction and magnitude (difficulty on y)
    pub gravity: Vec2,
    pub solver: SolverTuning,
    /// Pairs touching at the end of the previous step
    active_pairs: BTreeSet<PairKey>,
}

impl Integrator {
    pub fn new(gravity: Vec2, solver: SolverTuning) -> Self {
        Self {
            gravity,
            solver,
            active_pairs: BTreeSet::new(),
        }
    }

    /// Number of pairs currently in contact
    pub fn active_pair_count(&self) -> usize {
        self.active_pairs.len()
    }

    /// Advance one fixed step and report the pairs whose contact began
    pub fn step(&mut self, store: &mut BodyStore) -> Vec<ContactEvent> {
        let events = self.begin_step(store);
        self.solve(store);
        events
    }

    /// Integrate motion and report new contacts, leaving overlaps unresolved
    ///
    /// Game effects that replace a velocity must run between this and
    /// [`Integrator::solve`] so the response acts on the replaced velocity.
    pub fn begin_step(&mut self, store: &mut BodyStore) -> Vec<ContactEvent> {
        let dt_sq = SIM_DT_MS * SIM_DT_MS;
        let gravity = self.gravity * GRAVITY_SCALE;

        for body in store.as_mut_slice().iter_mut().filter(|b| b.is_dynamic()) {
            let accel = gravity + body.force * body.inv_mass();
            body.vel = body.vel * (1.0 - body.material.air_friction) + accel * dt_sq;
            body.pos += body.vel;
            body.force = Vec2::ZERO;
        }

        let contacts = detect_contacts(store.as_slice());
        self.begin_events(store.as_slice(), &contacts)
    }

    /// Resolve every solid overlap with impulse and positional passes
    pub fn solve(&self, store: &mut BodyStore) {
        let passes = self.solver.constraint_iterations.max(1);

        for _ in 0..passes {
            let contacts = detect_contacts(store.as_slice());

            let bodies = store.as_mut_slice();
            let solid: Vec<&Contact> = contacts
                .iter()
                .filter(|c| !bodies[c.a].is_sensor && !bodies[c.b].is_sensor)
                .collect();
            if solid.is_empty() {
                break;
            }

            for _ in 0..self.solver.velocity_iterations {
                for contact in &solid {
                    resolve_velocity(bodies, contact);
                }
            }

            for _ in 0..self.solver.position_iterations {
                for contact in &solid {
                    self.resolve_position(bodies, contact);
                }
            }
        }
    }

    /// Diff current overlaps against the previous step's
    fn begin_events(&mut self, bodies: &[Body], contacts: &[Contact]) -> Vec<ContactEvent> {
        let current: BTreeSet<PairKey> = contacts
            .iter()
            .map(|c| pair_key(bodies[c.a].id, bodies[c.b].id))
            .collect();

        let events = contacts
            .iter()
            .filter(|c| !self.active_pairs.contains(&pair_key(bodies[c.a].id, bodies[c.b].id)))
            .map(|c| ContactEvent {
                a: bodies[c.a].id,
                b: bodies[c.b].id,
                velocity_a: bodies[c.a].vel,
                velocity_b: bodies[c.b].vel,
            })
            .collect();

        self.active_pairs = current;
        events
    }

    /// Push overlapping bodies apart, re-measuring the overlap each pass
    fn resolve_position(&self, bodies: &mut [Body], contact: &Contact) {
        let result = body_collision(&bodies[contact.a], &bodies[contact.b]);
        if !result.hit || result.penetration <= self.solver.slop {
            return;
        }

        let inv_a = bodies[contact.a].inv_mass();
        let inv_b = bodies[contact.b].inv_mass();
        let total = inv_a + inv_b;
        if total <= 0.0 {
            return;
        }

        let correction = result.normal
            * (result.penetration - self.solver.slop)
            * self.solver.position_correction
            / total;
        bodies[contact.a].pos += correction * inv_a;
        bodies[contact.b].pos -= correction * inv_b;
    }
}

/// Every overlapping pair that passes the collision filters
fn detect_contacts(bodies: &[Body]) -> Vec<Contact> {
    let mut contacts = Vec::new();

    for (i, a) in bodies.iter().enumerate() {
        if !a.is_dynamic() {
            continue;
        }
        for (j, b) in bodies.iter().enumerate() {
            if i == j || (b.is_dynamic() && j < i) {
                continue;
            }
            if !a.filter.can_collide(&b.filter) {
                continue;
            }
            let result = body_collision(a, b);
            if result.hit {
                contacts.push(Contact { a: i, b: j, result });
            }
        }
    }

    contacts
}

/// Normal impulse with restitution, then clamped Coulomb friction
fn resolve_velocity(bodies: &mut [Body], contact: &Contact) {
    let (a, b) = (contact.a, contact.b);
    let normal = contact.result.normal;

    let inv_a = bodies[a].inv_mass();
    let inv_b = bodies[b].inv_mass();
    let k = inv_a + inv_b;
    if k <= 0.0 {
        return;
    }

    let relative = bodies[a].vel - bodies[b].vel;
    let vn = relative.dot(normal);
    // Already separating
    if vn >= 0.0 {
        return;
    }

    let restitution = bodies[a]
        .material
        .restitution
        .max(bodies[b].material.restitution);
    let friction = bodies[a].material.friction.min(bodies[b].material.friction);

    let j = -(1.0 + restitution) * vn / k;
    bodies[a].vel += normal * j * inv_a;
    bodies[b].vel -= normal * j * inv_b;

    let tangent = (relative - normal * vn).normalize_or_zero();
    if tangent != Vec2::ZERO {
        let vt = relative.dot(tangent);
        let jt = (-vt / k).clamp(-j * friction, j * friction);
        bodies[a].vel += tangent * jt * inv_a;
        bodies[b].vel -= tangent * jt * inv_b;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{Material, Role};

    fn bouncy() -> Material {
        Material {
            restitution: 1.0,
            friction: 0.0,
            air_friction: 0.0,
            density: 0.015,
        }
    }

    fn ball(pos: Vec2, vel: Vec2) -> Body {
        Body::circle(Role::Ball, pos, 20.0)
            .with_material(bouncy())
            .with_velocity(vel)
    }

    #[test]
    fn test_gravity_accelerates_free_ball() {
        let mut store = BodyStore::new();
        let id = store.insert(ball(Vec2::new(100.0, 100.0), Vec2::ZERO));
        let mut integrator = Integrator::new(Vec2::new(0.0, 0.5), SolverTuning::default());

        let events = integrator.step(&mut store);
        assert!(events.is_empty());

        let body = store.get(id).unwrap();
        let expected = 0.5 * GRAVITY_SCALE * SIM_DT_MS * SIM_DT_MS;
        assert!((body.vel.y - expected).abs() < 1e-5);
        assert!((body.pos.y - (100.0 + expected)).abs() < 1e-4);
        assert_eq!(body.vel.x, 0.0);
    }

    #[test]
    fn test_wall_bounce_reverses_and_reports_once() {
        let mut store = BodyStore::new();
        let wall = store.insert(
            Body::rect(Role::RightWall, Vec2::new(215.0, 100.0), Vec2::new(30.0, 400.0))
                .fixed()
                .with_material(bouncy()),
        );
        // Ball edge reaches the wall face (x = 200) during this step
        let id = store.insert(ball(Vec2::new(175.0, 100.0), Vec2::new(8.0, 0.0)));
        let mut integrator = Integrator::new(Vec2::ZERO, SolverTuning::default());

        let events = integrator.step(&mut store);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].a, id);
        assert_eq!(events[0].b, wall);
        assert_eq!(events[0].velocity_of(id), Some(Vec2::new(8.0, 0.0)));

        let body = store.get(id).unwrap();
        assert!((body.vel.x + 8.0).abs() < 1e-4);
        assert!(body.pos.x <= 180.5);

        // Next step the ball moves away; no new begin event
        let events = integrator.step(&mut store);
        assert!(events.is_empty());
    }

    #[test]
    fn test_sensor_reports_without_response() {
        let mut store = BodyStore::new();
        let sensor = store.insert(
            Body::rect(Role::BottomSensor, Vec2::new(100.0, 130.0), Vec2::new(400.0, 30.0))
                .fixed()
                .sensor(),
        );
        let id = store.insert(ball(Vec2::new(100.0, 90.0), Vec2::new(0.0, 6.0)));
        let mut integrator = Integrator::new(Vec2::ZERO, SolverTuning::default());

        let events = integrator.step(&mut store);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].b, sensor);

        let body = store.get(id).unwrap();
        assert_eq!(body.vel, Vec2::new(0.0, 6.0));
        assert_eq!(body.pos, Vec2::new(100.0, 96.0));

        // Still overlapping: the pair is active, not beginning
        let events = integrator.step(&mut store);
        assert!(events.is_empty());
        assert_eq!(integrator.active_pair_count(), 1);
    }

    #[test]
    fn test_begin_step_leaves_contact_for_solve() {
        let mut store = BodyStore::new();
        store.insert(
            Body::rect(Role::Obstacle, Vec2::new(100.0, 200.0), Vec2::new(150.0, 20.0))
                .fixed()
                .with_material(bouncy()),
        );
        let id = store.insert(ball(Vec2::new(100.0, 168.0), Vec2::new(0.0, 4.0)));
        let mut integrator = Integrator::new(Vec2::ZERO, SolverTuning::default());

        let events = integrator.begin_step(&mut store);
        assert_eq!(events.len(), 1);
        assert_eq!(store.get(id).unwrap().vel, Vec2::new(0.0, 4.0));

        // A replaced velocity is what the response acts on
        store.get_mut(id).unwrap().vel = Vec2::new(0.0, 1.0);
        integrator.solve(&mut store);
        let body = store.get(id).unwrap();
        assert!((body.vel.y + 1.0).abs() < 1e-4);
        assert!(body.pos.y <= 170.5);
    }

    #[test]
    fn test_balls_pass_through_each_other_when_filtered() {
        use crate::sim::body::{CollisionFilter, category};

        let filter = CollisionFilter::new(category::BALL, category::DEFAULT | category::OBSTACLE);
        let mut store = BodyStore::new();
        store.insert(ball(Vec2::new(100.0, 100.0), Vec2::ZERO).with_filter(filter));
        store.insert(ball(Vec2::new(110.0, 100.0), Vec2::ZERO).with_filter(filter));
        let mut integrator = Integrator::new(Vec2::ZERO, SolverTuning::default());

        assert!(integrator.step(&mut store).is_empty());
        let xs: Vec<f32> = store.balls().map(|b| b.pos.x).collect();
        assert_eq!(xs, vec![100.0, 110.0]);
    }

    #[test]
    fn test_applied_force_is_consumed() {
        let mut store = BodyStore::new();
        let id = store.insert(ball(Vec2::new(0.0, 0.0), Vec2::ZERO));
        if let Some(body) = store.get_mut(id) {
            body.apply_force(Vec2::new(0.0, 0.0005));
        }
        let mut integrator = Integrator::new(Vec2::ZERO, SolverTuning::default());
        integrator.step(&mut store);

        let body = store.get(id).unwrap();
        assert!(body.vel.y > 0.0);
        assert_eq!(body.force, Vec2::ZERO);
    }
}
