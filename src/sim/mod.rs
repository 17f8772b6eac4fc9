//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by body ID)
//! - No rendering or platform dependencies

pub mod arena;
pub mod body;
pub mod bonus;
pub mod classifier;
pub mod collision;
pub mod game;
pub mod integrator;
pub mod snapshot;
pub mod stabilizer;
pub mod state;
pub mod tick;

pub use arena::{ArenaBounds, build_world};
pub use body::{BallId, Body, BodyId, BodyStore, CollisionFilter, Material, Role, Shape};
pub use bonus::BonusRelocator;
pub use classifier::{Interaction, handle_contacts};
pub use collision::{CollisionResult, body_collision};
pub use game::{Game, GameEvent, GamePhase};
pub use integrator::{ContactEvent, Integrator};
pub use snapshot::{BodySnapshot, ShapeKind, Snapshot};
pub use state::{Difficulty, DifficultyChange, GameStatus, Session};
pub use tick::{TickInput, tick};
