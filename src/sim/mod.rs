//! Frame-driven simulation module
//!
//! All gameplay logic lives here. Rules for code in this module:
//! - Time is measured in frame-equivalents (`dt == 1.0` at 60 Hz)
//! - Randomness only from the session's seeded RNG
//! - Entities are visited in store order
//! - No rendering, audio or platform dependencies

pub mod ai;
pub mod collision;
pub mod combat;
pub mod motion;
pub mod particles;
pub mod spawn;
pub mod state;
pub mod store;
pub mod tick;

pub use ai::{Orders, decide};
pub use collision::{Body, collides, overlaps};
pub use combat::Shot;
pub use motion::Helm;
pub use particles::Emitter;
pub use state::{
    GameEvent, GamePhase, Gate, Island, IslandVariant, Owner, Particle, ParticleKind,
    PendingSpawn, Projectile, Ship, ShipRole, Snapshot, World,
};
pub use store::{EntityId, Store};
pub use tick::{FrameInput, frame_dt, tick};
