//! Simulation module
//!
//! All gameplay logic lives here. No rendering or platform dependencies:
//! - Time comes in as host timestamps, clamped into bounded deltas
//! - Seeded RNG only, used once per alien at spawn
//! - Collections are never resized while being iterated

pub mod animation;
pub mod collision;
pub mod state;
pub mod tick;
pub mod weapon;

pub use animation::{Animation, FrameMode};
pub use collision::{CollisionReport, beam_hits, hit_test, perform, photon_hits};
pub use state::{
    Alien, Bounds, Direction, EntityId, Explosion, GameEvent, GamePhase, Projectile, Ship, World,
};
pub use tick::{TickInput, frame_delta, tick};
pub use weapon::{Weapon, WeaponKind};
