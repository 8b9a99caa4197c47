//! Weapon presets
//!
//! A weapon is a plain value owned by the ship. Swapping replaces it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::ConfigError;

/// Hit-test shape of the projectiles a weapon fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Point projectile, consumed by the first alien it touches
    Photon,
    /// Full-height column, damages every alien in it for one pass
    Beam,
}

impl WeaponKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::Photon => "photon",
            WeaponKind::Beam => "beam",
        }
    }

    /// Whether one projectile may damage several aliens in a pass
    pub fn pierces(&self) -> bool {
        matches!(self, WeaponKind::Beam)
    }
}

/// Fire-rate, damage and projectile descriptor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    /// Projectile speed (pixels/s)
    pub speed: f32,
    /// Minimum time between shots (ms)
    pub delay_ms: f64,
    /// Durability removed per hit
    pub damage: i32,
}

impl Weapon {
    pub fn photon() -> Self {
        Self {
            kind: WeaponKind::Photon,
            speed: PHOTON_SPEED,
            delay_ms: PHOTON_DELAY_MS,
            damage: PHOTON_DAMAGE,
        }
    }

    pub fn beam() -> Self {
        Self {
            kind: WeaponKind::Beam,
            speed: BEAM_SPEED,
            delay_ms: BEAM_DELAY_MS,
            damage: BEAM_DAMAGE,
        }
    }

    /// Velocity of a projectile fired at `angle_deg` (90 = up).
    ///
    /// Projectiles move against this vector, so screen-up needs positive y.
    pub fn velocity(&self, angle_deg: f32) -> Vec2 {
        let rad = angle_deg.to_radians();
        Vec2::new(self.speed * rad.cos(), self.speed * rad.sin())
    }

    pub(crate) fn validate(&self, slot: &'static str) -> Result<(), ConfigError> {
        let reason = if !(self.delay_ms.is_finite() && self.delay_ms > 0.0) {
            Some("fire delay must be positive")
        } else if self.damage <= 0 {
            Some("damage must be positive")
        } else if !(self.speed.is_finite() && self.speed >= 0.0) {
            Some("speed must be finite and non-negative")
        } else if self.kind == WeaponKind::Photon && self.speed == 0.0 {
            Some("photons need a positive speed")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ConfigError::InvalidWeapon { slot, reason }),
            None => Ok(()),
        }
    }
}
