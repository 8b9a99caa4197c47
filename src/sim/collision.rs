//! Projectile versus alien collision resolution
//!
//! Hit shapes depend on the weapon kind. Aliens destroyed during a pass are
//! tombstoned and compacted once the sweep is over, so neither collection
//! changes shape while it is being walked.

use glam::Vec2;

use super::state::{Explosion, GameEvent, Projectile, World};
use super::weapon::WeaponKind;

/// Outcome of one resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Projectile/alien pairs that connected
    pub hits: u32,
    /// Aliens removed
    pub destroyed: u32,
    /// Score awarded
    pub score: u64,
}

/// Point test for photons.
///
/// The vertical band spans a unit above and below the alien's top edge, which
/// keeps fast photons from skipping over an alien between two frames.
pub fn photon_hits(projectile: Vec2, alien: Vec2, unit: f32) -> bool {
    projectile.x >= alien.x
        && projectile.x <= alien.x + unit
        && projectile.y >= alien.y - unit
        && projectile.y <= alien.y + unit
}

/// Column test for beams. Aliens behind the ship's firing line are safe.
pub fn beam_hits(column_x: f32, alien: Vec2, firing_line: f32, unit: f32) -> bool {
    alien.y <= firing_line && column_x >= alien.x && column_x <= alien.x + unit
}

/// Hit test dispatched on the projectile's weapon kind
pub fn hit_test(projectile: &Projectile, alien: Vec2, firing_line: f32, unit: f32) -> bool {
    match projectile.kind {
        WeaponKind::Photon => photon_hits(projectile.pos, alien, unit),
        WeaponKind::Beam => beam_hits(projectile.pos.x, alien, firing_line, unit),
    }
}

/// Resolve every projectile against every alien still standing.
///
/// Photons stop at their first hit (iteration order decides ties). Beams hit
/// everything in their column and are retired once the pass completes.
pub fn perform(world: &mut World) -> CollisionReport {
    let unit = world.bounds.unit;
    let firing_line = world.ship.pos.y + unit * 2.0;

    let mut report = CollisionReport::default();
    let mut destroyed = vec![false; world.aliens.len()];

    for projectile in world.projectiles.iter_mut() {
        if projectile.is_expired() {
            continue;
        }

        for (idx, alien) in world.aliens.iter_mut().enumerate() {
            if destroyed[idx] || !hit_test(projectile, alien.pos, firing_line, unit) {
                continue;
            }

            report.hits += 1;
            let killed = alien.take_damage(projectile.damage);
            world.explosions.push(Explosion::new(alien.pos));
            world.events.push(GameEvent::AlienHit {
                alien: alien.id,
                destroyed: killed,
            });

            if killed {
                destroyed[idx] = true;
                report.destroyed += 1;
                report.score += alien.score;
                world.score += alien.score;
            }

            if !projectile.kind.pierces() {
                projectile.has_collided = true;
                break;
            }
        }

        projectile.resolved_passes += 1;
    }

    if report.destroyed > 0 {
        let mut flags = destroyed.into_iter();
        world
            .aliens
            .retain(|_| !flags.next().unwrap_or(false));
    }

    report
}
