//! Per-frame simulation step
//!
//! The host calls `tick` once per display refresh with a monotonic timestamp
//! in milliseconds. Everything for the frame happens synchronously inside.

use super::collision;
use super::state::{Direction, GameEvent, GamePhase, World};
use crate::consts::*;

/// Input state for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement keys
    pub direction: Direction,
    /// Fire key held
    pub shooting: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Swap weapon (one-shot)
    pub swap_weapon: bool,
}

/// Seconds to simulate for this frame.
///
/// The first frame and any backwards step yield zero; long stalls are capped
/// at `MAX_DELTA` so nothing can tunnel through a hit box in one step.
pub fn frame_delta(last: Option<f64>, timestamp: f64) -> f32 {
    match last {
        Some(last) => (((timestamp - last) / 1000.0) as f32).clamp(0.0, MAX_DELTA),
        None => 0.0,
    }
}

/// Advance the world to `timestamp`
pub fn tick(world: &mut World, input: &TickInput, timestamp: f64) {
    // Handle pause toggle
    if input.pause {
        match world.phase {
            GamePhase::Running => {
                world.phase = GamePhase::Paused;
                world.events.push(GameEvent::Paused);
                log::info!("Game paused");
                return;
            }
            GamePhase::Paused => {
                world.phase = GamePhase::Running;
                // Restart the frame clock so the pause isn't simulated
                world.last_timestamp = None;
                world.events.push(GameEvent::Resumed);
                log::info!("Game resumed");
            }
            GamePhase::GameOver => {}
        }
    }

    if world.phase != GamePhase::Running {
        return;
    }

    if !timestamp.is_finite() {
        log::debug!("Skipping frame with timestamp {timestamp}");
        return;
    }

    let delta = frame_delta(world.last_timestamp, timestamp);
    world.last_timestamp = Some(timestamp);

    // Ship: input, movement, firing
    world.ship.direction = input.direction;
    world.ship.shooting = input.shooting;
    if input.swap_weapon {
        world.ship.swap_weapon();
        let weapon = world.ship.weapon.kind;
        world.events.push(GameEvent::WeaponSwapped { weapon });
        log::debug!("Weapon swapped to {}", weapon.as_str());
    }

    if let Some(projectile) = world.ship.update(delta, timestamp, &world.bounds) {
        world.events.push(GameEvent::Shot {
            instigator: projectile.instigator,
            weapon: projectile.kind,
        });
        world.projectiles.push(projectile);
    }

    // Aliens: descend, animate, escape off the bottom
    let height = world.bounds.height;
    let mut escaped = 0;
    for alien in world.aliens.iter_mut() {
        alien.update(delta, timestamp);
    }
    world.aliens.retain(|alien| {
        if alien.is_out_of_bounds(height) {
            escaped += 1;
            world.events.push(GameEvent::AlienEscaped { alien: alien.id });
            false
        } else {
            true
        }
    });
    if escaped > 0 {
        world.lives = world.lives.saturating_sub(escaped);
        log::debug!("{} alien(s) escaped, {} lives left", escaped, world.lives);
    }

    // Explosions: animate, drop finished ones
    for explosion in world.explosions.iter_mut() {
        explosion.update(delta, timestamp);
    }
    world.explosions.retain(|e| !e.is_finished());

    // Projectiles: move, drop spent or escaped ones
    let width = world.bounds.width;
    for projectile in world.projectiles.iter_mut() {
        projectile.update(delta);
    }
    world
        .projectiles
        .retain(|p| !p.is_out_of_bounds(width) && !p.is_expired());

    let report = collision::perform(world);
    if report.destroyed > 0 {
        log::debug!(
            "{} alien(s) destroyed (+{}), score {}",
            report.destroyed,
            report.score,
            world.score
        );
    }

    if world.lives == 0 {
        world.phase = GamePhase::GameOver;
        world.events.push(GameEvent::GameOver { score: world.score });
        log::info!("Game over at level {} with score {}", world.level, world.score);
        return;
    }

    // Level clear
    if world.aliens.is_empty() {
        let cleared = world.level;
        world.events.push(GameEvent::LevelCleared { level: cleared });
        world.level += 1;
        world.spawn_grid();
        log::info!("Level {} cleared, starting level {}", cleared, world.level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameConfig;
    use crate::sim::state::{Alien, Explosion, Projectile};
    use crate::sim::weapon::{Weapon, WeaponKind};
    use glam::Vec2;

    fn world() -> World {
        World::new(GameConfig::default()).unwrap()
    }

    fn held(left: bool, right: bool) -> TickInput {
        TickInput {
            direction: Direction { left, right },
            ..Default::default()
        }
    }

    #[test]
    fn test_frame_delta() {
        assert_eq!(frame_delta(None, 5000.0), 0.0);
        assert!((frame_delta(Some(1000.0), 1016.0) - 0.016).abs() < 1e-6);
        assert_eq!(frame_delta(Some(1000.0), 900.0), 0.0);
        assert_eq!(frame_delta(Some(0.0), 60_000.0), MAX_DELTA);
    }

    #[test]
    fn test_first_tick_seeds_clock() {
        let mut world = world();
        let x = world.ship.pos.x;
        tick(&mut world, &held(true, false), 123_456.0);
        assert_eq!(world.ship.pos.x, x);
        assert_eq!(world.last_timestamp, Some(123_456.0));
    }

    #[test]
    fn test_ship_moves_by_delta() {
        let mut world = world();
        world.ship.pos.x = 100.0;
        tick(&mut world, &held(true, false), 0.0);
        tick(&mut world, &held(true, false), 50.0);
        tick(&mut world, &held(true, false), 100.0);
        assert!((world.ship.pos.x - 85.0).abs() < 0.001);
    }

    #[test]
    fn test_large_gap_is_clamped() {
        let mut world = world();
        world.ship.pos.x = 200.0;
        tick(&mut world, &held(true, false), 0.0);
        tick(&mut world, &held(true, false), 30_000.0);
        let moved = 200.0 - world.ship.pos.x;
        assert!((moved - SHIP_SPEED * MAX_DELTA).abs() < 0.001);
    }

    #[test]
    fn test_photon_cannot_pass_through_descending_alien() {
        let mut world = world();
        world.aliens.clear();
        let id = world.next_entity_id();
        world
            .aliens
            .push(Alien::new(id, Vec2::new(40.0, 100.0), 40.0, 15, 1));
        world
            .projectiles
            .push(Projectile::new(Vec2::new(48.0, 117.0), &Weapon::photon(), 90.0, 1));

        // Both frame gaps are clamped to MAX_DELTA
        tick(&mut world, &TickInput::default(), 0.0);
        tick(&mut world, &TickInput::default(), 100.0);
        tick(&mut world, &TickInput::default(), 200.0);

        assert_eq!(world.aliens.len(), 1);
        assert_eq!(world.aliens[0].durability, 5);
        assert_eq!(world.explosions.len(), 1);
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn test_photon_hits_from_any_start_below_alien() {
        for offset in 0..48 {
            let mut world = world();
            world.aliens.clear();
            let id = world.next_entity_id();
            world
                .aliens
                .push(Alien::new(id, Vec2::new(40.0, 100.0), ALIEN_MAX_SPEED, 15, 1));
            let start = Vec2::new(48.0, 117.0 + offset as f32);
            world
                .projectiles
                .push(Projectile::new(start, &Weapon::photon(), 90.0, 1));

            let mut t = 0.0;
            for _ in 0..8 {
                tick(&mut world, &TickInput::default(), t);
                t += 250.0;
            }
            assert_eq!(world.aliens[0].durability, 5, "photon started at {start}");
        }
    }

    #[test]
    fn test_pause_freezes_world() {
        let mut world = world();
        tick(&mut world, &TickInput::default(), 0.0);
        tick(&mut world, &TickInput::default(), 16.0);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut world, &pause, 32.0);
        assert_eq!(world.phase, GamePhase::Paused);

        let ship_x = world.ship.pos.x;
        let alien_ys: Vec<f32> = world.aliens.iter().map(|a| a.pos.y).collect();
        let busy = TickInput {
            direction: Direction {
                left: true,
                right: false,
            },
            shooting: true,
            swap_weapon: true,
            ..Default::default()
        };
        for t in 1..20 {
            tick(&mut world, &busy, 32.0 + t as f64 * 16.0);
        }
        assert_eq!(world.ship.pos.x, ship_x);
        assert_eq!(world.ship.weapon.kind, WeaponKind::Photon);
        assert!(world.projectiles.is_empty());
        let after: Vec<f32> = world.aliens.iter().map(|a| a.pos.y).collect();
        assert_eq!(alien_ys, after);

        // Resume: first tick back has zero delta
        tick(&mut world, &pause, 10_000.0);
        assert_eq!(world.phase, GamePhase::Running);
        let after: Vec<f32> = world.aliens.iter().map(|a| a.pos.y).collect();
        assert_eq!(alien_ys, after);
        assert_eq!(
            world.drain_events(),
            vec![GameEvent::Paused, GameEvent::Resumed]
        );
    }

    #[test]
    fn test_shot_goes_to_world_list() {
        let mut world = world();
        let input = TickInput {
            shooting: true,
            ..Default::default()
        };
        tick(&mut world, &input, 0.0);
        assert_eq!(world.projectiles.len(), 1);
        assert_eq!(world.projectiles[0].instigator, world.ship.id);
        assert!(world.drain_events().contains(&GameEvent::Shot {
            instigator: world.ship.id,
            weapon: WeaponKind::Photon
        }));

        // Still cooling down
        tick(&mut world, &input, 100.0);
        assert_eq!(world.projectiles.len(), 1);
        tick(&mut world, &input, 130.0);
        assert_eq!(world.projectiles.len(), 2);
    }

    #[test]
    fn test_swap_weapon_input() {
        let mut world = world();
        let input = TickInput {
            swap_weapon: true,
            ..Default::default()
        };
        tick(&mut world, &input, 0.0);
        assert_eq!(world.ship.weapon, Weapon::beam());
        assert_eq!(world.ship.spare_weapon, Weapon::photon());
    }

    #[test]
    fn test_projectile_above_screen_pruned() {
        let mut world = world();
        tick(&mut world, &TickInput::default(), 0.0);
        let mut shot = Projectile::new(Vec2::new(50.0, -1.0), &Weapon::photon(), 90.0, 1);
        shot.vel = Vec2::ZERO;
        world.projectiles.push(shot);
        tick(&mut world, &TickInput::default(), 16.0);
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn test_collided_projectile_pruned() {
        let mut world = world();
        tick(&mut world, &TickInput::default(), 0.0);
        let mut shot = Projectile::new(Vec2::new(5.0, 200.0), &Weapon::photon(), 90.0, 1);
        shot.has_collided = true;
        world.projectiles.push(shot);
        tick(&mut world, &TickInput::default(), 16.0);
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn test_escape_costs_life_not_score() {
        let mut world = world();
        world.score = 7;
        world.aliens[0].pos.y = world.bounds.height - 0.1;
        let id = world.aliens[0].id;
        let count = world.aliens.len();
        tick(&mut world, &TickInput::default(), 0.0);
        tick(&mut world, &TickInput::default(), 100.0);
        assert_eq!(world.aliens.len(), count - 1);
        assert_eq!(world.lives, STARTING_LIVES - 1);
        assert_eq!(world.score, 7);
        assert!(world.drain_events().contains(&GameEvent::AlienEscaped { alien: id }));
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut world = world();
        world.lives = 1;
        world.aliens[0].pos.y = world.bounds.height + 1.0;
        tick(&mut world, &TickInput::default(), 0.0);
        assert_eq!(world.phase, GamePhase::GameOver);

        let aliens = world.aliens.len();
        tick(&mut world, &held(true, false), 100.0);
        assert_eq!(world.aliens.len(), aliens);
    }

    #[test]
    fn test_explosion_pruned_after_last_frame() {
        let mut world = world();
        world.explosions.push(Explosion::new(Vec2::new(40.0, 40.0)));
        let mut t = 0.0;
        for _ in 0..8 {
            tick(&mut world, &TickInput::default(), t);
            assert_eq!(world.explosions.len(), 1);
            t += 60.0;
        }
        tick(&mut world, &TickInput::default(), t);
        assert!(world.explosions.is_empty());
    }

    #[test]
    fn test_level_clear_spawns_next_grid() {
        let mut world = world();
        world.aliens.clear();
        let id = world.next_entity_id();
        world.aliens.push(Alien::new(id, Vec2::new(40.0, 100.0), 0.0, 10, 1));
        world
            .projectiles
            .push(Projectile::new(Vec2::new(48.0, 100.0), &Weapon::photon(), 90.0, 1));

        tick(&mut world, &TickInput::default(), 0.0);
        assert_eq!(world.score, 1);
        assert_eq!(world.level, 2);
        assert_eq!(world.aliens.len(), 8 * 3);
        assert!(world.drain_events().contains(&GameEvent::LevelCleared { level: 1 }));
    }

    #[test]
    fn test_determinism() {
        let mut world1 = world();
        let mut world2 = world();

        let inputs = [
            held(true, false),
            TickInput {
                shooting: true,
                ..Default::default()
            },
            held(false, true),
            TickInput {
                swap_weapon: true,
                shooting: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        let mut t = 0.0;
        for _ in 0..40 {
            for input in &inputs {
                tick(&mut world1, input, t);
                tick(&mut world2, input, t);
                t += 16.7;
            }
        }

        assert_eq!(world1.score, world2.score);
        assert_eq!(world1.aliens.len(), world2.aliens.len());
        assert_eq!(world1.projectiles.len(), world2.projectiles.len());
        assert_eq!(world1.ship.pos, world2.ship.pos);
    }
}
