//! Game state and core simulation types
//!
//! The world owns every entity collection. Entities only ever mutate their
//! own fields; adding and removing them is the world's job.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::animation::Animation;
use super::weapon::{Weapon, WeaponKind};
use crate::consts::*;
use crate::settings::{ConfigError, GameConfig};

/// Stable identifier handed out by the world
pub type EntityId = u32;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Frozen; ticks have no effect until resumed
    Paused,
    /// All lives lost
    GameOver,
}

/// Things that happened during a tick, drained by the host each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A projectile left the ship
    Shot { instigator: EntityId, weapon: WeaponKind },
    /// An alien took damage
    AlienHit { alien: EntityId, destroyed: bool },
    /// An alien reached the bottom of the screen
    AlienEscaped { alien: EntityId },
    WeaponSwapped { weapon: WeaponKind },
    LevelCleared { level: u32 },
    Paused,
    Resumed,
    GameOver { score: u64 },
}

/// Playfield size and hit-box unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
    pub unit: f32,
}

impl Bounds {
    /// Largest x a unit-wide sprite may occupy
    pub fn max_x(&self) -> f32 {
        (self.width - self.unit).max(0.0)
    }
}

/// Held horizontal input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Direction {
    pub left: bool,
    pub right: bool,
}

impl Direction {
    /// -1, 0 or +1. Left and right together cancel out.
    pub fn axis(&self) -> f32 {
        let mut axis = 0.0;
        if self.left {
            axis -= 1.0;
        }
        if self.right {
            axis += 1.0;
        }
        axis
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub id: EntityId,
    pub pos: Vec2,
    /// Horizontal speed (pixels/s)
    pub speed: f32,
    pub direction: Direction,
    pub shooting: bool,
    /// Facing angle in degrees (90 = up)
    pub angle_deg: f32,
    /// Equipped weapon
    pub weapon: Weapon,
    /// The preset swapped in by `swap_weapon`
    pub spare_weapon: Weapon,
    pub animation: Animation,
    /// Timestamp of the last shot (ms)
    pub last_shot: Option<f64>,
}

impl Ship {
    pub fn new(id: EntityId, config: &GameConfig) -> Self {
        let unit = config.unit;
        Self {
            id,
            pos: Vec2::new(
                config.screen_width / 2.0,
                config.screen_height - unit - unit / 2.0,
            ),
            speed: config.ship_speed,
            direction: Direction::default(),
            shooting: false,
            angle_deg: SHIP_ANGLE_DEG,
            weapon: config.primary_weapon,
            spare_weapon: config.secondary_weapon,
            animation: Animation::looping(SHIP_FRAME_MS, SHIP_FRAMES),
            last_shot: None,
        }
    }

    /// Move, then fire if the trigger is held and the weapon has cooled down.
    ///
    /// x is clamped both before and after the move, so the bound holds when
    /// this returns.
    pub fn update(&mut self, delta: f32, timestamp: f64, bounds: &Bounds) -> Option<Projectile> {
        self.clamp(bounds);
        self.pos.x += self.direction.axis() * self.speed * delta;
        self.clamp(bounds);

        self.animation.update(timestamp);

        if self.shooting {
            self.try_fire(timestamp, bounds.unit)
        } else {
            None
        }
    }

    fn clamp(&mut self, bounds: &Bounds) {
        self.pos.x = self.pos.x.clamp(0.0, bounds.max_x());
    }

    /// Fire if more than `weapon.delay_ms` has passed since the last shot
    pub fn try_fire(&mut self, timestamp: f64, unit: f32) -> Option<Projectile> {
        if let Some(last) = self.last_shot {
            if timestamp < last {
                // Clock went backwards: restart the cooldown from here
                self.last_shot = Some(timestamp);
                return None;
            }
            if timestamp - last <= self.weapon.delay_ms {
                return None;
            }
        }

        self.last_shot = Some(timestamp);
        Some(Projectile::new(
            self.muzzle(unit),
            &self.weapon,
            self.angle_deg,
            self.id,
        ))
    }

    /// Where projectiles leave the ship
    pub fn muzzle(&self, unit: f32) -> Vec2 {
        Vec2::new(self.pos.x + unit / 2.0, self.pos.y)
    }

    /// Toggle between the two weapon presets
    pub fn swap_weapon(&mut self) {
        std::mem::swap(&mut self.weapon, &mut self.spare_weapon);
    }
}

/// A descending enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alien {
    pub id: EntityId,
    pub pos: Vec2,
    /// Fall speed (pixels/s)
    pub speed: f32,
    /// Remaining hit points
    pub durability: i32,
    /// Starting hit points
    pub health: i32,
    /// Points awarded on destruction
    pub score: u64,
    pub animation: Animation,
}

impl Alien {
    pub fn new(id: EntityId, pos: Vec2, speed: f32, durability: i32, score: u64) -> Self {
        Self {
            id,
            pos,
            speed,
            durability,
            health: durability,
            score,
            animation: Animation::looping(ALIEN_FRAME_MS, ALIEN_FRAMES),
        }
    }

    pub fn update(&mut self, delta: f32, timestamp: f64) {
        self.pos.y += self.speed * delta;
        let ratio = self.damage_ratio();
        self.animation.update_with_damage(timestamp, ratio);
    }

    /// Fraction of health lost, in [0, 1]
    pub fn damage_ratio(&self) -> f32 {
        if self.health <= 0 {
            return 1.0;
        }
        (1.0 - self.durability as f32 / self.health as f32).clamp(0.0, 1.0)
    }

    /// Apply damage, returning true if this destroyed the alien
    pub fn take_damage(&mut self, damage: i32) -> bool {
        self.durability -= damage;
        self.is_destroyed()
    }

    pub fn is_destroyed(&self) -> bool {
        self.durability <= 0
    }

    /// Slipped past the bottom of the screen
    pub fn is_out_of_bounds(&self, screen_height: f32) -> bool {
        self.pos.y > screen_height
    }
}

/// A shot in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Subtracted from position each second
    pub vel: Vec2,
    pub kind: WeaponKind,
    pub damage: i32,
    /// Consumed by a hit; pruned on the next sweep
    pub has_collided: bool,
    /// Collision passes this projectile has been through
    pub resolved_passes: u32,
    /// Who fired it
    pub instigator: EntityId,
}

impl Projectile {
    pub fn new(pos: Vec2, weapon: &Weapon, angle_deg: f32, instigator: EntityId) -> Self {
        Self {
            pos,
            vel: weapon.velocity(angle_deg),
            kind: weapon.kind,
            damage: weapon.damage,
            has_collided: false,
            resolved_passes: 0,
            instigator,
        }
    }

    pub fn update(&mut self, delta: f32) {
        self.pos -= self.vel * delta;
    }

    /// Off the sides or past the top of the screen
    pub fn is_out_of_bounds(&self, screen_width: f32) -> bool {
        self.pos.x < 0.0 || self.pos.x > screen_width || self.pos.y < 0.0
    }

    /// Spent: photons after a hit, beams after their one pass
    pub fn is_expired(&self) -> bool {
        self.has_collided || (self.kind.pierces() && self.resolved_passes > 0)
    }
}

/// Short-lived hit effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub animation: Animation,
}

impl Explosion {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            animation: Animation::once(EXPLOSION_FRAME_MS, EXPLOSION_FRAMES),
        }
    }

    pub fn update(&mut self, delta: f32, timestamp: f64) {
        self.pos.y += EXPLOSION_DRIFT * delta;
        self.animation.update(timestamp);
    }

    pub fn is_finished(&self) -> bool {
        self.animation.is_finished()
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct World {
    pub config: GameConfig,
    pub bounds: Bounds,
    pub phase: GamePhase,
    /// Current level (1-based)
    pub level: u32,
    pub lives: u32,
    pub score: u64,
    pub ship: Ship,
    pub aliens: Vec<Alien>,
    pub explosions: Vec<Explosion>,
    /// Shared list of every projectile in flight
    pub projectiles: Vec<Projectile>,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    /// Host timestamp of the previous tick (ms)
    pub(crate) last_timestamp: Option<f64>,
    rng: Pcg32,
    next_id: EntityId,
}

impl World {
    /// Validate the config, place the ship and spawn the level 1 grid
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let bounds = Bounds {
            width: config.screen_width,
            height: config.screen_height,
            unit: config.unit,
        };
        let ship = Ship::new(1, &config);
        let mut world = Self {
            rng: Pcg32::seed_from_u64(config.seed),
            lives: config.lives,
            config,
            bounds,
            phase: GamePhase::Running,
            level: 1,
            score: 0,
            ship,
            aliens: Vec::new(),
            explosions: Vec::new(),
            projectiles: Vec::new(),
            events: Vec::new(),
            last_timestamp: None,
            next_id: 2,
        };

        world.spawn_grid();
        log::info!(
            "World ready: {}x{}, {} aliens, seed {}",
            world.bounds.width,
            world.bounds.height,
            world.aliens.len(),
            world.config.seed
        );

        Ok(world)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place the alien grid for the current level.
    ///
    /// Columns are two units apart with a half-unit offset; each row sits two
    /// units below the previous, starting above the screen. Fall speed is
    /// sampled once per alien here and never again.
    pub fn spawn_grid(&mut self) {
        let unit = self.bounds.unit;
        let columns = self.config.columns();
        let rows = self.config.rows_for_level(self.level);
        let (min_speed, max_speed) = (self.config.alien_speed_min, self.config.alien_speed_max);

        for row in 0..rows {
            for column in 1..columns.saturating_sub(1) {
                let pos = Vec2::new(
                    unit * 2.0 * column as f32 + unit / 2.0,
                    -unit * 4.0 + unit * 2.0 * row as f32,
                );
                let speed = self.rng.random_range(min_speed..=max_speed);
                let id = self.next_entity_id();
                self.aliens.push(Alien::new(
                    id,
                    pos,
                    speed,
                    self.config.alien_durability,
                    self.config.alien_score,
                ));
            }
        }

        log::debug!("Level {}: spawned {} rows x {} columns", self.level, rows, columns.saturating_sub(2));
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }
}
