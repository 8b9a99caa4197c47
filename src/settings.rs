//! Game configuration
//!
//! Everything the simulation treats as immutable at runtime lives here:
//! playfield bounds, hit-box unit, spawn parameters and the two weapon
//! presets. Built once at startup and validated before a `World` exists.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{Weapon, WeaponKind};

/// Construction-time configuration failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unit must be a positive finite size, got {0}")]
    InvalidUnit(f32),

    #[error("screen {width}x{height} cannot hold an alien grid with unit {unit}")]
    ScreenTooSmall { width: f32, height: f32, unit: f32 },

    #[error("screen {width}x{height} is too large (at most {max_columns} columns)")]
    ScreenTooLarge { width: f32, height: f32, max_columns: u32 },

    #[error("ship speed must be finite and non-negative, got {0}")]
    InvalidShipSpeed(f32),

    #[error("a game needs at least one life")]
    NoLives,

    #[error("alien grid needs at least one row (base {base}, max {max})")]
    InvalidRows { base: u32, max: u32 },

    #[error("alien speed range [{min}, {max}] is empty or negative")]
    InvalidSpeedRange { min: f32, max: f32 },

    #[error("alien durability must be positive, got {0}")]
    InvalidDurability(i32),

    #[error("{slot} weapon is unusable: {reason}")]
    InvalidWeapon { slot: &'static str, reason: &'static str },

    #[error(
        "{slot} photon at {speed} px/s against aliens at {alien_speed} px/s can skip the {band} px hit band in one step"
    )]
    PhotonTooFast {
        slot: &'static str,
        speed: f32,
        alien_speed: f32,
        band: f32,
    },

    #[error("missing resource `{0}`")]
    MissingResource(String),

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Playfield ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// Sprite/hit-box size shared by ship and aliens
    pub unit: f32,

    // === Player ===
    pub ship_speed: f32,
    pub lives: u32,
    /// Weapon equipped at start
    pub primary_weapon: Weapon,
    /// Weapon toggled to by the swap command
    pub secondary_weapon: Weapon,

    // === Aliens ===
    /// Rows spawned on level 1
    pub base_rows: u32,
    /// Row cap for later levels
    pub max_rows: u32,
    pub alien_speed_min: f32,
    pub alien_speed_max: f32,
    pub alien_durability: i32,
    pub alien_score: u64,

    /// Seed for alien speed sampling
    pub seed: u64,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Background music on at start
    pub music: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            unit: UNIT,

            ship_speed: SHIP_SPEED,
            lives: STARTING_LIVES,
            primary_weapon: Weapon::photon(),
            secondary_weapon: Weapon::beam(),

            base_rows: BASE_ROWS,
            max_rows: MAX_ROWS,
            alien_speed_min: ALIEN_MIN_SPEED,
            alien_speed_max: ALIEN_MAX_SPEED,
            alien_durability: ALIEN_DURABILITY,
            alien_score: ALIEN_SCORE,

            seed: 0x5EED,

            master_volume: 0.2,
            sfx_volume: 1.0,
            music_volume: 1.0,
            music: true,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Number of grid columns the playfield holds, capped at `MAX_COLUMNS`
    pub fn columns(&self) -> u32 {
        self.raw_columns().min(MAX_COLUMNS as f32) as u32
    }

    fn raw_columns(&self) -> f32 {
        (self.screen_width / (self.unit * 2.0)).floor()
    }

    /// Rows spawned for a 1-based level
    pub fn rows_for_level(&self, level: u32) -> u32 {
        (self.base_rows + level.saturating_sub(1)).min(self.max_rows.max(self.base_rows))
    }

    /// Effective effect volume
    pub fn effective_volume(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    /// Effective music volume
    pub fn effective_music_volume(&self) -> f32 {
        (self.master_volume * self.music_volume).clamp(0.0, 1.0)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.unit.is_finite() && self.unit > 0.0) {
            return Err(ConfigError::InvalidUnit(self.unit));
        }

        if !(self.screen_width.is_finite() && self.screen_height.is_finite())
            || self.raw_columns() > MAX_COLUMNS as f32
        {
            return Err(ConfigError::ScreenTooLarge {
                width: self.screen_width,
                height: self.screen_height,
                max_columns: MAX_COLUMNS,
            });
        }

        // Columns 1..columns-1 are populated, so three is the minimum for one alien
        if self.columns() < 3 || self.screen_height < self.unit * 2.0 {
            return Err(ConfigError::ScreenTooSmall {
                width: self.screen_width,
                height: self.screen_height,
                unit: self.unit,
            });
        }

        if self.base_rows == 0 {
            return Err(ConfigError::InvalidRows {
                base: self.base_rows,
                max: self.max_rows,
            });
        }

        if !(self.alien_speed_min >= 0.0 && self.alien_speed_min <= self.alien_speed_max) {
            return Err(ConfigError::InvalidSpeedRange {
                min: self.alien_speed_min,
                max: self.alien_speed_max,
            });
        }

        if self.alien_durability <= 0 {
            return Err(ConfigError::InvalidDurability(self.alien_durability));
        }

        if !(self.ship_speed.is_finite() && self.ship_speed >= 0.0) {
            return Err(ConfigError::InvalidShipSpeed(self.ship_speed));
        }

        if self.lives == 0 {
            return Err(ConfigError::NoLives);
        }

        for (slot, weapon) in [
            ("primary", &self.primary_weapon),
            ("secondary", &self.secondary_weapon),
        ] {
            weapon.validate(slot)?;
            self.check_photon_step(slot, weapon)?;
        }

        Ok(())
    }

    /// A photon and an alien closing head-on for a full `MAX_DELTA` step must
    /// move less than the photon hit band, or the photon can pass through.
    fn check_photon_step(&self, slot: &'static str, weapon: &Weapon) -> Result<(), ConfigError> {
        if weapon.kind != WeaponKind::Photon {
            return Ok(());
        }

        let band = self.unit * 2.0;
        let closing = (weapon.speed + self.alien_speed_max) * MAX_DELTA;
        if closing >= band {
            return Err(ConfigError::PhotonTooFast {
                slot,
                speed: weapon.speed,
                alien_speed: self.alien_speed_max,
                band,
            });
        }
        Ok(())
    }
}
