//! Alien Descent - A vertical arcade shooter
//!
//! Core modules:
//! - `sim`: Simulation (entities, animation timing, weapons, collisions, game loop)
//! - `render`: Draw command generation for the host renderer
//! - `audio`: Fire-and-forget sound effects
//! - `settings`: Game configuration

pub mod audio;
pub mod render;
pub mod settings;
pub mod sim;

pub use settings::{ConfigError, GameConfig};

/// Game configuration constants
pub mod consts {
    /// Base sprite and hit-box dimension (pixels)
    pub const UNIT: f32 = 16.0;

    /// Default playfield dimensions
    pub const SCREEN_WIDTH: f32 = 320.0;
    pub const SCREEN_HEIGHT: f32 = 240.0;

    /// Largest simulated step per tick (seconds).
    ///
    /// A photon and an alien closing at full speed must cover less than the
    /// two-unit photon hit band in one step, see `GameConfig::validate`.
    pub const MAX_DELTA: f32 = 0.05;
    /// Cap on grid columns, whatever the screen width
    pub const MAX_COLUMNS: u32 = 64;

    /// Ship defaults
    pub const SHIP_SPEED: f32 = 150.0;
    /// The ship sprite is a single static frame
    pub const SHIP_FRAME_MS: f64 = 120.0;
    pub const SHIP_FRAMES: u32 = 1;
    /// Ship facing angle in degrees (90 = straight up)
    pub const SHIP_ANGLE_DEG: f32 = 90.0;
    pub const STARTING_LIVES: u32 = 3;

    /// Alien defaults
    pub const ALIEN_MIN_SPEED: f32 = 25.0;
    pub const ALIEN_MAX_SPEED: f32 = 40.0;
    pub const ALIEN_DURABILITY: i32 = 15;
    pub const ALIEN_SCORE: u64 = 1;
    pub const ALIEN_FRAME_MS: f64 = 120.0;
    pub const ALIEN_FRAMES: u32 = 2;

    /// Grid layout
    pub const BASE_ROWS: u32 = 2;
    pub const MAX_ROWS: u32 = 5;

    /// Explosion defaults
    pub const EXPLOSION_FRAME_MS: f64 = 60.0;
    pub const EXPLOSION_FRAMES: u32 = 8;
    /// Explosions drift down with the wreckage (pixels/s)
    pub const EXPLOSION_DRIFT: f32 = 25.0;

    /// Photon preset: rapid, low damage
    pub const PHOTON_SPEED: f32 = 300.0;
    pub const PHOTON_DELAY_MS: f64 = 128.0;
    pub const PHOTON_DAMAGE: i32 = 10;

    /// Beam preset: slow, high damage, stationary column
    pub const BEAM_SPEED: f32 = 0.0;
    pub const BEAM_DELAY_MS: f64 = 640.0;
    pub const BEAM_DAMAGE: i32 = 15;
}
