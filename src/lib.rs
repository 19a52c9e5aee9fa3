//! Blaster Breakout - a paddle-and-ball block breaker with power-ups
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, power-ups, lasers)
//! - `session`: Run lifecycle and host commands around one `GameState`
//! - `renderer`: WebGPU rendering of a simulation snapshot
//! - `audio`: Sound cues for simulation events
//! - `tuning`: Data-driven difficulty balance
//! - `settings`: Player preferences

pub mod audio;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use session::{Command, GameSession};
pub use settings::Settings;
pub use tuning::{Difficulty, DifficultyTuning, SpawnChances, Tuning};

/// Game configuration constants
///
/// Distances are playfield pixels, speeds are pixels per tick and durations
/// are milliseconds of simulation clock.
pub mod consts {
    /// Playfield dimensions (origin top-left, y grows downward)
    pub const PLAYFIELD_WIDTH: f32 = 780.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Nominal frame duration the host is expected to tick at
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Paddle defaults
    pub const PADDLE_HEIGHT: f32 = 15.0;
    pub const PADDLE_STEP: f32 = 7.0;
    /// Gap between paddle bottom and playfield bottom
    pub const PADDLE_FLOOR_GAP: f32 = 10.0;

    /// Paddle widths, one per size step
    pub const PADDLE_DOUBLE_SMALL_WIDTH: f32 = 40.0;
    pub const PADDLE_SMALL_WIDTH: f32 = 60.0;
    pub const PADDLE_NORMAL_WIDTH: f32 = 100.0;
    pub const PADDLE_BIG_WIDTH: f32 = 150.0;
    pub const PADDLE_DOUBLE_BIG_WIDTH: f32 = 200.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    /// Launch angle at the paddle edges (degrees either side of vertical)
    pub const PADDLE_MAX_BOUNCE_DEG: f32 = 60.0;

    /// Block grid
    pub const BLOCK_ROWS: usize = 5;
    pub const BLOCK_COLUMNS: usize = 8;
    pub const BLOCK_WIDTH: f32 = 80.0;
    pub const BLOCK_HEIGHT: f32 = 30.0;
    pub const BLOCK_PADDING: f32 = 10.0;
    pub const BLOCK_OFFSET_TOP: f32 = 60.0;
    pub const BLOCK_OFFSET_LEFT: f32 = 35.0;

    /// Scoring
    pub const POINTS_PER_REQUIRED_HIT: u64 = 10;
    pub const POINTS_CRACK: u64 = 2;
    pub const STARTING_LIVES: u8 = 3;

    /// Power-ups
    pub const POWERUP_SIZE: f32 = 30.0;
    pub const POWERUP_FALL_SPEED: f32 = 2.0;
    pub const POWERUP_DURATION_MS: f64 = 10_000.0;
    /// Guaranteed spawn delay after run start
    pub const FIRST_POWERUP_DELAY_MS: f64 = 3_000.0;
    /// Delay before the periodic spawner first fires
    pub const RANDOM_SPAWN_START_MS: f64 = 8_000.0;
    /// Periodic spawn interval range [min, max)
    pub const RANDOM_SPAWN_MIN_MS: f64 = 5_000.0;
    pub const RANDOM_SPAWN_MAX_MS: f64 = 15_000.0;

    /// Lasers
    pub const LASER_WIDTH: f32 = 4.0;
    pub const LASER_HEIGHT: f32 = 15.0;
    pub const LASER_SPEED: f32 = 7.0;
    pub const LASER_COOLDOWN_MS: f64 = 500.0;
    /// Inset of the outer blasters from the paddle edges
    pub const LASER_EDGE_INSET: f32 = 10.0;
}

/// Axis-aligned rectangle in playfield coordinates (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict overlap test; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.right() > other.x
            && self.x < other.right()
            && self.bottom() > other.y
            && self.y < other.bottom()
    }
}
