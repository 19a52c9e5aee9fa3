//! Game state and core simulation types
//!
//! Everything a run needs lives in `GameState`; nothing is process-global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::consts::*;
use crate::tuning::{Difficulty, DifficultyTuning, Tuning};

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Level laid out, waiting for a start command
    Idle,
    /// Active gameplay
    Running,
    /// Lives exhausted
    GameOver,
    /// Every block destroyed
    LevelComplete,
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::LevelComplete)
    }
}

/// Paddle size steps, smallest to largest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaddleSize {
    DoubleSmall,
    Small,
    #[default]
    Normal,
    Big,
    DoubleBig,
}

impl PaddleSize {
    pub fn width(&self) -> f32 {
        match self {
            PaddleSize::DoubleSmall => PADDLE_DOUBLE_SMALL_WIDTH,
            PaddleSize::Small => PADDLE_SMALL_WIDTH,
            PaddleSize::Normal => PADDLE_NORMAL_WIDTH,
            PaddleSize::Big => PADDLE_BIG_WIDTH,
            PaddleSize::DoubleBig => PADDLE_DOUBLE_BIG_WIDTH,
        }
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub size: PaddleSize,
    pub height: f32,
    /// Keyboard movement per tick
    pub step: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        let size = PaddleSize::Normal;
        Self {
            x: (PLAYFIELD_WIDTH - size.width()) / 2.0,
            y: PLAYFIELD_HEIGHT - PADDLE_HEIGHT - PADDLE_FLOOR_GAP,
            size,
            height: PADDLE_HEIGHT,
            step: PADDLE_STEP,
        }
    }
}

impl Paddle {
    #[inline]
    pub fn width(&self) -> f32 {
        self.size.width()
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width(), self.height)
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width() / 2.0
    }

    /// Keep the paddle fully inside the playfield
    pub fn clamp_to_playfield(&mut self) {
        self.x = self.x.clamp(0.0, PLAYFIELD_WIDTH - self.width());
    }

    pub fn recenter(&mut self) {
        self.x = (PLAYFIELD_WIDTH - self.width()) / 2.0;
    }

    /// Change size, keeping the paddle in bounds
    pub fn resize(&mut self, size: PaddleSize) {
        self.size = size;
        self.clamp_to_playfield();
    }

    /// Centre the paddle under an absolute pointer x
    pub fn follow_pointer(&mut self, pointer_x: f32) {
        self.x = pointer_x - self.width() / 2.0;
        self.clamp_to_playfield();
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    /// Ball resting on top of the paddle at its centre
    pub fn on_paddle(paddle: &Paddle, vel: Vec2) -> Self {
        Self {
            pos: Vec2::new(paddle.center_x(), paddle.y - BALL_RADIUS),
            vel,
            radius: BALL_RADIUS,
        }
    }

    /// Bounding box of the ball
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.pos.x - self.radius,
            self.pos.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }
}

/// Row palette, top row first
pub const BLOCK_COLORS: [u32; 6] = [
    0xFF5252, // Red
    0xFF9800, // Orange
    0xFFEB3B, // Yellow
    0x4CAF50, // Green
    0x2196F3, // Blue
    0x9C27B0, // Purple
];

/// A destructible block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub rect: Rect,
    /// 0xRRGGBB
    pub color: u32,
    pub visible: bool,
    pub hits: u8,
    pub hits_required: u8,
}

impl Block {
    pub fn new(rect: Rect, color: u32, hits_required: u8) -> Self {
        Self {
            rect,
            color,
            visible: true,
            hits: 0,
            hits_required: hits_required.max(1),
        }
    }

    /// Hit but not yet broken
    pub fn is_cracked(&self) -> bool {
        self.visible && self.hits > 0
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    Blasters,
    Small,
    Big,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 3] = [PowerupKind::Blasters, PowerupKind::Small, PowerupKind::Big];

    /// Letter shown on the falling tile
    pub fn letter(&self) -> char {
        match self {
            PowerupKind::Blasters => 'B',
            PowerupKind::Small => 'S',
            PowerupKind::Big => 'L',
        }
    }
}

/// A falling power-up tile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub rect: Rect,
    pub kind: PowerupKind,
    /// Fall per tick
    pub speed: f32,
}

impl Powerup {
    /// Tile centred horizontally on a block, starting at its top edge
    pub fn from_block(block: &Rect, kind: PowerupKind) -> Self {
        Self {
            rect: Rect::new(
                block.x + block.w / 2.0 - POWERUP_SIZE / 2.0,
                block.y,
                POWERUP_SIZE,
                POWERUP_SIZE,
            ),
            kind,
            speed: POWERUP_FALL_SPEED,
        }
    }
}

/// A laser bolt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    pub rect: Rect,
    /// Rise per tick
    pub speed: f32,
}

impl Laser {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            rect: Rect::new(x, y, LASER_WIDTH, LASER_HEIGHT),
            speed: LASER_SPEED,
        }
    }
}

/// Blaster strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlasterLevel {
    #[default]
    Off,
    /// Two lasers per shot
    Single,
    /// Four lasers per shot
    Double,
}

impl BlasterLevel {
    pub fn lasers_per_shot(&self) -> usize {
        match self {
            BlasterLevel::Off => 0,
            BlasterLevel::Single => 2,
            BlasterLevel::Double => 4,
        }
    }
}

/// Active power-up effects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivePowerups {
    pub blaster_level: BlasterLevel,
    pub small: bool,
    pub big: bool,
}

impl ActivePowerups {
    pub fn blasters(&self) -> bool {
        self.blaster_level != BlasterLevel::Off
    }
}

/// Pending deferred effects, as absolute times on the run clock (ms).
/// `None` means nothing is scheduled for that category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timers {
    pub blasters_expire: Option<f64>,
    pub small_expire: Option<f64>,
    pub big_expire: Option<f64>,
    pub guaranteed_spawn: Option<f64>,
    pub random_spawn: Option<f64>,
}

impl Timers {
    pub fn expiry(&self, kind: PowerupKind) -> Option<f64> {
        match kind {
            PowerupKind::Blasters => self.blasters_expire,
            PowerupKind::Small => self.small_expire,
            PowerupKind::Big => self.big_expire,
        }
    }

    pub fn expiry_mut(&mut self, kind: PowerupKind) -> &mut Option<f64> {
        match kind {
            PowerupKind::Blasters => &mut self.blasters_expire,
            PowerupKind::Small => &mut self.small_expire,
            PowerupKind::Big => &mut self.big_expire,
        }
    }

    pub fn cancel_all(&mut self) {
        *self = Self::default();
    }
}

/// Something that happened during a tick, for audio/render adapters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted,
    WallBounce,
    PaddleHit,
    /// Block took a hit but survived
    BlockCracked { index: usize },
    BlockDestroyed { index: usize },
    PowerupSpawned { kind: PowerupKind },
    PowerupCollected { kind: PowerupKind },
    PowerupExpired { kind: PowerupKind },
    LasersFired { count: usize },
    /// Start the continuous blaster sound
    LaserLoopStart,
    /// Stop the continuous blaster sound
    LaserLoopStop,
    LifeLost { lives_left: u8 },
    GameOver { score: u64 },
    LevelCleared { score: u64 },
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    /// Balance captured when the run started
    pub tuning: DifficultyTuning,
    pub max_block_hits: u8,
    pub lives: u8,
    pub score: u64,
    /// Run clock (ms)
    pub time_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub paddle: Paddle,
    pub ball: Ball,
    /// Grid order, row-major from the top-left
    pub blocks: Vec<Block>,
    pub powerups: Vec<Powerup>,
    pub lasers: Vec<Laser>,
    pub active: ActivePowerups,
    pub timers: Timers,
    /// Clock time of the last firing event
    pub last_laser_ms: Option<f64>,
}

impl GameState {
    /// Lay out a fresh level in the Idle phase
    pub fn new(seed: u64, difficulty: Difficulty, tuning: &Tuning) -> Self {
        let difficulty_tuning = *tuning.get(difficulty);
        let paddle = Paddle::default();
        let speed = difficulty_tuning.ball_speed;
        let ball = Ball::on_paddle(&paddle, Vec2::new(speed, -speed));

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            difficulty,
            tuning: difficulty_tuning,
            max_block_hits: tuning.max_block_hits,
            lives: STARTING_LIVES,
            score: 0,
            time_ms: 0.0,
            time_ticks: 0,
            paddle,
            ball,
            blocks: super::tick::generate_level(tuning.max_block_hits),
            powerups: Vec::new(),
            lasers: Vec::new(),
            active: ActivePowerups::default(),
            timers: Timers::default(),
            last_laser_ms: None,
        }
    }

    /// Ball speed for the current run
    pub fn ball_speed(&self) -> f32 {
        self.tuning.ball_speed
    }

    pub fn visible_blocks(&self) -> usize {
        self.blocks.iter().filter(|b| b.visible).count()
    }

    pub fn all_blocks_cleared(&self) -> bool {
        self.blocks.iter().all(|b| !b.visible)
    }

    /// HUD text for the blaster indicator, if active
    pub fn blaster_label(&self) -> Option<&'static str> {
        match self.active.blaster_level {
            BlasterLevel::Off => None,
            BlasterLevel::Single => Some("BLASTERS ACTIVE!"),
            BlasterLevel::Double => Some("DOUBLE BLASTERS ACTIVE!"),
        }
    }

    /// HUD text for the paddle size indicator, if a size power-up is active
    pub fn size_label(&self) -> Option<&'static str> {
        if !self.active.small && !self.active.big {
            return None;
        }
        match self.paddle.size {
            PaddleSize::DoubleSmall => Some("DOUBLE SMALL PADDLE!"),
            PaddleSize::Small => Some("SMALL PADDLE!"),
            PaddleSize::Big => Some("BIG PADDLE!"),
            PaddleSize::DoubleBig => Some("DOUBLE BIG PADDLE!"),
            PaddleSize::Normal => None,
        }
    }
}
