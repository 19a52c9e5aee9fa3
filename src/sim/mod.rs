//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Per-tick displacement, with the clock advanced only by `tick`
//! - Seeded RNG only
//! - Stable iteration order (grid order for blocks)
//! - No rendering or platform dependencies

pub mod collision;
pub mod laser;
pub mod powerup;
pub mod state;
pub mod tick;

pub use collision::{WallContact, ball_paddle_contact, ball_wall_contact, launch_angle, paddle_bounce};
pub use state::{
    ActivePowerups, BLOCK_COLORS, Ball, BlasterLevel, Block, GameEvent, GamePhase, GameState,
    Laser, Paddle, PaddleSize, Powerup, PowerupKind, Timers,
};
pub use tick::{BlockHit, TickInput, generate_level, hit_block, start_run, tick};
