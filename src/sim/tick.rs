//! Per-frame simulation tick
//!
//! One call advances the paddle, ball, power-ups and lasers by a fixed
//! per-tick displacement and reports what happened as `GameEvent`s.

use glam::Vec2;
use rand::Rng;

use super::collision::{ball_paddle_contact, ball_rect_overlap, ball_wall_contact, paddle_bounce};
use super::laser::{fire_lasers, update_lasers};
use super::powerup::{process_timers, roll_drop, update_powerups};
use super::state::{BLOCK_COLORS, Ball, Block, GameEvent, GamePhase, GameState};
use crate::Rect;
use crate::consts::*;

/// Player input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Absolute pointer x in playfield pixels (mouse/touch)
    pub pointer_x: Option<f32>,
}

/// Outcome of a single hit on a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockHit {
    Cracked,
    Destroyed,
}

/// Lay out the block grid. Only the bottom row needs `max_hits` hits.
pub fn generate_level(max_hits: u8) -> Vec<Block> {
    let mut blocks = Vec::with_capacity(BLOCK_ROWS * BLOCK_COLUMNS);
    for row in 0..BLOCK_ROWS {
        let hits_required = if row == BLOCK_ROWS - 1 { max_hits } else { 1 };
        let color = BLOCK_COLORS[row % BLOCK_COLORS.len()];
        for col in 0..BLOCK_COLUMNS {
            let x = col as f32 * (BLOCK_WIDTH + BLOCK_PADDING) + BLOCK_OFFSET_LEFT;
            let y = row as f32 * (BLOCK_HEIGHT + BLOCK_PADDING) + BLOCK_OFFSET_TOP;
            blocks.push(Block::new(
                Rect::new(x, y, BLOCK_WIDTH, BLOCK_HEIGHT),
                color,
                hits_required,
            ));
        }
    }
    blocks
}

/// Put a freshly built state into play and arm the spawn timers
pub fn start_run(state: &mut GameState) -> Vec<GameEvent> {
    let now = state.time_ms;
    state.phase = GamePhase::Running;
    state.timers.guaranteed_spawn = Some(now + FIRST_POWERUP_DELAY_MS);
    state.timers.random_spawn = Some(now + RANDOM_SPAWN_START_MS);
    log::info!(
        "Run started: seed={} difficulty={} speed={}",
        state.seed,
        state.difficulty.as_str(),
        state.ball_speed()
    );
    vec![GameEvent::GameStarted]
}

/// Register one hit on a visible block, awarding points.
///
/// Drop rolls are left to the caller; only ball hits roll for power-ups.
pub fn hit_block(state: &mut GameState, index: usize, events: &mut Vec<GameEvent>) -> BlockHit {
    let block = &mut state.blocks[index];
    block.hits = block.hits.saturating_add(1);
    if block.hits >= block.hits_required {
        block.visible = false;
        state.score += POINTS_PER_REQUIRED_HIT * u64::from(block.hits_required);
        events.push(GameEvent::BlockDestroyed { index });
        BlockHit::Destroyed
    } else {
        state.score += POINTS_CRACK;
        events.push(GameEvent::BlockCracked { index });
        BlockHit::Cracked
    }
}

/// Advance the run by one frame. Ticks outside `Running` do nothing.
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Running {
        return events;
    }

    state.time_ms += dt_ms;
    state.time_ticks += 1;

    process_timers(state, &mut events);
    move_paddle(state, input);

    if let Some(end) = update_ball(state, &mut events) {
        finish_run(state, end, &mut events);
        return events;
    }

    update_powerups(state, &mut events);

    if update_lasers(state, &mut events) {
        finish_run(state, GamePhase::LevelComplete, &mut events);
        return events;
    }

    fire_lasers(state, &mut events);
    events
}

fn move_paddle(state: &mut GameState, input: &TickInput) {
    let paddle = &mut state.paddle;
    if input.right && paddle.x + paddle.width() < PLAYFIELD_WIDTH {
        paddle.x += paddle.step;
    } else if input.left && paddle.x > 0.0 {
        paddle.x -= paddle.step;
    }

    // Pointer positions outside the playfield are ignored
    match input.pointer_x {
        Some(px) if px > 0.0 && px < PLAYFIELD_WIDTH => paddle.follow_pointer(px),
        _ => paddle.clamp_to_playfield(),
    }
}

/// Move the ball and resolve its collisions. Returns the terminal phase if
/// the run ended.
fn update_ball(state: &mut GameState, events: &mut Vec<GameEvent>) -> Option<GamePhase> {
    let ball = &mut state.ball;
    ball.pos += ball.vel;

    let contact = ball_wall_contact(ball.pos, ball.radius, PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);
    if contact.side {
        ball.vel.x = -ball.vel.x;
        events.push(GameEvent::WallBounce);
    }
    if contact.top {
        ball.vel.y = -ball.vel.y;
        events.push(GameEvent::WallBounce);
    }

    if contact.floor {
        state.lives = state.lives.saturating_sub(1);
        events.push(GameEvent::LifeLost {
            lives_left: state.lives,
        });
        if state.lives == 0 {
            return Some(GamePhase::GameOver);
        }
        log::info!("Life lost, {} left", state.lives);

        let speed = state.ball_speed();
        let dx = if state.rng.random_bool(0.5) { speed } else { -speed };
        state.paddle.recenter();
        state.ball = Ball::on_paddle(&state.paddle, Vec2::new(dx, -speed));
    }

    let paddle = state.paddle.rect();
    if let Some(hit) = ball_paddle_contact(state.ball.pos, state.ball.radius, &paddle) {
        state.ball.vel = paddle_bounce(hit, state.ball_speed());
        events.push(GameEvent::PaddleHit);
    }

    // Every overlapping block takes a hit, so two overlaps flip dy twice
    for index in 0..state.blocks.len() {
        let block = &state.blocks[index];
        if !block.visible || !ball_rect_overlap(state.ball.pos, state.ball.radius, &block.rect) {
            continue;
        }
        state.ball.vel.y = -state.ball.vel.y;

        if hit_block(state, index, events) == BlockHit::Destroyed {
            let rect = state.blocks[index].rect;
            roll_drop(state, &rect, events);
            if state.all_blocks_cleared() {
                return Some(GamePhase::LevelComplete);
            }
        }
    }

    None
}

/// Leave `Running`, cancelling everything still scheduled
fn finish_run(state: &mut GameState, phase: GamePhase, events: &mut Vec<GameEvent>) {
    state.phase = phase;
    state.timers.cancel_all();
    if state.active.blasters() {
        events.push(GameEvent::LaserLoopStop);
    }

    match phase {
        GamePhase::GameOver => {
            log::info!("Game over: score={}", state.score);
            events.push(GameEvent::GameOver { score: state.score });
        }
        GamePhase::LevelComplete => {
            log::info!("Level complete: score={}", state.score);
            events.push(GameEvent::LevelCleared { score: state.score });
        }
        GamePhase::Idle | GamePhase::Running => {}
    }
}
