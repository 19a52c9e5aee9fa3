//! Power-up lifecycle: drops, scheduled spawns, collection and expiry
//!
//! Deferred effects are stored as absolute times in `GameState::timers` and
//! resolved by `process_timers` at the start of every tick.

use rand::Rng;

use super::state::{BlasterLevel, GameEvent, GameState, PaddleSize, Powerup, PowerupKind};
use crate::Rect;
use crate::consts::*;

/// Uniformly random power-up kind
pub fn random_kind<R: Rng>(rng: &mut R) -> PowerupKind {
    PowerupKind::ALL[rng.random_range(0..PowerupKind::ALL.len())]
}

/// Drop a power-up of `kind` from a block
pub fn spawn(state: &mut GameState, block: &Rect, kind: PowerupKind, events: &mut Vec<GameEvent>) {
    log::debug!("Spawning {:?} at ({}, {})", kind, block.x, block.y);
    state.powerups.push(Powerup::from_block(block, kind));
    events.push(GameEvent::PowerupSpawned { kind });
}

/// Roll for a drop from a freshly destroyed block
pub fn roll_drop(state: &mut GameState, block: &Rect, events: &mut Vec<GameEvent>) {
    let chances = state.tuning.spawn_chances;
    let roll: f32 = state.rng.random();
    if roll >= chances.total() {
        return;
    }
    // Once gated, the roll is uniform over [0, total) and doubles as the pick
    if let Some(kind) = chances.pick(roll) {
        spawn(state, block, kind, events);
    }
}

/// Spawn a random kind at a random visible block. Returns false if none remain.
fn spawn_at_random_block(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    let visible: Vec<Rect> = state
        .blocks
        .iter()
        .filter(|b| b.visible)
        .map(|b| b.rect)
        .collect();
    if visible.is_empty() {
        return false;
    }
    let block = visible[state.rng.random_range(0..visible.len())];
    let kind = random_kind(&mut state.rng);
    spawn(state, &block, kind, events);
    true
}

/// Apply a collected power-up
pub fn activate(state: &mut GameState, kind: PowerupKind, events: &mut Vec<GameEvent>) {
    let now = state.time_ms;
    events.push(GameEvent::PowerupCollected { kind });

    match kind {
        PowerupKind::Blasters => {
            state.active.blaster_level = match state.active.blaster_level {
                BlasterLevel::Off => {
                    events.push(GameEvent::LaserLoopStart);
                    BlasterLevel::Single
                }
                BlasterLevel::Single | BlasterLevel::Double => BlasterLevel::Double,
            };
        }
        PowerupKind::Small => {
            if state.active.big {
                cancel_size(state, PowerupKind::Big);
            }
            let size = match (state.active.small, state.paddle.size) {
                (true, PaddleSize::Small) => PaddleSize::DoubleSmall,
                (true, PaddleSize::DoubleSmall) => PaddleSize::DoubleSmall,
                _ => PaddleSize::Small,
            };
            state.paddle.resize(size);
            state.active.small = true;
        }
        PowerupKind::Big => {
            if state.active.small {
                cancel_size(state, PowerupKind::Small);
            }
            let size = match (state.active.big, state.paddle.size) {
                (true, PaddleSize::Big) => PaddleSize::DoubleBig,
                (true, PaddleSize::DoubleBig) => PaddleSize::DoubleBig,
                _ => PaddleSize::Big,
            };
            state.paddle.resize(size);
            state.active.big = true;
        }
    }

    // Replaces any pending expiry of the same category
    *state.timers.expiry_mut(kind) = Some(now + POWERUP_DURATION_MS);
    log::debug!(
        "Activated {:?}: blasters={:?} paddle={:?}",
        kind,
        state.active.blaster_level,
        state.paddle.size
    );
}

/// Drop the opposing size effect before a new one applies
fn cancel_size(state: &mut GameState, kind: PowerupKind) {
    state.paddle.resize(PaddleSize::Normal);
    *state.timers.expiry_mut(kind) = None;
    match kind {
        PowerupKind::Small => state.active.small = false,
        PowerupKind::Big => state.active.big = false,
        PowerupKind::Blasters => {}
    }
}

/// End a timed effect
fn expire(state: &mut GameState, kind: PowerupKind, events: &mut Vec<GameEvent>) {
    *state.timers.expiry_mut(kind) = None;
    match kind {
        PowerupKind::Blasters => {
            state.active.blaster_level = BlasterLevel::Off;
            events.push(GameEvent::LaserLoopStop);
        }
        PowerupKind::Small => {
            state.active.small = false;
            if !state.active.big {
                state.paddle.resize(PaddleSize::Normal);
            }
        }
        PowerupKind::Big => {
            state.active.big = false;
            if !state.active.small {
                state.paddle.resize(PaddleSize::Normal);
            }
        }
    }
    events.push(GameEvent::PowerupExpired { kind });
    log::debug!("{:?} expired", kind);
}

/// Fire every deferred effect whose time has come
pub fn process_timers(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let now = state.time_ms;

    for kind in PowerupKind::ALL {
        if state.timers.expiry(kind).is_some_and(|t| t <= now) {
            expire(state, kind, events);
        }
    }

    if state.timers.guaranteed_spawn.is_some_and(|t| t <= now) {
        state.timers.guaranteed_spawn = None;
        spawn_at_random_block(state, events);
    }

    if state.timers.random_spawn.is_some_and(|t| t <= now) {
        spawn_at_random_block(state, events);
        let delay = state
            .rng
            .random_range(RANDOM_SPAWN_MIN_MS..RANDOM_SPAWN_MAX_MS);
        state.timers.random_spawn = Some(now + delay);
    }
}

/// Move falling power-ups, collecting those that reach the paddle
pub fn update_powerups(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let paddle = state.paddle.rect();
    let mut collected: Vec<PowerupKind> = Vec::new();

    state.powerups.retain_mut(|powerup| {
        powerup.rect.y += powerup.speed;
        if powerup.rect.overlaps(&paddle) {
            collected.push(powerup.kind);
            false
        } else {
            powerup.rect.y <= PLAYFIELD_HEIGHT
        }
    });

    for kind in collected {
        activate(state, kind, events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;
    use crate::tuning::{Difficulty, SpawnChances, Tuning};

    fn running_state() -> GameState {
        let mut state = GameState::new(7, Difficulty::Medium, &Tuning::default());
        state.phase = GamePhase::Running;
        state
    }

    #[test]
    fn test_blasters_upgrade_and_hold() {
        let mut state = running_state();
        let mut events = Vec::new();

        activate(&mut state, PowerupKind::Blasters, &mut events);
        assert_eq!(state.active.blaster_level, BlasterLevel::Single);
        assert!(events.contains(&GameEvent::LaserLoopStart));

        events.clear();
        activate(&mut state, PowerupKind::Blasters, &mut events);
        assert_eq!(state.active.blaster_level, BlasterLevel::Double);
        assert!(!events.contains(&GameEvent::LaserLoopStart));

        // Reactivation at double keeps double and refreshes the timer
        state.time_ms = 4_000.0;
        activate(&mut state, PowerupKind::Blasters, &mut events);
        assert_eq!(state.active.blaster_level, BlasterLevel::Double);
        assert_eq!(state.timers.blasters_expire, Some(14_000.0));
    }

    #[test]
    fn test_blasters_expire() {
        let mut state = running_state();
        let mut events = Vec::new();
        activate(&mut state, PowerupKind::Blasters, &mut events);

        state.time_ms = POWERUP_DURATION_MS - 1.0;
        events.clear();
        process_timers(&mut state, &mut events);
        assert!(state.active.blasters());

        state.time_ms = POWERUP_DURATION_MS;
        process_timers(&mut state, &mut events);
        assert!(!state.active.blasters());
        assert!(events.contains(&GameEvent::LaserLoopStop));
        assert!(events.contains(&GameEvent::PowerupExpired {
            kind: PowerupKind::Blasters
        }));
        assert_eq!(state.timers.blasters_expire, None);
    }

    #[test]
    fn test_size_escalates_once() {
        let mut state = running_state();
        let mut events = Vec::new();

        activate(&mut state, PowerupKind::Small, &mut events);
        assert_eq!(state.paddle.size, PaddleSize::Small);
        activate(&mut state, PowerupKind::Small, &mut events);
        assert_eq!(state.paddle.size, PaddleSize::DoubleSmall);
        activate(&mut state, PowerupKind::Small, &mut events);
        assert_eq!(state.paddle.size, PaddleSize::DoubleSmall);

        let mut state = running_state();
        activate(&mut state, PowerupKind::Big, &mut events);
        activate(&mut state, PowerupKind::Big, &mut events);
        assert_eq!(state.paddle.size, PaddleSize::DoubleBig);
        assert_eq!(state.paddle.width(), PADDLE_DOUBLE_BIG_WIDTH);
    }

    #[test]
    fn test_opposing_sizes_cancel() {
        let mut state = running_state();
        let mut events = Vec::new();

        activate(&mut state, PowerupKind::Small, &mut events);
        activate(&mut state, PowerupKind::Small, &mut events);
        activate(&mut state, PowerupKind::Big, &mut events);
        assert!(state.active.big);
        assert!(!state.active.small);
        assert_eq!(state.timers.small_expire, None);
        // Reset to normal first, so big applies at single strength
        assert_eq!(state.paddle.size, PaddleSize::Big);

        activate(&mut state, PowerupKind::Small, &mut events);
        assert!(state.active.small);
        assert!(!state.active.big);
        assert_eq!(state.paddle.size, PaddleSize::Small);
    }

    #[test]
    fn test_size_expiry_restores_normal() {
        let mut state = running_state();
        let mut events = Vec::new();
        activate(&mut state, PowerupKind::Big, &mut events);

        state.time_ms = POWERUP_DURATION_MS + 1.0;
        process_timers(&mut state, &mut events);
        assert!(!state.active.big);
        assert_eq!(state.paddle.size, PaddleSize::Normal);
    }

    #[test]
    fn test_refresh_postpones_expiry() {
        let mut state = running_state();
        let mut events = Vec::new();
        activate(&mut state, PowerupKind::Small, &mut events);

        state.time_ms = 6_000.0;
        activate(&mut state, PowerupKind::Small, &mut events);

        state.time_ms = POWERUP_DURATION_MS + 1.0;
        process_timers(&mut state, &mut events);
        assert!(state.active.small);
        assert_eq!(state.paddle.size, PaddleSize::DoubleSmall);
    }

    #[test]
    fn test_resize_keeps_paddle_in_bounds() {
        let mut state = running_state();
        let mut events = Vec::new();
        state.paddle.x = PLAYFIELD_WIDTH - state.paddle.width();
        activate(&mut state, PowerupKind::Big, &mut events);
        assert!(state.paddle.x + state.paddle.width() <= PLAYFIELD_WIDTH);
        assert!(state.paddle.x >= 0.0);
    }

    #[test]
    fn test_roll_drop_respects_gate() {
        let mut state = running_state();
        let mut events = Vec::new();
        let block = state.blocks[0].rect;

        state.tuning.spawn_chances = SpawnChances {
            blasters: 0.0,
            small: 0.0,
            big: 0.0,
        };
        for _ in 0..50 {
            roll_drop(&mut state, &block, &mut events);
        }
        assert!(state.powerups.is_empty());

        state.tuning.spawn_chances = SpawnChances {
            blasters: 0.0,
            small: 0.0,
            big: 1.0,
        };
        roll_drop(&mut state, &block, &mut events);
        assert_eq!(state.powerups.len(), 1);
        assert_eq!(state.powerups[0].kind, PowerupKind::Big);
        assert_eq!(state.powerups[0].rect.x, block.x + block.w / 2.0 - POWERUP_SIZE / 2.0);
        assert_eq!(state.powerups[0].rect.y, block.y);
    }

    #[test]
    fn test_scheduled_spawns() {
        let mut state = running_state();
        let mut events = Vec::new();
        state.timers.guaranteed_spawn = Some(FIRST_POWERUP_DELAY_MS);
        state.timers.random_spawn = Some(RANDOM_SPAWN_START_MS);

        state.time_ms = FIRST_POWERUP_DELAY_MS;
        process_timers(&mut state, &mut events);
        assert_eq!(state.powerups.len(), 1);
        assert_eq!(state.timers.guaranteed_spawn, None);

        state.time_ms = RANDOM_SPAWN_START_MS;
        process_timers(&mut state, &mut events);
        assert_eq!(state.powerups.len(), 2);
        let next = state.timers.random_spawn.unwrap();
        assert!(next >= RANDOM_SPAWN_START_MS + RANDOM_SPAWN_MIN_MS);
        assert!(next < RANDOM_SPAWN_START_MS + RANDOM_SPAWN_MAX_MS);
    }

    #[test]
    fn test_guaranteed_spawn_needs_visible_blocks() {
        let mut state = running_state();
        let mut events = Vec::new();
        for block in &mut state.blocks {
            block.visible = false;
        }
        state.timers.guaranteed_spawn = Some(0.0);
        process_timers(&mut state, &mut events);
        assert!(state.powerups.is_empty());
        assert_eq!(state.timers.guaranteed_spawn, None);
    }

    #[test]
    fn test_catch_and_fall_off() {
        let mut state = running_state();
        let mut events = Vec::new();
        let paddle = state.paddle.rect();

        // Just above the paddle, lands this tick
        state.powerups.push(Powerup::from_block(
            &Rect::new(paddle.x, paddle.y - POWERUP_SIZE - 1.0, paddle.w, 10.0),
            PowerupKind::Blasters,
        ));
        // Far from the paddle, about to leave the playfield
        state.powerups.push(Powerup::from_block(
            &Rect::new(0.0, PLAYFIELD_HEIGHT - 1.0, 40.0, 10.0),
            PowerupKind::Small,
        ));

        update_powerups(&mut state, &mut events);
        assert!(state.powerups.is_empty());
        assert!(state.active.blasters());
        assert!(!state.active.small);
        assert!(events.contains(&GameEvent::PowerupCollected {
            kind: PowerupKind::Blasters
        }));
    }
}
