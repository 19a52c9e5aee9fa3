//! Blaster lasers: firing cadence, travel and block hits

use super::state::{BlasterLevel, GameEvent, GameState, Laser};
use super::tick::{BlockHit, hit_block};
use crate::consts::*;

/// Horizontal spawn offsets from the paddle's left edge for one shot
pub fn muzzle_offsets(level: BlasterLevel, paddle_width: f32) -> Vec<f32> {
    let outer = [LASER_EDGE_INSET, paddle_width - LASER_EDGE_INSET - LASER_WIDTH];
    match level {
        BlasterLevel::Off => Vec::new(),
        BlasterLevel::Single => outer.to_vec(),
        BlasterLevel::Double => {
            let mut offsets = outer.to_vec();
            offsets.push(paddle_width / 3.0 - LASER_WIDTH / 2.0);
            offsets.push(2.0 * paddle_width / 3.0 - LASER_WIDTH / 2.0);
            offsets
        }
    }
}

/// Fire a volley if blasters are up and the cooldown has passed
pub fn fire_lasers(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let level = state.active.blaster_level;
    if level == BlasterLevel::Off {
        return;
    }
    let now = state.time_ms;
    let ready = state
        .last_laser_ms
        .is_none_or(|last| now - last > LASER_COOLDOWN_MS);
    if !ready {
        return;
    }

    let paddle = &state.paddle;
    let offsets = muzzle_offsets(level, paddle.width());
    let count = offsets.len();
    state
        .lasers
        .extend(offsets.into_iter().map(|dx| Laser::new(paddle.x + dx, paddle.y)));
    state.last_laser_ms = Some(now);
    events.push(GameEvent::LasersFired { count });
}

/// Move lasers up and resolve block hits.
///
/// Each laser hits at most the first visible block it overlaps, in grid
/// order, and is consumed. Returns true if the last block fell.
pub fn update_lasers(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    let mut i = 0;
    while i < state.lasers.len() {
        let laser = &mut state.lasers[i];
        laser.rect.y -= laser.speed;
        if laser.rect.bottom() < 0.0 {
            state.lasers.remove(i);
            continue;
        }

        let rect = laser.rect;
        let target = state
            .blocks
            .iter()
            .position(|b| b.visible && b.rect.overlaps(&rect));

        match target {
            Some(index) => {
                state.lasers.remove(i);
                if hit_block(state, index, events) == BlockHit::Destroyed
                    && state.all_blocks_cleared()
                {
                    return true;
                }
            }
            None => i += 1,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;
    use crate::tuning::{Difficulty, Tuning};

    fn running_state() -> GameState {
        let mut state = GameState::new(11, Difficulty::Medium, &Tuning::default());
        state.phase = GamePhase::Running;
        state
    }

    #[test]
    fn test_muzzle_offsets() {
        assert!(muzzle_offsets(BlasterLevel::Off, 100.0).is_empty());
        assert_eq!(muzzle_offsets(BlasterLevel::Single, 100.0), vec![10.0, 86.0]);

        let double = muzzle_offsets(BlasterLevel::Double, 150.0);
        assert_eq!(double.len(), 4);
        assert_eq!(double[2], 48.0);
        assert_eq!(double[3], 98.0);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut state = running_state();
        let mut events = Vec::new();
        state.active.blaster_level = BlasterLevel::Single;

        fire_lasers(&mut state, &mut events);
        assert_eq!(state.lasers.len(), 2);
        assert_eq!(events, vec![GameEvent::LasersFired { count: 2 }]);

        // Exactly at the cooldown is still too soon
        state.time_ms = LASER_COOLDOWN_MS;
        fire_lasers(&mut state, &mut events);
        assert_eq!(state.lasers.len(), 2);

        state.time_ms = LASER_COOLDOWN_MS + 1.0;
        state.active.blaster_level = BlasterLevel::Double;
        fire_lasers(&mut state, &mut events);
        assert_eq!(state.lasers.len(), 6);
        assert_eq!(events.last(), Some(&GameEvent::LasersFired { count: 4 }));
    }

    #[test]
    fn test_no_fire_without_blasters() {
        let mut state = running_state();
        let mut events = Vec::new();
        fire_lasers(&mut state, &mut events);
        assert!(state.lasers.is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn test_laser_leaves_top() {
        let mut state = running_state();
        let mut events = Vec::new();
        // Left of the grid, nothing to hit
        state.lasers.push(Laser::new(5.0, -LASER_HEIGHT + LASER_SPEED - 0.5));
        update_lasers(&mut state, &mut events);
        assert!(state.lasers.is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn test_laser_hits_first_block_only() {
        let mut state = running_state();
        let mut events = Vec::new();
        // Straddles the first two columns of the top row
        let x = BLOCK_OFFSET_LEFT + BLOCK_WIDTH + BLOCK_PADDING / 2.0 - LASER_WIDTH / 2.0;
        let gap_laser = Laser::new(x, BLOCK_OFFSET_TOP + 10.0);
        let laser = Laser::new(BLOCK_OFFSET_LEFT + 5.0, BLOCK_OFFSET_TOP + 10.0);
        state.lasers.push(laser);
        state.lasers.push(gap_laser);

        update_lasers(&mut state, &mut events);
        assert!(!state.blocks[0].visible);
        assert!(state.blocks[1].visible);
        assert_eq!(state.score, 10);
        assert_eq!(state.lasers.len(), 1);
        assert_eq!(events, vec![GameEvent::BlockDestroyed { index: 0 }]);
    }

    #[test]
    fn test_laser_reports_level_cleared() {
        let mut state = running_state();
        let mut events = Vec::new();
        for block in state.blocks.iter_mut().skip(1) {
            block.visible = false;
        }
        state
            .lasers
            .push(Laser::new(BLOCK_OFFSET_LEFT + 5.0, BLOCK_OFFSET_TOP + 10.0));
        assert!(update_lasers(&mut state, &mut events));
    }
}
