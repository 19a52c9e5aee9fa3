//! Run lifecycle around a single `GameState`
//!
//! The host owns one `GameSession`, feeds it a `TickInput` every animation
//! frame and forwards button presses as `Command`s. Returned events drive
//! the audio and HUD adapters.

use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, start_run, tick};
use crate::tuning::{Difficulty, Tuning};

/// Host commands outside the per-frame input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StartRun,
    SetDifficulty(Difficulty),
    ToggleSound,
}

/// Text shown over the playfield once a run has ended
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub title: &'static str,
    /// 0xRRGGBB
    pub title_color: u32,
    pub lines: Vec<String>,
}

pub struct GameSession {
    state: GameState,
    settings: Settings,
    tuning: Tuning,
    base_seed: u64,
    /// Runs started so far; offsets the seed of each new run
    runs: u64,
}

impl GameSession {
    pub fn new(seed: u64, settings: Settings, tuning: Tuning) -> Self {
        let state = GameState::new(seed, settings.difficulty, &tuning);
        Self {
            state,
            settings,
            tuning,
            base_seed: seed,
            runs: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn is_running(&self) -> bool {
        self.state.phase == GamePhase::Running
    }

    pub fn handle_command(&mut self, command: Command) -> Vec<GameEvent> {
        match command {
            Command::StartRun => self.start_run(),
            Command::SetDifficulty(difficulty) => {
                self.set_difficulty(difficulty);
                Vec::new()
            }
            Command::ToggleSound => self.toggle_sound(),
        }
    }

    /// Begin a fresh run with the selected difficulty. Ignored mid-run.
    pub fn start_run(&mut self) -> Vec<GameEvent> {
        if self.is_running() {
            log::debug!("Start ignored, run in progress");
            return Vec::new();
        }
        let seed = self.base_seed.wrapping_add(self.runs);
        self.runs += 1;
        self.state = GameState::new(seed, self.settings.difficulty, &self.tuning);
        start_run(&mut self.state)
    }

    /// Select the difficulty for the next run. Returns false while a run is
    /// active, leaving the selection unchanged.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.is_running() {
            return false;
        }
        self.settings.difficulty = difficulty;
        // Keep the idle preview in step with the selection
        if self.state.phase == GamePhase::Idle {
            self.state = GameState::new(self.state.seed, difficulty, &self.tuning);
        }
        log::info!("Difficulty set to {}", difficulty.as_str());
        true
    }

    /// Flip sound on or off. The returned events start or stop the laser
    /// loop so it matches the new setting.
    pub fn toggle_sound(&mut self) -> Vec<GameEvent> {
        let enabled = self.settings.toggle_sound();
        log::info!("Sound {}", if enabled { "on" } else { "off" });
        if !enabled {
            vec![GameEvent::LaserLoopStop]
        } else if self.is_running() && self.state.active.blasters() {
            vec![GameEvent::LaserLoopStart]
        } else {
            Vec::new()
        }
    }

    /// Advance one animation frame
    pub fn frame(&mut self, input: &TickInput, dt_ms: f64) -> Vec<GameEvent> {
        tick(&mut self.state, input, dt_ms)
    }

    /// Menu line for the selected difficulty
    pub fn difficulty_info(&self) -> String {
        self.tuning.describe(self.settings.difficulty)
    }

    /// End-of-run overlay, if the run has ended
    pub fn overlay(&self) -> Option<Overlay> {
        let (title, title_color, score_label, hint) = match self.state.phase {
            GamePhase::GameOver => ("GAME OVER", 0xFF5252, "Final Score", "play again"),
            GamePhase::LevelComplete => ("LEVEL COMPLETE!", 0x4CAF50, "Score", "play next level"),
            GamePhase::Idle | GamePhase::Running => return None,
        };
        Some(Overlay {
            title,
            title_color,
            lines: vec![
                format!("{}: {}", score_label, self.state.score),
                format!("Difficulty: {}", self.state.difficulty.as_str().to_uppercase()),
                format!("Click \"Start Game\" to {}", hint),
            ],
        })
    }
}
