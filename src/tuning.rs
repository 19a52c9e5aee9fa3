//! Data-driven game balance
//!
//! Ball speed and power-up drop rates per difficulty. The built-in table is
//! the default; a host may supply its own as JSON.

use serde::{Deserialize, Serialize};

use crate::sim::PowerupKind;

/// Difficulty levels selectable before a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Master,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Master,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Master => "master",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "master" => Some(Difficulty::Master),
            _ => None,
        }
    }
}

/// Per-kind chance that a destroyed block drops a power-up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnChances {
    pub blasters: f32,
    pub small: f32,
    pub big: f32,
}

impl SpawnChances {
    /// Gate for any drop at all: the sum of the per-kind chances
    pub fn total(&self) -> f32 {
        self.blasters + self.small + self.big
    }

    pub fn chance(&self, kind: PowerupKind) -> f32 {
        match kind {
            PowerupKind::Blasters => self.blasters,
            PowerupKind::Small => self.small,
            PowerupKind::Big => self.big,
        }
    }

    /// Weighted cumulative pick. `roll` is expected in `[0, total)`; rolls at
    /// or past the total land on the last kind with a non-zero weight.
    pub fn pick(&self, roll: f32) -> Option<PowerupKind> {
        let mut cumulative = 0.0;
        let mut last = None;
        for kind in PowerupKind::ALL {
            let chance = self.chance(kind);
            if chance <= 0.0 {
                continue;
            }
            cumulative += chance;
            last = Some(kind);
            if roll < cumulative {
                return Some(kind);
            }
        }
        last
    }
}

/// Settings for a single difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTuning {
    /// Ball speed in pixels per tick
    pub ball_speed: f32,
    pub spawn_chances: SpawnChances,
}

/// Balance table covering every difficulty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    pub easy: DifficultyTuning,
    pub medium: DifficultyTuning,
    pub hard: DifficultyTuning,
    pub master: DifficultyTuning,
    /// Hits needed by blocks in the bottom row of the grid
    #[serde(default = "default_max_block_hits")]
    pub max_block_hits: u8,
}

fn default_max_block_hits() -> u8 {
    3
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            easy: DifficultyTuning {
                ball_speed: 2.0,
                spawn_chances: SpawnChances {
                    blasters: 0.05,
                    small: 0.03,
                    big: 0.05,
                },
            },
            medium: DifficultyTuning {
                ball_speed: 5.0,
                spawn_chances: SpawnChances {
                    blasters: 0.03,
                    small: 0.02,
                    big: 0.03,
                },
            },
            hard: DifficultyTuning {
                ball_speed: 7.0,
                spawn_chances: SpawnChances {
                    blasters: 0.01,
                    small: 0.02,
                    big: 0.01,
                },
            },
            master: DifficultyTuning {
                ball_speed: 9.0,
                spawn_chances: SpawnChances {
                    blasters: 0.005,
                    small: 0.01,
                    big: 0.005,
                },
            },
            max_block_hits: default_max_block_hits(),
        }
    }
}

impl Tuning {
    pub fn get(&self, difficulty: Difficulty) -> &DifficultyTuning {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
            Difficulty::Master => &self.master,
        }
    }

    /// Parse a balance table from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut tuning: Tuning = serde_json::from_str(json)?;
        tuning.max_block_hits = tuning.max_block_hits.max(1);
        Ok(tuning)
    }

    /// Parse a balance table, falling back to the built-in one
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(tuning)) => {
                log::info!("Loaded custom tuning");
                tuning
            }
            Some(Err(e)) => {
                log::warn!("Invalid tuning JSON ({}), using defaults", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// One-line summary of a difficulty, for the menu
    pub fn describe(&self, difficulty: Difficulty) -> String {
        let t = self.get(difficulty);
        let c = &t.spawn_chances;
        format!(
            "{} - Ball Speed: {}, Total Powerup: {:.1}% (B:{:.1}% S:{:.1}% L:{:.1}%)",
            difficulty.as_str().to_uppercase(),
            t.ball_speed,
            c.total() * 100.0,
            c.blasters * 100.0,
            c.small * 100.0,
            c.big * 100.0,
        )
    }
}
