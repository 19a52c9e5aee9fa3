//! Player preferences
//!
//! Held in memory for the lifetime of the page. A host may seed them from
//! JSON; nothing is written back.

use serde::{Deserialize, Serialize};

use crate::tuning::Difficulty;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty used for the next run
    pub difficulty: Difficulty,

    // === Audio ===
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            sound_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
        }
    }
}

impl Settings {
    /// Flip the sound flag, returning the new value
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    /// Gain applied to every cue; zero when sound is off
    pub fn effective_volume(&self) -> f32 {
        if self.sound_enabled {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Label for the sound toggle button
    pub fn sound_label(&self) -> &'static str {
        if self.sound_enabled {
            "Sound: ON"
        } else {
            "Sound: OFF"
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    /// Parse preferences, falling back to defaults
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Some(Err(e)) => {
                log::warn!("Invalid settings JSON ({}), using defaults", e);
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_sound() {
        let mut settings = Settings::default();
        assert_eq!(settings.sound_label(), "Sound: ON");
        assert!(!settings.toggle_sound());
        assert_eq!(settings.effective_volume(), 0.0);
        assert_eq!(settings.sound_label(), "Sound: OFF");
        assert!(settings.toggle_sound());
        assert!((settings.effective_volume() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"difficulty":"master","master_volume":3.0}"#).unwrap();
        assert_eq!(settings.difficulty, Difficulty::Master);
        assert_eq!(settings.master_volume, 1.0);
        assert!(settings.sound_enabled);
    }

    #[test]
    fn test_page_settings_are_used() {
        let settings = Settings::load_or_default(Some(r#"{"difficulty":"hard","sound_enabled":false}"#));
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.sound_label(), "Sound: OFF");
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_bad_json_falls_back() {
        assert_eq!(Settings::load_or_default(Some("[]")), Settings::default());
        assert_eq!(Settings::load_or_default(None), Settings::default());
    }
}
