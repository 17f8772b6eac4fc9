//! Session settings
//!
//! Read once at startup; a missing or broken file falls back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Presentation surface width (px)
    pub arena_width: f32,
    /// Presentation surface height (px)
    pub arena_height: f32,
    /// Starting difficulty (gravity y), snapped to the 0.1 grid in [0.2, 1.0]
    pub difficulty: f32,
    /// Master seed for session RNGs (None = seed from the OS)
    pub seed: Option<u64>,
    /// Let the demo autopilot drive the paddle
    pub autopilot: bool,
    /// Physics and rule constants
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: 400.0,
            arena_height: 800.0,
            difficulty: 0.5,
            seed: None,
            autopilot: false,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_partial() {
        let settings = Settings::from_json(r#"{ "arena_width": 600, "seed": 7 }"#).unwrap();
        assert_eq!(settings.arena_width, 600.0);
        assert_eq!(settings.arena_height, 800.0);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.difficulty, 0.5);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Settings::from_json("{ not json").is_err());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let settings = Settings::load(Path::new("/definitely/not/here.json"));
        assert_eq!(settings, Settings::default());
    }
}
