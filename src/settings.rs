//! User settings and preferences
//!
//! Persisted as JSON in the working directory, separate from any exported
//! results.

use serde::{Deserialize, Serialize};

use crate::consts;

/// User preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Initial window size
    pub window_width: u32,
    pub window_height: u32,

    // === Canvas ===
    /// Show the drag/zoom hint overlay on each level
    pub show_hints: bool,
    /// Scale applied to a grabbed image while it is dragged
    pub grab_scale: f32,
    /// Backdrop tint factor applied to the sampled level color
    pub backdrop_dim: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: consts::WINDOW_WIDTH,
            window_height: consts::WINDOW_HEIGHT,
            show_hints: true,
            grab_scale: consts::GRAB_SCALE,
            backdrop_dim: consts::BACKDROP_DIM,
        }
    }
}

impl Settings {
    /// Settings file, resolved against the working directory
    const STORAGE_FILE: &'static str = "image-vote-settings.json";

    /// Load settings, falling back to defaults when the file is missing or
    /// malformed
    pub fn load() -> Self {
        if let Ok(json) = std::fs::read_to_string(Self::STORAGE_FILE) {
            if let Ok(settings) = serde_json::from_str(&json) {
                log::info!("Loaded settings from {}", Self::STORAGE_FILE);
                return settings;
            }
            log::warn!("Ignoring malformed {}", Self::STORAGE_FILE);
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings, best effort
    pub fn save(&self) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(Self::STORAGE_FILE, json) {
                    log::warn!("Failed to save settings: {e}");
                } else {
                    log::info!("Settings saved");
                }
            }
            Err(e) => log::warn!("Failed to encode settings: {e}"),
        }
    }
}
