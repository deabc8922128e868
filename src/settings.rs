//! Player preferences
//!
//! Persisted separately from high scores.

use serde::{Deserialize, Serialize};

use crate::persistence::Storage;

/// Audio preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Mute all audio
    pub muted: bool,
    /// Player-chosen master volume (0.0 - 1.0); `None` keeps the tuning default
    pub volume: Option<f32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            volume: None,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "homing_strike_settings";

    /// Load settings; missing or corrupt data yields the defaults
    pub fn load(storage: &dyn Storage) -> Self {
        let Some(json) = storage.get_item(Self::STORAGE_KEY) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match serde_json::from_str::<Settings>(&json) {
            Ok(mut settings) => {
                settings.volume = settings.volume.map(|v| v.clamp(0.0, 1.0));
                log::info!("Loaded settings (muted: {})", settings.muted);
                settings
            }
            Err(e) => {
                log::warn!("Ignoring corrupt settings: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings; failures are logged and otherwise ignored
    pub fn save(&self, storage: &mut dyn Storage) {
        match serde_json::to_string(self) {
            Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Failed to save settings: {}", e),
            },
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }
}

/// Persisted mute flag (defaults to unmuted)
pub fn load_mute_state(storage: &dyn Storage) -> bool {
    Settings::load(storage).muted
}

/// Persist the mute flag, keeping other preferences intact
pub fn save_mute_state(storage: &mut dyn Storage, muted: bool) {
    let mut settings = Settings::load(storage);
    settings.muted = muted;
    settings.save(storage);
}
