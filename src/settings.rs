//! Player preferences
//!
//! Persisted in LocalStorage on the web; the headless native runner has no
//! audio or input and always uses defaults.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Ambient loop volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Game-over sting volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Silence everything
    pub muted: bool,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Play ===
    /// Start sessions with the autopilot driving
    pub autopilot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_volume: 0.01,
            sfx_volume: 0.0325,
            muted: false,
            mute_on_blur: true,
            autopilot: false,
        }
    }
}

impl Settings {
    /// Volumes clamped into range; muting zeroes both
    pub fn effective_volumes(&self) -> (f32, f32) {
        if self.muted {
            (0.0, 0.0)
        } else {
            (
                self.music_volume.clamp(0.0, 1.0),
                self.sfx_volume.clamp(0.0, 1.0),
            )
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "crab_crossing_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }
}
