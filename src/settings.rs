//! Player preferences
//!
//! Persisted separately from the best score, one storage key per value.

use serde::{Deserialize, Serialize};

use crate::persistence::Storage;

/// Game settings/preferences
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub sound_enabled: bool,
    /// Sound volume (0.0 - 1.0)
    pub volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            volume: Self::DEFAULT_VOLUME,
        }
    }
}

impl Settings {
    const SOUND_ENABLED_KEY: &'static str = "septicSurferSoundEnabled";
    const VOLUME_KEY: &'static str = "septicSurferSoundVolume";
    pub const DEFAULT_VOLUME: f32 = 0.7;

    /// Volume actually applied to sounds
    pub fn effective_volume(&self) -> f32 {
        if self.sound_enabled { self.volume } else { 0.0 }
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            Self::DEFAULT_VOLUME
        };
    }

    /// Flip sound on/off, returning the new state
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    /// Load settings; missing or unreadable values fall back to defaults
    pub fn load(storage: &dyn Storage) -> Self {
        let mut settings = Self::default();
        if let Some(raw) = storage.get(Self::SOUND_ENABLED_KEY) {
            match raw.trim().parse() {
                Ok(enabled) => settings.sound_enabled = enabled,
                Err(_) => log::warn!("Ignoring stored sound flag {raw:?}"),
            }
        }
        if let Some(raw) = storage.get(Self::VOLUME_KEY) {
            match raw.trim().parse::<f32>() {
                Ok(volume) => settings.set_volume(volume),
                Err(_) => log::warn!("Ignoring stored volume {raw:?}"),
            }
        }
        settings
    }

    /// Save settings; failures only cost persistence
    pub fn save(&self, storage: &mut dyn Storage) {
        let ok = storage.set(Self::SOUND_ENABLED_KEY, &self.sound_enabled.to_string())
            & storage.set(Self::VOLUME_KEY, &self.volume.to_string());
        if ok {
            log::info!("Settings saved");
        } else {
            log::warn!("Settings not saved, storage unavailable");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStorage, NullStorage};

    #[test]
    fn test_defaults() {
        let settings = Settings::load(&NullStorage);
        assert!(settings.sound_enabled);
        assert_eq!(settings.volume, 0.7);
        assert_eq!(settings.effective_volume(), 0.7);
    }

    #[test]
    fn test_save_and_load() {
        let mut storage = MemoryStorage::new();
        let mut settings = Settings::default();
        settings.toggle_sound();
        settings.set_volume(0.25);
        settings.save(&mut storage);

        let loaded = Settings::load(&storage);
        assert_eq!(loaded, settings);
        assert_eq!(loaded.effective_volume(), 0.0);
    }

    #[test]
    fn test_volume_clamped() {
        let mut settings = Settings::default();
        settings.set_volume(3.0);
        assert_eq!(settings.volume, 1.0);
        settings.set_volume(f32::NAN);
        assert_eq!(settings.volume, 0.7);
    }

    #[test]
    fn test_garbage_values_ignored() {
        let mut storage = MemoryStorage::new();
        storage.set("septicSurferSoundEnabled", "maybe");
        storage.set("septicSurferSoundVolume", "loud");
        assert_eq!(Settings::load(&storage), Settings::default());
    }
}
