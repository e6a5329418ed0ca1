//! Presentation preferences
//!
//! Persisted in LocalStorage on the web. These never include game progress:
//! score, lives and level live only as long as the page.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("camera follow rate {name} = {value} is outside (0, 1]")]
    FollowRate { name: &'static str, value: f32 },
}

/// Per-frame interpolation rates of the camera rig
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Position follow rate while idle (scroll path)
    pub idle_follow: f32,
    /// Position follow rate while zoomed into the game
    pub play_follow: f32,
    /// Look-target follow rate in both modes
    pub look_follow: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            idle_follow: 0.04,
            play_follow: 0.055,
            look_follow: 0.065,
        }
    }
}

impl CameraSettings {
    fn validate(&self) -> Result<(), SettingsError> {
        for (name, value) in [
            ("idle_follow", self.idle_follow),
            ("play_follow", self.play_follow),
            ("look_follow", self.look_follow),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(SettingsError::FollowRate { name, value });
            }
        }
        Ok(())
    }
}

/// Presentation preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Screen ===
    /// CRT scanline overlay on the game screen
    pub scanlines: bool,
    /// Glow around bricks, sparks, paddle and ball
    pub glow: bool,
    /// Blinking "take control" hint while the autopilot plays
    pub show_hint: bool,

    // === Scene ===
    /// Drop the handheld's idle float and wobble
    pub reduced_motion: bool,
    pub camera: CameraSettings,

    /// Fixed RNG seed for reproducible sessions; random when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scanlines: true,
            glow: true,
            show_hint: true,
            reduced_motion: false,
            camera: CameraSettings::default(),
            seed: None,
        }
    }
}

impl Settings {
    /// Parse and validate. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.camera.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "handheld_breakout_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"scanlines": false, "camera": {"play_follow": 0.1}}"#)
            .expect("valid settings");
        assert!(!settings.scanlines);
        assert!(settings.glow);
        assert_eq!(settings.camera.play_follow, 0.1);
        assert_eq!(settings.camera.idle_follow, 0.04);
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings {
            reduced_motion: true,
            seed: Some(42),
            ..Default::default()
        };
        let json = settings.to_json().expect("serializes");
        assert_eq!(Settings::from_json(&json).expect("parses"), settings);
    }

    #[test]
    fn test_rejects_bad_follow_rate() {
        let err = Settings::from_json(r#"{"camera": {"look_follow": 0.0}}"#).unwrap_err();
        assert!(matches!(err, SettingsError::FollowRate { name: "look_follow", .. }));

        let err = Settings::from_json(r#"{"camera": {"idle_follow": 1.5}}"#).unwrap_err();
        assert!(matches!(err, SettingsError::FollowRate { name: "idle_follow", .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Settings::from_json("{scanlines: yes}").unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }
}
