//! Game settings
//!
//! Read from a JSON file; any missing field falls back to its default.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_SCORING_EFFECT;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for box sizes, box colors and ball sprites
    pub seed: u64,
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,

    // === Visual Effects ===
    /// Particle burst when a ball scores
    pub scoring_effects: bool,
    /// Emitter asset used for the burst. `None` means the asset is missing.
    pub scoring_effect_template: Option<String>,

    // === HUD ===
    /// Show the score label
    pub show_score: bool,

    // === Accessibility ===
    /// Reduced motion (no slot glow spin)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0,
            gravity: 980.0,
            scoring_effects: true,
            scoring_effect_template: Some(DEFAULT_SCORING_EFFECT.to_string()),
            show_score: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective scoring burst template (respects the effects toggle)
    pub fn effective_scoring_effect(&self) -> Option<&str> {
        if !self.scoring_effects {
            return None;
        }
        self.scoring_effect_template.as_deref()
    }

    /// Effective glow spin (respects reduced_motion)
    pub fn effective_glow_spin(&self) -> bool {
        !self.reduced_motion
    }

    /// Parse settings from JSON text
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid settings JSON")
    }

    /// Read settings from a file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        let settings = Self::from_json(&json)
            .with_context(|| format!("failed to parse settings in {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings if a path is given, falling back to defaults on any error
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{:#}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize settings")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write settings to {}", path.display()))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 42, "reduced_motion": true }"#).expect("valid json");
        assert_eq!(settings.seed, 42);
        assert!(settings.reduced_motion);
        assert!(!settings.effective_glow_spin());
        assert_eq!(settings.gravity, 980.0);
        assert_eq!(settings.effective_scoring_effect(), Some("FireParticles"));
    }

    #[test]
    fn test_null_template_disables_effect() {
        let settings = Settings::from_json(r#"{ "scoring_effect_template": null }"#).expect("valid json");
        assert_eq!(settings.effective_scoring_effect(), None);
    }

    #[test]
    fn test_effects_toggle_wins_over_template() {
        let settings = Settings {
            scoring_effects: false,
            ..Default::default()
        };
        assert_eq!(settings.effective_scoring_effect(), None);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Settings::from_json("{ seed: ").is_err());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let settings = Settings::load(Some(Path::new("/nonexistent/pachinko/settings.json")));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("pachinko-settings-{}.json", std::process::id()));
        let settings = Settings {
            seed: 7,
            show_score: false,
            ..Default::default()
        };
        settings.save_to(&path).expect("writable temp dir");
        let loaded = Settings::load_from(&path).expect("readable settings");
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }
}
