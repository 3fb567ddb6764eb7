use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::render::{DEFAULT_PREVIEW, DEFAULT_STEPS};

/// Upper bound on points per run
pub const MAX_STEPS: usize = 100_000;

/// Upper bound on points listed at each end of a summary
pub const MAX_PREVIEW: usize = 50;

/// Returns the path to the settings file: `~/.config/lightcraft/settings.json`
pub fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("lightcraft");
    path.push("settings.json");
    path
}

/// How a run is written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Console summary of the first and last points
    #[default]
    Summary,
    /// Every point as a JSON array
    Json,
}

/// Persisted settings.
///
/// Serialized as JSON to the platform config directory.
/// Fields use `#[serde(default)]` so that adding new settings
/// won't break existing config files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Points generated per file
    pub num_steps: usize,
    /// Points shown at each end of the summary
    pub preview_points: usize,
    pub output: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            num_steps: DEFAULT_STEPS,
            preview_points: DEFAULT_PREVIEW,
            output: OutputFormat::default(),
        }
    }
}

impl Settings {
    /// Pull step and preview counts into their supported ranges.
    ///
    /// Zero steps stays valid (an empty run). The preview never exceeds
    /// half the run, so the first and last blocks cannot overlap.
    pub fn clamp(&mut self) {
        let steps = self.num_steps.min(MAX_STEPS);
        let preview = self.preview_points.clamp(1, MAX_PREVIEW).min(steps.div_ceil(2).max(1));

        if steps != self.num_steps || preview != self.preview_points {
            log::warn!(
                "Adjusted settings: num_steps {} -> {}, preview_points {} -> {}",
                self.num_steps,
                steps,
                self.preview_points,
                preview
            );
        }

        self.num_steps = steps;
        self.preview_points = preview;
    }

    /// Load settings from the default location, falling back to defaults on any error.
    pub fn load() -> Self {
        Self::load_from(settings_path())
    }

    /// Load settings from `path`, falling back to defaults on any error.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Self>(&contents) {
                Ok(mut settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings.clamp();
                    settings
                }
                Err(e) => {
                    log::warn!("Failed to parse settings ({}), using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                log::info!("No settings file found ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to the default location as pretty JSON.
    pub fn save(&self) {
        self.save_to(settings_path());
    }

    /// Save settings to `path` as pretty JSON. Failures are logged.
    pub fn save_to(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::warn!("Failed to create config directory: {}", e);
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    log::warn!("Failed to write settings: {}", e);
                } else {
                    log::info!("Saved settings to {}", path.display());
                }
            }
            Err(e) => {
                log::warn!("Failed to serialize settings: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = Settings {
            num_steps: 64,
            preview_points: 3,
            output: OutputFormat::Json,
        };
        settings.save_to(&path);

        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(dir.path().join("nope.json"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.num_steps, 200);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "num_steps": 12 }"#).unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.num_steps, 12);
        assert_eq!(settings.preview_points, DEFAULT_PREVIEW);
        assert_eq!(settings.output, OutputFormat::Summary);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "num_steps": 5000000, "preview_points": 0 }"#).unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.num_steps, MAX_STEPS);
        assert_eq!(settings.preview_points, 1);
    }

    #[test]
    fn test_clamp_preview_to_half_run() {
        let mut settings = Settings {
            num_steps: 6,
            preview_points: 40,
            output: OutputFormat::Summary,
        };
        settings.clamp();
        assert_eq!(settings.preview_points, 3);

        let mut empty = Settings {
            num_steps: 0,
            preview_points: 5,
            output: OutputFormat::Summary,
        };
        empty.clamp();
        assert_eq!(empty.num_steps, 0);
        assert_eq!(empty.preview_points, 1);

        let mut defaults = Settings::default();
        defaults.clamp();
        assert_eq!(defaults, Settings::default());
    }

    #[test]
    fn test_garbage_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();

        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_settings_path_name() {
        let path = settings_path();
        assert!(path.ends_with("lightcraft/settings.json"));
    }
}
