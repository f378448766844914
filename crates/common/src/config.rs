//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where projects are stored.
    pub projects_dir: PathBuf,

    /// Defaults applied to new projects and CLI builds.
    #[serde(default)]
    pub editor: EditorDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default editing parameters.
///
/// Kept as plain values so this crate stays independent of the timeline
/// model; the model parses `transition_curve` and `fill_mode` itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorDefaults {
    /// Default transition duration between adjacent clips (seconds).
    pub transition_secs: f64,

    /// Transition curve: "dissolve", "fade" or "none".
    pub transition_curve: String,

    /// Scale each transition by the outgoing clip's speed factor.
    pub scale_transition_with_speed: bool,

    /// Silence clips whose speed factor is not 1.0.
    pub mute_on_speed_change: bool,

    /// Fill mode for clip placement: "aspect_fill", "aspect_fit" or "fill".
    pub fill_mode: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "segue=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            projects_dir: dirs_default_projects(),
            editor: EditorDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EditorDefaults {
    fn default() -> Self {
        Self {
            transition_secs: 1.0,
            transition_curve: "dissolve".to_string(),
            scale_transition_with_speed: false,
            mute_on_speed_change: false,
            fill_mode: "aspect_fill".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("segue").join("config.json")
}

/// Default projects directory.
fn dirs_default_projects() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("segue").join("projects")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_editor_values() {
        let defaults = EditorDefaults::default();
        assert_eq!(defaults.transition_curve, "dissolve");
        assert!((defaults.transition_secs - 1.0).abs() < 1e-9);
        assert!(!defaults.mute_on_speed_change);
    }

    #[test]
    fn test_legacy_config_without_editor_section_parses() {
        let json = r#"{
            "projects_dir": "/tmp/segue",
            "logging": { "level": "debug", "json": false, "file": null }
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.editor.fill_mode, "aspect_fill");
    }

    #[test]
    fn test_partial_editor_section_fills_defaults() {
        let json = r#"{
            "projects_dir": "/tmp/segue",
            "editor": { "transition_secs": 0.5 },
            "logging": { "level": "info", "json": true, "file": null }
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert!((config.editor.transition_secs - 0.5).abs() < 1e-9);
        assert_eq!(config.editor.transition_curve, "dissolve");
        assert!(config.logging.json);
    }
}
