use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, info, warn, error};
use crate::config::DEFAULT_WORKER_QUEUE_SIZE;

/// Painter settings that persist across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PainterSettings {
    /// Number of paint requests that may wait in the worker queue
    #[serde(default = "default_worker_queue_size")]
    pub worker_queue_size: usize,

    /// Log the duration of every paint call at debug level
    #[serde(default)]
    pub log_paint_timings: bool,
}

fn default_worker_queue_size() -> usize {
    DEFAULT_WORKER_QUEUE_SIZE
}

impl Default for PainterSettings {
    fn default() -> Self {
        Self {
            worker_queue_size: default_worker_queue_size(),
            log_paint_timings: false,
        }
    }
}

impl PainterSettings {
    /// Get the path to the settings file
    /// On Linux: ~/.config/label-painter/settings.yaml
    /// On macOS: ~/Library/Application Support/label-painter/settings.yaml
    pub fn settings_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."));

        config_dir.join("label-painter").join("settings.yaml")
    }

    /// Load settings from the YAML file
    /// If custom_path is provided, uses that path; otherwise uses the default settings path
    pub fn load(custom_path: Option<&str>) -> Self {
        let path = match custom_path {
            Some(p) => {
                info!("Using custom settings path: {}", p);
                PathBuf::from(p)
            }
            None => Self::settings_path(),
        };

        if !path.exists() {
            info!("Settings file not found at {:?}, using defaults", path);
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_yaml_str(&contents) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    debug!("Settings: worker_queue_size={}, log_paint_timings={}",
                        settings.worker_queue_size, settings.log_paint_timings);
                    settings
                }
                Err(e) => {
                    error!("Failed to parse settings file at {:?}: {}", path, e);
                    warn!("Using default settings");
                    Self::default()
                }
            },
            Err(e) => {
                error!("Failed to read settings file at {:?}: {}", path, e);
                warn!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, String> {
        serde_yaml::from_str::<PainterSettings>(contents)
            .map_err(|e| format!("Failed to parse settings: {}", e))
    }

    /// Write the settings with explanatory comments
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create settings directory: {}", e))?;
            }
        }

        fs::write(path, self.to_yaml_with_comments())
            .map_err(|e| format!("Failed to write settings file: {}", e))?;

        info!("Saved settings to {:?}", path);
        Ok(())
    }

    fn to_yaml_with_comments(&self) -> String {
        format!(
            r#"# label-painter settings
# Values here override the built-in defaults.

# Paint requests that may wait in the background worker queue
worker_queue_size: {}

# Log the duration of each paint call (debug level)
log_paint_timings: {}
"#,
            self.worker_queue_size,
            self.log_paint_timings
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let settings = PainterSettings::from_yaml_str("log_paint_timings: true\n").unwrap();
        assert_eq!(settings.worker_queue_size, DEFAULT_WORKER_QUEUE_SIZE);
        assert!(settings.log_paint_timings);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(PainterSettings::from_yaml_str("worker_queue_size: [1, 2]").is_err());
    }

    #[test]
    fn test_save_then_load() {
        let dir = std::env::temp_dir().join(format!("label-painter-settings-{}", std::process::id()));
        let path = dir.join("settings.yaml");
        let settings = PainterSettings {
            worker_queue_size: 3,
            log_paint_timings: true,
        };

        settings.save_to(&path).unwrap();
        let loaded = PainterSettings::load(path.to_str());
        let _ = fs::remove_dir_all(&dir);

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let loaded = PainterSettings::load(Some("/nonexistent/label-painter/settings.yaml"));
        assert_eq!(loaded, PainterSettings::default());
    }
}
