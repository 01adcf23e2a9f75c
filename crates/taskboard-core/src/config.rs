use crate::{TaskboardError, TaskboardResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_ACTIVATION_DISTANCE: f64 = 20.0;

/// Column override as written in `config.toml`.
///
/// `status` is kept as the wire string (`TO_DO`, `IN_PROGRESS`, ...) and is
/// interpreted by the domain layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub id: String,
    pub status: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Pointer travel (px) before a press turns into a drag.
    #[serde(default = "default_activation_distance")]
    pub activation_distance: f64,
    #[serde(default = "default_notify_on_success")]
    pub notify_on_success: bool,
    #[serde(default)]
    pub columns: Option<Vec<ColumnConfig>>,
}

fn default_activation_distance() -> f64 {
    DEFAULT_ACTIVATION_DISTANCE
}

fn default_notify_on_success() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            activation_distance: DEFAULT_ACTIVATION_DISTANCE,
            notify_on_success: true,
            columns: None,
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/taskboard/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("taskboard/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("taskboard\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    /// Load from the platform config path, falling back to defaults.
    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                match Self::from_path(&config_path) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!(
                            "Ignoring unreadable config {}: {}",
                            config_path.display(),
                            e
                        );
                    }
                }
            }
        }
        Self::default()
    }

    pub fn from_path(path: &Path) -> TaskboardResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| TaskboardError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> TaskboardResult<()> {
        if !self.activation_distance.is_finite() || self.activation_distance < 0.0 {
            return Err(TaskboardError::Validation(format!(
                "activation_distance must be a non-negative number, got {}",
                self.activation_distance
            )));
        }
        if let Some(columns) = &self.columns {
            if columns.is_empty() {
                return Err(TaskboardError::Validation(
                    "columns override must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}
