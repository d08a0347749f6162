//! Engine configuration persistence
//!
//! Stores preferences in `~/.config/caret/config.yaml`

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::editable::EffectAllowed;

/// Engine configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How long the caret stays visible per blink cycle
    pub cursor_delay_ms: u64,
    /// How long the caret stays hidden per blink cycle
    pub cursor_duration_ms: u64,
    /// Copy, paste and drop carry per-character styles
    pub style_copy_paste: bool,
    /// Operations offered to the platform when dragging text out
    pub drop_effect_allowed: EffectAllowed,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cursor_delay_ms: 1000,
            cursor_duration_ms: 600,
            style_copy_paste: true,
            drop_effect_allowed: EffectAllowed::CopyMove,
        }
    }
}

impl EngineConfig {
    pub fn cursor_delay(&self) -> Duration {
        Duration::from_millis(self.cursor_delay_ms)
    }

    pub fn cursor_duration(&self) -> Duration {
        Duration::from_millis(self.cursor_duration_ms)
    }

    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{e:#}, using defaults");
                Self::default()
            }
        }
    }

    /// Read and parse a config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let path = crate::config_paths::config_file().context("No config directory available")?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating the parent directory if needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}
