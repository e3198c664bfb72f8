//! Configuration and settings management for FigKit
//!
//! Supports JSON and TOML file formats stored in the platform config
//! directory.
//!
//! Configuration is organized into logical sections:
//! - Interaction settings (hit tolerances, minimum extents, nudge, snapping)
//! - Output settings (generated block marker, display unit)
//! - Recently edited scripts

pub use figkit_core::units::LengthUnit;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Number of recent scripts kept in the config.
pub const MAX_RECENT_SCRIPTS: usize = 10;

/// Pointer interaction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Grab distance around a handle, in screen pixels
    pub handle_tolerance_px: f64,
    /// Smallest width/height a resize may produce, in figure fraction
    pub min_extent: f64,
    /// Translation per nudge, in screen pixels
    pub nudge_step_px: f64,
    /// Snap distance in screen pixels, 0 disables snapping
    pub snap_threshold_px: f64,
    /// Distance of the rotate handle above the selection, in screen pixels
    pub rotate_handle_offset_px: f64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            handle_tolerance_px: 6.0,
            min_extent: 0.005,
            nudge_step_px: 1.0,
            snap_threshold_px: 0.0,
            rotate_handle_offset_px: 20.0,
        }
    }
}

impl InteractionSettings {
    /// Returns `true` when snapping is enabled.
    pub fn snapping_enabled(&self) -> bool {
        self.snap_threshold_px > 0.0
    }
}

/// Generated-code output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Tool name written into the block markers
    pub marker_tag: String,
    /// Unit used when lengths are shown to the user
    pub display_unit: LengthUnit,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            marker_tag: "figkit".to_string(),
            display_unit: LengthUnit::default(),
        }
    }
}

impl OutputSettings {
    /// `#% start: ...` line opening a generated block.
    pub fn start_marker(&self) -> String {
        format!("#% start: automatic generated code from {}", self.marker_tag)
    }

    /// `#% end: ...` line closing a generated block.
    pub fn end_marker(&self) -> String {
        format!("#% end: automatic generated code from {}", self.marker_tag)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Recently edited scripts, newest first
    pub recent_scripts: Vec<PathBuf>,
    /// Interaction preferences
    pub interaction: InteractionSettings,
    /// Output preferences
    pub output: OutputSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config location, `<config dir>/figkit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("figkit").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Load the config from the default location, falling back to defaults
    /// when no file exists yet.
    pub fn load_or_default() -> SettingsResult<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from_file(&path)
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating the parent directory
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| SettingsError::ConfigDirectory(e.to_string()))?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let i = &self.interaction;
        let positive = [
            ("interaction.handle_tolerance_px", i.handle_tolerance_px),
            ("interaction.min_extent", i.min_extent),
            ("interaction.nudge_step_px", i.nudge_step_px),
        ];
        for (key, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::ValueOutOfRange {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
        }

        if i.min_extent >= 1.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "interaction.min_extent".to_string(),
                value: i.min_extent.to_string(),
            });
        }

        let non_negative = [
            ("interaction.snap_threshold_px", i.snap_threshold_px),
            ("interaction.rotate_handle_offset_px", i.rotate_handle_offset_px),
        ];
        for (key, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValueOutOfRange {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
        }

        let tag = &self.output.marker_tag;
        if tag.trim().is_empty() || tag.contains(['\n', '\r']) {
            return Err(ConfigError::InvalidSetting {
                key: "output.marker_tag".to_string(),
                reason: "must be a non-empty single line".to_string(),
            });
        }

        Ok(())
    }

    /// Add a script to the front of the recent list
    pub fn add_recent_script(&mut self, path: PathBuf) {
        self.recent_scripts.retain(|p| p != &path);
        self.recent_scripts.insert(0, path);
        self.recent_scripts.truncate(MAX_RECENT_SCRIPTS);
    }
}
