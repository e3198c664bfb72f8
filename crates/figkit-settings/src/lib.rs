//! FigKit Settings Crate
//!
//! Handles interaction and output configuration and its persistence.

pub mod config;
pub mod error;

pub use config::{Config, InteractionSettings, OutputSettings, MAX_RECENT_SCRIPTS};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
