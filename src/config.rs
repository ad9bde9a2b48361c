//! Configuration for the TV client.
//!
//! Configuration is read from `ccctv.yaml` in the working directory (or the
//! path in `CCCTV_CONFIG`) and covers:
//! - Timing constants for controls auto-hide, search debounce and autosave
//! - List layout constants used by the window manager
//! - API endpoints for the media.ccc.de backend

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CccTvError, Result};

/// Default configuration file name
pub const CONFIG_FILE: &str = "ccctv.yaml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub api: ApiConfig,
}

/// Timer durations, all in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    pub controls_timeout_ms: u64,
    pub search_debounce_ms: u64,
    pub autosave_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            controls_timeout_ms: 4_000,
            search_debounce_ms: 400,
            autosave_interval_ms: 300_000,
        }
    }
}

impl TimingConfig {
    pub fn controls_timeout(&self) -> Duration {
        Duration::from_millis(self.controls_timeout_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_millis(self.autosave_interval_ms)
    }
}

/// List and grid layout constants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Items rendered on each side of the selection in a virtualized list
    pub visible_buffer: usize,
    /// Lists at or below this size are rendered in full
    pub virtualize_threshold: usize,
    /// Estimated height of one list row, used for spacer sizing
    pub item_height: f32,
    /// Minimum distance kept between the selected row and the container edge
    pub scroll_inset: f32,
    /// Columns in the conference-detail grid
    pub grid_columns: usize,
    /// Conference rows kept on screen by the home view
    pub rows_on_screen: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            visible_buffer: 25,
            virtualize_threshold: 100,
            item_height: 120.0,
            scroll_inset: 20.0,
            grid_columns: 4,
            rows_on_screen: 6,
        }
    }
}

/// Backend endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub graphql_url: String,
    pub rest_base: String,
    pub default_language: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            graphql_url: "https://media.ccc.de/graphql".to_string(),
            rest_base: "https://api.media.ccc.de".to_string(),
            default_language: "deu".to_string(),
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        match env::var("CCCTV_CONFIG") {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => PathBuf::from(CONFIG_FILE),
        }
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)?;
            Self::from_yaml(&content)?
        } else {
            Config::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml_ng::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn apply_env(&mut self) {
        if let Ok(base) = env::var("CCCTV_API_BASE")
            && !base.is_empty()
        {
            self.api.rest_base = base;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.layout.rows_on_screen < 2 {
            return Err(CccTvError::Config(format!(
                "layout.rows_on_screen must be at least 2, got {}",
                self.layout.rows_on_screen
            )));
        }
        if self.layout.grid_columns == 0 {
            return Err(CccTvError::Config(
                "layout.grid_columns must be positive".to_string(),
            ));
        }
        if self.layout.item_height <= 0.0 {
            return Err(CccTvError::Config(
                "layout.item_height must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
