//! Configuration management.

use anyhow::{Context, Result};
use oled_panel_hw::{Geometry, DEFAULT_I2C_ADDRESS, PANEL_HEIGHT, PANEL_WIDTH};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Bus configuration
    #[serde(default)]
    pub channel: ChannelConfig,

    /// Panel configuration
    #[serde(default)]
    pub panel: PanelConfig,

    /// Path to a JSON font asset
    #[serde(default)]
    pub font: Option<String>,
}

/// I2C bus configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Bus number (`/dev/i2c-<bus>`)
    #[serde(default = "default_bus")]
    pub bus: u8,

    /// 7-bit slave address
    #[serde(default = "default_address")]
    pub address: u8,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            bus: default_bus(),
            address: default_address(),
        }
    }
}

/// Panel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Panel width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Panel height in pixels (multiple of 8)
    #[serde(default = "default_height")]
    pub height: u32,

    /// Controller init payload; built from the geometry when absent
    #[serde(default)]
    pub init_sequence: Option<Vec<u8>>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            init_sequence: None,
        }
    }
}

impl PanelConfig {
    /// Validates the configured dimensions.
    pub fn geometry(&self) -> Result<Geometry> {
        Geometry::new(self.width, self.height).context("Invalid panel geometry")
    }
}

// Default value functions
fn default_bus() -> u8 {
    1
}

fn default_address() -> u8 {
    DEFAULT_I2C_ADDRESS
}

fn default_width() -> u32 {
    PANEL_WIDTH
}

fn default_height() -> u32 {
    PANEL_HEIGHT
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse configuration")?;
        Ok(config)
    }

    /// Loads configuration, falling back to defaults if the file is missing.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !path.as_ref().exists() {
            debug!(
                "No configuration at {}, using defaults",
                path.as_ref().display()
            );
            return Ok(Self::default());
        }
        Self::load(path)
    }
}
