//! Configuration file support for Mapty.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/mapty/config.toml`. Every
//! section and field is optional.

use crate::{Error, Result, TileLayer, WorkoutKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub map: MapConfig,

    #[serde(default)]
    pub popup: PopupConfig,

    #[serde(default)]
    pub form: FormConfig,
}

/// Map view and tile source
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MapConfig {
    /// Zoom used when the map opens and when re-centering on a workout
    #[serde(default = "default_zoom")]
    pub zoom: u8,

    #[serde(default = "default_max_zoom")]
    pub max_zoom: u8,

    #[serde(default = "default_tile_url")]
    pub tile_url: String,

    #[serde(default = "default_attribution")]
    pub attribution: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom: default_zoom(),
            max_zoom: default_max_zoom(),
            tile_url: default_tile_url(),
            attribution: default_attribution(),
        }
    }
}

impl MapConfig {
    pub fn tile_layer(&self) -> TileLayer {
        TileLayer {
            url_template: self.tile_url.clone(),
            max_zoom: self.max_zoom,
            attribution: self.attribution.clone(),
        }
    }
}

/// Marker popup options
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PopupConfig {
    #[serde(default = "default_popup_max_width")]
    pub max_width: u32,

    #[serde(default = "default_popup_min_width")]
    pub min_width: u32,

    #[serde(default)]
    pub auto_close: bool,

    #[serde(default)]
    pub close_on_click: bool,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            max_width: default_popup_max_width(),
            min_width: default_popup_min_width(),
            auto_close: false,
            close_on_click: false,
        }
    }
}

/// Workout form behaviour
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FormConfig {
    /// Kind selected when the form first opens
    #[serde(default = "default_kind")]
    pub default_kind: WorkoutKind,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            default_kind: default_kind(),
        }
    }
}

// Default value functions
fn default_zoom() -> u8 {
    13
}

fn default_max_zoom() -> u8 {
    20
}

fn default_tile_url() -> String {
    "https://tiles.stadiamaps.com/tiles/alidade_smooth/{z}/{x}/{y}{r}.png".into()
}

fn default_attribution() -> String {
    concat!(
        r#"&copy; <a href="https://stadiamaps.com/">Stadia Maps</a>, "#,
        r#"&copy; <a href="https://openmaptiles.org/">OpenMapTiles</a> "#,
        r#"&copy; <a href="http://openstreetmap.org">OpenStreetMap</a> contributors"#,
    )
    .into()
}

fn default_popup_max_width() -> u32 {
    250
}

fn default_popup_min_width() -> u32 {
    100
}

fn default_kind() -> WorkoutKind {
    WorkoutKind::Running
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| Error::Config("no configuration directory for this user".into()))?;
        Ok(base.join("mapty").join("config.toml"))
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.map.zoom > self.map.max_zoom {
            return Err(Error::Config(format!(
                "map.zoom ({}) exceeds map.max_zoom ({})",
                self.map.zoom, self.map.max_zoom
            )));
        }
        if self.popup.min_width > self.popup.max_width {
            return Err(Error::Config(format!(
                "popup.min_width ({}) exceeds popup.max_width ({})",
                self.popup.min_width, self.popup.max_width
            )));
        }
        Ok(())
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path()?;
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
