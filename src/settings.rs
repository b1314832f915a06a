use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::hit_test::{NOT_FOUND, TieBreak};
use crate::pdf::POINTS_PER_INCH;

const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "pagepick";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Resolution pages are rasterized at before fitting
    #[serde(default = "default_render_dpi")]
    pub render_dpi: f32,

    #[serde(default = "default_not_found_message")]
    pub not_found_message: String,

    #[serde(default)]
    pub tie_break: TieBreak,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_render_dpi() -> f32 {
    POINTS_PER_INCH
}

fn default_not_found_message() -> String {
    NOT_FOUND.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            render_dpi: default_render_dpi(),
            not_found_message: default_not_found_message(),
            tie_break: TieBreak::default(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load from `explicit`, or the per-user config file, or fall back to defaults.
    ///
    /// Unreadable or malformed files are logged and replaced by defaults.
    #[must_use]
    pub fn load(explicit: Option<&Path>) -> Self {
        let Some(path) = explicit.map(Path::to_path_buf).or_else(default_config_path) else {
            debug!("No config directory available, using default settings");
            return Self::default();
        };

        if !path.exists() {
            debug!("No settings file at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => {
                info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("Ignoring settings file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut settings: Settings = serde_yaml::from_str(&content)?;
        if !settings.render_dpi.is_finite() || settings.render_dpi <= 0.0 {
            warn!(
                "render_dpi {} is not usable, falling back to {POINTS_PER_INCH}",
                settings.render_dpi
            );
            settings.render_dpi = POINTS_PER_INCH;
        }
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    /// Configured log level, `Info` when the value does not parse
    #[must_use]
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}
