// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::{PhotoQuality, storage};
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use cosmic::{Theme, theme};
use serde::{Deserialize, Serialize};

/// Application theme preference
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum AppTheme {
    /// Follow system theme (dark or light based on system setting)
    #[default]
    System,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

impl AppTheme {
    /// Get the COSMIC theme for this app theme preference
    pub fn theme(&self) -> Theme {
        match self {
            Self::Dark => {
                let mut theme = theme::system_dark();
                theme.theme_type.prefer_dark(Some(true));
                theme
            }
            Self::Light => {
                let mut theme = theme::system_light();
                theme.theme_type.prefer_dark(Some(false));
                theme
            }
            Self::System => theme::system_preference(),
        }
    }
}

#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Application theme preference (System, Dark, Light)
    pub app_theme: AppTheme,
    /// Album folder inside the pictures directory
    pub album: String,
    /// JPEG quality for saved photos
    pub photo_quality: PhotoQuality,
    /// Camera node/device to bind instead of the default source
    pub camera_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_theme: AppTheme::default(),
            album: storage::DEFAULT_ALBUM.to_string(),
            photo_quality: PhotoQuality::default(),
            camera_path: None,
        }
    }
}

impl Config {
    /// Album name to save into, falling back to the default for blank values
    pub fn album_name(&self) -> &str {
        let trimmed = self.album.trim();
        if trimmed.is_empty() {
            storage::DEFAULT_ALBUM
        } else {
            trimmed
        }
    }
}
