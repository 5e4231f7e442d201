// SPDX-License-Identifier: GPL-3.0-only

//! System handlers
//!
//! Settings changes and opening saved photos.

use crate::app::state::{AppModel, Message};
use crate::config::{AppTheme, Config};
use crate::constants::PhotoQuality;
use crate::session::SessionState;
use crate::storage::MediaStore;
use cosmic::Task;
use cosmic::cosmic_config::CosmicConfigEntry;
use tracing::{error, info, warn};

impl AppModel {
    pub(crate) fn handle_update_config(&mut self, config: Config) -> Task<cosmic::Action<Message>> {
        info!("UpdateConfig received");

        if config.album_name() != self.config.album_name() {
            self.session.set_store(MediaStore::for_album(config.album_name()));
        }
        if config.photo_quality != self.config.photo_quality
            || config.camera_path != self.config.camera_path
        {
            self.capture_service
                .configure(config.camera_path.clone(), config.photo_quality);
        }

        let theme_changed = config.app_theme != self.config.app_theme;
        self.config = config;

        if theme_changed {
            cosmic::command::set_theme(self.config.app_theme.theme())
        } else {
            Task::none()
        }
    }

    pub(crate) fn handle_set_app_theme(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        let app_theme = match index {
            0 => AppTheme::System,
            1 => AppTheme::Dark,
            2 => AppTheme::Light,
            _ => return Task::none(),
        };

        info!(?app_theme, "Setting application theme");
        self.config.app_theme = app_theme;
        self.save_config();

        cosmic::command::set_theme(app_theme.theme())
    }

    pub(crate) fn handle_set_photo_quality(
        &mut self,
        index: usize,
    ) -> Task<cosmic::Action<Message>> {
        let Some(&quality) = PhotoQuality::ALL.get(index) else {
            return Task::none();
        };

        info!(?quality, "Setting photo quality");
        self.config.photo_quality = quality;
        self.capture_service
            .configure(self.config.camera_path.clone(), quality);
        self.save_config();
        Task::none()
    }

    pub(crate) fn handle_open_photo(&self) -> Task<cosmic::Action<Message>> {
        let SessionState::Captured(handle) = self.session.state() else {
            warn!("Open photo requested without a saved photo");
            return Task::none();
        };

        let target = handle
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| handle.uri());
        info!(target = %target, "Opening saved photo");

        if let Err(err) = open::that_detached(&target) {
            error!(target = %target, error = %err, "Failed to open photo");
        }
        Task::none()
    }

    fn save_config(&self) {
        if let Some(handler) = self.config_handler.as_ref()
            && let Err(err) = self.config.write_entry(handler)
        {
            error!(?err, "Failed to save settings");
        }
    }
}
