// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The main `update()` function acts as a dispatcher; handlers live in the
//! `handlers` submodules organized by functional domain.
//!
//! # Handler Modules
//!
//! - `handlers::ui`: UI navigation, context drawer
//! - `handlers::system`: Settings, opening saved photos
//! - `handlers::permission`: Camera permission and its notice
//! - `handlers::capture`: Viewfinder surface, capture, session outcomes

use crate::app::state::{AppModel, Message};
use cosmic::Task;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== UI Navigation =====
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),

            // ===== Settings =====
            Message::UpdateConfig(config) => self.handle_update_config(config),
            Message::SetAppTheme(index) => self.handle_set_app_theme(index),
            Message::SetPhotoQuality(index) => self.handle_set_photo_quality(index),

            // ===== Permission =====
            Message::PermissionStatusKnown(status) => self.handle_permission_status_known(status),
            Message::RequestPermission => self.handle_request_permission(),
            Message::PermissionResult(grant) => self.handle_permission_result(grant),
            Message::DismissNotice(id) => self.handle_dismiss_notice(id),

            // ===== Viewfinder =====
            Message::SurfaceAvailable(surface) => self.handle_surface_available(surface),
            Message::PreviewFrame(frame) => self.handle_preview_frame(frame),

            // ===== Session =====
            Message::Capture => self.handle_capture(),
            Message::Session(event) => self.handle_session_event(event),
            Message::ReturnToCamera | Message::Retry => self.handle_reset(),
            Message::OpenPhoto => self.handle_open_photo(),
        }
    }
}
