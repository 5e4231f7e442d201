// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::app::screen::Screen;
use crate::backends::capture::{
    GstCaptureService, LifecycleScope, PreviewFrame, SurfaceTarget,
};
use crate::backends::permission::{PermissionAuthority, PermissionGrant, PermissionStatus};
use crate::config::Config;
use crate::session::{ServiceEvent, SessionController};
use cosmic::cosmic_config;
use cosmic::widget::about::About;
use std::sync::Arc;

/// Transient message shown on the permission prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub text: String,
}

/// The application model stores app-specific state used to describe its
/// interface and drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined.
    pub context_page: ContextPage,
    /// The about page for this app.
    pub about: About,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Configuration handler for saving settings
    pub config_handler: Option<cosmic_config::Config>,
    /// Capture session, the single owner of the session state
    pub session: SessionController,
    /// Same service the session delegates to, kept for reconfiguration
    pub capture_service: Arc<GstCaptureService>,
    /// Camera permission source
    pub permissions: Arc<dyn PermissionAuthority>,
    /// Last known camera permission
    pub permission: PermissionStatus,
    /// Permission request in flight
    pub permission_pending: bool,
    /// Denial notice, auto-dismissed
    pub notice: Option<Notice>,
    /// Counter for notice ids
    pub next_notice_id: u64,
    /// Preview surface generation; bumped on every reset
    pub surface_generation: u64,
    /// Lifetime of the current binding
    pub scope: Option<LifecycleScope>,
    /// Latest preview frame
    pub preview: Option<cosmic::widget::image::Handle>,
    /// Frames received on the current surface
    pub frame_count: u64,
    /// Capture request in flight
    pub is_capturing: bool,
    /// Theme dropdown labels
    pub theme_options: Vec<String>,
    /// Photo quality dropdown labels
    pub quality_options: Vec<String>,
}

impl AppModel {
    /// Screen for the current session state and permission
    pub fn screen(&self) -> Screen {
        Screen::derive(&self.session.state(), self.permission)
    }
}

/// The context page to display in the context drawer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    About,
    Settings,
}

/// Messages emitted by the application and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    // ===== UI Navigation =====
    /// Open external URL
    LaunchUrl(String),
    /// Toggle context drawer page
    ToggleContextPage(ContextPage),

    // ===== Settings =====
    /// Configuration changed externally
    UpdateConfig(Config),
    /// Theme dropdown index
    SetAppTheme(usize),
    /// Photo quality dropdown index
    SetPhotoQuality(usize),

    // ===== Permission =====
    /// Status read at startup
    PermissionStatusKnown(PermissionStatus),
    /// User pressed "request permissions"
    RequestPermission,
    /// Outcome of a permission request
    PermissionResult(PermissionGrant),
    /// Hide the notice with this id
    DismissNotice(u64),

    // ===== Viewfinder =====
    /// Preview surface created by the viewfinder subscription
    SurfaceAvailable(SurfaceTarget),
    /// Frame for the preview surface
    PreviewFrame(PreviewFrame),

    // ===== Session =====
    /// Take a photo
    Capture,
    /// Outcome of a bind or capture request
    Session(ServiceEvent),
    /// "Back to camera" on the saved screen
    ReturnToCamera,
    /// "Retry" on the error screen
    Retry,
    /// Open the saved photo in the default viewer
    OpenPhoto,
}
