// SPDX-License-Identifier: MPL-2.0

//! Main application module for the viewfinder
//!
//! This module contains the application state, message handling and UI
//! rendering. Camera work is delegated to the [`SessionController`].
//!
//! # Architecture
//!
//! - `access`: Reaction to a known permission status
//! - `screen`: Pure mapping from session state and permission to a screen
//! - `state`: Application state types (AppModel, Message, ContextPage)
//! - `settings`: Settings drawer UI
//! - `view`: Main view rendering
//! - `update`: Message dispatch
//! - `handlers`: Message handlers by domain
//!
//! The preview surface is a subscription that only exists while the
//! viewfinder screen is shown. Its id carries the surface generation, so each
//! reset tears the old surface down and announces a new one.

mod access;
mod handlers;
mod screen;
pub mod settings;
mod state;
mod update;
mod view;

use crate::backends::capture::{CaptureService, GstCaptureService, SurfaceTarget};
use crate::backends::permission::{PermissionAuthority, PortalPermissionAuthority};
use crate::config::Config;
use crate::constants::{PhotoQuality, ui};
use crate::fl;
use crate::session::SessionController;
use crate::storage::MediaStore;
use cosmic::app::context_drawer;
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use cosmic::iced::Subscription;
use cosmic::widget::{self, about::About};
use cosmic::{Element, Task};
pub use screen::Screen;
pub use state::{AppModel, ContextPage, Message, Notice};
use std::sync::Arc;
use tracing::{error, info};

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = "dev.viewfinder.Viewfinder";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .version(env!("GIT_VERSION"))
            .license(env!("CARGO_PKG_LICENSE"));

        // Load configuration
        let (config_handler, config) =
            match cosmic_config::Config::new(Self::APP_ID, Config::VERSION) {
                Ok(handler) => {
                    let config = match Config::get_entry(&handler) {
                        Ok(config) => config,
                        Err((errors, config)) => {
                            error!(?errors, "Errors loading config");
                            config
                        }
                    };
                    (Some(handler), config)
                }
                Err(err) => {
                    error!(%err, "Failed to create config handler");
                    (None, Config::default())
                }
            };

        let store = MediaStore::for_album(config.album_name());
        if let Err(e) = store.ensure_album() {
            error!(error = %e, "Failed to create photo album");
        }

        let capture_service = Arc::new(GstCaptureService::new(
            config.camera_path.clone(),
            config.photo_quality,
        ));
        let session = SessionController::new(
            Arc::clone(&capture_service) as Arc<dyn CaptureService>,
            store,
        );
        let permissions: Arc<dyn PermissionAuthority> =
            Arc::new(PortalPermissionAuthority::new());

        let app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            config,
            config_handler,
            session,
            capture_service,
            permissions: Arc::clone(&permissions),
            permission: Default::default(),
            permission_pending: false,
            notice: None,
            next_notice_id: 0,
            surface_generation: 0,
            scope: None,
            preview: None,
            frame_count: 0,
            is_capturing: false,
            theme_options: vec![fl!("match-desktop"), fl!("dark"), fl!("light")],
            quality_options: PhotoQuality::ALL
                .iter()
                .map(|q| q.display_name().to_string())
                .collect(),
        };

        let status_task = Task::perform(permissions.status(), |status| {
            cosmic::Action::App(Message::PermissionStatusKnown(status))
        });
        let theme_task = cosmic::command::set_theme(app.config.app_theme.theme());

        (app, Task::batch([status_task, theme_task]))
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::button::icon(widget::icon::from_name("help-about-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::About))
                .into(),
            widget::button::icon(widget::icon::from_name("preferences-system-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::Settings))
                .into(),
        ]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
            ContextPage::Settings => self.settings_view(),
        })
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        use cosmic::iced::futures::{SinkExt, StreamExt};

        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        if !self.screen().shows_viewfinder() {
            return config_sub;
        }

        let generation = self.surface_generation;
        let viewfinder_sub = Subscription::run_with_id(
            ("viewfinder", generation),
            cosmic::iced::stream::channel(
                ui::PREVIEW_CHANNEL_CAPACITY,
                move |mut output| async move {
                    let (sender, mut frames) =
                        futures::channel::mpsc::channel(ui::PREVIEW_CHANNEL_CAPACITY);

                    info!(generation, "Viewfinder surface created");
                    let surface = SurfaceTarget::new(generation, sender);
                    if output
                        .send(Message::SurfaceAvailable(surface))
                        .await
                        .is_err()
                    {
                        return;
                    }

                    while let Some(frame) = frames.next().await {
                        // Dropping frames is fine for a live preview
                        if let Err(e) = output.try_send(Message::PreviewFrame(frame))
                            && e.is_disconnected()
                        {
                            break;
                        }
                    }

                    info!(generation, "Viewfinder surface closed");
                },
            ),
        );

        Subscription::batch([config_sub, viewfinder_sub])
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}
