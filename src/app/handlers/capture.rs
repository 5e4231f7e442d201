// SPDX-License-Identifier: GPL-3.0-only

//! Viewfinder and capture handlers
//!
//! Bind and capture requests come back from the session as futures. They run
//! through `Task::perform` and their outcome returns as `Message::Session`.

use crate::app::state::{AppModel, Message};
use crate::backends::capture::{LifecycleScope, PreviewFrame, SurfaceTarget};
use crate::constants::timing;
use crate::session::{OutcomeFuture, ServiceEvent, SessionState};
use cosmic::Task;
use tracing::{debug, info};

impl AppModel {
    /// Deliver `message` after `millis`
    pub(crate) fn delay_task(millis: u64, message: Message) -> Task<cosmic::Action<Message>> {
        Task::perform(
            async move {
                tokio::time::sleep(tokio::time::Duration::from_millis(millis)).await;
                message
            },
            cosmic::Action::App,
        )
    }

    fn outcome_task(request: OutcomeFuture) -> Task<cosmic::Action<Message>> {
        Task::perform(request, |event| cosmic::Action::App(Message::Session(event)))
    }

    pub(crate) fn handle_surface_available(
        &mut self,
        surface: SurfaceTarget,
    ) -> Task<cosmic::Action<Message>> {
        if surface.generation() != self.surface_generation {
            debug!(
                surface = surface.generation(),
                current = self.surface_generation,
                "Ignoring stale surface"
            );
            return Task::none();
        }
        if !self.screen().shows_viewfinder() {
            debug!("Surface available while viewfinder hidden");
            return Task::none();
        }
        if self.session.bound_surface() == Some(surface.generation()) {
            return Task::none();
        }

        info!(surface = surface.generation(), "Viewfinder surface available");

        if let Some(previous) = self.scope.take() {
            previous.end();
        }
        let scope = LifecycleScope::new();
        self.scope = Some(scope.clone());
        self.frame_count = 0;

        Self::outcome_task(self.session.initialize(surface, scope))
    }

    pub(crate) fn handle_preview_frame(
        &mut self,
        frame: PreviewFrame,
    ) -> Task<cosmic::Action<Message>> {
        self.frame_count += 1;
        if self.frame_count % timing::FRAME_LOG_INTERVAL == 0 {
            debug!(
                frame = self.frame_count,
                width = frame.width,
                height = frame.height,
                latency_ms = frame.captured_at.elapsed().as_secs_f64() * 1000.0,
                "Preview frame"
            );
        }

        self.preview = Some(cosmic::widget::image::Handle::from_rgba(
            frame.width,
            frame.height,
            frame.packed_rgba(),
        ));
        Task::none()
    }

    pub(crate) fn handle_capture(&mut self) -> Task<cosmic::Action<Message>> {
        if self.is_capturing {
            debug!("Capture already in progress");
            return Task::none();
        }

        match self.session.capture() {
            Some(request) => {
                self.is_capturing = true;
                Self::outcome_task(request)
            }
            None => Task::none(),
        }
    }

    pub(crate) fn handle_session_event(
        &mut self,
        event: ServiceEvent,
    ) -> Task<cosmic::Action<Message>> {
        if matches!(
            event,
            ServiceEvent::Captured(_) | ServiceEvent::CaptureFailed(_)
        ) {
            self.is_capturing = false;
        }

        match self.session.apply(event) {
            SessionState::Captured(_) | SessionState::Failed(_) => {
                self.preview = None;
            }
            SessionState::Initial | SessionState::Ready => {}
        }
        Task::none()
    }

    pub(crate) fn handle_reset(&mut self) -> Task<cosmic::Action<Message>> {
        self.session.reset();
        self.restart_surface();
        Task::none()
    }

    /// End the current surface and announce a fresh generation
    pub(crate) fn restart_surface(&mut self) {
        if let Some(scope) = self.scope.take() {
            scope.end();
        }
        self.surface_generation += 1;
        self.preview = None;
        self.frame_count = 0;
        self.is_capturing = false;
    }
}
