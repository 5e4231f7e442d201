// SPDX-License-Identifier: GPL-3.0-only

//! Session controller
//!
//! Owns the [`SessionState`] and turns user intents into capture service
//! requests. Requests are returned as futures that resolve to exactly one
//! [`ServiceEvent`]; the owner runs them on its executor and feeds the event
//! back through [`SessionController::apply`].
//!
//! There are no request IDs. A `reset` that races an in-flight bind is
//! settled by whichever write lands last.

use super::state::{ServiceEvent, SessionState};
use crate::backends::capture::{CaptureService, LifecycleScope, SurfaceTarget};
use crate::errors::CaptureError;
use crate::storage::MediaStore;
use futures::future::BoxFuture;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Pending request, resolves to the service's single outcome
pub type OutcomeFuture = BoxFuture<'static, ServiceEvent>;

/// Handles held while a pipeline is bound
#[derive(Debug)]
struct Binding {
    surface: SurfaceTarget,
    _scope: LifecycleScope,
}

/// State holder wrapping a capture service
pub struct SessionController {
    service: Arc<dyn CaptureService>,
    store: MediaStore,
    state: watch::Sender<SessionState>,
    binding: Option<Binding>,
}

impl SessionController {
    pub fn new(service: Arc<dyn CaptureService>, store: MediaStore) -> Self {
        let (state, _) = watch::channel(SessionState::Initial);
        Self {
            service,
            store,
            state,
            binding: None,
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every published state
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Generation of the surface the pipeline was last bound to
    pub fn bound_surface(&self) -> Option<u64> {
        self.binding.as_ref().map(|b| b.surface.generation())
    }

    /// Replace the media store (album changed in settings)
    pub fn set_store(&mut self, store: MediaStore) {
        info!(album = store.album(), "Photo album changed");
        self.store = store;
    }

    /// Bind the capture pipeline to `surface` for the lifetime of `scope`
    ///
    /// Safe to call repeatedly: any existing binding is released first.
    pub fn initialize(&mut self, surface: SurfaceTarget, scope: LifecycleScope) -> OutcomeFuture {
        info!(
            surface = surface.generation(),
            state = self.state.borrow().name(),
            "Initializing camera"
        );

        self.binding = Some(Binding {
            surface: surface.clone(),
            _scope: scope.clone(),
        });

        let service = Arc::clone(&self.service);
        Box::pin(async move {
            let result = tokio::task::spawn_blocking(move || {
                service.unbind_all()?;
                service.bind(&surface, &scope)
            })
            .await;

            match result {
                Ok(Ok(())) => ServiceEvent::Bound,
                Ok(Err(err)) => ServiceEvent::BindFailed(err),
                Err(join_err) => ServiceEvent::BindFailed(CaptureError::Bind(format!(
                    "Bind task failed: {}",
                    join_err
                ))),
            }
        })
    }

    /// Request a still capture
    ///
    /// Returns `None` (and changes nothing) unless the session is ready and
    /// the service still holds a pipeline.
    pub fn capture(&mut self) -> Option<OutcomeFuture> {
        if !self.state.borrow().is_ready() {
            info!(
                state = self.state.borrow().name(),
                "Capture ignored: session not ready"
            );
            return None;
        }
        if self.binding.is_none() || !self.service.is_bound() {
            warn!("Capture ignored: no pipeline bound");
            return None;
        }

        let target = self.store.next_target();
        info!(name = %target.display_name, path = %target.path.display(), "Capturing photo");

        let service = Arc::clone(&self.service);
        Some(Box::pin(async move {
            let result = tokio::task::spawn_blocking(move || service.capture_still(&target)).await;

            match result {
                Ok(Ok(handle)) => ServiceEvent::Captured(handle),
                Ok(Err(err)) => ServiceEvent::CaptureFailed(err),
                Err(join_err) => ServiceEvent::CaptureFailed(CaptureError::Capture(format!(
                    "Capture task failed: {}",
                    join_err
                ))),
            }
        }))
    }

    /// Consume one service outcome and publish the resulting state
    pub fn apply(&mut self, event: ServiceEvent) -> SessionState {
        let current = self.state();

        let Some(next) = current.transition(&event) else {
            warn!(state = current.name(), ?event, "Outcome dropped in current state");
            return current;
        };

        match &next {
            SessionState::Failed(msg) => error!(from = current.name(), error = %msg, "Session failed"),
            SessionState::Captured(handle) => {
                info!(from = current.name(), handle = %handle, "Photo captured")
            }
            _ => info!(from = current.name(), to = next.name(), "Session transition"),
        }

        self.state.send_replace(next.clone());
        next
    }

    /// Release the pipeline and return to `Initial`, from any state
    pub fn reset(&mut self) {
        info!(state = self.state.borrow().name(), "Resetting session");
        self.release();
        self.state.send_replace(SessionState::Initial);
    }

    /// Release the pipeline without publishing a transition
    pub fn teardown(&mut self) {
        debug!("Tearing down session");
        self.release();
    }

    fn release(&mut self) {
        if let Err(err) = self.service.unbind_all() {
            warn!(error = %err, "Failed to unbind camera");
        }
        self.binding = None;
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &*self.state.borrow())
            .field("bound_surface", &self.bound_surface())
            .field("album", &self.store.album())
            .finish()
    }
}
