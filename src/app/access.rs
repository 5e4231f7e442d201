// SPDX-License-Identifier: GPL-3.0-only

//! Reaction to a known camera permission status
//!
//! A grant always resets the session so the viewfinder starts from a clean
//! binding. A denial after an explicit request shows a notice. Anything else
//! waits on the permission prompt.

use crate::backends::permission::PermissionStatus;
use crate::session::SessionController;
use tracing::debug;

/// What the app does once a permission status is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessReaction {
    /// Session was reset, start a new surface
    Reset,
    /// Tell the user the request was refused
    Notice,
    /// Keep showing the prompt
    Wait,
}

impl AccessReaction {
    /// `requested` is true when the status answers a request the user made
    pub fn for_status(status: PermissionStatus, requested: bool) -> Self {
        match status {
            PermissionStatus::Granted => AccessReaction::Reset,
            _ if requested => AccessReaction::Notice,
            _ => AccessReaction::Wait,
        }
    }
}

/// Decide the reaction and reset `session` when it calls for one
pub fn observe(
    session: &mut SessionController,
    status: PermissionStatus,
    requested: bool,
) -> AccessReaction {
    let reaction = AccessReaction::for_status(status, requested);
    debug!(?status, requested, ?reaction, "Permission observed");

    if reaction == AccessReaction::Reset {
        session.reset();
    }
    reaction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::capture::{
        CaptureService, LifecycleScope, OutputTarget, ResourceHandle, SurfaceTarget,
    };
    use crate::errors::CaptureResult;
    use crate::session::{ServiceEvent, SessionState};
    use crate::storage::MediaStore;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingService {
        unbinds: AtomicUsize,
    }

    impl CaptureService for CountingService {
        fn bind(&self, _surface: &SurfaceTarget, _scope: &LifecycleScope) -> CaptureResult<()> {
            Ok(())
        }

        fn capture_still(&self, output: &OutputTarget) -> CaptureResult<ResourceHandle> {
            Ok(ResourceHandle::from_path(&output.path))
        }

        fn unbind_all(&self) -> CaptureResult<()> {
            self.unbinds.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn is_bound(&self) -> bool {
            false
        }
    }

    fn ready_session() -> (SessionController, Arc<CountingService>) {
        let service = Arc::new(CountingService::default());
        let store = MediaStore::new(PathBuf::from("/nonexistent/viewfinder-access"), "CameraApp");
        let mut session =
            SessionController::new(Arc::clone(&service) as Arc<dyn CaptureService>, store);
        assert_eq!(session.apply(ServiceEvent::Bound), SessionState::Ready);
        (session, service)
    }

    #[test]
    fn test_reaction_table() {
        use PermissionStatus::*;

        assert_eq!(AccessReaction::for_status(Granted, true), AccessReaction::Reset);
        assert_eq!(AccessReaction::for_status(Granted, false), AccessReaction::Reset);
        assert_eq!(AccessReaction::for_status(Denied, true), AccessReaction::Notice);
        assert_eq!(AccessReaction::for_status(NotDetermined, true), AccessReaction::Notice);
        assert_eq!(AccessReaction::for_status(Denied, false), AccessReaction::Wait);
        assert_eq!(AccessReaction::for_status(NotDetermined, false), AccessReaction::Wait);
    }

    #[test]
    fn test_grant_resets_ready_session() {
        let (mut session, service) = ready_session();

        let reaction = observe(&mut session, PermissionStatus::Granted, true);

        assert_eq!(reaction, AccessReaction::Reset);
        assert_eq!(session.state(), SessionState::Initial);
        assert_eq!(service.unbinds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_grant_known_at_startup_also_resets() {
        let (mut session, _service) = ready_session();

        let reaction = observe(&mut session, PermissionStatus::Granted, false);

        assert_eq!(reaction, AccessReaction::Reset);
        assert_eq!(session.state(), SessionState::Initial);
    }

    #[test]
    fn test_denial_leaves_session_alone() {
        let (mut session, service) = ready_session();

        let reaction = observe(&mut session, PermissionStatus::Denied, true);

        assert_eq!(reaction, AccessReaction::Notice);
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(service.unbinds.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_undetermined_at_startup_waits() {
        let (mut session, service) = ready_session();

        let reaction = observe(&mut session, PermissionStatus::NotDetermined, false);

        assert_eq!(reaction, AccessReaction::Wait);
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(service.unbinds.load(Ordering::SeqCst), 0);
    }
}
