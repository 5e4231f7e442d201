// SPDX-License-Identifier: GPL-3.0-only

//! Session state machine
//!
//! ```text
//!            Bound                 Captured(h)
//! Initial ─────────▶ Ready ──────────────────▶ Captured(h)
//!    │                 │  ╲
//!    │ BindFailed      │   ╲ BindFailed / CaptureFailed
//!    ▼                 │    ▼
//!  Failed(msg) ◀───────┘  Failed(msg)
//!
//! reset: any state ──▶ Initial
//! ```

use crate::backends::capture::ResourceHandle;
use crate::errors::CaptureError;

/// Current state of the capture session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No active binding
    #[default]
    Initial,
    /// Pipeline bound, waiting for a capture trigger
    Ready,
    /// Last capture succeeded
    Captured(ResourceHandle),
    /// Last operation failed, holds a non-empty diagnostic
    Failed(String),
}

/// Outcome message emitted by the capture service, one per request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceEvent {
    Bound,
    BindFailed(CaptureError),
    Captured(ResourceHandle),
    CaptureFailed(CaptureError),
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Initial => "initial",
            SessionState::Ready => "ready",
            SessionState::Captured(_) => "captured",
            SessionState::Failed(_) => "failed",
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, SessionState::Ready)
    }

    /// Next state after `event`, or `None` when the event has no transition
    /// from this state and must be dropped.
    pub fn transition(&self, event: &ServiceEvent) -> Option<SessionState> {
        use SessionState::*;

        match (self, event) {
            (Initial | Ready, ServiceEvent::Bound) => Some(Ready),
            (Initial | Ready, ServiceEvent::BindFailed(err)) => Some(Failed(err.detail())),
            (Ready, ServiceEvent::Captured(handle)) => Some(Captured(handle.clone())),
            (Ready, ServiceEvent::CaptureFailed(err)) => Some(Failed(err.detail())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_states() -> Vec<SessionState> {
        vec![
            SessionState::Initial,
            SessionState::Ready,
            SessionState::Captured(ResourceHandle::new("IMG_000")),
            SessionState::Failed("earlier failure".to_string()),
        ]
    }

    #[test]
    fn test_bind_outcomes() {
        assert_eq!(
            SessionState::Initial.transition(&ServiceEvent::Bound),
            Some(SessionState::Ready)
        );
        assert_eq!(
            SessionState::Ready.transition(&ServiceEvent::Bound),
            Some(SessionState::Ready)
        );
        assert_eq!(
            SessionState::Initial.transition(&ServiceEvent::BindFailed(CaptureError::Bind(
                "device busy".to_string()
            ))),
            Some(SessionState::Failed("device busy".to_string()))
        );
    }

    #[test]
    fn test_capture_outcomes_only_from_ready() {
        let handle = ResourceHandle::new("IMG_001");
        let captured = ServiceEvent::Captured(handle.clone());
        let failed = ServiceEvent::CaptureFailed(CaptureError::Capture("sensor error".into()));

        for state in all_states() {
            let expected = state
                .is_ready()
                .then(|| SessionState::Captured(handle.clone()));
            assert_eq!(state.transition(&captured), expected, "from {}", state.name());

            let expected = state
                .is_ready()
                .then(|| SessionState::Failed("sensor error".to_string()));
            assert_eq!(state.transition(&failed), expected, "from {}", state.name());
        }
    }

    #[test]
    fn test_terminal_states_never_jump_to_ready() {
        for state in all_states() {
            if matches!(state, SessionState::Captured(_) | SessionState::Failed(_)) {
                assert_eq!(state.transition(&ServiceEvent::Bound), None);
            }
        }
    }

    #[test]
    fn test_failed_message_never_empty() {
        let next = SessionState::Initial
            .transition(&ServiceEvent::BindFailed(CaptureError::Bind(String::new())))
            .unwrap();
        match next {
            SessionState::Failed(msg) => assert!(!msg.is_empty()),
            other => panic!("unexpected state {:?}", other),
        }
    }
}
