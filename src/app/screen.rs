// SPDX-License-Identifier: GPL-3.0-only

//! Screen selection
//!
//! The window shows exactly one screen, derived from the session state and
//! the camera permission. Nothing else feeds into the choice.

use crate::backends::capture::ResourceHandle;
use crate::backends::permission::PermissionStatus;
use crate::session::SessionState;

/// What the window currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Camera access not granted yet
    PermissionPrompt {
        /// Explain why the camera is needed (after a denial)
        rationale: bool,
    },
    /// Live preview with the capture button
    Viewfinder { capture_enabled: bool },
    /// Photo saved
    Saved(ResourceHandle),
    /// Something went wrong, retry available
    Error(String),
}

impl Screen {
    pub fn derive(state: &SessionState, permission: PermissionStatus) -> Self {
        match state {
            SessionState::Initial if !permission.is_granted() => Screen::PermissionPrompt {
                rationale: permission == PermissionStatus::Denied,
            },
            SessionState::Initial => Screen::Viewfinder {
                capture_enabled: false,
            },
            SessionState::Ready => Screen::Viewfinder {
                capture_enabled: true,
            },
            SessionState::Captured(handle) => Screen::Saved(handle.clone()),
            SessionState::Failed(msg) => Screen::Error(msg.clone()),
        }
    }

    /// Whether the preview surface should exist
    pub fn shows_viewfinder(&self) -> bool {
        matches!(self, Screen::Viewfinder { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUSES: [PermissionStatus; 3] = [
        PermissionStatus::NotDetermined,
        PermissionStatus::Granted,
        PermissionStatus::Denied,
    ];

    #[test]
    fn test_initial_depends_on_permission() {
        assert_eq!(
            Screen::derive(&SessionState::Initial, PermissionStatus::NotDetermined),
            Screen::PermissionPrompt { rationale: false }
        );
        assert_eq!(
            Screen::derive(&SessionState::Initial, PermissionStatus::Denied),
            Screen::PermissionPrompt { rationale: true }
        );
        assert_eq!(
            Screen::derive(&SessionState::Initial, PermissionStatus::Granted),
            Screen::Viewfinder {
                capture_enabled: false
            }
        );
    }

    #[test]
    fn test_other_states_ignore_permission() {
        let handle = ResourceHandle::new("IMG_001");
        for status in STATUSES {
            assert_eq!(
                Screen::derive(&SessionState::Ready, status),
                Screen::Viewfinder {
                    capture_enabled: true
                }
            );
            assert_eq!(
                Screen::derive(&SessionState::Captured(handle.clone()), status),
                Screen::Saved(handle.clone())
            );
            assert_eq!(
                Screen::derive(&SessionState::Failed("device busy".into()), status),
                Screen::Error("device busy".into())
            );
        }
    }

    #[test]
    fn test_viewfinder_visibility() {
        assert!(Screen::derive(&SessionState::Ready, PermissionStatus::Granted).shows_viewfinder());
        assert!(
            !Screen::derive(&SessionState::Initial, PermissionStatus::Denied).shows_viewfinder()
        );
        assert!(
            !Screen::derive(&SessionState::Failed("x".into()), PermissionStatus::Granted)
                .shows_viewfinder()
        );
    }
}
