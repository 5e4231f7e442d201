// SPDX-License-Identifier: MPL-2.0

//! Error types for the viewfinder application

use std::fmt;

/// Result type alias for capture service operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Errors reported by a capture service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// Pipeline could not attach to the surface or lifecycle scope
    Bind(String),
    /// Still capture was rejected or failed (grab, encode or write)
    Capture(String),
    /// No camera source is available on this system
    NoCameraFound,
    /// Operation requires a bound pipeline
    NotBound,
}

/// Permission errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    /// The user (or the portal) refused access
    Denied,
    /// The permission portal could not be reached or answered garbage
    Portal(String),
}

impl CaptureError {
    /// Human-readable diagnostic without the category prefix
    ///
    /// This is what ends up in `SessionState::Failed`, never empty.
    pub fn detail(&self) -> String {
        let detail = match self {
            CaptureError::Bind(msg) | CaptureError::Capture(msg) => msg.trim().to_string(),
            other => other.to_string(),
        };

        if detail.is_empty() {
            self.fallback_detail().to_string()
        } else {
            detail
        }
    }

    fn fallback_detail(&self) -> &'static str {
        match self {
            CaptureError::Bind(_) => "Camera could not be started",
            CaptureError::Capture(_) => "Photo could not be taken",
            CaptureError::NoCameraFound => "No camera devices found",
            CaptureError::NotBound => "Camera is not running",
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Bind(msg) => write!(f, "Bind failed: {}", msg),
            CaptureError::Capture(msg) => write!(f, "Capture failed: {}", msg),
            CaptureError::NoCameraFound => write!(f, "No camera devices found"),
            CaptureError::NotBound => write!(f, "Camera is not running"),
        }
    }
}

impl fmt::Display for PermissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionError::Denied => write!(f, "Camera access was denied"),
            PermissionError::Portal(msg) => write!(f, "Portal request failed: {}", msg),
        }
    }
}

impl std::error::Error for CaptureError {}
impl std::error::Error for PermissionError {}

impl From<zbus::Error> for PermissionError {
    fn from(err: zbus::Error) -> Self {
        PermissionError::Portal(err.to_string())
    }
}
