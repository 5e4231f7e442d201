// SPDX-License-Identifier: MPL-2.0

//! Viewfinder - a minimal camera application for the COSMIC desktop
//!
//! Shows a live preview, takes a still photo on request and saves it to the
//! user's pictures folder.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`session`]: Capture session state machine and its controller
//! - [`app`]: Presentation layer (screens, messages, view)
//! - [`backends`]: Capture service and permission authority
//! - [`pipelines`]: Still photo encoding
//! - [`storage`]: Photo naming and album location
//! - [`config`]: User configuration handling
//!
//! # Example
//!
//! ```ignore
//! // This is a GUI application, typically run via:
//! // viewfinder
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod i18n;
pub mod pipelines;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use app::{AppModel, Message, Screen};
pub use backends::capture::{CaptureService, ResourceHandle};
pub use config::Config;
pub use constants::PhotoQuality;
pub use errors::{CaptureError, PermissionError};
pub use session::{ServiceEvent, SessionController, SessionState};
