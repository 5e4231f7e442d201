// SPDX-License-Identifier: MPL-2.0

//! Platform collaborators
//!
//! The session never touches hardware or D-Bus itself; it goes through:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            Session / App Layer              │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────┴────────────────────────┐
//! │              Backend Layer                  │
//! │  ┌──────────────────┐  ┌─────────────────┐  │
//! │  │     Capture      │  │   Permission    │  │
//! │  │   (GStreamer)    │  │  (XDG portal)   │  │
//! │  └──────────────────┘  └─────────────────┘  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! - [`capture`]: Camera binding, preview frames and still capture
//! - [`permission`]: Camera access through `org.freedesktop.portal.Camera`

pub mod capture;
pub mod permission;
