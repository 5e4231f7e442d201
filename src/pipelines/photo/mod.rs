// SPDX-License-Identifier: MPL-2.0

//! Still photo pipeline
//!
//! ```text
//! Latest preview frame → JPEG encoding → Disk I/O
//! ```

pub mod encoding;

pub use encoding::{EncodedImage, PhotoEncoder};
