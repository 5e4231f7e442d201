// SPDX-License-Identifier: MPL-2.0

//! Media processing pipelines
//!
//! - [`photo`]: Still encoding and saving
//!
//! Capture itself (device binding, preview streaming) lives in
//! [`crate::backends::capture`]; pipelines only turn frames into files.

pub mod photo;
