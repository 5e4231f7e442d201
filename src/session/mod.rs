// SPDX-License-Identifier: MPL-2.0

//! Capture session: state machine and its controller
//!
//! - [`state`]: `SessionState` and the transition table
//! - [`controller`]: `SessionController`, the single owner of the state

pub mod controller;
pub mod state;

pub use controller::{OutcomeFuture, SessionController};
pub use state::{ServiceEvent, SessionState};
