// SPDX-License-Identifier: GPL-3.0-only

//! Settings drawer: theme, photo quality and the album in use

pub mod view;
