// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use serde::{Deserialize, Serialize};

/// JPEG quality presets for saved photos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PhotoQuality {
    /// Small files, visible artifacts
    Low,
    /// Balanced quality and file size
    Medium,
    /// Low compression (default)
    #[default]
    High,
    /// Minimal compression
    Maximum,
}

impl PhotoQuality {
    /// Get all preset variants for UI iteration
    pub const ALL: [PhotoQuality; 4] = [
        PhotoQuality::Low,
        PhotoQuality::Medium,
        PhotoQuality::High,
        PhotoQuality::Maximum,
    ];

    /// Get display name for the preset
    pub fn display_name(&self) -> &'static str {
        match self {
            PhotoQuality::Low => "Low",
            PhotoQuality::Medium => "Medium",
            PhotoQuality::High => "High",
            PhotoQuality::Maximum => "Maximum",
        }
    }

    /// JPEG quality value (1-100)
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            PhotoQuality::Low => 60,
            PhotoQuality::Medium => 80,
            PhotoQuality::High => 92,
            PhotoQuality::Maximum => 98,
        }
    }
}

/// Storage naming and layout
pub mod storage {
    /// chrono format for photo names, renders as `yyyy-MM-dd-HH-mm-ss-SSS`
    pub const NAME_FORMAT: &str = "%Y-%m-%d-%H-%M-%S-%3f";
    /// MIME type of every saved still
    pub const MIME_TYPE: &str = "image/jpeg";
    /// File extension matching [`MIME_TYPE`]
    pub const EXTENSION: &str = "jpg";
    /// Top-level shared media collection the album lives in
    pub const COLLECTION: &str = "Pictures";
    /// Default album name inside the pictures directory
    pub const DEFAULT_ALBUM: &str = "CameraApp";
}

/// GStreamer pipeline settings
pub mod pipeline {
    /// Maximum buffers queued in the appsink before old frames are dropped
    pub const MAX_BUFFERS: u32 = 2;
    /// Name of the appsink element inside the launch string
    pub const SINK_NAME: &str = "viewfinder_sink";
    /// Sources tried in order when binding
    pub const SOURCES: [&str; 2] = ["pipewiresrc", "v4l2src"];
}

/// Timing constants
pub mod timing {
    /// Seconds to wait for the pipeline to reach PLAYING
    pub const START_TIMEOUT_SECS: u64 = 5;
    /// Seconds to wait for the pipeline to reach NULL
    pub const STOP_TIMEOUT_SECS: u64 = 2;
    /// Log preview statistics every N frames
    pub const FRAME_LOG_INTERVAL: u64 = 120;
    /// How long a transient notice stays on screen
    pub const NOTICE_DISPLAY_MS: u64 = 3500;
}

/// UI sizing
pub mod ui {
    /// Preview frames buffered between pipeline and window
    pub const PREVIEW_CHANNEL_CAPACITY: usize = 4;
    /// Horizontal padding of centered message screens
    pub const SCREEN_PADDING: u16 = 16;
    /// Minimum window size
    pub const MIN_WIDTH: f32 = 360.0;
    pub const MIN_HEIGHT: f32 = 240.0;
}
