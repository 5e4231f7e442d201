// SPDX-License-Identifier: GPL-3.0-only

//! Still photo encoding and saving
//!
//! Runs on the capture worker thread: the controller already moved the whole
//! capture request off the UI loop, so nothing here spawns tasks.

use crate::backends::capture::{OutputTarget, PreviewFrame};
use crate::constants::PhotoQuality;
use crate::errors::{CaptureError, CaptureResult};
use image::{ExtendedColorType, RgbImage};
use std::io::Write;
use tracing::{debug, info};

/// Encoded JPEG ready for saving
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// JPEG encoder for captured frames
#[derive(Debug, Clone, Copy, Default)]
pub struct PhotoEncoder {
    quality: PhotoQuality,
}

impl PhotoEncoder {
    pub fn new(quality: PhotoQuality) -> Self {
        Self { quality }
    }

    /// Encode an RGBA preview frame as JPEG
    pub fn encode(&self, frame: &PreviewFrame) -> CaptureResult<EncodedImage> {
        info!(
            width = frame.width,
            height = frame.height,
            quality = self.quality.jpeg_quality(),
            "Encoding still"
        );

        let rgb = rgba_to_rgb(frame)?;
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);

        let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
            &mut cursor,
            self.quality.jpeg_quality(),
        );
        encoder
            .encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
            .map_err(|e| CaptureError::Capture(format!("JPEG encoding failed: {}", e)))?;

        debug!(size = buffer.len(), "Encoding complete");

        Ok(EncodedImage {
            data: buffer,
            width: frame.width,
            height: frame.height,
        })
    }

    /// Write an encoded image to its output target
    ///
    /// Creates the album directory on first use and never overwrites an
    /// existing file.
    pub fn save(&self, encoded: &EncodedImage, target: &OutputTarget) -> CaptureResult<()> {
        let save_failed = |e: std::io::Error| {
            CaptureError::Capture(format!(
                "Failed to save {}: {}",
                target.path.display(),
                e
            ))
        };

        if let Some(parent) = target.path.parent() {
            std::fs::create_dir_all(parent).map_err(save_failed)?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target.path)
            .map_err(save_failed)?;
        file.write_all(&encoded.data).map_err(save_failed)?;
        file.sync_all().map_err(save_failed)?;

        info!(
            path = %target.path.display(),
            mime = target.mime_type,
            width = encoded.width,
            height = encoded.height,
            "Photo saved successfully"
        );
        Ok(())
    }
}

/// Drop alpha and row padding
fn rgba_to_rgb(frame: &PreviewFrame) -> CaptureResult<RgbImage> {
    let expected = frame.width as usize * frame.height as usize * 4;
    let rgba = frame.packed_rgba();
    if frame.width == 0 || frame.height == 0 || rgba.len() < expected {
        return Err(CaptureError::Capture(format!(
            "Incomplete frame: {}x{} with {} bytes",
            frame.width,
            frame.height,
            rgba.len()
        )));
    }

    let rgb: Vec<u8> = rgba[..expected]
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    RgbImage::from_raw(frame.width, frame.height, rgb)
        .ok_or_else(|| CaptureError::Capture("Frame buffer size mismatch".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    fn solid_frame(width: u32, height: u32) -> PreviewFrame {
        PreviewFrame {
            width,
            height,
            stride: width * 4,
            data: Arc::from(vec![200u8; (width * height * 4) as usize]),
            captured_at: Instant::now(),
        }
    }

    #[test]
    fn test_encode_produces_jpeg() {
        let encoded = PhotoEncoder::new(PhotoQuality::Medium)
            .encode(&solid_frame(16, 8))
            .unwrap();
        // JPEG SOI marker
        assert_eq!(&encoded.data[..2], &[0xFF, 0xD8]);
        assert_eq!((encoded.width, encoded.height), (16, 8));
    }

    #[test]
    fn test_encode_rejects_truncated_frame() {
        let mut frame = solid_frame(16, 8);
        frame.data = Arc::from(vec![0u8; 10]);
        let err = PhotoEncoder::default().encode(&frame).unwrap_err();
        assert!(matches!(err, CaptureError::Capture(_)));
    }

    #[test]
    fn test_encode_rejects_zero_stride() {
        let mut frame = solid_frame(16, 8);
        frame.stride = 0;
        let err = PhotoEncoder::default().encode(&frame).unwrap_err();
        assert!(matches!(err, CaptureError::Capture(_)));
    }

    #[test]
    fn test_save_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let target = OutputTarget {
            display_name: "2024-01-01-00-00-00-000".to_string(),
            mime_type: "image/jpeg",
            relative_path: "Pictures/CameraApp".to_string(),
            path: dir.path().join("album").join("2024-01-01-00-00-00-000.jpg"),
        };
        let encoder = PhotoEncoder::default();
        let encoded = encoder.encode(&solid_frame(4, 4)).unwrap();

        encoder.save(&encoded, &target).unwrap();
        assert!(target.path.exists());
        assert!(encoder.save(&encoded, &target).is_err());
    }
}
