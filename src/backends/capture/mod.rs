// SPDX-License-Identifier: MPL-2.0

//! Capture service abstraction
//!
//! The session controller never talks to GStreamer directly. It configures and
//! calls a [`CaptureService`], which owns everything the platform does:
//! device selection, sensor binding, preview streaming, still encoding and
//! writing the file.
//!
//! ```text
//! ┌─────────────────────┐
//! │  SessionController  │  ← state machine, one outcome per request
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ CaptureService Trait│  ← bind / capture_still / unbind_all
//! └──────────┬──────────┘
//!            │
//!            ▼
//!     ┌─────────────┐
//!     │  GStreamer  │  ← pipewiresrc / v4l2src → appsink
//!     └─────────────┘
//! ```

pub mod gstreamer;
pub mod pipeline;

pub use gstreamer::GstCaptureService;

use crate::errors::CaptureResult;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Sender half of the preview channel
pub type FrameSender = futures::channel::mpsc::Sender<PreviewFrame>;

/// Receiver half of the preview channel
pub type FrameReceiver = futures::channel::mpsc::Receiver<PreviewFrame>;

/// Platform capture subsystem
///
/// Calls are blocking; the controller runs them on a blocking worker and turns
/// the result into exactly one outcome message per request.
pub trait CaptureService: Send + Sync {
    /// Acquire the camera and start streaming preview frames into `surface`
    /// for as long as `scope` is active.
    fn bind(&self, surface: &SurfaceTarget, scope: &LifecycleScope) -> CaptureResult<()>;

    /// Capture one still and write it to `target`
    ///
    /// Returns the handle of the saved resource.
    fn capture_still(&self, target: &OutputTarget) -> CaptureResult<ResourceHandle>;

    /// Release every binding. Calling it with nothing bound is not an error.
    fn unbind_all(&self) -> CaptureResult<()>;

    /// Check whether a pipeline is currently bound
    fn is_bound(&self) -> bool;
}

/// Opaque reference to a saved photo
///
/// On the desktop this is the absolute file path of the JPEG; other services
/// may hand out any identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceHandle(String);

impl ResourceHandle {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    pub fn from_path(path: &Path) -> Self {
        Self(path.to_string_lossy().into_owned())
    }

    /// File path of the resource, if the handle refers to an absolute path
    pub fn path(&self) -> Option<PathBuf> {
        let path = Path::new(&self.0);
        path.is_absolute().then(|| path.to_path_buf())
    }

    /// URI form suitable for handing to other applications
    pub fn uri(&self) -> String {
        match self.path() {
            Some(path) => format!("file://{}", path.display()),
            None => self.0.clone(),
        }
    }
}

impl std::fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One RGBA8 preview frame
#[derive(Clone)]
pub struct PreviewFrame {
    pub width: u32,
    pub height: u32,
    /// Bytes per row, may be larger than `width * 4`
    pub stride: u32,
    pub data: Arc<[u8]>,
    pub captured_at: Instant,
}

impl PreviewFrame {
    /// Pixel data with row padding removed
    ///
    /// A stride shorter than one row is malformed and yields no pixels.
    pub fn packed_rgba(&self) -> Vec<u8> {
        let row_bytes = self.width as usize * 4;
        let stride = self.stride as usize;

        if stride == row_bytes {
            return self.data.to_vec();
        }
        if stride < row_bytes {
            return Vec::new();
        }

        let mut packed = Vec::with_capacity(row_bytes * self.height as usize);
        for row in self.data.chunks(stride).take(self.height as usize) {
            packed.extend_from_slice(&row[..row_bytes.min(row.len())]);
        }
        packed
    }
}

impl std::fmt::Debug for PreviewFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Rendering destination for the live preview
///
/// Owned by the presentation layer. Each surface carries a generation number
/// so the window can tell a fresh surface from a stale one after a reset.
#[derive(Clone)]
pub struct SurfaceTarget {
    generation: u64,
    sender: FrameSender,
}

impl SurfaceTarget {
    pub fn new(generation: u64, sender: FrameSender) -> Self {
        Self { generation, sender }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Hand a frame to the surface without blocking
    ///
    /// Returns false when the frame was dropped (surface busy or gone).
    pub fn present(&self, frame: PreviewFrame) -> bool {
        self.sender.clone().try_send(frame).is_ok()
    }

    /// True once the presentation layer dropped the receiving end
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl std::fmt::Debug for SurfaceTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceTarget")
            .field("generation", &self.generation)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Lifetime token of whoever owns the binding
///
/// Clones share the same flag. Once [`end`](Self::end) is called the bound
/// pipeline stops delivering frames.
#[derive(Debug, Clone)]
pub struct LifecycleScope {
    active: Arc<AtomicBool>,
}

impl LifecycleScope {
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn end(&self) {
        self.active.store(false, Ordering::Release);
    }
}

impl Default for LifecycleScope {
    fn default() -> Self {
        Self::new()
    }
}

/// Where a still is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    /// File stem, `yyyy-MM-dd-HH-mm-ss-SSS`
    pub display_name: String,
    pub mime_type: &'static str,
    /// Album path relative to the user's home, e.g. `Pictures/CameraApp`
    pub relative_path: String,
    /// Absolute file path
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_handle_uri() {
        let handle = ResourceHandle::new("/home/user/Pictures/CameraApp/a.jpg");
        assert_eq!(
            handle.uri(),
            "file:///home/user/Pictures/CameraApp/a.jpg"
        );

        let opaque = ResourceHandle::new("IMG_001");
        assert_eq!(opaque.path(), None);
        assert_eq!(opaque.uri(), "IMG_001");
    }

    #[test]
    fn test_packed_rgba_strips_padding() {
        // 2x2 frame with 4 bytes of padding per row
        let mut data = Vec::new();
        for row in 0..2u8 {
            data.extend_from_slice(&[row; 8]);
            data.extend_from_slice(&[0xFF; 4]);
        }
        let frame = PreviewFrame {
            width: 2,
            height: 2,
            stride: 12,
            data: Arc::from(data),
            captured_at: Instant::now(),
        };

        let packed = frame.packed_rgba();
        assert_eq!(packed.len(), 16);
        assert!(packed.iter().all(|&b| b != 0xFF));
    }

    #[test]
    fn test_packed_rgba_rejects_short_stride() {
        for stride in [0, 4] {
            let frame = PreviewFrame {
                width: 2,
                height: 2,
                stride,
                data: Arc::from(vec![7u8; 16]),
                captured_at: Instant::now(),
            };
            assert!(frame.packed_rgba().is_empty(), "stride {}", stride);
        }
    }

    #[test]
    fn test_surface_present_after_close() {
        let (sender, receiver) = futures::channel::mpsc::channel(1);
        let surface = SurfaceTarget::new(3, sender);
        assert_eq!(surface.generation(), 3);
        assert!(!surface.is_closed());

        drop(receiver);
        assert!(surface.is_closed());
        let frame = PreviewFrame {
            width: 1,
            height: 1,
            stride: 4,
            data: Arc::from(vec![0u8; 4]),
            captured_at: Instant::now(),
        };
        assert!(!surface.present(frame));
    }

    #[test]
    fn test_scope_end_is_shared() {
        let scope = LifecycleScope::new();
        let clone = scope.clone();
        assert!(clone.is_active());
        scope.end();
        assert!(!clone.is_active());
    }
}
