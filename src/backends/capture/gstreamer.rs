// SPDX-License-Identifier: MPL-2.0

//! GStreamer capture service
//!
//! Binds `pipewiresrc` (or `v4l2src`) to an RGBA appsink. Every decoded frame
//! is forwarded to the bound surface and kept as the latest frame; a still is
//! that latest frame encoded as JPEG.

use super::pipeline::{self, build_launch_string, detect_source};
use super::{CaptureService, LifecycleScope, OutputTarget, PreviewFrame, ResourceHandle, SurfaceTarget};
use crate::constants::{PhotoQuality, pipeline::SINK_NAME, timing};
use crate::errors::{CaptureError, CaptureResult};
use crate::pipelines::photo::PhotoEncoder;
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Latest decoded frame shared between the appsink thread and stills
type LatestFrame = Arc<Mutex<Option<PreviewFrame>>>;

/// Service settings, applied on the next bind or capture
#[derive(Debug, Clone, Default)]
struct ServiceSettings {
    camera_path: Option<String>,
    quality: PhotoQuality,
}

/// A running pipeline and the state its callback writes
struct BoundPipeline {
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
    latest: LatestFrame,
    surface_generation: u64,
}

/// Something the slot can shut down
trait Release: Send + 'static {
    /// Stop delivering frames, must not block
    fn detach(&self);
    /// Full shutdown, may block
    fn release(self);
}

impl Release for BoundPipeline {
    fn detach(&self) {
        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());
    }

    fn release(self) {
        info!(surface = self.surface_generation, "Stopping capture pipeline");
        self.detach();
        pipeline::shutdown(&self.pipeline);
    }
}

/// Holds the one bound pipeline
///
/// Pipelines taken out by [`Slot::retire`] are shut down on a helper thread;
/// [`Slot::settle`] waits for them before the device is opened again.
struct Slot<P: Release> {
    current: Mutex<Option<P>>,
    retiring: Mutex<Vec<JoinHandle<()>>>,
}

impl<P: Release> Slot<P> {
    fn new() -> Self {
        Self {
            current: Mutex::new(None),
            retiring: Mutex::new(Vec::new()),
        }
    }

    /// Make `new` the bound pipeline, releasing whatever it replaces
    fn install(&self, new: P) {
        let previous = lock(&self.current).replace(new);
        if let Some(previous) = previous {
            warn!("Another pipeline was bound meanwhile - releasing it");
            previous.release();
        }
    }

    /// Take the bound pipeline out and shut it down off this thread
    fn retire(&self) -> bool {
        let Some(bound) = lock(&self.current).take() else {
            return false;
        };
        bound.detach();

        let parked = Arc::new(Mutex::new(Some(bound)));
        let worker = Arc::clone(&parked);
        let spawned = std::thread::Builder::new()
            .name("viewfinder-unbind".to_string())
            .spawn(move || {
                if let Some(bound) = lock(&worker).take() {
                    bound.release();
                }
            });

        match spawned {
            Ok(handle) => lock(&self.retiring).push(handle),
            Err(e) => {
                warn!(error = %e, "Failed to spawn unbind thread, releasing inline");
                if let Some(bound) = lock(&parked).take() {
                    bound.release();
                }
            }
        }
        true
    }

    /// Wait until every retired pipeline is shut down
    fn settle(&self) {
        let pending = std::mem::take(&mut *lock(&self.retiring));
        for handle in pending {
            if handle.join().is_err() {
                error!("Unbind thread panicked");
            }
        }
    }

    fn with<R>(&self, f: impl FnOnce(Option<&P>) -> R) -> R {
        f(lock(&self.current).as_ref())
    }

    fn is_occupied(&self) -> bool {
        lock(&self.current).is_some()
    }

    /// Release everything on this thread
    fn release_all(&self) {
        let bound = lock(&self.current).take();
        if let Some(bound) = bound {
            bound.release();
        }
        self.settle();
    }
}

/// Capture service backed by a GStreamer pipeline
pub struct GstCaptureService {
    settings: Mutex<ServiceSettings>,
    bound: Slot<BoundPipeline>,
}

impl GstCaptureService {
    pub fn new(camera_path: Option<String>, quality: PhotoQuality) -> Self {
        Self {
            settings: Mutex::new(ServiceSettings {
                camera_path,
                quality,
            }),
            bound: Slot::new(),
        }
    }

    /// Update camera selection and still quality
    pub fn configure(&self, camera_path: Option<String>, quality: PhotoQuality) {
        debug!(?camera_path, ?quality, "Updating capture settings");
        let mut settings = lock(&self.settings);
        settings.camera_path = camera_path;
        settings.quality = quality;
    }

    fn install_callbacks(
        appsink: &AppSink,
        surface: &SurfaceTarget,
        scope: &LifecycleScope,
        latest: &LatestFrame,
    ) {
        let surface = surface.clone();
        let scope = scope.clone();
        let latest = Arc::clone(latest);
        let frame_counter = AtomicU64::new(0);

        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    if !scope.is_active() {
                        debug!("Lifecycle scope ended, stopping frame delivery");
                        return Err(gstreamer::FlowError::Flushing);
                    }

                    let frame_num = frame_counter.fetch_add(1, Ordering::Relaxed);
                    let sample = appsink
                        .pull_sample()
                        .map_err(|_| gstreamer::FlowError::Eos)?;
                    let buffer = sample.buffer().ok_or(gstreamer::FlowError::Error)?;
                    let caps = sample.caps().ok_or(gstreamer::FlowError::Error)?;
                    let video_info = VideoInfo::from_caps(caps).map_err(|e| {
                        error!(frame = frame_num, error = ?e, "Failed to get video info");
                        gstreamer::FlowError::Error
                    })?;
                    let map = buffer.map_readable().map_err(|e| {
                        error!(frame = frame_num, error = ?e, "Failed to map buffer");
                        gstreamer::FlowError::Error
                    })?;

                    let frame = PreviewFrame {
                        width: video_info.width(),
                        height: video_info.height(),
                        stride: video_info.stride()[0] as u32,
                        data: Arc::from(map.as_slice()),
                        captured_at: Instant::now(),
                    };

                    *lock(&latest) = Some(frame.clone());

                    let delivered = surface.present(frame);
                    if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                        debug!(
                            frame = frame_num,
                            width = video_info.width(),
                            height = video_info.height(),
                            delivered,
                            "Preview frame"
                        );
                    }

                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );
    }
}

impl CaptureService for GstCaptureService {
    fn bind(&self, surface: &SurfaceTarget, scope: &LifecycleScope) -> CaptureResult<()> {
        gstreamer::init().map_err(|e| CaptureError::Bind(e.to_string()))?;

        let camera_path = lock(&self.settings).camera_path.clone();
        let source = detect_source()?;
        info!(
            source = source.element_name(),
            ?camera_path,
            surface = surface.generation(),
            "Binding camera"
        );

        // Unbind whatever is left before touching the device again
        self.unbind_all()?;
        self.bound.settle();

        let pipeline = pipeline::parse(&build_launch_string(source, camera_path.as_deref()))?;
        let appsink = pipeline
            .by_name(SINK_NAME)
            .ok_or_else(|| CaptureError::Bind("Failed to get appsink".to_string()))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| CaptureError::Bind("Failed to cast appsink".to_string()))?;

        let latest: LatestFrame = Arc::new(Mutex::new(None));
        Self::install_callbacks(&appsink, surface, scope, &latest);

        if let Err(e) = pipeline::start(&pipeline) {
            appsink.set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());
            return Err(e);
        }

        self.bound.install(BoundPipeline {
            pipeline,
            appsink,
            latest,
            surface_generation: surface.generation(),
        });

        info!("Camera bound");
        Ok(())
    }

    fn capture_still(&self, target: &OutputTarget) -> CaptureResult<ResourceHandle> {
        let frame = self
            .bound
            .with(|bound| bound.map(|b| lock(&b.latest).clone()))
            .ok_or(CaptureError::NotBound)?
            .ok_or_else(|| CaptureError::Capture("No frame received from camera yet".to_string()))?;

        debug!(
            width = frame.width,
            height = frame.height,
            age_ms = frame.captured_at.elapsed().as_millis() as u64,
            "Frame selected for still"
        );

        let encoder = PhotoEncoder::new(lock(&self.settings).quality);
        let encoded = encoder.encode(&frame)?;
        encoder.save(&encoded, target)?;

        Ok(ResourceHandle::from_path(&target.path))
    }

    fn unbind_all(&self) -> CaptureResult<()> {
        if !self.bound.retire() {
            debug!("Nothing bound");
        }
        Ok(())
    }

    fn is_bound(&self) -> bool {
        self.bound.is_occupied()
    }
}

impl Drop for GstCaptureService {
    fn drop(&mut self) {
        if self.bound.is_occupied() {
            warn!("Capture service dropped while bound - releasing camera");
        }
        self.bound.release_all();
    }
}

/// Lock a mutex, recovering the data if a frame callback panicked
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
