// SPDX-License-Identifier: GPL-3.0-only

//! GStreamer launch-string construction and startup
//!
//! Every source is normalised to packed RGBA in front of the appsink so the
//! preview and the still encoder see the same frames.

use crate::constants::{pipeline, timing};
use crate::errors::{CaptureError, CaptureResult};
use gstreamer::prelude::*;
use tracing::{debug, error, info, warn};

/// Camera source element selected for binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    PipeWire,
    V4l2,
}

impl SourceKind {
    pub fn element_name(&self) -> &'static str {
        match self {
            SourceKind::PipeWire => "pipewiresrc",
            SourceKind::V4l2 => "v4l2src",
        }
    }

    fn from_element_name(name: &str) -> Option<Self> {
        match name {
            "pipewiresrc" => Some(SourceKind::PipeWire),
            "v4l2src" => Some(SourceKind::V4l2),
            _ => None,
        }
    }
}

/// Pick the first source element whose factory is installed
pub fn detect_source() -> CaptureResult<SourceKind> {
    pipeline::SOURCES
        .iter()
        .find(|name| gstreamer::ElementFactory::find(name).is_some())
        .and_then(|name| SourceKind::from_element_name(name))
        .ok_or(CaptureError::NoCameraFound)
}

/// Source properties selecting a specific camera
///
/// Accepts PipeWire node ids (`pipewire-42`), object serials
/// (`pipewire-serial-42`), PipeWire object paths (`v4l2:/dev/video0`) and raw
/// V4L2 device nodes.
pub fn source_properties(source: SourceKind, camera_path: Option<&str>) -> String {
    let Some(path) = camera_path.map(str::trim).filter(|p| !p.is_empty()) else {
        debug!(source = source.element_name(), "Using default camera");
        return String::new();
    };

    match source {
        SourceKind::PipeWire => {
            if let Some(serial) = path.strip_prefix("pipewire-serial-") {
                format!("target-object={} ", serial)
            } else if let Some(node_id) = path.strip_prefix("pipewire-") {
                format!("target-object={} ", node_id)
            } else if path.starts_with("v4l2:") {
                format!("path={} ", path)
            } else if path.starts_with("/dev/video") {
                format!("path=v4l2:{} ", path)
            } else {
                warn!(path, "Unrecognised camera path, using default camera");
                String::new()
            }
        }
        SourceKind::V4l2 => {
            if let Some(device) = path.strip_prefix("v4l2:") {
                format!("device={} ", device)
            } else if path.starts_with("/dev/video") {
                format!("device={} ", path)
            } else {
                warn!(path, "Camera path is not a V4L2 device, using default camera");
                String::new()
            }
        }
    }
}

/// Build the complete launch string
pub fn build_launch_string(source: SourceKind, camera_path: Option<&str>) -> String {
    format!(
        "{} {}do-timestamp=true ! \
         queue max-size-buffers=2 leaky=downstream ! \
         decodebin ! videoconvert ! video/x-raw,format=RGBA ! \
         appsink name={} max-buffers={} drop=true sync=false",
        source.element_name(),
        source_properties(source, camera_path),
        pipeline::SINK_NAME,
        pipeline::MAX_BUFFERS
    )
}

/// Parse a launch string into a pipeline (still in NULL state)
pub fn parse(launch_string: &str) -> CaptureResult<gstreamer::Pipeline> {
    info!(pipeline = %launch_string, "Parsing capture pipeline");

    gstreamer::parse::launch(launch_string)
        .map_err(|e| CaptureError::Bind(format!("Invalid pipeline: {}", e)))?
        .dynamic_cast::<gstreamer::Pipeline>()
        .map_err(|_| CaptureError::Bind("Launch string is not a pipeline".to_string()))
}

/// Bring the pipeline to PLAYING
///
/// An asynchronous transition towards PLAYING is accepted; frames arrive
/// once the device is ready. Anything else is a bind error carrying the bus
/// error text when there is one. On error the pipeline is already back in
/// NULL.
pub fn start(pipeline: &gstreamer::Pipeline) -> CaptureResult<()> {
    if let Err(e) = pipeline.set_state(gstreamer::State::Playing) {
        error!(error = %e, "Failed to set pipeline to PLAYING state");
        let reason = bus_error(pipeline).unwrap_or_else(|| e.to_string());
        shutdown(pipeline);
        return Err(CaptureError::Bind(reason));
    }

    let (result, state, pending) = pipeline.state(gstreamer::ClockTime::from_seconds(
        timing::START_TIMEOUT_SECS,
    ));
    debug!(?result, ?state, ?pending, "Pipeline state query completed");

    let started = (result.is_ok() && state == gstreamer::State::Playing)
        || (matches!(result, Ok(gstreamer::StateChangeSuccess::Async))
            && pending == gstreamer::State::Playing);

    if started {
        info!(?state, "Capture pipeline running");
        Ok(())
    } else {
        error!(?state, ?result, ?pending, "Pipeline failed to reach PLAYING");
        let reason = bus_error(pipeline)
            .unwrap_or_else(|| format!("Pipeline failed to start (state: {:?})", state));
        shutdown(pipeline);
        Err(CaptureError::Bind(reason))
    }
}

/// Bring a pipeline to NULL and wait for the device to be released
pub fn shutdown(pipeline: &gstreamer::Pipeline) {
    if let Err(e) = pipeline.set_state(gstreamer::State::Null) {
        warn!(error = %e, "Failed to set pipeline to NULL");
        return;
    }
    let (result, state, _) = pipeline.state(gstreamer::ClockTime::from_seconds(
        timing::STOP_TIMEOUT_SECS,
    ));
    debug!(?result, ?state, "Pipeline stopped");
}

/// First error message waiting on the pipeline bus
fn bus_error(pipeline: &gstreamer::Pipeline) -> Option<String> {
    let bus = pipeline.bus()?;
    let msg = bus.timed_pop_filtered(
        gstreamer::ClockTime::from_mseconds(100),
        &[gstreamer::MessageType::Error],
    )?;

    match msg.view() {
        gstreamer::MessageView::Error(err) => {
            error!(
                error = %err.error(),
                debug = ?err.debug(),
                source = ?err.src().map(|s| s.name()),
                "GStreamer error during pipeline start"
            );
            Some(err.error().to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipewire_source_properties() {
        assert_eq!(source_properties(SourceKind::PipeWire, None), "");
        assert_eq!(source_properties(SourceKind::PipeWire, Some("  ")), "");
        assert_eq!(
            source_properties(SourceKind::PipeWire, Some("pipewire-42")),
            "target-object=42 "
        );
        assert_eq!(
            source_properties(SourceKind::PipeWire, Some("pipewire-serial-7")),
            "target-object=7 "
        );
        assert_eq!(
            source_properties(SourceKind::PipeWire, Some("/dev/video2")),
            "path=v4l2:/dev/video2 "
        );
    }

    #[test]
    fn test_v4l2_source_properties() {
        assert_eq!(
            source_properties(SourceKind::V4l2, Some("v4l2:/dev/video0")),
            "device=/dev/video0 "
        );
        assert_eq!(source_properties(SourceKind::V4l2, Some("pipewire-42")), "");
    }

    #[test]
    fn test_launch_string_ends_in_rgba_appsink() {
        let launch = build_launch_string(SourceKind::V4l2, Some("/dev/video0"));
        assert!(launch.starts_with("v4l2src device=/dev/video0 "));
        assert!(launch.contains("video/x-raw,format=RGBA"));
        assert!(launch.contains(&format!("appsink name={}", pipeline::SINK_NAME)));
    }
}
