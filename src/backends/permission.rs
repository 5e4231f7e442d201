// SPDX-License-Identifier: GPL-3.0-only

//! Camera permission via the XDG desktop portal
//!
//! Sandboxed builds (Flatpak, Snap) must ask `org.freedesktop.portal.Camera`
//! before the camera can be opened. Native sessions access the device nodes
//! directly, so the portal is consulted when reachable and otherwise skipped.

use crate::errors::PermissionError;
use futures::StreamExt;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

const PORTAL_DESTINATION: &str = "org.freedesktop.portal.Desktop";
const PORTAL_PATH: &str = "/org/freedesktop/portal/desktop";
const CAMERA_INTERFACE: &str = "org.freedesktop.portal.Camera";
const REQUEST_INTERFACE: &str = "org.freedesktop.portal.Request";

/// Permissions the application asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Open the camera
    Camera,
    /// Write into the shared pictures folder
    Storage,
}

impl Permission {
    /// Everything needed to take and save a photo
    pub const REQUIRED: [Permission; 2] = [Permission::Camera, Permission::Storage];
}

/// Known status of the camera permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionStatus {
    /// Never asked in this session
    #[default]
    NotDetermined,
    Granted,
    /// Asked and refused; the prompt shows the rationale
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// Outcome of one permission request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PermissionGrant {
    pub granted: Vec<Permission>,
    pub denied: Vec<Permission>,
}

impl PermissionGrant {
    pub fn is_granted(&self, permission: Permission) -> bool {
        self.granted.contains(&permission)
    }

    pub fn all_granted(&self) -> bool {
        self.denied.is_empty()
    }

    /// The only signal the session reacts to
    pub fn camera_status(&self) -> PermissionStatus {
        if self.is_granted(Permission::Camera) {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }

    fn record(&mut self, permission: Permission, granted: bool) {
        if granted {
            self.granted.push(permission);
        } else {
            self.denied.push(permission);
        }
    }
}

/// Decides whether the camera may be used
pub trait PermissionAuthority: Send + Sync {
    /// Status known without prompting the user
    fn status(&self) -> BoxFuture<'static, PermissionStatus>;

    /// Ask for `permissions`, possibly prompting the user
    fn request(&self, permissions: Vec<Permission>) -> BoxFuture<'static, PermissionGrant>;
}

/// Permission authority backed by the desktop portal
#[derive(Debug, Clone, Copy)]
pub struct PortalPermissionAuthority {
    sandboxed: bool,
}

impl PortalPermissionAuthority {
    pub fn new() -> Self {
        let sandboxed = is_sandboxed();
        info!(sandboxed, "Permission authority ready");
        Self { sandboxed }
    }
}

impl Default for PortalPermissionAuthority {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionAuthority for PortalPermissionAuthority {
    fn status(&self) -> BoxFuture<'static, PermissionStatus> {
        let sandboxed = self.sandboxed;
        Box::pin(async move {
            if sandboxed {
                PermissionStatus::NotDetermined
            } else {
                PermissionStatus::Granted
            }
        })
    }

    fn request(&self, permissions: Vec<Permission>) -> BoxFuture<'static, PermissionGrant> {
        let sandboxed = self.sandboxed;
        Box::pin(async move {
            let mut grant = PermissionGrant::default();
            for permission in permissions {
                let granted = match permission {
                    // Pictures access is a static sandbox permission
                    Permission::Storage => true,
                    Permission::Camera => match access_camera().await {
                        Ok(()) => true,
                        Err(PermissionError::Denied) => {
                            info!("Camera access denied by user");
                            false
                        }
                        Err(e) if !sandboxed => {
                            warn!(error = %e, "Camera portal unavailable, using direct device access");
                            true
                        }
                        Err(e) => {
                            warn!(error = %e, "Camera portal request failed");
                            false
                        }
                    },
                };
                debug!(?permission, granted, "Permission resolved");
                grant.record(permission, granted);
            }
            grant
        })
    }
}

/// Call `AccessCamera` and wait for the user's answer
async fn access_camera() -> Result<(), PermissionError> {
    let connection = zbus::Connection::session().await?;
    let camera = zbus::Proxy::new(
        &connection,
        PORTAL_DESTINATION,
        PORTAL_PATH,
        CAMERA_INTERFACE,
    )
    .await?;

    match camera.get_property::<bool>("IsCameraPresent").await {
        Ok(present) => info!(present, "Camera portal reachable"),
        Err(e) => debug!(error = %e, "Could not read IsCameraPresent"),
    }

    let token = format!("viewfinder_{}", uuid::Uuid::new_v4().simple());
    let unique_name = connection
        .unique_name()
        .ok_or_else(|| PermissionError::Portal("No unique bus name".to_string()))?
        .to_string();

    // Subscribe before calling so a fast answer is not missed
    let request = zbus::Proxy::new(
        &connection,
        PORTAL_DESTINATION,
        request_path(&unique_name, &token),
        REQUEST_INTERFACE,
    )
    .await?;
    let mut responses = request.receive_signal("Response").await?;

    let mut options: HashMap<&str, Value> = HashMap::new();
    options.insert("handle_token", Value::from(token.as_str()));
    let handle: OwnedObjectPath = camera.call("AccessCamera", &(options,)).await?;
    debug!(handle = %handle.as_str(), "Camera access requested");

    let message = responses
        .next()
        .await
        .ok_or_else(|| PermissionError::Portal("Request closed without response".to_string()))?;
    let (response, _results): (u32, HashMap<String, OwnedValue>) = message.body().deserialize()?;

    info!(response, "Camera portal answered");
    response_result(response)
}

/// Map a portal `Response` code: 0 granted, 1 cancelled by the user, 2 other
fn response_result(response: u32) -> Result<(), PermissionError> {
    match response {
        0 => Ok(()),
        1 => Err(PermissionError::Denied),
        other => Err(PermissionError::Portal(format!(
            "Request ended with response {}",
            other
        ))),
    }
}

/// Object path the portal uses for a request with `token`
fn request_path(unique_name: &str, token: &str) -> String {
    let sender = unique_name.trim_start_matches(':').replace('.', "_");
    format!("{}/request/{}/{}", PORTAL_PATH, sender, token)
}

fn is_sandboxed() -> bool {
    Path::new("/.flatpak-info").exists()
        || std::env::var_os("FLATPAK_ID").is_some()
        || std::env::var_os("SNAP").is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_path_from_unique_name() {
        assert_eq!(
            request_path(":1.42", "viewfinder_abc"),
            "/org/freedesktop/portal/desktop/request/1_42/viewfinder_abc"
        );
    }

    #[test]
    fn test_response_codes() {
        assert_eq!(response_result(0), Ok(()));
        assert_eq!(response_result(1), Err(PermissionError::Denied));
        assert!(matches!(response_result(2), Err(PermissionError::Portal(_))));
    }

    #[test]
    fn test_grant_camera_status() {
        let mut grant = PermissionGrant::default();
        grant.record(Permission::Camera, true);
        grant.record(Permission::Storage, false);

        assert!(!grant.all_granted());
        assert!(grant.is_granted(Permission::Camera));
        assert_eq!(grant.camera_status(), PermissionStatus::Granted);

        let denied = PermissionGrant {
            granted: vec![Permission::Storage],
            denied: vec![Permission::Camera],
        };
        assert_eq!(denied.camera_status(), PermissionStatus::Denied);
    }

    #[test]
    fn test_status_default_is_not_determined() {
        assert_eq!(PermissionStatus::default(), PermissionStatus::NotDetermined);
        assert!(!PermissionStatus::Denied.is_granted());
    }
}
