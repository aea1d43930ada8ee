//! Safe wrapper for the `DRM_IOCTL_SET_CLIENT_CAP` ioctl.
use nix::errno::Errno;
use std::fmt;
use std::os::unix::io::AsRawFd;
use thiserror::Error;

use crate::bindings;
use crate::bindings::drm_set_client_cap;

/// Per-client capabilities that can be enabled with `set_client_cap`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum ClientCapability {
    Stereo3d = bindings::DRM_CLIENT_CAP_STEREO_3D,
    /// Expose cursor and overlay planes alongside the primary ones. Without
    /// this, plane enumeration only returns a subset of the hardware planes.
    UniversalPlanes = bindings::DRM_CLIENT_CAP_UNIVERSAL_PLANES,
    Atomic = bindings::DRM_CLIENT_CAP_ATOMIC,
    AspectRatio = bindings::DRM_CLIENT_CAP_ASPECT_RATIO,
    WritebackConnectors = bindings::DRM_CLIENT_CAP_WRITEBACK_CONNECTORS,
    CursorPlaneHotspot = bindings::DRM_CLIENT_CAP_CURSOR_PLANE_HOTSPOT,
}

impl fmt::Display for ClientCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[doc(hidden)]
mod ioctl {
    use crate::bindings::drm_set_client_cap;
    nix::ioctl_write_ptr!(drm_ioctl_set_client_cap, b'd', 0x0d, drm_set_client_cap);
}

#[derive(Debug, Error)]
pub enum SetClientCapError {
    #[error("capability not supported by this device")]
    Unsupported,
    #[error("ioctl error: {0}")]
    IoctlError(Errno),
}

impl From<SetClientCapError> for Errno {
    fn from(err: SetClientCapError) -> Self {
        match err {
            SetClientCapError::Unsupported => Errno::EOPNOTSUPP,
            SetClientCapError::IoctlError(e) => e,
        }
    }
}

/// Safe wrapper around the `DRM_IOCTL_SET_CLIENT_CAP` ioctl.
pub fn set_client_cap(
    fd: &impl AsRawFd,
    capability: ClientCapability,
    value: u64,
) -> Result<(), SetClientCapError> {
    let cap = drm_set_client_cap {
        capability: capability as u64,
        value,
    };

    match unsafe { ioctl::drm_ioctl_set_client_cap(fd.as_raw_fd(), &cap) } {
        Ok(_) => Ok(()),
        Err(Errno::EINVAL) | Err(Errno::EOPNOTSUPP) => Err(SetClientCapError::Unsupported),
        Err(e) => Err(SetClientCapError::IoctlError(e)),
    }
}
