//! Safe wrapper for the `DRM_IOCTL_MODE_GETPLANE` ioctl.
use nix::errno::Errno;
use std::os::unix::io::AsRawFd;
use thiserror::Error;

use crate::bindings::drm_mode_get_plane;

/// Current state of a hardware plane, as reported by `get_plane`.
///
/// This only retains the bindings of the plane: which CRTC it feeds and
/// which framebuffer it scans out. The supported-format list the kernel can
/// also report is not requested.
#[derive(Debug, Clone, Copy)]
pub struct PlaneState {
    pub plane_id: u32,
    pub crtc_id: u32,
    pub fb_id: u32,
}

impl PlaneState {
    /// A plane is scanning out iff it is bound to both a framebuffer and a
    /// CRTC. Idle planes report zero for both ids.
    pub fn is_active(&self) -> bool {
        self.crtc_id != 0 && self.fb_id != 0
    }
}

impl From<drm_mode_get_plane> for PlaneState {
    fn from(plane: drm_mode_get_plane) -> Self {
        PlaneState {
            plane_id: plane.plane_id,
            crtc_id: plane.crtc_id,
            fb_id: plane.fb_id,
        }
    }
}

#[doc(hidden)]
mod ioctl {
    use crate::bindings::drm_mode_get_plane;
    nix::ioctl_readwrite!(drm_ioctl_mode_getplane, b'd', 0xb6, drm_mode_get_plane);
}

#[derive(Debug, Error)]
pub enum GetPlaneError {
    #[error("no plane with id {0}")]
    NoSuchPlane(u32),
    #[error("ioctl error: {0}")]
    IoctlError(Errno),
}

impl From<GetPlaneError> for Errno {
    fn from(err: GetPlaneError) -> Self {
        match err {
            GetPlaneError::NoSuchPlane(_) => Errno::ENOENT,
            GetPlaneError::IoctlError(e) => e,
        }
    }
}

/// Safe wrapper around the `DRM_IOCTL_MODE_GETPLANE` ioctl.
pub fn get_plane<O: From<drm_mode_get_plane>>(
    fd: &impl AsRawFd,
    plane_id: u32,
) -> Result<O, GetPlaneError> {
    let mut plane = drm_mode_get_plane {
        plane_id,
        ..Default::default()
    };

    match unsafe { ioctl::drm_ioctl_mode_getplane(fd.as_raw_fd(), &mut plane) } {
        Ok(_) => Ok(O::from(plane)),
        Err(Errno::ENOENT) => Err(GetPlaneError::NoSuchPlane(plane_id)),
        Err(e) => Err(GetPlaneError::IoctlError(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::PlaneState;

    #[test]
    fn active_requires_both_bindings() {
        let bound = PlaneState {
            plane_id: 31,
            crtc_id: 41,
            fb_id: 77,
        };
        assert!(bound.is_active());

        assert!(!PlaneState { fb_id: 0, ..bound }.is_active());
        assert!(!PlaneState { crtc_id: 0, ..bound }.is_active());
        assert!(!PlaneState {
            crtc_id: 0,
            fb_id: 0,
            ..bound
        }
        .is_active());
    }
}
