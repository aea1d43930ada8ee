//! Safe wrapper for the `DRM_IOCTL_GET_CAP` ioctl.
use nix::errno::Errno;
use std::os::unix::io::AsRawFd;
use thiserror::Error;

use crate::bindings;
use crate::bindings::drm_get_cap;

/// Device capabilities that can be queried with `get_cap`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum Capability {
    DumbBuffer = bindings::DRM_CAP_DUMB_BUFFER,
    VblankHighCrtc = bindings::DRM_CAP_VBLANK_HIGH_CRTC,
    DumbPreferredDepth = bindings::DRM_CAP_DUMB_PREFERRED_DEPTH,
    DumbPreferShadow = bindings::DRM_CAP_DUMB_PREFER_SHADOW,
    Prime = bindings::DRM_CAP_PRIME,
    TimestampMonotonic = bindings::DRM_CAP_TIMESTAMP_MONOTONIC,
    AsyncPageFlip = bindings::DRM_CAP_ASYNC_PAGE_FLIP,
    CursorWidth = bindings::DRM_CAP_CURSOR_WIDTH,
    CursorHeight = bindings::DRM_CAP_CURSOR_HEIGHT,
    AddFb2Modifiers = bindings::DRM_CAP_ADDFB2_MODIFIERS,
    PageFlipTarget = bindings::DRM_CAP_PAGE_FLIP_TARGET,
    CrtcInVblankEvent = bindings::DRM_CAP_CRTC_IN_VBLANK_EVENT,
    Syncobj = bindings::DRM_CAP_SYNCOBJ,
    SyncobjTimeline = bindings::DRM_CAP_SYNCOBJ_TIMELINE,
}

#[doc(hidden)]
mod ioctl {
    use crate::bindings::drm_get_cap;
    nix::ioctl_readwrite!(drm_ioctl_get_cap, b'd', 0x0c, drm_get_cap);
}

#[derive(Debug, Error)]
pub enum GetCapError {
    #[error("ioctl error: {0}")]
    IoctlError(#[from] Errno),
}

impl From<GetCapError> for Errno {
    fn from(err: GetCapError) -> Self {
        match err {
            GetCapError::IoctlError(e) => e,
        }
    }
}

/// Safe wrapper around the `DRM_IOCTL_GET_CAP` ioctl.
///
/// Returns the value the driver reports for `capability`. Boolean
/// capabilities report zero for "unsupported".
pub fn get_cap(fd: &impl AsRawFd, capability: Capability) -> Result<u64, GetCapError> {
    let mut cap = drm_get_cap {
        capability: capability as u64,
        ..Default::default()
    };

    unsafe { ioctl::drm_ioctl_get_cap(fd.as_raw_fd(), &mut cap) }?;

    Ok(cap.value)
}
