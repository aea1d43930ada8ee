//! Safe wrapper for the `DRM_IOCTL_MODE_GETPLANERESOURCES` ioctl.
use nix::errno::Errno;
use std::os::unix::io::AsRawFd;
use thiserror::Error;

use crate::bindings::drm_mode_get_plane_res;

#[doc(hidden)]
mod ioctl {
    use crate::bindings::drm_mode_get_plane_res;
    nix::ioctl_readwrite!(drm_ioctl_mode_getplaneresources, b'd', 0xb5, drm_mode_get_plane_res);
}

#[derive(Debug, Error)]
pub enum GetPlaneResourcesError {
    #[error("ioctl error: {0}")]
    IoctlError(#[from] Errno),
}

impl From<GetPlaneResourcesError> for Errno {
    fn from(err: GetPlaneResourcesError) -> Self {
        match err {
            GetPlaneResourcesError::IoctlError(e) => e,
        }
    }
}

/// Safe wrapper around the `DRM_IOCTL_MODE_GETPLANERESOURCES` ioctl.
///
/// Returns the ids of all planes exposed by the device. This ioctl follows
/// the usual DRM array protocol: a first call with a null pointer reports
/// the number of entries, a second call fills the array. The count reported
/// by the second call is authoritative in case the set changed in between.
pub fn get_plane_resources(fd: &impl AsRawFd) -> Result<Vec<u32>, GetPlaneResourcesError> {
    let mut plane_res = drm_mode_get_plane_res::default();

    unsafe { ioctl::drm_ioctl_mode_getplaneresources(fd.as_raw_fd(), &mut plane_res) }?;

    let mut plane_ids = vec![0u32; plane_res.count_planes as usize];
    if !plane_ids.is_empty() {
        plane_res.plane_id_ptr = plane_ids.as_mut_ptr() as u64;
        unsafe { ioctl::drm_ioctl_mode_getplaneresources(fd.as_raw_fd(), &mut plane_res) }?;
        plane_ids.truncate(plane_res.count_planes as usize);
    }

    Ok(plane_ids)
}
