//! Safe wrapper for the `DRM_IOCTL_PRIME_HANDLE_TO_FD` ioctl.
//!
//! PRIME export turns a driver-local buffer object handle into a dma-buf
//! file descriptor that can be mapped or passed to other devices. The
//! returned descriptor owns a reference to the buffer and keeps it alive
//! until closed.
use bitflags::bitflags;
use nix::errno::Errno;
use std::os::unix::io::{AsRawFd, FromRawFd};
use thiserror::Error;

use crate::bindings;
use crate::bindings::drm_prime_handle;

bitflags! {
    /// Flags that can be passed when exporting a buffer handle.
    #[derive(Clone, Copy, Debug)]
    pub struct PrimeFlags: u32 {
        const CLOEXEC = bindings::DRM_CLOEXEC;
        const RDWR = bindings::DRM_RDWR;
    }
}

#[doc(hidden)]
mod ioctl {
    use crate::bindings::drm_prime_handle;
    nix::ioctl_readwrite!(drm_ioctl_prime_handle_to_fd, b'd', 0x2d, drm_prime_handle);
}

#[derive(Debug, Error)]
pub enum PrimeExportError {
    #[error("ioctl error: {0}")]
    IoctlError(#[from] Errno),
}

impl From<PrimeExportError> for Errno {
    fn from(err: PrimeExportError) -> Self {
        match err {
            PrimeExportError::IoctlError(e) => e,
        }
    }
}

/// Safe wrapper around the `DRM_IOCTL_PRIME_HANDLE_TO_FD` ioctl.
///
/// Without `PrimeFlags::RDWR` the exported descriptor is read-only.
pub fn prime_handle_to_fd<F: AsRawFd, R: FromRawFd>(
    fd: &F,
    handle: u32,
    flags: PrimeFlags,
) -> Result<R, PrimeExportError> {
    let mut prime = drm_prime_handle {
        handle,
        flags: flags.bits(),
        fd: -1,
    };

    unsafe { ioctl::drm_ioctl_prime_handle_to_fd(fd.as_raw_fd(), &mut prime) }?;

    Ok(unsafe { R::from_raw_fd(prime.fd) })
}
