//! Higher-level representation of a DRM device node.
//!
//! [`Device`] owns the opened node and is the root of validity for every
//! plane, framebuffer and mapping derived from it; dropping it closes the
//! node. [`Device::find_card`] implements the probing policy used by the
//! capture tool: take the first card that can allocate dumb buffers, i.e.
//! the first one that is an actual display controller and not a render-only
//! node.

use std::fs::File;
use std::os::unix::io::{AsFd, AsRawFd, BorrowedFd, FromRawFd, RawFd};
use std::path::{Path, PathBuf};

use log::{debug, info};
use nix::errno::Errno;
use nix::fcntl::{open, OFlag};
use nix::sys::stat::Mode;
use thiserror::Error;

use crate::ioctl;
use crate::ioctl::Capability;

/// Configuration for [`Device::find_card`].
///
/// The directory holding the card nodes is an explicit value here so tests
/// and unusual setups can point the probe somewhere else than `/dev/dri`.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    node_dir: PathBuf,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            node_dir: PathBuf::from("/dev/dri"),
        }
    }
}

impl DeviceConfig {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn node_dir(self, node_dir: impl Into<PathBuf>) -> Self {
        DeviceConfig {
            node_dir: node_dir.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum OpenDeviceError {
    #[error("cannot open device node: {0}")]
    OpenFailed(#[from] Errno),
}

#[derive(Debug, Error)]
pub enum FindCardError {
    #[error("no KMS device with dumb buffer support found")]
    NoDeviceFound,
}

/// An open DRM device node.
pub struct Device {
    fd: File,
}

impl Device {
    fn new(fd: File) -> Self {
        Device { fd }
    }

    /// Opens the device node at `path` read-write.
    pub fn open(path: &Path) -> Result<Self, OpenDeviceError> {
        let fd = open(path, OFlag::O_RDWR | OFlag::O_CLOEXEC, Mode::empty())?;

        // Safe because we just opened this fd and nothing else owns it.
        Ok(Device::new(unsafe { File::from_raw_fd(fd) }))
    }

    /// Probes `card0`, `card1`, ... under the configured directory and
    /// returns the first device that supports dumb buffers.
    ///
    /// The fd used for the capability probe is the one returned, so the
    /// device cannot change identity between probing and use. Rejected
    /// candidates are closed before the next index is tried; the probe ends
    /// at the first index that fails to open.
    pub fn find_card(config: &DeviceConfig) -> Result<Self, FindCardError> {
        for index in 0.. {
            let path = config.node_dir.join(format!("card{}", index));
            let device = match Device::open(&path) {
                Ok(device) => device,
                Err(e) => {
                    debug!("probe stopped at {}: {}", path.display(), e);
                    break;
                }
            };

            match ioctl::get_cap(&device, Capability::DumbBuffer) {
                Ok(value) if value != 0 => {
                    info!("using KMS device {}", path.display());
                    return Ok(device);
                }
                Ok(_) => debug!("{} has no dumb buffer support, skipping", path.display()),
                Err(e) => debug!("capability query on {} failed: {}", path.display(), e),
            }
            // `device` dropped here, closing the rejected node.
        }

        Err(FindCardError::NoDeviceFound)
    }
}

impl AsFd for Device {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl AsRawFd for Device {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

#[cfg(test)]
mod tests {
    use super::{Device, DeviceConfig, FindCardError};

    #[test]
    fn find_card_on_empty_dir_fails() {
        let dir = std::env::temp_dir().join("kmsgrab-test-no-cards");
        std::fs::create_dir_all(&dir).unwrap();

        let config = DeviceConfig::new().node_dir(&dir);
        match Device::find_card(&config) {
            Err(FindCardError::NoDeviceFound) => (),
            Ok(_) => panic!("found a card in an empty directory"),
        }
    }
}
