//! Scanout capture pipeline.
//!
//! Strictly sequential: negotiate the client capabilities, enumerate the
//! active planes, then export, map and read each plane's memory one at a
//! time. Errors local to a single plane or memory plane are logged and the
//! plane skipped; errors that indicate the device as a whole cannot be
//! captured abort the run.

use std::fs::File;
use std::io;

use log::{debug, warn};
use thiserror::Error;

use crate::device::Device;
use crate::ioctl;
use crate::ioctl::{
    ClientCapability, Framebuffer, GetFramebufferError, GetPlaneResourcesError, PlaneState,
    PrimeFlags, SetClientCapError,
};

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("cannot enable client capability {capability}: {source}")]
    CapabilityUnavailable {
        capability: ClientCapability,
        source: SetClientCapError,
    },
    #[error("cannot list plane resources: {0}")]
    PlaneResources(#[from] GetPlaneResourcesError),
    #[error("cannot resolve framebuffer {fb_id} of plane {plane_id}: {source}")]
    BufferResolution {
        plane_id: u32,
        fb_id: u32,
        source: GetFramebufferError,
    },
    #[error("cannot write plane data: {0}")]
    Write(#[from] io::Error),
}

/// One plane that is currently scanning out, together with its resolved
/// framebuffer.
///
/// `index` is the plane's position in the enumeration order and is what
/// output files are numbered by.
#[derive(Debug)]
pub struct ActivePlane {
    pub index: usize,
    pub plane_id: u32,
    pub crtc_id: u32,
    pub framebuffer: Framebuffer,
}

/// Enables the client capabilities plane enumeration depends on.
///
/// Both atomic modesetting and universal planes are required: without the
/// latter, cursor and overlay planes are invisible to [`active_planes`] and
/// the capture would silently be incomplete. Failure of either is therefore
/// fatal.
pub fn negotiate_client_caps(device: &Device) -> Result<(), CaptureError> {
    for capability in [ClientCapability::Atomic, ClientCapability::UniversalPlanes] {
        ioctl::set_client_cap(device, capability, 1)
            .map_err(|source| CaptureError::CapabilityUnavailable { capability, source })?;
    }

    Ok(())
}

/// Walks all planes of `device` and resolves the active ones to their
/// framebuffers.
///
/// A plane whose state cannot be queried is skipped with a warning. A plane
/// that is bound to a framebuffer which then cannot be resolved aborts the
/// enumeration: a bound-but-unresolvable buffer means the device state is
/// inconsistent, which is worth surfacing rather than papering over.
pub fn active_planes(device: &Device) -> Result<Vec<ActivePlane>, CaptureError> {
    let plane_ids = ioctl::get_plane_resources(device)?;
    debug!("device exposes {} planes", plane_ids.len());

    let mut planes = Vec::new();
    for (index, plane_id) in plane_ids.into_iter().enumerate() {
        let state: PlaneState = match ioctl::get_plane(device, plane_id) {
            Ok(state) => state,
            Err(e) => {
                warn!("cannot query plane {}: {}", plane_id, e);
                continue;
            }
        };

        if !state.is_active() {
            continue;
        }

        let framebuffer: Framebuffer = ioctl::get_framebuffer(device, state.fb_id)
            .map_err(|source| CaptureError::BufferResolution {
                plane_id,
                fb_id: state.fb_id,
                source,
            })?;

        debug!(
            "plane {} (index {}): crtc {}, {}x{} {} framebuffer {}",
            plane_id,
            index,
            state.crtc_id,
            framebuffer.width,
            framebuffer.height,
            framebuffer.format,
            framebuffer.id,
        );

        planes.push(ActivePlane {
            index,
            plane_id,
            crtc_id: state.crtc_id,
            framebuffer,
        });
    }

    Ok(planes)
}

/// A mapped memory plane, handed to the sink of [`read_plane`].
pub struct MappedPlane<'a> {
    /// Index of the memory plane within its framebuffer (0-3).
    pub index: usize,
    /// The plane's bytes, `pitch * height` of them for the first plane and
    /// half that for the subsampled ones.
    pub data: &'a [u8],
}

/// Exports and maps each present memory plane of `framebuffer` in turn,
/// feeding the mapped bytes to `sink`.
///
/// Export and mapping failures skip the affected memory plane and move on
/// to the next; a sink error aborts and propagates. Every exported
/// descriptor and every mapping is released before the next plane is
/// touched, whichever way the iteration ends - the mapping strictly before
/// its descriptor.
pub fn read_plane<F>(
    device: &Device,
    framebuffer: &Framebuffer,
    mut sink: F,
) -> Result<(), CaptureError>
where
    F: FnMut(&MappedPlane) -> io::Result<()>,
{
    for (index, plane) in framebuffer.planes() {
        let prime_fd: File =
            match ioctl::prime_handle_to_fd(device, plane.handle, PrimeFlags::CLOEXEC) {
                Ok(fd) => fd,
                Err(e) => {
                    warn!(
                        "cannot export memory plane {} of framebuffer {}: {}",
                        index, framebuffer.id, e
                    );
                    continue;
                }
            };

        // plane_len() is Some for every index planes() yields.
        let len = framebuffer.plane_len(index).unwrap_or(0);
        let mapping = match ioctl::mmap(&prime_fd, 0, len) {
            Ok(mapping) => mapping,
            Err(e) => {
                warn!(
                    "cannot map memory plane {} of framebuffer {}: {}",
                    index, framebuffer.id, e
                );
                continue;
            }
        };

        sink(&MappedPlane {
            index,
            data: &mapping,
        })?;

        // `mapping` unmaps before `prime_fd` closes, by drop order.
    }

    Ok(())
}
