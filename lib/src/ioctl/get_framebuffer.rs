//! Safe wrapper for the `DRM_IOCTL_MODE_GETFB2` ioctl.
//!
//! `GETFB2` is the extended framebuffer query: unlike the legacy `GETFB` it
//! reports the fourcc pixel format and the per-plane handles, pitches and
//! offsets of multi-planar buffers, which is what the capture path needs.
use nix::errno::Errno;
use std::os::unix::io::AsRawFd;
use thiserror::Error;

use crate::bindings::drm_mode_fb_cmd2;
use crate::PixelFormat;

/// Maximum number of memory planes a framebuffer can be made of.
pub const FB_MAX_PLANES: usize = 4;

/// One memory plane of a framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferPlane {
    /// Driver-local buffer object handle backing this plane.
    pub handle: u32,
    /// Byte distance between the starts of consecutive rows.
    pub pitch: u32,
    /// Byte offset of the plane's data within its buffer object.
    pub offset: u32,
    /// Format modifier, meaningful only if the framebuffer was created with
    /// one.
    pub modifier: u64,
}

/// Safe view of a `drm_mode_fb_cmd2`, describing the geometry and the
/// backing memory planes of one framebuffer.
///
/// The kernel marks unused plane slots with a zero handle; those become
/// `None` here so downstream code never has to compare handles against a
/// sentinel.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    pub id: u32,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub planes: [Option<FramebufferPlane>; FB_MAX_PLANES],
}

impl Framebuffer {
    /// Iterates over the present memory planes together with their index.
    pub fn planes(&self) -> impl Iterator<Item = (usize, &FramebufferPlane)> {
        self.planes
            .iter()
            .enumerate()
            .filter_map(|(index, plane)| plane.as_ref().map(|plane| (index, plane)))
    }

    /// Number of bytes plane `index` occupies in its buffer object.
    ///
    /// Planes past the first are assumed to be vertically subsampled by two,
    /// which holds for the common 4:2:0 multi-planar layouts but not for
    /// 4:4:4 or other non-subsampled ones. The kernel does not report the
    /// subsampling factors, so this stays an approximation.
    pub fn plane_len(&self, index: usize) -> Option<usize> {
        let plane = self.planes.get(index).copied().flatten()?;
        let full = plane.pitch as usize * self.height as usize;

        Some(if index == 0 { full } else { full / 2 })
    }
}

impl From<drm_mode_fb_cmd2> for Framebuffer {
    fn from(fb2: drm_mode_fb_cmd2) -> Self {
        let mut planes = [None; FB_MAX_PLANES];
        for (index, plane) in planes.iter_mut().enumerate() {
            if fb2.handles[index] != 0 {
                *plane = Some(FramebufferPlane {
                    handle: fb2.handles[index],
                    pitch: fb2.pitches[index],
                    offset: fb2.offsets[index],
                    modifier: fb2.modifier[index],
                });
            }
        }

        Framebuffer {
            id: fb2.fb_id,
            width: fb2.width,
            height: fb2.height,
            format: PixelFormat::from_u32(fb2.pixel_format),
            planes,
        }
    }
}

#[doc(hidden)]
mod ioctl {
    use crate::bindings::drm_mode_fb_cmd2;
    nix::ioctl_readwrite!(drm_ioctl_mode_getfb2, b'd', 0xce, drm_mode_fb_cmd2);
}

#[derive(Debug, Error)]
pub enum GetFramebufferError {
    #[error("no framebuffer with id {0}")]
    NoSuchFramebuffer(u32),
    #[error("ioctl error: {0}")]
    IoctlError(Errno),
}

impl From<GetFramebufferError> for Errno {
    fn from(err: GetFramebufferError) -> Self {
        match err {
            GetFramebufferError::NoSuchFramebuffer(_) => Errno::ENOENT,
            GetFramebufferError::IoctlError(e) => e,
        }
    }
}

/// Safe wrapper around the `DRM_IOCTL_MODE_GETFB2` ioctl.
pub fn get_framebuffer<O: From<drm_mode_fb_cmd2>>(
    fd: &impl AsRawFd,
    fb_id: u32,
) -> Result<O, GetFramebufferError> {
    let mut fb2 = drm_mode_fb_cmd2 {
        fb_id,
        ..Default::default()
    };

    match unsafe { ioctl::drm_ioctl_mode_getfb2(fd.as_raw_fd(), &mut fb2) } {
        Ok(_) => Ok(O::from(fb2)),
        Err(Errno::ENOENT) => Err(GetFramebufferError::NoSuchFramebuffer(fb_id)),
        Err(e) => Err(GetFramebufferError::IoctlError(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::Framebuffer;
    use crate::bindings::drm_mode_fb_cmd2;
    use crate::PixelFormat;

    fn single_plane_fb(pitch: u32, height: u32) -> Framebuffer {
        Framebuffer::from(drm_mode_fb_cmd2 {
            fb_id: 55,
            width: 640,
            height,
            pixel_format: PixelFormat::from_fourcc(b"XR24").to_u32(),
            handles: [7, 0, 0, 0],
            pitches: [pitch, 0, 0, 0],
            ..Default::default()
        })
    }

    #[test]
    fn zero_handle_means_absent() {
        let fb = Framebuffer::from(drm_mode_fb_cmd2 {
            fb_id: 3,
            width: 1920,
            height: 1080,
            pixel_format: PixelFormat::from_fourcc(b"NV12").to_u32(),
            handles: [11, 12, 0, 0],
            pitches: [1920, 1920, 0, 0],
            offsets: [0, 2073600, 0, 0],
            ..Default::default()
        });

        assert!(fb.planes[0].is_some());
        assert!(fb.planes[1].is_some());
        assert!(fb.planes[2].is_none());
        assert!(fb.planes[3].is_none());

        let present: Vec<usize> = fb.planes().map(|(index, _)| index).collect();
        assert_eq!(present, vec![0, 1]);

        let (_, second) = fb.planes().nth(1).unwrap();
        assert_eq!(second.handle, 12);
        assert_eq!(second.offset, 2073600);
    }

    #[test]
    fn first_plane_is_full_height() {
        let fb = single_plane_fb(2560, 720);
        assert_eq!(fb.plane_len(0), Some(2560 * 720));
    }

    #[test]
    fn chroma_planes_are_half_height() {
        let fb = Framebuffer::from(drm_mode_fb_cmd2 {
            height: 1080,
            pixel_format: PixelFormat::from_fourcc(b"NV12").to_u32(),
            handles: [1, 2, 3, 4],
            pitches: [1920, 1920, 960, 960],
            ..Default::default()
        });

        assert_eq!(fb.plane_len(0), Some(1920 * 1080));
        assert_eq!(fb.plane_len(1), Some(1920 * 1080 / 2));
        assert_eq!(fb.plane_len(2), Some(960 * 1080 / 2));
        assert_eq!(fb.plane_len(3), Some(960 * 1080 / 2));
    }

    #[test]
    fn absent_plane_has_no_len() {
        let fb = single_plane_fb(2560, 720);
        assert_eq!(fb.plane_len(1), None);
        assert_eq!(fb.plane_len(4), None);
    }

    #[test]
    fn odd_height_rounds_down() {
        let fb = Framebuffer::from(drm_mode_fb_cmd2 {
            height: 3,
            handles: [1, 2, 0, 0],
            pitches: [16, 16, 0, 0],
            ..Default::default()
        });

        assert_eq!(fb.plane_len(0), Some(48));
        assert_eq!(fb.plane_len(1), Some(24));
    }
}
