#![allow(dead_code)]
#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(clippy::all)]

//! Raw mirrors of the DRM uapi structures and constants used by the `ioctl`
//! module, transcribed from `drm.h` and `drm_mode.h` with the kernel's
//! naming preserved. Only the definitions this crate actually passes across
//! the kernel boundary are included.

pub type __u32 = u32;
pub type __u64 = u64;
pub type __s32 = i32;

pub const DRM_CAP_DUMB_BUFFER: __u64 = 0x1;
pub const DRM_CAP_VBLANK_HIGH_CRTC: __u64 = 0x2;
pub const DRM_CAP_DUMB_PREFERRED_DEPTH: __u64 = 0x3;
pub const DRM_CAP_DUMB_PREFER_SHADOW: __u64 = 0x4;
pub const DRM_CAP_PRIME: __u64 = 0x5;
pub const DRM_CAP_TIMESTAMP_MONOTONIC: __u64 = 0x6;
pub const DRM_CAP_ASYNC_PAGE_FLIP: __u64 = 0x7;
pub const DRM_CAP_CURSOR_WIDTH: __u64 = 0x8;
pub const DRM_CAP_CURSOR_HEIGHT: __u64 = 0x9;
pub const DRM_CAP_ADDFB2_MODIFIERS: __u64 = 0x10;
pub const DRM_CAP_PAGE_FLIP_TARGET: __u64 = 0x11;
pub const DRM_CAP_CRTC_IN_VBLANK_EVENT: __u64 = 0x12;
pub const DRM_CAP_SYNCOBJ: __u64 = 0x13;
pub const DRM_CAP_SYNCOBJ_TIMELINE: __u64 = 0x14;

pub const DRM_CLIENT_CAP_STEREO_3D: __u64 = 1;
pub const DRM_CLIENT_CAP_UNIVERSAL_PLANES: __u64 = 2;
pub const DRM_CLIENT_CAP_ATOMIC: __u64 = 3;
pub const DRM_CLIENT_CAP_ASPECT_RATIO: __u64 = 4;
pub const DRM_CLIENT_CAP_WRITEBACK_CONNECTORS: __u64 = 5;
pub const DRM_CLIENT_CAP_CURSOR_PLANE_HOTSPOT: __u64 = 6;

pub const DRM_CLOEXEC: __u32 = 0o2000000;
pub const DRM_RDWR: __u32 = 0o2;

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct drm_get_cap {
    pub capability: __u64,
    pub value: __u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct drm_set_client_cap {
    pub capability: __u64,
    pub value: __u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct drm_mode_get_plane_res {
    pub plane_id_ptr: __u64,
    pub count_planes: __u32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct drm_mode_get_plane {
    pub plane_id: __u32,
    pub crtc_id: __u32,
    pub fb_id: __u32,
    pub possible_crtcs: __u32,
    pub gamma_size: __u32,
    pub count_format_types: __u32,
    pub format_type_ptr: __u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct drm_mode_fb_cmd2 {
    pub fb_id: __u32,
    pub width: __u32,
    pub height: __u32,
    pub pixel_format: __u32,
    pub flags: __u32,
    pub handles: [__u32; 4],
    pub pitches: [__u32; 4],
    pub offsets: [__u32; 4],
    pub modifier: [__u64; 4],
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct drm_prime_handle {
    pub handle: __u32,
    pub flags: __u32,
    pub fd: __s32,
}
