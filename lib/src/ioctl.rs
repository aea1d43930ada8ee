//! This module provides safer versions of the DRM ioctls used for scanout
//! capture through simple functions working on a `RawFd`, and safer variants
//! of the corresponding uapi structures. This module can be used directly,
//! but the `device` and `capture` modules are very likely to be a better fit
//! for application code.
//!
//! DRM ioctls are called with a single structure as argument, which serves
//! to store both the input and output of the ioctl. This is quite
//! error-prone as the user needs to remember which parts of the structure
//! they are supposed to fill, and which parts the driver will update.
//!
//! To alleviate this issue, this module provides, for each ioctl:
//!
//! * A function that takes the relevant input as parameters and not the
//!   entire input/output structure, managing the uapi structure internally.
//! * Safe variants of the structures the driver fills, built from their C
//!   counterparts (e.g. [`PlaneState`], [`Framebuffer`]), to be used as
//!   return values. Wrappers with more than one useful output view are
//!   generic over a `From<raw struct>` conversion.
//!
//! Each ioctl has its own error type, so that scenarios where the ioctl
//! returned non-zero but the situation has a precise meaning (say, `ENOENT`
//! for a framebuffer id that no longer exists) can be represented by their
//! own variant. All error types can be converted back to their originating
//! error code through their `Into<Errno>` implementation.

mod get_cap;
mod get_framebuffer;
mod get_plane;
mod get_plane_resources;
mod mmap;
mod prime;
mod set_client_cap;

pub use get_cap::*;
pub use get_framebuffer::*;
pub use get_plane::*;
pub use get_plane_resources::*;
pub use mmap::*;
pub use prime::*;
pub use set_client_cap::*;
