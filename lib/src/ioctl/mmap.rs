use core::num::NonZeroUsize;
use std::os::unix::io::AsFd;
use std::{ops::Deref, ptr::NonNull, slice};

use log::error;
use nix::{
    errno::Errno,
    libc::{c_void, off_t},
    sys::mman,
};
use thiserror::Error;

/// A read-only mapping of one memory plane.
///
/// The mapping remains valid until the `PlaneMapping` is dropped, at which
/// point it is unmapped. It does not keep the descriptor it was mapped from
/// alive; drop the mapping before closing that descriptor.
pub struct PlaneMapping {
    // Valid until we munmap it in drop, hence the static lifetime.
    data: &'static [u8],
}

impl PlaneMapping {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

impl AsRef<[u8]> for PlaneMapping {
    fn as_ref(&self) -> &[u8] {
        self.data
    }
}

impl Deref for PlaneMapping {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.data
    }
}

impl Drop for PlaneMapping {
    fn drop(&mut self) {
        // Safe because the pointer and length were constructed in mmap() and
        // are always valid.
        if let Some(addr) = NonNull::new(self.data.as_ptr() as *mut c_void) {
            unsafe { mman::munmap(addr, self.data.len()) }.unwrap_or_else(|e| {
                error!("Error while unmapping plane: {}", e);
            });
        }
    }
}

#[derive(Debug, Error)]
pub enum MmapError {
    #[error("cannot map a zero-length region")]
    ZeroLength,
    #[error("mmap error: {0}")]
    SyscallError(#[from] Errno),
}

impl From<MmapError> for Errno {
    fn from(err: MmapError) -> Self {
        match err {
            MmapError::ZeroLength => Errno::EINVAL,
            MmapError::SyscallError(e) => e,
        }
    }
}

/// Maps `length` bytes of `fd` from `offset`, read-only and copy-on-write
/// private, and returns the mapping as an owned guard.
pub fn mmap(fd: &impl AsFd, offset: off_t, length: usize) -> Result<PlaneMapping, MmapError> {
    let non_zero_length = NonZeroUsize::new(length).ok_or(MmapError::ZeroLength)?;
    let data = unsafe {
        mman::mmap(
            None,
            non_zero_length,
            mman::ProtFlags::PROT_READ,
            mman::MapFlags::MAP_PRIVATE,
            fd,
            offset,
        )
    }?;

    Ok(PlaneMapping {
        // Safe because we know the pointer is valid and has enough data
        // mapped to cover the length.
        data: unsafe { slice::from_raw_parts(data.as_ptr() as *const u8, length) },
    })
}
