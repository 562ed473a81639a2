//! Native glue between a managed emulator frontend and the Android platform.
//!
//! The bridge marshals calls into system and vendor libraries it does not
//! own: Vulkan surface creation on raw instance handles, custom GPU driver
//! loading, swap interval and window transform control on `ANativeWindow`,
//! plus the C entry point for patching executable JIT memory.
//!
//! Everything that touches the Android ABI compiles only for Android (build
//! with the `android` feature); the transform mapping, sentinel handling and
//! context plumbing are portable and unit-tested on the host.

pub mod context;
#[cfg(unix)]
pub mod debug;
pub mod strings;
pub mod transform;
pub mod vulkan;
pub mod window;

#[cfg(target_os = "android")]
pub mod android;
#[cfg(target_os = "android")]
pub mod driver;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("jni string access failed: {0}")]
    Jni(#[from] jni::errors::Error),
    #[error("embedded nul in marshaled string: {0}")]
    Nul(#[from] std::ffi::NulError),
}

/// Overwrite a JIT code region with new machine code.
///
/// Exposed for the managed host, which owns the region. Write protection is
/// toggled around the copy on the calling thread only and the instruction
/// cache is invalidated before returning; see `jit-memory` for the full
/// contract.
///
/// # Safety
///
/// `dst` and `src` must be valid for `len` bytes and must not overlap, and
/// no thread may execute from the destination range during the call.
#[no_mangle]
pub unsafe extern "C" fn jit_patch_code(dst: *mut u8, src: *const u8, len: usize) {
    unsafe { jit_memory::patch(dst, src, len) };
}
