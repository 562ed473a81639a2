//! Per-platform write-enable toggles and instruction cache maintenance.
//!
//! The toggle is thread-scoped where it exists at all: enabling writes on one
//! thread says nothing about any other thread.

/// Capability interface for writing into memory that may be mapped executable.
///
/// `make_writable`/`make_executable` flip the calling thread's W^X mode on
/// platforms that enforce one, and are no-ops everywhere else. Every
/// implementation must still perform real instruction cache invalidation if
/// the target has incoherent instruction caches.
pub trait ExecutableMemoryWriter {
    /// Allow the calling thread to write to JIT memory.
    fn make_writable(&self);

    /// Restore execute-only mode for the calling thread.
    fn make_executable(&self);

    /// Discard cached instructions for the given range so later fetches see
    /// the newly written bytes.
    fn invalidate_icache(&self, ptr: *const u8, len: usize);
}

/// Apple silicon: `MAP_JIT` pages are execute-only until the per-thread
/// write-protect flag is cleared with `pthread_jit_write_protect_np`.
#[cfg(all(target_arch = "aarch64", target_vendor = "apple"))]
pub struct AppleJitWriter;

#[cfg(all(target_arch = "aarch64", target_vendor = "apple"))]
extern "C" {
    fn sys_icache_invalidate(start: *mut core::ffi::c_void, size: usize);
}

#[cfg(all(target_arch = "aarch64", target_vendor = "apple"))]
impl ExecutableMemoryWriter for AppleJitWriter {
    fn make_writable(&self) {
        unsafe { libc::pthread_jit_write_protect_np(0) };
    }

    fn make_executable(&self) {
        unsafe { libc::pthread_jit_write_protect_np(1) };
    }

    fn invalidate_icache(&self, ptr: *const u8, len: usize) {
        unsafe { sys_icache_invalidate(ptr.cast_mut().cast(), len) };
    }
}

/// AArch64 without the Apple W^X quirk: pages are mapped writable by their
/// owner, so the toggle is a no-op, but the split instruction/data caches
/// still need explicit maintenance after the copy.
#[cfg(all(target_arch = "aarch64", not(target_vendor = "apple")))]
pub struct Arm64JitWriter;

#[cfg(all(target_arch = "aarch64", not(target_vendor = "apple")))]
const CACHE_LINE_SIZE: usize = 64;

#[cfg(all(target_arch = "aarch64", not(target_vendor = "apple")))]
impl ExecutableMemoryWriter for Arm64JitWriter {
    fn make_writable(&self) {}

    fn make_executable(&self) {}

    fn invalidate_icache(&self, ptr: *const u8, len: usize) {
        use core::arch::asm;

        if len == 0 {
            return;
        }
        let start = (ptr as usize) & !(CACHE_LINE_SIZE - 1);
        let end = ptr as usize + len;

        unsafe {
            // Clean data cache to the point of unification, then invalidate
            // the instruction cache for the same lines.
            let mut line = start;
            while line < end {
                asm!("dc cvau, {addr}", addr = in(reg) line, options(nostack, preserves_flags));
                line += CACHE_LINE_SIZE;
            }
            asm!("dsb ish", options(nostack, preserves_flags));

            let mut line = start;
            while line < end {
                asm!("ic ivau, {addr}", addr = in(reg) line, options(nostack, preserves_flags));
                line += CACHE_LINE_SIZE;
            }
            asm!("dsb ish", options(nostack, preserves_flags));
            asm!("isb", options(nostack, preserves_flags));
        }
    }
}

/// Targets with coherent instruction caches (x86) and no thread-scoped W^X
/// policy. Everything is a no-op; the plain copy is already enough.
#[cfg(not(target_arch = "aarch64"))]
pub struct CoherentJitWriter;

#[cfg(not(target_arch = "aarch64"))]
impl ExecutableMemoryWriter for CoherentJitWriter {
    fn make_writable(&self) {}

    fn make_executable(&self) {}

    fn invalidate_icache(&self, _ptr: *const u8, _len: usize) {}
}

#[cfg(all(target_arch = "aarch64", target_vendor = "apple"))]
pub use AppleJitWriter as PlatformWriter;
#[cfg(all(target_arch = "aarch64", not(target_vendor = "apple")))]
pub use Arm64JitWriter as PlatformWriter;
#[cfg(not(target_arch = "aarch64"))]
pub use CoherentJitWriter as PlatformWriter;
