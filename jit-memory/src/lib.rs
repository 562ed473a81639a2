//! Patch primitive for JIT code regions.
//!
//! A code region is a caller-owned byte range that may be mapped executable
//! at the time of the call. [`patch`] makes it writable for the calling
//! thread, copies the new bytes in, restores protection and invalidates the
//! instruction cache so no core can fetch stale instructions afterwards.
//!
//! There is no error channel: the caller guarantees the region is valid,
//! mapped and large enough. Passing a bad region is undefined behavior at the
//! OS level, the same as any wild write.

use core::ptr;

pub mod writer;

pub use writer::{ExecutableMemoryWriter, PlatformWriter};

/// Copy `len` bytes from `src` into the possibly-executable region at `dst`
/// using an explicit writer capability.
///
/// Ordering contract: the thread enters the writable state strictly before
/// the first byte is written and leaves it strictly after the last byte;
/// cache invalidation happens after the copy and before this function
/// returns. Runs to completion on the calling thread, no suspension points,
/// no allocation.
///
/// # Safety
///
/// `dst` and `src` must be valid for `len` bytes and must not overlap. No
/// other thread may execute instructions from the destination range while the
/// copy is in flight; partially written instructions are unsafe to run.
pub unsafe fn patch_with<W: ExecutableMemoryWriter + ?Sized>(
    writer: &W,
    dst: *mut u8,
    src: *const u8,
    len: usize,
) {
    writer.make_writable();
    unsafe { ptr::copy_nonoverlapping(src, dst, len) };
    writer.make_executable();
    writer.invalidate_icache(dst, len);
}

/// [`patch_with`] using the writer for the compilation target.
///
/// # Safety
///
/// Same contract as [`patch_with`].
pub unsafe fn patch(dst: *mut u8, src: *const u8, len: usize) {
    unsafe { patch_with(&PlatformWriter, dst, src, len) };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    enum Event {
        Writable,
        Protected,
        Invalidate(usize),
    }

    /// Checks the destination contents at every toggle edge: nothing may be
    /// written before `make_writable`, everything must be written by the time
    /// `make_executable` runs.
    struct RecordingWriter {
        dst: *const u8,
        len: usize,
        initial: Vec<u8>,
        expected: Vec<u8>,
        events: RefCell<Vec<Event>>,
    }

    impl RecordingWriter {
        fn dst_bytes(&self) -> Vec<u8> {
            unsafe { core::slice::from_raw_parts(self.dst, self.len) }.to_vec()
        }
    }

    impl ExecutableMemoryWriter for RecordingWriter {
        fn make_writable(&self) {
            assert_eq!(self.dst_bytes(), self.initial, "copy began before write-enable");
            self.events.borrow_mut().push(Event::Writable);
        }

        fn make_executable(&self) {
            assert_eq!(self.dst_bytes(), self.expected, "copy not finished at write-disable");
            self.events.borrow_mut().push(Event::Protected);
        }

        fn invalidate_icache(&self, ptr: *const u8, len: usize) {
            assert_eq!(ptr, self.dst, "invalidation range base mismatch");
            self.events.borrow_mut().push(Event::Invalidate(len));
        }
    }

    #[test]
    fn writable_window_is_minimal_and_ordered() {
        let mut dst = [0xAAu8; 16];
        let src: Vec<u8> = (0..16).collect();

        let writer = RecordingWriter {
            dst: dst.as_ptr(),
            len: dst.len(),
            initial: dst.to_vec(),
            expected: src.clone(),
            events: RefCell::new(Vec::new()),
        };

        unsafe { patch_with(&writer, dst.as_mut_ptr(), src.as_ptr(), src.len()) };

        assert_eq!(dst.to_vec(), src);
        assert_eq!(
            writer.events.into_inner(),
            vec![Event::Writable, Event::Protected, Event::Invalidate(16)]
        );
    }

    #[cfg(not(target_vendor = "apple"))]
    #[test]
    fn patch_copies_bytes_verbatim() {
        let mut dst = vec![0u8; 256];
        let src: Vec<u8> = (0..=255).collect();

        unsafe { patch(dst.as_mut_ptr(), src.as_ptr(), src.len()) };

        assert_eq!(dst, src);
    }

    #[test]
    fn zero_length_patch_is_a_no_op() {
        let mut dst = [7u8; 4];
        let src = [0u8; 0];

        let writer = RecordingWriter {
            dst: dst.as_ptr(),
            len: dst.len(),
            initial: dst.to_vec(),
            expected: dst.to_vec(),
            events: RefCell::new(Vec::new()),
        };
        unsafe { patch_with(&writer, dst.as_mut_ptr(), src.as_ptr(), 0) };

        assert_eq!(dst, [7u8; 4]);
        assert_eq!(
            writer.events.into_inner(),
            vec![Event::Writable, Event::Protected, Event::Invalidate(0)]
        );
    }
}

// Executes freshly patched code to check instruction stream coherence, so it
// needs a real executable mapping and a known instruction encoding.
#[cfg(all(test, target_os = "linux", any(target_arch = "x86_64", target_arch = "aarch64")))]
mod exec_tests {
    use super::patch;
    use core::ptr;

    #[test]
    fn patched_code_is_fetchable_immediately() {
        // mov <ret reg>, 42; ret
        #[cfg(target_arch = "x86_64")]
        let code: &[u8] = &[0xB8, 0x2A, 0x00, 0x00, 0x00, 0xC3];
        #[cfg(target_arch = "aarch64")]
        let code: &[u8] = &[0x40, 0x05, 0x80, 0x52, 0xC0, 0x03, 0x5F, 0xD6];

        unsafe {
            let page = libc::mmap(
                ptr::null_mut(),
                4096,
                libc::PROT_READ | libc::PROT_WRITE | libc::PROT_EXEC,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            );
            assert_ne!(page, libc::MAP_FAILED, "mmap failed");

            patch(page.cast(), code.as_ptr(), code.len());

            let entry: extern "C" fn() -> i32 = core::mem::transmute(page);
            assert_eq!(entry(), 42);

            libc::munmap(page, 4096);
        }
    }
}
