//! `ANativeWindow` operations: transform, swap interval, acquire/release.

use core::ffi::c_void;
use core::ptr::NonNull;

/// The managed side uses `0` and `-1` as "no window". Both are treated as
/// absent instead of being dereferenced; operations on them are silent
/// no-ops, not errors.
pub fn valid_window_handle(handle: i64) -> Option<NonNull<c_void>> {
    if handle == -1 {
        return None;
    }
    NonNull::new(handle as *mut c_void)
}

#[cfg(target_os = "android")]
pub use native::*;

#[cfg(target_os = "android")]
mod native {
    use core::ffi::{c_int, c_void};

    use crate::context::BridgeContext;
    use crate::transform::map_surface_transform;

    use super::valid_window_handle;

    const NATIVE_WINDOW_SET_BUFFERS_TRANSFORM: c_int = 6;

    #[repr(C)]
    struct NativeWindowBase {
        magic: u32,
        version: u32,
        reserved: [*mut c_void; 4],
        inc_ref: unsafe extern "C" fn(*mut c_void),
        dec_ref: unsafe extern "C" fn(*mut c_void),
    }

    /// Prefix of the system `ANativeWindow` struct (system/window.h) covering
    /// the fields and vtable entries the bridge uses. The swap interval
    /// bounds and the `perform`/`setSwapInterval` entries are not part of
    /// the public NDK surface, same as in the original frontends that poke
    /// them.
    #[repr(C)]
    struct NativeWindow {
        common: NativeWindowBase,
        flags: u32,
        min_swap_interval: c_int,
        max_swap_interval: c_int,
        xdpi: f32,
        ydpi: f32,
        oem: [isize; 4],
        set_swap_interval: unsafe extern "C" fn(*mut NativeWindow, c_int) -> c_int,
        dequeue_buffer_deprecated: *const c_void,
        lock_buffer_deprecated: *const c_void,
        queue_buffer_deprecated: *const c_void,
        query: unsafe extern "C" fn(*const NativeWindow, c_int, *mut c_int) -> c_int,
        perform: unsafe extern "C" fn(*mut NativeWindow, c_int, ...) -> c_int,
    }

    fn window_ptr(handle: i64) -> Option<*mut NativeWindow> {
        valid_window_handle(handle).map(|w| w.as_ptr().cast())
    }

    /// Apply the transform state for `raw_transform` to the window. Absent
    /// window handles are ignored.
    pub fn set_transform(handle: i64, raw_transform: i32, ctx: &BridgeContext) {
        let Some(window) = window_ptr(handle) else {
            return;
        };
        let transform = map_surface_transform(raw_transform, ctx.orientation_flipped());
        unsafe {
            ((*window).perform)(window, NATIVE_WINDOW_SET_BUFFERS_TRANSFORM, transform);
        }
    }

    pub fn max_swap_interval(handle: i64) -> i32 {
        match window_ptr(handle) {
            Some(window) => unsafe { (*window).max_swap_interval },
            None => 0,
        }
    }

    pub fn min_swap_interval(handle: i64) -> i32 {
        match window_ptr(handle) {
            Some(window) => unsafe { (*window).min_swap_interval },
            None => 0,
        }
    }

    pub fn set_swap_interval(handle: i64, interval: i32) -> i32 {
        match window_ptr(handle) {
            Some(window) => unsafe { ((*window).set_swap_interval)(window, interval) },
            None => 0,
        }
    }

    /// Acquire the `ANativeWindow` behind a Java `Surface`. The returned
    /// handle carries a reference that must be released with
    /// [`release_window`].
    pub fn window_from_surface(env: *mut jni::sys::JNIEnv, surface: jni::sys::jobject) -> i64 {
        unsafe { ndk_sys::ANativeWindow_fromSurface(env.cast(), surface.cast()) as i64 }
    }

    pub fn release_window(handle: i64) {
        if let Some(window) = valid_window_handle(handle) {
            unsafe { ndk_sys::ANativeWindow_release(window.as_ptr().cast()) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_sentinel_handles_are_absent() {
        assert!(valid_window_handle(0).is_none());
        assert!(valid_window_handle(-1).is_none());
    }

    #[test]
    fn real_pointers_pass_through() {
        let handle = 0x7F00_1234_5678i64;
        let window = valid_window_handle(handle).unwrap();
        assert_eq!(window.as_ptr() as i64, handle);
    }
}
