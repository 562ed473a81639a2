//! Custom GPU driver loading through libadrenotools.

use core::ffi::{c_char, c_int, c_void};
use core::ptr;
use std::ffi::CStr;

use log::{info, warn};

const ADRENOTOOLS_DRIVER_CUSTOM: c_int = 1 << 1;

#[link(name = "adrenotools")]
extern "C" {
    fn adrenotools_open_libvulkan(
        dlopen_mode: c_int,
        feature_flags: c_int,
        tmp_lib_dir: *const c_char,
        hook_lib_dir: *const c_char,
        custom_driver_dir: *const c_char,
        custom_driver_name: *const c_char,
        file_redirect_dir: *const c_char,
        user_mapping_handle: *mut *mut c_void,
    ) -> *mut c_void;

    fn adrenotools_set_turbo(turbo: bool) -> bool;
}

/// Load a replacement Vulkan driver. Returns the opaque module handle, or 0
/// when the loader fails; the managed side treats 0 as "fall back to the
/// system driver".
pub fn load_driver(native_lib_dir: &CStr, driver_dir: &CStr, driver_name: &CStr) -> i64 {
    let handle = unsafe {
        adrenotools_open_libvulkan(
            libc::RTLD_NOW,
            ADRENOTOOLS_DRIVER_CUSTOM,
            ptr::null(),
            native_lib_dir.as_ptr(),
            driver_dir.as_ptr(),
            driver_name.as_ptr(),
            ptr::null(),
            ptr::null_mut(),
        )
    };

    if handle.is_null() {
        warn!("adrenotools failed to load driver {driver_name:?} from {driver_dir:?}");
    } else {
        info!("loaded custom driver {driver_name:?}");
    }
    handle as i64
}

/// GPU turbo-mode pass-through.
pub fn set_turbo(enable: bool) -> bool {
    unsafe { adrenotools_set_turbo(enable) }
}
