//! Android Vulkan surface creation over raw handles.
//!
//! The managed side owns the `VkInstance` and hands it across the boundary
//! as a plain integer, so entry points are resolved through
//! `vkGetInstanceProcAddr` instead of a linked loader.

use core::ptr;

use ash::vk;
use ash::vk::Handle;
use log::error;

/// Sentinel returned when the instance has no `VK_KHR_android_surface`
/// support. Not an error object; the managed side checks for it.
pub const SURFACE_UNAVAILABLE: i64 = -1;

/// Creates an Android surface through an already-resolved entry point.
///
/// A missing entry point yields [`SURFACE_UNAVAILABLE`]. Any non-success
/// result from the call itself aborts the process after logging: the frontend
/// cannot render without a surface and there is no recovery path.
pub fn create_surface_with(
    pfn: Option<vk::PFN_vkCreateAndroidSurfaceKHR>,
    instance: vk::Instance,
    window: *mut vk::ANativeWindow,
) -> i64 {
    let Some(create_android_surface) = pfn else {
        error!("vkCreateAndroidSurfaceKHR is not exposed by this instance");
        return SURFACE_UNAVAILABLE;
    };

    let info = vk::AndroidSurfaceCreateInfoKHR::default().window(window);
    let mut surface = vk::SurfaceKHR::null();
    let result =
        unsafe { create_android_surface(instance, &info, ptr::null(), &mut surface) };
    if result != vk::Result::SUCCESS {
        error!("vkCreateAndroidSurfaceKHR failed: {result:?}");
        std::process::abort();
    }

    surface.as_raw() as i64
}

/// Resolve `vkCreateAndroidSurfaceKHR` on a raw instance handle and create a
/// surface for `native_window`.
#[cfg(target_os = "android")]
pub fn create_surface(native_window: i64, instance: i64) -> i64 {
    let instance = vk::Instance::from_raw(instance as u64);
    let pfn = unsafe {
        vkGetInstanceProcAddr(instance, c"vkCreateAndroidSurfaceKHR".as_ptr())
    };
    let pfn = pfn.map(|f| unsafe {
        core::mem::transmute::<unsafe extern "system" fn(), vk::PFN_vkCreateAndroidSurfaceKHR>(f)
    });

    create_surface_with(pfn, instance, native_window as *mut vk::ANativeWindow)
}

#[cfg(target_os = "android")]
#[link(name = "vulkan")]
extern "system" {
    fn vkGetInstanceProcAddr(
        instance: vk::Instance,
        p_name: *const core::ffi::c_char,
    ) -> vk::PFN_vkVoidFunction;
}
