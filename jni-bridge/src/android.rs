//! Entry points exported to the managed side.
//!
//! Two surfaces share the implementations: plain C symbols the managed
//! runtime binds directly, and `Java_..._NativeHelpers_...` wrappers for the
//! Kotlin side. Neither surface returns structured errors; failures become
//! sentinels, no-ops or a logged abort as documented on each operation.

#![allow(non_snake_case)]

use core::ffi::c_void;

use anyhow::Context as _;
use jni::objects::{JClass, JObject, JString};
use jni::sys::{jboolean, jint, jlong, JNI_VERSION_1_6};
use jni::{JNIEnv, JavaVM};
use log::{debug, error, info};

use crate::context::context;
use crate::strings::owned_cstring;
use crate::{driver, vulkan, window};

#[no_mangle]
pub extern "system" fn JNI_OnLoad(vm: JavaVM, _reserved: *mut c_void) -> jint {
    android_logger::init_once(
        android_logger::Config::default().with_max_level(log::LevelFilter::Info),
    );
    context().store_vm(vm);
    info!("native bridge loaded");
    JNI_VERSION_1_6
}

// ---- plain C surface (managed runtime binds these by symbol name) ----

#[no_mangle]
pub extern "C" fn setRenderingThread() {
    let thread_id = unsafe { libc::pthread_self() } as i64;
    context().set_rendering_thread(thread_id);
    debug!("rendering thread registered: {thread_id:#x}");
}

#[no_mangle]
pub extern "C" fn debug_break(code: jint) {
    crate::debug::debug_break(code);
}

#[no_mangle]
pub extern "C" fn setCurrentTransform(native_window: jlong, transform: jint) {
    window::set_transform(native_window, transform, context());
}

#[no_mangle]
pub extern "C" fn createSurface(native_surface: jlong, instance: jlong) -> jlong {
    vulkan::create_surface(native_surface, instance)
}

// ---- JNI surface ----

/// Called once from the activity's startup path; caches a global reference
/// so native code can reach the activity after the local frame is gone.
#[no_mangle]
pub extern "system" fn Java_com_emubridge_NativeHelpers_initialize<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    activity: JObject<'local>,
) {
    match env.new_global_ref(&activity) {
        Ok(global) => context().store_activity(global),
        Err(err) => error!("failed to cache activity reference: {err}"),
    }
}

#[no_mangle]
pub extern "system" fn Java_com_emubridge_NativeHelpers_getCreateSurfacePtr(
    _env: JNIEnv<'_>,
    _class: JClass<'_>,
) -> jlong {
    let entry: extern "C" fn(jlong, jlong) -> jlong = createSurface;
    entry as usize as jlong
}

#[no_mangle]
pub extern "system" fn Java_com_emubridge_NativeHelpers_loadDriver<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    native_lib_dir: JString<'local>,
    driver_dir: JString<'local>,
    driver_name: JString<'local>,
) -> jlong {
    match load_driver_paths(&mut env, &native_lib_dir, &driver_dir, &driver_name) {
        Ok(handle) => handle,
        Err(err) => {
            error!("loadDriver failed: {err:#}");
            0
        }
    }
}

fn load_driver_paths(
    env: &mut JNIEnv<'_>,
    native_lib_dir: &JString<'_>,
    driver_dir: &JString<'_>,
    driver_name: &JString<'_>,
) -> anyhow::Result<jlong> {
    let native_lib_dir = owned_cstring(env, native_lib_dir).context("native lib dir")?;
    let driver_dir = owned_cstring(env, driver_dir).context("driver dir")?;
    let driver_name = owned_cstring(env, driver_name).context("driver name")?;
    Ok(driver::load_driver(&native_lib_dir, &driver_dir, &driver_name))
}

#[no_mangle]
pub extern "system" fn Java_com_emubridge_NativeHelpers_setTurboMode(
    _env: JNIEnv<'_>,
    _class: JClass<'_>,
    enable: jboolean,
) {
    driver::set_turbo(enable != 0);
}

#[no_mangle]
pub extern "system" fn Java_com_emubridge_NativeHelpers_getMaxSwapInterval(
    _env: JNIEnv<'_>,
    _class: JClass<'_>,
    native_window: jlong,
) -> jint {
    window::max_swap_interval(native_window)
}

#[no_mangle]
pub extern "system" fn Java_com_emubridge_NativeHelpers_getMinSwapInterval(
    _env: JNIEnv<'_>,
    _class: JClass<'_>,
    native_window: jlong,
) -> jint {
    window::min_swap_interval(native_window)
}

#[no_mangle]
pub extern "system" fn Java_com_emubridge_NativeHelpers_setSwapInterval(
    _env: JNIEnv<'_>,
    _class: JClass<'_>,
    native_window: jlong,
    interval: jint,
) -> jint {
    window::set_swap_interval(native_window, interval)
}

#[no_mangle]
pub extern "system" fn Java_com_emubridge_NativeHelpers_setCurrentTransform(
    _env: JNIEnv<'_>,
    _class: JClass<'_>,
    native_window: jlong,
    transform: jint,
) {
    window::set_transform(native_window, transform, context());
}

#[no_mangle]
pub extern "system" fn Java_com_emubridge_NativeHelpers_setIsInitialOrientationFlipped(
    _env: JNIEnv<'_>,
    _class: JClass<'_>,
    flipped: jboolean,
) {
    context().set_orientation_flipped(flipped != 0);
}

#[no_mangle]
pub extern "system" fn Java_com_emubridge_NativeHelpers_setRenderingThread(
    _env: JNIEnv<'_>,
    _class: JClass<'_>,
) {
    setRenderingThread();
}

#[no_mangle]
pub extern "system" fn Java_com_emubridge_NativeHelpers_getNativeWindow(
    env: JNIEnv<'_>,
    _class: JClass<'_>,
    surface: JObject<'_>,
) -> jlong {
    window::window_from_surface(env.get_raw(), surface.as_raw())
}

#[no_mangle]
pub extern "system" fn Java_com_emubridge_NativeHelpers_releaseNativeWindow(
    _env: JNIEnv<'_>,
    _class: JClass<'_>,
    native_window: jlong,
) {
    window::release_window(native_window);
}

#[no_mangle]
pub extern "system" fn Java_com_emubridge_NativeHelpers_attachCurrentThread(
    _env: JNIEnv<'_>,
    _class: JClass<'_>,
) {
    let attached = context().with_vm(|vm| vm.attach_current_thread_permanently().map(|_| ()));
    match attached {
        Some(Ok(())) => {}
        Some(Err(err)) => error!("failed to attach current thread: {err}"),
        None => error!("attachCurrentThread before JNI_OnLoad"),
    }
}

#[no_mangle]
pub extern "system" fn Java_com_emubridge_NativeHelpers_detachCurrentThread(
    _env: JNIEnv<'_>,
    _class: JClass<'_>,
) {
    if context().with_vm(|vm| unsafe { vm.detach_current_thread() }).is_none() {
        error!("detachCurrentThread before JNI_OnLoad");
    }
}
