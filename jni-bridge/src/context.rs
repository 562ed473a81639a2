//! Process-wide bridge state.
//!
//! Everything the exports used to reach through file-scope globals lives in
//! one `BridgeContext`: the rendering thread id, the initial-orientation
//! flag and the cached VM/activity references. The context is created once
//! at library load and never re-initialized.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Mutex, OnceLock};

use jni::objects::GlobalRef;
use jni::JavaVM;
use log::warn;

static CONTEXT: OnceLock<BridgeContext> = OnceLock::new();

/// Returns the process-wide context, creating the empty slots on first use.
pub fn context() -> &'static BridgeContext {
    CONTEXT.get_or_init(BridgeContext::new)
}

pub struct BridgeContext {
    rendering_thread: AtomicI64,
    orientation_flipped: AtomicBool,
    vm: Mutex<Option<JavaVM>>,
    activity: Mutex<Option<GlobalRef>>,
}

impl BridgeContext {
    fn new() -> Self {
        Self {
            rendering_thread: AtomicI64::new(0),
            orientation_flipped: AtomicBool::new(false),
            vm: Mutex::new(None),
            activity: Mutex::new(None),
        }
    }

    /// Record the calling thread as the rendering thread.
    pub fn set_rendering_thread(&self, thread_id: i64) {
        self.rendering_thread.store(thread_id, Ordering::Release);
    }

    pub fn rendering_thread(&self) -> i64 {
        self.rendering_thread.load(Ordering::Acquire)
    }

    /// When set, a 180 degree surface transform is remapped to identity; the
    /// device started upside down relative to its natural orientation.
    pub fn set_orientation_flipped(&self, flipped: bool) {
        self.orientation_flipped.store(flipped, Ordering::Release);
    }

    pub fn orientation_flipped(&self) -> bool {
        self.orientation_flipped.load(Ordering::Acquire)
    }

    /// Cache the VM handed over at library load. Set once; a second store is
    /// ignored with a warning.
    pub fn store_vm(&self, vm: JavaVM) {
        let mut slot = self.vm.lock().unwrap();
        if slot.is_some() {
            warn!("JavaVM already cached, ignoring re-initialization");
            return;
        }
        *slot = Some(vm);
    }

    pub fn with_vm<R>(&self, f: impl FnOnce(&JavaVM) -> R) -> Option<R> {
        self.vm.lock().unwrap().as_ref().map(f)
    }

    /// Cache the activity reference. Same set-once contract as the VM slot.
    pub fn store_activity(&self, activity: GlobalRef) {
        let mut slot = self.activity.lock().unwrap();
        if slot.is_some() {
            warn!("activity reference already cached, ignoring re-initialization");
            return;
        }
        *slot = Some(activity);
    }

    pub fn with_activity<R>(&self, f: impl FnOnce(&GlobalRef) -> R) -> Option<R> {
        self.activity.lock().unwrap().as_ref().map(f)
    }
}
