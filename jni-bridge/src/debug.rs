//! Native debugger hooks.

use log::debug;

/// Break codes at or above this raise SIGTRAP; lower codes only log.
pub const TRAP_THRESHOLD: i32 = 3;

/// Breakpoint anchor for native debugging.
///
/// The managed side calls this at interesting checkpoints with a code
/// describing the checkpoint. Codes at or above [`TRAP_THRESHOLD`] raise
/// SIGTRAP on the calling thread so an attached debugger stops right at the
/// checkpoint; lower codes are log-only markers.
pub fn debug_break(code: i32) {
    debug!("debug_break({code})");
    if code >= TRAP_THRESHOLD {
        unsafe { libc::raise(libc::SIGTRAP) };
    }
}
