//! JNI string marshaling with owned buffers.
//!
//! The byte buffer handed back is an owned `CString`: whoever receives it
//! frees it by dropping it. Nothing here depends on a matching free call in
//! another helper.

use std::ffi::CString;

use jni::objects::JString;
use jni::JNIEnv;

use crate::BridgeError;

/// Copy a Java string into an owned, null-terminated buffer.
///
/// The intermediate `JavaStr` releases the JNI chars when it goes out of
/// scope; the returned `CString` is independent of the VM.
pub fn owned_cstring(env: &mut JNIEnv<'_>, value: &JString<'_>) -> Result<CString, BridgeError> {
    let java = env.get_string(value)?;
    let copied: String = java.into();
    Ok(CString::new(copied)?)
}
