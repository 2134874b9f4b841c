//! Strings handed to the caller. They come from the Rust allocator, which need not be the
//! caller's, so they must come back through `bls_free_string` and nothing else.

use crate::{
    convert_result_to_code,
    diagnostics::{record_allocation, record_release, ObjectKind},
    error::{ErrorCode, FfiError},
    not_null,
};

use std::{
    ffi::CString,
    os::raw::{c_char, c_int},
};

/// Moves `text` into a NUL terminated buffer owned by the caller. The buffer is reserved
/// up front so that running out of memory is reported instead of aborting.
pub(crate) fn into_owned_string(text: String) -> Result<*mut c_char, FfiError> {
    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(text.len() + 1)
        .map_err(|_| FfiError::AllocationFailed)?;
    bytes.extend_from_slice(text.as_bytes());
    let c_string = CString::new(bytes)?;
    record_allocation(ObjectKind::String);
    Ok(c_string.into_raw())
}

/// Releases a string returned by this library.
///
/// # Safety
///
/// `s` must be null or a pointer returned by this library that has not been released yet
/// and whose contents have not been modified.
#[no_mangle]
pub unsafe extern "C" fn bls_free_string(s: *mut c_char) -> c_int {
    convert_result_to_code("bls_free_string", ErrorCode::MemoryDeallocationFailed, || {
        not_null(s, "string")?;
        drop(CString::from_raw(s));
        record_release(ObjectKind::String);
        Ok(())
    })
}
