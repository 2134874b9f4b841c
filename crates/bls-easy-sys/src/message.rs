//! Reading untrusted message buffers from the caller.
//!
//! Text messages end at the first NUL and must be UTF-8. Byte messages are taken at their
//! full length, NUL bytes included. Both produce the exact bytes that get hashed, so a
//! signature made through one form verifies through the other for the same bytes.

use crate::error::FfiError;

use std::{ffi::CStr, os::raw::c_char, slice};

/// # Safety
///
/// `message` must be null or point to a NUL terminated buffer valid for `'a`.
pub(crate) unsafe fn text_message<'a>(message: *const c_char) -> Result<&'a [u8], FfiError> {
    if message.is_null() {
        return Err(FfiError::NullPointer("message"));
    }
    let text = CStr::from_ptr(message)
        .to_str()
        .map_err(FfiError::InvalidMessageText)?;
    Ok(text.as_bytes())
}

/// # Safety
///
/// `message` must be null or point to `len` readable bytes valid for `'a`.
pub(crate) unsafe fn byte_message<'a>(
    message: *const u8,
    len: usize,
) -> Result<&'a [u8], FfiError> {
    if message.is_null() {
        return Err(FfiError::NullPointer("message"));
    }
    if len > isize::MAX as usize {
        return Err(FfiError::MessageTooLong(len));
    }
    Ok(slice::from_raw_parts(message, len))
}
