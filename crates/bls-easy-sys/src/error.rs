//! The error codes returned across the C ABI and the Rust-side error they are derived from.

use crate::strings::into_owned_string;
use bls_crypto::BLSError;
use thiserror::Error;

use std::{ffi::NulError, os::raw::c_char, os::raw::c_int, str::Utf8Error};

/// Stable integer codes. Zero is success, every failure is negative. Codes are never reused.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Success = 0,
    InvalidInput = -1,
    SignatureVerificationFailed = -2,
    MemoryAllocationFailed = -3,
    MemoryDeallocationFailed = -4,
    SerializationFailed = -5,
    DeserializationFailed = -6,
    InvalidKeyFormat = -7,
    InvalidSignatureFormat = -8,
    InvalidMessageFormat = -9,
    KeyGenerationFailed = -10,
    InternalError = -11,
}

pub const BLS_SUCCESS: c_int = ErrorCode::Success as c_int;
pub const BLS_ERROR_INVALID_INPUT: c_int = ErrorCode::InvalidInput as c_int;
pub const BLS_ERROR_SIGNATURE_VERIFICATION_FAILED: c_int =
    ErrorCode::SignatureVerificationFailed as c_int;
pub const BLS_ERROR_MEMORY_ALLOCATION_FAILED: c_int = ErrorCode::MemoryAllocationFailed as c_int;
pub const BLS_ERROR_MEMORY_DEALLOCATION_FAILED: c_int =
    ErrorCode::MemoryDeallocationFailed as c_int;
pub const BLS_ERROR_SERIALIZATION_FAILED: c_int = ErrorCode::SerializationFailed as c_int;
pub const BLS_ERROR_DESERIALIZATION_FAILED: c_int = ErrorCode::DeserializationFailed as c_int;
pub const BLS_ERROR_INVALID_KEY_FORMAT: c_int = ErrorCode::InvalidKeyFormat as c_int;
pub const BLS_ERROR_INVALID_SIGNATURE_FORMAT: c_int = ErrorCode::InvalidSignatureFormat as c_int;
pub const BLS_ERROR_INVALID_MESSAGE_FORMAT: c_int = ErrorCode::InvalidMessageFormat as c_int;
pub const BLS_ERROR_KEY_GENERATION_FAILED: c_int = ErrorCode::KeyGenerationFailed as c_int;
pub const BLS_ERROR_INTERNAL_ERROR: c_int = ErrorCode::InternalError as c_int;

/// Message for any code outside the enumeration.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

impl ErrorCode {
    pub const ALL: [ErrorCode; 12] = [
        ErrorCode::Success,
        ErrorCode::InvalidInput,
        ErrorCode::SignatureVerificationFailed,
        ErrorCode::MemoryAllocationFailed,
        ErrorCode::MemoryDeallocationFailed,
        ErrorCode::SerializationFailed,
        ErrorCode::DeserializationFailed,
        ErrorCode::InvalidKeyFormat,
        ErrorCode::InvalidSignatureFormat,
        ErrorCode::InvalidMessageFormat,
        ErrorCode::KeyGenerationFailed,
        ErrorCode::InternalError,
    ];

    pub fn from_code(code: c_int) -> Option<ErrorCode> {
        ErrorCode::ALL.iter().copied().find(|e| c_int::from(*e) == code)
    }

    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::Success => "Success",
            ErrorCode::InvalidInput => "Invalid input parameter",
            ErrorCode::SignatureVerificationFailed => "Signature verification failed",
            ErrorCode::MemoryAllocationFailed => "Memory allocation failed",
            ErrorCode::MemoryDeallocationFailed => "Memory deallocation failed",
            ErrorCode::SerializationFailed => "Serialization failed",
            ErrorCode::DeserializationFailed => "Deserialization failed",
            ErrorCode::InvalidKeyFormat => "Invalid key format",
            ErrorCode::InvalidSignatureFormat => "Invalid signature format",
            ErrorCode::InvalidMessageFormat => "Invalid message format",
            ErrorCode::KeyGenerationFailed => "Key generation failed",
            ErrorCode::InternalError => "Internal error",
        }
    }
}

impl From<ErrorCode> for c_int {
    fn from(code: ErrorCode) -> c_int {
        code as c_int
    }
}

/// Total over `c_int`: unknown codes get [`UNKNOWN_ERROR_MESSAGE`].
pub fn error_message(code: c_int) -> &'static str {
    ErrorCode::from_code(code).map_or(UNKNOWN_ERROR_MESSAGE, ErrorCode::message)
}

/// Why a textual key or signature could not be turned back into an object.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("not a hex string: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error(transparent)]
    Encoding(#[from] BLSError),
}

#[derive(Debug, Error)]
pub enum FfiError {
    #[error("null pointer passed as `{0}`")]
    NullPointer(&'static str),
    #[error("signature verification failed")]
    VerificationFailed,
    #[error("memory allocation failed")]
    AllocationFailed,
    #[error("could not serialize {0}: {1}")]
    Serialization(&'static str, #[source] BLSError),
    #[error("returned string would contain a NUL byte: {0}")]
    InteriorNul(#[from] NulError),
    #[error("encoded text is not valid UTF-8: {0}")]
    Deserialization(#[source] Utf8Error),
    #[error("invalid key encoding: {0}")]
    InvalidKeyFormat(#[source] DecodeError),
    #[error("invalid signature encoding: {0}")]
    InvalidSignatureFormat(#[source] DecodeError),
    #[error("message is not valid UTF-8: {0}")]
    InvalidMessageText(#[source] Utf8Error),
    #[error("message length {0} exceeds the addressable size")]
    MessageTooLong(usize),
    #[error("could not seed the key generator: {0}")]
    KeyGeneration(#[source] rand::Error),
    #[error("BLS library error: {0}")]
    Crypto(#[from] BLSError),
}

impl FfiError {
    /// The single place where internal failures are mapped onto the public codes.
    pub fn code(&self) -> ErrorCode {
        match self {
            FfiError::NullPointer(_) => ErrorCode::InvalidInput,
            FfiError::VerificationFailed => ErrorCode::SignatureVerificationFailed,
            FfiError::AllocationFailed => ErrorCode::MemoryAllocationFailed,
            FfiError::Serialization(..) | FfiError::InteriorNul(_) => {
                ErrorCode::SerializationFailed
            }
            FfiError::Deserialization(_) => ErrorCode::DeserializationFailed,
            FfiError::InvalidKeyFormat(_) => ErrorCode::InvalidKeyFormat,
            FfiError::InvalidSignatureFormat(_) => ErrorCode::InvalidSignatureFormat,
            FfiError::InvalidMessageText(_) | FfiError::MessageTooLong(_) => {
                ErrorCode::InvalidMessageFormat
            }
            FfiError::KeyGeneration(_) => ErrorCode::KeyGenerationFailed,
            FfiError::Crypto(_) => ErrorCode::InternalError,
        }
    }
}

/// Returns a library-owned description of `code`, to be released with `bls_free_string`.
/// Unknown codes get a generic message. Null is only returned if the string cannot be
/// allocated.
#[no_mangle]
pub extern "C" fn bls_get_error_message(code: c_int) -> *mut c_char {
    crate::convert_result_to_ptr("bls_get_error_message", || {
        into_owned_string(error_message(code).to_owned())
    })
}

/// 1 if `code` is success, 0 otherwise.
#[no_mangle]
pub extern "C" fn bls_is_success(code: c_int) -> c_int {
    (code == BLS_SUCCESS) as c_int
}

/// 1 if `code` is any failure, known or not. Always the opposite of `bls_is_success`.
#[no_mangle]
pub extern "C" fn bls_is_error(code: c_int) -> c_int {
    (code != BLS_SUCCESS) as c_int
}
