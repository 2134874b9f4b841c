//! Hex text encodings of keys and signatures.
//!
//! The text is the lowercase hex of the canonical compressed byte form: 64 characters for
//! a secret key, 192 for a public key and 96 for a signature. Decoding also accepts
//! uppercase digits.

use crate::{
    convert_result_to_code, convert_result_to_ptr,
    error::{DecodeError, ErrorCode, FfiError},
    handle::{borrow, write_out, BLSPublicKey, BLSSecretKey, BLSSignature, Opaque},
    not_null,
    strings::into_owned_string,
};
use bls_crypto::{BlsResult, PublicKey, SecretKey, Signature};

use std::{
    ffi::CStr,
    os::raw::{c_char, c_int},
    ptr,
};

/// An opaque type with a canonical byte encoding.
pub(crate) trait Encoded: Opaque {
    fn to_bytes(&self) -> BlsResult<Vec<u8>>;

    fn from_bytes(bytes: &[u8]) -> BlsResult<Self>;

    /// Wraps a decoding failure in the error of this kind.
    fn format_error(e: DecodeError) -> FfiError;
}

impl Encoded for BLSSecretKey {
    fn to_bytes(&self) -> BlsResult<Vec<u8>> {
        self.secret_key.to_bytes()
    }

    fn from_bytes(bytes: &[u8]) -> BlsResult<Self> {
        let secret_key = SecretKey::from_bytes(bytes)?;
        Ok(BLSSecretKey { secret_key })
    }

    fn format_error(e: DecodeError) -> FfiError {
        FfiError::InvalidKeyFormat(e)
    }
}

impl Encoded for BLSPublicKey {
    fn to_bytes(&self) -> BlsResult<Vec<u8>> {
        self.public_key.to_bytes()
    }

    fn from_bytes(bytes: &[u8]) -> BlsResult<Self> {
        let public_key = PublicKey::from_bytes(bytes)?;
        Ok(BLSPublicKey { public_key })
    }

    fn format_error(e: DecodeError) -> FfiError {
        FfiError::InvalidKeyFormat(e)
    }
}

impl Encoded for BLSSignature {
    fn to_bytes(&self) -> BlsResult<Vec<u8>> {
        self.signature.to_bytes()
    }

    fn from_bytes(bytes: &[u8]) -> BlsResult<Self> {
        let signature = Signature::from_bytes(bytes)?;
        Ok(BLSSignature { signature })
    }

    fn format_error(e: DecodeError) -> FfiError {
        FfiError::InvalidSignatureFormat(e)
    }
}

pub(crate) fn encode<T: Encoded>(value: &T) -> Result<String, FfiError> {
    let bytes = value
        .to_bytes()
        .map_err(|e| FfiError::Serialization(T::KIND.name(), e))?;
    Ok(hex::encode(bytes))
}

pub(crate) fn decode<T: Encoded>(text: &str) -> Result<T, FfiError> {
    let bytes = hex::decode(text).map_err(|e| T::format_error(e.into()))?;
    T::from_bytes(&bytes).map_err(|e| T::format_error(e.into()))
}

unsafe fn to_string<T: Encoded>(context: &str, value: *const T) -> *mut c_char {
    convert_result_to_ptr(context, || into_owned_string(encode(borrow(value)?)?))
}

unsafe fn from_string<T: Encoded>(context: &str, text: *const c_char, out: *mut *mut T) -> c_int {
    convert_result_to_code(context, ErrorCode::InternalError, || {
        not_null(out, "out")?;
        *out = ptr::null_mut();
        not_null(text, "text")?;
        let text = CStr::from_ptr(text)
            .to_str()
            .map_err(FfiError::Deserialization)?;
        write_out(out, decode::<T>(text)?);
        Ok(())
    })
}

/// Hex encodes a secret key into a string owned by the caller. Returns null if the key is
/// null.
///
/// # Safety
///
/// `secret_key` must be null or a live BLSSecretKey handle.
#[no_mangle]
pub unsafe extern "C" fn bls_secret_key_to_string(secret_key: *const BLSSecretKey) -> *mut c_char {
    to_string("bls_secret_key_to_string", secret_key)
}

/// # Safety
///
/// `public_key` must be null or a live BLSPublicKey handle.
#[no_mangle]
pub unsafe extern "C" fn bls_public_key_to_string(public_key: *const BLSPublicKey) -> *mut c_char {
    to_string("bls_public_key_to_string", public_key)
}

/// # Safety
///
/// `signature` must be null or a live BLSSignature handle.
#[no_mangle]
pub unsafe extern "C" fn bls_signature_to_string(signature: *const BLSSignature) -> *mut c_char {
    to_string("bls_signature_to_string", signature)
}

/// Decodes the text produced by `bls_secret_key_to_string`. On success `*out` holds a new
/// handle owned by the caller, on failure it is null.
///
/// # Safety
///
/// `text` must be null or a NUL terminated string. `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn bls_secret_key_from_string(
    text: *const c_char,
    out: *mut *mut BLSSecretKey,
) -> c_int {
    from_string("bls_secret_key_from_string", text, out)
}

/// # Safety
///
/// `text` must be null or a NUL terminated string. `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn bls_public_key_from_string(
    text: *const c_char,
    out: *mut *mut BLSPublicKey,
) -> c_int {
    from_string("bls_public_key_from_string", text, out)
}

/// # Safety
///
/// `text` must be null or a NUL terminated string. `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn bls_signature_from_string(
    text: *const c_char,
    out: *mut *mut BLSSignature,
) -> c_int {
    from_string("bls_signature_from_string", text, out)
}
