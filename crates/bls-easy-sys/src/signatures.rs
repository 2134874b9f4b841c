use crate::{
    convert_result_to_code, convert_result_to_ptr,
    error::{ErrorCode, FfiError},
    handle::{borrow, BLSPublicKey, BLSSecretKey, BLSSignature, Owned},
    message::{byte_message, text_message},
    not_null,
};
use bls_crypto::{hash_to_curve::try_and_increment::DIRECT_HASH_TO_G1, BLSError, SecretKey};
use rand::{
    rngs::{OsRng, StdRng},
    SeedableRng,
};

use std::os::raw::{c_char, c_int};

/// Generates a secret key from the operating system's entropy source. Returns null if the
/// entropy source fails.
#[no_mangle]
pub extern "C" fn bls_generate_secret_key() -> *mut BLSSecretKey {
    convert_result_to_ptr("bls_generate_secret_key", || {
        let mut rng = StdRng::from_rng(OsRng).map_err(FfiError::KeyGeneration)?;
        let secret_key = SecretKey::generate(&mut rng);
        Ok(Owned::new(BLSSecretKey { secret_key }).into_raw())
    })
}

/// Derives the public key of `secret_key`, which stays owned by the caller. Returns null if
/// `secret_key` is null.
///
/// # Safety
///
/// `secret_key` must be null or a live BLSSecretKey handle.
#[no_mangle]
pub unsafe extern "C" fn bls_get_public_key(secret_key: *const BLSSecretKey) -> *mut BLSPublicKey {
    convert_result_to_ptr("bls_get_public_key", || {
        let public_key = borrow(secret_key)?.secret_key.to_public();
        Ok(Owned::new(BLSPublicKey { public_key }).into_raw())
    })
}

fn sign(secret_key: &BLSSecretKey, message: &[u8]) -> Result<*mut BLSSignature, FfiError> {
    let signature = secret_key.secret_key.sign(message, &*DIRECT_HASH_TO_G1)?;
    Ok(Owned::new(BLSSignature { signature }).into_raw())
}

/// Signs the bytes of a NUL terminated UTF-8 string. Returns null if either argument is
/// null or the text is not valid UTF-8. Signing is deterministic.
///
/// # Safety
///
/// `secret_key` must be null or a live BLSSecretKey handle. `message` must be null or a
/// NUL terminated string.
#[no_mangle]
pub unsafe extern "C" fn bls_sign(
    secret_key: *const BLSSecretKey,
    message: *const c_char,
) -> *mut BLSSignature {
    convert_result_to_ptr("bls_sign", || {
        not_null(secret_key, "secret key")?;
        not_null(message, "message")?;
        let message = text_message(message)?;
        sign(borrow(secret_key)?, message)
    })
}

/// Signs `message_len` bytes starting at `message`, embedded NUL bytes included. Returns
/// null if either pointer is null, even for an empty message.
///
/// # Safety
///
/// `secret_key` must be null or a live BLSSecretKey handle. `message` must be null or
/// point to `message_len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn bls_sign_bytes(
    secret_key: *const BLSSecretKey,
    message: *const u8,
    message_len: usize,
) -> *mut BLSSignature {
    convert_result_to_ptr("bls_sign_bytes", || {
        not_null(secret_key, "secret key")?;
        not_null(message, "message")?;
        let message = byte_message(message, message_len)?;
        sign(borrow(secret_key)?, message)
    })
}

fn verify(
    signature: &BLSSignature,
    message: &[u8],
    public_key: &BLSPublicKey,
) -> Result<(), FfiError> {
    public_key
        .public_key
        .verify(message, &signature.signature, &*DIRECT_HASH_TO_G1)
        .map_err(|e| match e {
            BLSError::VerificationFailed => FfiError::VerificationFailed,
            e => FfiError::Crypto(e),
        })
}

/// Verifies `signature` over the bytes of a NUL terminated UTF-8 string.
///
/// Returns `BLS_ERROR_INVALID_INPUT` if any argument is null (checked before anything
/// else), `BLS_ERROR_INVALID_MESSAGE_FORMAT` if the text is not UTF-8,
/// `BLS_ERROR_SIGNATURE_VERIFICATION_FAILED` if the signature does not match and
/// `BLS_SUCCESS` if it does.
///
/// # Safety
///
/// The handles must be null or live handles of their kind. `message` must be null or a
/// NUL terminated string.
#[no_mangle]
pub unsafe extern "C" fn bls_verify_signature(
    signature: *const BLSSignature,
    message: *const c_char,
    public_key: *const BLSPublicKey,
) -> c_int {
    convert_result_to_code("bls_verify_signature", ErrorCode::InternalError, || {
        not_null(signature, "signature")?;
        not_null(message, "message")?;
        not_null(public_key, "public key")?;
        let message = text_message(message)?;
        verify(borrow(signature)?, message, borrow(public_key)?)
    })
}

/// Verifies `signature` over `message_len` bytes starting at `message`. Same results as
/// `bls_verify_signature`.
///
/// # Safety
///
/// The handles must be null or live handles of their kind. `message` must be null or
/// point to `message_len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn bls_verify_signature_bytes(
    signature: *const BLSSignature,
    message: *const u8,
    message_len: usize,
    public_key: *const BLSPublicKey,
) -> c_int {
    convert_result_to_code("bls_verify_signature_bytes", ErrorCode::InternalError, || {
        not_null(signature, "signature")?;
        not_null(message, "message")?;
        not_null(public_key, "public key")?;
        let message = byte_message(message, message_len)?;
        verify(borrow(signature)?, message, borrow(public_key)?)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        handle::{bls_free_public_key, bls_free_secret_key, bls_free_signature},
        BLS_ERROR_INVALID_INPUT, BLS_ERROR_INVALID_MESSAGE_FORMAT,
        BLS_ERROR_SIGNATURE_VERIFICATION_FAILED, BLS_SUCCESS,
    };
    use std::{ffi::CString, ptr};

    struct Triple {
        sk: *mut BLSSecretKey,
        pk: *mut BLSPublicKey,
    }

    impl Triple {
        fn new() -> Self {
            let sk = bls_generate_secret_key();
            assert!(!sk.is_null());
            let pk = unsafe { bls_get_public_key(sk) };
            assert!(!pk.is_null());
            Triple { sk, pk }
        }
    }

    impl Drop for Triple {
        fn drop(&mut self) {
            unsafe {
                assert_eq!(bls_free_public_key(self.pk), BLS_SUCCESS);
                assert_eq!(bls_free_secret_key(self.sk), BLS_SUCCESS);
            }
        }
    }

    #[test]
    fn sign_and_verify() {
        let keys = Triple::new();
        let message = CString::new("Hello, BLS Easy World!").unwrap();
        let other = CString::new("Different message").unwrap();
        unsafe {
            let sig = bls_sign(keys.sk, message.as_ptr());
            assert!(!sig.is_null());
            assert_eq!(bls_verify_signature(sig, message.as_ptr(), keys.pk), BLS_SUCCESS);
            assert_eq!(
                bls_verify_signature(sig, other.as_ptr(), keys.pk),
                BLS_ERROR_SIGNATURE_VERIFICATION_FAILED
            );
            assert_eq!(bls_free_signature(sig), BLS_SUCCESS);
        }
    }

    #[test]
    fn public_key_derivation_is_deterministic() {
        let keys = Triple::new();
        unsafe {
            let again = bls_get_public_key(keys.sk);
            assert_eq!(borrow(again).unwrap().public_key, borrow(keys.pk).unwrap().public_key);
            assert_eq!(bls_free_public_key(again), BLS_SUCCESS);
        }
    }

    #[test]
    fn null_inputs_produce_null_or_invalid_input() {
        let keys = Triple::new();
        let message = CString::new("test").unwrap();
        unsafe {
            assert!(bls_get_public_key(ptr::null()).is_null());
            assert!(bls_sign(ptr::null(), message.as_ptr()).is_null());
            assert!(bls_sign(keys.sk, ptr::null()).is_null());
            assert!(bls_sign(ptr::null(), ptr::null()).is_null());
            assert!(bls_sign_bytes(keys.sk, ptr::null(), 0).is_null());
            assert!(bls_sign_bytes(ptr::null(), b"x".as_ptr(), 1).is_null());

            let sig = bls_sign(keys.sk, message.as_ptr());
            for &(s, m, p) in &[
                (ptr::null(), message.as_ptr(), keys.pk as *const BLSPublicKey),
                (ptr::null(), ptr::null(), keys.pk as *const BLSPublicKey),
                (ptr::null(), message.as_ptr(), ptr::null()),
                (sig as *const BLSSignature, ptr::null(), keys.pk as *const BLSPublicKey),
                (sig as *const BLSSignature, message.as_ptr(), ptr::null()),
                (ptr::null(), ptr::null(), ptr::null()),
            ] {
                assert_eq!(bls_verify_signature(s, m, p), BLS_ERROR_INVALID_INPUT);
            }
            assert_eq!(
                bls_verify_signature_bytes(sig, ptr::null(), 0, keys.pk),
                BLS_ERROR_INVALID_INPUT
            );
            assert_eq!(bls_free_signature(sig), BLS_SUCCESS);
        }
    }

    #[test]
    fn null_check_precedes_message_validation() {
        let keys = Triple::new();
        let bad_text = b"caf\xe9\0";
        unsafe {
            assert_eq!(
                bls_verify_signature(ptr::null(), bad_text.as_ptr() as *const c_char, keys.pk),
                BLS_ERROR_INVALID_INPUT
            );
        }
    }

    #[test]
    fn invalid_utf8_is_rejected_consistently() {
        let keys = Triple::new();
        let bad_text = b"caf\xe9\0";
        let good = CString::new("cafe").unwrap();
        unsafe {
            assert!(bls_sign(keys.sk, bad_text.as_ptr() as *const c_char).is_null());

            let sig = bls_sign(keys.sk, good.as_ptr());
            assert_eq!(
                bls_verify_signature(sig, bad_text.as_ptr() as *const c_char, keys.pk),
                BLS_ERROR_INVALID_MESSAGE_FORMAT
            );
            assert_eq!(bls_free_signature(sig), BLS_SUCCESS);
        }
    }

    #[test]
    fn text_and_byte_forms_agree() {
        let keys = Triple::new();
        let text = CString::new("same bytes").unwrap();
        unsafe {
            let from_text = bls_sign(keys.sk, text.as_ptr());
            let from_bytes = bls_sign_bytes(keys.sk, b"same bytes".as_ptr(), 10);
            assert_eq!(
                borrow(from_text).unwrap().signature,
                borrow(from_bytes).unwrap().signature
            );
            assert_eq!(
                bls_verify_signature_bytes(from_text, b"same bytes".as_ptr(), 10, keys.pk),
                BLS_SUCCESS
            );
            assert_eq!(bls_verify_signature(from_bytes, text.as_ptr(), keys.pk), BLS_SUCCESS);
            assert_eq!(bls_free_signature(from_text), BLS_SUCCESS);
            assert_eq!(bls_free_signature(from_bytes), BLS_SUCCESS);
        }
    }

    #[test]
    fn embedded_nul_is_signed_in_full() {
        let keys = Triple::new();
        let full = b"invalid\0message";
        let prefix = CString::new("invalid").unwrap();
        unsafe {
            let sig = bls_sign_bytes(keys.sk, full.as_ptr(), full.len());
            assert!(!sig.is_null());
            assert_eq!(
                bls_verify_signature_bytes(sig, full.as_ptr(), full.len(), keys.pk),
                BLS_SUCCESS
            );
            // the text form only sees the bytes before the terminator
            assert_eq!(
                bls_verify_signature(sig, prefix.as_ptr(), keys.pk),
                BLS_ERROR_SIGNATURE_VERIFICATION_FAILED
            );
            assert_eq!(bls_free_signature(sig), BLS_SUCCESS);
        }
    }

    #[test]
    fn wrong_public_key_fails_verification() {
        let signer = Triple::new();
        let other = Triple::new();
        let message = CString::new("hello").unwrap();
        unsafe {
            let sig = bls_sign(signer.sk, message.as_ptr());
            assert_eq!(
                bls_verify_signature(sig, message.as_ptr(), other.pk),
                BLS_ERROR_SIGNATURE_VERIFICATION_FAILED
            );
            assert_eq!(bls_free_signature(sig), BLS_SUCCESS);
        }
    }
}
