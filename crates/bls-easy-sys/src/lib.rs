//! C ABI for BLS signatures over the BLS12-377 curve.
//!
//! Every object handed to the caller is an opaque heap handle owned by the caller until it is
//! passed to the matching `bls_free_*` function, exactly once. Strings returned by the
//! library must be released with [`strings::bls_free_string`].
//!
//! Failures are reported in one of two ways. Functions that create an object return null.
//! Functions that act on existing objects return an [`ErrorCode`] as a `c_int`. No input,
//! null or malformed, makes the library unwind into the caller: panics are caught at the
//! boundary and turned into the null/error-code result of the function.
//!
//! # Threading
//!
//! Distinct handles may be used from different threads at the same time. Releasing a
//! handle while another thread is still using it, or releasing it twice, is undefined
//! behaviour and is not detected.

use bls_crypto::hash_to_curve::try_and_increment::DIRECT_HASH_TO_G1;
use log::{debug, error, warn};
use once_cell::sync::Lazy;

use std::{
    any::Any,
    os::raw::c_int,
    panic::{self, AssertUnwindSafe},
    ptr,
};

pub mod diagnostics;
pub mod error;
pub mod handle;
pub(crate) mod message;
pub mod serialization;
pub mod signatures;
pub mod strings;

pub use error::{
    ErrorCode, FfiError, BLS_ERROR_DESERIALIZATION_FAILED, BLS_ERROR_INTERNAL_ERROR,
    BLS_ERROR_INVALID_INPUT, BLS_ERROR_INVALID_KEY_FORMAT, BLS_ERROR_INVALID_MESSAGE_FORMAT,
    BLS_ERROR_INVALID_SIGNATURE_FORMAT, BLS_ERROR_KEY_GENERATION_FAILED,
    BLS_ERROR_MEMORY_ALLOCATION_FAILED, BLS_ERROR_MEMORY_DEALLOCATION_FAILED,
    BLS_ERROR_SERIALIZATION_FAILED, BLS_ERROR_SIGNATURE_VERIFICATION_FAILED, BLS_SUCCESS,
};
pub use handle::{BLSPublicKey, BLSSecretKey, BLSSignature};

#[no_mangle]
/// Initializes the lazily evaluated hasher and installs the `RUST_LOG` driven logger.
/// Calling it is optional and calling it more than once is harmless.
pub extern "C" fn bls_init() {
    let _ = panic::catch_unwind(|| {
        Lazy::force(&DIRECT_HASH_TO_G1);
        // another logger may already be installed by the host
        let _ = env_logger::try_init();
    });
}

fn log_error(context: &str, e: &FfiError) {
    match e {
        FfiError::NullPointer(_) => warn!("{}: {}", context, e),
        FfiError::VerificationFailed => debug!("{}: {}", context, e),
        _ => error!("{}: {}", context, e),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic payload"
    }
}

/// Runs the body of a code-returning entry point. Errors become their code, a panic
/// becomes `on_panic`.
pub(crate) fn convert_result_to_code<F>(context: &str, on_panic: ErrorCode, f: F) -> c_int
where
    F: FnOnce() -> Result<(), FfiError>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => BLS_SUCCESS,
        Ok(Err(e)) => {
            log_error(context, &e);
            e.code().into()
        }
        Err(payload) => {
            error!("{}: caught panic: {}", context, panic_message(&*payload));
            on_panic.into()
        }
    }
}

/// Runs the body of an object-producing entry point. Errors and panics become null.
pub(crate) fn convert_result_to_ptr<T, F>(context: &str, f: F) -> *mut T
where
    F: FnOnce() -> Result<*mut T, FfiError>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(ptr)) => ptr,
        Ok(Err(e)) => {
            log_error(context, &e);
            ptr::null_mut()
        }
        Err(payload) => {
            error!("{}: caught panic: {}", context, panic_message(&*payload));
            ptr::null_mut()
        }
    }
}

/// Rejects a null pointer argument, naming it in the error.
pub(crate) fn not_null<T>(ptr: *const T, name: &'static str) -> Result<(), FfiError> {
    if ptr.is_null() {
        return Err(FfiError::NullPointer(name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panics_become_codes_and_null() {
        let code = convert_result_to_code("test", ErrorCode::InternalError, || panic!("boom"));
        assert_eq!(code, BLS_ERROR_INTERNAL_ERROR);

        let code = convert_result_to_code("test", ErrorCode::MemoryDeallocationFailed, || {
            panic!("{}", String::from("boom"))
        });
        assert_eq!(code, BLS_ERROR_MEMORY_DEALLOCATION_FAILED);

        let ptr: *mut u8 = convert_result_to_ptr("test", || panic!("boom"));
        assert!(ptr.is_null());
    }

    #[test]
    fn errors_map_to_their_code() {
        let code = convert_result_to_code("test", ErrorCode::InternalError, || {
            Err(FfiError::NullPointer("thing"))
        });
        assert_eq!(code, BLS_ERROR_INVALID_INPUT);

        let code = convert_result_to_code("test", ErrorCode::InternalError, || {
            Err(FfiError::VerificationFailed)
        });
        assert_eq!(code, BLS_ERROR_SIGNATURE_VERIFICATION_FAILED);

        let code = convert_result_to_code("test", ErrorCode::InternalError, || Ok(()));
        assert_eq!(code, BLS_SUCCESS);
    }

    #[test]
    fn init_is_idempotent() {
        bls_init();
        bls_init();
    }

    #[test]
    fn not_null_names_the_argument() {
        let value = 5u8;
        assert!(not_null(&value as *const u8, "value").is_ok());
        match not_null(ptr::null::<u8>(), "message") {
            Err(FfiError::NullPointer(name)) => assert_eq!(name, "message"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
