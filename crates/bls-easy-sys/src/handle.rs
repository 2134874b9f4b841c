//! Opaque handles and their single release path.

use crate::{
    convert_result_to_code,
    diagnostics::{record_allocation, record_release, ObjectKind},
    error::{ErrorCode, FfiError},
};
use bls_crypto::{PublicKey, SecretKey, Signature};

use std::os::raw::c_int;

/// Opaque secret key. Only reachable through the `bls_*` functions.
pub struct BLSSecretKey {
    pub(crate) secret_key: SecretKey,
}

/// Opaque public key.
pub struct BLSPublicKey {
    pub(crate) public_key: PublicKey,
}

/// Opaque signature.
pub struct BLSSignature {
    pub(crate) signature: Signature,
}

pub(crate) trait Opaque: Sized {
    const KIND: ObjectKind;
}

impl Opaque for BLSSecretKey {
    const KIND: ObjectKind = ObjectKind::SecretKey;
}

impl Opaque for BLSPublicKey {
    const KIND: ObjectKind = ObjectKind::PublicKey;
}

impl Opaque for BLSSignature {
    const KIND: ObjectKind = ObjectKind::Signature;
}

/// Exclusive ownership of a handle on the library side. `into_raw` gives it to the caller,
/// `from_raw` takes it back and `release` consumes it, so a value can only be freed once
/// through this type.
pub(crate) struct Owned<T: Opaque>(Box<T>);

impl<T: Opaque> Owned<T> {
    pub(crate) fn new(value: T) -> Self {
        Owned(Box::new(value))
    }

    pub(crate) fn into_raw(self) -> *mut T {
        record_allocation(T::KIND);
        Box::into_raw(self.0)
    }

    /// # Safety
    ///
    /// `ptr` must be null or a live pointer obtained from [`Owned::into_raw`].
    pub(crate) unsafe fn from_raw(ptr: *mut T) -> Result<Self, FfiError> {
        if ptr.is_null() {
            return Err(FfiError::NullPointer(T::KIND.name()));
        }
        Ok(Owned(Box::from_raw(ptr)))
    }

    pub(crate) fn release(self) {
        drop(self.0);
        record_release(T::KIND);
    }
}

/// Borrows the object behind a caller supplied handle.
///
/// # Safety
///
/// `ptr` must be null or a live handle of the right kind that outlives `'a`.
pub(crate) unsafe fn borrow<'a, T: Opaque>(ptr: *const T) -> Result<&'a T, FfiError> {
    ptr.as_ref().ok_or(FfiError::NullPointer(T::KIND.name()))
}

/// Stores a new handle in a caller supplied out slot.
///
/// # Safety
///
/// `out` must be valid for writes.
pub(crate) unsafe fn write_out<T: Opaque>(out: *mut *mut T, value: T) {
    *out = Owned::new(value).into_raw();
}

unsafe fn release<T: Opaque>(context: &str, ptr: *mut T) -> c_int {
    convert_result_to_code(context, ErrorCode::MemoryDeallocationFailed, || {
        Owned::from_raw(ptr)?.release();
        Ok(())
    })
}

/// # Safety
///
/// This function must only be called on null or a valid BLSSecretKey instance pointer,
/// at most once per pointer.
#[no_mangle]
pub unsafe extern "C" fn bls_free_secret_key(secret_key: *mut BLSSecretKey) -> c_int {
    release("bls_free_secret_key", secret_key)
}

/// # Safety
///
/// This function must only be called on null or a valid BLSPublicKey instance pointer,
/// at most once per pointer.
#[no_mangle]
pub unsafe extern "C" fn bls_free_public_key(public_key: *mut BLSPublicKey) -> c_int {
    release("bls_free_public_key", public_key)
}

/// # Safety
///
/// This function must only be called on null or a valid BLSSignature instance pointer,
/// at most once per pointer.
#[no_mangle]
pub unsafe extern "C" fn bls_free_signature(signature: *mut BLSSignature) -> c_int {
    release("bls_free_signature", signature)
}
