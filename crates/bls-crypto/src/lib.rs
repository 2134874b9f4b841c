//! # BLS Cryptography
//!
//! This crate implements BLS signatures over the BLS12-377 curve. Signatures live in G1
//! and public keys in G2. Messages are mapped to G1 with a try-and-increment hasher built
//! on Blake2Xs.
/// BLS signing
pub(crate) mod bls;
pub use bls::{PublicKey, SecretKey, Signature};

/// Hashing to curve utilities
pub mod hash_to_curve;
pub use hash_to_curve::HashToCurve;

/// Useful hash functions
pub mod hashers;
pub use hashers::Hasher;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

use thiserror::Error;

/// Convenience result alias
pub type BlsResult<T> = std::result::Result<T, BLSError>;

/// Domain separator for signing messages
pub const SIG_DOMAIN: &[u8] = b"BLSEZsig";

/// Length of a serialized secret key (a BLS12-377 scalar)
pub const SECRET_KEY_LENGTH: usize = 32;

/// Length of a compressed public key (a G2 point)
pub const PUBLIC_KEY_LENGTH: usize = 96;

/// Length of a compressed signature (a G1 point)
pub const SIGNATURE_LENGTH: usize = 48;

#[derive(Debug, Error)]
/// Error type
pub enum BLSError {
    /// The pairing check did not hold
    #[error("signature verification failed")]
    VerificationFailed,
    /// An IO error
    #[error("io error {0}")]
    IoError(#[from] std::io::Error),
    /// Personalization string cannot be larger than 8 bytes
    #[error("domain length is too large: {0}")]
    DomainTooLarge(usize),
    /// Blake2X encodes the requested output length in 16 bits
    #[error("xof digest length is too large: {0}")]
    DigestTooLarge(usize),
    #[error("could not hash to curve")]
    HashToCurveError,
    #[error("invalid encoding length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },
    #[error("secret key must not be zero")]
    ZeroSecretKey,
    #[error("point must not be the identity")]
    IdentityPoint,
    #[error("{0}")]
    SerializationError(#[from] ark_serialize::SerializationError),
}
