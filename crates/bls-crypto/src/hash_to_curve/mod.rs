/// Implementation of the `MapToGroup` algorithm (Paragraph
/// 3.3) of [this paper](https://link.springer.com/content/pdf/10.1007/3-540-45682-1_30.pdf)
///
/// This method involves hashing the data along with a counter. If the hash can then be interpreted
/// as an elliptic curve point, it returns. If not, it increments the counter and tries again.
///
/// **This algorithm is not constant time**.
///
/// # Examples
///
/// ```rust
/// use bls_crypto::{SIG_DOMAIN, hash_to_curve::{HashToCurve, try_and_increment::DIRECT_HASH_TO_G1}};
///
/// // Instantiate the lazily evaluated hasher to BLS 12-377.
/// let hasher = &*DIRECT_HASH_TO_G1;
///
/// // Hash the data. The domain must be at most 8 bytes.
/// let hash = hasher.hash(SIG_DOMAIN, &b"some_data"[..]).expect("should not fail");
/// ```
pub mod try_and_increment;

use crate::BLSError;

/// Trait for hashing arbitrary data to a group element on an elliptic curve
pub trait HashToCurve {
    /// The type of the curve being used.
    type Output;

    /// Given a domain separator and a message, produces a hash of them which is a curve point.
    fn hash(&self, domain: &[u8], message: &[u8]) -> Result<Self::Output, BLSError>;
}
