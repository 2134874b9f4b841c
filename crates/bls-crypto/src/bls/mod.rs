/// Implements BLS signatures as specified in https://crypto.stanford.edu/~dabo/pubs/papers/BLSmultisig.html.
mod secret;
pub use secret::SecretKey;

mod public;
pub use public::PublicKey;

mod signature;
pub use signature::Signature;

use crate::{BLSError, BlsResult};

/// Fails unless `bytes` is exactly `expected` long. The canonical decoders stop reading at
/// the end of the object, so trailing bytes would otherwise be ignored silently.
pub(crate) fn check_length(bytes: &[u8], expected: usize) -> BlsResult<()> {
    if bytes.len() != expected {
        return Err(BLSError::InvalidLength {
            expected,
            got: bytes.len(),
        });
    }
    Ok(())
}
