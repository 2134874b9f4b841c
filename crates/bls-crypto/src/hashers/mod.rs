mod direct;
pub use direct::DirectHasher;

/// Maximum length of a domain separator, bounded by the Blake2s personalization field.
pub const MAX_DOMAIN_LENGTH: usize = 8;

/// Two-stage hashing: a collision resistant compression (CRH) of the message followed by an
/// extendable output function (XOF) that stretches the digest to the requested length.
pub trait Hasher {
    type Error;

    /// Compresses `message` under `domain`. `xof_digest_length` is the final output length
    /// and is bound into the compression so that different output lengths never collide.
    fn crh(
        &self,
        domain: &[u8],
        message: &[u8],
        xof_digest_length: usize,
    ) -> Result<Vec<u8>, Self::Error>;

    /// Expands an already compressed message to `output_size_in_bytes`.
    fn xof(
        &self,
        domain: &[u8],
        hashed_message: &[u8],
        output_size_in_bytes: usize,
    ) -> Result<Vec<u8>, Self::Error>;

    fn hash(
        &self,
        domain: &[u8],
        message: &[u8],
        output_size_in_bytes: usize,
    ) -> Result<Vec<u8>, Self::Error> {
        let prepared_message = self.crh(domain, message, output_size_in_bytes)?;
        self.xof(domain, &prepared_message, output_size_in_bytes)
    }
}
