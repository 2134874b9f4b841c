use super::{Hasher, MAX_DOMAIN_LENGTH};
use crate::BLSError;

use blake2s_simd::Params;
use byteorder::{LittleEndian, WriteBytesExt};
use std::convert::TryFrom;

/// Blake2s as the CRH, Blake2Xs as the XOF, as described in https://blake2.net/blake2x.pdf
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectHasher;

const BLAKE2S_DIGEST_LENGTH: usize = 32;

/// Packs the node index and the total XOF output length into the 48 bit Blake2s node offset.
fn xof_digest_length_to_node_offset(
    node_offset: usize,
    xof_digest_length: usize,
) -> Result<u64, BLSError> {
    let length = u16::try_from(xof_digest_length)
        .map_err(|_| BLSError::DigestTooLarge(xof_digest_length))?;
    let mut xof_digest_length_bytes = [0u8; 2];
    (&mut xof_digest_length_bytes[..]).write_u16::<LittleEndian>(length)?;
    let offset = node_offset as u64
        | (u64::from(xof_digest_length_bytes[0]) << 32)
        | (u64::from(xof_digest_length_bytes[1]) << 40);
    Ok(offset)
}

fn check_domain(domain: &[u8]) -> Result<(), BLSError> {
    if domain.len() > MAX_DOMAIN_LENGTH {
        return Err(BLSError::DomainTooLarge(domain.len()));
    }
    Ok(())
}

impl Hasher for DirectHasher {
    type Error = BLSError;

    fn crh(
        &self,
        domain: &[u8],
        message: &[u8],
        xof_digest_length: usize,
    ) -> Result<Vec<u8>, Self::Error> {
        check_domain(domain)?;
        let hash_result = Params::new()
            .hash_length(BLAKE2S_DIGEST_LENGTH)
            .node_offset(xof_digest_length_to_node_offset(0, xof_digest_length)?)
            .personal(domain)
            .to_state()
            .update(message)
            .finalize()
            .as_bytes()
            .to_vec();
        Ok(hash_result)
    }

    fn xof(
        &self,
        domain: &[u8],
        hashed_message: &[u8],
        xof_digest_length: usize,
    ) -> Result<Vec<u8>, Self::Error> {
        check_domain(domain)?;
        let num_hashes = (xof_digest_length + BLAKE2S_DIGEST_LENGTH - 1) / BLAKE2S_DIGEST_LENGTH;

        let mut result = Vec::with_capacity(num_hashes * BLAKE2S_DIGEST_LENGTH);
        for i in 0..num_hashes {
            let hash_result = Params::new()
                .hash_length(BLAKE2S_DIGEST_LENGTH)
                .max_leaf_length(BLAKE2S_DIGEST_LENGTH as u32)
                .inner_hash_length(BLAKE2S_DIGEST_LENGTH)
                .fanout(0)
                .max_depth(0)
                .personal(domain)
                .node_offset(xof_digest_length_to_node_offset(i, xof_digest_length)?)
                .to_state()
                .update(hashed_message)
                .finalize();
            result.extend_from_slice(hash_result.as_bytes());
        }
        result.truncate(xof_digest_length);

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    #[test]
    fn test_crh_empty() {
        let msg: Vec<u8> = vec![];
        let result = DirectHasher.crh(&[], &msg, 96).unwrap();
        assert_eq!(result.len(), 32);
    }

    #[test]
    fn test_hash_random() {
        let mut rng = XorShiftRng::seed_from_u64(0x5dbe_6259);
        let msg: Vec<u8> = (0..9820 * 4 / 8).map(|_| rng.gen()).collect();
        let result = DirectHasher.hash(b"BLSEZsig", &msg, 96).unwrap();
        assert_eq!(result.len(), 96);
        assert_eq!(result, DirectHasher.hash(b"BLSEZsig", &msg, 96).unwrap());
    }

    #[test]
    fn output_length_is_exact_and_bound_into_the_hash() {
        let short = DirectHasher.hash(b"dom", b"msg", 48).unwrap();
        let long = DirectHasher.hash(b"dom", b"msg", 64).unwrap();
        assert_eq!(short.len(), 48);
        assert_eq!(long.len(), 64);
        assert_ne!(&short[..], &long[..48]);
    }

    #[test]
    fn domain_separates_outputs() {
        let a = DirectHasher.hash(b"domain_a", b"msg", 32).unwrap();
        let b = DirectHasher.hash(b"domain_b", b"msg", 32).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_long_domains_and_digests() {
        match DirectHasher.hash(b"ninebytes", b"msg", 32) {
            Err(BLSError::DomainTooLarge(9)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        match DirectHasher.hash(b"dom", b"msg", 1 << 16) {
            Err(BLSError::DigestTooLarge(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_blake2s_test_vectors() {
        let bytes = DirectHasher.hash(b"", &hex::decode("7f8a56d8b5fb1f038ffbfce79f185f4aad9d603094edb85457d6c84d6bc02a82644ee42da51e9c3bb18395f450092d39721c32e7f05ec4c1f22a8685fcb89721738335b57e4ee88a3b32df3762503aa98e4a9bd916ed385d265021391745f08b27c37dc7bc6cb603cc27e19baf47bf00a2ab2c32250c98d79d5e1170dee4068d9389d146786c2a0d1e08ade5").unwrap(), 96).unwrap();
        assert_eq!(hex::encode(&bytes), "87009aa74342449e10a3fd369e736fcb9ad1e7bd70ef007e6e2394b46c094074c86adf6c980be077fa6c4dc4af1ca0450a4f00cdd1a87e0c4f059f512832c2d92a1cde5de26d693ccd246a1530c0d6926185f9330d3524710b369f6d2976a44d");
    }
}
