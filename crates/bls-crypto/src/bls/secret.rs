use super::{check_length, PublicKey, Signature};
use crate::{BLSError, BlsResult, HashToCurve, SECRET_KEY_LENGTH, SIG_DOMAIN};

use ark_bls12_377::{Fr, G1Projective, G2Projective};
use ark_ec::Group;
use ark_ff::{UniformRand, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::{CryptoRng, Rng};
use zeroize::{Zeroize, Zeroizing};

use std::fmt;

/// A BLS secret key: a non-zero scalar of BLS12-377. The scalar is wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(Fr);

impl SecretKey {
    pub fn generate<R: Rng + CryptoRng>(rng: &mut R) -> SecretKey {
        loop {
            // rejected draws are wiped as well
            let sk = Zeroizing::new(Fr::rand(rng));
            if !sk.is_zero() {
                return SecretKey(*sk);
            }
        }
    }

    /// Signs the message under `SIG_DOMAIN`. Signing is deterministic.
    pub fn sign<H: HashToCurve<Output = G1Projective>>(
        &self,
        message: &[u8],
        hash_to_g1: &H,
    ) -> BlsResult<Signature> {
        Ok(Signature::from(hash_to_g1.hash(SIG_DOMAIN, message)? * self.0))
    }

    pub fn to_public(&self) -> PublicKey {
        PublicKey::from(G2Projective::generator() * self.0)
    }

    pub fn to_bytes(&self) -> BlsResult<Vec<u8>> {
        let mut bytes = Vec::with_capacity(SECRET_KEY_LENGTH);
        self.0.serialize_compressed(&mut bytes)?;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> BlsResult<SecretKey> {
        check_length(bytes, SECRET_KEY_LENGTH)?;
        let sk = Fr::deserialize_compressed(bytes)?;
        if sk.is_zero() {
            return Err(BLSError::ZeroSecretKey);
        }
        Ok(SecretKey(sk))
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}
