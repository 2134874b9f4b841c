use super::{check_length, Signature};
use crate::{BLSError, BlsResult, HashToCurve, PUBLIC_KEY_LENGTH, SIG_DOMAIN};

use ark_bls12_377::{Bls12_377, G1Projective, G2Affine, G2Projective};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::Zero;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

/// A BLS public key on G2
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey(G2Projective);

impl From<G2Projective> for PublicKey {
    fn from(pk: G2Projective) -> PublicKey {
        PublicKey(pk)
    }
}

impl AsRef<G2Projective> for PublicKey {
    fn as_ref(&self) -> &G2Projective {
        &self.0
    }
}

impl PublicKey {
    /// Checks e(sig, g2) == e(H(m), pk).
    pub fn verify<H: HashToCurve<Output = G1Projective>>(
        &self,
        message: &[u8],
        signature: &Signature,
        hash_to_g1: &H,
    ) -> BlsResult<()> {
        let hash = hash_to_g1.hash(SIG_DOMAIN, message)?;
        let lhs = Bls12_377::pairing(signature.as_ref().into_affine(), G2Affine::generator());
        let rhs = Bls12_377::pairing(hash.into_affine(), self.0.into_affine());
        if lhs == rhs {
            Ok(())
        } else {
            Err(BLSError::VerificationFailed)
        }
    }

    /// Compressed affine encoding.
    pub fn to_bytes(&self) -> BlsResult<Vec<u8>> {
        let mut bytes = Vec::with_capacity(PUBLIC_KEY_LENGTH);
        self.0.into_affine().serialize_compressed(&mut bytes)?;
        Ok(bytes)
    }

    /// Decodes a compressed point, checking that it is on the curve, in the prime order
    /// subgroup and not the identity.
    pub fn from_bytes(bytes: &[u8]) -> BlsResult<PublicKey> {
        check_length(bytes, PUBLIC_KEY_LENGTH)?;
        let point = G2Affine::deserialize_compressed(bytes)?.into_group();
        if point.is_zero() {
            return Err(BLSError::IdentityPoint);
        }
        Ok(PublicKey(point))
    }
}
