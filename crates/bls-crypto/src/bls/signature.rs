use super::check_length;
use crate::{BLSError, BlsResult, SIGNATURE_LENGTH};

use ark_bls12_377::{G1Affine, G1Projective};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::Zero;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

/// A BLS signature on G1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature(G1Projective);

impl From<G1Projective> for Signature {
    fn from(sig: G1Projective) -> Signature {
        Signature(sig)
    }
}

impl AsRef<G1Projective> for Signature {
    fn as_ref(&self) -> &G1Projective {
        &self.0
    }
}

impl Signature {
    pub fn to_bytes(&self) -> BlsResult<Vec<u8>> {
        let mut bytes = Vec::with_capacity(SIGNATURE_LENGTH);
        self.0.into_affine().serialize_compressed(&mut bytes)?;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> BlsResult<Signature> {
        check_length(bytes, SIGNATURE_LENGTH)?;
        let point = G1Affine::deserialize_compressed(bytes)?.into_group();
        if point.is_zero() {
            return Err(BLSError::IdentityPoint);
        }
        Ok(Signature(point))
    }
}
