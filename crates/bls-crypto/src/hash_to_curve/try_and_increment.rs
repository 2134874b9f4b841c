use byteorder::WriteBytesExt;
use log::trace;
use std::marker::PhantomData;

use super::HashToCurve;
use crate::hashers::{DirectHasher, Hasher};
use crate::BLSError;

use ark_bls12_377::g1;
use ark_ec::{
    short_weierstrass::{Affine, Projective, SWCurveConfig},
    AffineRepr,
};
use ark_ff::{Field, Zero};
use ark_serialize::CanonicalSerialize;

use once_cell::sync::Lazy;

const NUM_TRIES: u8 = 255;

/// Direct (Blake2s CRH, Blake2x XOF) Try-and-Increment hasher for BLS 12-377.
/// Equivalent to Blake2xs.
pub static DIRECT_HASH_TO_G1: Lazy<TryAndIncrement<DirectHasher, g1::Config>> =
    Lazy::new(|| TryAndIncrement::new(&DirectHasher));

/// A try-and-increment method for hashing to G1 and G2. See page 521 in
/// https://link.springer.com/content/pdf/10.1007/3-540-45682-1_30.pdf.
#[derive(Clone)]
pub struct TryAndIncrement<'a, H, P> {
    hasher: &'a H,
    curve_params: PhantomData<P>,
}

impl<'a, H, P> TryAndIncrement<'a, H, P>
where
    H: Hasher<Error = BLSError>,
    P: SWCurveConfig,
{
    /// Instantiates a new Try-and-increment hasher with the provided hashing method
    /// and curve parameters based on the type
    pub fn new(h: &'a H) -> Self {
        TryAndIncrement {
            hasher: h,
            curve_params: PhantomData,
        }
    }

    /// Hashes `counter || message` for increasing counters until the digest decodes to
    /// an x coordinate on the curve, returning the cofactor-cleared point and the counter.
    pub fn hash_with_attempt(
        &self,
        domain: &[u8],
        message: &[u8],
    ) -> Result<(Projective<P>, usize), BLSError> {
        let num_bytes = Affine::<P>::default().compressed_size();

        let mut counter = [0; 1];
        for c in 0..NUM_TRIES {
            (&mut counter[..]).write_u8(c)?;
            let candidate_hash = self
                .hasher
                .hash(domain, &[&counter[..], message].concat(), num_bytes)?;

            // the top bit picks the y coordinate, the field decoder masks it away from x
            let greatest = candidate_hash[num_bytes - 1] & 0x80 != 0;
            let point = P::BaseField::from_random_bytes(&candidate_hash[..num_bytes])
                .and_then(|x| Affine::<P>::get_point_from_x_unchecked(x, greatest));

            if let Some(p) = point {
                let scaled = p.clear_cofactor().into_group();
                if scaled.is_zero() {
                    continue;
                }

                trace!(
                    "succeeded hashing \"{}\" to curve in {} tries",
                    hex::encode(message),
                    c
                );
                return Ok((scaled, c as usize));
            }
        }
        Err(BLSError::HashToCurveError)
    }
}

impl<'a, H, P> HashToCurve for TryAndIncrement<'a, H, P>
where
    H: Hasher<Error = BLSError>,
    P: SWCurveConfig,
{
    type Output = Projective<P>;

    fn hash(&self, domain: &[u8], message: &[u8]) -> Result<Self::Output, BLSError> {
        self.hash_with_attempt(domain, message).map(|res| res.0)
    }
}
