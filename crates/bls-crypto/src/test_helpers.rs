use crate::{hash_to_curve::try_and_increment::DIRECT_HASH_TO_G1, PublicKey, SecretKey, Signature};
use rand::Rng;

// Same RNG for all tests
pub fn rng() -> rand::rngs::ThreadRng {
    rand::thread_rng()
}

/// generate a keypair
pub fn keygen() -> (SecretKey, PublicKey) {
    let secret_key = SecretKey::generate(&mut rng());
    let public_key = secret_key.to_public();
    (secret_key, public_key)
}

/// `len` random bytes
pub fn random_message(len: usize) -> Vec<u8> {
    let rng = &mut rng();
    (0..len).map(|_| rng.gen()).collect()
}

/// signs with the default hasher, panicking on failure
pub fn sign(secret_key: &SecretKey, message: &[u8]) -> Signature {
    secret_key
        .sign(message, &*DIRECT_HASH_TO_G1)
        .expect("hashing to G1 should not fail")
}
