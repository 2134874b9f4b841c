use bls_crypto::{hash_to_curve::try_and_increment::DIRECT_HASH_TO_G1, SecretKey};

use clap::{App, Arg};
use log::debug;
use rand::thread_rng;

fn main() {
    env_logger::init();

    let matches = App::new("SimpleSignature")
        .about("Show an example of a simple signature with a random key")
        .arg(
            Arg::with_name("message")
                .short("m")
                .value_name("MESSAGE")
                .help("Sets the message to sign")
                .required(true),
        )
        .get_matches();

    let message = matches.value_of("message").unwrap();

    let rng = &mut thread_rng();
    let try_and_increment = &*DIRECT_HASH_TO_G1;

    let sk = SecretKey::generate(rng);
    let pk = sk.to_public();
    debug!("pk: {}", hex::encode(pk.to_bytes().unwrap()));

    let sig = sk.sign(message.as_bytes(), try_and_increment).unwrap();
    debug!("sig: {}", hex::encode(sig.to_bytes().unwrap()));

    pk.verify(message.as_bytes(), &sig, try_and_increment)
        .unwrap();
    println!("signature verified successfully");
}
