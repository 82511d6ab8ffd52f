//! End-to-end properties of the hybrid combiner over the real primitives

use std::collections::HashSet;
use std::sync::Arc;

use hykem::hybrid::codec;
use hykem::prelude::*;
use hykem::primitive::{KemCapability, KexPrivateKey, KeyExchangeCapability, OqsKem, X25519};
use hykem::{AlgorithmDescriptor, HybridKeyMaterial, SecureBytes};

fn encapsulate(context: &HybridContext) -> (Vec<u8>, Vec<u8>) {
    let Encapsulation::Lengths {
        ciphertext,
        shared_secret,
    } = context.encapsulate(None, None).unwrap()
    else {
        panic!("size query returned a compute result");
    };

    let mut ct = vec![0u8; ciphertext];
    let mut secret = vec![0u8; shared_secret];
    context
        .encapsulate(Some(&mut ct), Some(&mut secret))
        .unwrap();
    (ct, secret)
}

fn decapsulate(context: &HybridContext, ct: &[u8]) -> Vec<u8> {
    let Decapsulation::Length { shared_secret } = context.decapsulate(None, ct).unwrap() else {
        panic!("size query returned a compute result");
    };

    let mut secret = vec![0u8; shared_secret];
    context.decapsulate(Some(&mut secret), ct).unwrap();
    secret
}

#[test]
fn round_trip_all_suites() {
    init().unwrap();

    for &suite in HybridSuite::all() {
        let key = generate_keypair(suite).unwrap();

        let mut sender = HybridContext::new();
        sender.init_encapsulate(&key).unwrap();
        let mut receiver = HybridContext::new();
        receiver.init_decapsulate(&key).unwrap();

        let mut previous_secret: Option<Vec<u8>> = None;
        for _ in 0..3 {
            let (ct, secret) = encapsulate(&sender);
            let recovered = decapsulate(&receiver, &ct);
            assert_eq!(secret, recovered, "round trip mismatch for {}", suite);

            // secrets must match per encapsulation, not across them
            if let Some(previous) = previous_secret.replace(secret) {
                assert_ne!(previous, recovered, "repeated secret for {}", suite);
            }
        }
    }
}

#[test]
fn round_trip_through_imported_public_key() {
    init().unwrap();
    let suite = HybridSuite::X25519MlKem768;
    let key = generate_keypair(suite).unwrap();

    // the sender only ever sees the public composite
    let peer = import_public_key(suite, key.public_key().unwrap()).unwrap();

    let mut sender = HybridContext::new();
    sender.init_encapsulate(&peer).unwrap();
    let (ct, secret) = encapsulate(&sender);

    let mut receiver = HybridContext::new();
    receiver.init_decapsulate(&key).unwrap();
    assert_eq!(decapsulate(&receiver, &ct), secret);
}

#[test]
fn size_queries_are_deterministic_and_pure() {
    init().unwrap();
    let suite = HybridSuite::X25519Kyber768;
    let key = generate_keypair(suite).unwrap();
    let descriptor = *key.descriptor();

    let mut context = HybridContext::new();
    context.init_encapsulate(&key).unwrap();

    let expected = Encapsulation::Lengths {
        ciphertext: descriptor.kem_ciphertext_len + descriptor.kex_public_key_len,
        shared_secret: descriptor.kem_shared_secret_len + descriptor.kex_shared_secret_len,
    };
    for _ in 0..10 {
        assert_eq!(context.encapsulate(None, None).unwrap(), expected);
    }

    // a size query never touches a supplied buffer
    let mut ct = vec![0xEE; descriptor.ciphertext_len()];
    assert_eq!(context.encapsulate(Some(&mut ct), None).unwrap(), expected);
    assert!(ct.iter().all(|&b| b == 0xEE));

    let mut receiver = HybridContext::new();
    receiver.init_decapsulate(&key).unwrap();
    assert_eq!(
        receiver.decapsulate(None, &[]).unwrap(),
        Decapsulation::Length {
            shared_secret: descriptor.shared_secret_len(),
        }
    );
}

#[test]
fn wrong_ciphertext_length_fails_cleanly() {
    init().unwrap();
    let key = generate_keypair(HybridSuite::X25519Kyber768).unwrap();

    let mut sender = HybridContext::new();
    sender.init_encapsulate(&key).unwrap();
    let (ct, _) = encapsulate(&sender);

    let mut receiver = HybridContext::new();
    receiver.init_decapsulate(&key).unwrap();

    for bad in [&ct[..ct.len() - 1], &[][..]] {
        let mut secret = vec![0xEE; key.descriptor().shared_secret_len()];
        let err = receiver.decapsulate(Some(&mut secret), bad).unwrap_err();
        assert_eq!(err.error_type(), "encoding_mismatch");
        assert!(secret.iter().all(|&b| b == 0xEE), "secret buffer written");
    }
}

#[test]
fn tampered_kex_component_never_yields_original_secret() {
    init().unwrap();
    let suite = HybridSuite::X25519MlKem768;
    let key = generate_keypair(suite).unwrap();
    let descriptor = *key.descriptor();
    let kem_ct_len = descriptor.kem_ciphertext_len;
    let kex_len = descriptor.kex_public_key_len;

    let mut sender = HybridContext::new();
    sender.init_encapsulate(&key).unwrap();
    let mut receiver = HybridContext::new();
    receiver.init_decapsulate(&key).unwrap();

    let mut unintended_matches: Vec<String> = Vec::new();
    let mut trials = 0usize;

    for _ in 0..40 {
        let (ct, secret) = encapsulate(&sender);

        for byte in 0..kex_len {
            for bit in 0..8 {
                // the top bit of the final u-coordinate byte is masked per
                // RFC 7748, so flipping it cannot change the secret
                if byte == kex_len - 1 && bit == 7 {
                    continue;
                }
                trials += 1;

                let mut tampered = ct.clone();
                tampered[kem_ct_len + byte] ^= 1 << bit;

                let mut recovered = vec![0u8; descriptor.shared_secret_len()];
                match receiver.decapsulate(Some(&mut recovered), &tampered) {
                    Err(_) => {}
                    Ok(_) => {
                        if recovered == secret {
                            unintended_matches.push(format!(
                                "byte {} bit {} of kex component {}",
                                byte,
                                bit,
                                hex::encode(&tampered[kem_ct_len..])
                            ));
                        }
                    }
                }
            }
        }
    }

    assert!(trials >= 10_000, "only ran {} trials", trials);
    assert!(
        unintended_matches.is_empty(),
        "tampered ciphertexts reproduced the secret: {:?}",
        unintended_matches
    );
}

/// A key exchange whose derivation always fails, layered over real X25519
/// key material
struct FailingKex;

impl KeyExchangeCapability for FailingKex {
    fn group(&self) -> hykem::primitive::KexGroup {
        X25519.group()
    }
    fn public_key_len(&self) -> usize {
        X25519.public_key_len()
    }
    fn shared_secret_len(&self) -> usize {
        X25519.shared_secret_len()
    }
    fn raw_key_support(&self) -> bool {
        true
    }
    fn generate_keypair(&self) -> CryptoResult<(KexPrivateKey, Vec<u8>)> {
        X25519.generate_keypair()
    }
    fn private_key_from_raw(&self, bytes: &[u8]) -> CryptoResult<KexPrivateKey> {
        X25519.private_key_from_raw(bytes)
    }
    fn private_key_from_der(&self, bytes: &[u8]) -> CryptoResult<KexPrivateKey> {
        X25519.private_key_from_der(bytes)
    }
    fn derive(&self, _: &KexPrivateKey, _: &[u8]) -> CryptoResult<SecureBytes> {
        Err(CryptoError::primitive_failure(
            "key exchange",
            "derive",
            "forced failure",
        ))
    }
}

#[test]
fn failed_derivation_yields_no_secret_even_when_kem_succeeds() {
    init().unwrap();
    let kem: Arc<dyn KemCapability> = Arc::new(OqsKem::new(oqs::kem::Algorithm::MlKem768).unwrap());
    let kex: Arc<dyn KeyExchangeCapability> = Arc::new(FailingKex);
    let descriptor = AlgorithmDescriptor::for_capabilities(&*kem, &*kex);

    let (kem_public, kem_private) = kem.keypair().unwrap();
    let (kex_private, kex_public) = kex.generate_keypair().unwrap();
    let public = codec::encode_composite_key(&kem_public, &kex_public);
    let private = SecureBytes::from(codec::encode_composite_key(
        kem_private.as_bytes(),
        kex_private.as_bytes(),
    ));

    let key = hykem::HybridKeyHandle::bind(
        HybridKeyMaterial::keypair(public, private),
        descriptor,
        Arc::clone(&kem),
        kex,
    );

    // build a valid ciphertext with the real primitives so only the
    // receiving derivation fails
    let (kem_ct, _) = kem.encapsulate(&kem_public).unwrap();
    let (_, ephemeral_public) = X25519.generate_keypair().unwrap();
    let mut ct = kem_ct;
    ct.extend_from_slice(&ephemeral_public);

    let mut receiver = HybridContext::new();
    receiver.init_decapsulate(&key).unwrap();

    let mut secret = vec![0xEE; descriptor.shared_secret_len()];
    let err = receiver.decapsulate(Some(&mut secret), &ct).unwrap_err();
    assert_eq!(err.error_type(), "primitive_failure");
}

#[test]
fn concurrent_encapsulations_are_distinct() {
    init().unwrap();
    let key = generate_keypair(HybridSuite::X25519Kyber768).unwrap();
    let kem_ct_len = key.descriptor().kem_ciphertext_len;

    const THREADS: usize = 8;
    const PER_THREAD: usize = 125;

    let mut ciphertexts: Vec<Vec<u8>> = Vec::with_capacity(THREADS * PER_THREAD);
    std::thread::scope(|scope| {
        let mut workers = Vec::new();
        for _ in 0..THREADS {
            let key = key.retain();
            workers.push(scope.spawn(move || {
                let mut context = HybridContext::new();
                context.init_encapsulate(&key).unwrap();
                (0..PER_THREAD).map(|_| encapsulate(&context).0).collect::<Vec<_>>()
            }));
        }
        for worker in workers {
            ciphertexts.extend(worker.join().unwrap());
        }
    });

    assert_eq!(ciphertexts.len(), THREADS * PER_THREAD);

    // every ephemeral key-exchange component must be unique
    let ephemerals: HashSet<&[u8]> = ciphertexts.iter().map(|ct| &ct[kem_ct_len..]).collect();
    assert_eq!(ephemerals.len(), ciphertexts.len());
}

#[test]
fn rebinding_and_release_track_reference_counts() {
    init().unwrap();
    let first = generate_keypair(HybridSuite::X25519Kyber512).unwrap();
    let second = generate_keypair(HybridSuite::X25519Kyber512).unwrap();

    let mut context = HybridContext::new();
    context.init_encapsulate(&first).unwrap();
    assert_eq!(first.reference_count(), 2);

    context.init_encapsulate(&second).unwrap();
    assert_eq!(first.reference_count(), 1);
    assert_eq!(second.reference_count(), 2);

    context.release();
    assert_eq!(second.reference_count(), 1);
}
