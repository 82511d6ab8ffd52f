/*!
 * Post-Quantum KEM Capability Backed by liboqs
 *
 * Wraps `oqs::kem::Kem` behind the `KemCapability` trait. A `Kem` handle
 * is constructed per operation; the liboqs KEM objects are cheap to build
 * and per-call construction keeps the capability free of shared mutable
 * state, so one `OqsKem` can serve concurrent encapsulations.
 */

use oqs::kem::{Algorithm, Kem};

use super::KemCapability;
use crate::error::{CryptoError, CryptoResult};
use crate::secure_memory::SecureBytes;

/// KEM capability for any algorithm liboqs supports
///
/// The fixed lengths are queried once at construction and cached, so the
/// descriptor-building and size-query paths never touch liboqs again.
pub struct OqsKem {
    algorithm: Algorithm,
    name: String,
    public_key_len: usize,
    secret_key_len: usize,
    ciphertext_len: usize,
    shared_secret_len: usize,
}

impl OqsKem {
    /// Instantiate the capability for one liboqs algorithm
    pub fn new(algorithm: Algorithm) -> CryptoResult<Self> {
        let kem = Kem::new(algorithm)
            .map_err(|e| CryptoError::allocation_failure(&format!("liboqs KEM instance: {}", e)))?;

        Ok(Self {
            algorithm,
            name: format!("{:?}", algorithm),
            public_key_len: kem.length_public_key(),
            secret_key_len: kem.length_secret_key(),
            ciphertext_len: kem.length_ciphertext(),
            shared_secret_len: kem.length_shared_secret(),
        })
    }

    fn instantiate(&self) -> CryptoResult<Kem> {
        Kem::new(self.algorithm)
            .map_err(|e| CryptoError::allocation_failure(&format!("liboqs KEM instance: {}", e)))
    }
}

impl KemCapability for OqsKem {
    fn name(&self) -> &str {
        &self.name
    }

    fn public_key_len(&self) -> usize {
        self.public_key_len
    }

    fn secret_key_len(&self) -> usize {
        self.secret_key_len
    }

    fn ciphertext_len(&self) -> usize {
        self.ciphertext_len
    }

    fn shared_secret_len(&self) -> usize {
        self.shared_secret_len
    }

    fn keypair(&self) -> CryptoResult<(Vec<u8>, SecureBytes)> {
        let kem = self.instantiate()?;
        let (pk, sk) = kem
            .keypair()
            .map_err(|e| CryptoError::primitive_failure("KEM", "keypair", &e.to_string()))?;

        Ok((pk.into_vec(), SecureBytes::from(sk.into_vec())))
    }

    fn encapsulate(&self, public_key: &[u8]) -> CryptoResult<(Vec<u8>, SecureBytes)> {
        let kem = self.instantiate()?;
        let pk = kem.public_key_from_bytes(public_key).ok_or_else(|| {
            CryptoError::encoding_mismatch("KEM public key", self.public_key_len, public_key.len())
        })?;

        let (ct, ss) = kem
            .encapsulate(&pk)
            .map_err(|e| CryptoError::primitive_failure("KEM", "encapsulate", &e.to_string()))?;

        Ok((ct.into_vec(), SecureBytes::from(ss.into_vec())))
    }

    fn decapsulate(&self, secret_key: &[u8], ciphertext: &[u8]) -> CryptoResult<SecureBytes> {
        let kem = self.instantiate()?;
        let sk = kem.secret_key_from_bytes(secret_key).ok_or_else(|| {
            CryptoError::encoding_mismatch("KEM secret key", self.secret_key_len, secret_key.len())
        })?;
        let ct = kem.ciphertext_from_bytes(ciphertext).ok_or_else(|| {
            CryptoError::encoding_mismatch("KEM ciphertext", self.ciphertext_len, ciphertext.len())
        })?;

        let ss = kem
            .decapsulate(&sk, &ct)
            .map_err(|e| CryptoError::primitive_failure("KEM", "decapsulate", &e.to_string()))?;

        Ok(SecureBytes::from(ss.into_vec()))
    }
}
