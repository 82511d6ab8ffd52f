/*!
 * Hybrid Key Provisioning
 *
 * Minimal key-management collaborator for the combiner: a registry of
 * named algorithm pairs and a keypair generator that assembles
 * length-prefixed composite key buffers. Algorithm negotiation and
 * persistent key storage belong to the embedding framework, not here.
 */

use std::fmt::{self, Display};
use std::sync::Arc;

use oqs::kem::Algorithm;

use crate::error::{CryptoError, CryptoResult};
use crate::hybrid::{codec, AlgorithmDescriptor, HybridKeyHandle, HybridKeyMaterial};
use crate::primitive::{KemCapability, KeyExchangeCapability, OqsKem, X25519};
use crate::secure_memory::SecureBytes;

/// Named hybrid algorithm pairs
///
/// Each suite combines one liboqs KEM with one classical key-exchange
/// group. The Kyber suites match the pre-standard parameter sets; the
/// ML-KEM suites are the FIPS 203 finals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HybridSuite {
    X25519Kyber512,
    X25519Kyber768,
    X25519Kyber1024,
    X25519MlKem512,
    X25519MlKem768,
    X25519MlKem1024,
}

impl HybridSuite {
    /// Every suite this crate can instantiate
    pub fn all() -> &'static [HybridSuite] {
        &[
            HybridSuite::X25519Kyber512,
            HybridSuite::X25519Kyber768,
            HybridSuite::X25519Kyber1024,
            HybridSuite::X25519MlKem512,
            HybridSuite::X25519MlKem768,
            HybridSuite::X25519MlKem1024,
        ]
    }

    /// Canonical suite name
    pub fn name(&self) -> &'static str {
        match self {
            HybridSuite::X25519Kyber512 => "x25519_kyber512",
            HybridSuite::X25519Kyber768 => "x25519_kyber768",
            HybridSuite::X25519Kyber1024 => "x25519_kyber1024",
            HybridSuite::X25519MlKem512 => "x25519_mlkem512",
            HybridSuite::X25519MlKem768 => "x25519_mlkem768",
            HybridSuite::X25519MlKem1024 => "x25519_mlkem1024",
        }
    }

    fn kem_algorithm(&self) -> Algorithm {
        match self {
            HybridSuite::X25519Kyber512 => Algorithm::Kyber512,
            HybridSuite::X25519Kyber768 => Algorithm::Kyber768,
            HybridSuite::X25519Kyber1024 => Algorithm::Kyber1024,
            HybridSuite::X25519MlKem512 => Algorithm::MlKem512,
            HybridSuite::X25519MlKem768 => Algorithm::MlKem768,
            HybridSuite::X25519MlKem1024 => Algorithm::MlKem1024,
        }
    }

    /// Instantiate the suite's two primitive capabilities
    pub fn capabilities(
        &self,
    ) -> CryptoResult<(Arc<dyn KemCapability>, Arc<dyn KeyExchangeCapability>)> {
        let kem = OqsKem::new(self.kem_algorithm())?;
        Ok((Arc::new(kem), Arc::new(X25519)))
    }

    /// The size and capability descriptor for this suite
    pub fn descriptor(&self) -> CryptoResult<AlgorithmDescriptor> {
        let (kem, kex) = self.capabilities()?;
        Ok(AlgorithmDescriptor::for_capabilities(&*kem, &*kex))
    }
}

impl Display for HybridSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Generate a fresh hybrid keypair for a suite
///
/// The returned handle carries both composite halves: the public one for
/// encapsulation contexts, the private one for decapsulation contexts.
/// Component keypairs come from the primitives themselves; this function
/// only assembles the composite layouts.
pub fn generate_keypair(suite: HybridSuite) -> CryptoResult<HybridKeyHandle> {
    let (kem, kex) = suite.capabilities()?;
    let descriptor = AlgorithmDescriptor::for_capabilities(&*kem, &*kex);

    let (kem_public, kem_private) = kem.keypair()?;
    let (kex_private, kex_public) = kex.generate_keypair()?;

    let public = codec::encode_composite_key(&kem_public, &kex_public);
    let private = SecureBytes::from(codec::encode_composite_key(
        kem_private.as_bytes(),
        kex_private.as_bytes(),
    ));

    log::debug!("generated hybrid keypair for suite {}", suite);

    Ok(HybridKeyHandle::bind(
        HybridKeyMaterial::keypair(public, private),
        descriptor,
        kem,
        kex,
    ))
}

/// Import a peer's composite public key for a suite
///
/// Validates the layout before wrapping: the buffer must decode and its
/// component lengths must match the suite's fixed sizes.
pub fn import_public_key(suite: HybridSuite, public: &[u8]) -> CryptoResult<HybridKeyHandle> {
    let (kem, kex) = suite.capabilities()?;
    let descriptor = AlgorithmDescriptor::for_capabilities(&*kem, &*kex);

    let (kem_part, kex_part) = codec::decode_composite_key(public)?;
    if kem_part.len() != kem.public_key_len() {
        return Err(CryptoError::encoding_mismatch(
            "composite key KEM component",
            kem.public_key_len(),
            kem_part.len(),
        ));
    }
    if kex_part.len() != descriptor.kex_public_key_len {
        return Err(CryptoError::encoding_mismatch(
            "composite key key-exchange component",
            descriptor.kex_public_key_len,
            kex_part.len(),
        ));
    }

    Ok(HybridKeyHandle::bind(
        HybridKeyMaterial::public_only(public.to_vec()),
        descriptor,
        kem,
        kex,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suite_names() {
        for suite in HybridSuite::all() {
            assert!(suite.name().starts_with("x25519_"));
            assert_eq!(suite.to_string(), suite.name());
        }
    }

    #[test]
    fn test_generated_keypair_layout() {
        crate::init().unwrap();
        let suite = HybridSuite::X25519MlKem768;
        let handle = generate_keypair(suite).unwrap();
        let descriptor = handle.descriptor();

        let (kem, kex) = suite.capabilities().unwrap();
        let public = handle.public_key().unwrap();
        let (kem_part, kex_part) = codec::decode_composite_key(public).unwrap();
        assert_eq!(kem_part.len(), kem.public_key_len());
        assert_eq!(kex_part.len(), kex.public_key_len());
        assert_eq!(descriptor.kex_public_key_len, kex.public_key_len());
        assert!(descriptor.raw_key_support);
    }

    #[test]
    fn test_import_rejects_mismatched_components() {
        crate::init().unwrap();
        let suite = HybridSuite::X25519MlKem768;
        let handle = generate_keypair(suite).unwrap();
        let public = handle.public_key().unwrap();

        // re-declare the same bytes under a suite with different sizes
        let err = import_public_key(HybridSuite::X25519MlKem512, public).unwrap_err();
        assert!(matches!(err, CryptoError::EncodingMismatch { .. }));

        let imported = import_public_key(suite, public).unwrap();
        assert_eq!(imported.public_key().unwrap(), public);
        assert!(imported.private_key().is_none());
    }
}
